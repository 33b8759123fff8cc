use nutrilabel_core::db::open_db_in_memory;
use nutrilabel_core::{
    daily_totals, query_history, totals_for_day, EntryStore, HistoryOrder, HistoryQuery,
    MacroBreakdown, NewEntry, NutritionEntry, NutritionTotals, PrepStyle, SqliteKeyValueStore,
};

const DAY_MS: i64 = 86_400_000;
const EPSILON: f64 = 1e-6;

fn sample_entries() -> Vec<NutritionEntry> {
    let conn = open_db_in_memory().unwrap();
    let mut store = EntryStore::open(SqliteKeyValueStore::new(&conn));
    let requests = [
        NewEntry::new("Butter Chicken with Basmati Rice", 520.0, 28.0, 45.0, 24.0)
            .with_prep_style(PrepStyle::Restaurant)
            .logged_at(20_000 * DAY_MS + 1_000),
        NewEntry::new("Chipotle Chicken Bowl", 650.0, 40.0, 70.0, 20.0)
            .with_prep_style(PrepStyle::Restaurant)
            .logged_at(19_999 * DAY_MS + 5_000),
        NewEntry::new("Home chicken soup", 230.5, 18.2, 20.1, 6.7)
            .with_prep_style(PrepStyle::Home)
            .logged_at(20_000 * DAY_MS + 500),
        NewEntry::new("Apple", 95.0, 0.5, 25.0, 0.3).logged_at(20_000 * DAY_MS + 1_000),
    ];
    for request in requests {
        store.add(request).unwrap();
    }
    store.list().unwrap().to_vec()
}

#[test]
fn totals_equal_fieldwise_sum() {
    let entries = sample_entries();
    let totals = NutritionTotals::from_entries(&entries);

    let expected = NutritionTotals::new(
        entries.iter().map(|e| e.calories).sum(),
        entries.iter().map(|e| e.protein).sum(),
        entries.iter().map(|e| e.carbs).sum(),
        entries.iter().map(|e| e.fats).sum(),
    );
    assert!(totals.approx_eq(&expected, EPSILON));
}

#[test]
fn totals_are_order_insensitive() {
    let entries = sample_entries();
    let forward = NutritionTotals::from_entries(&entries);
    let reversed = NutritionTotals::from_entries(entries.iter().rev());
    let rotated = NutritionTotals::from_entries(entries.iter().cycle().skip(2).take(entries.len()));

    assert!(forward.approx_eq(&reversed, EPSILON));
    assert!(forward.approx_eq(&rotated, EPSILON));
}

#[test]
fn totals_of_nothing_are_zero() {
    let none: Vec<NutritionEntry> = Vec::new();
    assert_eq!(NutritionTotals::from_entries(&none), NutritionTotals::default());
}

#[test]
fn history_search_is_case_insensitive_and_whitespace_tolerant() {
    let entries = sample_entries();
    let query = HistoryQuery {
        search: Some("  CHICKEN   bowl ".to_string()),
        ..HistoryQuery::default()
    };

    let found = query_history(&entries, &query);
    assert_eq!(found.len(), 1);
    assert_eq!(found[0].name, "Chipotle Chicken Bowl");
}

#[test]
fn history_filters_by_prep_style() {
    let entries = sample_entries();
    let query = HistoryQuery {
        search: Some("chicken".to_string()),
        prep_style: Some(PrepStyle::Restaurant),
        ..HistoryQuery::default()
    };

    let names = query_history(&entries, &query)
        .into_iter()
        .map(|entry| entry.name.as_str())
        .collect::<Vec<_>>();
    assert_eq!(
        names,
        vec!["Butter Chicken with Basmati Rice", "Chipotle Chicken Bowl"]
    );
}

#[test]
fn history_orders_by_logged_at_with_stable_ties() {
    let entries = sample_entries();

    let newest = query_history(&entries, &HistoryQuery::default())
        .into_iter()
        .map(|entry| entry.name.as_str())
        .collect::<Vec<_>>();
    assert_eq!(
        newest,
        vec![
            "Butter Chicken with Basmati Rice",
            "Apple",
            "Home chicken soup",
            "Chipotle Chicken Bowl",
        ]
    );

    let oldest = query_history(
        &entries,
        &HistoryQuery {
            order: HistoryOrder::OldestFirst,
            limit: Some(2),
            ..HistoryQuery::default()
        },
    )
    .into_iter()
    .map(|entry| entry.name.as_str())
    .collect::<Vec<_>>();
    assert_eq!(oldest, vec!["Chipotle Chicken Bowl", "Home chicken soup"]);
}

#[test]
fn daily_totals_group_by_utc_day() {
    let entries = sample_entries();
    let days = daily_totals(&entries);

    assert_eq!(days.len(), 2);
    assert_eq!(days[0].day, 19_999);
    assert_eq!(days[0].entry_count, 1);
    assert!(days[0]
        .totals
        .approx_eq(&NutritionTotals::new(650.0, 40.0, 70.0, 20.0), EPSILON));
    assert_eq!(days[1].day, 20_000);
    assert_eq!(days[1].entry_count, 3);
    assert!(days[1]
        .totals
        .approx_eq(&totals_for_day(&entries, 20_000), EPSILON));
    assert!(days[1]
        .totals
        .approx_eq(&NutritionTotals::new(845.5, 46.7, 90.1, 31.0), EPSILON));
    assert_eq!(totals_for_day(&entries, 1), NutritionTotals::default());
}

#[test]
fn macro_breakdown_matches_store_totals() {
    let entries = sample_entries();
    let totals = NutritionTotals::from_entries(&entries);
    let breakdown = MacroBreakdown::from_totals(&totals).unwrap();

    assert!((breakdown.total_grams - totals.macro_grams()).abs() < EPSILON);
    assert!(
        (breakdown.protein_pct + breakdown.carbs_pct + breakdown.fats_pct - 100.0).abs() < EPSILON
    );
}
