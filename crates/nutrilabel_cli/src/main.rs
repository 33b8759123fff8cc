//! NutriLabel CLI
//!
//! Command-line shell over `nutrilabel_core`: log food, inspect totals and
//! history, edit settings and run photo analysis against the estimator.

use anyhow::{bail, Context, Result};
use clap::{Args, Parser, Subcommand};
use nutrilabel_core::db::open_db;
use nutrilabel_core::{
    cancel, clear_all_data, confirm, daily_totals, epoch_day, is_onboarding_complete,
    mark_onboarding_complete, now_epoch_ms, query_history, storage_info, CoreConfig,
    DefaultPrepStyle, EntryId, EntryStore, HistoryOrder, HistoryQuery, HttpNutritionAnalyzer,
    ImageUpload, KeyValueStore, MacroBreakdown, NewEntry, NutritionEntry, NutritionTotals,
    PhotoLogService, PrepStyle, SettingsPatch, SettingsService, SqliteKeyValueStore, UserSettings,
};
use rusqlite::Connection;
use std::io::{BufRead, Write};
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "nutrilabel")]
#[command(about = "NutriLabel - food logging with photo nutrition estimates")]
#[command(version)]
struct Cli {
    /// SQLite database path (overrides NUTRILABEL_DB_PATH)
    #[arg(long, global = true)]
    db: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Log a food entry
    Add(AddArgs),

    /// Remove an entry by id
    Remove { id: String },

    /// List all entries in logging order
    List,

    /// Show summed calories and macros
    Totals,

    /// Search logged entries
    History {
        /// Case-insensitive name filter
        #[arg(short, long)]
        search: Option<String>,

        /// home | restaurant | unknown
        #[arg(long, value_parser = parse_prep_style)]
        prep: Option<PrepStyle>,

        /// Oldest entries first
        #[arg(long)]
        oldest_first: bool,

        /// Maximum results (default 50, max 200)
        #[arg(short, long)]
        limit: Option<u32>,
    },

    /// Show per-day totals
    Daily,

    /// Show or change user settings
    Settings {
        #[command(subcommand)]
        action: SettingsAction,
    },

    /// Estimate nutrition from a food photo
    Analyze {
        /// Image file (jpg, png, heic, webp)
        image: PathBuf,

        /// home | restaurant | unknown
        #[arg(long, value_parser = parse_prep_style)]
        prep: Option<PrepStyle>,

        /// Log the estimate without asking
        #[arg(short, long)]
        yes: bool,
    },

    /// Show or record onboarding completion
    Onboarding {
        #[command(subcommand)]
        action: OnboardingAction,
    },

    /// List stored keys and their total size
    StorageInfo,

    /// Delete entries, settings, caches and onboarding state
    ResetAll {
        /// Skip the confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },

    /// Check core linkage
    Ping,
}

#[derive(Subcommand)]
enum OnboardingAction {
    Status,
    Complete,
}

#[derive(Args)]
struct AddArgs {
    name: String,

    #[arg(long)]
    calories: f64,

    #[arg(long, default_value_t = 0.0)]
    protein: f64,

    #[arg(long, default_value_t = 0.0)]
    carbs: f64,

    #[arg(long, default_value_t = 0.0)]
    fats: f64,

    /// home | restaurant | unknown
    #[arg(long, value_parser = parse_prep_style)]
    prep: Option<PrepStyle>,
}

#[derive(Subcommand)]
enum SettingsAction {
    /// Print current settings
    Show,

    /// Change one or more settings
    Set {
        #[arg(long)]
        metric: Option<bool>,

        /// home | restaurant | ask
        #[arg(long, value_parser = parse_default_prep_style)]
        default_prep: Option<DefaultPrepStyle>,

        #[arg(long)]
        detailed_view: Option<bool>,

        #[arg(long)]
        notifications: Option<bool>,

        #[arg(long)]
        dark_mode: Option<bool>,
    },

    /// Restore defaults
    Reset,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let mut config = CoreConfig::from_env();
    if let Some(db) = cli.db {
        config.db_path = db;
    }

    if let Err(err) = nutrilabel_core::init_logging(
        &config.log_level,
        &config.log_dir.to_string_lossy(),
    ) {
        eprintln!("warning: file logging disabled: {err}");
    }

    match cli.command {
        Commands::Ping => {
            println!("nutrilabel_core ping={}", nutrilabel_core::ping());
            println!("nutrilabel_core version={}", nutrilabel_core::core_version());
            Ok(())
        }
        Commands::Add(args) => cmd_add(&config, args),
        Commands::Remove { id } => cmd_remove(&config, &id),
        Commands::List => cmd_list(&config),
        Commands::Totals => cmd_totals(&config),
        Commands::History {
            search,
            prep,
            oldest_first,
            limit,
        } => cmd_history(
            &config,
            HistoryQuery {
                search,
                prep_style: prep,
                order: if oldest_first {
                    HistoryOrder::OldestFirst
                } else {
                    HistoryOrder::NewestFirst
                },
                limit,
            },
        ),
        Commands::Daily => cmd_daily(&config),
        Commands::Settings { action } => cmd_settings(&config, action),
        Commands::Analyze { image, prep, yes } => cmd_analyze(&config, &image, prep, yes),
        Commands::Onboarding { action } => cmd_onboarding(&config, action),
        Commands::StorageInfo => cmd_storage_info(&config),
        Commands::ResetAll { yes } => cmd_reset_all(&config, yes),
    }
}

fn open(config: &CoreConfig) -> Result<Connection> {
    open_db(&config.db_path)
        .with_context(|| format!("failed to open database `{}`", config.db_path.display()))
}

fn open_store<S: KeyValueStore>(storage: S) -> EntryStore<S> {
    let mut store = EntryStore::new(storage);
    let report = store.load();
    if let Some(err) = report.recovered_from {
        eprintln!("warning: stored entries unreadable, starting empty: {err}");
    }
    if report.skipped > 0 {
        eprintln!("warning: skipped {} invalid stored entries", report.skipped);
    }
    store
}

fn warn_on_persist_failure<S: KeyValueStore>(store: &mut EntryStore<S>) {
    if let Some(err) = store.take_persistence_warning() {
        eprintln!("warning: change kept for this session only: {err}");
    }
}

fn cmd_add(config: &CoreConfig, args: AddArgs) -> Result<()> {
    let conn = open(config)?;
    let mut store = open_store(SqliteKeyValueStore::new(&conn));

    let request = NewEntry::new(args.name, args.calories, args.protein, args.carbs, args.fats)
        .with_prep_style(args.prep.unwrap_or_default());
    let entry = store.add(request).context("entry rejected")?;
    warn_on_persist_failure(&mut store);

    println!("✓ Logged {}", entry.id);
    print_entry(&entry);
    Ok(())
}

fn cmd_remove(config: &CoreConfig, id: &str) -> Result<()> {
    let conn = open(config)?;
    let mut store = open_store(SqliteKeyValueStore::new(&conn));

    let removed = store.remove(&EntryId::from(id.trim()))?;
    warn_on_persist_failure(&mut store);
    if removed {
        println!("✓ Removed {id}");
    } else {
        println!("No entry with id {id}.");
    }
    Ok(())
}

fn cmd_list(config: &CoreConfig) -> Result<()> {
    let conn = open(config)?;
    let store = open_store(SqliteKeyValueStore::new(&conn));

    let entries = store.list()?;
    if entries.is_empty() {
        println!("No entries yet.");
        return Ok(());
    }
    for entry in entries {
        print_entry(entry);
    }
    println!();
    print_totals(&NutritionTotals::from_entries(entries));
    Ok(())
}

fn cmd_totals(config: &CoreConfig) -> Result<()> {
    let conn = open(config)?;
    let store = open_store(SqliteKeyValueStore::new(&conn));

    println!("Entries: {}", store.len());
    print_totals(&store.totals()?);
    Ok(())
}

fn cmd_history(config: &CoreConfig, query: HistoryQuery) -> Result<()> {
    let conn = open(config)?;
    let store = open_store(SqliteKeyValueStore::new(&conn));

    let found = query_history(store.list()?, &query);
    if found.is_empty() {
        println!("No results.");
        return Ok(());
    }
    println!("Found {} result(s).", found.len());
    for entry in found {
        print_entry(entry);
    }
    Ok(())
}

fn cmd_daily(config: &CoreConfig) -> Result<()> {
    let conn = open(config)?;
    let store = open_store(SqliteKeyValueStore::new(&conn));

    let days = daily_totals(store.list()?);
    if days.is_empty() {
        println!("No entries yet.");
        return Ok(());
    }
    let today = epoch_day(now_epoch_ms());
    for day in days {
        let marker = if day.day == today { " (today)" } else { "" };
        println!(
            "day {}{marker}: {} entries, {:.0} kcal, P {:.1}g C {:.1}g F {:.1}g",
            day.day,
            day.entry_count,
            day.totals.calories,
            day.totals.protein,
            day.totals.carbs,
            day.totals.fats
        );
    }
    Ok(())
}

fn cmd_settings(config: &CoreConfig, action: SettingsAction) -> Result<()> {
    let conn = open(config)?;
    let service = SettingsService::new(SqliteKeyValueStore::new(&conn));

    match action {
        SettingsAction::Show => print_settings(&service.load_settings()),
        SettingsAction::Set {
            metric,
            default_prep,
            detailed_view,
            notifications,
            dark_mode,
        } => {
            let patch = SettingsPatch {
                use_metric: metric,
                default_prep_style: default_prep,
                show_detailed_view: detailed_view,
                notifications_enabled: notifications,
                dark_mode,
            };
            if patch.is_empty() {
                bail!("nothing to change; pass at least one setting flag");
            }
            let saved = service.save_settings(&patch)?;
            println!("✓ Settings saved");
            print_settings(&saved);
        }
        SettingsAction::Reset => {
            service.reset_settings()?;
            println!("✓ Settings reset");
            print_settings(&UserSettings::default());
        }
    }
    Ok(())
}

fn cmd_analyze(
    config: &CoreConfig,
    image: &Path,
    prep: Option<PrepStyle>,
    yes: bool,
) -> Result<()> {
    let bytes = std::fs::read(image)
        .with_context(|| format!("failed to read image `{}`", image.display()))?;
    let file_name = image
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| "photo.jpg".to_string());

    let service = PhotoLogService::new(HttpNutritionAnalyzer::new(config.analyzer_url.clone())?);
    println!("Analyzing {file_name}...");
    let pending = service.analyze_photo(&ImageUpload::new(file_name, bytes))?;
    let pending = match prep {
        Some(style) => pending.with_prep_style(style),
        None => pending,
    };

    let estimate = pending.estimate();
    println!("{}", estimate.food_name);
    println!(
        "  {:.0} kcal, P {:.1}g C {:.1}g F {:.1}g",
        estimate.calories, estimate.protein, estimate.carbs, estimate.fats
    );
    if let Some(confidence) = estimate.confidence {
        println!("  confidence {confidence:.0}%");
    }

    if !yes && !ask("Log this entry? [y/N] ")? {
        cancel(pending);
        println!("Discarded.");
        return Ok(());
    }

    let conn = open(config)?;
    let mut store = open_store(SqliteKeyValueStore::new(&conn));
    let entry = confirm(&mut store, pending).context("estimate cannot be logged")?;
    warn_on_persist_failure(&mut store);
    println!("✓ Logged {}", entry.id);
    Ok(())
}

fn cmd_onboarding(config: &CoreConfig, action: OnboardingAction) -> Result<()> {
    let conn = open(config)?;
    let kv = SqliteKeyValueStore::new(&conn);

    match action {
        OnboardingAction::Status => {
            let done = is_onboarding_complete(&kv);
            println!("onboarding: {}", if done { "complete" } else { "pending" });
        }
        OnboardingAction::Complete => {
            mark_onboarding_complete(&kv)?;
            println!("✓ Onboarding marked complete");
        }
    }
    Ok(())
}

fn cmd_storage_info(config: &CoreConfig) -> Result<()> {
    let conn = open(config)?;
    let info = storage_info(&SqliteKeyValueStore::new(&conn))?;

    println!("{} key(s), {} bytes", info.keys.len(), info.total_bytes);
    for key in &info.keys {
        println!("  {key}");
    }
    Ok(())
}

fn cmd_reset_all(config: &CoreConfig, yes: bool) -> Result<()> {
    if !yes && !ask("Delete all NutriLabel data? [y/N] ")? {
        println!("Nothing deleted.");
        return Ok(());
    }
    let conn = open(config)?;
    clear_all_data(&SqliteKeyValueStore::new(&conn))?;
    println!("✓ All app data cleared");
    Ok(())
}

fn ask(prompt: &str) -> Result<bool> {
    print!("{prompt}");
    std::io::stdout().flush()?;
    let mut answer = String::new();
    std::io::stdin().lock().read_line(&mut answer)?;
    Ok(matches!(answer.trim().to_ascii_lowercase().as_str(), "y" | "yes"))
}

fn print_entry(entry: &NutritionEntry) {
    println!(
        "{}  {:<32} {:>6.0} kcal  P {:>5.1}g  C {:>5.1}g  F {:>5.1}g  [{}, {}]",
        entry.id,
        entry.name,
        entry.calories,
        entry.protein,
        entry.carbs,
        entry.fats,
        entry.prep_style.as_str(),
        entry.source.as_str()
    );
}

fn print_totals(totals: &NutritionTotals) {
    println!(
        "Total: {:.0} kcal, P {:.1}g C {:.1}g F {:.1}g",
        totals.calories, totals.protein, totals.carbs, totals.fats
    );
    if let Some(breakdown) = MacroBreakdown::from_totals(totals) {
        println!(
            "Macros: protein {:.0}%, carbs {:.0}%, fats {:.0}%",
            breakdown.protein_pct, breakdown.carbs_pct, breakdown.fats_pct
        );
    }
}

fn print_settings(settings: &UserSettings) {
    println!("units:              {}", if settings.use_metric { "metric" } else { "imperial" });
    println!("default prep style: {}", settings.default_prep_style.as_str());
    println!("detailed view:      {}", settings.show_detailed_view);
    println!("notifications:      {}", settings.notifications_enabled);
    println!("dark mode:          {}", settings.dark_mode);
    if let Some(synced) = settings.last_synced_at {
        println!("last saved (ms):    {synced}");
    }
}

fn parse_prep_style(value: &str) -> std::result::Result<PrepStyle, String> {
    PrepStyle::parse(value).ok_or_else(|| format!("unknown prep style `{value}`"))
}

fn parse_default_prep_style(value: &str) -> std::result::Result<DefaultPrepStyle, String> {
    DefaultPrepStyle::parse(value).ok_or_else(|| format!("unknown default prep style `{value}`"))
}
