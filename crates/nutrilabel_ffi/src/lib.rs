//! Flutter bridge surface for NutriLabel.

pub mod api;
