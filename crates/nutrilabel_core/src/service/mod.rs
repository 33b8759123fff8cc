//! Core use-case services.
//!
//! # Responsibility
//! - Orchestrate repositories into use-case level APIs.
//! - Keep UI/FFI shells decoupled from storage and network details.

pub mod app_data;
pub mod entry_store;
pub mod history;
pub mod photo_log;
pub mod settings_service;
