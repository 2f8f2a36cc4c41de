#![forbid(unsafe_code)]

//! Core domain model and logic for the workout planner.
//!
//! This crate provides:
//! - Domain types (plans, days, exercises, profiles, saved plans)
//! - The markdown plan parser
//! - Completion tracking and progress
//! - Prompt rendering for plan generation
//! - Persistence (per-user JSON store, CSV export)

pub mod types;
pub mod error;
pub mod config;
pub mod logging;
pub mod parser;
pub mod tracker;
pub mod profile;
pub mod prompt;
pub mod store;
pub mod export;

// Re-export commonly used types
pub use error::{Error, Result};
pub use types::*;
pub use config::Config;
pub use parser::{parse, parse_report, parse_with, ParseOptions, ParseReport};
pub use tracker::Progress;
pub use prompt::render_plan_prompt;
pub use store::{JsonPlanStore, PlanStore};
pub use export::export_csv;
