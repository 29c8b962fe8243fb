pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::CliConfig;

pub use adapters::{ConsoleMap, ConsolePresenter, FileCsvSource, HtmlPresenter, HttpCsvSource};
pub use config::AppConfig;
pub use core::coordinator::{LoadPhase, RefreshOutcome, ViewCoordinator, ViewSettings};
pub use core::engine::MapEngine;
pub use domain::model::{GraduateRecord, Query};
pub use utils::error::{AppError, Result};
