//! Country Risk Library
//!
//! Reference catalog of countries plus an editable, file-backed store of
//! per-country risk assessments.
//!
//! # Components
//!
//! | Module | Role |
//! |--------|------|
//! | [`catalog`] | Immutable country list, code resolution, search |
//! | [`store`] | alpha-2 → risk document mapping, atomic persistence |
//! | [`categories`] | Static risk category reference catalog |
//! | [`stats`] | Assessment coverage counts |
//!
//! Risk documents are opaque JSON. A write replaces the whole document for
//! a country; nothing is merged.

use std::path::PathBuf;
use thiserror::Error;

pub mod catalog;
pub mod categories;
pub mod stats;
pub mod store;

pub use catalog::{resolve, Country, CountryCatalog};
pub use categories::{RiskCategory, RISK_CATEGORIES};
pub use stats::RiskStats;
pub use store::{parse_document, RiskAssessment, RiskMap, RiskStore};

/// Default catalog file name inside the data directory
pub const COUNTRIES_FILE: &str = "countries.json";

/// Default risk document file name inside the data directory
pub const RISK_DATA_FILE: &str = "risk_data.json";

#[derive(Error, Debug)]
pub enum RiskError {
    #[error("Data unavailable at {path:?}: {reason}")]
    DataUnavailable { path: PathBuf, reason: String },
    #[error("Risk data at {path:?} is corrupt: {reason}")]
    CorruptStore { path: PathBuf, reason: String },
    #[error("Country not found")]
    NotFound { code: String },
    #[error("{0}")]
    InvalidRequest(String),
    #[error("Failed to persist risk data to {path:?}: {source}")]
    PersistenceFailure {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

pub type Result<T> = std::result::Result<T, RiskError>;
