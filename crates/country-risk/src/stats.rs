//! Assessment coverage statistics

use crate::catalog::CountryCatalog;
use serde::Serialize;
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct RiskStats {
    pub total_countries: usize,
    pub assessed_countries: usize,
    pub unassessed_countries: usize,
    /// Stored keys with no matching catalog entry
    pub orphaned_assessments: usize,
}

impl RiskStats {
    /// Only keys that name a catalog country count as assessed, so
    /// `total == assessed + unassessed` holds whatever the store contains.
    pub fn compute<S: AsRef<str>>(catalog: &CountryCatalog, keys: &[S]) -> Self {
        let total = catalog.len();
        let mut assessed = 0;
        let mut orphaned = 0;

        for key in keys {
            if catalog.contains_alpha2(key.as_ref()) {
                assessed += 1;
            } else {
                debug!("Risk data stored for unknown country code {}", key.as_ref());
                orphaned += 1;
            }
        }

        Self {
            total_countries: total,
            assessed_countries: assessed,
            unassessed_countries: total - assessed,
            orphaned_assessments: orphaned,
        }
    }
}
