//! Country catalog loading, code resolution and search

use crate::{Result, RiskError};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::HashSet;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;
use tracing::{info, warn};

/// One catalog entry. Fields beyond the three codes are carried through
/// untouched so the API returns the record as it appears on disk.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Country {
    pub name: String,
    pub alpha2: String,
    pub alpha3: String,
    #[serde(flatten)]
    pub metadata: Map<String, Value>,
}

impl Country {
    /// Case-insensitive substring match against name and both codes.
    /// `needle` must already be lowercase.
    fn matches(&self, needle: &str) -> bool {
        self.name.to_lowercase().contains(needle)
            || self.alpha2.to_lowercase().contains(needle)
            || self.alpha3.to_lowercase().contains(needle)
    }
}

/// Resolve an alpha-2 or alpha-3 code (any case) to its catalog entry.
///
/// First match in catalog order wins.
pub fn resolve<'a>(code: &str, countries: &'a [Country]) -> Result<&'a Country> {
    let normalized = code.to_uppercase();
    countries
        .iter()
        .find(|c| c.alpha2 == normalized || c.alpha3 == normalized)
        .ok_or_else(|| RiskError::NotFound {
            code: code.to_string(),
        })
}

/// Immutable, ordered country list loaded once at startup
#[derive(Debug, Clone, Default)]
pub struct CountryCatalog {
    countries: Vec<Country>,
}

impl CountryCatalog {
    pub fn new(countries: Vec<Country>) -> Self {
        let countries = countries
            .into_iter()
            .map(|mut c| {
                c.alpha2 = c.alpha2.to_uppercase();
                c.alpha3 = c.alpha3.to_uppercase();
                c
            })
            .collect::<Vec<_>>();
        warn_duplicates(&countries);
        Self { countries }
    }

    /// Load the catalog from a JSON array of country records
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        info!("Loading countries from {:?}", path);

        let unavailable = |reason: String| RiskError::DataUnavailable {
            path: path.to_path_buf(),
            reason,
        };

        let file = File::open(path).map_err(|e| unavailable(e.to_string()))?;
        let reader = BufReader::new(file);
        let countries: Vec<Country> =
            serde_json::from_reader(reader).map_err(|e| unavailable(e.to_string()))?;

        info!("Loaded {} countries", countries.len());
        Ok(Self::new(countries))
    }

    pub fn countries(&self) -> &[Country] {
        &self.countries
    }

    pub fn len(&self) -> usize {
        self.countries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.countries.is_empty()
    }

    pub fn resolve(&self, code: &str) -> Result<&Country> {
        resolve(code, &self.countries)
    }

    /// True when `alpha2` is the canonical key of some catalog entry
    pub fn contains_alpha2(&self, alpha2: &str) -> bool {
        self.countries.iter().any(|c| c.alpha2 == alpha2)
    }

    /// All countries whose name or codes contain `query`, ignoring case.
    /// Returns the lowercased query alongside the matches.
    pub fn search(&self, query: &str) -> Result<(String, Vec<&Country>)> {
        let needle = query.to_lowercase();
        if needle.is_empty() {
            return Err(RiskError::InvalidRequest(
                "Search query required".to_string(),
            ));
        }

        let results = self
            .countries
            .iter()
            .filter(|c| c.matches(&needle))
            .collect();
        Ok((needle, results))
    }
}

fn warn_duplicates(countries: &[Country]) {
    let mut seen = HashSet::new();
    for c in countries {
        for code in [&c.alpha2, &c.alpha3] {
            if !seen.insert(code.as_str()) {
                warn!("Duplicate country code {} in catalog ({})", code, c.name);
            }
        }
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use proptest::prelude::*;
    use serde_json::json;
    use std::io::Write;

    pub(crate) fn sample_countries() -> Vec<Country> {
        serde_json::from_value(json!([
            { "name": "France", "alpha2": "FR", "alpha3": "FRA", "numeric": "250" },
            { "name": "Germany", "alpha2": "DE", "alpha3": "DEU", "numeric": "276" },
            { "name": "United Kingdom", "alpha2": "GB", "alpha3": "GBR", "numeric": "826" },
            { "name": "United States", "alpha2": "US", "alpha3": "USA", "numeric": "840" },
            { "name": "Tanzania, United Republic of", "alpha2": "TZ", "alpha3": "TZA" }
        ]))
        .unwrap()
    }

    #[test]
    fn test_resolve_alpha2_and_alpha3() {
        let catalog = CountryCatalog::new(sample_countries());

        assert_eq!(catalog.resolve("FR").unwrap().name, "France");
        assert_eq!(catalog.resolve("fra").unwrap().name, "France");
        assert_eq!(catalog.resolve("uSa").unwrap().alpha2, "US");
    }

    #[test]
    fn test_resolve_unknown_code() {
        let catalog = CountryCatalog::new(sample_countries());

        let err = catalog.resolve("XX").unwrap_err();
        assert!(matches!(err, RiskError::NotFound { ref code } if code == "XX"));
        assert_eq!(err.to_string(), "Country not found");

        assert!(catalog.resolve(" fr").is_err());
        assert!(catalog.resolve("").is_err());
    }

    #[test]
    fn test_resolve_first_match_wins() {
        let mut countries = sample_countries();
        countries.push(serde_json::from_value(json!(
            { "name": "Shadow France", "alpha2": "FR", "alpha3": "FRX" }
        )).unwrap());
        let catalog = CountryCatalog::new(countries);

        assert_eq!(catalog.resolve("fr").unwrap().name, "France");
    }

    #[test]
    fn test_codes_normalized_on_construction() {
        let countries: Vec<Country> = serde_json::from_value(json!([
            { "name": "Japan", "alpha2": "jp", "alpha3": "jpn" }
        ]))
        .unwrap();
        let catalog = CountryCatalog::new(countries);

        assert_eq!(catalog.resolve("JPN").unwrap().alpha2, "JP");
        assert!(catalog.contains_alpha2("JP"));
    }

    #[test]
    fn test_metadata_preserved() {
        let catalog = CountryCatalog::new(sample_countries());
        let france = catalog.resolve("FR").unwrap();

        assert_eq!(france.metadata.get("numeric"), Some(&json!("250")));
        let out = serde_json::to_value(france).unwrap();
        assert_eq!(out["numeric"], "250");
        assert_eq!(out["alpha3"], "FRA");
    }

    #[test]
    fn test_search_united() {
        let catalog = CountryCatalog::new(sample_countries());
        let (query, results) = catalog.search("UNITED").unwrap();

        assert_eq!(query, "united");
        let names: Vec<&str> = results.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(
            names,
            vec!["United Kingdom", "United States", "Tanzania, United Republic of"]
        );
    }

    #[test]
    fn test_search_matches_codes() {
        let catalog = CountryCatalog::new(sample_countries());

        let (_, results) = catalog.search("deu").unwrap();
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].name, "Germany");

        let (_, results) = catalog.search("zzz").unwrap();
        assert!(results.is_empty());
    }

    #[test]
    fn test_search_empty_query_rejected() {
        let catalog = CountryCatalog::new(sample_countries());
        let err = catalog.search("").unwrap_err();

        assert!(matches!(err, RiskError::InvalidRequest(_)));
        assert_eq!(err.to_string(), "Search query required");
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("countries.json");
        let mut file = File::create(&path).unwrap();
        serde_json::to_writer(&mut file, &sample_countries()).unwrap();
        file.flush().unwrap();

        let catalog = CountryCatalog::load(&path).unwrap();
        assert_eq!(catalog.len(), 5);
        assert_eq!(catalog.countries()[0].name, "France");
    }

    #[test]
    fn test_load_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = CountryCatalog::load(dir.path().join("nope.json")).unwrap_err();

        assert!(matches!(err, RiskError::DataUnavailable { .. }));
    }

    #[test]
    fn test_load_malformed_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("countries.json");

        std::fs::write(&path, "{ not json").unwrap();
        assert!(matches!(
            CountryCatalog::load(&path),
            Err(RiskError::DataUnavailable { .. })
        ));

        // Records missing a code are malformed too
        std::fs::write(&path, r#"[{"name": "Nowhere", "alpha2": "NW"}]"#).unwrap();
        assert!(matches!(
            CountryCatalog::load(&path),
            Err(RiskError::DataUnavailable { .. })
        ));
    }

    #[test]
    fn test_shipped_catalog_loads() {
        let path = Path::new(env!("CARGO_MANIFEST_DIR")).join("../../data/countries.json");
        let catalog = CountryCatalog::load(path).unwrap();

        assert_eq!(catalog.len(), 249);
        assert_eq!(catalog.resolve("fra").unwrap().name, "France");
        let (_, united) = catalog.search("united").unwrap();
        let names: Vec<&str> = united.iter().map(|c| c.name.as_str()).collect();
        assert!(names.contains(&"United States"));
        assert!(names.contains(&"United Kingdom"));
    }

    /// Randomly re-case a code
    fn recase(code: &str, mask: u8) -> String {
        code.chars()
            .enumerate()
            .map(|(i, ch)| {
                if mask & (1 << i) != 0 {
                    ch.to_ascii_lowercase()
                } else {
                    ch.to_ascii_uppercase()
                }
            })
            .collect()
    }

    proptest! {
        #[test]
        fn test_resolution_ignores_case_and_code_kind(idx in 0usize..5, mask in any::<u8>()) {
            let catalog = CountryCatalog::new(sample_countries());
            let expected = &catalog.countries()[idx];

            let by_alpha2 = catalog.resolve(&recase(&expected.alpha2, mask)).unwrap();
            let by_alpha3 = catalog.resolve(&recase(&expected.alpha3, mask)).unwrap();

            prop_assert_eq!(by_alpha2, expected);
            prop_assert_eq!(by_alpha3, expected);
        }
    }
}
