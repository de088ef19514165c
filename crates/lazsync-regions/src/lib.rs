//! Region registry for the lazsync partner API client.
//!
//! This crate maps region codes to the REST gateway serving them. The
//! built-in table ships with the crate; extending it is a configuration
//! change, not a code change.
//!
//! # Example
//!
//! ```
//! use lazsync_regions::RegionTable;
//!
//! let table = RegionTable::global();
//!
//! // Lookup by code
//! let base = table.resolve("my").unwrap();
//! assert_eq!(base, "https://api.lazada.com.my/rest");
//! ```

#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/lazsync/lazsync/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

use std::collections::HashMap;
use std::sync::OnceLock;

use lazsync_types::{ConfigError, Region};

/// The region table JSON embedded at compile time.
const REGIONS_JSON: &str = include_str!("../data/regions.json");

/// Global built-in region table.
static REGISTRY: OnceLock<RegionTable> = OnceLock::new();

/// Table of region codes and their gateways.
#[derive(Debug, Clone, Default)]
pub struct RegionTable {
    regions: HashMap<String, Region>,
}

impl RegionTable {
    /// Returns the built-in region table.
    ///
    /// The table is initialized lazily on first access.
    #[must_use]
    pub fn global() -> &'static Self {
        REGISTRY.get_or_init(Self::load)
    }

    /// Loads regions from the embedded JSON data.
    fn load() -> Self {
        Self::from_json(REGIONS_JSON).expect("Invalid regions.json")
    }

    /// Parses a region table from a JSON object keyed by region code.
    ///
    /// # Errors
    ///
    /// Returns an error if the JSON does not describe regions.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        let regions: HashMap<String, Region> = serde_json::from_str(json)?;
        Ok(Self::from_regions(regions.into_values()))
    }

    /// Builds a table from a list of regions.
    #[must_use]
    pub fn from_regions(regions: impl IntoIterator<Item = Region>) -> Self {
        let mut table = Self::default();
        for region in regions {
            table.insert(region);
        }
        table
    }

    /// Adds or replaces a region entry.
    pub fn insert(&mut self, region: Region) {
        // Re-normalize entries that came straight from serde.
        let region = Region::new(region.code(), region.name(), region.base_url());
        self.regions.insert(region.code().to_string(), region);
    }

    /// Returns a copy of this table with the given entries layered on top.
    #[must_use]
    pub fn with_overrides(&self, overrides: impl IntoIterator<Item = Region>) -> Self {
        let mut table = self.clone();
        for region in overrides {
            table.insert(region);
        }
        table
    }

    /// Looks up a region by code (case-insensitive).
    #[must_use]
    pub fn get(&self, code: &str) -> Option<&Region> {
        self.regions.get(&code.to_uppercase())
    }

    /// Resolves a region code to its gateway base URL.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::UnknownRegion`] if the code is not in the table.
    pub fn resolve(&self, code: &str) -> Result<&str, ConfigError> {
        self.get(code)
            .map(Region::base_url)
            .ok_or_else(|| ConfigError::UnknownRegion(code.to_string()))
    }

    /// Returns all regions as an iterator.
    pub fn all(&self) -> impl Iterator<Item = &Region> {
        self.regions.values()
    }

    /// Returns the total number of regions.
    #[must_use]
    pub fn len(&self) -> usize {
        self.regions.len()
    }

    /// Returns true if the table is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.regions.is_empty()
    }

    /// Returns all region codes sorted alphabetically.
    pub fn codes(&self) -> Vec<&str> {
        let mut codes: Vec<&str> = self.regions.keys().map(String::as_str).collect();
        codes.sort_unstable();
        codes
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_registry_loads() {
        let table = RegionTable::global();
        assert_eq!(table.codes(), vec!["ID", "MY", "PH", "SG", "TH", "VN"]);
    }

    #[test]
    fn test_resolve_case_insensitive() {
        let table = RegionTable::global();
        assert_eq!(table.resolve("SG").unwrap(), "https://api.lazada.sg/rest");
        assert_eq!(table.resolve("sg").unwrap(), "https://api.lazada.sg/rest");
    }

    #[test]
    fn test_unknown_region() {
        let table = RegionTable::global();
        assert_eq!(
            table.resolve("XX"),
            Err(ConfigError::UnknownRegion("XX".to_string()))
        );
        assert_eq!(
            table.resolve(""),
            Err(ConfigError::UnknownRegion(String::new()))
        );
    }

    #[test]
    fn test_overrides() {
        let table = RegionTable::global().with_overrides([
            Region::new("my", "Malaysia sandbox", "http://127.0.0.1:9000/rest/"),
            Region::new("SA", "Staging", "https://staging.example.com/rest"),
        ]);

        assert_eq!(table.resolve("MY").unwrap(), "http://127.0.0.1:9000/rest");
        assert_eq!(table.resolve("sa").unwrap(), "https://staging.example.com/rest");
        assert_eq!(table.len(), 7);
        // The built-in table is untouched.
        assert_eq!(
            RegionTable::global().resolve("MY").unwrap(),
            "https://api.lazada.com.my/rest"
        );
    }

    #[test]
    fn test_from_json() {
        let table = RegionTable::from_json(
            r#"{"xx": {"code": "xx", "name": "Test", "base_url": "http://localhost/rest/"}}"#,
        )
        .unwrap();
        assert_eq!(table.get("XX").unwrap().base_url(), "http://localhost/rest");
    }
}
