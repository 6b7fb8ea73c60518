//! JSON wire format of a [`CoverageStore`].

use std::path::Path;

use serde_json::Value;
use tracing::debug;

use super::{CoverageKind, CoverageStore, TraumahCoverage, UnitCoverage};
use crate::error::{Result, SpatialOptError};

impl CoverageStore {
    /// Parses a coverage from its JSON wire format.
    ///
    /// # Errors
    ///
    /// Returns a schema error if `type`, `type.mode` or `type.type` is
    /// missing, if either holds an unknown value, or if a demand unit's
    /// coverage does not match the declared type.
    pub fn from_json_str(s: &str) -> Result<Self> {
        let value: Value = serde_json::from_str(s)
            .map_err(|e| SpatialOptError::Schema(format!("invalid coverage JSON: {}", e)))?;
        Self::from_json_value(value)
    }

    /// Parses a coverage from an already decoded JSON value.
    pub fn from_json_value(value: Value) -> Result<Self> {
        let coverage_type = value
            .get("type")
            .ok_or_else(|| SpatialOptError::Schema("'type' not found in coverage".to_string()))?;
        if coverage_type.get("type").is_none() {
            return Err(SpatialOptError::Schema(
                "'type' not found in coverage['type']".to_string(),
            ));
        }
        if coverage_type.get("mode").is_none() {
            return Err(SpatialOptError::Schema(
                "'mode' not found in coverage['type']".to_string(),
            ));
        }

        let mut store: CoverageStore = serde_json::from_value(value)
            .map_err(|e| SpatialOptError::Schema(format!("malformed coverage: {}", e)))?;
        store.normalize_units()?;
        debug!(
            event = "coverage_parsed",
            kind = %store.coverage_type.kind,
            demand_count = store.demand.len(),
            facility_count = store.facility_count(),
        );
        Ok(store)
    }

    /// Loads a coverage from a JSON file.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_json_str(&contents)
    }

    /// Serializes the coverage to pretty-printed JSON.
    pub fn to_json_string(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Writes the coverage as JSON to `path`.
    pub fn write_json_file(&self, path: impl AsRef<Path>) -> Result<()> {
        std::fs::write(path, self.to_json_string()?)?;
        Ok(())
    }

    // An empty `{}` coverage parses as a facility map; TRAUMAH units take the
    // list shape instead. Any other mismatch is malformed input.
    fn normalize_units(&mut self) -> Result<()> {
        let traumah = self.coverage_type.kind == CoverageKind::Traumah;
        for (id, unit) in self.demand.iter_mut() {
            let (holds_traumah, is_empty) = match &unit.coverage {
                UnitCoverage::Facility(map) => (false, map.is_empty()),
                UnitCoverage::Traumah(lists) => (true, lists.is_empty()),
            };
            match (traumah, holds_traumah) {
                (true, false) if is_empty => {
                    unit.coverage = UnitCoverage::Traumah(TraumahCoverage::default());
                }
                (true, false) => {
                    return Err(SpatialOptError::Schema(format!(
                        "demand unit '{}' has facility coverage in a traumah coverage",
                        id
                    )));
                }
                (false, true) => {
                    return Err(SpatialOptError::Schema(format!(
                        "demand unit '{}' has traumah coverage in a {} coverage",
                        id, self.coverage_type.kind
                    )));
                }
                _ => {}
            }
        }
        Ok(())
    }
}
