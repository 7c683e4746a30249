// Launch record dataset store
//
// The table is loaded once at startup and shared read-only behind an `Arc`.
// Derived scalars (payload bounds, distinct sites) are computed at load time.

use crate::{DashError, Result};
use serde::{Deserialize, Serialize};
use std::io;
use std::path::Path;
use tracing::{debug, info};

pub const COL_LAUNCH_SITE: &str = "Launch Site";
pub const COL_PAYLOAD_MASS: &str = "Payload Mass (kg)";
pub const COL_BOOSTER_CATEGORY: &str = "Booster Version Category";
pub const COL_CLASS: &str = "class";
pub const COL_FLIGHT_NUMBER: &str = "Flight Number";
pub const COL_BOOSTER_VERSION: &str = "Booster Version";

const REQUIRED_COLUMNS: [&str; 4] = [
    COL_LAUNCH_SITE,
    COL_PAYLOAD_MASS,
    COL_BOOSTER_CATEGORY,
    COL_CLASS,
];

/// Cell values treated as a missing payload
const MISSING_MARKERS: [&str; 5] = ["", "nan", "na", "null", "none"];

/// Binary launch outcome (`class` column)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(into = "u8", try_from = "u8")]
pub enum OutcomeClass {
    Failure = 0,
    Success = 1,
}

impl OutcomeClass {
    pub fn as_u8(self) -> u8 {
        self as u8
    }

    pub fn is_success(self) -> bool {
        matches!(self, OutcomeClass::Success)
    }

    fn parse(raw: &str) -> Option<Self> {
        match raw.trim() {
            "0" => Some(OutcomeClass::Failure),
            "1" => Some(OutcomeClass::Success),
            other => match other.parse::<f64>().ok() {
                Some(v) if v == 0.0 => Some(OutcomeClass::Failure),
                Some(v) if v == 1.0 => Some(OutcomeClass::Success),
                _ => None,
            },
        }
    }
}

impl From<OutcomeClass> for u8 {
    fn from(class: OutcomeClass) -> Self {
        class.as_u8()
    }
}

impl TryFrom<u8> for OutcomeClass {
    type Error = String;

    fn try_from(value: u8) -> std::result::Result<Self, Self::Error> {
        match value {
            0 => Ok(OutcomeClass::Failure),
            1 => Ok(OutcomeClass::Success),
            other => Err(format!("outcome class must be 0 or 1, got {}", other)),
        }
    }
}

/// One row of the launch table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LaunchRecord {
    pub launch_site: String,
    pub payload_mass_kg: Option<f64>,
    pub booster_category: String,
    pub outcome: OutcomeClass,
    pub flight_number: Option<u32>,
    pub booster_version: Option<String>,
}

impl LaunchRecord {
    pub fn new(
        launch_site: impl Into<String>,
        payload_mass_kg: Option<f64>,
        booster_category: impl Into<String>,
        outcome: OutcomeClass,
    ) -> Self {
        Self {
            launch_site: launch_site.into(),
            payload_mass_kg,
            booster_category: booster_category.into(),
            outcome,
            flight_number: None,
            booster_version: None,
        }
    }
}

// Row as it appears on disk; numeric cells stay textual so missing markers can be handled
#[derive(Debug, Deserialize)]
struct RawRow {
    #[serde(rename = "Launch Site")]
    launch_site: String,
    #[serde(rename = "Payload Mass (kg)")]
    payload_mass_kg: Option<String>,
    #[serde(rename = "Booster Version Category")]
    booster_category: String,
    #[serde(rename = "class")]
    class: String,
    #[serde(rename = "Flight Number")]
    flight_number: Option<String>,
    #[serde(rename = "Booster Version")]
    booster_version: Option<String>,
}

impl RawRow {
    fn into_record(self, row: usize) -> Result<LaunchRecord> {
        let payload_mass_kg = parse_payload(self.payload_mass_kg.as_deref()).map_err(|raw| {
            DashError::DataUnavailable(format!(
                "row {}: invalid {} value `{}`",
                row, COL_PAYLOAD_MASS, raw
            ))
        })?;

        let outcome = OutcomeClass::parse(&self.class).ok_or_else(|| {
            DashError::DataUnavailable(format!(
                "row {}: invalid {} value `{}`",
                row, COL_CLASS, self.class
            ))
        })?;

        let flight_number = self
            .flight_number
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .and_then(|s| s.parse::<u32>().ok());

        let booster_version = self
            .booster_version
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty());

        Ok(LaunchRecord {
            launch_site: self.launch_site.trim().to_string(),
            payload_mass_kg,
            booster_category: self.booster_category.trim().to_string(),
            outcome,
            flight_number,
            booster_version,
        })
    }
}

fn parse_payload(raw: Option<&str>) -> std::result::Result<Option<f64>, String> {
    let Some(raw) = raw else {
        return Ok(None);
    };
    let trimmed = raw.trim();
    if MISSING_MARKERS
        .iter()
        .any(|m| trimmed.eq_ignore_ascii_case(m))
    {
        return Ok(None);
    }
    match trimmed.parse::<f64>() {
        Ok(v) if v.is_finite() && v >= 0.0 => Ok(Some(v)),
        _ => Err(trimmed.to_string()),
    }
}

/// Immutable launch table plus values derived from it at load time
#[derive(Debug, Clone)]
pub struct Dataset {
    records: Vec<LaunchRecord>,
    min_payload: f64,
    max_payload: f64,
    sites: Vec<String>,
}

impl Dataset {
    /// Load a CSV file with a header row
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let file = std::fs::File::open(path).map_err(|e| {
            DashError::DataUnavailable(format!("cannot open {}: {}", path.display(), e))
        })?;
        let dataset = Self::from_reader(file)?;
        info!(
            target: "dataset",
            path = %path.display(),
            records = dataset.len(),
            sites = dataset.sites.len(),
            min_payload = dataset.min_payload,
            max_payload = dataset.max_payload,
            "Launch dataset loaded"
        );
        Ok(dataset)
    }

    /// Parse CSV content from any reader
    pub fn from_reader<R: io::Read>(reader: R) -> Result<Self> {
        let mut rdr = csv::ReaderBuilder::new()
            .has_headers(true)
            .trim(csv::Trim::Headers)
            .flexible(false)
            .from_reader(reader);

        let headers = rdr
            .headers()
            .map_err(|e| DashError::DataUnavailable(format!("cannot read header: {}", e)))?
            .clone();
        for column in REQUIRED_COLUMNS {
            if !headers.iter().any(|h| h == column) {
                return Err(DashError::DataUnavailable(format!(
                    "missing column `{}`",
                    column
                )));
            }
        }

        let mut records = Vec::new();
        for (idx, row) in rdr.deserialize::<RawRow>().enumerate() {
            // Header is line 1
            let line = idx + 2;
            let raw = row
                .map_err(|e| DashError::DataUnavailable(format!("row {}: {}", line, e)))?;
            records.push(raw.into_record(line)?);
        }
        debug!(target: "dataset", rows = records.len(), "Parsed launch rows");

        Self::from_records(records)
    }

    /// Build a store from in-memory rows. Payloads must be finite and non-negative.
    pub fn from_records(records: Vec<LaunchRecord>) -> Result<Self> {
        if let Some((idx, payload)) = records.iter().enumerate().find_map(|(idx, r)| {
            r.payload_mass_kg
                .filter(|v| !v.is_finite() || *v < 0.0)
                .map(|v| (idx, v))
        }) {
            return Err(DashError::DataUnavailable(format!(
                "record {}: invalid {} value `{}`",
                idx + 1,
                COL_PAYLOAD_MASS,
                payload
            )));
        }

        let (min_payload, max_payload) = records
            .iter()
            .filter_map(|r| r.payload_mass_kg)
            .fold(None, |acc: Option<(f64, f64)>, v| match acc {
                Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
                None => Some((v, v)),
            })
            .ok_or(DashError::EmptyDataset)?;

        let mut sites: Vec<String> = Vec::new();
        for record in &records {
            if !sites.iter().any(|s| s == &record.launch_site) {
                sites.push(record.launch_site.clone());
            }
        }

        Ok(Self {
            records,
            min_payload,
            max_payload,
            sites,
        })
    }

    pub fn records(&self) -> &[LaunchRecord] {
        &self.records
    }

    pub fn min_payload(&self) -> f64 {
        self.min_payload
    }

    pub fn max_payload(&self) -> f64 {
        self.max_payload
    }

    /// Distinct launch sites in first-seen order
    pub fn sites(&self) -> &[String] {
        &self.sites
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn payload_missing_markers_are_none() {
        for raw in ["", "  ", "nan", "NaN", "NA", "null"] {
            assert_eq!(parse_payload(Some(raw)), Ok(None), "marker {:?}", raw);
        }
        assert_eq!(parse_payload(None), Ok(None));
    }

    #[test]
    fn payload_rejects_garbage_and_negative() {
        assert!(parse_payload(Some("heavy")).is_err());
        assert!(parse_payload(Some("-5")).is_err());
        assert!(parse_payload(Some("inf")).is_err());
        assert_eq!(parse_payload(Some(" 2500.5 ")), Ok(Some(2500.5)));
    }

    #[test]
    fn outcome_class_accepts_integer_and_float_forms() {
        assert_eq!(OutcomeClass::parse("1"), Some(OutcomeClass::Success));
        assert_eq!(OutcomeClass::parse("0.0"), Some(OutcomeClass::Failure));
        assert_eq!(OutcomeClass::parse("2"), None);
        assert_eq!(OutcomeClass::parse("yes"), None);
    }

    #[test]
    fn outcome_class_serializes_as_integer() {
        let json = serde_json::to_string(&OutcomeClass::Success).unwrap();
        assert_eq!(json, "1");
        let back: OutcomeClass = serde_json::from_str("0").unwrap();
        assert_eq!(back, OutcomeClass::Failure);
        assert!(serde_json::from_str::<OutcomeClass>("3").is_err());
    }
}
