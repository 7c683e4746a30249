// Site and payload filters over launch records
//
// Filters never mutate rows. The site filter borrows the input unchanged for
// the `ALL` sentinel and copies only matching rows otherwise.

use crate::dataset::LaunchRecord;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::borrow::Cow;
use std::fmt;

/// UI token for "every site"
pub const ALL_SITES: &str = "ALL";

/// Dropdown value: every site, or one concrete launch site
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub enum SiteSelection {
    #[default]
    All,
    Site(String),
}

impl SiteSelection {
    pub fn site(name: impl Into<String>) -> Self {
        SiteSelection::Site(name.into())
    }

    /// Parse a dropdown token; `ALL` is the sentinel, anything else names a site
    pub fn from_token(token: &str) -> Self {
        if token == ALL_SITES {
            SiteSelection::All
        } else {
            SiteSelection::Site(token.to_string())
        }
    }

    pub fn as_token(&self) -> &str {
        match self {
            SiteSelection::All => ALL_SITES,
            SiteSelection::Site(name) => name.as_str(),
        }
    }

    pub fn is_all(&self) -> bool {
        matches!(self, SiteSelection::All)
    }

    pub fn matches(&self, record: &LaunchRecord) -> bool {
        match self {
            SiteSelection::All => true,
            SiteSelection::Site(name) => record.launch_site == *name,
        }
    }
}

impl fmt::Display for SiteSelection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_token())
    }
}

impl Serialize for SiteSelection {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_token())
    }
}

impl<'de> Deserialize<'de> for SiteSelection {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let token = String::deserialize(deserializer)?;
        Ok(SiteSelection::from_token(&token))
    }
}

/// Inclusive payload interval in kg. Serialized as `[low, high]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(from = "(f64, f64)", into = "(f64, f64)")]
pub struct PayloadRange {
    pub low: f64,
    pub high: f64,
}

impl PayloadRange {
    pub fn new(low: f64, high: f64) -> Self {
        Self { low, high }
    }

    /// `low > high` is accepted and matches nothing
    pub fn is_inverted(&self) -> bool {
        self.low > self.high
    }

    pub fn contains(&self, payload_mass_kg: f64) -> bool {
        self.low <= payload_mass_kg && payload_mass_kg <= self.high
    }

    /// Missing payloads never match
    pub fn matches(&self, record: &LaunchRecord) -> bool {
        record
            .payload_mass_kg
            .map(|p| self.contains(p))
            .unwrap_or(false)
    }
}

impl From<(f64, f64)> for PayloadRange {
    fn from((low, high): (f64, f64)) -> Self {
        Self::new(low, high)
    }
}

impl From<PayloadRange> for (f64, f64) {
    fn from(range: PayloadRange) -> Self {
        (range.low, range.high)
    }
}

/// Narrow records to one site. `All` hands back the input without copying.
pub fn filter_by_site<'a>(
    records: &'a [LaunchRecord],
    selection: &SiteSelection,
) -> Cow<'a, [LaunchRecord]> {
    match selection {
        SiteSelection::All => Cow::Borrowed(records),
        SiteSelection::Site(_) => Cow::Owned(
            records
                .iter()
                .filter(|r| selection.matches(r))
                .cloned()
                .collect(),
        ),
    }
}

/// Keep records whose payload lies in `[range.low, range.high]`
pub fn filter_by_payload(records: &[LaunchRecord], range: PayloadRange) -> Vec<LaunchRecord> {
    if range.is_inverted() {
        return Vec::new();
    }
    records
        .iter()
        .filter(|r| range.matches(r))
        .cloned()
        .collect()
}
