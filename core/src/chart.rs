// Chart specifications handed to the browser renderer
//
// Charts are plain serializable data. Titles and field names follow the page the
// dashboard has always shown.

use crate::aggregate::OutcomeAggregate;
use crate::dataset::{LaunchRecord, COL_BOOSTER_CATEGORY, COL_CLASS, COL_PAYLOAD_MASS};
use crate::filter::SiteSelection;
use serde::{Deserialize, Serialize};

pub const PIE_TITLE_ALL: &str = "Total Success Launches by Site";
pub const SCATTER_TITLE_ALL: &str = "Payload vs. Outcome for All Sites";

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PieSlice {
    pub label: String,
    pub value: u64,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PieChart {
    pub title: String,
    pub slices: Vec<PieSlice>,
}

impl PieChart {
    pub fn from_aggregate(aggregate: &OutcomeAggregate) -> Self {
        match aggregate {
            OutcomeAggregate::AllSites(totals) => Self {
                title: PIE_TITLE_ALL.to_string(),
                slices: totals
                    .entries()
                    .iter()
                    .map(|e| PieSlice {
                        label: e.site.clone(),
                        value: e.successes,
                    })
                    .collect(),
            },
            OutcomeAggregate::SingleSite { site, counts } => Self {
                title: format!("Success vs Failure at {}", site),
                slices: counts
                    .entries()
                    .into_iter()
                    .map(|(class, n)| PieSlice {
                        label: class.as_u8().to_string(),
                        value: n,
                    })
                    .collect(),
            },
        }
    }

    pub fn total(&self) -> u64 {
        self.slices.iter().map(|s| s.value).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.total() == 0
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ScatterPoint {
    /// Payload mass (kg)
    pub x: f64,
    /// Outcome class
    pub y: u8,
    pub launch_site: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub flight_number: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub booster_version: Option<String>,
}

/// Points sharing one booster version category
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ScatterSeries {
    pub category: String,
    pub points: Vec<ScatterPoint>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ScatterChart {
    pub title: String,
    pub x_field: String,
    pub y_field: String,
    pub color_field: String,
    pub series: Vec<ScatterSeries>,
}

impl ScatterChart {
    /// Build from already filtered records. Rows without a payload are skipped.
    pub fn from_records(selection: &SiteSelection, records: &[LaunchRecord]) -> Self {
        let title = match selection {
            SiteSelection::All => SCATTER_TITLE_ALL.to_string(),
            SiteSelection::Site(site) => format!("Payload vs. Outcome for {}", site),
        };

        let mut series: Vec<ScatterSeries> = Vec::new();
        for record in records {
            let Some(x) = record.payload_mass_kg else {
                continue;
            };
            let point = ScatterPoint {
                x,
                y: record.outcome.as_u8(),
                launch_site: record.launch_site.clone(),
                flight_number: record.flight_number,
                booster_version: record.booster_version.clone(),
            };
            match series
                .iter_mut()
                .find(|s| s.category == record.booster_category)
            {
                Some(s) => s.points.push(point),
                None => series.push(ScatterSeries {
                    category: record.booster_category.clone(),
                    points: vec![point],
                }),
            }
        }

        Self {
            title,
            x_field: COL_PAYLOAD_MASS.to_string(),
            y_field: COL_CLASS.to_string(),
            color_field: COL_BOOSTER_CATEGORY.to_string(),
            series,
        }
    }

    pub fn point_count(&self) -> usize {
        self.series.iter().map(|s| s.points.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.point_count() == 0
    }
}
