// Page layout description served to the browser
//
// The slider bounds are fixed; only its initial value comes from the data.

use crate::dataset::Dataset;
use crate::filter::{PayloadRange, ALL_SITES};
use serde::{Deserialize, Serialize};

pub const HEADING: &str = "SpaceX Launch Records Dashboard";
pub const SITE_DROPDOWN_ID: &str = "site-dropdown";
pub const PAYLOAD_SLIDER_ID: &str = "payload-slider";
pub const PIE_CHART_ID: &str = "success-pie-chart";
pub const SCATTER_CHART_ID: &str = "success-payload-scatter-chart";

pub const SLIDER_MIN: f64 = 0.0;
pub const SLIDER_MAX: f64 = 10_000.0;
pub const SLIDER_STEP: f64 = 1_000.0;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct DropdownOption {
    pub label: String,
    pub value: String,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Dropdown {
    pub id: String,
    pub options: Vec<DropdownOption>,
    pub value: String,
    pub placeholder: String,
    pub searchable: bool,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SliderMark {
    pub value: f64,
    pub label: String,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RangeSlider {
    pub id: String,
    pub min: f64,
    pub max: f64,
    pub step: f64,
    pub marks: Vec<SliderMark>,
    pub value: PayloadRange,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct DashboardLayout {
    pub heading: String,
    pub site_dropdown: Dropdown,
    pub payload_slider: RangeSlider,
    pub pie_chart_id: String,
    pub scatter_chart_id: String,
}

impl DashboardLayout {
    pub fn for_dataset(dataset: &Dataset) -> Self {
        let mut options = vec![DropdownOption {
            label: "All Sites".to_string(),
            value: ALL_SITES.to_string(),
        }];
        options.extend(dataset.sites().iter().map(|site| DropdownOption {
            label: site.clone(),
            value: site.clone(),
        }));

        let steps = ((SLIDER_MAX - SLIDER_MIN) / SLIDER_STEP) as u32;
        let marks = (0..=steps)
            .map(|i| {
                let value = SLIDER_MIN + SLIDER_STEP * i as f64;
                SliderMark {
                    value,
                    label: format!("{}", value as u64),
                }
            })
            .collect();

        Self {
            heading: HEADING.to_string(),
            site_dropdown: Dropdown {
                id: SITE_DROPDOWN_ID.to_string(),
                options,
                value: ALL_SITES.to_string(),
                placeholder: "Select a Launch Site here".to_string(),
                searchable: true,
            },
            payload_slider: RangeSlider {
                id: PAYLOAD_SLIDER_ID.to_string(),
                min: SLIDER_MIN,
                max: SLIDER_MAX,
                step: SLIDER_STEP,
                marks,
                value: PayloadRange::new(dataset.min_payload(), dataset.max_payload()),
            },
            pie_chart_id: PIE_CHART_ID.to_string(),
            scatter_chart_id: SCATTER_CHART_ID.to_string(),
        }
    }
}
