// Outcome aggregation
//
// Two modes, picked by the site selection:
// - all sites: literal sum of the outcome class per site (successful launches, not a rate)
// - one site: record count per outcome class

use crate::dataset::{LaunchRecord, OutcomeClass};
use crate::filter::{filter_by_site, SiteSelection};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SiteTotal {
    pub site: String,
    pub successes: u64,
}

/// Per-site sum of `class`, in first-seen site order
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SiteSuccessTotals {
    entries: Vec<SiteTotal>,
}

impl SiteSuccessTotals {
    pub fn entries(&self) -> &[SiteTotal] {
        &self.entries
    }

    pub fn get(&self, site: &str) -> Option<u64> {
        self.entries
            .iter()
            .find(|e| e.site == site)
            .map(|e| e.successes)
    }

    pub fn total(&self) -> u64 {
        self.entries.iter().map(|e| e.successes).sum()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Record count per outcome class within one site
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutcomeCounts {
    pub success: u64,
    pub failure: u64,
}

impl OutcomeCounts {
    /// `None` when the class has no rows
    pub fn get(&self, class: OutcomeClass) -> Option<u64> {
        let n = match class {
            OutcomeClass::Success => self.success,
            OutcomeClass::Failure => self.failure,
        };
        (n > 0).then_some(n)
    }

    /// Present classes only, largest count first; ties put success first
    pub fn entries(&self) -> Vec<(OutcomeClass, u64)> {
        let mut out: Vec<(OutcomeClass, u64)> = [
            (OutcomeClass::Success, self.success),
            (OutcomeClass::Failure, self.failure),
        ]
        .into_iter()
        .filter(|(_, n)| *n > 0)
        .collect();
        // stable sort keeps success ahead on ties
        out.sort_by(|a, b| b.1.cmp(&a.1));
        out
    }

    pub fn total(&self) -> u64 {
        self.success + self.failure
    }

    pub fn is_empty(&self) -> bool {
        self.total() == 0
    }
}

/// Group by launch site and sum the outcome class
pub fn aggregate_by_site(records: &[LaunchRecord]) -> SiteSuccessTotals {
    let mut entries: Vec<SiteTotal> = Vec::new();
    for record in records {
        let add = u64::from(record.outcome.as_u8());
        match entries.iter_mut().find(|e| e.site == record.launch_site) {
            Some(entry) => entry.successes += add,
            None => entries.push(SiteTotal {
                site: record.launch_site.clone(),
                successes: add,
            }),
        }
    }
    SiteSuccessTotals { entries }
}

/// Group by outcome class and count rows
pub fn aggregate_by_outcome(records: &[LaunchRecord]) -> OutcomeCounts {
    records
        .iter()
        .fold(OutcomeCounts::default(), |mut counts, record| {
            match record.outcome {
                OutcomeClass::Success => counts.success += 1,
                OutcomeClass::Failure => counts.failure += 1,
            }
            counts
        })
}

/// Aggregate in the mode implied by the selection
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum OutcomeAggregate {
    AllSites(SiteSuccessTotals),
    SingleSite { site: String, counts: OutcomeCounts },
}

impl OutcomeAggregate {
    pub fn compute(records: &[LaunchRecord], selection: &SiteSelection) -> Self {
        match selection {
            SiteSelection::All => OutcomeAggregate::AllSites(aggregate_by_site(records)),
            SiteSelection::Site(site) => {
                let subset = filter_by_site(records, selection);
                OutcomeAggregate::SingleSite {
                    site: site.clone(),
                    counts: aggregate_by_outcome(&subset),
                }
            }
        }
    }
}
