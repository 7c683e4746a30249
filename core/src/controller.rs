// Reactive chart update controller
//
// Each chart output is bound to the control inputs it reads:
//
// | output  | inputs              |
// |---------|---------------------|
// | pie     | site                |
// | scatter | site, payload range |
//
// A change to an input recomputes exactly the outputs bound to it. Every
// recomputation starts from the full immutable dataset, so a chart is always a
// pure function of the current `(site, range)` state.
//
// `ChartController` is the synchronous state machine. `ControllerHandle`
// drives it from a single tokio task so events are processed one at a time in
// arrival order, and publishes every result on the `ChartBroadcaster`.

use crate::aggregate::OutcomeAggregate;
use crate::chart::{PieChart, ScatterChart};
use crate::dashboard::ChartBroadcaster;
use crate::dataset::Dataset;
use crate::filter::{filter_by_payload, filter_by_site, PayloadRange, SiteSelection};
use crate::{DashError, Result};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::sync::{mpsc, oneshot};
use tracing::{debug, info, warn};

const COMMAND_QUEUE_CAPACITY: usize = 64;

/// Control inputs exposed by the page
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ControlInput {
    Site,
    PayloadRange,
}

/// Chart outputs recomputed by the controller
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChartOutput {
    Pie,
    Scatter,
}

impl ChartOutput {
    pub const ALL: [ChartOutput; 2] = [ChartOutput::Pie, ChartOutput::Scatter];

    /// Inputs this output is bound to
    pub fn inputs(self) -> &'static [ControlInput] {
        match self {
            ChartOutput::Pie => &[ControlInput::Site],
            ChartOutput::Scatter => &[ControlInput::Site, ControlInput::PayloadRange],
        }
    }

    pub fn depends_on(self, input: ControlInput) -> bool {
        self.inputs().contains(&input)
    }
}

/// Current value of every control
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ControlState {
    pub site: SiteSelection,
    pub payload_range: PayloadRange,
}

impl ControlState {
    /// All sites, full observed payload range
    pub fn initial(dataset: &Dataset) -> Self {
        Self {
            site: SiteSelection::All,
            payload_range: PayloadRange::new(dataset.min_payload(), dataset.max_payload()),
        }
    }
}

/// A single UI interaction
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "input", content = "value", rename_all = "snake_case")]
pub enum ControlEvent {
    Site(SiteSelection),
    PayloadRange(PayloadRange),
}

impl ControlEvent {
    pub fn input(&self) -> ControlInput {
        match self {
            ControlEvent::Site(_) => ControlInput::Site,
            ControlEvent::PayloadRange(_) => ControlInput::PayloadRange,
        }
    }
}

/// Both charts for the current state
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartSnapshot {
    /// Sequence of the last processed event; 0 before any
    pub sequence: u64,
    pub state: ControlState,
    pub pie: PieChart,
    pub scatter: ScatterChart,
}

/// Result of one processed event. Outputs not bound to the changed input are `None`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartUpdate {
    pub sequence: u64,
    pub computed_at: String,
    pub state: ControlState,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub pie: Option<PieChart>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub scatter: Option<ScatterChart>,
}

impl ChartSnapshot {
    /// Both charts as an update, for clients that missed earlier updates
    pub fn into_update(self, computed_at: String) -> ChartUpdate {
        ChartUpdate {
            sequence: self.sequence,
            computed_at,
            state: self.state,
            pie: Some(self.pie),
            scatter: Some(self.scatter),
        }
    }
}

/// Pie chart for a site selection
pub fn pie_chart(dataset: &Dataset, selection: &SiteSelection) -> PieChart {
    PieChart::from_aggregate(&OutcomeAggregate::compute(dataset.records(), selection))
}

/// Scatter chart for a site selection within a payload range
pub fn scatter_chart(
    dataset: &Dataset,
    selection: &SiteSelection,
    range: PayloadRange,
) -> ScatterChart {
    let in_range = filter_by_payload(dataset.records(), range);
    let subset = filter_by_site(&in_range, selection);
    ScatterChart::from_records(selection, &subset)
}

/// Synchronous controller state machine
pub struct ChartController {
    dataset: Arc<Dataset>,
    state: ControlState,
    pie: PieChart,
    scatter: ScatterChart,
    sequence: u64,
}

impl ChartController {
    pub fn new(dataset: Arc<Dataset>) -> Self {
        let state = ControlState::initial(&dataset);
        let pie = pie_chart(&dataset, &state.site);
        let scatter = scatter_chart(&dataset, &state.site, state.payload_range);
        Self {
            dataset,
            state,
            pie,
            scatter,
            sequence: 0,
        }
    }

    pub fn dataset(&self) -> &Arc<Dataset> {
        &self.dataset
    }

    pub fn state(&self) -> &ControlState {
        &self.state
    }

    /// Number of events processed so far
    pub fn sequence(&self) -> u64 {
        self.sequence
    }

    pub fn charts(&self) -> ChartSnapshot {
        ChartSnapshot {
            sequence: self.sequence,
            state: self.state.clone(),
            pie: self.pie.clone(),
            scatter: self.scatter.clone(),
        }
    }

    /// Replace one input and recompute the outputs bound to it
    pub fn apply(&mut self, event: ControlEvent) -> ChartUpdate {
        let input = event.input();
        match event {
            ControlEvent::Site(site) => self.state.site = site,
            ControlEvent::PayloadRange(range) => {
                if range.is_inverted() {
                    warn!(target: "controller", low = range.low, high = range.high, "Inverted payload range");
                }
                self.state.payload_range = range;
            }
        }
        self.sequence += 1;

        let mut update = ChartUpdate {
            sequence: self.sequence,
            computed_at: chrono::Utc::now().to_rfc3339(),
            state: self.state.clone(),
            pie: None,
            scatter: None,
        };

        for output in ChartOutput::ALL {
            if !output.depends_on(input) {
                continue;
            }
            match output {
                ChartOutput::Pie => {
                    self.pie = pie_chart(&self.dataset, &self.state.site);
                    update.pie = Some(self.pie.clone());
                }
                ChartOutput::Scatter => {
                    self.scatter =
                        scatter_chart(&self.dataset, &self.state.site, self.state.payload_range);
                    update.scatter = Some(self.scatter.clone());
                }
            }
        }

        debug!(
            target: "controller",
            sequence = update.sequence,
            input = ?input,
            site = %self.state.site,
            low = self.state.payload_range.low,
            high = self.state.payload_range.high,
            pie_slices = self.pie.slices.len(),
            scatter_points = self.scatter.point_count(),
            "Charts recomputed"
        );
        update
    }
}

enum Command {
    Apply {
        event: ControlEvent,
        reply: oneshot::Sender<ChartUpdate>,
    },
    Snapshot {
        reply: oneshot::Sender<ChartSnapshot>,
    },
    Shutdown,
}

/// Cloneable handle to the controller task
#[derive(Clone)]
pub struct ControllerHandle {
    tx: mpsc::Sender<Command>,
}

impl ControllerHandle {
    /// Spawn the controller task. Must be called inside a tokio runtime.
    pub fn spawn(dataset: Arc<Dataset>, broadcaster: ChartBroadcaster) -> Self {
        let (tx, rx) = mpsc::channel(COMMAND_QUEUE_CAPACITY);
        let controller = ChartController::new(dataset);
        broadcaster.record_latest(
            controller
                .charts()
                .into_update(chrono::Utc::now().to_rfc3339()),
        );
        tokio::spawn(run_controller(controller, rx, broadcaster));
        info!(target: "controller", "Chart controller started");
        Self { tx }
    }

    /// Queue an event and wait for the charts it produced
    pub async fn send(&self, event: ControlEvent) -> Result<ChartUpdate> {
        let (reply, rx) = oneshot::channel();
        self.tx
            .send(Command::Apply { event, reply })
            .await
            .map_err(|_| DashError::ControllerClosed)?;
        rx.await.map_err(|_| DashError::ControllerClosed)
    }

    pub async fn set_site(&self, site: SiteSelection) -> Result<ChartUpdate> {
        self.send(ControlEvent::Site(site)).await
    }

    pub async fn set_payload_range(&self, range: PayloadRange) -> Result<ChartUpdate> {
        self.send(ControlEvent::PayloadRange(range)).await
    }

    pub async fn snapshot(&self) -> Result<ChartSnapshot> {
        let (reply, rx) = oneshot::channel();
        self.tx
            .send(Command::Snapshot { reply })
            .await
            .map_err(|_| DashError::ControllerClosed)?;
        rx.await.map_err(|_| DashError::ControllerClosed)
    }

    /// Stop the task; already stopped is fine
    pub async fn shutdown(&self) -> Result<()> {
        if self.tx.send(Command::Shutdown).await.is_err() {
            debug!(target: "controller", "Controller already stopped");
        }
        Ok(())
    }

    pub fn is_closed(&self) -> bool {
        self.tx.is_closed()
    }
}

async fn run_controller(
    mut controller: ChartController,
    mut rx: mpsc::Receiver<Command>,
    broadcaster: ChartBroadcaster,
) {
    while let Some(command) = rx.recv().await {
        match command {
            Command::Apply { event, reply } => {
                let update = controller.apply(event);
                // Full state goes in first so a lagged stream never resyncs to older charts
                broadcaster.record_latest(
                    controller
                        .charts()
                        .into_update(update.computed_at.clone()),
                );
                broadcaster.broadcast(update.clone());
                // Caller may have gone away; the broadcast already carried the result
                let _ = reply.send(update);
            }
            Command::Snapshot { reply } => {
                let _ = reply.send(controller.charts());
            }
            Command::Shutdown => break,
        }
    }
    info!(
        target: "controller",
        processed = controller.sequence(),
        "Chart controller stopped"
    );
}
