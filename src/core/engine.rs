use crate::core::coordinator::{RefreshOutcome, RefreshTicket, ViewCoordinator};
use crate::domain::model::RawTable;
use crate::domain::ports::{MapView, Presenter, RowSource};
use crate::domain::view::UiEvent;
use crate::utils::error::Result;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::task::JoinSet;
use tokio::time::MissedTickBehavior;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunStats {
    pub applied: usize,
    pub failed: usize,
    pub stale: usize,
    /// Ticks that found the previous fetch still running.
    pub skipped: usize,
    pub events: usize,
}

impl RunStats {
    fn record(&mut self, outcome: &RefreshOutcome) {
        match outcome {
            RefreshOutcome::Applied { .. } => self.applied += 1,
            RefreshOutcome::Failed { .. } => self.failed += 1,
            RefreshOutcome::Stale { .. } => self.stale += 1,
        }
    }
}

/// Drives a coordinator from one event loop: periodic fetches, user events
/// and shutdown. The coordinator is only ever touched from this loop.
pub struct MapEngine<M: MapView, P: Presenter> {
    source: Arc<dyn RowSource>,
    coordinator: ViewCoordinator<M, P>,
    refresh_interval: Duration,
}

impl<M: MapView, P: Presenter> MapEngine<M, P> {
    pub fn new(
        source: Arc<dyn RowSource>,
        coordinator: ViewCoordinator<M, P>,
        refresh_interval: Duration,
    ) -> Self {
        Self {
            source,
            coordinator,
            refresh_interval,
        }
    }

    pub async fn refresh_once(&mut self) -> RefreshOutcome {
        let ticket = self.coordinator.begin_refresh();
        let result = fetch(self.source.as_ref(), ticket).await;
        self.coordinator.complete_refresh(ticket, result)
    }

    /// Runs until `shutdown` resolves. At most one fetch is in flight: a tick
    /// that finds the previous fetch still running is skipped, so a source
    /// slower than the refresh interval still gets its response applied.
    pub async fn run<F>(&mut self, mut events: mpsc::Receiver<UiEvent>, shutdown: F) -> RunStats
    where
        F: Future<Output = ()>,
    {
        let mut stats = RunStats::default();
        let mut ticker = tokio::time::interval(self.refresh_interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        let mut in_flight: JoinSet<(RefreshTicket, Result<RawTable>)> = JoinSet::new();
        let mut events_open = true;
        tokio::pin!(shutdown);

        tracing::info!(
            "Refreshing from {} every {:?}",
            self.source.describe(),
            self.refresh_interval
        );

        loop {
            tokio::select! {
                _ = &mut shutdown => {
                    tracing::info!("Shutting down");
                    break;
                }
                _ = ticker.tick() => {
                    if !in_flight.is_empty() {
                        tracing::debug!("Previous refresh still running, skipping tick");
                        stats.skipped += 1;
                        continue;
                    }
                    let ticket = self.coordinator.begin_refresh();
                    let source = Arc::clone(&self.source);
                    in_flight.spawn(async move {
                        let result = fetch(source.as_ref(), ticket).await;
                        (ticket, result)
                    });
                }
                Some(joined) = in_flight.join_next() => match joined {
                    Ok((ticket, result)) => {
                        let outcome = self.coordinator.complete_refresh(ticket, result);
                        stats.record(&outcome);
                    }
                    Err(e) => tracing::error!("Refresh task failed: {}", e),
                },
                event = events.recv(), if events_open => match event {
                    Some(event) => {
                        stats.events += 1;
                        self.coordinator.handle(event);
                    }
                    None => {
                        tracing::debug!("Event channel closed, refreshing only");
                        events_open = false;
                    }
                },
            }
        }

        in_flight.abort_all();
        stats
    }

    pub fn coordinator(&self) -> &ViewCoordinator<M, P> {
        &self.coordinator
    }

    pub fn into_coordinator(self) -> ViewCoordinator<M, P> {
        self.coordinator
    }
}

async fn fetch(source: &dyn RowSource, ticket: RefreshTicket) -> Result<RawTable> {
    tracing::debug!("Refresh #{}: fetching {}", ticket.sequence(), source.describe());
    source.fetch().await
}
