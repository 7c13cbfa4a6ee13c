//! Event sink trait for streaming cost events out of a run.

use crate::{AffectedCostEvent, CausedCostEvent, CostTotals};

/// Callbacks invoked by [`emit_events`](crate::emit_events) as each event is
/// produced.
///
/// All methods have default no-op implementations so implementors only need
/// to override what they care about.  Sinks see every event regardless of
/// `collect_events`.
///
/// # Example: count caused events
///
/// ```rust
/// use nd_damage::{CausedCostEvent, EventSink};
///
/// #[derive(Default)]
/// struct Counter { caused: usize }
///
/// impl EventSink for Counter {
///     fn on_caused(&mut self, _event: &CausedCostEvent) {
///         self.caused += 1;
///     }
/// }
/// ```
pub trait EventSink {
    /// Called once per vehicle per link entry interval.
    fn on_caused(&mut self, _event: &CausedCostEvent) {}

    /// Called once per non-zero activity occupancy.
    fn on_affected(&mut self, _event: &AffectedCostEvent) {}

    /// Called after the last event with the final totals.
    fn on_run_end(&mut self, _totals: &CostTotals) {}
}

/// An [`EventSink`] that does nothing.
pub struct NoopSink;

impl EventSink for NoopSink {}
