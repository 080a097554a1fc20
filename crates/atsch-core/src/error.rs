//! Pipeline error types.

use thiserror::Error;

/// Result type for pipeline operations.
pub type Result<T> = std::result::Result<T, PipelineError>;

/// Errors surfaced by the scheduling-decision pipeline.
///
/// Range violations (pivots or window indices outside the valid bounds) are
/// programming errors prevented by construction and panic instead; these
/// variants cover the operational failures an operator can hit with a bad
/// dataset or configuration. There is no retry semantics anywhere: training
/// and evaluation are offline, and any failure aborts the run.
#[derive(Error, Debug)]
pub enum PipelineError {
    /// A decision row blacklisted every channel. The simulator has no
    /// fallback schedule for an empty whitelist.
    #[error("decision row {row} has no available channel")]
    EmptyAvailability { row: usize },

    /// Weighted-mean reduction hit a (row, channel) cell with zero total
    /// attribution weight. A silent fallback would corrupt the learned
    /// policy, so this aborts the run.
    #[error("channel {channel} in decision row {row} received no slot attribution")]
    DegenerateAttribution { row: usize, channel: usize },

    /// Invalid pipeline configuration.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// A training iteration failed; carries enough context to reproduce.
    #[error("training iteration {iteration} (pivots {pivot_min}..={pivot_max}) failed: {source}")]
    Iteration {
        iteration: usize,
        pivot_min: usize,
        pivot_max: usize,
        #[source]
        source: Box<PipelineError>,
    },
}
