//! # Slashing Metrics
//!
//! Prometheus metrics for validator liveness and punishment.
//!
//! ## Usage
//!
//! Enable with the `metrics` feature:
//! ```toml
//! qc-18-slashing = { path = "...", features = ["metrics"] }
//! ```
//!
//! ## Metrics Exported
//!
//! - `slashing_blocks_processed_total` - Counter of processed blocks
//! - `slashing_events_total` - Counter of emitted events, labeled by
//!   `SlashingEvent::kind` (`absent`, `downtime_slashed`, `double_sign_ignored`, ...)

#[cfg(feature = "metrics")]
use lazy_static::lazy_static;

#[cfg(feature = "metrics")]
use prometheus::{register_int_counter, register_int_counter_vec, IntCounter, IntCounterVec};

#[cfg(feature = "metrics")]
lazy_static! {
    /// Total blocks processed
    pub static ref BLOCKS_PROCESSED: IntCounter = register_int_counter!(
        "slashing_blocks_processed_total",
        "Total number of blocks processed by the slashing subsystem"
    )
    .expect("Failed to create BLOCKS_PROCESSED metric");

    /// Total events, labeled by kind
    pub static ref EVENTS: IntCounterVec = register_int_counter_vec!(
        "slashing_events_total",
        "Total number of slashing events emitted",
        &["kind"]
    )
    .expect("Failed to create EVENTS metric");
}

// =============================================================================
// METRIC RECORDING FUNCTIONS
// =============================================================================

#[cfg(feature = "metrics")]
pub fn record_block_processed() {
    BLOCKS_PROCESSED.inc();
}

/// Record one emitted event by its kind label
#[cfg(feature = "metrics")]
pub fn record_event(kind: &str) {
    EVENTS.with_label_values(&[kind]).inc();
}

// =============================================================================
// NO-OP IMPLEMENTATIONS (when metrics feature disabled)
// =============================================================================

#[cfg(not(feature = "metrics"))]
pub fn record_block_processed() {}

#[cfg(not(feature = "metrics"))]
pub fn record_event(_kind: &str) {}
