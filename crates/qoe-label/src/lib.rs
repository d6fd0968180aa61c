//! QoE labeling rules.
//!
//! Converts a raw measurement (round-trip latency in milliseconds, or a
//! 1–5 self-reported satisfaction score) into one of three ordinal
//! [`QoeClass`] levels, and tallies label distributions.

mod class;
mod error;
mod rank;
mod tally;

pub use class::QoeClass;
pub use error::LabelError;
pub use rank::{rank_latency, rank_survey, LatencyThresholds};
pub use tally::ClassTally;
