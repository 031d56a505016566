//! Traffic counter plumbing for the flood detectors: per-interval
//! counters shared with capture callbacks, adapters turning counts into
//! detector samples, and a recorded-trace reader for offline analysis.

mod adapters;
mod counters;
mod trace;

pub use adapters::{syn_asymmetry, UdpDeviation};
pub use counters::{IntervalCounters, SharedCounters};
pub use trace::{TraceError, TraceReader, TraceRecord};
