//! Metric export for the flood watch agent: bounded buffering, line
//! protocol encoding and HTTP delivery.

mod buffer;
mod line_protocol;
mod point;
mod writer;

pub use buffer::MetricBuffer;
pub use line_protocol::encode_line_protocol;
pub use point::MetricPoint;
pub use writer::{ExportError, HttpWriter};
