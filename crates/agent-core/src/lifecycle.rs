mod monitor;
mod replay;
mod runtime;
mod tick;

pub use runtime::AgentRuntime;

const METRIC_BUFFER_CAP: usize = 4_096;
const METRIC_BATCH_SIZE: usize = 256;
