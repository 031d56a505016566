mod defaults;
mod env;
mod file;
mod load;
mod types;
mod util;
mod validate;

pub use types::AgentConfig;

#[cfg(test)]
use util::parse_bool;
