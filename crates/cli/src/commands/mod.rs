//! CLI command implementations

mod bench;
mod search;
mod stream;
mod validate;

pub use bench::cmd_bench;
pub use search::cmd_search;
pub use stream::{cmd_stats, cmd_stream};
pub use validate::cmd_validate;
