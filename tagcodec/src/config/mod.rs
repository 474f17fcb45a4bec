//! Options that control how tagcodec reads and writes
//!
//! Every public operation takes its options explicitly. There is no process-wide state.

mod parse_options;
mod write_options;

pub use parse_options::{ParseOptions, ParsingMode};
pub use write_options::WriteOptions;
