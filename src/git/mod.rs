pub mod error_handling;
pub mod log_parser;
pub mod refs;
pub mod source;

pub use error_handling::*;
pub use log_parser::{log_format, LogParser, ParsedLog, DEFAULT_DELIMITER};
pub use refs::{parse_ref_names, DEFAULT_REMOTES};
pub use source::{FileLog, LogSource, StaticLog, StdinLog};
