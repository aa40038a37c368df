pub mod classify;
pub mod error;
pub mod log_file;
pub mod segment;

pub use classify::{ERROR_MARKER, classify, extract, has_error_marker};
pub use error::{IngestError, Result};
pub use log_file::{DEFAULT_LOG_FILE_NAME, read_log_file, resolve_log_path};
pub use segment::segment;
