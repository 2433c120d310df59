pub mod layer;
pub mod logline;

pub use layer::{JsonLogger, Logger, ResponseEvent, ResponseLogLayer, ResponseLogService};
pub use logline::json_log_message;
