pub mod aggregate;
pub mod error;
pub mod ingest;
pub mod pattern;
pub mod record;
pub mod stats;

pub use error::{Error, Result};
