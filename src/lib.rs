pub mod error;
pub mod harness;
pub mod report;
pub mod schema;
pub mod suite;
pub mod targets;

pub use error::{Error, Result};
pub use harness::{measure_binary, measure_unary};
