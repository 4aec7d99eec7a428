use std::io;
use std::path::PathBuf;

use thiserror::Error;

use crate::harness::HarnessError;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    #[error("benchmark `{target}` failed: {source}")]
    Harness {
        target: &'static str,
        #[source]
        source: HarnessError,
    },

    #[error("could not open/create output file {}: {source}", path.display())]
    Output {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to serialize report: {0}")]
    Serialize(#[from] serde_json::Error),
}
