use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur while bootstrapping fixture servers.
///
/// Every variant is fatal to the bootstrap: a partially mounted fixture set
/// would let tests pass while silently missing routes.
#[derive(Debug, Error)]
pub enum FixtureError {
  /// A fixture file has an extension no response can be derived for.
  #[error("unsupported fixture extension `{extension}` in `{path}`")]
  UnsupportedExtension { extension: String, path: PathBuf },

  /// The fixture tree could not be walked.
  #[error("failed to walk fixture tree: {source}")]
  Walk {
    #[source]
    source: walkdir::Error,
  },

  /// A fixture file could not be read.
  #[error("failed to read fixture `{path}`: {source}")]
  ReadFixture {
    path:   PathBuf,
    #[source]
    source: std::io::Error,
  },

  /// A `.json` fixture does not parse, so it cannot be re-served as JSON.
  #[error("invalid JSON fixture `{path}`: {source}")]
  InvalidJson {
    path:   PathBuf,
    #[source]
    source: serde_json::Error,
  },
}
