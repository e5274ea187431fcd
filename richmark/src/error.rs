use thiserror::Error;

/// Errors raised while setting up or running the embedding stage.
///
/// Only [`Processor::new`](crate::Processor::new) surfaces these to callers;
/// during rendering they are logged and the affected paragraph is left
/// untouched.
#[derive(Debug, Error)]
pub enum EmbedError {
  /// The HTTP client could not be constructed from the fetch options.
  #[error("failed to build embed HTTP client: {source}")]
  Client {
    #[source]
    source: reqwest::Error,
  },

  /// A request failed before producing a response.
  #[error("request to `{url}` failed: {source}")]
  Request {
    url:    String,
    #[source]
    source: reqwest::Error,
  },

  /// The server answered with a non-success status.
  #[error("request to `{url}` returned status {status}")]
  Status {
    url:    String,
    status: reqwest::StatusCode,
  },

  /// An oEmbed provider answered with a payload that does not deserialize.
  #[error("invalid oEmbed payload from `{url}`: {source}")]
  OEmbedPayload {
    url:    String,
    #[source]
    source: serde_json::Error,
  },

  /// A discovered oEmbed endpoint `href` could not be resolved against the
  /// page it was found on.
  #[error("cannot resolve oEmbed endpoint `{href}` against `{base}`: {source}")]
  EndpointUrl {
    href:   String,
    base:   String,
    #[source]
    source: url::ParseError,
  },
}
