//! HTTP fetching for the embedding stage.

use reqwest::redirect;
use url::Url;

use crate::{error::EmbedError, preset::FetchOptions};

/// A fetched page: final URL after redirects, declared content type, and
/// body text.
#[derive(Debug, Clone)]
pub(crate) struct Page {
  pub url:          Url,
  pub content_type: String,
  pub body:         String,
}

impl Page {
  /// Whether the server declared the body as HTML.
  pub(crate) fn is_html(&self) -> bool {
    self.content_type.starts_with("text/html")
  }
}

/// Thin wrapper over a configured [`reqwest::Client`]. One instance is
/// built per processor and reused for every embed fetch.
#[derive(Debug, Clone)]
pub(crate) struct Fetcher {
  client: reqwest::Client,
}

impl Fetcher {
  /// Build a client from the resolved fetch options.
  ///
  /// # Errors
  ///
  /// Returns [`EmbedError::Client`] if the underlying client rejects the
  /// configuration.
  pub(crate) fn new(options: &FetchOptions) -> Result<Self, EmbedError> {
    let client = reqwest::Client::builder()
      .timeout(options.timeout)
      .user_agent(options.user_agent.clone())
      .redirect(redirect::Policy::limited(options.max_redirects))
      .build()
      .map_err(|source| EmbedError::Client { source })?;

    Ok(Self { client })
  }

  /// Fetch `url` and return the page on a success status.
  ///
  /// # Errors
  ///
  /// Returns [`EmbedError::Request`] on transport failure and
  /// [`EmbedError::Status`] on a non-success response.
  pub(crate) async fn page(&self, url: &str) -> Result<Page, EmbedError> {
    let response =
      self.client.get(url).send().await.map_err(|source| {
        EmbedError::Request {
          url: url.to_string(),
          source,
        }
      })?;

    let status = response.status();
    if !status.is_success() {
      return Err(EmbedError::Status {
        url: url.to_string(),
        status,
      });
    }

    let final_url = response.url().clone();
    let content_type = response
      .headers()
      .get(reqwest::header::CONTENT_TYPE)
      .and_then(|value| value.to_str().ok())
      .unwrap_or_default()
      .to_string();

    let body = response.text().await.map_err(|source| {
      EmbedError::Request {
        url: url.to_string(),
        source,
      }
    })?;

    Ok(Page {
      url: final_url,
      content_type,
      body,
    })
  }
}
