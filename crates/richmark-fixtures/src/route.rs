//! Route derivation from fixture files.

use std::path::{Path, PathBuf};

use wiremock::ResponseTemplate;

use crate::error::FixtureError;

/// One derived route: which authority serves it, under which path, with
/// which canned response.
pub struct FixtureRoute {
  pub(crate) authority: String,
  pub(crate) url_path:  String,
  pub(crate) template:  ResponseTemplate,
  pub(crate) source:    PathBuf,
}

impl FixtureRoute {
  /// The authority (first fixture path segment) serving this route.
  #[must_use]
  pub fn authority(&self) -> &str {
    &self.authority
  }

  /// The URL path this route matches.
  #[must_use]
  pub fn url_path(&self) -> &str {
    &self.url_path
  }

  /// The fixture file this route was derived from.
  #[must_use]
  pub fn source(&self) -> &Path {
    &self.source
  }
}

/// Derive `(authority, url path)` from a fixture path relative to the
/// fixture root.
///
/// The first segment is the authority. In the remainder, a trailing
/// `index.html` is stripped entirely (keeping the directory slash) and a
/// trailing `.html` suffix is stripped otherwise; other extensions stay in
/// the path. The result is prefixed with `/`.
pub(crate) fn derive_target(relative: &Path) -> (String, String) {
  let mut segments = relative.iter().map(|part| part.to_string_lossy());
  let authority = segments.next().unwrap_or_default().into_owned();
  let rest = segments.collect::<Vec<_>>().join("/");

  let trimmed = rest
    .strip_suffix("index.html")
    .or_else(|| rest.strip_suffix(".html"))
    .unwrap_or(&rest);

  (authority, format!("/{trimmed}"))
}

/// Build the canned response for a fixture file.
///
/// Content type follows the extension, matched case-sensitively:
/// `html` is served as `text/html`, `xml` as `text/xml`, `json` is parsed
/// and re-serialized as `application/json`, and `png`/`jpeg` are raw bytes
/// under `image/<extension>`.
///
/// # Errors
///
/// Any other extension (including none) returns
/// [`FixtureError::UnsupportedExtension`]; unreadable files and invalid
/// JSON are fatal as well.
pub(crate) async fn response_for(
  path: &Path,
) -> Result<ResponseTemplate, FixtureError> {
  let extension = path
    .extension()
    .map(|ext| ext.to_string_lossy().into_owned())
    .unwrap_or_default();

  match extension.as_str() {
    "html" => text_response(path, "text/html").await,
    "xml" => text_response(path, "text/xml").await,
    "json" => {
      let content = read_text(path).await?;
      let value: serde_json::Value =
        serde_json::from_str(&content).map_err(|source| {
          FixtureError::InvalidJson {
            path: path.to_path_buf(),
            source,
          }
        })?;

      Ok(ResponseTemplate::new(200).set_body_json(value))
    },
    "png" | "jpeg" => {
      let bytes = tokio::fs::read(path).await.map_err(|source| {
        FixtureError::ReadFixture {
          path: path.to_path_buf(),
          source,
        }
      })?;

      Ok(ResponseTemplate::new(200).set_body_raw(bytes, &format!("image/{extension}")))
    },
    _ => {
      Err(FixtureError::UnsupportedExtension {
        extension,
        path: path.to_path_buf(),
      })
    },
  }
}

async fn text_response(
  path: &Path,
  content_type: &str,
) -> Result<ResponseTemplate, FixtureError> {
  let content = read_text(path).await?;
  Ok(ResponseTemplate::new(200).set_body_raw(content.into_bytes(), content_type))
}

async fn read_text(path: &Path) -> Result<String, FixtureError> {
  tokio::fs::read_to_string(path).await.map_err(|source| {
    FixtureError::ReadFixture {
      path: path.to_path_buf(),
      source,
    }
  })
}
