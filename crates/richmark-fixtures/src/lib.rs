//! Fixture-backed mock HTTP servers for embedding tests.
//!
//! [`FixtureServer::start`] walks a fixture tree and derives one GET route
//! per file, grouped into one mock server per authority (the first path
//! segment under the fixture root). Route derivation strips a trailing
//! `index.html` entirely and a `.html` suffix otherwise, so fixture trees
//! read like the sites they stand in for:
//!
//! ```text
//! fixtures/web/
//!   example.com/
//!     index.html        -> GET /            text/html
//!     docs/page.html    -> GET /docs/page   text/html
//!     data.json         -> GET /data.json   application/json
//!   cdn.example.com/
//!     logo.png          -> GET /logo.png    image/png
//! ```
//!
//! The servers are strict: every one of them carries a guard that expects
//! zero unmatched requests, and expectations are verified when the
//! [`FixtureServer`] is dropped. A test that touches a URL it never laid
//! out as a fixture fails.
//!
//! File contents are read once at setup; [`FixtureServer::reset`] re-mounts
//! from the immutable route table without touching the filesystem again.

use std::{collections::HashMap, path::Path};

use log::debug;
use walkdir::WalkDir;
use wiremock::{
  Mock,
  MockServer,
  ResponseTemplate,
  matchers::{any, method, path},
};

mod error;
mod route;

pub use error::FixtureError;
pub use route::FixtureRoute;

/// Priority for the strict unmatched-request guards. Real routes keep the
/// wiremock default (5), so the guard only sees requests no route matched.
const GUARD_PRIORITY: u8 = 250;

/// A set of per-authority mock servers derived from a fixture tree.
pub struct FixtureServer {
  servers: HashMap<String, MockServer>,
  routes:  Vec<FixtureRoute>,
}

impl FixtureServer {
  /// Walk `root`, derive the route table, and start one strict mock server
  /// per authority.
  ///
  /// # Errors
  ///
  /// Fails on the first unreadable file, unwalkable directory, invalid
  /// `.json` fixture, or unsupported extension; nothing stays half
  /// mounted.
  pub async fn start(root: impl AsRef<Path>) -> Result<Self, FixtureError> {
    let routes = collect_routes(root.as_ref()).await?;

    let mut servers = HashMap::new();
    for fixture_route in &routes {
      if !servers.contains_key(fixture_route.authority.as_str()) {
        servers
          .insert(fixture_route.authority.clone(), MockServer::start().await);
      }
    }

    let fixture = Self { servers, routes };
    fixture.mount_all().await;

    Ok(fixture)
  }

  /// Absolute URL for `path` on the server registered for `authority`, or
  /// `None` when no fixture file created that authority.
  #[must_use]
  pub fn url(&self, authority: &str, path: &str) -> Option<String> {
    let server = self.servers.get(authority)?;
    Some(format!("{}{path}", server.uri()))
  }

  /// Direct access to the mock server behind `authority`, for mounting
  /// per-test mocks. [`FixtureServer::reset`] drops anything added this
  /// way.
  #[must_use]
  pub fn server(&self, authority: &str) -> Option<&MockServer> {
    self.servers.get(authority)
  }

  /// Authorities derived from the fixture tree, in no particular order.
  pub fn authorities(&self) -> impl Iterator<Item = &str> {
    self.servers.keys().map(String::as_str)
  }

  /// The immutable route table, in walk order.
  #[must_use]
  pub fn routes(&self) -> &[FixtureRoute] {
    &self.routes
  }

  /// Drop per-test mocks and recorded requests, then re-mount the route
  /// table and strict guards.
  pub async fn reset(&self) {
    for server in self.servers.values() {
      server.reset().await;
    }

    self.mount_all().await;
  }

  /// Assert every server's expectations now rather than at drop time.
  pub async fn verify(&self) {
    for server in self.servers.values() {
      server.verify().await;
    }
  }

  async fn mount_all(&self) {
    for fixture_route in &self.routes {
      let Some(server) = self.servers.get(&fixture_route.authority) else {
        continue;
      };

      Mock::given(method("GET"))
        .and(path(&fixture_route.url_path))
        .respond_with(fixture_route.template.clone())
        .named(format!(
          "GET {}{}",
          fixture_route.authority, fixture_route.url_path
        ))
        .mount(server)
        .await;
    }

    for (authority, server) in &self.servers {
      Mock::given(any())
        .respond_with(
          ResponseTemplate::new(404).set_body_string("no fixture route matched"),
        )
        .expect(0)
        .with_priority(GUARD_PRIORITY)
        .named(format!("strict guard for {authority}"))
        .mount(server)
        .await;
    }
  }
}

async fn collect_routes(root: &Path) -> Result<Vec<FixtureRoute>, FixtureError> {
  let mut routes = Vec::new();

  for entry in WalkDir::new(root).follow_links(true).sort_by_file_name() {
    let entry = entry.map_err(|source| FixtureError::Walk { source })?;
    if !entry.file_type().is_file() {
      continue;
    }

    let source = entry.path();
    let relative = source.strip_prefix(root).unwrap_or(source);
    let (authority, url_path) = route::derive_target(relative);
    let template = route::response_for(source).await?;

    debug!("fixture route: {authority}{url_path} from {}", source.display());

    routes.push(FixtureRoute {
      authority,
      url_path,
      template,
      source: source.to_path_buf(),
    });
  }

  Ok(routes)
}
