//! Core implementation of the rendering pipeline.
//!
//! This module contains [`Processor`] and the main rendering path:
//! CommonMark conversion through comrak with GFM toggles applied, followed
//! by the embedding post-pass for presets that enable it.

use comrak::{Arena, options::Options, parse_document};
use log::debug;

use super::embed;
use crate::{
  error::EmbedError,
  fetch::Fetcher,
  preset::{EmbedOptions, GfmOptions, Preset, Stage},
};

/// Markdown renderer for a composed [`Preset`].
///
/// Can be cheaply cloned; the embed HTTP client is reference-counted
/// internally.
#[derive(Debug, Clone)]
pub struct Processor {
  preset:  Preset,
  fetcher: Option<Fetcher>,
}

impl Processor {
  /// Create a processor for the given preset.
  ///
  /// The embed HTTP client is built up front so configuration problems
  /// surface here rather than midway through a render.
  ///
  /// # Errors
  ///
  /// Returns [`EmbedError::Client`] if the preset enables embedding and
  /// the client cannot be constructed from its fetch options.
  pub fn new(preset: Preset) -> Result<Self, EmbedError> {
    let fetcher = match embed_options(&preset) {
      Some(options) => Some(Fetcher::new(&options.fetch)?),
      None => None,
    };

    Ok(Self { preset, fetcher })
  }

  /// The preset this processor was built from.
  #[must_use]
  pub const fn preset(&self) -> &Preset {
    &self.preset
  }

  /// Render Markdown to fragment HTML, applying stages in preset order.
  ///
  /// Rendering is infallible: embedding failures are logged and degrade to
  /// the plain link, never to an error.
  pub async fn render(&self, markdown: &str) -> String {
    let mut html = self.render_commonmark(markdown);

    for stage in self.preset.stages() {
      match stage {
        // Already folded into the renderer configuration.
        Stage::Gfm(_) => {},
        Stage::Embed(options) => {
          if let Some(fetcher) = self.fetcher.as_ref() {
            html = embed::apply(fetcher, options, &html).await;
          }
        },
      }
    }

    html
  }

  /// Convert Markdown to HTML using comrak and the configured options.
  fn render_commonmark(&self, markdown: &str) -> String {
    let arena = Arena::new();
    let options = self.comrak_options();
    let root = parse_document(&arena, markdown, &options);

    let mut html = String::new();
    comrak::format_html(root, &options, &mut html).unwrap_or_default();

    debug!("rendered {} bytes of markdown", markdown.len());
    html
  }

  /// Build comrak options from the preset's GFM stage, if any.
  fn comrak_options(&self) -> Options<'_> {
    let mut options = Options::default();

    if let Some(gfm) = gfm_options(&self.preset) {
      options.extension.autolink = gfm.autolinks;
      options.extension.table = gfm.tables;
      options.extension.strikethrough = gfm.strikethrough;
      options.extension.tasklist = gfm.tasklists;
      options.extension.footnotes = gfm.footnotes;
    }

    options.render.r#unsafe = true;
    options
  }
}

/// The GFM stage's options, if the preset carries one.
fn gfm_options(preset: &Preset) -> Option<&GfmOptions> {
  preset.stages().iter().find_map(|stage| {
    match stage {
      Stage::Gfm(options) => Some(options),
      Stage::Embed(_) => None,
    }
  })
}

/// The embedding stage's options, if the preset carries one.
fn embed_options(preset: &Preset) -> Option<&EmbedOptions> {
  preset.stages().iter().find_map(|stage| {
    match stage {
      Stage::Embed(options) => Some(options),
      Stage::Gfm(_) => None,
    }
  })
}

#[cfg(test)]
mod tests {
  #![allow(clippy::unwrap_used, reason = "Fine in tests")]

  use super::*;
  use crate::preset::{PresetOptions, Toggle};

  fn gfm_only() -> Preset {
    Preset::new(PresetOptions {
      gfm:   Toggle::Defaults,
      embed: Toggle::Disabled,
    })
  }

  #[test]
  fn test_processor_without_embed_builds_no_client() {
    let processor = Processor::new(gfm_only()).unwrap();
    assert!(processor.fetcher.is_none());
  }

  #[test]
  fn test_processor_with_embed_builds_client() {
    let processor = Processor::new(Preset::default()).unwrap();
    assert!(processor.fetcher.is_some());
  }

  #[test]
  fn test_commonmark_rendering_is_synchronous_core() {
    let processor = Processor::new(gfm_only()).unwrap();
    let html = processor.render_commonmark("# Hello\n\nSome *emphasis*.");

    assert!(html.contains("<h1>"));
    assert!(html.contains("<em>emphasis</em>"));
  }

  #[test]
  fn test_disabled_gfm_features_stay_off() {
    let preset = Preset::new(PresetOptions {
      gfm:   Toggle::Disabled,
      embed: Toggle::Disabled,
    });
    let processor = Processor::new(preset).unwrap();
    let html = processor.render_commonmark("~~gone~~ and https://example.com");

    assert!(!html.contains("<del>"));
    assert!(!html.contains("<a href"));
  }

  #[test]
  fn test_render_future_is_send() {
    fn assert_send<T: Send>(_: T) {}

    let processor = Processor::new(Preset::default()).unwrap();
    assert_send(processor.render("https://example.com"));
  }
}
