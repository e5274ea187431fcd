//! # richmark - rich Markdown rendering
//!
//! A configurable Markdown pipeline: GitHub Flavored Markdown rendering with
//! a URL-embedding post-pass that turns bare links into embedded content
//! (provider oEmbed markup or scraped link cards).
//!
//! ## Quick Start
//!
//! ```rust
//! use richmark::{Preset, PresetOptions, Stage};
//!
//! let preset = Preset::new(PresetOptions::default());
//!
//! // GFM first, embedding second; both on documented defaults.
//! assert_eq!(preset.stages().len(), 2);
//! assert!(matches!(preset.stages()[0], Stage::Gfm(_)));
//! ```
//!
//! Rendering is asynchronous because the embedding stage fetches candidate
//! pages:
//!
//! ```rust,no_run
//! use richmark::{Preset, Processor};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), richmark::EmbedError> {
//!   let processor = Processor::new(Preset::default())?;
//!   let html = processor
//!     .render("# Post\n\nhttps://example.com/article\n")
//!     .await;
//!
//!   println!("{html}");
//!   Ok(())
//! }
//! ```
//!
//! ## Features
//!
//! - **Preset composition** with per-section disable and deep-merged partial
//!   overrides (`gfm`, `embed`)
//! - **GFM support** via `comrak`: autolinks, tables, strikethrough, task
//!   lists, footnotes
//! - **URL embedding** with oEmbed discovery and link-card fallback, tried
//!   in configurable order
//! - **Graceful degradation**: a failed embed logs a warning and leaves the
//!   plain link in place
//!
//! ## Configuration
//!
//! ```rust
//! use richmark::{GfmOverrides, Preset, PresetOptions, Toggle};
//!
//! let preset = Preset::new(PresetOptions {
//!   // Keep GFM but turn footnotes off; everything else stays default.
//!   gfm:   Toggle::Overrides(GfmOverrides {
//!     footnotes: Some(false),
//!     ..GfmOverrides::default()
//!   }),
//!   // Render without any network access.
//!   embed: Toggle::Disabled,
//! });
//!
//! assert_eq!(preset.stages().len(), 1);
//! ```

mod error;
mod fetch;
pub mod fragment;
pub mod preset;
pub mod processor;

pub use crate::{
  error::EmbedError,
  preset::{
    EmbedOptions,
    EmbedOverrides,
    EmbedTransformer,
    FetchOptions,
    FetchOverrides,
    GfmOptions,
    GfmOverrides,
    Preset,
    PresetOptions,
    Stage,
    Toggle,
  },
  processor::Processor,
};
