//! Preset composition for the rendering pipeline.
//!
//! A [`Preset`] is built from a two-section configuration: `gfm` and `embed`.
//! Each section is a three-state [`Toggle`]: enabled with defaults, disabled,
//! or enabled with partial overrides merged over the defaults. Composition
//! resolves both sections into an ordered stage list, with the GFM stage
//! always ahead of the embedding stage.
//!
//! # Examples
//!
//! ```
//! use richmark::{GfmOverrides, Preset, PresetOptions, Stage, Toggle};
//!
//! let preset = Preset::new(PresetOptions {
//!   gfm:   Toggle::Overrides(GfmOverrides {
//!     footnotes: Some(false),
//!     ..GfmOverrides::default()
//!   }),
//!   embed: Toggle::Disabled,
//! });
//!
//! assert_eq!(preset.stages().len(), 1);
//! assert!(matches!(preset.stages()[0], Stage::Gfm(_)));
//! ```

use std::time::Duration;

/// Default timeout for embed-stage requests.
pub const DEFAULT_FETCH_TIMEOUT: Duration = Duration::from_secs(10);

/// Default cap on redirects followed per embed-stage request.
pub const DEFAULT_MAX_REDIRECTS: usize = 10;

/// Default `User-Agent` header for embed-stage requests.
pub const DEFAULT_USER_AGENT: &str =
  concat!("richmark/", env!("CARGO_PKG_VERSION"));

/// Three-state switch for one configuration section.
///
/// The absent state enables the section with its documented defaults;
/// callers opt out with [`Toggle::Disabled`] or refine individual fields
/// with [`Toggle::Overrides`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Toggle<T> {
  /// Section enabled with its documented defaults.
  #[default]
  Defaults,
  /// Section contributes no stage at all.
  Disabled,
  /// Section enabled; present fields replace defaults, absent fields keep
  /// them, recursively.
  Overrides(T),
}

/// Caller-facing configuration: one toggle per pipeline section.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PresetOptions {
  /// GitHub Flavored Markdown syntax support.
  pub gfm: Toggle<GfmOverrides>,

  /// URL embedding post-processing.
  pub embed: Toggle<EmbedOverrides>,
}

/// Resolved options for the GFM stage. Every feature defaults to enabled.
#[derive(Debug, Clone, PartialEq, Eq)]
#[allow(
  clippy::struct_excessive_bools,
  reason = "Config struct with related boolean flags"
)]
pub struct GfmOptions {
  /// Linkify bare URLs and www-prefixed hosts in running text.
  pub autolinks: bool,

  /// Pipe tables.
  pub tables: bool,

  /// `~~strikethrough~~` spans.
  pub strikethrough: bool,

  /// `- [ ]` / `- [x]` task list items.
  pub tasklists: bool,

  /// `[^1]` footnote references and definitions.
  pub footnotes: bool,
}

impl GfmOptions {
  /// Resolve a partial override against the defaults. Fields the caller
  /// left unset keep their default value.
  #[must_use]
  pub fn merged(overrides: &GfmOverrides) -> Self {
    let defaults = Self::default();
    Self {
      autolinks:     overrides.autolinks.unwrap_or(defaults.autolinks),
      tables:        overrides.tables.unwrap_or(defaults.tables),
      strikethrough: overrides
        .strikethrough
        .unwrap_or(defaults.strikethrough),
      tasklists:     overrides.tasklists.unwrap_or(defaults.tasklists),
      footnotes:     overrides.footnotes.unwrap_or(defaults.footnotes),
    }
  }
}

impl Default for GfmOptions {
  fn default() -> Self {
    Self {
      autolinks:     true,
      tables:        true,
      strikethrough: true,
      tasklists:     true,
      footnotes:     true,
    }
  }
}

/// Partial overrides for [`GfmOptions`]. `None` keeps the default.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GfmOverrides {
  pub autolinks:     Option<bool>,
  pub tables:        Option<bool>,
  pub strikethrough: Option<bool>,
  pub tasklists:     Option<bool>,
  pub footnotes:     Option<bool>,
}

/// Embedding strategies, applied in order against each candidate link until
/// one produces replacement markup.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EmbedTransformer {
  /// oEmbed discovery: fetch the provider payload advertised by the page.
  OEmbed,
  /// Open Graph / HTML metadata scraped into a link card.
  LinkCard,
}

/// Resolved options for the embedding stage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmbedOptions {
  /// Transformers tried in order; the first to produce markup wins.
  pub transformers: Vec<EmbedTransformer>,

  /// HTTP behavior for page and provider fetches.
  pub fetch: FetchOptions,
}

impl EmbedOptions {
  /// Resolve a partial override against the defaults. The transformer list
  /// replaces wholesale when set; the fetch options merge field by field.
  #[must_use]
  pub fn merged(overrides: &EmbedOverrides) -> Self {
    let defaults = Self::default();
    Self {
      transformers: overrides
        .transformers
        .clone()
        .unwrap_or(defaults.transformers),
      fetch:        match &overrides.fetch {
        Some(fetch) => FetchOptions::merged(fetch),
        None => defaults.fetch,
      },
    }
  }
}

impl Default for EmbedOptions {
  fn default() -> Self {
    Self {
      transformers: vec![EmbedTransformer::OEmbed, EmbedTransformer::LinkCard],
      fetch:        FetchOptions::default(),
    }
  }
}

/// Partial overrides for [`EmbedOptions`]. `None` keeps the default.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EmbedOverrides {
  pub transformers: Option<Vec<EmbedTransformer>>,
  pub fetch:        Option<FetchOverrides>,
}

/// HTTP behavior for the embedding stage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchOptions {
  /// Per-request timeout.
  pub timeout: Duration,

  /// `User-Agent` header sent with every request.
  pub user_agent: String,

  /// Redirects followed before a request is abandoned.
  pub max_redirects: usize,
}

impl FetchOptions {
  /// Resolve a partial override against the defaults.
  #[must_use]
  pub fn merged(overrides: &FetchOverrides) -> Self {
    let defaults = Self::default();
    Self {
      timeout:       overrides.timeout.unwrap_or(defaults.timeout),
      user_agent:    overrides
        .user_agent
        .clone()
        .unwrap_or(defaults.user_agent),
      max_redirects: overrides
        .max_redirects
        .unwrap_or(defaults.max_redirects),
    }
  }
}

impl Default for FetchOptions {
  fn default() -> Self {
    Self {
      timeout:       DEFAULT_FETCH_TIMEOUT,
      user_agent:    DEFAULT_USER_AGENT.to_string(),
      max_redirects: DEFAULT_MAX_REDIRECTS,
    }
  }
}

/// Partial overrides for [`FetchOptions`]. `None` keeps the default.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FetchOverrides {
  pub timeout:       Option<Duration>,
  pub user_agent:    Option<String>,
  pub max_redirects: Option<usize>,
}

/// One resolved pipeline entry. The set of stages is closed: downstream
/// matches are exhaustive and a new stage kind is a compile-time event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Stage {
  /// GFM syntax support, folded into the renderer configuration.
  Gfm(GfmOptions),
  /// URL embedding, applied as an HTML post-pass.
  Embed(EmbedOptions),
}

/// An ordered, fully resolved stage list.
///
/// Composition is pure: the same [`PresetOptions`] always produce the same
/// stages, in the same order (GFM before embedding). Disabled sections
/// contribute nothing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Preset {
  stages: Vec<Stage>,
}

impl Preset {
  /// Resolve the configuration into the ordered stage list.
  #[must_use]
  pub fn new(options: PresetOptions) -> Self {
    let mut stages = Vec::with_capacity(2);

    match &options.gfm {
      Toggle::Defaults => stages.push(Stage::Gfm(GfmOptions::default())),
      Toggle::Overrides(overrides) => {
        stages.push(Stage::Gfm(GfmOptions::merged(overrides)));
      },
      Toggle::Disabled => {},
    }

    match &options.embed {
      Toggle::Defaults => stages.push(Stage::Embed(EmbedOptions::default())),
      Toggle::Overrides(overrides) => {
        stages.push(Stage::Embed(EmbedOptions::merged(overrides)));
      },
      Toggle::Disabled => {},
    }

    Self { stages }
  }

  /// Stages in composition order.
  #[must_use]
  pub fn stages(&self) -> &[Stage] {
    &self.stages
  }
}

impl Default for Preset {
  fn default() -> Self {
    Self::new(PresetOptions::default())
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_default_preset_has_both_stages_in_order() {
    let preset = Preset::default();
    let stages = preset.stages();

    assert_eq!(stages.len(), 2);
    assert_eq!(stages[0], Stage::Gfm(GfmOptions::default()));
    assert_eq!(stages[1], Stage::Embed(EmbedOptions::default()));
  }

  #[test]
  fn test_disabled_gfm_leaves_embed_untouched() {
    let preset = Preset::new(PresetOptions {
      gfm:   Toggle::Disabled,
      embed: Toggle::Defaults,
    });

    assert_eq!(preset.stages(), &[Stage::Embed(EmbedOptions::default())]);
  }

  #[test]
  fn test_disabled_embed_leaves_gfm_untouched() {
    let preset = Preset::new(PresetOptions {
      gfm:   Toggle::Defaults,
      embed: Toggle::Disabled,
    });

    assert_eq!(preset.stages(), &[Stage::Gfm(GfmOptions::default())]);
  }

  #[test]
  fn test_both_disabled_yields_empty_stage_list() {
    let preset = Preset::new(PresetOptions {
      gfm:   Toggle::Disabled,
      embed: Toggle::Disabled,
    });

    assert!(preset.stages().is_empty());
  }

  #[test]
  fn test_gfm_override_keeps_unset_fields_at_default() {
    let merged = GfmOptions::merged(&GfmOverrides {
      footnotes: Some(false),
      ..GfmOverrides::default()
    });

    assert!(!merged.footnotes);
    assert!(merged.autolinks);
    assert!(merged.tables);
    assert!(merged.strikethrough);
    assert!(merged.tasklists);
  }

  #[test]
  fn test_embed_override_merges_nested_fetch_fields() {
    let merged = EmbedOptions::merged(&EmbedOverrides {
      fetch: Some(FetchOverrides {
        timeout: Some(Duration::from_secs(3)),
        ..FetchOverrides::default()
      }),
      ..EmbedOverrides::default()
    });

    // The overridden leaf changes; its siblings fill from the defaults.
    assert_eq!(merged.fetch.timeout, Duration::from_secs(3));
    assert_eq!(merged.fetch.user_agent, DEFAULT_USER_AGENT);
    assert_eq!(merged.fetch.max_redirects, DEFAULT_MAX_REDIRECTS);
    assert_eq!(
      merged.transformers,
      vec![EmbedTransformer::OEmbed, EmbedTransformer::LinkCard]
    );
  }

  #[test]
  fn test_transformer_list_replaces_wholesale() {
    let merged = EmbedOptions::merged(&EmbedOverrides {
      transformers: Some(vec![EmbedTransformer::LinkCard]),
      ..EmbedOverrides::default()
    });

    assert_eq!(merged.transformers, vec![EmbedTransformer::LinkCard]);
    assert_eq!(merged.fetch, FetchOptions::default());
  }

  #[test]
  fn test_composition_is_deterministic() {
    let options = PresetOptions {
      gfm:   Toggle::Overrides(GfmOverrides {
        tables: Some(false),
        ..GfmOverrides::default()
      }),
      embed: Toggle::Defaults,
    };

    assert_eq!(Preset::new(options.clone()), Preset::new(options));
  }

  #[test]
  fn test_override_equals_defaults_when_empty() {
    let preset = Preset::new(PresetOptions {
      gfm:   Toggle::Overrides(GfmOverrides::default()),
      embed: Toggle::Overrides(EmbedOverrides::default()),
    });

    assert_eq!(preset, Preset::default());
  }
}
