//! Markdown rendering driven by a composed preset.
//!
//! The processor consumes the stage list produced by
//! [`Preset::new`](crate::Preset::new) in order: the GFM stage is folded
//! into the CommonMark renderer configuration, the embedding stage runs as
//! an HTML post-pass over the rendered document.
//!
//! # Architecture
//!
//! - [`core`]: the [`Processor`] itself and the rendering pipeline
//! - `embed`: candidate detection, transformers, and fragment splicing for
//!   the embedding stage

pub mod core;
mod embed;

pub use self::core::Processor;
