//! # veritas-inference: Generation Boundary
//!
//! The coordinator treats answer generation as an opaque capability: a
//! prompt goes in, text comes out, or a [`GenerationError`] is raised.
//! [`Generator`] is that capability. [`TemplateGenerator`] is the built-in
//! governance assistant that routes prompts to canned answers by keyword.

pub mod generator;
pub mod template;

pub use generator::{Generation, GenerationError, Generator};
pub use template::{TemplateGenerator, Topic, MODEL_ID};
