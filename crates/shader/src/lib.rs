//! Shader pipeline: annotated source assembly, stage compilation, program
//! linking and uniform binding.
//!
//! A program is built in one pass: [`SourceAssembler`] splits an annotated
//! `.glsl` file into per-stage sources, [`compile_stages`] turns them into
//! stage objects, and [`link_program`] links those into a program owned by a
//! [`Shader`].
//!
//! # Invariants
//! - Stage objects never outlive the build that created them, on any exit path.
//! - A failed build leaves no GPU objects allocated and yields no [`Shader`].
//! - All GPU calls happen on the thread owning the graphics context.

mod backend;
mod compile;
mod config;
mod error;
mod glow_backend;
mod link;
#[cfg(test)]
mod mock;
mod program;
mod source;
mod uniform;

pub use backend::GraphicsBackend;
pub use compile::{StageObject, compile_stage, compile_stages};
pub use config::{DEFAULT_INCLUDE_DIR, ShaderConfig};
pub use error::{ConfigError, ShaderError};
pub use glow_backend::GlowBackend;
pub use link::link_program;
pub use program::Shader;
pub use source::{SourceAssembler, StageKind, StageSourceMap, UnknownStageKind};
pub use uniform::{MAX_TEXTURE_SLOTS, texture_unit_indices};

pub fn crate_info() -> &'static str {
    "renderbat-shader v0.1.0"
}
