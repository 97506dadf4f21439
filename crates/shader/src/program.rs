use std::path::Path;

use crate::backend::GraphicsBackend;
use crate::compile::compile_stages;
use crate::config::ShaderConfig;
use crate::error::ShaderError;
use crate::link::link_program;
use crate::source::{SourceAssembler, StageSourceMap};
use crate::uniform::UniformCache;

/// A linked shader program.
///
/// Owns the program handle for its whole lifetime and deletes it exactly
/// once on drop. A `Shader` only exists for builds that fully succeeded.
pub struct Shader<B: GraphicsBackend> {
    pub(crate) backend: B,
    pub(crate) program: B::Program,
    pub(crate) uniforms: UniformCache<B::UniformLocation>,
}

impl<B: GraphicsBackend> Shader<B> {
    /// Assemble, compile and link the annotated shader file at `path`.
    pub fn from_file(
        backend: B,
        path: impl AsRef<Path>,
        config: &ShaderConfig,
    ) -> Result<Self, ShaderError> {
        let path = path.as_ref();
        let _span = tracing::info_span!("build_shader", path = %path.display()).entered();

        let sources = SourceAssembler::from_config(config)
            .assemble(path)
            .inspect_err(|e| tracing::error!("shader assembly failed: {e}"))?;
        Self::from_sources(backend, &sources, config)
    }

    /// Compile and link already assembled stage sources.
    ///
    /// An empty map is rejected before any GPU object is created.
    pub fn from_sources(
        backend: B,
        sources: &StageSourceMap,
        config: &ShaderConfig,
    ) -> Result<Self, ShaderError> {
        let stages = compile_stages(&backend, sources)?;
        let program = link_program(&backend, stages)?;
        tracing::info!(stages = sources.len(), "shader program built");

        Ok(Self {
            backend,
            program,
            uniforms: UniformCache::new(config.cache_uniform_locations),
        })
    }

    /// Make this program current.
    pub fn bind(&self) {
        self.backend.use_program(Some(self.program));
    }

    /// Clear the current program.
    pub fn unbind(&self) {
        self.backend.use_program(None);
    }

    pub fn program(&self) -> B::Program {
        self.program
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }
}

impl<B: GraphicsBackend> Drop for Shader<B> {
    fn drop(&mut self) {
        self.backend.delete_program(self.program);
    }
}
