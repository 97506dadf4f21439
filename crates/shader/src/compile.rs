use crate::backend::GraphicsBackend;
use crate::error::ShaderError;
use crate::source::{StageKind, StageSourceMap};

/// A compiled shader stage, owned for the duration of one program build.
///
/// Dropping it detaches it from the program it was attached to and deletes
/// the shader object, so stage handles are released on every exit path.
pub struct StageObject<'a, B: GraphicsBackend> {
    backend: &'a B,
    kind: StageKind,
    shader: B::Shader,
    attached_to: Option<B::Program>,
}

impl<B: GraphicsBackend> StageObject<'_, B> {
    pub fn kind(&self) -> StageKind {
        self.kind
    }

    pub fn handle(&self) -> B::Shader {
        self.shader
    }

    pub(crate) fn attach(&mut self, program: B::Program) {
        self.backend.attach_shader(program, self.shader);
        self.attached_to = Some(program);
    }
}

impl<B: GraphicsBackend> Drop for StageObject<'_, B> {
    fn drop(&mut self) {
        if let Some(program) = self.attached_to.take() {
            self.backend.detach_shader(program, self.shader);
        }
        self.backend.delete_shader(self.shader);
    }
}

/// Compile one stage.
///
/// On failure the full compiler log is reported and returned, and the
/// shader object is deleted.
pub fn compile_stage<'a, B: GraphicsBackend>(
    backend: &'a B,
    kind: StageKind,
    source: &str,
) -> Result<StageObject<'a, B>, ShaderError> {
    let shader = backend.create_shader(kind).map_err(ShaderError::Backend)?;
    let stage = StageObject {
        backend,
        kind,
        shader,
        attached_to: None,
    };

    backend.shader_source(shader, source);
    backend.compile_shader(shader);

    if !backend.shader_compile_status(shader) {
        let log = backend.shader_info_log(shader);
        tracing::error!(stage = %kind, "shader compilation failed:\n{log}");
        return Err(ShaderError::Compile { stage: kind, log });
    }

    tracing::debug!(stage = %kind, bytes = source.len(), "stage compiled");
    Ok(stage)
}

/// Compile every stage of `sources` in stage order.
///
/// An empty map is [`ShaderError::NoStages`] and touches no backend state.
/// Stops at the first failing stage; the stages compiled before it are
/// released before the error is returned.
pub fn compile_stages<'a, B: GraphicsBackend>(
    backend: &'a B,
    sources: &StageSourceMap,
) -> Result<Vec<StageObject<'a, B>>, ShaderError> {
    if sources.is_empty() {
        tracing::error!("shader has no #type blocks; nothing to compile");
        return Err(ShaderError::NoStages);
    }

    sources
        .iter()
        .map(|(kind, source)| compile_stage(backend, kind, source))
        .collect()
}
