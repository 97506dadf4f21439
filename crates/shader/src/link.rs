use crate::backend::GraphicsBackend;
use crate::compile::StageObject;
use crate::error::ShaderError;

/// Link compiled stages into a program.
///
/// The stages are consumed: every one is detached and deleted before this
/// returns, whatever the outcome. On failure the program is deleted too, so
/// nothing from this build stays allocated. No stages at all is
/// [`ShaderError::NoStages`], reported before any program is created.
pub fn link_program<B: GraphicsBackend>(
    backend: &B,
    mut stages: Vec<StageObject<'_, B>>,
) -> Result<B::Program, ShaderError> {
    if stages.is_empty() {
        tracing::error!("no compiled stages to link");
        return Err(ShaderError::NoStages);
    }

    let program = backend.create_program().map_err(ShaderError::Backend)?;

    for stage in &mut stages {
        stage.attach(program);
    }
    backend.link_program(program);
    let linked = backend.program_link_status(program);

    let attached = stages.len();
    drop(stages);

    if !linked {
        let log = backend.program_info_log(program);
        tracing::error!("shader program link failed:\n{log}");
        backend.delete_program(program);
        return Err(ShaderError::Link { log });
    }

    tracing::debug!(stages = attached, "program linked");
    Ok(program)
}
