use std::rc::Rc;

use glow::HasContext;

use crate::backend::GraphicsBackend;
use crate::source::StageKind;

/// OpenGL backend on top of a [`glow::Context`].
///
/// Holds the context behind an `Rc`: the backend is cheap to clone for every
/// shader that needs it, and it is `!Send`, so GL calls cannot leave the
/// thread that owns the context.
///
/// Whatever owns the window (winit + glutin, SDL, ...) makes a context
/// current and hands its loader to glow; from there a [`Shader`] is built
/// like this:
///
/// ```no_run
/// use std::rc::Rc;
///
/// use glam::Mat4;
/// use renderbat_shader::{
///     GlowBackend, MAX_TEXTURE_SLOTS, Shader, ShaderConfig, ShaderError, texture_unit_indices,
/// };
///
/// fn cubemap_shader(
///     load: impl FnMut(&str) -> *const std::ffi::c_void,
///     view_proj: Mat4,
/// ) -> Result<Shader<GlowBackend>, ShaderError> {
///     // SAFETY: the caller's context is current on this thread and stays so.
///     let gl = Rc::new(unsafe { glow::Context::from_loader_function(load) });
///     let backend = unsafe { GlowBackend::new(gl) };
///
///     let shader = Shader::from_file(backend, "shaders/cubemap.glsl", &ShaderConfig::default())?;
///     shader.bind();
///     shader.set_uniform_mat4("MVP", &view_proj);
///     shader.set_uniform_int_array("cubemaps", &texture_unit_indices::<MAX_TEXTURE_SLOTS>());
///     Ok(shader)
/// }
/// ```
///
/// [`Shader`]: crate::Shader
#[derive(Clone)]
pub struct GlowBackend {
    gl: Rc<glow::Context>,
}

impl GlowBackend {
    /// Wrap a GL context.
    ///
    /// # Safety
    ///
    /// `gl` must be current on the calling thread for as long as this
    /// backend, or any clone of it, is used.
    pub unsafe fn new(gl: Rc<glow::Context>) -> Self {
        Self { gl }
    }

    pub fn context(&self) -> &glow::Context {
        &self.gl
    }
}

fn gl_stage(kind: StageKind) -> u32 {
    match kind {
        StageKind::Vertex => glow::VERTEX_SHADER,
        StageKind::Geometry => glow::GEOMETRY_SHADER,
        StageKind::Fragment => glow::FRAGMENT_SHADER,
        StageKind::Compute => glow::COMPUTE_SHADER,
    }
}

// SAFETY (all methods below): `GlowBackend::new` requires the context to be
// current on this thread for the backend's whole lifetime, and every handle
// passed in was created by this same context.
impl GraphicsBackend for GlowBackend {
    type Shader = <glow::Context as HasContext>::Shader;
    type Program = <glow::Context as HasContext>::Program;
    type UniformLocation = <glow::Context as HasContext>::UniformLocation;

    fn create_shader(&self, kind: StageKind) -> Result<Self::Shader, String> {
        unsafe { self.gl.create_shader(gl_stage(kind)) }
    }

    fn shader_source(&self, shader: Self::Shader, source: &str) {
        unsafe { self.gl.shader_source(shader, source) }
    }

    fn compile_shader(&self, shader: Self::Shader) {
        unsafe { self.gl.compile_shader(shader) }
    }

    fn shader_compile_status(&self, shader: Self::Shader) -> bool {
        unsafe { self.gl.get_shader_compile_status(shader) }
    }

    fn shader_info_log(&self, shader: Self::Shader) -> String {
        unsafe { self.gl.get_shader_info_log(shader) }
    }

    fn delete_shader(&self, shader: Self::Shader) {
        unsafe { self.gl.delete_shader(shader) }
    }

    fn create_program(&self) -> Result<Self::Program, String> {
        unsafe { self.gl.create_program() }
    }

    fn attach_shader(&self, program: Self::Program, shader: Self::Shader) {
        unsafe { self.gl.attach_shader(program, shader) }
    }

    fn detach_shader(&self, program: Self::Program, shader: Self::Shader) {
        unsafe { self.gl.detach_shader(program, shader) }
    }

    fn link_program(&self, program: Self::Program) {
        unsafe { self.gl.link_program(program) }
    }

    fn program_link_status(&self, program: Self::Program) -> bool {
        unsafe { self.gl.get_program_link_status(program) }
    }

    fn program_info_log(&self, program: Self::Program) -> String {
        unsafe { self.gl.get_program_info_log(program) }
    }

    fn delete_program(&self, program: Self::Program) {
        unsafe { self.gl.delete_program(program) }
    }

    fn use_program(&self, program: Option<Self::Program>) {
        unsafe { self.gl.use_program(program) }
    }

    fn uniform_location(
        &self,
        program: Self::Program,
        name: &str,
    ) -> Option<Self::UniformLocation> {
        unsafe { self.gl.get_uniform_location(program, name) }
    }

    fn uniform_matrix4(&self, location: Option<&Self::UniformLocation>, value: &[f32; 16]) {
        unsafe { self.gl.uniform_matrix_4_f32_slice(location, false, value) }
    }

    fn uniform_1i(&self, location: Option<&Self::UniformLocation>, value: i32) {
        unsafe { self.gl.uniform_1_i32(location, value) }
    }

    fn uniform_1iv(&self, location: Option<&Self::UniformLocation>, values: &[i32]) {
        unsafe { self.gl.uniform_1_i32_slice(location, values) }
    }
}
