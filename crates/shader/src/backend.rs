//! The graphics API seam the pipeline drives.
//!
//! The methods mirror the GL shader/program entry points one to one. An
//! implementation is bound to the thread owning the graphics context, and
//! every call assumes that context is current.

use crate::source::StageKind;

/// Shader and program operations of a graphics API.
pub trait GraphicsBackend {
    /// Handle of a single shader stage object.
    type Shader: Copy;
    /// Handle of a linked program.
    type Program: Copy;
    /// Location of an active uniform inside a program.
    type UniformLocation: Clone;

    fn create_shader(&self, kind: StageKind) -> Result<Self::Shader, String>;
    fn shader_source(&self, shader: Self::Shader, source: &str);
    fn compile_shader(&self, shader: Self::Shader);
    fn shader_compile_status(&self, shader: Self::Shader) -> bool;
    /// The complete compiler log of `shader`.
    fn shader_info_log(&self, shader: Self::Shader) -> String;
    fn delete_shader(&self, shader: Self::Shader);

    fn create_program(&self) -> Result<Self::Program, String>;
    fn attach_shader(&self, program: Self::Program, shader: Self::Shader);
    fn detach_shader(&self, program: Self::Program, shader: Self::Shader);
    fn link_program(&self, program: Self::Program);
    fn program_link_status(&self, program: Self::Program) -> bool;
    /// The complete linker log of `program`.
    fn program_info_log(&self, program: Self::Program) -> String;
    fn delete_program(&self, program: Self::Program);
    /// Make `program` current, or clear the current program with `None`.
    fn use_program(&self, program: Option<Self::Program>);

    /// `None` when `name` is not an active uniform of `program`.
    fn uniform_location(&self, program: Self::Program, name: &str) -> Option<Self::UniformLocation>;
    /// Write a column-major 4x4 matrix. A `None` location is ignored.
    fn uniform_matrix4(&self, location: Option<&Self::UniformLocation>, value: &[f32; 16]);
    /// A `None` location is ignored.
    fn uniform_1i(&self, location: Option<&Self::UniformLocation>, value: i32);
    /// A `None` location is ignored.
    fn uniform_1iv(&self, location: Option<&Self::UniformLocation>, values: &[i32]);
}
