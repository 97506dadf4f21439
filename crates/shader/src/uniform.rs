//! Name-addressed uniform setters.
//!
//! Setters assume the shader is the currently bound program. A name that is
//! not an active uniform (misspelled, or stripped by the driver's optimizer)
//! turns the set into a no-op.

use std::cell::RefCell;
use std::collections::HashMap;

use glam::Mat4;

use crate::backend::GraphicsBackend;
use crate::program::Shader;

/// Texture units the cube-map sampler array is bound across.
pub const MAX_TEXTURE_SLOTS: usize = 32;

/// `[0, 1, .., N - 1]`, for pointing a sampler array at consecutive texture units.
pub fn texture_unit_indices<const N: usize>() -> [i32; N] {
    std::array::from_fn(|unit| unit as i32)
}

/// Uniform name to location lookups, remembered for one program's lifetime.
///
/// Misses are remembered too. When disabled every lookup goes to the driver.
pub(crate) struct UniformCache<L> {
    enabled: bool,
    locations: RefCell<HashMap<String, Option<L>>>,
}

impl<L: Clone> UniformCache<L> {
    pub(crate) fn new(enabled: bool) -> Self {
        Self {
            enabled,
            locations: RefCell::new(HashMap::new()),
        }
    }

    fn resolve(&self, name: &str, lookup: impl FnOnce() -> Option<L>) -> Option<L> {
        if !self.enabled {
            return lookup();
        }
        let cached = self.locations.borrow().get(name).cloned();
        if let Some(location) = cached {
            return location;
        }
        let location = lookup();
        self.locations
            .borrow_mut()
            .insert(name.to_string(), location.clone());
        location
    }
}

impl<B: GraphicsBackend> Shader<B> {
    fn uniform_location(&self, name: &str) -> Option<B::UniformLocation> {
        let location = self
            .uniforms
            .resolve(name, || self.backend.uniform_location(self.program, name));
        if location.is_none() {
            tracing::trace!(name, "uniform is not active; ignoring set");
        }
        location
    }

    /// Set a `mat4` uniform.
    pub fn set_uniform_mat4(&self, name: &str, value: &Mat4) {
        let location = self.uniform_location(name);
        self.backend
            .uniform_matrix4(location.as_ref(), &value.to_cols_array());
    }

    /// Set an `int` (or single sampler) uniform.
    pub fn set_uniform_int(&self, name: &str, value: i32) {
        let location = self.uniform_location(name);
        self.backend.uniform_1i(location.as_ref(), value);
    }

    /// Set an `int[]` uniform, typically a sampler array's texture units.
    pub fn set_uniform_int_array(&self, name: &str, values: &[i32]) {
        let location = self.uniform_location(name);
        self.backend.uniform_1iv(location.as_ref(), values);
    }
}
