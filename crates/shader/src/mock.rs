//! Recording in-memory backend for tests.
//!
//! Compiles a stage when it declares `void main` with balanced braces, links
//! a program when it has a vertex or compute stage, and strips uniforms that
//! are declared but never referenced again. Deleting a handle twice, or
//! deleting a shader that is still attached, panics.

use std::cell::RefCell;
use std::collections::BTreeMap;
use std::rc::Rc;

use crate::backend::GraphicsBackend;
use crate::source::StageKind;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MockLocation {
    pub program: u32,
    pub index: usize,
}

#[derive(Debug, Clone, PartialEq)]
pub enum UniformValue {
    Mat4([f32; 16]),
    Int(i32),
    IntArray(Vec<i32>),
}

#[derive(Debug, Clone, PartialEq)]
pub struct UniformWrite {
    pub bound: Option<u32>,
    pub name: String,
    pub value: UniformValue,
}

struct MockShader {
    kind: StageKind,
    source: String,
    compiled: bool,
}

#[derive(Default)]
struct MockProgram {
    attached: Vec<u32>,
    linked: bool,
    log: String,
    uniforms: Vec<String>,
}

#[derive(Default)]
struct State {
    next_id: u32,
    shaders: BTreeMap<u32, MockShader>,
    programs: BTreeMap<u32, MockProgram>,
    created_shaders: Vec<StageKind>,
    current: Option<u32>,
    writes: Vec<UniformWrite>,
    location_queries: usize,
    fail_create_program: bool,
    fail_link: bool,
}

impl State {
    fn next_id(&mut self) -> u32 {
        self.next_id += 1;
        self.next_id
    }

    fn uniform_name(&self, location: &MockLocation) -> String {
        self.programs[&location.program].uniforms[location.index].clone()
    }
}

#[derive(Clone, Default)]
pub struct MockBackend {
    state: Rc<RefCell<State>>,
}

impl MockBackend {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn fail_create_program(&self) {
        self.state.borrow_mut().fail_create_program = true;
    }

    pub fn fail_link(&self) {
        self.state.borrow_mut().fail_link = true;
    }

    pub fn live_shaders(&self) -> usize {
        self.state.borrow().shaders.len()
    }

    pub fn live_programs(&self) -> usize {
        self.state.borrow().programs.len()
    }

    pub fn attached(&self, program: u32) -> usize {
        self.state.borrow().programs[&program].attached.len()
    }

    /// Stage kinds of every shader object ever created, in creation order.
    pub fn created_shaders(&self) -> Vec<StageKind> {
        self.state.borrow().created_shaders.clone()
    }

    pub fn current_program(&self) -> Option<u32> {
        self.state.borrow().current
    }

    pub fn writes(&self) -> Vec<UniformWrite> {
        self.state.borrow().writes.clone()
    }

    pub fn location_queries(&self) -> usize {
        self.state.borrow().location_queries
    }
}

fn compiles(source: &str) -> bool {
    source.contains("void main") && source.matches('{').count() == source.matches('}').count()
}

/// Uniform names declared in `source` and referenced at least once more.
fn active_uniforms(source: &str) -> Vec<String> {
    source
        .lines()
        .filter_map(|line| line.trim().strip_prefix("uniform "))
        .filter_map(|decl| decl.trim_end_matches(';').split_whitespace().nth(1))
        .map(|name| name.split('[').next().unwrap_or(name).to_string())
        .filter(|name| source.matches(name.as_str()).count() > 1)
        .collect()
}

impl GraphicsBackend for MockBackend {
    type Shader = u32;
    type Program = u32;
    type UniformLocation = MockLocation;

    fn create_shader(&self, kind: StageKind) -> Result<u32, String> {
        let mut state = self.state.borrow_mut();
        let id = state.next_id();
        state.shaders.insert(
            id,
            MockShader {
                kind,
                source: String::new(),
                compiled: false,
            },
        );
        state.created_shaders.push(kind);
        Ok(id)
    }

    fn shader_source(&self, shader: u32, source: &str) {
        let mut state = self.state.borrow_mut();
        state.shaders.get_mut(&shader).expect("live shader").source = source.to_string();
    }

    fn compile_shader(&self, shader: u32) {
        let mut state = self.state.borrow_mut();
        let shader = state.shaders.get_mut(&shader).expect("live shader");
        shader.compiled = compiles(&shader.source);
    }

    fn shader_compile_status(&self, shader: u32) -> bool {
        self.state.borrow().shaders[&shader].compiled
    }

    fn shader_info_log(&self, shader: u32) -> String {
        let state = self.state.borrow();
        let shader = &state.shaders[&shader];
        if shader.compiled {
            String::new()
        } else {
            format!(
                "0:{}(1): error: syntax error, unexpected end of file in {} shader\n",
                shader.source.lines().count(),
                shader.kind
            )
        }
    }

    fn delete_shader(&self, shader: u32) {
        let mut state = self.state.borrow_mut();
        assert!(
            state.programs.values().all(|p| !p.attached.contains(&shader)),
            "shader {shader} deleted while attached"
        );
        assert!(
            state.shaders.remove(&shader).is_some(),
            "shader {shader} deleted twice"
        );
    }

    fn create_program(&self) -> Result<u32, String> {
        let mut state = self.state.borrow_mut();
        if state.fail_create_program {
            return Err("out of program objects".into());
        }
        let id = state.next_id();
        state.programs.insert(id, MockProgram::default());
        Ok(id)
    }

    fn attach_shader(&self, program: u32, shader: u32) {
        let mut state = self.state.borrow_mut();
        assert!(state.shaders.contains_key(&shader), "attaching dead shader");
        state.programs.get_mut(&program).expect("live program").attached.push(shader);
    }

    fn detach_shader(&self, program: u32, shader: u32) {
        let mut state = self.state.borrow_mut();
        let attached = &mut state.programs.get_mut(&program).expect("live program").attached;
        let index = attached
            .iter()
            .position(|s| *s == shader)
            .expect("detaching shader that is not attached");
        attached.remove(index);
    }

    fn link_program(&self, program: u32) {
        let mut state = self.state.borrow_mut();
        let attached = state.programs[&program].attached.clone();
        let stages: Vec<&MockShader> = attached.iter().map(|id| &state.shaders[id]).collect();
        let has_entry = stages
            .iter()
            .any(|s| matches!(s.kind, StageKind::Vertex | StageKind::Compute));
        let all_compiled = stages.iter().all(|s| s.compiled);
        let uniforms: Vec<String> = stages
            .iter()
            .flat_map(|s| active_uniforms(&s.source))
            .collect();
        let (linked, log) = if state.fail_link {
            (false, "error: forced link failure\n".to_string())
        } else if !all_compiled {
            (false, "error: program has uncompiled stages\n".to_string())
        } else if !has_entry {
            (false, "error: no vertex or compute shader attached\n".to_string())
        } else {
            (true, String::new())
        };

        let program = state.programs.get_mut(&program).expect("live program");
        program.linked = linked;
        program.log = log;
        program.uniforms = if linked { uniforms } else { Vec::new() };
    }

    fn program_link_status(&self, program: u32) -> bool {
        self.state.borrow().programs[&program].linked
    }

    fn program_info_log(&self, program: u32) -> String {
        self.state.borrow().programs[&program].log.clone()
    }

    fn delete_program(&self, program: u32) {
        let mut state = self.state.borrow_mut();
        let removed = state.programs.remove(&program);
        assert!(removed.is_some(), "program {program} deleted twice");
        if state.current == Some(program) {
            state.current = None;
        }
    }

    fn use_program(&self, program: Option<u32>) {
        let mut state = self.state.borrow_mut();
        if let Some(p) = program {
            assert!(state.programs[&p].linked, "using unlinked program");
        }
        state.current = program;
    }

    fn uniform_location(&self, program: u32, name: &str) -> Option<MockLocation> {
        let mut state = self.state.borrow_mut();
        state.location_queries += 1;
        state.programs[&program]
            .uniforms
            .iter()
            .position(|u| u == name)
            .map(|index| MockLocation { program, index })
    }

    fn uniform_matrix4(&self, location: Option<&MockLocation>, value: &[f32; 16]) {
        self.record(location, UniformValue::Mat4(*value));
    }

    fn uniform_1i(&self, location: Option<&MockLocation>, value: i32) {
        self.record(location, UniformValue::Int(value));
    }

    fn uniform_1iv(&self, location: Option<&MockLocation>, values: &[i32]) {
        self.record(location, UniformValue::IntArray(values.to_vec()));
    }
}

impl MockBackend {
    fn record(&self, location: Option<&MockLocation>, value: UniformValue) {
        let Some(location) = location else {
            return;
        };
        let mut state = self.state.borrow_mut();
        let name = state.uniform_name(location);
        let bound = state.current;
        state.writes.push(UniformWrite { bound, name, value });
    }
}
