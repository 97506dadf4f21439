//! Annotated shader source assembly.
//!
//! A single `.glsl` file carries every stage of a program. `#type <stage>`
//! lines open a stage block, `#include <file>` lines splice a file from the
//! include root into the current stage. Everything else is raw source.

use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use sha2::{Digest, Sha256};

use crate::config::ShaderConfig;
use crate::error::ShaderError;

const TYPE_DIRECTIVE: &str = "#type";
const INCLUDE_DIRECTIVE: &str = "#include";

/// One stage of the GPU shading pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum StageKind {
    Vertex,
    Geometry,
    Fragment,
    Compute,
}

impl StageKind {
    /// All stage kinds, in compilation order.
    pub const ALL: [StageKind; 4] = [
        StageKind::Vertex,
        StageKind::Geometry,
        StageKind::Fragment,
        StageKind::Compute,
    ];

    /// The name used by `#type` directives.
    pub fn as_str(self) -> &'static str {
        match self {
            StageKind::Vertex => "vertex",
            StageKind::Geometry => "geometry",
            StageKind::Fragment => "fragment",
            StageKind::Compute => "compute",
        }
    }

    fn index(self) -> usize {
        self as usize
    }
}

impl fmt::Display for StageKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

/// A `#type` argument that names no known stage.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown shader stage `{0}`")]
pub struct UnknownStageKind(pub String);

impl FromStr for StageKind {
    type Err = UnknownStageKind;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        StageKind::ALL
            .into_iter()
            .find(|kind| kind.as_str() == s)
            .ok_or_else(|| UnknownStageKind(s.to_string()))
    }
}

/// Fully resolved source text per stage.
///
/// Backed by one slot per [`StageKind`], so iteration always follows
/// [`StageKind::ALL`] regardless of the order stages appear in the file.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StageSourceMap {
    sources: [Option<String>; 4],
}

impl StageSourceMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Resolved source of a stage, if the stage was declared.
    pub fn get(&self, kind: StageKind) -> Option<&str> {
        self.sources[kind.index()].as_deref()
    }

    pub fn contains(&self, kind: StageKind) -> bool {
        self.sources[kind.index()].is_some()
    }

    /// Set a stage's source, returning the previous one.
    pub fn insert(&mut self, kind: StageKind, source: impl Into<String>) -> Option<String> {
        self.sources[kind.index()].replace(source.into())
    }

    /// Iterate declared stages and their sources in compilation order.
    pub fn iter(&self) -> impl Iterator<Item = (StageKind, &str)> {
        StageKind::ALL
            .into_iter()
            .filter_map(|kind| self.get(kind).map(|source| (kind, source)))
    }

    /// Declared stages in compilation order.
    pub fn stages(&self) -> impl Iterator<Item = StageKind> + '_ {
        self.iter().map(|(kind, _)| kind)
    }

    /// Number of declared stages.
    pub fn len(&self) -> usize {
        self.sources.iter().filter(|s| s.is_some()).count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// SHA-256 over every (stage, source) pair, hex encoded.
    ///
    /// Two maps have the same fingerprint iff they declare the same stages
    /// with byte-identical sources.
    pub fn fingerprint(&self) -> String {
        let mut hasher = Sha256::new();
        for (kind, source) in self.iter() {
            hasher.update(kind.as_str().as_bytes());
            hasher.update((source.len() as u64).to_le_bytes());
            hasher.update(source.as_bytes());
        }
        format!("{:x}", hasher.finalize())
    }

    fn buffer_mut(&mut self, kind: StageKind) -> &mut String {
        self.sources[kind.index()].get_or_insert_with(String::new)
    }
}

enum Directive<'a> {
    Type(&'a str),
    Include(&'a str),
}

impl<'a> Directive<'a> {
    fn parse(line: &'a str) -> Option<Self> {
        if let Some(arg) = directive_argument(line, TYPE_DIRECTIVE) {
            return Some(Directive::Type(arg));
        }
        directive_argument(line, INCLUDE_DIRECTIVE).map(|arg| Directive::Include(include_target(arg)))
    }
}

/// The trimmed argument of `directive` if `line` starts with it as a whole token.
fn directive_argument<'a>(line: &'a str, directive: &str) -> Option<&'a str> {
    let rest = line.strip_prefix(directive)?;
    match rest.chars().next() {
        None => Some(""),
        Some(c) if c.is_whitespace() => Some(rest.trim()),
        Some(_) => None,
    }
}

fn include_target(arg: &str) -> &str {
    arg.strip_prefix('"')
        .and_then(|a| a.strip_suffix('"'))
        .or_else(|| arg.strip_prefix('<').and_then(|a| a.strip_suffix('>')))
        .unwrap_or(arg)
}

/// Splits an annotated shader file into per-stage sources.
#[derive(Debug, Clone)]
pub struct SourceAssembler {
    include_dir: PathBuf,
}

impl SourceAssembler {
    /// Assembler resolving `#include` paths against `include_dir`.
    pub fn new(include_dir: impl Into<PathBuf>) -> Self {
        Self {
            include_dir: include_dir.into(),
        }
    }

    pub fn from_config(config: &ShaderConfig) -> Self {
        Self::new(config.include_dir.clone())
    }

    pub fn include_dir(&self) -> &Path {
        &self.include_dir
    }

    /// Read `path` and resolve it into a [`StageSourceMap`].
    ///
    /// Any resolution failure aborts the whole assembly: no partial map is
    /// returned. Lines before the first `#type` belong to no stage and are
    /// skipped, so a file without `#type` lines yields an empty map.
    pub fn assemble(&self, path: impl AsRef<Path>) -> Result<StageSourceMap, ShaderError> {
        let path = path.as_ref();
        let _span = tracing::debug_span!("assemble_shader", path = %path.display()).entered();

        let text = std::fs::read_to_string(path).map_err(|source| ShaderError::SourceRead {
            path: path.to_path_buf(),
            source,
        })?;

        let mut sources = StageSourceMap::new();
        let mut current: Option<StageKind> = None;
        let mut chain = Vec::new();

        for (index, line) in text.split_inclusive('\n').enumerate() {
            let line_no = index + 1;
            match (Directive::parse(line), current) {
                (Some(Directive::Type(name)), _) => {
                    let kind = name.parse::<StageKind>().map_err(|_| ShaderError::UnknownStage {
                        name: name.to_string(),
                        path: path.to_path_buf(),
                        line: line_no,
                    })?;
                    sources.buffer_mut(kind);
                    tracing::debug!(stage = %kind, line = line_no, "stage opened");
                    current = Some(kind);
                }
                (Some(Directive::Include(target)), Some(kind)) => {
                    self.resolve_include(target, path, &mut chain, sources.buffer_mut(kind))?;
                }
                (None, Some(kind)) => sources.buffer_mut(kind).push_str(line),
                (Some(Directive::Include(target)), None) => {
                    // Resolved so a bad target still fails; the text has no stage to land in.
                    let mut discarded = String::new();
                    self.resolve_include(target, path, &mut chain, &mut discarded)?;
                    tracing::warn!(
                        path = %path.display(),
                        line = line_no,
                        include = target,
                        "discarding include outside of any #type block"
                    );
                }
                (None, None) => {
                    if !line.trim().is_empty() {
                        tracing::warn!(
                            path = %path.display(),
                            line = line_no,
                            "ignoring line outside of any #type block"
                        );
                    }
                }
            }
        }

        Ok(sources)
    }

    fn resolve_include(
        &self,
        target: &str,
        included_from: &Path,
        chain: &mut Vec<PathBuf>,
        out: &mut String,
    ) -> Result<(), ShaderError> {
        let path = self.include_dir.join(target);
        let text = std::fs::read_to_string(&path).map_err(|source| ShaderError::IncludeRead {
            path: path.clone(),
            included_from: included_from.to_path_buf(),
            source,
        })?;

        let key = std::fs::canonicalize(&path).unwrap_or_else(|_| path.clone());
        if chain.contains(&key) {
            return Err(ShaderError::IncludeCycle { path });
        }
        chain.push(key);
        tracing::debug!(path = %path.display(), depth = chain.len(), "resolving include");

        for (index, line) in text.split_inclusive('\n').enumerate() {
            match Directive::parse(line) {
                Some(Directive::Type(_)) => {
                    return Err(ShaderError::TypeInInclude {
                        path,
                        line: index + 1,
                    });
                }
                Some(Directive::Include(nested)) => {
                    self.resolve_include(nested, &path, chain, out)?;
                }
                None => out.push_str(line),
            }
        }

        chain.pop();
        Ok(())
    }
}
