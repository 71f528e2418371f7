//! Generation driver: options, output sinks and the pipeline that ties
//! analysis, class emission and visitor emission together.

use std::fmt::Display;
use std::fs;
use std::path::PathBuf;
use std::str::FromStr;

use crate::{
    analysis::analyze,
    check::check,
    emit::{Artifact, Prelude, render},
    error::{Error, Result},
    grammar::Module,
    java::emit_classes,
    parser::parse,
    token::tokenize,
    visitor::emit_visitors,
};

#[derive(Debug, Clone)]
pub struct Options {
    /// Java package of every generated artifact.
    pub package: String,
    /// Fully-qualified name of the class all nodes extend.
    pub node_base: String,
    /// Class of the entries copied from `specialsBefore` / `specialsAfter`.
    pub comment_type: String,
    pub hoisted: Vec<HoistedField>,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            package: "org.python.pydev.parser.jython.ast".into(),
            node_base: "org.python.pydev.parser.jython.SimpleNode".into(),
            comment_type: "commentType".into(),
            hoisted: vec![HoistedField {
                sum: "suite".into(),
                field: "body".into(),
                propagate_position: true,
            }],
        }
    }
}

impl Options {
    /// Unqualified name of [`Options::node_base`].
    pub fn node_class(&self) -> &str {
        self.node_base
            .rsplit_once('.')
            .map_or(self.node_base.as_str(), |(_, class)| class)
    }

    /// Hoisted fields of `sum`. Repeated entries for the same field are
    /// yielded once, the first one wins.
    pub fn hoisted_for<'a>(&'a self, sum: &'a str) -> impl Iterator<Item = &'a HoistedField> {
        self.hoisted
            .iter()
            .enumerate()
            .filter(move |(i, h)| {
                h.sum == sum
                    && !self.hoisted[..*i]
                        .iter()
                        .any(|prev| prev.sum == h.sum && prev.field == h.field)
            })
            .map(|(_, h)| h)
    }

    fn prelude(&self) -> Prelude<'_> {
        Prelude {
            package: &self.package,
            node_base: &self.node_base,
        }
    }
}

/// A field declared once on a sum's base class instead of on each of its
/// constructor classes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HoistedField {
    pub sum: String,
    pub field: String,
    /// Copy `beginLine` / `beginColumn` from the first element of the field
    /// when it is a non-empty node sequence.
    pub propagate_position: bool,
}

#[derive(Debug, thiserror::Error)]
#[error("expected `sum.field`, found `{0}`")]
pub struct ParseHoistError(String);

/// Parses `sum.field`. Position propagation is enabled.
impl FromStr for HoistedField {
    type Err = ParseHoistError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.split_once('.') {
            Some((sum, field)) if is_ident(sum) && is_ident(field) => Ok(HoistedField {
                sum: sum.to_owned(),
                field: field.to_owned(),
                propagate_position: true,
            }),
            _ => Err(ParseHoistError(s.to_owned())),
        }
    }
}

impl Display for HoistedField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}.{}", self.sum, self.field)
    }
}

fn is_ident(s: &str) -> bool {
    let mut chars = s.chars();
    chars
        .next()
        .is_some_and(|c| c.is_ascii_alphabetic() || c == '_')
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

/// Destination of rendered artifacts.
pub trait ArtifactSink {
    fn write(&mut self, name: &str, contents: &str) -> Result<()>;
}

/// Writes `<dir>/<name>.java`, creating `dir` on first use.
pub struct DirSink {
    dir: PathBuf,
    created: bool,
}

impl DirSink {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            created: false,
        }
    }
}

impl ArtifactSink for DirSink {
    fn write(&mut self, name: &str, contents: &str) -> Result<()> {
        if !self.created {
            fs::create_dir_all(&self.dir).map_err(|source| Error::Io {
                path: self.dir.clone(),
                source,
            })?;
            self.created = true;
        }

        let path = self.dir.join(format!("{name}.java"));
        fs::write(&path, contents).map_err(|source| Error::Io { path, source })
    }
}

/// Keeps every artifact in memory, in write order.
#[derive(Debug, Default)]
pub struct MemorySink {
    pub artifacts: Vec<(String, String)>,
}

impl MemorySink {
    pub fn get(&self, name: &str) -> Option<&str> {
        self.artifacts
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, contents)| contents.as_str())
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.artifacts.iter().map(|(name, _)| name.as_str())
    }
}

impl ArtifactSink for MemorySink {
    fn write(&mut self, name: &str, contents: &str) -> Result<()> {
        self.artifacts.push((name.to_owned(), contents.to_owned()));
        Ok(())
    }
}

/// Generate every artifact for `module`.
///
/// The module is checked first and nothing is written when it is invalid.
/// Artifacts are rendered and written one at a time. The first failure stops
/// the run; whatever was written before it stays in the sink.
///
/// Returns the number of artifacts written.
pub fn generate(module: &Module<'_>, options: &Options, sink: &mut dyn ArtifactSink) -> Result<usize> {
    check(module)?;
    let grammar = analyze(module);

    let mut written = 0;
    let artifacts = emit_classes(&grammar, options)?
        .into_iter()
        .chain(emit_visitors(&grammar));
    for artifact in artifacts {
        write_artifact(&artifact, options, sink)?;
        written += 1;
    }

    tracing::info!(module = grammar.name, artifacts = written, "generated");
    Ok(written)
}

fn write_artifact(artifact: &Artifact, options: &Options, sink: &mut dyn ArtifactSink) -> Result<()> {
    let contents = render(artifact, options.prelude()).inspect_err(|err| {
        tracing::error!(artifact = artifact.name.as_str(), "{err}");
    })?;
    sink.write(&artifact.name, &contents)?;
    tracing::debug!(
        artifact = artifact.name.as_str(),
        lines = artifact.lines.len(),
        "wrote artifact"
    );
    Ok(())
}

/// Parse, check and generate from grammar source.
///
/// Nothing is written unless the grammar is valid.
pub fn generate_from_source(src: &str, options: &Options, sink: &mut dyn ArtifactSink) -> Result<usize> {
    let tokens = tokenize(src);
    let module = parse(&tokens)?;
    generate(&module, options, sink)
}

/// Validate grammar source without generating anything.
pub fn check_source(src: &str) -> Result<()> {
    let tokens = tokenize(src);
    let module = parse(&tokens)?;
    check(&module)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_options_target_pydev() {
        let options = Options::default();
        assert_eq!(options.node_class(), "SimpleNode");
        assert_eq!(options.package, "org.python.pydev.parser.jython.ast");
        let hoisted: Vec<_> = options.hoisted_for("suite").collect();
        assert_eq!(hoisted.len(), 1);
        assert_eq!(hoisted[0].field, "body");
        assert!(hoisted[0].propagate_position);
        assert_eq!(options.hoisted_for("stmt").count(), 0);
    }

    #[test]
    fn repeated_hoist_entries_are_yielded_once() {
        let options = Options {
            hoisted: ["suite.body", "stmt.body", "suite.body"]
                .iter()
                .map(|s| s.parse().unwrap())
                .collect(),
            ..Options::default()
        };
        let suite: Vec<_> = options.hoisted_for("suite").map(|h| h.to_string()).collect();
        assert_eq!(suite, ["suite.body"]);
        assert_eq!(options.hoisted_for("stmt").count(), 1);
    }

    #[test]
    fn node_class_of_unqualified_base() {
        let options = Options {
            node_base: "Node".into(),
            ..Options::default()
        };
        assert_eq!(options.node_class(), "Node");
    }

    #[test]
    fn hoisted_field_from_str() {
        let hoisted: HoistedField = "block.stmts".parse().unwrap();
        assert_eq!(hoisted.sum, "block");
        assert_eq!(hoisted.field, "stmts");
        assert_eq!(hoisted.to_string(), "block.stmts");

        for bad in ["block", "block.", ".stmts", "a.b.c", "1a.b"] {
            let err = bad.parse::<HoistedField>().unwrap_err();
            assert_eq!(err.to_string(), format!("expected `sum.field`, found `{bad}`"));
        }
    }

    #[test]
    fn invalid_module_is_rejected_before_writing() {
        let module = crate::parse("module M { expr = Num(object n) | Num(int i) }").unwrap();
        let mut sink = MemorySink::default();
        let err = generate(&module, &Options::default(), &mut sink).unwrap_err();

        let Error::Invalid(diagnostics) = err else {
            panic!("expected validation failure");
        };
        assert_eq!(diagnostics.len(), 1);
        assert_eq!(diagnostics[0].message, "constructor `Num` is defined more than once");
        assert!(sink.artifacts.is_empty());
    }

    #[test]
    fn memory_sink_keeps_write_order() {
        let mut sink = MemorySink::default();
        sink.write("B", "b").unwrap();
        sink.write("A", "a").unwrap();
        assert_eq!(sink.names().collect::<Vec<_>>(), ["B", "A"]);
        assert_eq!(sink.get("A"), Some("a"));
        assert_eq!(sink.get("C"), None);
    }
}
