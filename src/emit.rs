//! Artifact builder shared by the class and visitor emitters.
//!
//! Emitters push logical lines tagged with their nesting depth. Indentation
//! and line reflow happen in one place, [`render`].

pub mod reflow;

use std::fmt::Write as _;

use crate::error::Result;

pub use reflow::{MAX_COL, TAB_SIZE, reflow};

/// Push one logical line: `ln!(out, depth, "format {args}")`.
macro_rules! ln {
    ($out:expr, $depth:expr, $($tt:tt)*) => ($out.line($depth, format!($($tt)*)));
}

/// Push a multi-line block, see [`Artifact::block`].
macro_rules! ml {
    ($out:expr, $depth:expr, $($tt:tt)*) => ($out.block($depth, &indoc::formatdoc!($($tt)*)));
}

/// Whether an artifact refers to the node base class, which decides the
/// imports in its header.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Imports {
    None,
    Node,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Line {
    pub depth: usize,
    pub text: String,
}

/// One output unit, e.g. a single `.java` file.
#[derive(Debug, Clone)]
pub struct Artifact {
    pub name: String,
    pub imports: Imports,
    pub lines: Vec<Line>,
}

impl Artifact {
    pub fn new(name: impl Into<String>, imports: Imports) -> Self {
        Self {
            name: name.into(),
            imports,
            lines: Vec::new(),
        }
    }

    #[inline]
    pub fn line(&mut self, depth: usize, text: impl Into<String>) {
        self.lines.push(Line {
            depth,
            text: text.into(),
        });
    }

    #[inline]
    pub fn blank(&mut self) {
        self.line(0, "");
    }

    /// Push every line of `text` at `depth`. Each [`TAB_SIZE`] spaces of a
    /// line's own indentation nest it one level deeper.
    pub fn block(&mut self, depth: usize, text: &str) {
        for line in text.lines() {
            let text = line.trim_start_matches(' ');
            let nested = (line.len() - text.len()) / TAB_SIZE;
            self.line(depth + nested, text);
        }
    }
}

/// Header values shared by every artifact of a run.
#[derive(Debug, Clone, Copy)]
pub struct Prelude<'a> {
    pub package: &'a str,
    pub node_base: &'a str,
}

/// Render `artifact` into its final text.
///
/// Fails without producing partial output when any line cannot be reflowed.
pub fn render(artifact: &Artifact, prelude: Prelude<'_>) -> Result<String> {
    let mut out = String::with_capacity(artifact.lines.len() * 48);

    let _ = writeln!(out, "// Autogenerated AST node");
    let _ = writeln!(out, "package {};", prelude.package);
    if artifact.imports == Imports::Node {
        let _ = writeln!(out, "import {};", prelude.node_base);
        let _ = writeln!(out, "import java.util.Arrays;");
    }
    out.push('\n');

    for line in &artifact.lines {
        if line.text.is_empty() {
            out.push('\n');
            continue;
        }
        for piece in reflow(&line.text, line.depth)? {
            let _ = writeln!(out, "{:indent$}{piece}", "", indent = line.depth * TAB_SIZE);
        }
    }

    Ok(out)
}
