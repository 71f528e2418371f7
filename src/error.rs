use std::borrow::Cow;
use std::fmt::{Display, Write as _};
use std::path::PathBuf;

use crate::span::Span;

pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("{message}")]
    Syntax {
        message: Cow<'static, str>,
        span: Span,
    },

    #[error("grammar failed validation with {} error(s)", .0.len())]
    Invalid(Vec<Diagnostic>),

    #[error(
        "hoisted field `{sum}.{field}` has conflicting types: {}",
        .types.join(", ")
    )]
    Hoist {
        sum: String,
        field: String,
        types: Vec<String>,
    },

    #[error("impossible line to reflow: {line:?}")]
    Reflow { line: String },

    #[error("failed to write `{}`", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// A single problem found while validating a grammar.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    pub message: String,
    pub span: Span,
}

impl Diagnostic {
    pub fn new(message: impl Into<String>, span: Span) -> Self {
        Self {
            message: message.into(),
            span,
        }
    }
}

#[inline]
pub fn error_span(message: impl Into<Cow<'static, str>>, span: impl Into<Span>) -> Error {
    Error::Syntax {
        message: message.into(),
        span: span.into(),
    }
}

impl<T> From<Error> for Result<T> {
    #[inline]
    fn from(value: Error) -> Self {
        Err(value)
    }
}

impl Error {
    /// Render the error against the grammar source it was produced from.
    pub fn render<'a>(&'a self, src: &'a str) -> impl Display + 'a {
        RenderedError { error: self, src }
    }
}

struct RenderedError<'a> {
    error: &'a Error,
    src: &'a str,
}

impl Display for RenderedError<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.error {
            Error::Syntax { message, span } => snippet(f, self.src, message, *span),
            Error::Invalid(diagnostics) => {
                for (i, diagnostic) in diagnostics.iter().enumerate() {
                    if i > 0 {
                        f.write_char('\n')?;
                    }
                    snippet(f, self.src, &diagnostic.message, diagnostic.span)?;
                }
                Ok(())
            }
            other => write!(f, "error: {other}"),
        }
    }
}

fn snippet(f: &mut std::fmt::Formatter<'_>, src: &str, message: &str, span: Span) -> std::fmt::Result {
    let loc = span.location(src);
    let line = src[loc.line_start..].lines().next().unwrap_or("");
    let gutter = loc.line.to_string().len();
    let width = src[span.start().min(src.len())..span.end().min(src.len())]
        .lines()
        .next()
        .map(|s| s.chars().count())
        .unwrap_or(0)
        .max(1);

    writeln!(f, "error: {message}")?;
    writeln!(f, "{:gutter$}--> {}:{}", "", loc.line, loc.column)?;
    writeln!(f, "{:gutter$} |", "")?;
    writeln!(f, "{} | {line}", loc.line)?;
    write!(
        f,
        "{:gutter$} | {:pad$}{}",
        "",
        "",
        "^".repeat(width),
        pad = loc.column - 1
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn renders_caret_under_span() {
        let src = "module M {\n  x = Foo(int a\n}";
        let err = error_span("expected ')'", 25..26);
        insta::assert_snapshot!(err.render(src).to_string(), @r"
        error: expected ')'
         --> 2:15
          |
        2 |   x = Foo(int a
          |               ^
        ");
    }
}
