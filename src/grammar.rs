//! Parsed ASDL grammar.
//!
//! This is the tree as written in the grammar file. It is never mutated after
//! parsing; the annotations the emitters need live in [`crate::analysis`].

use crate::span::{Span, Spanned};

#[derive(Debug, Clone)]
pub struct Module<'src> {
    pub name: Spanned<&'src str>,
    pub version: Option<&'src str>,
    pub definitions: Vec<Definition<'src>>,
}

#[derive(Debug, Clone)]
pub struct Definition<'src> {
    pub name: Spanned<&'src str>,
    pub value: Type<'src>,
}

#[derive(Debug, Clone)]
pub enum Type<'src> {
    Sum(Sum<'src>),
    Product(Product<'src>),
}

#[derive(Debug, Clone)]
pub struct Sum<'src> {
    pub constructors: Vec<Constructor<'src>>,
    /// `attributes (...)` trailing the alternatives.
    pub attributes: Vec<Field<'src>>,
}

#[derive(Debug, Clone)]
pub struct Constructor<'src> {
    pub name: Spanned<&'src str>,
    pub fields: Vec<Field<'src>>,
}

#[derive(Debug, Clone)]
pub struct Product<'src> {
    pub fields: Vec<Field<'src>>,
}

#[derive(Debug, Clone)]
pub struct Field<'src> {
    pub ty: Spanned<&'src str>,
    pub name: Option<Spanned<&'src str>>,
    pub seq: bool,
    pub opt: bool,
}

impl<'src> Field<'src> {
    /// Name of the field, or an empty string when the grammar omitted it.
    ///
    /// Unnamed fields are rejected by [`crate::check`].
    #[inline]
    pub fn name(&self) -> &'src str {
        self.name.map(|n| *n).unwrap_or("")
    }

    pub fn span(&self) -> Span {
        match self.name {
            Some(name) => Span {
                start: self.ty.span.start,
                end: name.span.end,
            },
            None => self.ty.span,
        }
    }
}

/// Built-in ASDL types and the Java types they map to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Builtin {
    Bool,
    Int,
    Identifier,
    String,
    Object,
}

impl Builtin {
    pub fn from_name(name: &str) -> Option<Builtin> {
        match name {
            "bool" => Some(Builtin::Bool),
            "int" => Some(Builtin::Int),
            "identifier" => Some(Builtin::Identifier),
            "string" => Some(Builtin::String),
            "object" => Some(Builtin::Object),
            _ => None,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Builtin::Bool => "bool",
            Builtin::Int => "int",
            Builtin::Identifier => "identifier",
            Builtin::String => "string",
            Builtin::Object => "object",
        }
    }
}
