pub mod span;

pub mod error;

#[macro_use]
pub mod token;

pub mod grammar;
pub mod parser;

pub mod analysis;
pub mod check;

#[macro_use]
pub mod emit;

pub mod java;
pub mod visitor;

pub mod generate;

pub use error::{Error, Result};
pub use generate::{
    ArtifactSink, DirSink, HoistedField, MemorySink, Options, check_source, generate,
    generate_from_source,
};

/// Tokenize and parse grammar source.
///
/// The returned module borrows from `src`.
pub fn parse(src: &str) -> Result<grammar::Module<'_>> {
    parser::parse(&token::tokenize(src))
}
