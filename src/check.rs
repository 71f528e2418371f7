//! Grammar validation.
//!
//! Generation only runs on a grammar that passed [`check`]. Every problem is
//! collected before failing so a single run reports all of them.

use hashbrown::HashMap;
use rustc_hash::FxBuildHasher;

use crate::{
    error::{Diagnostic, Error, Result},
    grammar::{Builtin, Field, Module, Type},
    span::Span,
};

type Seen<'src> = HashMap<&'src str, Span, FxBuildHasher>;

pub fn check(module: &Module<'_>) -> Result<()> {
    let mut diagnostics = Vec::new();
    let mut definitions = Seen::default();
    let mut constructors = Seen::default();

    for definition in &module.definitions {
        let name = *definition.name;
        if Builtin::from_name(name).is_some() {
            diagnostics.push(Diagnostic::new(
                format!("definition `{name}` shadows a built-in type"),
                definition.name.span,
            ));
        }
        if definitions.insert(name, definition.name.span).is_some() {
            diagnostics.push(Diagnostic::new(
                format!("duplicate definition `{name}`"),
                definition.name.span,
            ));
        }
    }

    for definition in &module.definitions {
        match &definition.value {
            Type::Sum(sum) => {
                for constructor in &sum.constructors {
                    let name = *constructor.name;
                    if constructors.insert(name, constructor.name.span).is_some() {
                        diagnostics.push(Diagnostic::new(
                            format!("constructor `{name}` is defined more than once"),
                            constructor.name.span,
                        ));
                    }
                    check_fields(&constructor.fields, &definitions, &mut diagnostics);
                }
                if !sum.attributes.is_empty() {
                    tracing::debug!(
                        sum = *definition.name,
                        "attributes are not emitted, node positions live on the base class"
                    );
                }
            }
            Type::Product(product) => {
                check_fields(&product.fields, &definitions, &mut diagnostics);
            }
        }
    }

    if diagnostics.is_empty() {
        Ok(())
    } else {
        diagnostics.sort_by_key(|d| d.span);
        Err(Error::Invalid(diagnostics))
    }
}

fn check_fields(fields: &[Field<'_>], definitions: &Seen<'_>, diagnostics: &mut Vec<Diagnostic>) {
    let mut names = Seen::default();
    for field in fields {
        let ty = *field.ty;
        match field.name {
            None => diagnostics.push(Diagnostic::new(
                format!("field of type `{ty}` has no name"),
                field.ty.span,
            )),
            Some(name) => {
                if names.insert(*name, name.span).is_some() {
                    diagnostics.push(Diagnostic::new(
                        format!("duplicate field `{}`", *name),
                        name.span,
                    ));
                }
            }
        }

        if Builtin::from_name(ty).is_none() && !definitions.contains_key(ty) {
            tracing::warn!(ty, "undefined type, treating it as an opaque external class");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::check;
    use crate::{error::Error, parser::parse, token::tokenize};

    fn messages(src: &str) -> Vec<String> {
        let module = parse(&tokenize(src)).unwrap();
        match check(&module) {
            Ok(()) => vec![],
            Err(Error::Invalid(diagnostics)) => {
                diagnostics.into_iter().map(|d| d.message).collect()
            }
            Err(other) => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn valid_grammar() {
        let src = "module M { expr = Num(int n) | Name(identifier id, expr_context ctx)
                   expr_context = Load | Store }";
        assert!(messages(src).is_empty());
    }

    #[test]
    fn opaque_types_are_allowed() {
        assert!(messages("module M { t = (External thing) }").is_empty());
    }

    #[test]
    fn collects_every_problem() {
        let src = "module M {
            a = X(int) | Y
            a = (int v, bool v)
            b = Y
            int = (object o)
        }";
        assert_eq!(
            messages(src),
            [
                "field of type `int` has no name",
                "duplicate definition `a`",
                "duplicate field `v`",
                "constructor `Y` is defined more than once",
                "definition `int` shadows a built-in type",
            ]
        );
    }
}
