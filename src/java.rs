//! Class emission: one Java artifact per grammar type.
//!
//! - simple sum: marker interface with integer constants and a name table
//! - non-simple sum: abstract base class plus one final class per constructor
//! - product: one final class
//!
//! Concrete classes get the generated method set from [`methods`].

mod methods;

#[cfg(test)]
mod tests;

use crate::{
    analysis::{ConstructorDef, FieldDef, Grammar, Resolved, SumDef, TypeKind},
    emit::{Artifact, Imports},
    error::{Error, Result},
    generate::{HoistedField, Options},
    grammar::Builtin,
};

use methods::Methods;

/// Java-side shape of a field's element type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum JavaType {
    Int,
    Boolean,
    String,
    Object,
    /// Generated node class, deep-copied and traversed.
    Node(String),
    /// Class outside the grammar, handled by reference.
    Opaque(String),
}

impl JavaType {
    pub fn of(field: &FieldDef<'_>, grammar: &Grammar<'_>) -> JavaType {
        match field.resolved {
            Resolved::Builtin(Builtin::Bool) => JavaType::Boolean,
            Resolved::Builtin(Builtin::Int) => JavaType::Int,
            Resolved::Builtin(Builtin::Identifier | Builtin::String) => JavaType::String,
            Resolved::Builtin(Builtin::Object) => JavaType::Object,
            Resolved::Enum(_) => JavaType::Int,
            Resolved::Node(id) => JavaType::Node(type_class(grammar.get(id).name)),
            Resolved::Opaque => JavaType::Opaque(type_class(field.ty)),
        }
    }

    pub fn name(&self) -> &str {
        match self {
            JavaType::Int => "int",
            JavaType::Boolean => "boolean",
            JavaType::String => "String",
            JavaType::Object => "Object",
            JavaType::Node(class) | JavaType::Opaque(class) => class,
        }
    }

    /// Compared with `!=` and hashed by value.
    #[inline]
    pub fn is_primitive(&self) -> bool {
        matches!(self, JavaType::Int | JavaType::Boolean)
    }

    /// Values that have their own `createCopy`.
    #[inline]
    pub fn is_node(&self) -> bool {
        matches!(self, JavaType::Node(_))
    }
}

/// Class name of the artifact generated for the grammar type `name`.
#[inline]
pub fn type_class(name: &str) -> String {
    format!("{name}Type")
}

/// `<type>[]` or `<type>`.
fn field_type(field: &FieldDef<'_>, grammar: &Grammar<'_>) -> String {
    let ty = JavaType::of(field, grammar);
    let seq = if field.seq { "[]" } else { "" };
    format!("{}{seq}", ty.name())
}

/// `<type>[] <name>` or `<type> <name>`.
pub(crate) fn field_decl(field: &FieldDef<'_>, grammar: &Grammar<'_>) -> String {
    format!("{} {}", field_type(field, grammar), field.name)
}

/// Fails when the constructors of a sum disagree on the type of a hoisted
/// field.
pub fn emit_classes(grammar: &Grammar<'_>, options: &Options) -> Result<Vec<Artifact>> {
    let mut artifacts = Vec::new();
    let emitter = ClassEmitter { grammar, options };

    for def in &grammar.definitions {
        match &def.kind {
            TypeKind::Sum(sum) if sum.simple => artifacts.push(emitter.simple_sum(def.name, sum)),
            TypeKind::Sum(sum) => {
                artifacts.push(emitter.sum_base(def.name, sum)?);
                for constructor in &sum.constructors {
                    artifacts.push(emitter.constructor(def.name, constructor));
                }
            }
            TypeKind::Product(product) => {
                artifacts.push(emitter.product(def.name, &product.fields));
            }
        }
    }

    Ok(artifacts)
}

struct ClassEmitter<'a, 'src> {
    grammar: &'a Grammar<'src>,
    options: &'a Options,
}

impl<'src> ClassEmitter<'_, 'src> {
    fn simple_sum(&self, name: &str, sum: &SumDef<'src>) -> Artifact {
        let class = type_class(name);
        let mut out = Artifact::new(&class, Imports::None);

        ln!(out, 0, "public interface {class} {{");
        for (i, constructor) in sum.constructors.iter().enumerate() {
            ln!(out, 1, "public static final int {} = {};", constructor.name, i + 1);
        }
        out.blank();
        ln!(out, 1, "public static final String[] {class}Names = new String[] {{");
        ln!(out, 2, "\"<undef>\",");
        for constructor in &sum.constructors {
            ln!(out, 2, "\"{}\",", constructor.name);
        }
        ln!(out, 1, "}};");
        ln!(out, 0, "}}");

        out
    }

    fn sum_base(&self, name: &str, sum: &SumDef<'src>) -> Result<Artifact> {
        let class = type_class(name);
        let mut out = Artifact::new(&class, Imports::Node);

        ln!(out, 0, "public abstract class {class} extends {} {{", self.options.node_class());
        for hoisted in self.options.hoisted_for(name) {
            let mut types: Vec<String> = Vec::new();
            let declared = sum
                .constructors
                .iter()
                .flat_map(|c| c.fields.iter())
                .filter(|f| f.name == hoisted.field);
            for field in declared {
                let ty = field_type(field, self.grammar);
                if !types.contains(&ty) {
                    types.push(ty);
                }
            }
            match &types[..] {
                [] => tracing::warn!(
                    sum = name,
                    field = hoisted.field.as_str(),
                    "hoisted field is not declared by any constructor"
                ),
                [ty] => ln!(out, 1, "public {ty} {};", hoisted.field),
                _ => {
                    return Err(Error::Hoist {
                        sum: name.to_owned(),
                        field: hoisted.field.clone(),
                        types,
                    });
                }
            }
        }
        ln!(out, 0, "}}");

        Ok(out)
    }

    fn constructor(&self, sum_name: &str, constructor: &ConstructorDef<'src>) -> Artifact {
        let name = constructor.name;
        let mut out = Artifact::new(name, Imports::Node);

        let mut enums: Vec<String> = Vec::new();
        for field in &constructor.fields {
            if let Resolved::Enum(id) = field.resolved {
                let class = type_class(self.grammar.get(id).name);
                if !enums.contains(&class) {
                    enums.push(class);
                }
            }
        }
        let implements = if enums.is_empty() {
            String::new()
        } else {
            format!("implements {} ", enums.join(", "))
        };
        ln!(
            out,
            0,
            "public final class {name} extends {} {implements}{{",
            type_class(sum_name)
        );

        let hoisted: Vec<&HoistedField> = self.options.hoisted_for(sum_name).collect();
        for field in &constructor.fields {
            if hoisted.iter().any(|h| h.field == field.name) {
                continue;
            }
            ln!(out, 1, "public {};", field_decl(field, self.grammar));
        }
        out.blank();

        let position_from = hoisted
            .iter()
            .filter(|h| h.propagate_position)
            .find_map(|h| {
                constructor
                    .fields
                    .iter()
                    .find(|f| f.name == h.field && f.seq && f.is_child())
            })
            .map(|f| f.name);

        Methods {
            grammar: self.grammar,
            options: self.options,
            class_name: name,
            ctor_name: name,
            fields: &constructor.fields,
            position_from,
        }
        .emit(&mut out, 1);

        ln!(out, 0, "}}");
        out
    }

    fn product(&self, name: &str, fields: &[FieldDef<'src>]) -> Artifact {
        let class = type_class(name);
        let mut out = Artifact::new(&class, Imports::Node);

        ln!(out, 0, "public final class {class} extends {} {{", self.options.node_class());
        for field in fields {
            ln!(out, 1, "public {};", field_decl(field, self.grammar));
        }
        out.blank();

        Methods {
            grammar: self.grammar,
            options: self.options,
            class_name: name,
            ctor_name: &class,
            fields,
            position_from: None,
        }
        .emit(&mut out, 1);

        ln!(out, 0, "}}");
        out
    }
}
