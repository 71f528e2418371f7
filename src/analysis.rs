//! Classification and annotation of a checked grammar.
//!
//! [`analyze`] builds the name table once, then walks the definitions in
//! order: every sum is classified as simple (all constructors are empty) or
//! not, non-simple constructors and all products receive a 1-based index from
//! a single counter, and every field is resolved against the name table.

use hashbrown::HashMap;
use rustc_hash::FxBuildHasher;

use crate::grammar::{self, Builtin, Module, Type};


#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct DefId(u32);

impl DefId {
    #[inline]
    fn index(self) -> usize {
        self.0 as usize
    }
}

#[derive(Debug)]
pub struct Grammar<'src> {
    pub name: &'src str,
    pub definitions: Vec<TypeDef<'src>>,
    table: HashMap<&'src str, DefId, FxBuildHasher>,
}

#[derive(Debug)]
pub struct TypeDef<'src> {
    pub name: &'src str,
    pub kind: TypeKind<'src>,
}

#[derive(Debug)]
pub enum TypeKind<'src> {
    Sum(SumDef<'src>),
    Product(ProductDef<'src>),
}

#[derive(Debug)]
pub struct SumDef<'src> {
    pub simple: bool,
    pub constructors: Vec<ConstructorDef<'src>>,
}

#[derive(Debug)]
pub struct ConstructorDef<'src> {
    pub name: &'src str,
    /// Only assigned when the owning sum is not simple.
    pub index: Option<u32>,
    pub fields: Vec<FieldDef<'src>>,
}

#[derive(Debug)]
pub struct ProductDef<'src> {
    pub index: u32,
    pub fields: Vec<FieldDef<'src>>,
}

#[derive(Debug)]
pub struct FieldDef<'src> {
    pub name: &'src str,
    pub ty: &'src str,
    pub seq: bool,
    pub opt: bool,
    pub resolved: Resolved,
}

/// What a field's declared type name refers to.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Resolved {
    Builtin(Builtin),
    /// A simple sum, represented by its integer constants.
    Enum(DefId),
    /// A non-simple sum or a product.
    Node(DefId),
    /// Neither a built-in nor defined by the grammar.
    Opaque,
}

impl FieldDef<'_> {
    /// Back-reference to the definition named by the field's type.
    #[inline]
    pub fn typedef(&self) -> Option<DefId> {
        match self.resolved {
            Resolved::Enum(id) | Resolved::Node(id) => Some(id),
            Resolved::Builtin(_) | Resolved::Opaque => None,
        }
    }

    /// Whether the field holds child nodes that traversal descends into.
    #[inline]
    pub fn is_child(&self) -> bool {
        matches!(self.resolved, Resolved::Node(_))
    }
}

impl<'src> Grammar<'src> {
    #[inline]
    pub fn get(&self, id: DefId) -> &TypeDef<'src> {
        &self.definitions[id.index()]
    }

    #[inline]
    pub fn lookup(&self, name: &str) -> Option<&TypeDef<'src>> {
        self.table.get(name).map(|id| self.get(*id))
    }

    /// Constructors of non-simple sums, in declaration order.
    ///
    /// These are the only node kinds with a dedicated visit method.
    pub fn visitable_constructors(&self) -> impl Iterator<Item = &ConstructorDef<'src>> + '_ {
        self.definitions
            .iter()
            .filter_map(|def| match &def.kind {
                TypeKind::Sum(sum) if !sum.simple => Some(&sum.constructors),
                _ => None,
            })
            .flatten()
    }
}

impl TypeDef<'_> {
    #[inline]
    pub fn is_simple_sum(&self) -> bool {
        matches!(&self.kind, TypeKind::Sum(sum) if sum.simple)
    }
}

pub fn analyze<'src>(module: &Module<'src>) -> Grammar<'src> {
    let mut table = HashMap::with_capacity_and_hasher(module.definitions.len(), FxBuildHasher);
    for (i, definition) in module.definitions.iter().enumerate() {
        table.entry(*definition.name).or_insert(DefId(i as u32));
    }

    let mut analyzer = Analyzer {
        module,
        table: &table,
        next_index: 1,
    };
    let definitions = module
        .definitions
        .iter()
        .map(|definition| TypeDef {
            name: *definition.name,
            kind: analyzer.visit_type(&definition.value),
        })
        .collect();

    tracing::debug!(
        module = *module.name,
        definitions = module.definitions.len(),
        indices = analyzer.next_index - 1,
        "analyzed grammar"
    );

    Grammar {
        name: *module.name,
        definitions,
        table,
    }
}

struct Analyzer<'a, 'src> {
    module: &'a Module<'src>,
    table: &'a HashMap<&'src str, DefId, FxBuildHasher>,
    next_index: u32,
}

impl<'src> Analyzer<'_, 'src> {
    fn make_index(&mut self) -> u32 {
        let index = self.next_index;
        self.next_index += 1;
        index
    }

    fn visit_type(&mut self, ty: &Type<'src>) -> TypeKind<'src> {
        match ty {
            Type::Sum(sum) => {
                let simple = is_simple(sum);
                let constructors = sum
                    .constructors
                    .iter()
                    .map(|constructor| ConstructorDef {
                        name: *constructor.name,
                        index: (!simple).then(|| self.make_index()),
                        fields: self.visit_fields(&constructor.fields),
                    })
                    .collect();
                TypeKind::Sum(SumDef {
                    simple,
                    constructors,
                })
            }
            Type::Product(product) => TypeKind::Product(ProductDef {
                index: self.make_index(),
                fields: self.visit_fields(&product.fields),
            }),
        }
    }

    fn visit_fields(&self, fields: &[grammar::Field<'src>]) -> Vec<FieldDef<'src>> {
        fields
            .iter()
            .map(|field| FieldDef {
                name: field.name(),
                ty: *field.ty,
                seq: field.seq,
                opt: field.opt,
                resolved: self.resolve(*field.ty),
            })
            .collect()
    }

    fn resolve(&self, ty: &str) -> Resolved {
        if let Some(builtin) = Builtin::from_name(ty) {
            return Resolved::Builtin(builtin);
        }
        let Some(id) = self.table.get(ty).copied() else {
            return Resolved::Opaque;
        };
        match &self.module.definitions[id.index()].value {
            Type::Sum(sum) if is_simple(sum) => Resolved::Enum(id),
            _ => Resolved::Node(id),
        }
    }
}

/// A sum is simple iff none of its constructors declares a field.
fn is_simple(sum: &grammar::Sum<'_>) -> bool {
    sum.constructors.iter().all(|c| c.fields.is_empty())
}
