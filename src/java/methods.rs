//! The per-class method set: constructor, `hashCode`, `equals`,
//! `createCopy`, `toString`, `accept` and `traverse`.
//!
//! Every method is derived from the analyzed field list at generation time;
//! the generated code never reflects over its own types.

use super::{JavaType, field_decl, type_class};
use crate::{
    analysis::{FieldDef, Grammar, Resolved},
    emit::Artifact,
    generate::Options,
};

pub(super) struct Methods<'a, 'src> {
    pub grammar: &'a Grammar<'src>,
    pub options: &'a Options,
    /// Name used in `toString` and for the visit method.
    pub class_name: &'a str,
    /// Name of the Java class being generated.
    pub ctor_name: &'a str,
    pub fields: &'a [FieldDef<'src>],
    /// Sequence field whose first element's position is copied onto the node.
    pub position_from: Option<&'a str>,
}

impl Methods<'_, '_> {
    pub fn emit(&self, out: &mut Artifact, depth: usize) {
        self.constructor(out, depth);
        self.hash_code(out, depth);
        self.equals(out, depth);
        self.create_copy(out, depth);
        self.to_string(out, depth);
        self.accept(out, depth);
        self.traverse(out, depth);
    }

    fn ty(&self, field: &FieldDef<'_>) -> JavaType {
        JavaType::of(field, self.grammar)
    }

    fn constructor(&self, out: &mut Artifact, depth: usize) {
        let params = self
            .fields
            .iter()
            .map(|f| field_decl(f, self.grammar))
            .collect::<Vec<_>>()
            .join(", ");

        ln!(out, depth, "public {}({params}) {{", self.ctor_name);
        for field in self.fields {
            ln!(out, depth + 1, "this.{0} = {0};", field.name);
        }
        if let Some(f) = self.position_from {
            ml!(
                out,
                depth + 1,
                "
                if({f} != null && {f}.length > 0){{
                    beginColumn = {f}[0].beginColumn;
                    beginLine = {f}[0].beginLine;
                }}
                "
            );
        }
        ln!(out, depth, "}}");
        out.blank();
    }

    fn hash_code(&self, out: &mut Artifact, depth: usize) {
        ln!(out, depth, "public int hashCode() {{");
        ln!(out, depth + 1, "final int prime = 31;");
        ln!(out, depth + 1, "int result = 1;");
        for field in self.fields {
            let f = field.name;
            let contribution = match self.ty(field) {
                _ if field.seq => format!("Arrays.hashCode({f})"),
                JavaType::Int => f.to_owned(),
                JavaType::Boolean => format!("({f} ? 17 : 137)"),
                _ => format!("(({f} == null) ? 0 : {f}.hashCode())"),
            };
            ln!(out, depth + 1, "result = prime * result + {contribution};");
        }
        ln!(out, depth + 1, "return result;");
        ln!(out, depth, "}}");
        out.blank();
    }

    fn equals(&self, out: &mut Artifact, depth: usize) {
        let ctor = self.ctor_name;
        ln!(out, depth, "public boolean equals(Object obj) {{");
        ln!(out, depth + 1, "if (this == obj) return true;");
        ln!(out, depth + 1, "if (obj == null) return false;");
        ln!(out, depth + 1, "if (getClass() != obj.getClass()) return false;");
        ln!(out, depth + 1, "{ctor} other = ({ctor}) obj;");
        for field in self.fields {
            let f = field.name;
            if field.seq {
                ln!(out, depth + 1, "if (!Arrays.equals({f}, other.{f})) return false;");
            } else if self.ty(field).is_primitive() {
                ln!(out, depth + 1, "if(this.{f} != other.{f}) return false;");
            } else {
                ln!(out, depth + 1, "if ({f} == null) {{ if (other.{f} != null) return false;}}");
                ln!(out, depth + 1, "else if (!{f}.equals(other.{f})) return false;");
            }
        }
        ln!(out, depth + 1, "return true;");
        ln!(out, depth, "}}");
        out.blank();
    }

    fn create_copy(&self, out: &mut Artifact, depth: usize) {
        let ctor = self.ctor_name;
        ln!(out, depth, "public {ctor} createCopy() {{");
        ln!(out, depth + 1, "return createCopy(true);");
        ln!(out, depth, "}}");

        ln!(out, depth, "public {ctor} createCopy(boolean copyComments) {{");
        let mut args = Vec::with_capacity(self.fields.len());
        let mut copies = 0;
        for field in self.fields {
            let f = field.name;
            let ty = self.ty(field);
            let jt = ty.name();
            match (field.seq, ty.is_node()) {
                (true, false) => {
                    let copy = format!("new{copies}");
                    ml!(
                        out,
                        depth + 1,
                        "
                        {jt}[] {copy};
                        if(this.{f} != null){{
                            {copy} = new {jt}[this.{f}.length];
                            System.arraycopy(this.{f}, 0, {copy}, 0, this.{f}.length);
                        }}else{{
                            {copy} = this.{f};
                        }}
                        "
                    );
                    args.push(copy);
                    copies += 1;
                }
                (true, true) => {
                    let copy = format!("new{copies}");
                    ml!(
                        out,
                        depth + 1,
                        "
                        {jt}[] {copy};
                        if(this.{f} != null){{
                            {copy} = new {jt}[this.{f}.length];
                            for(int i=0;i<this.{f}.length;i++){{
                                {copy}[i] = ({jt}) (this.{f}[i] != null? this.{f}[i].createCopy(copyComments):null);
                            }}
                        }}else{{
                            {copy} = this.{f};
                        }}
                        "
                    );
                    args.push(copy);
                    copies += 1;
                }
                (false, true) => {
                    args.push(format!("{f}!=null?({jt}){f}.createCopy(copyComments):null"));
                }
                (false, false) => args.push(f.to_owned()),
            }
        }

        ln!(out, depth + 1, "{ctor} temp = new {ctor}({});", args.join(", "));
        ln!(out, depth + 1, "temp.beginLine = this.beginLine;");
        ln!(out, depth + 1, "temp.beginColumn = this.beginColumn;");
        let comment = self.options.comment_type.as_str();
        for specials in ["Before", "After"] {
            ml!(
                out,
                depth + 1,
                "
                if(this.specials{specials} != null && copyComments){{
                    for(Object o:this.specials{specials}){{
                        if(o instanceof {comment}){{
                            {comment} c = ({comment}) o;
                            temp.getSpecials{specials}().add(c.createCopy(copyComments));
                        }}
                    }}
                }}
                "
            );
        }
        ln!(out, depth + 1, "return temp;");
        ln!(out, depth, "}}");
        out.blank();
    }

    fn to_string(&self, out: &mut Artifact, depth: usize) {
        ln!(out, depth, "public String toString() {{");
        ln!(out, depth + 1, "StringBuffer sb = new StringBuffer(\"{}[\");", self.class_name);
        for (i, field) in self.fields.iter().enumerate() {
            let f = field.name;
            ln!(out, depth + 1, "sb.append(\"{f}=\");");
            match field.resolved {
                Resolved::Enum(id) => {
                    let names = type_class(self.grammar.get(id).name);
                    ln!(out, depth + 1, "sb.append(dumpThis(this.{f}, {names}.{names}Names));");
                }
                _ => ln!(out, depth + 1, "sb.append(dumpThis(this.{f}));"),
            }
            if i + 1 != self.fields.len() {
                ln!(out, depth + 1, "sb.append(\", \");");
            }
        }
        ln!(out, depth + 1, "sb.append(\"]\");");
        ln!(out, depth + 1, "return sb.toString();");
        ln!(out, depth, "}}");
        out.blank();
    }

    fn accept(&self, out: &mut Artifact, depth: usize) {
        ln!(out, depth, "public Object accept(VisitorIF visitor) throws Exception {{");
        if self.class_name == self.ctor_name {
            ln!(out, depth + 1, "return visitor.visit{}(this);", self.class_name);
        } else {
            ln!(out, depth + 1, "traverse(visitor);");
            ln!(out, depth + 1, "return null;");
        }
        ln!(out, depth, "}}");
        out.blank();
    }

    fn traverse(&self, out: &mut Artifact, depth: usize) {
        ln!(out, depth, "public void traverse(VisitorIF visitor) throws Exception {{");
        for field in self.fields.iter().filter(|f| f.is_child()) {
            let f = field.name;
            if field.seq {
                ml!(
                    out,
                    depth + 1,
                    "
                    if ({f} != null) {{
                        for (int i = 0; i < {f}.length; i++) {{
                            if ({f}[i] != null){{
                                {f}[i].accept(visitor);
                            }}
                        }}
                    }}
                    "
                );
            } else {
                ml!(
                    out,
                    depth + 1,
                    "
                    if ({f} != null){{
                        {f}.accept(visitor);
                    }}
                    "
                );
            }
        }
        ln!(out, depth, "}}");
        out.blank();
    }
}
