use super::emit_classes;
use crate::{
    analysis::analyze,
    emit::{Artifact, Prelude, render},
    error::Error,
    generate::Options,
    parser::parse,
    token::tokenize,
};

const PRELUDE: Prelude<'static> = Prelude {
    package: "org.example.ast",
    node_base: "org.example.SimpleNode",
};

fn classes_with(src: &str, options: &Options) -> Vec<Artifact> {
    let tokens = tokenize(src);
    let module = parse(&tokens).unwrap();
    emit_classes(&analyze(&module), options).unwrap()
}

fn classes(src: &str) -> Vec<Artifact> {
    let options = Options {
        node_base: PRELUDE.node_base.into(),
        ..Options::default()
    };
    classes_with(src, &options)
}

fn find<'a>(artifacts: &'a [Artifact], name: &str) -> &'a Artifact {
    artifacts
        .iter()
        .find(|a| a.name == name)
        .unwrap_or_else(|| panic!("no artifact named {name}"))
}

fn has_line(artifact: &Artifact, text: &str) -> bool {
    artifact.lines.iter().any(|l| l.text.trim() == text)
}

/// The rendered method starting with `header`, dedented, up to its closing
/// brace.
fn method(artifact: &Artifact, header: &str) -> String {
    let text = render(artifact, PRELUDE).unwrap();
    let mut lines = text.lines().skip_while(|l| !l.trim_start().starts_with(header));
    let first = lines.next().unwrap();
    let indent = first.len() - first.trim_start().len();
    let close = format!("{:indent$}}}", "");

    let mut out = vec![&first[indent..]];
    for line in lines {
        out.push(line.get(indent..).unwrap_or(""));
        if line == close {
            break;
        }
    }
    out.join("\n")
}

const EXPR: &str = "module M {
    expr = BinOp(expr left, operator op, expr right) | Num(object n)
    operator = Add | Sub
}";

#[test]
fn simple_sum_becomes_constants_and_name_table() {
    let artifacts = classes("module M { boolop = And | Or }");
    assert_eq!(artifacts.len(), 1);
    insta::assert_snapshot!(render(&artifacts[0], PRELUDE).unwrap(), @r#"
    // Autogenerated AST node
    package org.example.ast;

    public interface boolopType {
        public static final int And = 1;
        public static final int Or = 2;

        public static final String[] boolopTypeNames = new String[] {
            "<undef>",
            "And",
            "Or",
        };
    }
    "#);
}

#[test]
fn non_simple_sum_gets_base_and_one_class_per_constructor() {
    let artifacts = classes(EXPR);
    let names: Vec<_> = artifacts.iter().map(|a| a.name.as_str()).collect();
    assert_eq!(names, ["exprType", "BinOp", "Num", "operatorType"]);

    insta::assert_snapshot!(render(&artifacts[0], PRELUDE).unwrap(), @r"
    // Autogenerated AST node
    package org.example.ast;
    import org.example.SimpleNode;
    import java.util.Arrays;

    public abstract class exprType extends SimpleNode {
    }
    ");

    let bin_op = find(&artifacts, "BinOp");
    assert!(has_line(bin_op, "public final class BinOp extends exprType implements operatorType {"));
    assert!(has_line(bin_op, "public exprType left;"));
    assert!(has_line(bin_op, "public int op;"));
    assert!(has_line(bin_op, "public BinOp(exprType left, int op, exprType right) {"));
    assert!(has_line(bin_op, "return visitor.visitBinOp(this);"));

    let num = find(&artifacts, "Num");
    assert!(has_line(num, "public final class Num extends exprType {"));
    assert!(has_line(num, "public Object n;"));
    assert!(has_line(num, "return visitor.visitNum(this);"));
}

#[test]
fn hash_code_combines_fields_in_order() {
    let artifacts = classes(EXPR);
    insta::assert_snapshot!(method(find(&artifacts, "BinOp"), "public int hashCode()"), @r"
    public int hashCode() {
        final int prime = 31;
        int result = 1;
        result = prime * result + ((left == null) ? 0 : left.hashCode());
        result = prime * result + op;
        result = prime * result + ((right == null) ? 0 : right.hashCode());
        return result;
    }
    ");
}

#[test]
fn booleans_hash_to_sentinels_and_compare_directly() {
    let artifacts = classes("module M { flag = (bool on, int n, string? label) }");
    let flag = find(&artifacts, "flagType");
    assert!(has_line(flag, "result = prime * result + (on ? 17 : 137);"));
    assert!(has_line(flag, "result = prime * result + n;"));
    assert!(has_line(flag, "if(this.on != other.on) return false;"));
    assert!(has_line(flag, "if(this.n != other.n) return false;"));
    assert!(has_line(flag, "if (label == null) { if (other.label != null) return false;}"));
}

#[test]
fn product_compares_sequences_structurally() {
    let src = "module M {
        expr = Num(object n)
        comprehension = (expr target, expr iter, expr* ifs)
    }";
    let artifacts = classes(src);
    let comprehension = find(&artifacts, "comprehensionType");

    assert!(has_line(comprehension, "public final class comprehensionType extends SimpleNode {"));
    assert!(has_line(comprehension, "public exprType target;"));
    assert!(has_line(comprehension, "public exprType[] ifs;"));
    insta::assert_snapshot!(method(comprehension, "public boolean equals("), @r"
    public boolean equals(Object obj) {
        if (this == obj) return true;
        if (obj == null) return false;
        if (getClass() != obj.getClass()) return false;
        comprehensionType other = (comprehensionType) obj;
        if (target == null) { if (other.target != null) return false;}
        else if (!target.equals(other.target)) return false;
        if (iter == null) { if (other.iter != null) return false;}
        else if (!iter.equals(other.iter)) return false;
        if (!Arrays.equals(ifs, other.ifs)) return false;
        return true;
    }
    ");
}

#[test]
fn products_dispatch_through_traverse() {
    let src = "module M {
        expr = Num(object n)
        comprehension = (expr target, expr iter, expr* ifs)
    }";
    let artifacts = classes(src);
    insta::assert_snapshot!(method(find(&artifacts, "comprehensionType"), "public Object accept("), @r"
    public Object accept(VisitorIF visitor) throws Exception {
        traverse(visitor);
        return null;
    }
    ");
}

#[test]
fn traverse_skips_builtins_and_enums() {
    let src = "module M {
        expr = Compare(expr left, cmpop* ops, expr* comparators, identifier id, Thing ext)
        cmpop = Eq | Lt
    }";
    let artifacts = classes(src);
    insta::assert_snapshot!(method(find(&artifacts, "Compare"), "public void traverse("), @r"
    public void traverse(VisitorIF visitor) throws Exception {
        if (left != null){
            left.accept(visitor);
        }
        if (comparators != null) {
            for (int i = 0; i < comparators.length; i++) {
                if (comparators[i] != null){
                    comparators[i].accept(visitor);
                }
            }
        }
    }
    ");
}

#[test]
fn create_copy_deep_copies_nodes_only() {
    let src = "module M {
        stmt = Compare(e left, cmpop* ops, e* cs, identifier* names, Thing ext)
        e = Num(object n)
        cmpop = Eq | Lt
    }";
    let artifacts = classes(src);
    let compare = find(&artifacts, "Compare");

    insta::assert_snapshot!(method(compare, "public Compare createCopy(boolean"), @r"
    public Compare createCopy(boolean copyComments) {
        int[] new0;
        if(this.ops != null){
            new0 = new int[this.ops.length];
            System.arraycopy(this.ops, 0, new0, 0, this.ops.length);
        }else{
            new0 = this.ops;
        }
        eType[] new1;
        if(this.cs != null){
            new1 = new eType[this.cs.length];
            for(int i=0;i<this.cs.length;i++){
                new1[i] = (eType) (this.cs[i] != null? this.cs[i].createCopy(copyComments):null);
            }
        }else{
            new1 = this.cs;
        }
        String[] new2;
        if(this.names != null){
            new2 = new String[this.names.length];
            System.arraycopy(this.names, 0, new2, 0, this.names.length);
        }else{
            new2 = this.names;
        }
        Compare temp = new Compare(left!=null?(eType)left.createCopy(copyComments):null, new0,
        new1, new2, ext);
        temp.beginLine = this.beginLine;
        temp.beginColumn = this.beginColumn;
        if(this.specialsBefore != null && copyComments){
            for(Object o:this.specialsBefore){
                if(o instanceof commentType){
                    commentType c = (commentType) o;
                    temp.getSpecialsBefore().add(c.createCopy(copyComments));
                }
            }
        }
        if(this.specialsAfter != null && copyComments){
            for(Object o:this.specialsAfter){
                if(o instanceof commentType){
                    commentType c = (commentType) o;
                    temp.getSpecialsAfter().add(c.createCopy(copyComments));
                }
            }
        }
        return temp;
    }
    ");
}

#[test]
fn to_string_dumps_enums_through_their_name_table() {
    let artifacts = classes(EXPR);
    insta::assert_snapshot!(method(find(&artifacts, "BinOp"), "public String toString()"), @r#"
    public String toString() {
        StringBuffer sb = new StringBuffer("BinOp[");
        sb.append("left=");
        sb.append(dumpThis(this.left));
        sb.append(", ");
        sb.append("op=");
        sb.append(dumpThis(this.op, operatorType.operatorTypeNames));
        sb.append(", ");
        sb.append("right=");
        sb.append(dumpThis(this.right));
        sb.append("]");
        return sb.toString();
    }
    "#);
}

#[test]
fn implements_each_enum_once() {
    let src = "module M {
        expr = Cmp(cmpop a, cmpop b, boolop c, expr d)
        cmpop = Eq | Lt
        boolop = And | Or
    }";
    let artifacts = classes(src);
    assert!(has_line(
        find(&artifacts, "Cmp"),
        "public final class Cmp extends exprType implements cmpopType, boolopType {"
    ));
}

#[test]
fn opaque_types_are_held_by_reference() {
    let artifacts = classes("module M { expr = Lit(Thing t) }");
    let lit = find(&artifacts, "Lit");
    assert!(has_line(lit, "public ThingType t;"));
    assert!(has_line(lit, "Lit temp = new Lit(t);"));
    assert!(has_line(lit, "sb.append(dumpThis(this.t));"));
    assert!(!has_line(lit, "t.accept(visitor);"));
}

const SUITE: &str = "module M {
    stmt = Pass | If(expr test, stmt* body, suite? orelse)
    expr = Num(object n)
    suite = Suite(stmt* body)
}";

#[test]
fn hoisted_field_moves_to_the_base_class() {
    let artifacts = classes(SUITE);

    insta::assert_snapshot!(render(find(&artifacts, "suiteType"), PRELUDE).unwrap(), @r"
    // Autogenerated AST node
    package org.example.ast;
    import org.example.SimpleNode;
    import java.util.Arrays;

    public abstract class suiteType extends SimpleNode {
        public stmtType[] body;
    }
    ");

    let suite = find(&artifacts, "Suite");
    assert!(!has_line(suite, "public stmtType[] body;"));
    insta::assert_snapshot!(method(suite, "public Suite(stmtType[] body)"), @r"
    public Suite(stmtType[] body) {
        this.body = body;
        if(body != null && body.length > 0){
            beginColumn = body[0].beginColumn;
            beginLine = body[0].beginLine;
        }
    }
    ");

    // only the hoisted sum is affected
    let if_ = find(&artifacts, "If");
    assert!(has_line(if_, "public stmtType[] body;"));
    assert!(!has_line(if_, "if(body != null && body.length > 0){"));
}

#[test]
fn empty_hoist_table_keeps_fields_on_constructors() {
    let options = Options {
        hoisted: Vec::new(),
        ..Options::default()
    };
    let artifacts = classes_with(SUITE, &options);

    assert_eq!(find(&artifacts, "suiteType").lines.len(), 2);
    let suite = find(&artifacts, "Suite");
    assert!(has_line(suite, "public stmtType[] body;"));
    assert!(!has_line(suite, "if(body != null && body.length > 0){"));
}

#[test]
fn repeated_hoist_entry_declares_the_field_once() {
    let options = Options {
        hoisted: vec!["suite.body".parse().unwrap(), "suite.body".parse().unwrap()],
        ..Options::default()
    };
    let artifacts = classes_with(SUITE, &options);

    let base = find(&artifacts, "suiteType");
    assert_eq!(base.lines.len(), 3);
    let declared = base
        .lines
        .iter()
        .filter(|l| l.text == "public stmtType[] body;")
        .count();
    assert_eq!(declared, 1);
}

#[test]
fn conflicting_hoisted_field_types_are_rejected() {
    let tokens = tokenize("module M { suite = Suite(stmt* body) | Single(stmt body) }");
    let module = parse(&tokens).unwrap();
    let err = emit_classes(&analyze(&module), &Options::default()).unwrap_err();

    let Error::Hoist { sum, field, types } = &err else {
        panic!("expected hoist conflict");
    };
    assert_eq!((sum.as_str(), field.as_str()), ("suite", "body"));
    assert_eq!(types, &["stmtType[]", "stmtType"]);
    assert_eq!(
        err.to_string(),
        "hoisted field `suite.body` has conflicting types: stmtType[], stmtType"
    );
}

#[test]
fn custom_comment_type_and_base_class() {
    let options = Options {
        node_base: "org.example.Node".into(),
        comment_type: "Comment".into(),
        ..Options::default()
    };
    let artifacts = classes_with("module M { expr = Num(object n) }", &options);
    assert!(has_line(find(&artifacts, "exprType"), "public abstract class exprType extends Node {"));
    assert!(has_line(find(&artifacts, "Num"), "if(o instanceof Comment){"));
}

#[test]
fn rendered_classes_fit_the_column_limit() {
    let src = "module M {
        stmt = ClassDef(identifier name, expr* bases, stmt* body, decorator* decorators)
             | AugAssign(expr target, operator op, expr value)
        expr = Num(object n)
        operator = Add | Sub | Mult | Div | Mod | Pow | LShift | RShift | BitOr | BitXor
                 | BitAnd | FloorDiv | MatMult
        decorator = (expr func, expr* args, keyword* keywords, expr starargs, expr kwargs)
        keyword = (identifier arg, expr value)
    }";
    for artifact in classes(src) {
        let text = render(&artifact, PRELUDE).unwrap();
        for line in text.lines() {
            assert!(line.len() <= crate::emit::MAX_COL, "{}: {line}", artifact.name);
        }
    }
}
