//! The dispatch contract shared by every node class.
//!
//! Only constructors of non-simple sums get a visit method; simple sums have
//! no node instances and products dispatch through `traverse`.

use crate::{
    analysis::Grammar,
    emit::{Artifact, Imports},
};

/// `VisitorIF`, `ISimpleNodeSwitch` and `VisitorBase`, in that order.
pub fn emit_visitors(grammar: &Grammar<'_>) -> Vec<Artifact> {
    let ctors: Vec<&str> = grammar.visitable_constructors().map(|c| c.name).collect();
    tracing::debug!(constructors = ctors.len(), "emitting visitor contract");

    vec![
        visitor_interface(&ctors),
        switch_interface(&ctors),
        visitor_base(&ctors),
    ]
}

fn visitor_interface(ctors: &[&str]) -> Artifact {
    let mut out = Artifact::new("VisitorIF", Imports::None);
    ln!(out, 0, "public interface VisitorIF {{");
    for ctor in ctors {
        ln!(out, 1, "public Object visit{ctor}({ctor} node) throws Exception;");
    }
    ln!(out, 0, "}}");
    out
}

fn switch_interface(ctors: &[&str]) -> Artifact {
    let mut out = Artifact::new("ISimpleNodeSwitch", Imports::None);
    ln!(out, 0, "public interface ISimpleNodeSwitch {{");
    for ctor in ctors {
        ln!(out, 1, "public void visit({ctor} node);");
    }
    ln!(out, 0, "}}");
    out
}

fn visitor_base(ctors: &[&str]) -> Artifact {
    let mut out = Artifact::new("VisitorBase", Imports::Node);
    ln!(out, 0, "public abstract class VisitorBase implements VisitorIF {{");
    for ctor in ctors {
        ml!(
            out,
            1,
            "
            public Object visit{ctor}({ctor} node) throws Exception {{
                Object ret = unhandled_node(node);
                traverse(node);
                return ret;
            }}
            "
        );
        out.blank();
    }
    ln!(out, 1, "abstract protected Object unhandled_node(SimpleNode node) throws Exception;");
    ln!(out, 1, "abstract public void traverse(SimpleNode node) throws Exception;");
    ln!(out, 0, "}}");
    out
}
