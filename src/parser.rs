use crate::{
    error::{Result, error_span},
    grammar::{Constructor, Definition, Field, Module, Product, Sum, Type},
    span::{Span, Spanned},
    token::{Token, TokenCursor, TokenKind, Tokens},
};


pub fn parse<'src>(tokens: &Tokens<'src>) -> Result<Module<'src>> {
    let mut p = State::new(tokens);
    parse_module(&mut p)
}

struct State<'t, 'src> {
    cursor: TokenCursor<'src, 't>,
}

impl<'t, 'src> State<'t, 'src> {
    fn new(tokens: &'t Tokens<'src>) -> Self {
        Self {
            cursor: tokens.cursor(),
        }
    }

    #[inline]
    fn kind(&self) -> TokenKind {
        let token = self.cursor.current();
        self.cursor.kind(token)
    }

    #[inline]
    fn lexeme(&self) -> &'src str {
        self.cursor.lexeme(self.cursor.current())
    }

    #[inline]
    fn span(&self) -> Span {
        self.cursor.span(self.cursor.current())
    }

    #[inline]
    fn advance(&mut self) {
        self.cursor.advance();
    }

    /// Iff current token is `kind`, returns `true`.
    ///
    /// Does not advance.
    #[inline]
    fn at(&self, kind: TokenKind) -> bool {
        self.kind() == kind
    }

    /// Iff current token is the identifier `keyword`, returns `true`.
    #[inline]
    fn at_keyword(&self, keyword: &str) -> bool {
        self.at(t![ident]) && self.lexeme() == keyword
    }

    /// Iff current token is `kind` advances and returns `true`,
    /// otherwise returns `false` without advancing.
    #[inline]
    fn eat(&mut self, kind: TokenKind) -> bool {
        if self.at(kind) {
            self.advance();
            true
        } else {
            false
        }
    }

    /// Iff current token is `kind`, returns `Ok(token)` and advances,
    /// otherwise returns `Err` without advancing.
    #[inline]
    fn must(&mut self, kind: TokenKind) -> Result<Token> {
        let tok = self.cursor.current();
        if self.eat(kind) {
            Ok(tok)
        } else {
            error_span(
                format!(
                    "expected '{}', found '{}'",
                    kind.bare_lexeme(),
                    self.cursor.lexeme(tok)
                ),
                self.cursor.span(tok),
            )
            .into()
        }
    }

    fn must_keyword(&mut self, keyword: &'static str) -> Result<()> {
        if self.at_keyword(keyword) {
            self.advance();
            Ok(())
        } else {
            error_span(
                format!("expected '{keyword}', found '{}'", self.lexeme()),
                self.span(),
            )
            .into()
        }
    }
}

/// `"module" name:IDENT ("version" STRING)? "{" definition* "}"`
fn parse_module<'src>(p: &mut State<'_, 'src>) -> Result<Module<'src>> {
    p.must_keyword("module")?;
    let name = parse_ident(p)?;

    let version = if p.at_keyword("version") {
        p.advance();
        let tok = p.must(t![str])?;
        let lexeme = p.cursor.lexeme(tok);
        Some(&lexeme[1..lexeme.len() - 1])
    } else {
        None
    };

    p.must(t!["{"])?;
    let mut definitions = Vec::new();
    while !p.at(t!["}"]) && !p.at(t![EOF]) {
        definitions.push(parse_definition(p)?);
    }
    p.must(t!["}"])?;

    if !p.at(t![EOF]) {
        return error_span(
            format!("unexpected '{}' after module body", p.lexeme()),
            p.span(),
        )
        .into();
    }

    Ok(Module {
        name,
        version,
        definitions,
    })
}

/// `name:IDENT "=" (product | sum)`
fn parse_definition<'src>(p: &mut State<'_, 'src>) -> Result<Definition<'src>> {
    let name = parse_ident(p)?;
    p.must(t![=])?;

    let value = if p.at(t!["("]) {
        Type::Product(Product {
            fields: parse_fields(p)?,
        })
    } else {
        Type::Sum(parse_sum(p)?)
    };

    Ok(Definition { name, value })
}

/// `constructor ("|" constructor)* ("attributes" fields)?`
fn parse_sum<'src>(p: &mut State<'_, 'src>) -> Result<Sum<'src>> {
    let mut constructors = vec![parse_constructor(p)?];
    while p.eat(t![|]) {
        constructors.push(parse_constructor(p)?);
    }

    let attributes = if p.at_keyword("attributes") {
        p.advance();
        parse_fields(p)?
    } else {
        Vec::new()
    };

    Ok(Sum {
        constructors,
        attributes,
    })
}

/// `name:IDENT fields?`
fn parse_constructor<'src>(p: &mut State<'_, 'src>) -> Result<Constructor<'src>> {
    let name = parse_ident(p)?;
    let fields = if p.at(t!["("]) {
        parse_fields(p)?
    } else {
        Vec::new()
    };
    Ok(Constructor { name, fields })
}

/// `"(" field ("," field)* ")"`
fn parse_fields<'src>(p: &mut State<'_, 'src>) -> Result<Vec<Field<'src>>> {
    p.must(t!["("])?;
    let mut fields = vec![parse_field(p)?];
    while p.eat(t![,]) {
        fields.push(parse_field(p)?);
    }
    p.must(t![")"])?;
    Ok(fields)
}

/// `ty:IDENT ("*" | "?")? name:IDENT?`
fn parse_field<'src>(p: &mut State<'_, 'src>) -> Result<Field<'src>> {
    let ty = parse_ident(p)?;
    let seq = p.eat(t![*]);
    let opt = !seq && p.eat(t![?]);
    if seq && p.at(t![?]) {
        return error_span("a field cannot be both a sequence and optional", p.span()).into();
    }
    let name = if p.at(t![ident]) {
        Some(parse_ident(p)?)
    } else {
        None
    };
    Ok(Field { ty, name, seq, opt })
}

fn parse_ident<'src>(p: &mut State<'_, 'src>) -> Result<Spanned<&'src str>> {
    let tok = p.must(t![ident])?;
    Ok(Spanned::new(p.cursor.lexeme(tok), p.cursor.span(tok)))
}
