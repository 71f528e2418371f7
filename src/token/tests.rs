use super::{TokenKind, tokenize};

fn kinds(src: &str) -> Vec<TokenKind> {
    let tokens = tokenize(src);
    tokens.cursor().map(|t| tokens.kind(t)).collect()
}

#[test]
fn punctuation_and_idents() {
    use TokenKind as T;
    assert_eq!(
        kinds("expr = BinOp(expr left, expr* right, int? n) | Num"),
        vec![
            T::Ident,
            T::Eq,
            T::Ident,
            T::ParenL,
            T::Ident,
            T::Ident,
            T::Comma,
            T::Ident,
            T::Star,
            T::Ident,
            T::Comma,
            T::Ident,
            T::Question,
            T::Ident,
            T::ParenR,
            T::Pipe,
            T::Ident,
        ]
    );
}

#[test]
fn comments_and_whitespace_are_skipped() {
    let src = "-- header comment\nmodule\tPython -- trailing\r\n{ }";
    assert_eq!(
        kinds(src),
        vec![
            TokenKind::Ident,
            TokenKind::Ident,
            TokenKind::BraceL,
            TokenKind::BraceR
        ]
    );
}

#[test]
fn version_string() {
    let src = r#"module M version "$Revision: 1.2 $" {}"#;
    let tokens = tokenize(src);
    let strings: Vec<_> = tokens
        .cursor()
        .filter(|t| tokens.kind(*t) == TokenKind::String)
        .map(|t| tokens.lexeme(t))
        .collect();
    assert_eq!(strings, vec![r#""$Revision: 1.2 $""#]);
}

#[test]
fn unknown_characters_are_errors() {
    assert_eq!(
        kinds("a ; b"),
        vec![TokenKind::Ident, TokenKind::Error, TokenKind::Ident]
    );
}

#[test]
fn debug_output() {
    let tokens = tokenize("x = (int)");
    insta::assert_snapshot!(format!("{tokens:?}"), @r#"[Ident("x", 0..1), Eq("=", 2..3), ParenL("(", 4..5), Ident("int", 5..8), ParenR(")", 8..9)]"#);
}

#[test]
fn lexeme_past_end_is_eof() {
    let tokens = tokenize("x");
    let mut cursor = tokens.cursor();
    cursor.advance();
    assert_eq!(tokens.kind(cursor.current()), TokenKind::Eof);
    assert_eq!(tokens.lexeme(cursor.current()), "<eof>");
}
