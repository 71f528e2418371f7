use logos::Logos as _;

use crate::span::Span;

#[cfg(test)]
mod tests;

pub fn tokenize(src: &str) -> Tokens<'_> {
    let lexer = Lexer::new(src);
    let mut tokens = Tokens::new(src);

    for token in lexer {
        tokens.append(token);
    }

    tokens
}

pub struct Tokens<'src> {
    src: &'src str,
    kind: Vec<TokenKind>,
    span: Vec<Span>,
}

impl<'src> Tokens<'src> {
    fn new(src: &'src str) -> Self {
        // grammars are mostly identifiers and short punctuation
        let capacity = src.len() / 4;
        Self {
            src,
            kind: Vec::with_capacity(capacity),
            span: Vec::with_capacity(capacity),
        }
    }

    fn append(&mut self, token: RawToken) {
        self.kind.push(token.kind);
        self.span.push(token.span);
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.kind.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.kind.is_empty()
    }

    #[inline]
    pub fn cursor<'tokens>(&'tokens self) -> TokenCursor<'src, 'tokens> {
        TokenCursor {
            tokens: self,
            index: 0,
        }
    }

    #[inline]
    pub fn kind(&self, token: Token) -> TokenKind {
        match self.kind.get(token.index()) {
            Some(kind) => *kind,
            None => TokenKind::Eof,
        }
    }

    #[inline]
    pub fn span(&self, token: Token) -> Span {
        match self.span.get(token.index()) {
            Some(span) => *span,
            None => Span::from(self.src.len()..self.src.len()),
        }
    }

    #[inline]
    pub fn lexeme(&self, token: Token) -> &'src str {
        match self.kind(token) {
            TokenKind::Eof => "<eof>",
            _ => &self.src[self.span(token)],
        }
    }

    #[inline]
    pub fn debug<'tokens>(&'tokens self, token: Token) -> DebugToken<'src, 'tokens> {
        DebugToken {
            tokens: self,
            token,
        }
    }
}

impl std::fmt::Debug for Tokens<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut list = f.debug_list();
        for token in self.cursor() {
            list.entry(&self.debug(token));
        }
        list.finish()
    }
}

pub struct DebugToken<'src, 'tokens> {
    tokens: &'tokens Tokens<'src>,
    token: Token,
}

impl std::fmt::Debug for DebugToken<'_, '_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let kind = self.tokens.kind(self.token);
        let span = self.tokens.span(self.token);
        let lexeme = self.tokens.lexeme(self.token);

        write!(f, "{kind:?}({lexeme:?}, {span})")
    }
}

struct Lexer<'src> {
    inner: logos::SpannedIter<'src, TokenKind>,
}

impl<'src> Lexer<'src> {
    fn new(src: &'src str) -> Self {
        Self {
            inner: TokenKind::lexer(src).spanned(),
        }
    }
}

#[derive(Clone, Copy)]
struct RawToken {
    kind: TokenKind,
    span: Span,
}

impl Iterator for Lexer<'_> {
    type Item = RawToken;

    fn next(&mut self) -> Option<Self::Item> {
        let (kind, span) = self.inner.next()?;
        Some(RawToken {
            kind: kind.unwrap_or(TokenKind::Error),
            span: span.into(),
        })
    }
}

#[rustfmt::skip]
macro_rules! t {
    ("{") => ($crate::token::TokenKind::BraceL);
    ("}") => ($crate::token::TokenKind::BraceR);
    ("(") => ($crate::token::TokenKind::ParenL);
    (")") => ($crate::token::TokenKind::ParenR);
    (,) => ($crate::token::TokenKind::Comma);
    (=) => ($crate::token::TokenKind::Eq);
    (|) => ($crate::token::TokenKind::Pipe);
    (*) => ($crate::token::TokenKind::Star);
    (?) => ($crate::token::TokenKind::Question);

    (ident) => ($crate::token::TokenKind::Ident);
    (str) => ($crate::token::TokenKind::String);

    (EOF) => ($crate::token::TokenKind::Eof);
}

pub struct TokenCursor<'src, 'tokens> {
    tokens: &'tokens Tokens<'src>,
    index: usize,
}

impl<'src> TokenCursor<'src, '_> {
    #[inline]
    pub fn kind(&self, token: Token) -> TokenKind {
        self.tokens.kind(token)
    }

    #[inline]
    pub fn lexeme(&self, token: Token) -> &'src str {
        self.tokens.lexeme(token)
    }

    #[inline]
    pub fn span(&self, token: Token) -> Span {
        self.tokens.span(token)
    }

    #[inline]
    pub fn advance(&mut self) {
        let _ = self.next();
    }

    #[inline]
    pub fn current(&self) -> Token {
        Token(self.index as u32)
    }
}

impl Iterator for TokenCursor<'_, '_> {
    type Item = Token;

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        if self.index == self.tokens.len() {
            return None;
        }

        let token = self.current();
        self.index += 1;
        Some(token)
    }
}

#[derive(Clone, Copy)]
pub struct Token(u32);

impl Token {
    #[inline]
    fn index(&self) -> usize {
        self.0 as usize
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, logos::Logos)]
#[logos(skip r"[ \t\r\n\f]+")]
#[logos(skip r"--[^\n]*")]
pub enum TokenKind {
    #[token("{")]
    BraceL,
    #[token("}")]
    BraceR,
    #[token("(")]
    ParenL,
    #[token(")")]
    ParenR,
    #[token(",")]
    Comma,
    #[token("=")]
    Eq,
    #[token("|")]
    Pipe,
    #[token("*")]
    Star,
    #[token("?")]
    Question,

    /// Also covers the contextual keywords `module`, `version` and `attributes`.
    #[regex(r"[a-zA-Z_][a-zA-Z_0-9]*")]
    Ident,
    #[regex(r#""([^"\\]|\\.)*""#)]
    String,

    Error,
    Eof,
}

impl TokenKind {
    pub fn bare_lexeme(self) -> &'static str {
        match self {
            TokenKind::BraceL => "{",
            TokenKind::BraceR => "}",
            TokenKind::ParenL => "(",
            TokenKind::ParenR => ")",
            TokenKind::Comma => ",",
            TokenKind::Eq => "=",
            TokenKind::Pipe => "|",
            TokenKind::Star => "*",
            TokenKind::Question => "?",
            TokenKind::Ident => "identifier",
            TokenKind::String => "string",
            TokenKind::Error => "<error>",
            TokenKind::Eof => "<eof>",
        }
    }
}
