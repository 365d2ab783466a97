//! Lexer for GraphEq's strict algebraic grammar.
//!
//! Raw user text goes through the [`normalize`] pipeline first; the token
//! stream produced here is what the parser consumes. `/` never survives
//! normalization of well-formed input but is accepted anyway so that
//! already-explicit notation keeps working.

use logos::Logos;

pub mod normalize;

pub use normalize::{normalize, RewritePass, TextNormalizer};

#[derive(Logos, Debug, PartialEq, Eq, Clone, Copy)]
#[logos(skip r"[ \t\r\n]+")]
pub enum Token {
    #[regex(r"[0-9]+\.[0-9]+")]
    Float,
    #[regex(r"[0-9]+")]
    Integer,
    #[regex(r"[a-zA-Z]+")]
    Ident,
    #[token("+")]
    Plus,
    #[token("-")]
    Minus,
    #[token("*")]
    Star,
    #[token("/")]
    Slash,
    #[token("^")]
    Caret,
    #[token("=")]
    Assign,
    #[token("(")]
    LParen,
    #[token(")")]
    RParen,

    /// Any character the grammar does not know. Lowest priority, so it
    /// only matches when nothing else does; the parser reports it with a
    /// position instead of the stream ending early.
    #[regex(r".", priority = 0)]
    Error,
}

/// A token together with its source slice and byte span.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpannedToken {
    pub token: Token,
    pub lexeme: String,
    pub start: usize,
    pub end: usize,
}

/// Tokenize, keeping only the token kinds.
pub fn tokenize(input: &str) -> Vec<Token> {
    tokenize_detailed(input)
        .into_iter()
        .map(|t| t.token)
        .collect()
}

/// Tokenize with lexemes and spans. Unrecognized characters become
/// `Token::Error` entries so the parser can report a position instead of
/// the stream silently ending early.
pub fn tokenize_detailed(input: &str) -> Vec<SpannedToken> {
    let mut lex = Token::lexer(input);
    let mut out = Vec::new();
    while let Some(res) = lex.next() {
        let span = lex.span();
        let token = res.unwrap_or(Token::Error);
        out.push(SpannedToken {
            token,
            lexeme: lex.slice().to_string(),
            start: span.start,
            end: span.end,
        });
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn numbers_and_idents() {
        assert_eq!(
            tokenize("x 12 4.5"),
            vec![Token::Ident, Token::Integer, Token::Float]
        );
    }

    #[test]
    fn unknown_characters_become_error_tokens() {
        let tokens = tokenize_detailed("x @ y");
        assert_eq!(tokens[1].token, Token::Error);
        assert_eq!(tokens[1].start, 2);
    }
}
