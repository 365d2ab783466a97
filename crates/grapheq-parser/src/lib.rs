//! Parser for GraphEq's strict algebraic grammar.
//!
//! Consumes the token stream produced by `grapheq-lexer` (after
//! normalization) and builds `grapheq_symbolic::Expr` trees directly.
//! Precedence, loosest to tightest: `+`/`-`, `*`//, unary `-`, `^`
//! (right-associative).

use grapheq_lexer::{tokenize_detailed, SpannedToken, Token};
use grapheq_symbolic::{Coefficient, Expr};
use thiserror::Error;

mod equation;

pub use equation::{parse_input, Equation, Parsed};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    #[error("expected exactly one equals sign")]
    MultipleEquals,
    #[error("{message} at position {position}")]
    Syntax { message: String, position: usize },
}

impl ParseError {
    fn syntax(message: impl Into<String>, position: usize) -> Self {
        ParseError::Syntax {
            message: message.into(),
            position,
        }
    }
}

/// Parse a single normalized expression (no `=`).
pub fn parse_expression(input: &str) -> Result<Expr, ParseError> {
    let tokens = tokenize_detailed(input);
    let mut parser = Parser {
        tokens,
        pos: 0,
        input_len: input.len(),
    };
    let expr = parser.parse_sum()?;
    match parser.peek() {
        None => Ok(expr),
        Some(t) => Err(ParseError::syntax(
            format!("unexpected `{}`", t.lexeme),
            t.start,
        )),
    }
}

struct Parser {
    tokens: Vec<SpannedToken>,
    pos: usize,
    input_len: usize,
}

impl Parser {
    fn peek(&self) -> Option<&SpannedToken> {
        self.tokens.get(self.pos)
    }

    fn advance(&mut self) -> Option<&SpannedToken> {
        let t = self.tokens.get(self.pos);
        if t.is_some() {
            self.pos += 1;
        }
        t
    }

    fn eat(&mut self, token: Token) -> bool {
        if self.peek().map(|t| t.token) == Some(token) {
            self.pos += 1;
            true
        } else {
            false
        }
    }

    fn parse_sum(&mut self) -> Result<Expr, ParseError> {
        let mut terms = vec![self.parse_product()?];
        loop {
            if self.eat(Token::Plus) {
                terms.push(self.parse_product()?);
            } else if self.eat(Token::Minus) {
                terms.push(Expr::neg(self.parse_product()?));
            } else {
                break;
            }
        }
        Ok(Expr::add(terms))
    }

    fn parse_product(&mut self) -> Result<Expr, ParseError> {
        let mut acc = self.parse_unary()?;
        loop {
            if self.eat(Token::Star) {
                acc = Expr::mul(vec![acc, self.parse_unary()?]);
            } else if self.eat(Token::Slash) {
                acc = Expr::div(acc, self.parse_unary()?);
            } else {
                break;
            }
        }
        Ok(acc)
    }

    fn parse_unary(&mut self) -> Result<Expr, ParseError> {
        if self.eat(Token::Minus) {
            return Ok(Expr::neg(self.parse_unary()?));
        }
        if self.eat(Token::Plus) {
            return self.parse_unary();
        }
        self.parse_power()
    }

    fn parse_power(&mut self) -> Result<Expr, ParseError> {
        let base = self.parse_atom()?;
        if self.eat(Token::Caret) {
            // Right-associative; the exponent may carry its own sign.
            let exp = self.parse_unary()?;
            return Ok(Expr::pow(base, exp));
        }
        Ok(base)
    }

    fn parse_atom(&mut self) -> Result<Expr, ParseError> {
        let Some(token) = self.advance() else {
            return Err(ParseError::syntax(
                "unexpected end of expression",
                self.input_len,
            ));
        };
        let (kind, lexeme, start) = (token.token, token.lexeme.clone(), token.start);
        match kind {
            Token::Integer => match lexeme.parse::<i64>() {
                Ok(n) => Ok(Expr::int(n)),
                Err(_) => match lexeme.parse::<f64>() {
                    Ok(f) => Ok(Expr::num(Coefficient::float(f))),
                    Err(_) => Err(ParseError::syntax("invalid number", start)),
                },
            },
            Token::Float => lexeme
                .parse::<f64>()
                .map(|f| Expr::num(Coefficient::from_f64_exact(f)))
                .map_err(|_| ParseError::syntax("invalid number", start)),
            Token::Ident => Ok(Expr::var(lexeme)),
            Token::LParen => {
                let inner = self.parse_sum()?;
                if self.eat(Token::RParen) {
                    Ok(inner)
                } else {
                    let pos = self.peek().map(|t| t.start).unwrap_or(self.input_len);
                    Err(ParseError::syntax("expected `)`", pos))
                }
            }
            _ => Err(ParseError::syntax(format!("unexpected `{lexeme}`"), start)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use grapheq_symbolic::canonicalize;

    #[test]
    fn precedence_and_associativity() {
        // 1 + 2 * 3 = 7
        let e = canonicalize(&parse_expression("1 + 2 * 3").unwrap());
        assert_eq!(e, Expr::int(7));
        // 2 ^ 3 ^ 2 is right-associative: 2^9 = 512
        let e = canonicalize(&parse_expression("2 ^ 3 ^ 2").unwrap());
        assert_eq!(e, Expr::int(512));
    }

    #[test]
    fn unary_minus_binds_looser_than_power() {
        // -2^2 = -(2^2) = -4
        let e = canonicalize(&parse_expression("-2^2").unwrap());
        assert_eq!(e, Expr::int(-4));
    }

    #[test]
    fn signed_exponents() {
        let e = parse_expression("x^-2").unwrap();
        assert_eq!(e, Expr::pow(Expr::var("x"), Expr::neg(Expr::int(2))));
    }

    #[test]
    fn division_becomes_reciprocal_multiplication() {
        let e = canonicalize(&parse_expression("4 / 2").unwrap());
        assert_eq!(e, Expr::int(2));
    }

    #[test]
    fn errors_carry_positions() {
        let err = parse_expression("2 + @").unwrap_err();
        assert!(matches!(err, ParseError::Syntax { position: 4, .. }));

        let err = parse_expression("(x + 1").unwrap_err();
        assert!(matches!(err, ParseError::Syntax { .. }));

        let err = parse_expression("x y").unwrap_err();
        assert!(matches!(err, ParseError::Syntax { position: 2, .. }));
    }
}
