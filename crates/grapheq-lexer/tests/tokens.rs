use grapheq_lexer::{normalize, tokenize, tokenize_detailed, Token};

#[test]
fn operators() {
    assert_eq!(
        tokenize("+ - * / ^ = ( )"),
        vec![
            Token::Plus,
            Token::Minus,
            Token::Star,
            Token::Slash,
            Token::Caret,
            Token::Assign,
            Token::LParen,
            Token::RParen,
        ]
    );
}

#[test]
fn normalized_input_tokenizes_cleanly() {
    let src = normalize("2x+3=y^2");
    assert_eq!(
        tokenize(&src),
        vec![
            Token::Integer,
            Token::Star,
            Token::Ident,
            Token::Plus,
            Token::Integer,
            Token::Assign,
            Token::Ident,
            Token::Caret,
            Token::Integer,
        ]
    );
}

#[test]
fn spans_cover_the_source() {
    let tokens = tokenize_detailed("x + 41");
    assert_eq!(tokens.len(), 3);
    assert_eq!((tokens[0].start, tokens[0].end), (0, 1));
    assert_eq!(tokens[2].lexeme, "41");
    assert_eq!((tokens[2].start, tokens[2].end), (4, 6));
}

#[test]
fn whitespace_is_skipped() {
    assert_eq!(tokenize("  x  \t y \n"), vec![Token::Ident, Token::Ident]);
}
