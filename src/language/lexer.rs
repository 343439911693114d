use crate::language::{
    span::Span,
    token::{LexToken, Token},
};
use nom::{
    branch::alt,
    bytes::complete::tag,
    character::complete::{alpha1, alphanumeric1, anychar, char, digit1},
    combinator::{recognize, value},
    multi::many0_count,
    sequence::pair,
    IResult, Parser as NomParser,
};

pub fn parse_identifier(input: &str) -> IResult<&str, Token> {
    let (input, name) = recognize(pair(
        alt((alpha1, tag("_"))),
        many0_count(alt((alphanumeric1, tag("_"), tag("'")))),
    ))
    .parse(input)?;
    Ok((input, Token::Identifier(name.to_string())))
}

pub fn parse_integer(input: &str) -> IResult<&str, Token> {
    let (input, digits) = digit1(input)?;
    let token = digits
        .parse::<i64>()
        .map_or_else(|_| Token::Unknown(digits.to_string()), Token::Integer);
    Ok((input, token))
}

pub fn parse_symbol(input: &str) -> IResult<&str, Token> {
    alt((
        value(Token::Plus, char('+')),
        value(Token::Minus, char('-')),
        value(Token::Colon, char(':')),
        value(Token::Comma, char(',')),
        value(Token::Equals, char('=')),
        value(Token::LeftParen, char('(')),
        value(Token::RightParen, char(')')),
        value(Token::LeftBracket, char('[')),
        value(Token::RightBracket, char(']')),
    ))
    .parse(input)
}

pub fn parse_any(input: &str) -> IResult<&str, Token> {
    let (input, ch) = anychar(input)?;
    Ok((input, Token::Unknown(ch.to_string())))
}

/// Splits one source line into tokens. `base` is the byte offset of the
/// line within the whole source, so spans point into the loaded file.
pub fn tokenize(input: &str, base: usize) -> Vec<LexToken> {
    let mut tokens = Vec::new();
    let mut remaining_input = input;
    let mut offset = base;

    loop {
        let trimmed = remaining_input.trim_start();
        offset += remaining_input.len() - trimmed.len();
        remaining_input = trimmed;

        if remaining_input.is_empty() {
            break;
        }

        let result = parse_identifier(remaining_input)
            .or_else(|_| parse_integer(remaining_input))
            .or_else(|_| parse_symbol(remaining_input))
            .or_else(|_| parse_any(remaining_input));

        match result {
            Ok((remaining, token)) => {
                let consumed = remaining_input.len() - remaining.len();
                tokens.push(LexToken {
                    token,
                    span: Span::new(offset, offset + consumed),
                });
                remaining_input = remaining;
                offset += consumed;
            }
            // `parse_any` only fails on empty input, which was handled above.
            Err(_) => break,
        }
    }

    tokens
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(input: &str) -> Vec<Token> {
        tokenize(input, 0).into_iter().map(|lex| lex.token).collect()
    }

    #[test]
    fn lexes_a_clause() {
        assert_eq!(
            kinds("fib n = fib(n - 1)"),
            vec![
                Token::Identifier("fib".into()),
                Token::Identifier("n".into()),
                Token::Equals,
                Token::Identifier("fib".into()),
                Token::LeftParen,
                Token::Identifier("n".into()),
                Token::Minus,
                Token::Integer(1),
                Token::RightParen,
            ]
        );
    }

    #[test]
    fn spans_are_offset_by_the_line_start() {
        let tokens = tokenize("  xs' = []", 10);
        assert_eq!(tokens[0].token, Token::Identifier("xs'".into()));
        assert_eq!(tokens[0].span, Span::new(12, 15));
        assert_eq!(tokens[2].span, Span::new(18, 19));
    }

    #[test]
    fn unknown_characters_and_oversized_integers_are_kept() {
        assert_eq!(
            kinds("a * 99999999999999999999"),
            vec![
                Token::Identifier("a".into()),
                Token::Unknown("*".into()),
                Token::Unknown("99999999999999999999".into()),
            ]
        );
    }
}
