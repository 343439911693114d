use crate::language::span::Span;

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Token {
    Identifier(String),
    Integer(i64),
    Plus,
    Minus,
    Colon,
    Comma,
    Equals,
    LeftParen,
    RightParen,
    LeftBracket,
    RightBracket,
    Unknown(String),
}

impl Token {
    /// True for tokens that can begin an atom, and so an application operand.
    pub fn starts_atom(&self) -> bool {
        matches!(
            self,
            Token::Integer(_) | Token::Identifier(_) | Token::LeftParen | Token::LeftBracket
        )
    }

    pub fn describe(&self) -> String {
        match self {
            Token::Identifier(name) => format!("identifier `{name}`"),
            Token::Integer(value) => format!("integer `{value}`"),
            Token::Plus => "`+`".into(),
            Token::Minus => "`-`".into(),
            Token::Colon => "`:`".into(),
            Token::Comma => "`,`".into(),
            Token::Equals => "`=`".into(),
            Token::LeftParen => "`(`".into(),
            Token::RightParen => "`)`".into(),
            Token::LeftBracket => "`[`".into(),
            Token::RightBracket => "`]`".into(),
            Token::Unknown(text) => format!("`{text}`"),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LexToken {
    pub token: Token,
    pub span: Span,
}
