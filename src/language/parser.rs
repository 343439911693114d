use crate::language::{
    ast::Node,
    errors::SyntaxError,
    lexer::tokenize,
    span::Span,
    token::{LexToken, Token},
};

const BUILTINS: [&str; 3] = ["ifz", "head", "tail"];

/// One `name [pattern] = expr` line, before folding.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Clause {
    pub name: String,
    pub pattern: Option<Pattern>,
    pub body: Node,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Pattern {
    Binding(String),
    Literal(i64),
}

/// Parses a single clause. `base` is the byte offset of `line` in the source.
pub fn parse_line(line: &str, base: usize) -> Result<Clause, Vec<SyntaxError>> {
    let tokens = tokenize(line, base);
    let end = Span::new(base, base + line.trim_end().len()).after();
    let mut parser = AstParser::new(&tokens, end);
    parser.parse_clause().map_err(|err| vec![err])
}

struct AstParser<'a> {
    tokens: &'a [LexToken],
    position: usize,
    end: Span,
    params: Vec<String>,
}

impl<'a> AstParser<'a> {
    fn new(tokens: &'a [LexToken], end: Span) -> Self {
        Self {
            tokens,
            position: 0,
            end,
            params: Vec::new(),
        }
    }

    fn parse_clause(&mut self) -> Result<Clause, SyntaxError> {
        let (name, name_span) = match self.advance() {
            Some(LexToken {
                token: Token::Identifier(name),
                span,
            }) => (name.clone(), *span),
            Some(lex) => {
                return Err(self
                    .error(format!("Expected function name, found {}", lex.token.describe()), lex.span)
                    .with_help(clause_syntax_help()))
            }
            None => return Err(self.error("Expected function name", self.end)),
        };
        if BUILTINS.contains(&name.as_str()) {
            return Err(self
                .error(format!("`{name}` is a builtin and cannot be redefined"), name_span)
                .with_label("builtin name"));
        }

        let pattern = if self.check(&Token::Equals) {
            None
        } else {
            Some(self.parse_pattern()?)
        };
        if let Some(Pattern::Binding(param)) = &pattern {
            self.params.push(param.clone());
        }

        self.consume(&Token::Equals, "Expected '=' after function head")
            .map_err(|err| err.with_help(clause_syntax_help()))?;
        let body = self.parse_expression()?;

        if let Some(lex) = self.peek_lex() {
            return Err(self.error(
                format!("Unexpected {} after expression", lex.token.describe()),
                lex.span,
            ));
        }

        Ok(Clause {
            name,
            pattern,
            body,
        })
    }

    fn parse_pattern(&mut self) -> Result<Pattern, SyntaxError> {
        match self.advance() {
            Some(lex) => match &lex.token {
                Token::Identifier(name) => Ok(Pattern::Binding(name.clone())),
                Token::Integer(value) => Ok(Pattern::Literal(*value)),
                Token::Minus => match self.advance() {
                    Some(LexToken {
                        token: Token::Integer(value),
                        ..
                    }) => Ok(Pattern::Literal(-value)),
                    _ => Err(self.error("Expected integer after '-' in pattern", lex.span)),
                },
                Token::LeftParen => {
                    let pattern = self.parse_pattern()?;
                    self.consume(&Token::RightParen, "Expected ')' after pattern")?;
                    Ok(pattern)
                }
                Token::Comma => Err(self
                    .error("Functions take a single parameter", lex.span)
                    .with_help("Pass a list instead: f xs = ...")),
                token => Err(self
                    .error(format!("Expected a pattern, found {}", token.describe()), lex.span)
                    .with_help("Patterns are a parameter name or an integer literal")),
            },
            None => Err(self.error("Expected a pattern", self.end)),
        }
    }

    // expr := additive (':' expr)?
    fn parse_expression(&mut self) -> Result<Node, SyntaxError> {
        let head = self.parse_additive()?;
        if self.check(&Token::Colon) {
            self.advance();
            let tail = self.parse_expression()?;
            return Ok(Node::cons(head, tail));
        }
        Ok(head)
    }

    fn parse_additive(&mut self) -> Result<Node, SyntaxError> {
        let mut expr = self.parse_unary()?;
        loop {
            let negate = match self.peek_token() {
                Some(Token::Plus) => false,
                Some(Token::Minus) => true,
                _ => break,
            };
            self.advance();
            let right = self.parse_unary()?;
            expr = if negate {
                Node::difference(expr, right)
            } else {
                Node::sum(expr, right)
            };
        }
        Ok(expr)
    }

    fn parse_unary(&mut self) -> Result<Node, SyntaxError> {
        if self.check(&Token::Minus) {
            self.advance();
            return Ok(Node::negate(self.parse_unary()?));
        }
        self.parse_application()
    }

    fn parse_application(&mut self) -> Result<Node, SyntaxError> {
        let (name, span) = match self.peek_lex() {
            Some(LexToken {
                token: Token::Identifier(name),
                span,
            }) => (name.clone(), *span),
            _ => return self.parse_atom(),
        };
        self.advance();

        let args = match self.peek_token() {
            Some(Token::LeftParen) => {
                self.advance();
                let args = self.parse_arguments()?;
                self.consume(&Token::RightParen, "Expected ')' after arguments")?;
                Some(args)
            }
            Some(token) if token.starts_atom() => Some(vec![self.parse_atom()?]),
            _ => None,
        };
        match args {
            Some(args) => self.lower_application(name, span, args),
            None => self.lower_identifier(name, span),
        }
    }

    fn parse_arguments(&mut self) -> Result<Vec<Node>, SyntaxError> {
        let mut args = vec![self.parse_expression()?];
        while self.check(&Token::Comma) {
            self.advance();
            args.push(self.parse_expression()?);
        }
        Ok(args)
    }

    fn parse_atom(&mut self) -> Result<Node, SyntaxError> {
        match self.advance() {
            Some(lex) => match &lex.token {
                Token::Integer(value) => Ok(Node::Constant(*value)),
                Token::Identifier(name) => self.lower_identifier(name.clone(), lex.span),
                Token::LeftBracket => {
                    self.consume(&Token::RightBracket, "Expected ']' after '['")
                        .map_err(|err| {
                            err.with_help("Only the empty list `[]` can be written literally; build others with `:`")
                        })?;
                    Ok(Node::EmptyList)
                }
                Token::LeftParen => {
                    let expr = self.parse_expression()?;
                    if self.check(&Token::Comma) {
                        let span = self.peek_lex().map_or(self.end, |lex| lex.span);
                        return Err(self.error("Tuples are only allowed as builtin arguments", span));
                    }
                    self.consume(&Token::RightParen, "Expected ')' after expression")?;
                    Ok(expr)
                }
                token => Err(self.error(
                    format!("Unexpected {} in expression", token.describe()),
                    lex.span,
                )),
            },
            None => Err(self.error("Unexpected end of line while reading expression", self.end)),
        }
    }

    fn lower_identifier(&self, name: String, span: Span) -> Result<Node, SyntaxError> {
        if let Some(slot) = self.params.iter().position(|param| *param == name) {
            return Ok(Node::Var(slot));
        }
        if BUILTINS.contains(&name.as_str()) {
            return Err(self
                .error(format!("`{name}` needs arguments"), span)
                .with_help(builtin_help(&name)));
        }
        Ok(Node::call(name, Node::Constant(0)))
    }

    fn lower_application(
        &self,
        name: String,
        span: Span,
        args: Vec<Node>,
    ) -> Result<Node, SyntaxError> {
        if self.params.contains(&name) {
            return Err(self.error(format!("Cannot apply parameter `{name}`"), span));
        }
        match name.as_str() {
            "ifz" => match <[Node; 3]>::try_from(args) {
                Ok([cond, non_positive, positive]) => Ok(Node::ifz(cond, non_positive, positive)),
                Err(args) => Err(self.builtin_arity_error(&name, args.len(), span)),
            },
            "head" | "tail" => match <[Node; 1]>::try_from(args) {
                Ok([list]) if name == "head" => Ok(Node::head(list)),
                Ok([list]) => Ok(Node::tail(list)),
                Err(args) => Err(self.builtin_arity_error(&name, args.len(), span)),
            },
            _ => match <[Node; 1]>::try_from(args) {
                Ok([arg]) => Ok(Node::call(name, arg)),
                Err(args) => Err(self
                    .error(
                        format!(
                            "User-defined function `{name}` takes exactly one argument, got {}",
                            args.len()
                        ),
                        span,
                    )
                    .with_help("Pass a list instead: f(a : b : [])")),
            },
        }
    }

    fn builtin_arity_error(&self, name: &str, arity: usize, span: Span) -> SyntaxError {
        self.error(format!("`{name}` called with {arity} argument(s)"), span)
            .with_help(builtin_help(name))
    }

    fn consume(&mut self, expected: &Token, message: &str) -> Result<(), SyntaxError> {
        match self.peek_lex() {
            Some(lex) if &lex.token == expected => {
                self.advance();
                Ok(())
            }
            Some(lex) => Err(self.error(
                format!("{}: found {}", message, lex.token.describe()),
                lex.span,
            )),
            None => Err(self.error(format!("{}: reached end of line", message), self.end)),
        }
    }

    fn peek_token(&self) -> Option<&'a Token> {
        self.peek_lex().map(|lex| &lex.token)
    }

    fn peek_lex(&self) -> Option<&'a LexToken> {
        self.tokens.get(self.position)
    }

    fn advance(&mut self) -> Option<&'a LexToken> {
        let token = self.tokens.get(self.position);
        if token.is_some() {
            self.position += 1;
        }
        token
    }

    fn check(&self, expected: &Token) -> bool {
        matches!(self.peek_token(), Some(token) if token == expected)
    }

    fn error(&self, message: impl Into<String>, span: Span) -> SyntaxError {
        SyntaxError::new(message, span)
    }
}

fn clause_syntax_help() -> String {
    "Syntax: <name> [pattern] = <expression>".into()
}

fn builtin_help(name: &str) -> String {
    match name {
        "ifz" => "Syntax: ifz(condition, when_non_positive, when_positive)".into(),
        other => format!("Syntax: {other}(list)"),
    }
}
