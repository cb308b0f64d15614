use std::fmt::{Display, Formatter};
use std::iter::Peekable;
use std::vec::IntoIter;
use crate::interpreter::ast::Node;
use crate::interpreter::lexer::{convert_escape_chars, Token, TokenType};


#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    UnmatchedParenthesis {
        paren: Token,
        found: Token,
        expression: String,
    },
    AssignmentNotAllowed {
        token: Token,
        index: usize,
        expression: String,
    },
    ExpectedExpression {
        found: Token,
        index: usize,
        expression: String,
    },
    ExpectedVariable {
        operator: Token,
        found: Token,
        expression: String,
    },
}

impl Display for ParseError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            ParseError::UnmatchedParenthesis { paren, found, expression } =>
                write!(f, "{} Left parenthesis '(' missing matching right parenthesis ')', found {}\n    in expression: '{}'",
                       paren.start(), found, expression),
            ParseError::AssignmentNotAllowed { token, index, expression } =>
                write!(f, "{} Cannot perform assignment here: {} at token index {}\n    in expression: '{}'",
                       token.start(), token, index, expression),
            ParseError::ExpectedExpression { found, index, expression } =>
                write!(f, "{} Expected expression, found {} at token index {}\n    in expression: '{}'",
                       found.start(), found, index, expression),
            ParseError::ExpectedVariable { operator, found, expression } =>
                write!(f, "{} Expected variable after unary {}, found {}\n    in expression: '{}'",
                       operator.start(), operator, found, expression),
        }
    }
}

pub type ParseResult<T> = Result<T, ParseError>;

pub struct Parser<'source> {
    tokens: Peekable<IntoIter<Token>>,
    previous: Token, current: Token,
    // Position of `current` in the token stream
    index: usize, next_index: usize,

    source: &'source str,
}

impl<'source> Parser<'source> {
    pub fn new(tokens: Vec<Token>, source: &'source str) -> Parser<'source> {
        Parser {
            tokens: tokens.into_iter().peekable(),
            previous: Token::empty(), current: Token::empty(),
            index: 0, next_index: 0,
            source,
        }
    }

    // Statement parsing

    pub fn parse(mut self) -> ParseResult<Vec<Node>> {
        self.consume();

        let mut statements = Vec::new();

        while !self.is_eof() {
            // Line breaks only separate statements
            if self.matches(TokenType::EndOfLine) {
                continue;
            }

            statements.push(self.parse_statement()?);
        }

        Ok(statements)
    }

    fn parse_statement(&mut self) -> ParseResult<Node> {
        if self.matches(TokenType::ReservedKeyword) {
            return self.parse_keyword_statement();
        } else if self.check(TokenType::Variable) && self.check_next(TokenType::Equals) {
            return self.parse_assignment();
        }

        self.parse_expression()
    }

    fn parse_keyword_statement(&mut self) -> ParseResult<Node> {
        let keyword = self.previous.clone();
        let node = self.parse_expression()?;

        Ok(Node::Keyword { keyword, node: Box::new(node) })
    }

    fn parse_assignment(&mut self) -> ParseResult<Node> {
        self.consume();
        let name = self.previous.clone();
        self.consume(); // the '='

        let value = self.parse_expression()?;
        Ok(Node::Assignment { name, value: Box::new(value) })
    }

    // Expression parsing

    fn parse_expression(&mut self) -> ParseResult<Node> {
        self.parse_logical()
    }

    fn parse_logical(&mut self) -> ParseResult<Node> {
        let left = self.parse_equality()?;

        if self.matches_operator(&["and", "or"]) {
            let operator = self.previous.clone();
            let right = self.parse_logical()?;

            return Ok(Parser::binary(left, operator, right));
        }

        Ok(left)
    }

    fn parse_equality(&mut self) -> ParseResult<Node> {
        let left = self.parse_comparison()?;

        if self.matches_operator(&["==", "!="]) {
            let operator = self.previous.clone();
            let right = self.parse_equality()?;

            return Ok(Parser::binary(left, operator, right));
        }

        Ok(left)
    }

    fn parse_comparison(&mut self) -> ParseResult<Node> {
        let left = self.parse_term()?;

        if self.matches_operator(&[">", "<", ">=", "<="]) {
            let operator = self.previous.clone();
            let right = self.parse_comparison()?;

            return Ok(Parser::binary(left, operator, right));
        }

        Ok(left)
    }

    fn parse_term(&mut self) -> ParseResult<Node> {
        let left = self.parse_factor()?;

        if self.matches_operator(&["+", "-"]) {
            let operator = self.previous.clone();
            let right = self.parse_term()?;

            return Ok(Parser::binary(left, operator, right));
        }

        Ok(left)
    }

    fn parse_factor(&mut self) -> ParseResult<Node> {
        let left = self.parse_unary()?;

        if self.matches_operator(&["*", "/", "%", "**"]) {
            let operator = self.previous.clone();
            let right = self.parse_factor()?;

            return Ok(Parser::binary(left, operator, right));
        }

        Ok(left)
    }

    fn parse_unary(&mut self) -> ParseResult<Node> {
        if self.matches(TokenType::UnaryOp) {
            let operator = self.previous.clone();
            let node = self.parse_unary()?;

            return Ok(Node::Unary { operator, node: Box::new(node) });
        }

        self.parse_primary()
    }

    fn parse_primary(&mut self) -> ParseResult<Node> {
        match self.current.token_type() {
            TokenType::Integer | TokenType::Float | TokenType::Boolean | TokenType::Variable | TokenType::NoneLiteral => {
                self.consume();
                Ok(Node::Value(self.previous.clone()))
            },
            TokenType::String => {
                self.consume();

                // Don't keep the leading and trailing '"' characters
                let literal = self.previous.source();
                let contents = literal.strip_prefix('"').and_then(|s| s.strip_suffix('"')).unwrap_or(literal);

                Ok(Node::Value(Token::with_type(TokenType::String, contents.to_owned(), *self.previous.start())))
            },
            TokenType::BinaryOp if self.current.source() == "-" => {
                self.consume();
                let operator = self.previous.clone();

                if !self.matches(TokenType::Variable) {
                    return Err(ParseError::ExpectedVariable {
                        operator, found: self.current.clone(),
                        expression: self.expression_of(&self.current),
                    });
                }

                Ok(Node::Unary { operator, node: Box::new(Node::Value(self.previous.clone())) })
            },
            TokenType::LeftParen => {
                self.consume();
                let paren = self.previous.clone();
                let expr = self.parse_expression()?;

                if !self.matches(TokenType::RightParen) {
                    return Err(ParseError::UnmatchedParenthesis {
                        expression: self.expression_of(&paren),
                        paren, found: self.current.clone(),
                    });
                }

                Ok(expr)
            },
            TokenType::Equals => Err(ParseError::AssignmentNotAllowed {
                token: self.current.clone(), index: self.index,
                expression: self.expression_of(&self.current),
            }),
            _ => Err(ParseError::ExpectedExpression {
                found: self.current.clone(), index: self.index,
                expression: self.expression_of(&self.current),
            }),
        }
    }

    fn binary(left: Node, operator: Token, right: Node) -> Node {
        Node::Binary { left: Box::new(left), operator, right: Box::new(right) }
    }

    fn consume(&mut self) {
        let next = match self.tokens.next() {
            Some(token) => token,
            None => Token::end_of_input(*self.current.start()),
        };

        self.index = self.next_index;
        self.next_index += 1;

        self.previous = std::mem::replace(&mut self.current, next);
    }

    fn matches(&mut self, token_type: TokenType) -> bool {
        if !self.check(token_type) {
            return false;
        }

        self.consume();
        true
    }

    fn matches_operator(&mut self, operators: &[&str]) -> bool {
        if self.check(TokenType::BinaryOp) && operators.contains(&self.current.source()) {
            self.consume();
            return true;
        }

        false
    }

    #[inline]
    fn check(&self, token_type: TokenType) -> bool {
        self.current.token_type() == token_type
    }

    fn check_next(&mut self, token_type: TokenType) -> bool {
        self.tokens.peek().map_or(false, |token| token.token_type() == token_type)
    }

    fn is_eof(&self) -> bool {
        self.current.token_type() == TokenType::EndOfInput
    }

    // The source line a token was read from
    fn expression_of(&self, token: &Token) -> String {
        let line = usize::try_from(token.start().line - 1).unwrap_or(0);

        convert_escape_chars(self.source).lines().nth(line).unwrap_or_default().trim().to_owned()
    }
}
