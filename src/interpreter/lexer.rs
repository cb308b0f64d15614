use std::collections::HashMap;
use std::fmt::{Display, Formatter};
use std::io::Write;
use lazy_static::lazy_static;
use crate::util::CharClass;


#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TokenPos {
    pub line: i32,
    pub column: i32,
}

impl TokenPos {
    pub fn new(line: i32, column: i32) -> TokenPos {
        TokenPos { line, column }
    }

    pub fn begin() -> TokenPos {
        TokenPos::new(1, 1)
    }
}

impl Display for TokenPos {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "[line {} column {}]", self.line, self.column)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[repr(u8)]
pub enum TokenType {
    Integer, Float,
    Boolean,
    String,
    Variable,

    Equals,
    UnaryOp, BinaryOp,
    LeftParen, RightParen,

    EndOfLine,
    ReservedKeyword,
    NoneLiteral,

    EndOfInput,
    Invalid,
}

lazy_static! {
    static ref RESERVED_TOKENS: HashMap<&'static str, TokenType> = {
        let mut tokens = HashMap::new();

        tokens.insert("true", TokenType::Boolean);
        tokens.insert("false", TokenType::Boolean);
        tokens.insert("=", TokenType::Equals);

        for op in ["!", "not"] {
            tokens.insert(op, TokenType::UnaryOp);
        }

        for op in ["+", "-", "*", "/", "%", "**", "==", "!=", ">", "<", ">=", "<=", "and", "or"] {
            tokens.insert(op, TokenType::BinaryOp);
        }

        tokens.insert("(", TokenType::LeftParen);
        tokens.insert(")", TokenType::RightParen);
        tokens.insert("print", TokenType::ReservedKeyword);
        tokens.insert("del", TokenType::ReservedKeyword);
        tokens.insert("None", TokenType::NoneLiteral);
        tokens.insert("\n", TokenType::EndOfLine);
        tokens.insert("\r", TokenType::EndOfLine);

        tokens
    };
}

impl TokenType {
    /// Infers the kind of a token from its text.
    pub fn classify(source: &str) -> TokenType {
        if source.contains('.') {
            if source.parse::<f64>().is_ok() {
                return TokenType::Float;
            }
        } else if is_integer_literal(source) {
            return TokenType::Integer;
        }

        if source.starts_with('"') {
            return if source.len() >= 2 && source.ends_with('"') {
                TokenType::String
            } else {
                TokenType::Invalid
            };
        }

        RESERVED_TOKENS.get(source).copied().unwrap_or(TokenType::Variable)
    }

    pub fn is_numeric(&self) -> bool {
        matches!(self, TokenType::Integer | TokenType::Float)
    }
}

fn is_integer_literal(source: &str) -> bool {
    let digits = source.strip_prefix('-').unwrap_or(source);
    !digits.is_empty() && digits.chars().all(|c| c.is_ascii_digit())
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Token {
    token_type: TokenType,
    source: String,
    start: TokenPos,
}

impl Token {
    pub fn new(source: String, start: TokenPos) -> Token {
        Token {
            token_type: TokenType::classify(&source),
            source, start,
        }
    }

    pub fn with_type(token_type: TokenType, source: String, start: TokenPos) -> Token {
        Token { token_type, source, start }
    }

    pub fn empty() -> Token {
        Token::with_type(TokenType::Invalid, String::new(), TokenPos::begin())
    }

    pub fn end_of_input(start: TokenPos) -> Token {
        Token::with_type(TokenType::EndOfInput, String::from("EOF"), start)
    }

    pub fn token_type(&self) -> TokenType { self.token_type }
    pub fn source(&self) -> &str { &self.source }
    pub fn start(&self) -> &TokenPos { &self.start }
}

impl Display for Token {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self.token_type {
            TokenType::EndOfInput => f.write_str("end of input"),
            TokenType::EndOfLine => f.write_str("end of line"),
            TokenType::String => write!(f, "`\"{}\"`", self.source),
            _ => write!(f, "`{}`", self.source),
        }
    }
}

/// Replaces the two-character sequences `\n` and `\t` with a newline and a tab.
/// Other backslashes are kept as they are.
pub fn convert_escape_chars(text: &str) -> String {
    let mut result = String::with_capacity(text.len());
    let mut chars = text.chars().peekable();

    while let Some(c) = chars.next() {
        if c == '\\' {
            match chars.peek() {
                Some('n') => {
                    chars.next();
                    result.push('\n');
                    continue;
                },
                Some('t') => {
                    chars.next();
                    result.push('\t');
                    continue;
                },
                _ => {},
            }
        }

        result.push(c);
    }

    result
}

pub struct Lexer {
    chars: Vec<char>,
    current_index: usize,
    current_pos: TokenPos,
}

impl Lexer {
    pub fn new(source: &str) -> Lexer {
        Lexer {
            chars: convert_escape_chars(source).chars().collect(),
            current_index: 0,
            current_pos: TokenPos::begin(),
        }
    }

    pub fn tokenize(mut self) -> Vec<Token> {
        let mut tokens = Vec::new();

        while !self.is_eof() {
            if let Some(token) = self.scan_token() {
                tokens.push(token);
            }
        }

        tokens.push(Token::end_of_input(self.current_pos));
        tokens
    }

    fn scan_token(&mut self) -> Option<Token> {
        let mut class = CharClass::Unknown;
        let mut identifier = String::new();
        let mut start = self.current_pos;

        while let Some(c) = self.peek() {
            match c {
                '"' => {
                    if identifier.is_empty() {
                        return Some(self.scan_string());
                    }

                    break;
                },
                '(' | ')' | '\n' | '\r' => {
                    // Single character tokens
                    if identifier.is_empty() {
                        self.consume();
                        identifier.push(c);
                    }

                    break;
                },
                ' ' | '\t' => {
                    if !identifier.is_empty() {
                        break;
                    }

                    self.consume();
                    start = self.current_pos;
                },
                _ => {
                    let current = CharClass::of(c);

                    if class == CharClass::Unknown {
                        class = current;
                    } else if Lexer::forces_boundary(class, current, c) {
                        break;
                    }

                    self.consume();
                    identifier.push(c);
                },
            }
        }

        if identifier.is_empty() {
            None
        } else {
            Some(Token::new(identifier, start))
        }
    }

    fn forces_boundary(class: CharClass, current: CharClass, c: char) -> bool {
        // e.g. `0-4` becomes `0`, `-4`
        if class == CharClass::Numeric && (c == '-' || current != CharClass::Numeric) {
            return true;
        }

        if class == CharClass::Symbolic {
            current != CharClass::Symbolic
        } else {
            current == CharClass::Symbolic || c == '-'
        }
    }

    fn scan_string(&mut self) -> Token {
        let start = self.current_pos;
        let mut literal = String::new();

        if let Some(c) = self.consume() {
            literal.push(c); // the leading '"'
        }

        while let Some(c) = self.consume() {
            literal.push(c);

            if c == '"' {
                break;
            }
        }

        Token::new(literal, start)
    }

    fn consume(&mut self) -> Option<char> {
        let c = self.chars.get(self.current_index).copied()?;
        self.current_index += 1;

        if c == '\n' {
            self.current_pos.line += 1;
            self.current_pos.column = 1;
        } else {
            self.current_pos.column += 1;
        }

        Some(c)
    }

    fn peek(&self) -> Option<char> {
        self.chars.get(self.current_index).copied()
    }

    fn is_eof(&self) -> bool {
        self.current_index >= self.chars.len()
    }
}

/// Writes the program text, the list of token values and one `value<TAB>kind` line per token.
pub fn print_tokens(source: &str, tokens: &[Token], out: &mut impl Write) -> Result<(), std::io::Error> {
    writeln!(out, "{}", source)?;
    writeln!(out, "[{}]", tokens.iter().map(|token| format!("{:?}", token.source())).collect::<Vec<String>>().join(", "))?;

    for token in tokens {
        writeln!(out, "{:?}\t{:?}", token.source(), token.token_type())?;
    }

    Ok(())
}
