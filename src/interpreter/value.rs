use std::fmt::{Display, Formatter};
use num_bigint::BigInt;
use crate::interpreter::lexer::{Token, TokenPos, TokenType};

/// Native runtime representation of a token's value.
#[derive(Clone, Debug, PartialEq)]
pub enum Value {
    Int(BigInt),
    Float(f64),
    Boolean(bool),
    String(String),
    None,
    /// Unresolved reference to a variable name
    Variable(String),
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ConversionError {
    pub token: Token,
}

impl Display for ConversionError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} Cannot convert {} ({:?}) to a value", self.token.start(), self.token, self.token.token_type())
    }
}

impl Value {
    /// Converts a token's textual value to its native representation.
    pub fn from_token(token: &Token) -> Result<Value, ConversionError> {
        let error = || ConversionError { token: token.clone() };

        match token.token_type() {
            TokenType::Integer => token.source().parse().map(Value::Int).map_err(|_| error()),
            TokenType::Float => token.source().parse().map(Value::Float).map_err(|_| error()),
            TokenType::Boolean => match token.source() {
                "true" => Ok(Value::Boolean(true)),
                "false" => Ok(Value::Boolean(false)),
                _ => Err(error()),
            },
            TokenType::String => Ok(Value::String(token.source().to_owned())),
            TokenType::NoneLiteral => Ok(Value::None),
            TokenType::Variable => Ok(Value::Variable(token.source().to_owned())),
            _ => Err(error()),
        }
    }

    /// Converts the value back to a textual token with an explicit kind.
    pub fn into_token(self, start: TokenPos) -> Token {
        let token_type = self.token_type();

        let source = match self {
            Value::Int(value) => value.to_string(),
            Value::Float(value) => format_float(value),
            Value::Boolean(value) => String::from(if value { "true" } else { "false" }),
            Value::String(value) | Value::Variable(value) => value,
            Value::None => String::from("None"),
        };

        Token::with_type(token_type, source, start)
    }

    pub fn token_type(&self) -> TokenType {
        match self {
            Value::Int(_) => TokenType::Integer,
            Value::Float(_) => TokenType::Float,
            Value::Boolean(_) => TokenType::Boolean,
            Value::String(_) => TokenType::String,
            Value::None => TokenType::NoneLiteral,
            Value::Variable(_) => TokenType::Variable,
        }
    }
}

/// Shortest round-trip notation, with a trailing `.0` for integral values and
/// exponent notation outside of `[1e-4, 1e16)`.
pub fn format_float(value: f64) -> String {
    if value.is_nan() {
        return String::from("nan");
    } else if value.is_infinite() {
        return String::from(if value > 0.0 { "inf" } else { "-inf" });
    }

    let scientific = format!("{:e}", value);
    let (mantissa, exponent) = match scientific.split_once('e') {
        Some((mantissa, exponent)) => (mantissa, exponent.parse::<i32>().unwrap_or(0)),
        None => (scientific.as_str(), 0),
    };

    if value == 0.0 || (-4..16).contains(&exponent) {
        let plain = value.to_string();

        if plain.contains('.') { plain } else { format!("{}.0", plain) }
    } else {
        format!("{}e{}{:02}", mantissa, if exponent < 0 { '-' } else { '+' }, exponent.abs())
    }
}
