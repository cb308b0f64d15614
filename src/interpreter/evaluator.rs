use std::collections::HashMap;
use std::fmt::{Display, Formatter};
use std::io::Write;
use num_bigint::BigInt;
use num_traits::{Signed, ToPrimitive, Zero};
use crate::interpreter::ast::Node;
use crate::interpreter::lexer::{self, Lexer, Token, TokenType};
use crate::interpreter::parser::{ParseError, Parser};
use crate::interpreter::value::{ConversionError, Value};
use crate::println_verbose;

#[cfg(test)]
mod tests;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Usage {
    Unary,
    Binary,
    Print,
    Assignment,
}

impl Display for Usage {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Usage::Unary => write!(f, "unary operation"),
            Usage::Binary => write!(f, "binary operation"),
            Usage::Print => write!(f, "print"),
            Usage::Assignment => write!(f, "assignment"),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum RuntimeError {
    UndefinedVariable {
        name: Token,
        usage: Usage,
    },
    CannotApplyUnary {
        operator: Token,
        operand: Token,
    },
    TypeMismatch {
        left: Token,
        operator: Token,
        right: Token,
    },
    UnsupportedOperator {
        left: Token,
        operator: Token,
        right: Token,
    },
    InvalidLiteral(ConversionError),
    DeleteUndefined {
        name: Token,
    },
    DeleteNonVariableToken {
        token: Token,
    },
    DeleteNonVariableNode {
        keyword: Token,
        node: Node,
    },
    UnexpectedKeyword {
        keyword: Token,
    },
}

impl Display for RuntimeError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            RuntimeError::UndefinedVariable { name, usage } =>
                write!(f, "{} Variable {} used before assignment in {}", name.start(), name, usage),
            RuntimeError::CannotApplyUnary { operator, operand } =>
                write!(f, "{} Cannot apply unary operator {} to {} ({:?})", operator.start(), operator, operand, operand.token_type()),
            RuntimeError::TypeMismatch { left, operator, right } =>
                write!(f, "{} Type mismatch in binary operation {}: left {} ({:?}), right {} ({:?})", operator.start(), operator,
                       left, left.token_type(), right, right.token_type()),
            RuntimeError::UnsupportedOperator { left, operator, right } =>
                write!(f, "{} Operator {} is not defined for {:?} and {:?}", operator.start(), operator,
                       left.token_type(), right.token_type()),
            RuntimeError::InvalidLiteral(err) => write!(f, "{}", err),
            RuntimeError::DeleteUndefined { name } =>
                write!(f, "{} Cannot delete non-existent variable {}", name.start(), name),
            RuntimeError::DeleteNonVariableToken { token } =>
                write!(f, "{} Cannot delete non-variable token {} ({:?})", token.start(), token, token.token_type()),
            RuntimeError::DeleteNonVariableNode { keyword, node } =>
                write!(f, "{} Cannot delete non-variable node {:?}", keyword.start(), node),
            RuntimeError::UnexpectedKeyword { keyword } =>
                write!(f, "{} Keyword {} cannot be used inside an expression", keyword.start(), keyword),
        }
    }
}

impl From<ConversionError> for RuntimeError {
    fn from(err: ConversionError) -> Self {
        RuntimeError::InvalidLiteral(err)
    }
}

#[derive(Debug)]
pub enum InterpreterError {
    Parse(ParseError),
    Runtime(RuntimeError),
    Io(std::io::Error),
}

impl Display for InterpreterError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            InterpreterError::Parse(err) => write!(f, "Parser error: {}", err),
            InterpreterError::Runtime(err) => write!(f, "Interpreter error: {}", err),
            InterpreterError::Io(err) => write!(f, "IO error: {}", err),
        }
    }
}

impl From<ParseError> for InterpreterError {
    fn from(err: ParseError) -> Self {
        InterpreterError::Parse(err)
    }
}

impl From<RuntimeError> for InterpreterError {
    fn from(err: RuntimeError) -> Self {
        InterpreterError::Runtime(err)
    }
}

impl From<std::io::Error> for InterpreterError {
    fn from(err: std::io::Error) -> Self {
        InterpreterError::Io(err)
    }
}

pub type EvalResult<T> = Result<T, InterpreterError>;

#[derive(Clone, Debug, PartialEq)]
enum Number {
    Int(BigInt),
    Float(f64),
}

impl Number {
    fn from_value(value: Value) -> Option<Number> {
        match value {
            Value::Int(value) => Some(Number::Int(value)),
            Value::Float(value) => Some(Number::Float(value)),
            _ => None,
        }
    }

    fn as_float(&self) -> f64 {
        match self {
            Number::Int(value) => int_to_float(value),
            Number::Float(value) => *value,
        }
    }

    fn is_zero(&self) -> bool {
        match self {
            Number::Int(value) => value.is_zero(),
            Number::Float(value) => *value == 0.0,
        }
    }

    fn into_value(self) -> Value {
        match self {
            Number::Int(value) => Value::Int(value),
            Number::Float(value) => Value::Float(value),
        }
    }
}

// Too large integers become infinite
fn int_to_float(value: &BigInt) -> f64 {
    value.to_f64().unwrap_or(if value.is_negative() { f64::NEG_INFINITY } else { f64::INFINITY })
}

// Floored modulus: the result takes the sign of the divisor
fn floored_mod_int(left: &BigInt, right: &BigInt) -> BigInt {
    let remainder = left % right;

    if !remainder.is_zero() && remainder.is_negative() != right.is_negative() {
        remainder + right
    } else {
        remainder
    }
}

fn floored_mod_float(left: f64, right: f64) -> f64 {
    let remainder = left % right;

    if remainder != 0.0 && (remainder < 0.0) != (right < 0.0) {
        remainder + right
    } else if remainder == 0.0 {
        0.0_f64.copysign(right)
    } else {
        remainder
    }
}

pub struct Interpreter<W: Write> {
    variables: HashMap<String, Token>,
    out: W,

    debug: bool,
    verbose: bool,
}

impl<W: Write> Interpreter<W> {
    pub fn new(out: W, verbose: bool) -> Interpreter<W> {
        Interpreter {
            variables: HashMap::new(),
            out,
            debug: false,
            verbose,
        }
    }

    /// Prints the token list and the parsed tree before evaluating.
    pub fn debug(mut self, debug: bool) -> Self {
        self.debug = debug;
        self
    }

    pub fn variables(&self) -> &HashMap<String, Token> {
        &self.variables
    }

    pub fn into_output(self) -> W {
        self.out
    }

    pub fn execute_all<S: AsRef<str>>(&mut self, sources: &[S]) -> EvalResult<()> {
        for source in sources {
            self.execute(source.as_ref())?;
        }

        Ok(())
    }

    pub fn execute(&mut self, source: &str) -> EvalResult<()> {
        self.variables.clear();

        let tokens = Lexer::new(source).tokenize();
        println_verbose!(self.verbose, "Tokenized {} tokens", tokens.len());

        if self.debug {
            lexer::print_tokens(source, &tokens, &mut self.out)?;
        }

        let statements = Parser::new(tokens, source).parse()?;
        println_verbose!(self.verbose, "Parsed {} statements", statements.len());

        if self.debug {
            for statement in &statements {
                writeln!(self.out, "{:?}", statement)?;
            }
        }

        for statement in &statements {
            println_verbose!(self.verbose, "Evaluating {:?}", statement);
            self.evaluate_statement(statement)?;
        }

        self.out.flush()?;
        Ok(())
    }

    fn evaluate_statement(&mut self, node: &Node) -> EvalResult<()> {
        match node {
            Node::Keyword { keyword, node } => self.evaluate_keyword(keyword, node),
            _ => self.evaluate(node).map(|_| ()),
        }
    }

    pub fn evaluate(&mut self, node: &Node) -> EvalResult<Token> {
        match node {
            Node::Value(token) => Ok(token.clone()),
            Node::Assignment { name, value } => self.evaluate_assignment(name, value),
            Node::Unary { operator, node } => self.evaluate_unary(operator, node),
            Node::Binary { left, operator, right } => self.evaluate_binary(left, operator, right),
            Node::Keyword { keyword, .. } => Err(RuntimeError::UnexpectedKeyword { keyword: keyword.clone() }.into()),
        }
    }

    // Looks up Variable tokens; all other tokens are returned as they are
    fn resolve(&self, token: Token, usage: Usage) -> EvalResult<Token> {
        if token.token_type() != TokenType::Variable {
            return Ok(token);
        }

        match self.variables.get(token.source()) {
            Some(value) => Ok(value.clone()),
            None => Err(RuntimeError::UndefinedVariable { name: token, usage }.into()),
        }
    }

    fn evaluate_keyword(&mut self, keyword: &Token, node: &Node) -> EvalResult<()> {
        match keyword.source() {
            "print" => {
                let value = self.evaluate(node)?;
                let value = self.resolve(value, Usage::Print)?;

                writeln!(self.out, "{}", value.source())?;
                Ok(())
            },
            "del" => self.evaluate_delete(keyword, node),
            _ => Err(RuntimeError::UnexpectedKeyword { keyword: keyword.clone() }.into()),
        }
    }

    fn evaluate_delete(&mut self, keyword: &Token, node: &Node) -> EvalResult<()> {
        let token = match node {
            Node::Value(token) => token,
            _ => return Err(RuntimeError::DeleteNonVariableNode { keyword: keyword.clone(), node: node.clone() }.into()),
        };

        if token.token_type() != TokenType::Variable {
            return Err(RuntimeError::DeleteNonVariableToken { token: token.clone() }.into());
        }

        match self.variables.remove(token.source()) {
            Some(_) => {
                println_verbose!(self.verbose, "Deleted variable {}", token);
                Ok(())
            },
            None => Err(RuntimeError::DeleteUndefined { name: token.clone() }.into()),
        }
    }

    fn evaluate_assignment(&mut self, name: &Token, value: &Node) -> EvalResult<Token> {
        let value = self.evaluate(value)?;
        let value = self.resolve(value, Usage::Assignment)?;

        println_verbose!(self.verbose, "Assigned {} = {}", name, value);
        self.variables.insert(name.source().to_owned(), value.clone());
        Ok(value)
    }

    fn evaluate_unary(&mut self, operator: &Token, node: &Node) -> EvalResult<Token> {
        let operand = self.evaluate(node)?;
        let operand = self.resolve(operand, Usage::Unary)?;

        let result = match (operator.source(), Value::from_token(&operand).map_err(RuntimeError::from)?) {
            ("-", Value::Int(value)) => Value::Int(-value),
            ("-", Value::Float(value)) => Value::Float(-value),
            ("!" | "not", Value::Boolean(value)) => Value::Boolean(!value),
            // The operator of the other kind leaves the operand unchanged
            ("-", Value::Boolean(_)) | ("!" | "not", Value::Int(_) | Value::Float(_)) => return Ok(operand),
            _ => return Err(RuntimeError::CannotApplyUnary { operator: operator.clone(), operand }.into()),
        };

        Ok(result.into_token(*operator.start()))
    }

    fn evaluate_binary(&mut self, left: &Node, operator: &Token, right: &Node) -> EvalResult<Token> {
        let left = self.evaluate(left)?;
        let right = self.evaluate(right)?;

        let left = self.resolve(left, Usage::Binary)?;
        let right = self.resolve(right, Usage::Binary)?;

        let left_type = left.token_type();
        let right_type = right.token_type();

        let result = if left_type.is_numeric() && right_type.is_numeric() {
            self.evaluate_numeric_binary(&left, operator, &right)?
        } else if left_type == TokenType::Boolean && right_type == TokenType::Boolean {
            self.evaluate_boolean_binary(&left, operator, &right)?
        } else if left_type == TokenType::String && right_type == TokenType::String {
            self.evaluate_string_binary(&left, operator, &right)?
        } else {
            return Err(RuntimeError::TypeMismatch { left, operator: operator.clone(), right }.into());
        };

        Ok(result.into_token(*operator.start()))
    }

    fn evaluate_numeric_binary(&self, left_token: &Token, operator: &Token, right_token: &Token) -> EvalResult<Value> {
        let unsupported = || RuntimeError::UnsupportedOperator {
            left: left_token.clone(), operator: operator.clone(), right: right_token.clone(),
        };

        let left = Number::from_value(Value::from_token(left_token).map_err(RuntimeError::from)?).ok_or_else(unsupported)?;
        let right = Number::from_value(Value::from_token(right_token).map_err(RuntimeError::from)?).ok_or_else(unsupported)?;

        let result = match (operator.source(), left, right) {
            ("+", Number::Int(l), Number::Int(r)) => Number::Int(l + r),
            ("-", Number::Int(l), Number::Int(r)) => Number::Int(l - r),
            ("*", Number::Int(l), Number::Int(r)) => Number::Int(l * r),
            ("+", l, r) => Number::Float(l.as_float() + r.as_float()),
            ("-", l, r) => Number::Float(l.as_float() - r.as_float()),
            ("*", l, r) => Number::Float(l.as_float() * r.as_float()),
            // Division and modulus by zero are defined as 0.0
            ("/" | "%", _, r) if r.is_zero() => Number::Float(0.0),
            ("/", l, r) => Number::Float(l.as_float() / r.as_float()),
            ("%", Number::Int(l), Number::Int(r)) => Number::Int(floored_mod_int(&l, &r)),
            ("%", l, r) => Number::Float(floored_mod_float(l.as_float(), r.as_float())),
            ("**", Number::Int(l), Number::Int(r)) if !r.is_negative() => match r.to_u32() {
                Some(exponent) => Number::Int(l.pow(exponent)),
                None => Number::Float(int_to_float(&l).powf(int_to_float(&r))),
            },
            ("**", l, r) => Number::Float(l.as_float().powf(r.as_float())),
            (comparison, l, r) => {
                let result = match (l, r) {
                    (Number::Int(l), Number::Int(r)) => Self::compare(comparison, l, r),
                    (l, r) => Self::compare(comparison, l.as_float(), r.as_float()),
                };

                return result.map(Value::Boolean).ok_or_else(|| unsupported().into());
            },
        };

        Ok(result.into_value())
    }

    fn compare<T: PartialOrd>(operator: &str, left: T, right: T) -> Option<bool> {
        match operator {
            "==" => Some(left == right),
            "!=" => Some(left != right),
            ">" => Some(left > right),
            "<" => Some(left < right),
            ">=" => Some(left >= right),
            "<=" => Some(left <= right),
            _ => None,
        }
    }

    fn evaluate_boolean_binary(&self, left_token: &Token, operator: &Token, right_token: &Token) -> EvalResult<Value> {
        let left = Value::from_token(left_token).map_err(RuntimeError::from)?;
        let right = Value::from_token(right_token).map_err(RuntimeError::from)?;

        let (left, right) = match (left, right) {
            (Value::Boolean(left), Value::Boolean(right)) => (left, right),
            _ => return Err(RuntimeError::TypeMismatch {
                left: left_token.clone(), operator: operator.clone(), right: right_token.clone(),
            }.into()),
        };

        // Both operands are always evaluated; `and` and `or` do not short-circuit
        let result = match operator.source() {
            "and" => left && right,
            "or" => left || right,
            "==" => left == right,
            "!=" => left != right,
            _ => return Err(RuntimeError::UnsupportedOperator {
                left: left_token.clone(), operator: operator.clone(), right: right_token.clone(),
            }.into()),
        };

        Ok(Value::Boolean(result))
    }

    fn evaluate_string_binary(&self, left: &Token, operator: &Token, right: &Token) -> EvalResult<Value> {
        match operator.source() {
            "+" => Ok(Value::String(format!("{}{}", left.source(), right.source()))),
            "==" => Ok(Value::Boolean(left.source() == right.source())),
            "!=" => Ok(Value::Boolean(left.source() != right.source())),
            _ => Err(RuntimeError::UnsupportedOperator {
                left: left.clone(), operator: operator.clone(), right: right.clone(),
            }.into()),
        }
    }
}

