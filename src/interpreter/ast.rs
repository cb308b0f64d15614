use std::fmt::{Debug, Formatter};
use crate::interpreter::lexer::Token;

#[derive(Clone, PartialEq)]
pub enum Node {
    Keyword {
        keyword: Token,
        node: Box<Node>,
    },
    Unary {
        operator: Token,
        node: Box<Node>,
    },
    Binary {
        left: Box<Node>,
        operator: Token,
        right: Box<Node>,
    },
    Assignment {
        name: Token,
        value: Box<Node>,
    },
    Value(Token),
}

// Renders the tree as nested lists, e.g. `['x', [['1'], '+', ['2']]]`
impl Debug for Node {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Node::Keyword { keyword, node } => write!(f, "['{}', {:?}]", keyword.source(), node),
            Node::Unary { operator, node } => write!(f, "['{}', {:?}]", operator.source(), node),
            Node::Binary { left, operator, right } => write!(f, "[{:?}, '{}', {:?}]", left, operator.source(), right),
            Node::Assignment { name, value } => write!(f, "['{}', {:?}]", name.source(), value),
            Node::Value(token) => write!(f, "['{}']", token.source()),
        }
    }
}
