use crate::lexer::Token;
use serde::ser::{SerializeStruct, Serializer};
use serde::Serialize;
use std::fmt;

/// The root of every parse: top-level statements in source order.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename = "program")]
pub struct Program {
    pub statements: Vec<Node>,
}

/// A bracketed statement list (e.g. `[let x = 1; x++]`).
#[derive(Debug, Clone, PartialEq)]
pub struct Block {
    pub body: Vec<Node>,
}

impl Serialize for Block {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("Block", 2)?;
        state.serialize_field("type", "block")?;
        state.serialize_field("body", &self.body)?;
        state.end()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BinaryOp {
    Add,
    Sub,
    Mul,
    Div,
    Lt,
    Gt,
    Le,
    Ge,
    Eq,
    Ne,
    And,
    Or,
}

impl BinaryOp {
    /// Maps an operator lexeme to its operator.
    pub fn from_lexeme(lexeme: &str) -> Option<Self> {
        Some(match lexeme {
            "+" => BinaryOp::Add,
            "-" => BinaryOp::Sub,
            "*" => BinaryOp::Mul,
            "/" => BinaryOp::Div,
            "<" => BinaryOp::Lt,
            ">" => BinaryOp::Gt,
            "<=" => BinaryOp::Le,
            ">=" => BinaryOp::Ge,
            "==" => BinaryOp::Eq,
            "!=" => BinaryOp::Ne,
            "&&" => BinaryOp::And,
            "||" => BinaryOp::Or,
            _ => return None,
        })
    }

    pub fn as_str(self) -> &'static str {
        match self {
            BinaryOp::Add => "+",
            BinaryOp::Sub => "-",
            BinaryOp::Mul => "*",
            BinaryOp::Div => "/",
            BinaryOp::Lt => "<",
            BinaryOp::Gt => ">",
            BinaryOp::Le => "<=",
            BinaryOp::Ge => ">=",
            BinaryOp::Eq => "==",
            BinaryOp::Ne => "!=",
            BinaryOp::And => "&&",
            BinaryOp::Or => "||",
        }
    }
}

impl fmt::Display for BinaryOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A statement or expression node.
#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    Block(Block),
    /// A named function definition (e.g. `fn add [a, b] [return a + b]`).
    FuncDef {
        func_name: String,
        parameters: Vec<String>,
        body: Block,
    },
    /// An anonymous function (e.g. `=> [x] [return x * 2]`).
    Lambda { parameters: Vec<String>, body: Block },
    If { cond: Box<Node>, body: Block },
    While { cond: Box<Node>, body: Block },
    /// Every header piece is optional (e.g. `for [;;] [...]`).
    For {
        init: Option<Box<Node>>,
        cond: Option<Box<Node>>,
        inc: Option<Box<Node>>,
        body: Block,
    },
    /// `let name = exp`
    InitVar { name: String, exp: Box<Node> },
    /// `name = exp`
    Assign { var_name: Token, exp: Box<Node> },
    Enum { names: Vec<String> },
    Return { exp: Box<Node> },
    Break,
    Continue,
    List { elements: Vec<Node> },
    /// Member (`a.b`) or index (`a[0]`) access. `args` holds exactly one key.
    Access { of: Box<Node>, args: Vec<Node> },
    Negative { right: Box<Node> },
    Bang { right: Box<Node> },
    PreInc { left: Box<Node> },
    PreDec { left: Box<Node> },
    PostInc { left: Box<Node> },
    PostDec { left: Box<Node> },
    Binary {
        op: BinaryOp,
        left: Box<Node>,
        right: Box<Node>,
    },
    /// A number, string, boolean or symbol leaf.
    Literal(Token),
}

/// A token written as a leaf node: its kind becomes the node type.
struct Leaf<'a>(&'a Token);

impl Serialize for Leaf<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let token = self.0;
        let mut state = serializer.serialize_struct("Leaf", 4)?;
        state.serialize_field("type", token.kind.name())?;
        state.serialize_field("value", &token.value)?;
        state.serialize_field("line", &token.line)?;
        state.serialize_field("col", &token.col)?;
        state.end()
    }
}

/// Every node is an object whose `type` is [`Node::kind`], so binary nodes
/// carry their operator (`{"type": "+", ...}`) and leaves their token kind.
impl Serialize for Node {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let kind = self.kind();
        macro_rules! node {
            ($($field: literal: $value: expr),*) => {{
                let mut state = serializer.serialize_struct("Node", 1 $(+ { let _ = $field; 1 })*)?;
                state.serialize_field("type", kind)?;
                $(state.serialize_field($field, $value)?;)*
                state.end()
            }};
        }

        match self {
            Node::Block(block) => block.serialize(serializer),
            Node::Literal(token) => Leaf(token).serialize(serializer),
            Node::FuncDef {
                func_name,
                parameters,
                body,
            } => node!("func_name": func_name, "parameters": parameters, "body": body),
            Node::Lambda { parameters, body } => node!("parameters": parameters, "body": body),
            Node::If { cond, body } | Node::While { cond, body } => {
                node!("cond": cond, "body": body)
            }
            Node::For {
                init,
                cond,
                inc,
                body,
            } => node!("init": init, "cond": cond, "inc": inc, "body": body),
            Node::InitVar { name, exp } => node!("name": name, "exp": exp),
            Node::Assign { var_name, exp } => node!("var_name": &Leaf(var_name), "exp": exp),
            Node::Enum { names } => node!("names": names),
            Node::Return { exp } => node!("exp": exp),
            Node::Break | Node::Continue => node!(),
            Node::List { elements } => node!("elements": elements),
            Node::Access { of, args } => node!("of": of, "args": args),
            Node::Negative { right } | Node::Bang { right } => node!("right": right),
            Node::PreInc { left }
            | Node::PreDec { left }
            | Node::PostInc { left }
            | Node::PostDec { left } => node!("left": left),
            Node::Binary { left, right, .. } => node!("left": left, "right": right),
        }
    }
}

impl Node {
    /// The node kind name, as used in the serialized tree. Binary nodes are
    /// named by their operator and leaves by their token kind.
    pub fn kind(&self) -> &'static str {
        match self {
            Node::Block(_) => "block",
            Node::FuncDef { .. } => "func_def",
            Node::Lambda { .. } => "lambda",
            Node::If { .. } => "if_s",
            Node::While { .. } => "while_s",
            Node::For { .. } => "for_s",
            Node::InitVar { .. } => "init_var",
            Node::Assign { .. } => "assign",
            Node::Enum { .. } => "enum",
            Node::Return { .. } => "return",
            Node::Break => "break",
            Node::Continue => "continue",
            Node::List { .. } => "list",
            Node::Access { .. } => "access",
            Node::Negative { .. } => "negative",
            Node::Bang { .. } => "bang",
            Node::PreInc { .. } => "pre_inc",
            Node::PreDec { .. } => "pre_dec",
            Node::PostInc { .. } => "post_inc",
            Node::PostDec { .. } => "post_dec",
            Node::Binary { op, .. } => op.as_str(),
            Node::Literal(token) => token.kind.name(),
        }
    }

    pub fn binary(op: BinaryOp, left: Node, right: Node) -> Self {
        Node::Binary {
            op,
            left: Box::new(left),
            right: Box::new(right),
        }
    }
}
