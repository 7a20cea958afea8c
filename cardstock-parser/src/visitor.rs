//! Visitor pattern for AST nodes.

use crate::ast::{Block, Node, Program};

pub trait Visitor<'ast>: Sized {
    fn visit_node(&mut self, node: &'ast Node) {
        walk_node(self, node);
    }
    fn visit_block(&mut self, block: &'ast Block) {
        walk_block(self, block);
    }
}

/// Iteratively visit all nodes in a `Vec<Node>`.
macro_rules! visit_node_list {
    ($visitor: expr, $body: expr) => {
        for node in $body {
            Visitor::visit_node($visitor, node);
        }
    };
}

pub fn walk_program<'ast>(visitor: &mut impl Visitor<'ast>, program: &'ast Program) {
    visit_node_list!(visitor, &program.statements);
}

pub fn walk_block<'ast>(visitor: &mut impl Visitor<'ast>, block: &'ast Block) {
    visit_node_list!(visitor, &block.body);
}

pub fn walk_node<'ast>(visitor: &mut impl Visitor<'ast>, node: &'ast Node) {
    match node {
        Node::Block(block) => visitor.visit_block(block),
        Node::FuncDef { body, .. } | Node::Lambda { body, .. } => visitor.visit_block(body),
        Node::If { cond, body } | Node::While { cond, body } => {
            visitor.visit_node(cond);
            visitor.visit_block(body);
        }
        Node::For {
            init,
            cond,
            inc,
            body,
        } => {
            if let Some(init) = init {
                visitor.visit_node(init);
            }
            if let Some(cond) = cond {
                visitor.visit_node(cond);
            }
            if let Some(inc) = inc {
                visitor.visit_node(inc);
            }
            visitor.visit_block(body);
        }
        Node::InitVar { exp, .. } | Node::Assign { exp, .. } | Node::Return { exp } => {
            visitor.visit_node(exp)
        }
        Node::List { elements } => visit_node_list!(visitor, elements),
        Node::Access { of, args } => {
            visitor.visit_node(of);
            visit_node_list!(visitor, args);
        }
        Node::Negative { right } | Node::Bang { right } => visitor.visit_node(right),
        Node::PreInc { left }
        | Node::PreDec { left }
        | Node::PostInc { left }
        | Node::PostDec { left } => visitor.visit_node(left),
        Node::Binary { left, right, .. } => {
            visitor.visit_node(left);
            visitor.visit_node(right);
        }
        Node::Enum { .. } | Node::Break | Node::Continue | Node::Literal(_) => {}
    }
}
