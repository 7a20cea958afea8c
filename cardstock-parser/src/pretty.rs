//! Tree-shaped rendering of a parsed [`Program`].

use crate::ast::{Block, Node, Program};
use crate::lexer::TokenKind;
use crate::visitor::{walk_block, walk_node, walk_program, Visitor};
use std::fmt;

/// Displays a program as an indented tree:
///
/// ```text
/// program
/// └── init_var x
///     └── +
///         ├── num 1
///         └── num 2
/// ```
pub struct Tree<'a>(pub &'a Program);

fn label(node: &Node) -> String {
    match node {
        Node::FuncDef {
            func_name,
            parameters,
            ..
        } => format!("func_def {} [{}]", func_name, parameters.join(", ")),
        Node::Lambda { parameters, .. } => format!("lambda [{}]", parameters.join(", ")),
        Node::InitVar { name, .. } => format!("init_var {}", name),
        Node::Assign { var_name, .. } => format!("assign {}", var_name.value),
        Node::Enum { names } => format!("enum [{}]", names.join(", ")),
        Node::Literal(token) => match token.kind {
            TokenKind::Str => format!("string {:?}", token.value.to_string()),
            TokenKind::True | TokenKind::False => token.kind.to_string(),
            _ => format!("{} {}", token.kind, token.value),
        },
        other => other.kind().to_string(),
    }
}

/// Collects one `(depth, label)` line per visited node, in pre-order.
#[derive(Default)]
struct Lines {
    lines: Vec<(usize, String)>,
    depth: usize,
}

impl Lines {
    fn push(&mut self, label: String) {
        self.lines.push((self.depth, label));
    }
}

impl<'ast> Visitor<'ast> for Lines {
    fn visit_node(&mut self, node: &'ast Node) {
        if let Node::Block(block) = node {
            return self.visit_block(block);
        }

        self.push(label(node));
        self.depth += 1;
        match node {
            // empty header slots are shown as `(none)`
            Node::For {
                init,
                cond,
                inc,
                body,
            } => {
                for part in [init, cond, inc].iter().copied() {
                    match part {
                        Some(part) => self.visit_node(part),
                        None => self.push("(none)".to_string()),
                    }
                }
                self.visit_block(body);
            }
            _ => walk_node(self, node),
        }
        self.depth -= 1;
    }

    fn visit_block(&mut self, block: &'ast Block) {
        self.push("block".to_string());
        self.depth += 1;
        walk_block(self, block);
        self.depth -= 1;
    }
}

impl fmt::Display for Tree<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut lines = Lines::default();
        walk_program(&mut lines, self.0);
        let lines = lines.lines;

        // a line is the last child if no sibling follows before its parent ends
        let mut last = vec![false; lines.len()];
        let mut sibling_below: Vec<bool> = Vec::new();
        for (i, (depth, _)) in lines.iter().enumerate().rev() {
            sibling_below.truncate(depth + 1);
            last[i] = sibling_below.get(*depth) != Some(&true);
            sibling_below.resize(depth + 1, false);
            sibling_below[*depth] = true;
        }

        writeln!(f, "program")?;
        // whether each open ancestor still has children to come
        let mut open: Vec<bool> = Vec::new();
        for ((depth, label), last) in lines.iter().zip(last) {
            open.truncate(*depth);
            for &more in &open {
                f.write_str(if more { "│   " } else { "    " })?;
            }
            writeln!(f, "{}{}", if last { "└── " } else { "├── " }, label)?;
            open.push(!last);
        }
        Ok(())
    }
}
