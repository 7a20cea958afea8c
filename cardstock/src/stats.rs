//! Size statistics over a parsed program, reported in verbose mode.

use cardstock_parser::ast::{Node, Program};
use cardstock_parser::visitor::{walk_node, walk_program, Visitor};

#[derive(Debug, Default)]
pub struct Stats {
    /// Top-level statements.
    pub statements: usize,
    /// All nodes below the program root.
    pub nodes: usize,
    /// Deepest nesting of nodes; a lone leaf statement has depth 1.
    pub depth: usize,
    current_depth: usize,
}

impl Stats {
    pub fn collect(program: &Program) -> Self {
        let mut stats = Stats {
            statements: program.statements.len(),
            ..Stats::default()
        };
        walk_program(&mut stats, program);
        stats
    }
}

impl<'ast> Visitor<'ast> for Stats {
    fn visit_node(&mut self, node: &'ast Node) {
        self.nodes += 1;
        self.current_depth += 1;
        self.depth = self.depth.max(self.current_depth);
        walk_node(self, node);
        self.current_depth -= 1;
    }
}
