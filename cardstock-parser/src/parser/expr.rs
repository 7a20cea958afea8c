use super::*;
use crate::ast::BinaryOp;

/// Kinds that start a single-token atom.
fn is_leaf(kind: TokenKind) -> bool {
    matches!(
        kind,
        TokenKind::Num | TokenKind::Str | TokenKind::True | TokenKind::False | TokenKind::Symbol
    )
}

impl<'a> Parser<'a> {
    /* Expressions */
    /// Parses any expression, failing if none starts at the current token.
    pub fn parse_expr(&mut self) -> Result<Node, ParseError> {
        self.required(Self::parse_expr_opt)
    }

    /// Parses an expression, or returns `None` if none starts at the current token.
    pub fn parse_expr_opt(&mut self) -> Result<Option<Node>, ParseError> {
        self.parse_or()
    }

    /// Returns the binary operator at the current token if it is one of `kinds`.
    /// `==` and `!=` share a kind, so the operator is read from the lexeme.
    fn binary_op(&self, kinds: &[TokenKind]) -> Option<BinaryOp> {
        let token = self.current();
        if !kinds.contains(&token.kind) {
            return None;
        }
        token.text().and_then(BinaryOp::from_lexeme)
    }

    /// Parses a left-associative tier: `operand ( op operand )*`.
    fn parse_left_assoc(
        &mut self,
        kinds: &[TokenKind],
        operand: fn(&mut Self) -> Result<Option<Node>, ParseError>,
    ) -> Result<Option<Node>, ParseError> {
        let mut lhs = operand(self)?;

        while let Some(op) = self.binary_op(kinds) {
            let left = match lhs {
                Some(left) => left,
                None => return Err(self.expected_expression()),
            };
            self.advance(); // eat operator
            let right = self.required(operand)?;
            lhs = Some(Node::binary(op, left, right));
        }

        Ok(lhs)
    }

    fn parse_or(&mut self) -> Result<Option<Node>, ParseError> {
        self.parse_left_assoc(&[TokenKind::Or], Self::parse_and)
    }

    fn parse_and(&mut self) -> Result<Option<Node>, ParseError> {
        self.parse_left_assoc(&[TokenKind::And], Self::parse_eq)
    }

    fn parse_eq(&mut self) -> Result<Option<Node>, ParseError> {
        self.parse_left_assoc(&[TokenKind::Eq], Self::parse_ineq)
    }

    /// Inequalities chain to the right: `a < b < c` is `a < (b < c)`.
    fn parse_ineq(&mut self) -> Result<Option<Node>, ParseError> {
        let lhs = self.parse_alg()?;

        let op = match self.binary_op(&[TokenKind::Lt, TokenKind::Le, TokenKind::Gt, TokenKind::Ge]) {
            Some(op) => op,
            None => return Ok(lhs),
        };
        let left = match lhs {
            Some(left) => left,
            None => return Err(self.expected_expression()),
        };
        self.advance(); // eat operator
        let right = self.required(Self::parse_ineq)?;
        Ok(Some(Node::binary(op, left, right)))
    }

    fn parse_alg(&mut self) -> Result<Option<Node>, ParseError> {
        self.parse_left_assoc(&[TokenKind::Plus, TokenKind::Minus], Self::parse_term)
    }

    fn parse_term(&mut self) -> Result<Option<Node>, ParseError> {
        self.parse_left_assoc(&[TokenKind::Mult, TokenKind::Div], Self::parse_unary)
    }

    /// Parses prefix `-`, `!`, `++`, `--` and postfix `++`, `--`.
    fn parse_unary(&mut self) -> Result<Option<Node>, ParseError> {
        let kind = self.current().kind;
        match kind {
            TokenKind::Minus => {
                self.advance();
                let right = self.required(Self::parse_atom)?;
                Ok(Some(Node::Negative {
                    right: Box::new(right),
                }))
            }
            TokenKind::Bang => {
                let mut depth = 0;
                while self.eat(TokenKind::Bang) {
                    depth += 1;
                }
                let mut node = self.required(Self::parse_atom)?;
                for _ in 0..depth {
                    node = Node::Bang {
                        right: Box::new(node),
                    };
                }
                Ok(Some(node))
            }
            TokenKind::Inc | TokenKind::Dec => {
                self.advance();
                let left = Box::new(self.required(Self::parse_atom)?);
                Ok(Some(if kind == TokenKind::Inc {
                    Node::PreInc { left }
                } else {
                    Node::PreDec { left }
                }))
            }
            _ if is_leaf(kind) && matches!(self.peek().kind, TokenKind::Inc | TokenKind::Dec) => {
                let leaf = Box::new(Node::Literal(self.current().clone()));
                self.advance();
                let op = self.current().kind;
                self.advance(); // eat `++` or `--`
                Ok(Some(if op == TokenKind::Inc {
                    Node::PostInc { left: leaf }
                } else {
                    Node::PostDec { left: leaf }
                }))
            }
            _ => self.parse_atom(),
        }
    }

    /* Expressions.Atoms */
    /// Parses a primary with an optional `.key` or `[args]` access.
    /// The key is a whole atom, so chains nest to the right: `a.b.c` is `a.(b.c)`.
    pub(super) fn parse_atom(&mut self) -> Result<Option<Node>, ParseError> {
        let node = match self.parse_primary()? {
            Some(node) => node,
            None => return Ok(None),
        };

        let key = match self.current().kind {
            TokenKind::Period => {
                self.advance();
                self.required(Self::parse_atom)?
            }
            // the bracketed key is a list atom carrying its own accesses
            TokenKind::LBracket => self.required(Self::parse_atom)?,
            _ => return Ok(Some(node)),
        };

        Ok(Some(Node::Access {
            of: Box::new(node),
            args: vec![key],
        }))
    }

    /// Parses a literal leaf, a list or a lambda.
    fn parse_primary(&mut self) -> Result<Option<Node>, ParseError> {
        match self.current().kind {
            kind if is_leaf(kind) => {
                let token = self.current().clone();
                self.advance();
                Ok(Some(Node::Literal(token)))
            }
            TokenKind::LBracket => self.parse_list().map(Some),
            TokenKind::Lambda => self.parse_lambda().map(Some),
            _ => Ok(None),
        }
    }

    /// Parses `'[' ( expression ( ',' expression )* )? ']'`.
    fn parse_list(&mut self) -> Result<Node, ParseError> {
        self.expect(TokenKind::LBracket)?;

        let mut elements = Vec::new();
        if let Some(first) = self.parse_expr_opt()? {
            elements.push(first);
            while self.eat(TokenKind::Comma) {
                elements.push(self.parse_expr()?);
            }
        }

        self.expect(TokenKind::RBracket)?;
        Ok(Node::List { elements })
    }

    /// Parses `'=>' '[' param_list? ']' block`.
    fn parse_lambda(&mut self) -> Result<Node, ParseError> {
        self.expect(TokenKind::Lambda)?;
        let parameters = self.parse_params()?;
        let body = self.parse_block()?;
        Ok(Node::Lambda { parameters, body })
    }
}

#[cfg(test)]
mod tests {
    use super::super::tests::{assert_leaf, parse_err, program};
    use super::*;
    use insta::assert_snapshot;

    fn expr(source: &str) -> Node {
        let mut ast = program(&format!("let _ = {}", source));
        match ast.statements.remove(0) {
            Node::InitVar { exp, .. } => *exp,
            other => panic!("expected init_var, got {:?}", other),
        }
    }

    /// Renders an expression in fully parenthesized prefix form.
    fn sexp(node: &Node) -> String {
        match node {
            Node::Literal(token) => token.value.to_string(),
            Node::Binary { op, left, right } => format!("({} {} {})", op, sexp(left), sexp(right)),
            Node::Negative { right } => format!("(neg {})", sexp(right)),
            Node::Bang { right } => format!("(! {})", sexp(right)),
            Node::PreInc { left } => format!("(pre++ {})", sexp(left)),
            Node::PreDec { left } => format!("(pre-- {})", sexp(left)),
            Node::PostInc { left } => format!("(post++ {})", sexp(left)),
            Node::PostDec { left } => format!("(post-- {})", sexp(left)),
            Node::List { elements } => {
                let elements: Vec<String> = elements.iter().map(sexp).collect();
                format!("[{}]", elements.join(", "))
            }
            Node::Access { of, args } => format!("(access {} {})", sexp(of), sexp(&args[0])),
            Node::Lambda { parameters, body } => {
                format!("(lambda [{}] {})", parameters.join(", "), body.body.len())
            }
            other => panic!("not an expression: {:?}", other),
        }
    }

    fn shape(source: &str) -> String {
        sexp(&expr(source))
    }

    #[test]
    fn test_literal() {
        assert_leaf(&expr("true"), TokenKind::True, "true");
        assert_leaf(&expr("false"), TokenKind::False, "false");
        assert_leaf(&expr("1"), TokenKind::Num, "1");
        assert_leaf(&expr("2.5"), TokenKind::Num, "2.5");
        assert_leaf(&expr("'hi'"), TokenKind::Str, "hi");
        assert_leaf(&expr("foo"), TokenKind::Symbol, "foo");
    }

    #[test]
    fn test_binary_expr() {
        assert_snapshot!(shape("1 + 1"), @"(+ 1 1)");
        assert_snapshot!(shape("1 + 2 * 3"), @"(+ 1 (* 2 3))");
        assert_snapshot!(shape("1 == 2 - 1"), @"(== 1 (- 2 1))");
        assert_snapshot!(shape("2 * 2 * 2"), @"(* (* 2 2) 2)"); // left associative
        assert_snapshot!(shape("8 - 4 - 2"), @"(- (- 8 4) 2)");
        assert_snapshot!(shape("a || b && c"), @"(|| a (&& b c))");
        assert_snapshot!(shape("a && b || c && d"), @"(|| (&& a b) (&& c d))");
        assert_snapshot!(shape("a == b && c != d"), @"(&& (== a b) (!= c d))");
        assert_snapshot!(shape("a + b < c * d"), @"(< (+ a b) (* c d))");
    }

    #[test]
    fn test_eq_and_ne_share_a_kind() {
        assert_snapshot!(shape("a != b"), @"(!= a b)");
        assert_snapshot!(shape("a == b != c"), @"(!= (== a b) c)");
    }

    #[test]
    fn test_inequalities_are_right_associative() {
        assert_snapshot!(shape("a < b < c"), @"(< a (< b c))");
        assert_snapshot!(shape("a >= b > c <= d"), @"(>= a (> b (<= c d)))");
    }

    #[test]
    fn test_unary() {
        assert_snapshot!(shape("-x"), @"(neg x)");
        assert_snapshot!(shape("-2 * 3"), @"(* (neg 2) 3)");
        assert_snapshot!(shape("!x"), @"(! x)");
        assert_snapshot!(shape("!!!x"), @"(! (! (! x)))");
        assert_snapshot!(shape("!a && b"), @"(&& (! a) b)");
        assert_snapshot!(shape("++i"), @"(pre++ i)");
        assert_snapshot!(shape("--i"), @"(pre-- i)");
        assert_snapshot!(shape("i++"), @"(post++ i)");
        assert_snapshot!(shape("i--"), @"(post-- i)");
        assert_snapshot!(shape("i++ + 1"), @"(+ (post++ i) 1)");
    }

    #[test]
    fn test_postfix_binds_to_leaf_only() {
        assert!(matches!(
            parse_err("let _ = a.b++"),
            ParseError::UnexpectedToken {
                expected: TokenKind::Eof,
                ..
            }
        ));
    }

    #[test]
    fn test_list() {
        assert_snapshot!(shape("[]"), @"[]");
        assert_snapshot!(shape("[1]"), @"[1]");
        assert_snapshot!(shape("[1, 2 + 3, [4]]"), @"[1, (+ 2 3), [4]]");
        assert!(matches!(
            parse_err("let _ = [1\n2]"),
            ParseError::UnexpectedToken {
                expected: TokenKind::RBracket,
                ..
            }
        ));
        assert!(matches!(
            parse_err("let _ = [1,]"),
            ParseError::ExpectedExpression { .. }
        ));
    }

    #[test]
    fn test_access() {
        assert_snapshot!(shape("point.x"), @"(access point x)");
        assert_snapshot!(shape("xs[0]"), @"(access xs [0])");
        assert_snapshot!(shape("print [1, 2]"), @"(access print [1, 2])");
        assert_snapshot!(shape("xs[0] + 1"), @"(+ (access xs [0]) 1)");
        assert!(matches!(
            parse_err("let _ = a."),
            ParseError::ExpectedExpression { .. }
        ));
    }

    #[test]
    fn test_access_chains_nest_to_the_right() {
        assert_snapshot!(shape("a.b.c"), @"(access a (access b c))");
        assert_snapshot!(shape("xs[0][1]"), @"(access xs (access [0] [1]))");
        assert_snapshot!(shape("obj.method[x]"), @"(access obj (access method [x]))");
        assert_snapshot!(shape("f [a].len"), @"(access f (access [a] len))");
    }

    #[test]
    fn test_lambda() {
        assert_snapshot!(shape("=> [x, y] [return x + y]"), @"(lambda [x, y] 1)");
        assert_snapshot!(shape("=> [] [1; 2]"), @"(lambda [] 2)");
        assert_snapshot!(
            shape("map [xs, => [x] [return x * 2]]"),
            @"(access map [xs, (lambda [x] 1)])"
        );
    }

    #[test]
    fn test_missing_operand() {
        assert!(matches!(
            parse_err("let _ = 1 +"),
            ParseError::ExpectedExpression { .. }
        ));
        assert!(matches!(
            parse_err("* 2"),
            ParseError::ExpectedExpression { .. }
        ));
        assert!(matches!(
            parse_err("let _ = -"),
            ParseError::ExpectedExpression { .. }
        ));
        let err = parse_err("let _ = a < ");
        assert_eq!(err.found().kind, TokenKind::Eof);
    }
}
