use super::*;
use crate::ast::Block;

impl<'a> Parser<'a> {
    /// Parses statements separated by newlines or `;`.
    /// Empty statements (blank lines, doubled separators) are skipped.
    pub(super) fn parse_statement_list(&mut self) -> Result<Vec<Node>, ParseError> {
        let mut statements = Vec::new();
        loop {
            if let Some(statement) = self.parse_statement()? {
                statements.push(statement);
            }
            if !self.current().kind.is_separator() {
                break;
            }
            self.advance();
        }
        Ok(statements)
    }

    /// Parses a statement, or returns `None` if nothing starts here.
    pub fn parse_statement(&mut self) -> Result<Option<Node>, ParseError> {
        match self.current().kind {
            TokenKind::Symbol => self.parse_symbol_statement(),
            TokenKind::Func => self.parse_func_def().map(Some),
            TokenKind::If => self.parse_if().map(Some),
            TokenKind::For => self.parse_for().map(Some),
            TokenKind::Let => self.parse_init_var().map(Some),
            TokenKind::Enum => self.parse_enum().map(Some),
            TokenKind::While => self.parse_while().map(Some),
            TokenKind::Return => self.parse_return().map(Some),
            TokenKind::LBracket => self.parse_block().map(|block| Some(Node::Block(block))),
            _ => self.parse_expr_opt(),
        }
    }

    /// Dispatches a statement starting with a symbol on the following token.
    fn parse_symbol_statement(&mut self) -> Result<Option<Node>, ParseError> {
        match self.peek().kind {
            TokenKind::LBracket | TokenKind::Period => self.parse_atom(),
            TokenKind::Assign => self.parse_assign().map(Some),
            _ => match self.current().text() {
                Some("break") => {
                    self.advance();
                    Ok(Some(Node::Break))
                }
                Some("continue") => {
                    self.advance();
                    Ok(Some(Node::Continue))
                }
                _ => self.parse_expr_opt(),
            },
        }
    }

    /// Parses `'[' statement ( separator statement )* ']'`.
    pub fn parse_block(&mut self) -> Result<Block, ParseError> {
        self.expect(TokenKind::LBracket)?;
        let body = self.parse_statement_list()?;
        self.expect(TokenKind::RBracket)?;
        Ok(Block { body })
    }

    /// Parses `'[' ( symbol ( ',' symbol )* )? ']'`.
    pub(super) fn parse_params(&mut self) -> Result<Vec<String>, ParseError> {
        self.expect(TokenKind::LBracket)?;
        let mut params = Vec::new();
        if !self.eat(TokenKind::RBracket) {
            loop {
                params.push(self.expect_symbol()?);
                if !self.eat(TokenKind::Comma) {
                    break;
                }
            }
            self.expect(TokenKind::RBracket)?;
        }
        Ok(params)
    }

    fn parse_func_def(&mut self) -> Result<Node, ParseError> {
        self.expect(TokenKind::Func)?;
        let func_name = self.expect_symbol()?;
        let parameters = self.parse_params()?;
        let body = self.parse_block()?;
        Ok(Node::FuncDef {
            func_name,
            parameters,
            body,
        })
    }

    /// Parses the `'[' expression ']'` condition of `if` and `while`.
    fn parse_condition(&mut self) -> Result<Box<Node>, ParseError> {
        self.expect(TokenKind::LBracket)?;
        let cond = self.parse_expr()?;
        self.expect(TokenKind::RBracket)?;
        Ok(Box::new(cond))
    }

    fn parse_if(&mut self) -> Result<Node, ParseError> {
        self.expect(TokenKind::If)?;
        let cond = self.parse_condition()?;
        let body = self.parse_block()?;
        Ok(Node::If { cond, body })
    }

    fn parse_while(&mut self) -> Result<Node, ParseError> {
        self.expect(TokenKind::While)?;
        let cond = self.parse_condition()?;
        let body = self.parse_block()?;
        Ok(Node::While { cond, body })
    }

    fn parse_for(&mut self) -> Result<Node, ParseError> {
        self.expect(TokenKind::For)?;
        self.expect(TokenKind::LBracket)?;

        let init = if self.at(TokenKind::Semicolon) {
            None
        } else {
            self.parse_statement()?
        };
        self.expect(TokenKind::Semicolon)?;

        let cond = if self.at(TokenKind::Semicolon) {
            None
        } else {
            self.parse_expr_opt()?
        };
        self.expect(TokenKind::Semicolon)?;

        let inc = if self.at(TokenKind::RBracket) {
            None
        } else {
            self.parse_statement()?
        };
        self.expect(TokenKind::RBracket)?;

        let body = self.parse_block()?;
        Ok(Node::For {
            init: init.map(Box::new),
            cond: cond.map(Box::new),
            inc: inc.map(Box::new),
            body,
        })
    }

    fn parse_init_var(&mut self) -> Result<Node, ParseError> {
        self.expect(TokenKind::Let)?;
        let name = self.expect_symbol()?;
        self.expect(TokenKind::Assign)?;
        let exp = self.parse_expr()?;
        Ok(Node::InitVar {
            name,
            exp: Box::new(exp),
        })
    }

    fn parse_assign(&mut self) -> Result<Node, ParseError> {
        let var_name = self.expect(TokenKind::Symbol)?;
        self.expect(TokenKind::Assign)?;
        let exp = self.parse_expr()?;
        Ok(Node::Assign {
            var_name,
            exp: Box::new(exp),
        })
    }

    /// Parses `'enum' '[' symbol ( separator symbol )* ']'`.
    /// Blank separators around the names are allowed.
    fn parse_enum(&mut self) -> Result<Node, ParseError> {
        self.expect(TokenKind::Enum)?;
        self.expect(TokenKind::LBracket)?;

        let mut names = Vec::new();
        loop {
            while self.current().kind.is_separator() {
                self.advance();
            }
            if names.is_empty() || !self.at(TokenKind::RBracket) {
                names.push(self.expect_symbol()?);
            }
            if !self.current().kind.is_separator() {
                break;
            }
        }

        self.expect(TokenKind::RBracket)?;
        Ok(Node::Enum { names })
    }

    fn parse_return(&mut self) -> Result<Node, ParseError> {
        self.expect(TokenKind::Return)?;
        let exp = self.parse_expr()?;
        Ok(Node::Return { exp: Box::new(exp) })
    }
}
