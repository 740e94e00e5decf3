use std::collections::VecDeque;

use crate::expr::*;
use crate::stmt::{self, *};
use crate::tokens::{Literal, Token, TokenType, Tokens};

pub(crate) fn parse(tokens: Tokens) -> Result<Vec<Stmt>, Vec<String>> {
    Parser::from(tokens).parse()
}

pub(super) struct Parser {
    tokens: VecDeque<Token>,
    next_id: usize,
    errors: Vec<String>,
}

impl Parser {
    pub(crate) fn parse(&mut self) -> Result<Vec<Stmt>, Vec<String>> {
        let mut statements: Vec<Stmt> = Vec::new();

        while self.peek().is_some() {
            match self.declaration() {
                Ok(statement) => statements.push(statement),
                Err(message) => {
                    self.errors.push(message);
                    self.synchronize();
                }
            }
        }

        match self.errors.is_empty() {
            true => Ok(statements),
            false => Err(std::mem::take(&mut self.errors)),
        }
    }

    fn declaration(&mut self) -> Result<Stmt, String> {
        match self.peek() {
            Some(token) => match token.token_type {
                TokenType::Class => {
                    self.advance()?;
                    self.class_declaration()
                }
                TokenType::Fun => {
                    self.advance()?;
                    Ok(Stmt::Function(self.function("function")?))
                }
                TokenType::Var => {
                    self.advance()?;
                    self.var_declaration()
                }
                _ => self.statement(),
            },
            None => self.statement(),
        }
    }

    fn class_declaration(&mut self) -> Result<Stmt, String> {
        let name = self.consume(TokenType::Identifier, "Expect class name.")?;

        let superclass = match self.check(&[TokenType::Less]) {
            true => {
                self.advance()?;
                let superclass_name =
                    self.consume(TokenType::Identifier, "Expect superclass name.")?;
                Some(VariableExpr::new(self.fresh_id(), superclass_name))
            }
            false => None,
        };

        self.consume(TokenType::LeftBrace, "Expect '{' before class body.")?;

        let mut methods: Vec<FunctionStmt> = Vec::new();
        while self.peek().is_some() && !self.check(&[TokenType::RightBrace]) {
            methods.push(self.function("method")?);
        }

        self.consume(TokenType::RightBrace, "Expect '}' after class body.")?;

        Ok(Stmt::Class(ClassStmt::new(name, superclass, methods)))
    }

    fn function(&mut self, kind: &str) -> Result<FunctionStmt, String> {
        let name = self.consume(TokenType::Identifier, &format!("Expect {} name.", kind))?;
        self.consume(
            TokenType::LeftParen,
            &format!("Expect '(' after {} name.", kind),
        )?;

        let mut params: Vec<Token> = Vec::new();
        if !self.check(&[TokenType::RightParen]) {
            loop {
                if params.len() >= 255 {
                    let message = self.error_at_front("Can't have more than 255 parameters.");
                    self.errors.push(message);
                }

                params.push(self.consume(TokenType::Identifier, "Expect parameter name.")?);

                if !self.check(&[TokenType::Comma]) {
                    break;
                }
                self.advance()?;
            }
        }
        self.consume(TokenType::RightParen, "Expect ')' after parameters.")?;

        self.consume(
            TokenType::LeftBrace,
            &format!("Expect '{{' before {} body.", kind),
        )?;
        let body = self.block()?;

        Ok(FunctionStmt::new(name, params, body))
    }

    fn var_declaration(&mut self) -> Result<Stmt, String> {
        let name = self.consume(TokenType::Identifier, "Expect variable name.")?;

        let initializer = match self.check(&[TokenType::Equal]) {
            true => {
                self.advance()?;
                Some(self.expression()?)
            }
            false => None,
        };

        self.consume(
            TokenType::Semicolon,
            "Expect ';' after variable declaration.",
        )?;
        Ok(Stmt::Var(VarStmt::new(name, initializer)))
    }

    fn statement(&mut self) -> Result<Stmt, String> {
        match self.peek() {
            Some(token) => match token.token_type {
                TokenType::For => {
                    self.advance()?;
                    self.for_statement()
                }
                TokenType::If => {
                    self.advance()?;
                    self.if_statement()
                }
                TokenType::Print => {
                    self.advance()?;
                    self.print_statement()
                }
                TokenType::Return => {
                    let keyword = self.advance()?;
                    self.return_statement(keyword)
                }
                TokenType::While => {
                    self.advance()?;
                    self.while_statement()
                }
                TokenType::LeftBrace => {
                    self.advance()?;
                    Ok(Stmt::Block(BlockStmt::new(self.block()?)))
                }
                _ => self.expression_statement(),
            },
            None => self.expression_statement(),
        }
    }

    // for(init; cond; inc) body desugars to
    // { init; while (cond) { body; inc; } } with a true literal standing in
    // for an omitted condition.
    fn for_statement(&mut self) -> Result<Stmt, String> {
        self.consume(TokenType::LeftParen, "Expect '(' after 'for'.")?;

        let initializer = match self.check(&[TokenType::Semicolon]) {
            true => {
                self.advance()?;
                None
            }
            false => match self.check(&[TokenType::Var]) {
                true => {
                    self.advance()?;
                    Some(self.var_declaration()?)
                }
                false => Some(self.expression_statement()?),
            },
        };

        let condition = match self.check(&[TokenType::Semicolon]) {
            true => Expr::Literal(LiteralExpr::new(self.fresh_id(), Literal::Boolean(true))),
            false => self.expression()?,
        };
        self.consume(TokenType::Semicolon, "Expect ';' after loop condition.")?;

        let increment = match self.check(&[TokenType::RightParen]) {
            true => None,
            false => Some(self.expression()?),
        };
        self.consume(TokenType::RightParen, "Expect ')' after for clauses.")?;

        let mut body = self.statement()?;

        if let Some(increment) = increment {
            body = Stmt::Block(BlockStmt::new(vec![
                body,
                Stmt::Expression(ExpressionStmt::new(increment)),
            ]));
        }

        body = Stmt::While(WhileStmt::new(condition, body));

        if let Some(initializer) = initializer {
            body = Stmt::Block(BlockStmt::new(vec![initializer, body]));
        }

        Ok(body)
    }

    fn if_statement(&mut self) -> Result<Stmt, String> {
        self.consume(TokenType::LeftParen, "Expect '(' after 'if'.")?;
        let condition = self.expression()?;
        self.consume(TokenType::RightParen, "Expect ')' after if condition.")?;

        let then_branch = self.statement()?;

        let else_branch = match self.check(&[TokenType::Else]) {
            true => {
                self.advance()?;
                self.statement()?
            }
            false => stmt::noop(),
        };

        Ok(Stmt::If(IfStmt::new(condition, then_branch, else_branch)))
    }

    fn print_statement(&mut self) -> Result<Stmt, String> {
        let value = self.expression()?;
        self.consume(TokenType::Semicolon, "Expect ';' after value.")?;
        Ok(Stmt::Print(PrintStmt::new(value)))
    }

    fn return_statement(&mut self, keyword: Token) -> Result<Stmt, String> {
        let value = match self.check(&[TokenType::Semicolon]) {
            true => None,
            false => Some(self.expression()?),
        };

        self.consume(TokenType::Semicolon, "Expect ';' after return value.")?;
        Ok(Stmt::Return(ReturnStmt::new(keyword, value)))
    }

    fn while_statement(&mut self) -> Result<Stmt, String> {
        self.consume(TokenType::LeftParen, "Expect '(' after 'while'.")?;
        let condition = self.expression()?;
        self.consume(TokenType::RightParen, "Expect ')' after condition.")?;

        let body = self.statement()?;

        Ok(Stmt::While(WhileStmt::new(condition, body)))
    }

    fn expression_statement(&mut self) -> Result<Stmt, String> {
        let expression = self.expression()?;
        self.consume(TokenType::Semicolon, "Expect ';' after expression.")?;
        Ok(Stmt::Expression(ExpressionStmt::new(expression)))
    }

    fn block(&mut self) -> Result<Vec<Stmt>, String> {
        let mut statements: Vec<Stmt> = Vec::new();

        while self.peek().is_some() && !self.check(&[TokenType::RightBrace]) {
            statements.push(self.declaration()?);
        }

        self.consume(TokenType::RightBrace, "Expect '}' after block.")?;

        return Ok(statements);
    }

    fn expression(&mut self) -> Result<Expr, String> {
        self.assignment()
    }

    // An invalid target is reported at the '=' but does not synchronize; the
    // left-hand expression has already been consumed.
    fn assignment(&mut self) -> Result<Expr, String> {
        let expr = self.or()?;

        if self.check(&[TokenType::Equal]) {
            let equals = self.advance()?;
            let value = self.assignment()?;

            return match expr {
                Expr::Variable(v) => Ok(Expr::Assign(AssignExpr::new(
                    self.fresh_id(),
                    v.name,
                    value,
                ))),
                Expr::Get(g) => Ok(Expr::Set(SetExpr::new(
                    self.fresh_id(),
                    *g.object,
                    g.name,
                    value,
                ))),
                invalid => {
                    self.errors
                        .push(error(&equals, "Invalid assignment target."));
                    Ok(invalid)
                }
            };
        }

        Ok(expr)
    }

    fn or(&mut self) -> Result<Expr, String> {
        let mut expression = self.and()?;

        while self.check(&[TokenType::Or]) {
            let operator = self.advance()?;
            let right = self.and()?;

            expression = Expr::Logical(LogicalExpr::new(
                self.fresh_id(),
                expression,
                operator,
                right,
            ));
        }

        Ok(expression)
    }

    fn and(&mut self) -> Result<Expr, String> {
        let mut expression = self.equality()?;

        while self.check(&[TokenType::And]) {
            let operator = self.advance()?;
            let right = self.equality()?;

            expression = Expr::Logical(LogicalExpr::new(
                self.fresh_id(),
                expression,
                operator,
                right,
            ));
        }

        Ok(expression)
    }

    fn equality(&mut self) -> Result<Expr, String> {
        let mut expression = self.comparison()?;

        while self.check(&[TokenType::BangEqual, TokenType::EqualEqual]) {
            let operator = self.advance()?;
            let right = self.comparison()?;

            expression = Expr::Binary(BinaryExpr::new(
                self.fresh_id(),
                expression,
                operator,
                right,
            ));
        }

        Ok(expression)
    }

    fn comparison(&mut self) -> Result<Expr, String> {
        let mut expression = self.term()?;

        while self.check(&[
            TokenType::Greater,
            TokenType::GreaterEqual,
            TokenType::Less,
            TokenType::LessEqual,
        ]) {
            let operator = self.advance()?;
            let right = self.term()?;

            expression = Expr::Binary(BinaryExpr::new(
                self.fresh_id(),
                expression,
                operator,
                right,
            ));
        }

        Ok(expression)
    }

    fn term(&mut self) -> Result<Expr, String> {
        let mut expression = self.factor()?;

        while self.check(&[TokenType::Plus, TokenType::Minus]) {
            let operator = self.advance()?;
            let right = self.factor()?;

            expression = Expr::Binary(BinaryExpr::new(
                self.fresh_id(),
                expression,
                operator,
                right,
            ));
        }

        Ok(expression)
    }

    fn factor(&mut self) -> Result<Expr, String> {
        let mut expression = self.unary()?;

        while self.check(&[TokenType::Slash, TokenType::Star]) {
            let operator = self.advance()?;
            let right = self.unary()?;

            expression = Expr::Binary(BinaryExpr::new(
                self.fresh_id(),
                expression,
                operator,
                right,
            ));
        }

        Ok(expression)
    }

    fn unary(&mut self) -> Result<Expr, String> {
        if !self.check(&[TokenType::Bang, TokenType::Minus]) {
            return self.call();
        }

        let operator = self.advance()?;
        let right = self.unary()?;

        Ok(Expr::Unary(UnaryExpr::new(self.fresh_id(), operator, right)))
    }

    fn call(&mut self) -> Result<Expr, String> {
        let mut expression = self.primary()?;

        loop {
            if self.check(&[TokenType::LeftParen]) {
                self.advance()?;
                expression = self.finish_call(expression)?;
            } else if self.check(&[TokenType::Dot]) {
                self.advance()?;
                let name = self.consume(TokenType::Identifier, "Expect property name after '.'.")?;
                expression = Expr::Get(GetExpr::new(self.fresh_id(), expression, name));
            } else {
                break;
            }
        }

        Ok(expression)
    }

    fn finish_call(&mut self, callee: Expr) -> Result<Expr, String> {
        let mut arguments: Vec<Expr> = Vec::new();

        if !self.check(&[TokenType::RightParen]) {
            loop {
                if arguments.len() >= 255 {
                    let message = self.error_at_front("Can't have more than 255 arguments.");
                    self.errors.push(message);
                }

                arguments.push(self.expression()?);

                if !self.check(&[TokenType::Comma]) {
                    break;
                }
                self.advance()?;
            }
        }

        let paren = self.consume(TokenType::RightParen, "Expect ')' after arguments.")?;

        Ok(Expr::Call(CallExpr::new(
            self.fresh_id(),
            callee,
            paren,
            arguments,
        )))
    }

    fn primary(&mut self) -> Result<Expr, String> {
        if self.peek().is_none() {
            return Err(self.error_at_front("Expect expression."));
        }

        let next_token = self.advance()?;

        let expression = match next_token.token_type {
            TokenType::False => Expr::Literal(LiteralExpr::new(
                self.fresh_id(),
                Literal::Boolean(false),
            )),
            TokenType::True => {
                Expr::Literal(LiteralExpr::new(self.fresh_id(), Literal::Boolean(true)))
            }
            TokenType::Nil => Expr::Literal(LiteralExpr::new(self.fresh_id(), Literal::Nil)),
            TokenType::Number => {
                Expr::Literal(LiteralExpr::new(self.fresh_id(), next_token.literal))
            }
            TokenType::String => {
                Expr::Literal(LiteralExpr::new(self.fresh_id(), next_token.literal))
            }
            TokenType::Identifier => Expr::Variable(VariableExpr::new(self.fresh_id(), next_token)),
            TokenType::This => Expr::This(ThisExpr::new(self.fresh_id(), next_token)),
            TokenType::Super => {
                self.consume(TokenType::Dot, "Expect '.' after 'super'.")?;
                let method = self.consume(TokenType::Identifier, "Expect superclass method name.")?;
                Expr::Super(SuperExpr::new(self.fresh_id(), next_token, method))
            }
            TokenType::LeftParen => {
                let inner_expression = self.expression()?;
                self.consume(TokenType::RightParen, "Expect ')' after expression.")?;
                Expr::Grouping(GroupingExpr::new(self.fresh_id(), inner_expression))
            }
            _ => return Err(error(&next_token, "Expect expression.")),
        };

        return Ok(expression);
    }

    // Discard tokens until a statement boundary, then resume parsing.
    fn synchronize(&mut self) {
        while let Some(token_type) = self.peek().map(|t| t.token_type) {
            match token_type {
                TokenType::Semicolon => {
                    _ = self.advance();
                    return;
                }
                TokenType::Class
                | TokenType::Fun
                | TokenType::Var
                | TokenType::For
                | TokenType::If
                | TokenType::While
                | TokenType::Print
                | TokenType::Return => return,
                _ => {
                    _ = self.advance();
                }
            }
        }
    }

    fn fresh_id(&mut self) -> usize {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    fn check(&self, token_types: &[TokenType]) -> bool {
        match self.peek() {
            None => false,
            Some(token) => token_types.iter().any(|&t| t == token.token_type),
        }
    }

    fn peek(&self) -> Option<&Token> {
        match self.tokens.front() {
            None => None,
            Some(eof) if TokenType::Eof == eof.token_type => None,
            Some(token) => Some(token),
        }
    }

    fn advance(&mut self) -> Result<Token, String> {
        match self.tokens.pop_front() {
            None => Err("Tried to pop_front on empty dequeue".to_string()),
            Some(eof) if TokenType::Eof == eof.token_type => {
                let message = error(&eof, "Expect expression.");
                self.tokens.push_front(eof);
                Err(message)
            }
            Some(token) => Ok(token),
        }
    }

    fn consume(&mut self, token_type: TokenType, message: &str) -> Result<Token, String> {
        match self.check(&[token_type]) {
            true => self.advance(),
            false => Err(self.error_at_front(message)),
        }
    }

    fn error_at_front(&self, message: &str) -> String {
        match self.tokens.front() {
            Some(token) => error(token, message),
            None => format!("Error at end: {}", message),
        }
    }
}

fn error(token: &Token, message: &str) -> String {
    match token.token_type {
        TokenType::Eof => format!("[line {}] Error at end: {}", token.line_number, message),
        _ => format!(
            "[line {}] Error at '{}': {}",
            token.line_number, token.lexeme, message
        ),
    }
}

impl From<Tokens> for Parser {
    fn from(tokens: Tokens) -> Self {
        Parser {
            tokens: tokens.into(),
            next_id: 0,
            errors: Vec::new(),
        }
    }
}
