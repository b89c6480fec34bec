use indexmap::IndexMap;

use super::builtins::{self, CallContext};
use super::capabilities::Capabilities;
use super::error::JustcError;
use super::evaluator::{evaluate_binary, evaluate_unary, inequality, takes_then_branch};
use super::resolver::{CallCache, Resolver};
use super::result::{LogBook, OutputMode, OutputPlan, ParseResult};
use crate::ast::{BinaryOp, Command, Declaration, Expr, ExprKind, Statement, UnaryOp};
use crate::config::ParseOptions;
use crate::diagnostic::Span;
use crate::token::{Token, TokenKind};
use crate::value::{parse_decimal, parse_radix, Value};

/// Recursive-descent parser over a token stream. Parsing, command
/// execution and resolution all happen in [`TokenParser::parse`].
pub struct TokenParser<'c> {
    tokens: Vec<Token>,
    current: usize,
    options: ParseOptions,
    capabilities: &'c dyn Capabilities,
    declarations: Vec<Declaration>,
    logbook: LogBook,
    calls: CallCache,
    plan: OutputPlan,
    strict: bool,
    allow_javascript: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Assign {
    Plain,
    Inequality,
    Conditional,
    ConditionalInequality,
}

impl<'c> TokenParser<'c> {
    pub fn new(tokens: Vec<Token>, options: ParseOptions, capabilities: &'c dyn Capabilities) -> Self {
        Self {
            tokens,
            current: 0,
            options,
            capabilities,
            declarations: Vec::new(),
            logbook: LogBook::default(),
            calls: CallCache::default(),
            plan: OutputPlan::default(),
            strict: false,
            allow_javascript: false,
        }
    }

    /// Parse, resolve and shape the output. Never fails: an error ends up in
    /// `ParseResult::error` and as an `ERROR` log entry.
    pub fn parse(mut self) -> ParseResult {
        let outcome = self.run();

        let (outputs, error) = match outcome {
            Ok(outputs) => (outputs, None),
            Err(err) => {
                let offset = err.offset().unwrap_or_else(|| self.current_offset());
                self.logbook.push("ERROR", err.to_string(), offset);
                (IndexMap::new(), Some(err))
            }
        };

        let allow_javascript = self.allow_javascript;
        let mut result = ParseResult::from_logbook(self.logbook, outputs, error);
        result.allow_javascript = allow_javascript;
        result
    }

    fn run(&mut self) -> Result<IndexMap<String, Value>, JustcError> {
        while let Some(token) = self.peek() {
            match token.kind {
                TokenKind::Comma => {
                    self.advance();
                }
                TokenKind::Dot => break,
                _ => match self.parse_statement()? {
                    Statement::Declaration(decl) => self.declare(decl)?,
                    Statement::Command(command) => self.execute(command),
                },
            }
        }

        self.plan.validate()?;
        let table = Resolver::new(
            &self.declarations,
            &self.options,
            self.capabilities,
            &mut self.logbook,
            &mut self.calls,
        )
        .resolve()?;
        self.plan.shape(&table)
    }

    // ===== Token helpers =====

    fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.current)
    }

    fn peek_next(&self) -> Option<&Token> {
        self.tokens.get(self.current + 1)
    }

    fn advance(&mut self) -> Option<Token> {
        let token = self.tokens.get(self.current).cloned();
        if token.is_some() {
            self.current += 1;
        }
        token
    }

    fn current_offset(&self) -> usize {
        match self.peek() {
            Some(token) => token.offset,
            None => self
                .tokens
                .last()
                .map(|t| t.offset + t.text.len())
                .unwrap_or(0),
        }
    }

    fn check_operator(&self, op: &str) -> bool {
        self.peek().map_or(false, |t| t.is_operator(op))
    }

    fn check_keyword(&self, word: &str) -> bool {
        self.peek().map_or(false, |t| t.is_keyword(word))
    }

    fn check_kind(&self, kind: TokenKind) -> bool {
        self.peek().map_or(false, |t| t.kind == kind)
    }

    fn next_is_call(&self) -> bool {
        self.peek_next().map_or(false, |t| t.is_operator("("))
    }

    fn unexpected(&self) -> JustcError {
        match self.peek() {
            Some(token) => JustcError::parse_at(
                format!("Unexpected token: {} at position {}", token.text, token.offset),
                token.offset,
            ),
            None => {
                let offset = self.current_offset();
                JustcError::parse_at(format!("Unexpected end of input at position {}", offset), offset)
            }
        }
    }

    fn expect_operator(&mut self, op: &str, context: &str) -> Result<Token, JustcError> {
        if self.check_operator(op) {
            if let Some(token) = self.advance() {
                return Ok(token);
            }
        }
        let offset = self.current_offset();
        Err(JustcError::parse_at(
            format!("Expected '{}' {} at position {}", op, context, offset),
            offset,
        ))
    }

    fn expect_kind(&mut self, kind: TokenKind, context: &str) -> Result<Token, JustcError> {
        if self.check_kind(kind) {
            if let Some(token) = self.advance() {
                return Ok(token);
            }
        }
        let offset = self.current_offset();
        Err(JustcError::parse_at(
            format!("Expected {} {} at position {}", kind, context, offset),
            offset,
        ))
    }

    // ===== Statements =====

    fn parse_statement(&mut self) -> Result<Statement, JustcError> {
        let token = match self.peek() {
            Some(token) => token.clone(),
            None => return Err(self.unexpected()),
        };

        match (token.kind, token.text.as_str()) {
            (TokenKind::Identifier, _) => self.parse_declaration().map(Statement::Declaration),
            (TokenKind::Keyword, "TYPE") => self.parse_mode_directive(&["GLOBAL", "LOCAL", "STRICT"]),
            (TokenKind::Keyword, "OUTPUT") => self.parse_mode_directive(&["SPECIFIED", "EVERYTHING", "DISABLED"]),
            (TokenKind::Keyword, "RETURN") => self.parse_return(),
            (TokenKind::Keyword, "ALLOW") | (TokenKind::Keyword, "DISALLOW") => self.parse_allow(),
            (TokenKind::Keyword, "IMPORT") => self.parse_import(),
            (TokenKind::Keyword, "ECHO") | (TokenKind::Keyword, "LOG") | (TokenKind::Keyword, "LOGFILE") => {
                self.parse_command()
            }
            _ => Err(self.unexpected()),
        }
    }

    fn parse_declaration(&mut self) -> Result<Declaration, JustcError> {
        let name = self.expect_kind(TokenKind::Identifier, "as variable name")?;

        let assign = match self.peek() {
            Some(t) if t.is_keyword("is") || t.is_operator("=") => Assign::Plain,
            Some(t) if t.is_keyword("isn't") || t.is_operator("!=") => Assign::Inequality,
            Some(t) if t.is_keyword("isif") || t.is_operator("?") => Assign::Conditional,
            Some(t) if t.is_keyword("isifn't") => Assign::ConditionalInequality,
            _ => {
                let offset = self.current_offset();
                return Err(JustcError::parse_at(
                    format!("Expected 'is' after '{}' at position {}", name.text, offset),
                    offset,
                ));
            }
        };
        self.advance();

        let expr = self.parse_expression()?;
        let expr = match assign {
            Assign::Plain | Assign::Conditional => expr,
            Assign::Inequality | Assign::ConditionalInequality => {
                let span = expr.span;
                fold(Expr::new(ExprKind::Inequality(Box::new(expr)), span))
            }
        };

        Ok(Declaration::new(name.text, expr, name.offset))
    }

    fn declare(&mut self, decl: Declaration) -> Result<(), JustcError> {
        if self.strict && self.declarations.iter().any(|d| d.name == decl.name) {
            return Err(JustcError::DuplicateDeclaration {
                name: decl.name,
                offset: decl.offset,
            });
        }
        self.declarations.push(decl);
        Ok(())
    }

    /// `TYPE <mode>` and `OUTPUT <mode>`.
    fn parse_mode_directive(&mut self, modes: &[&str]) -> Result<Statement, JustcError> {
        let directive = self.advance().ok_or_else(|| self.unexpected())?;

        match self.peek() {
            Some(mode) if mode.kind == TokenKind::Keyword && modes.contains(&mode.text.as_str()) => {
                let mode = mode.text.clone();
                self.advance();
                Ok(Statement::Command(Command {
                    name: directive.text,
                    args: vec![Value::String(mode)],
                    offset: directive.offset,
                }))
            }
            Some(other) => Err(JustcError::parse_at(
                format!("Invalid {} mode: {} at position {}", directive.text, other.text, other.offset),
                other.offset,
            )),
            None => Err(self.unexpected()),
        }
    }

    /// `RETURN [a, b] AS [x, _]`. Names become `Variable` arguments and
    /// aliases `String` arguments.
    fn parse_return(&mut self) -> Result<Statement, JustcError> {
        let keyword = self.advance().ok_or_else(|| self.unexpected())?;

        let mut args: Vec<Value> = self
            .parse_name_list("in RETURN")?
            .into_iter()
            .map(Value::Variable)
            .collect();

        if self.check_keyword("AS") {
            self.advance();
            args.extend(self.parse_name_list("after AS")?.into_iter().map(Value::String));
        }

        Ok(Statement::Command(Command {
            name: keyword.text,
            args,
            offset: keyword.offset,
        }))
    }

    fn parse_name_list(&mut self, context: &str) -> Result<Vec<String>, JustcError> {
        self.expect_kind(TokenKind::LBracket, context)?;

        let mut names = Vec::new();
        while !self.check_kind(TokenKind::RBracket) {
            if self.check_kind(TokenKind::Comma) {
                self.advance();
                continue;
            }
            let name = self.expect_kind(TokenKind::Identifier, context)?;
            names.push(name.text);
        }
        self.advance();
        Ok(names)
    }

    fn parse_allow(&mut self) -> Result<Statement, JustcError> {
        let keyword = self.advance().ok_or_else(|| self.unexpected())?;
        if !self.check_keyword("JAVASCRIPT") {
            return Err(self.unexpected());
        }
        self.advance();

        Ok(Statement::Command(Command {
            name: keyword.text,
            args: vec![Value::string("JAVASCRIPT")],
            offset: keyword.offset,
        }))
    }

    /// `IMPORT JUSTC("file")` or `IMPORT JUSTC(<link>)`.
    fn parse_import(&mut self) -> Result<Statement, JustcError> {
        let keyword = self.advance().ok_or_else(|| self.unexpected())?;
        if !self.check_keyword("JUSTC") {
            return Err(self.unexpected());
        }
        self.advance();
        self.expect_operator("(", "after IMPORT JUSTC")?;

        let target = match self.peek() {
            Some(t) if t.kind == TokenKind::String => Value::String(unescape(&t.text)),
            Some(t) if t.kind == TokenKind::Link => Value::Link(t.text.clone()),
            _ => return Err(self.unexpected()),
        };
        self.advance();
        self.expect_operator(")", "to close IMPORT")?;

        Ok(Statement::Command(Command {
            name: keyword.text,
            args: vec![target],
            offset: keyword.offset,
        }))
    }

    /// `ECHO(...)`, `LOG(...)` and `LOGFILE(...)`. Arguments are evaluated
    /// now, against the declarations seen so far.
    fn parse_command(&mut self) -> Result<Statement, JustcError> {
        let keyword = self.advance().ok_or_else(|| self.unexpected())?;
        self.expect_operator("(", &format!("after {}", keyword.text))?;

        let mut args = Vec::new();
        if !self.check_operator(")") {
            loop {
                let expr = self.parse_expression()?;
                args.push(self.evaluate_now(&expr)?);
                if self.check_kind(TokenKind::Comma) {
                    self.advance();
                } else {
                    break;
                }
            }
        }
        self.expect_operator(")", &format!("to close {}", keyword.text))?;

        Ok(Statement::Command(Command {
            name: keyword.text,
            args,
            offset: keyword.offset,
        }))
    }

    fn evaluate_now(&mut self, expr: &Expr) -> Result<Value, JustcError> {
        if let Some(value) = expr.as_literal() {
            return Ok(value.clone());
        }

        let value = Resolver::new(
            &self.declarations,
            &self.options,
            self.capabilities,
            &mut self.logbook,
            &mut self.calls,
        )
        .lenient()
        .evaluate(expr)?;

        match (&expr.kind, value) {
            (ExprKind::Reference(name), Value::Unknown) => Ok(Value::String(name.clone())),
            (_, value) => Ok(value),
        }
    }

    fn execute(&mut self, command: Command) {
        let Command { name, args, offset } = command;
        let first = args.first().map(Value::to_string).unwrap_or_default();

        match name.as_str() {
            "TYPE" => {
                // GLOBAL and LOCAL are accepted but advisory
                if first == "STRICT" {
                    self.strict = true;
                }
            }
            "OUTPUT" => {
                self.plan.mode = OutputMode::from_keyword(&first).unwrap_or_default();
            }
            "RETURN" => {
                for arg in args {
                    match arg {
                        Value::Variable(variable) => self.plan.returns.push(variable),
                        alias => self.plan.aliases.push(alias.to_string()),
                    }
                }
            }
            "ALLOW" => self.allow_javascript = true,
            "DISALLOW" => self.allow_javascript = false,
            "IMPORT" => self.logbook.push("IMPORT", first, offset),
            "ECHO" => {
                let message = join_args(&args);
                if self.options.execute_side_effects {
                    println!("{}", message);
                }
                self.logbook.push("ECHO", message, offset);
            }
            "LOG" => {
                let message = join_args(&args);
                if self.options.execute_side_effects {
                    self.logbook.append_to_file(&message);
                }
                self.logbook.push("LOG", message, offset);
            }
            "LOGFILE" => {
                if self.options.execute_side_effects {
                    self.logbook.register_file(first.clone());
                }
                self.logbook.push("LOGFILE", first, offset);
            }
            _ => {}
        }
    }

    // ===== Expressions =====

    pub fn parse_expression(&mut self) -> Result<Expr, JustcError> {
        self.parse_conditional()
    }

    /// `c then a else b`, `c elseif d then a else b` and their symbol and
    /// negated spellings.
    fn parse_conditional(&mut self) -> Result<Expr, JustcError> {
        let condition = self.parse_binary_expr(0)?;

        if let Some(negate) = self.match_then() {
            let then_branch = self.parse_expression()?;
            let invert_else = self.expect_else("then")?;
            let else_branch = self.parse_expression()?;
            return Ok(fold(conditional(condition, negate, then_branch, else_branch, invert_else)));
        }

        if let Some(negate_inner) = self.match_elseif() {
            let inner_condition = self.parse_binary_expr(0)?;
            let negate = match self.match_then() {
                Some(negate) => negate,
                None => {
                    let offset = self.current_offset();
                    return Err(JustcError::parse_at(
                        format!("Expected 'then' after 'elseif' at position {}", offset),
                        offset,
                    ));
                }
            };
            let then_branch = self.parse_expression()?;
            let invert_else = self.expect_else("then")?;
            let else_branch = self.parse_expression()?;

            let inner = fold(conditional(
                inner_condition,
                negate != negate_inner,
                then_branch.clone(),
                else_branch,
                invert_else,
            ));
            return Ok(fold(conditional(condition, negate, then_branch, inner, false)));
        }

        Ok(condition)
    }

    /// `Some(negated)` when the current token opens a then-branch.
    fn match_then(&mut self) -> Option<bool> {
        let negated = match self.peek()? {
            t if t.is_keyword("then") || t.is_operator("==") => false,
            t if t.is_keyword("then't") || t.is_operator("=!") => true,
            _ => return None,
        };
        self.advance();
        Some(negated)
    }

    fn match_elseif(&mut self) -> Option<bool> {
        let negated = match self.peek()? {
            t if t.is_keyword("elseif") || t.is_operator("??") => false,
            t if t.is_keyword("elseifn't") => true,
            _ => return None,
        };
        self.advance();
        Some(negated)
    }

    /// Consumes the else keyword; returns whether the else value is inverted.
    fn expect_else(&mut self, after: &str) -> Result<bool, JustcError> {
        let inverted = match self.peek() {
            Some(t) if t.is_keyword("else") || t.is_operator("?=") => false,
            Some(t) if t.is_keyword("elsen't") || t.is_operator("?!") => true,
            _ => {
                let offset = self.current_offset();
                return Err(JustcError::parse_at(
                    format!("Expected 'else' after '{}' at position {}", after, offset),
                    offset,
                ));
            }
        };
        self.advance();
        Ok(inverted)
    }

    fn binary_operator(token: &Token) -> Option<(u8, BinaryOp)> {
        let operator = match (token.kind, token.text.as_str()) {
            (TokenKind::Keyword, "or") | (TokenKind::Operator, "||") => (1, BinaryOp::Or),
            (TokenKind::Keyword, "orn't") | (TokenKind::Operator, "!|") => (1, BinaryOp::Nor),
            (TokenKind::Keyword, "and") | (TokenKind::Operator, "&") => (2, BinaryOp::And),
            (TokenKind::Keyword, "andn't") | (TokenKind::Operator, "!&") => (2, BinaryOp::Nand),
            (TokenKind::Keyword, "is") | (TokenKind::Operator, "=") => (3, BinaryOp::Eq),
            (TokenKind::Keyword, "isn't") | (TokenKind::Operator, "!=") => (3, BinaryOp::NotEq),
            (TokenKind::Operator, "<") => (4, BinaryOp::Less),
            (TokenKind::Operator, ">") => (4, BinaryOp::Greater),
            (TokenKind::Operator, "<=") => (4, BinaryOp::LessEq),
            (TokenKind::Operator, ">=") => (4, BinaryOp::GreaterEq),
            (TokenKind::Operator, "+") => (5, BinaryOp::Add),
            (TokenKind::Minus, _) => (5, BinaryOp::Sub),
            (TokenKind::DotDot, _) => (5, BinaryOp::Concat),
            (TokenKind::Operator, "*") => (6, BinaryOp::Mul),
            (TokenKind::Operator, "/") => (6, BinaryOp::Div),
            (TokenKind::Operator, "%") => (6, BinaryOp::Mod),
            (TokenKind::Operator, "^") => (7, BinaryOp::Pow),
            _ => return None,
        };
        Some(operator)
    }

    fn parse_binary_expr(&mut self, min_precedence: u8) -> Result<Expr, JustcError> {
        let mut left = self.parse_unary()?;

        while let Some(token) = self.peek() {
            let (precedence, operator) = match Self::binary_operator(token) {
                Some((prec, op)) if prec >= min_precedence => (prec, op),
                _ => break,
            };
            self.advance();
            let right = self.parse_binary_expr(precedence + 1)?;
            let span = left.span.merge(right.span);
            left = fold(Expr::new(
                ExprKind::Binary {
                    left: Box::new(left),
                    op: operator,
                    right: Box::new(right),
                },
                span,
            ));
        }

        Ok(left)
    }

    fn parse_unary(&mut self) -> Result<Expr, JustcError> {
        let op = match self.peek() {
            Some(t) if t.kind == TokenKind::Minus => UnaryOp::Neg,
            Some(t) if t.is_operator("+") => UnaryOp::Plus,
            Some(t) if t.is_operator("!") => UnaryOp::Not,
            _ => return self.parse_primary(),
        };
        let start = self.current_offset();
        self.advance();

        let expr = self.parse_unary()?;
        let span = Span::new(start, expr.span.end);
        Ok(fold(Expr::new(
            ExprKind::Unary {
                op,
                expr: Box::new(expr),
            },
            span,
        )))
    }

    fn parse_primary(&mut self) -> Result<Expr, JustcError> {
        let token = match self.peek() {
            Some(token) => token.clone(),
            None => return Err(self.unexpected()),
        };
        let span = Span::new(token.offset, token.offset + token.text.len().max(1));

        let literal = match token.kind {
            TokenKind::Number => Some(Value::Number(parse_decimal(&token.text))),
            TokenKind::Hex => Some(Value::Hexadecimal(parse_radix(&token.text, 16))),
            TokenKind::Binary => Some(Value::Binary(parse_radix(&token.text, 2))),
            TokenKind::Base64 => {
                let encoded = token.text.strip_prefix('&').unwrap_or(&token.text);
                let decoded = builtins::decode_base64(encoded).map_err(|message| {
                    JustcError::parse_at(format!("{} at position {}", message, token.offset), token.offset)
                })?;
                Some(Value::String(decoded))
            }
            TokenKind::String => Some(Value::String(unescape(&token.text))),
            TokenKind::Link => Some(Value::Link(token.text.clone())),
            TokenKind::Boolean => {
                let lowered = token.text.to_ascii_lowercase();
                Some(Value::Boolean(lowered == "true" || lowered == "yes"))
            }
            TokenKind::Null => Some(Value::Null),
            _ => None,
        };
        if let Some(value) = literal {
            self.advance();
            return Ok(Expr::literal(value, span));
        }

        match token.kind {
            TokenKind::Identifier => {
                if let Some(name) = token.text.strip_prefix('$').filter(|n| builtins::is_pseudo_variable(n)) {
                    self.advance();
                    let value = builtins::dispatch(self, name, &[], token.offset)?;
                    return Ok(Expr::literal(value, span));
                }
                if self.next_is_call() {
                    self.advance();
                    return self.parse_call(token.text, token.offset);
                }
                self.advance();
                Ok(Expr::new(ExprKind::Reference(token.text), span))
            }
            TokenKind::Keyword => {
                if self.next_is_call() {
                    self.advance();
                    return self.parse_call(token.text, token.offset);
                }
                self.advance();
                Ok(Expr::literal(Value::String(token.text), span))
            }
            TokenKind::Operator if token.text == "(" => {
                self.advance();
                let expr = self.parse_expression()?;
                self.expect_operator(")", "to close the parenthesized expression")?;
                Ok(expr)
            }
            // A missing operand reads as null; the separator stays put.
            TokenKind::Comma | TokenKind::Dot => Ok(Expr::literal(Value::Null, Span::point(token.offset))),
            _ => Err(JustcError::parse_at(
                format!("Unexpected token in expression: {} at position {}", token.text, token.offset),
                token.offset,
            )),
        }
    }

    /// Called with the current token on `(`. Calls whose arguments are all
    /// known are run immediately, except `VALUE`.
    fn parse_call(&mut self, name: String, start: usize) -> Result<Expr, JustcError> {
        if !builtins::is_function(&name) {
            return Err(JustcError::UnknownFunction { name, offset: start });
        }
        self.expect_operator("(", "to open the argument list")?;

        let mut args = Vec::new();
        if !self.check_operator(")") {
            loop {
                args.push(self.parse_expression()?);
                if self.check_kind(TokenKind::Comma) {
                    self.advance();
                } else {
                    break;
                }
            }
        }
        let close = self.expect_operator(")", &format!("to close {}(", name))?;
        let span = Span::new(start, close.offset + 1);

        if name != "VALUE" && args.iter().all(Expr::is_literal) {
            let values: Vec<Value> = args.iter().filter_map(|arg| arg.as_literal().cloned()).collect();
            let value = builtins::dispatch(self, &name, &values, start)?;
            return Ok(Expr::literal(value, span));
        }

        Ok(Expr::new(ExprKind::Call { name, args }, span))
    }
}

impl CallContext for TokenParser<'_> {
    fn options(&self) -> &ParseOptions {
        &self.options
    }

    fn capabilities(&self) -> &dyn Capabilities {
        self.capabilities
    }

    fn log(&mut self, kind: &str, message: String, offset: usize) {
        self.logbook.push(kind, message, offset);
    }

    fn lookup(&mut self, name: &str, offset: usize) -> Result<Value, JustcError> {
        Resolver::new(
            &self.declarations,
            &self.options,
            self.capabilities,
            &mut self.logbook,
            &mut self.calls,
        )
        .lenient()
        .resolve_reference(name, offset)
    }
}

fn conditional(condition: Expr, negate: bool, then_branch: Expr, else_branch: Expr, invert_else: bool) -> Expr {
    let span = condition.span.merge(else_branch.span);
    Expr::new(
        ExprKind::Conditional {
            condition: Box::new(condition),
            negate_condition: negate,
            then_branch: Box::new(then_branch),
            else_branch: Box::new(else_branch),
            invert_else,
        },
        span,
    )
}

/// Replace an operator node with its value when every operand is known.
fn fold(expr: Expr) -> Expr {
    if matches!(expr.kind, ExprKind::Conditional { .. }) {
        return fold_conditional(expr);
    }
    match constant_value(&expr) {
        Some(value) => Expr::literal(value, expr.span),
        None => expr,
    }
}

fn constant_value(expr: &Expr) -> Option<Value> {
    match &expr.kind {
        ExprKind::Binary { left, op, right } => {
            Some(evaluate_binary(left.as_literal()?, *op, right.as_literal()?))
        }
        ExprKind::Unary { op, expr: inner } => Some(evaluate_unary(*op, inner.as_literal()?)),
        ExprKind::Inequality(inner) => Some(inequality(inner.as_literal()?)),
        _ => None,
    }
}

fn fold_conditional(expr: Expr) -> Expr {
    let span = expr.span;
    match expr.kind {
        ExprKind::Conditional {
            condition,
            negate_condition,
            then_branch,
            else_branch,
            invert_else,
        } => {
            let branch = condition
                .as_literal()
                .and_then(|value| takes_then_branch(value, negate_condition));
            match branch {
                Some(true) => *then_branch,
                Some(false) if invert_else => fold(Expr::new(ExprKind::Inequality(else_branch), span)),
                Some(false) => *else_branch,
                None => Expr::new(
                    ExprKind::Conditional {
                        condition,
                        negate_condition,
                        then_branch,
                        else_branch,
                        invert_else,
                    },
                    span,
                ),
            }
        }
        kind => Expr::new(kind, span),
    }
}

/// Decode `\"`, `\\`, `\n` and `\t`. Other escapes are kept as written.
fn unescape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut chars = text.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('"') => out.push('"'),
            Some('\\') => out.push('\\'),
            Some('n') => out.push('\n'),
            Some('t') => out.push('\t'),
            Some(other) => {
                out.push('\\');
                out.push(other);
            }
            None => out.push('\\'),
        }
    }
    out
}

fn join_args(args: &[Value]) -> String {
    args.iter().map(Value::to_string).collect::<Vec<_>>().join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::interpreter::capabilities::DisabledCapabilities;
    use crate::lexer::tokenize;

    fn parse(source: &str) -> ParseResult {
        let tokens = tokenize(source).expect("Lexer failed");
        TokenParser::new(tokens, ParseOptions::quiet(), &DisabledCapabilities).parse()
    }

    fn output(source: &str, name: &str) -> Value {
        let result = parse(source);
        assert!(result.is_ok(), "{:?}", result.error);
        result.outputs.get(name).cloned().expect("missing output")
    }

    #[test]
    fn test_precedence() {
        assert_eq!(output("x is 1 + 2 * 3", "x"), Value::Number(7.0));
        assert_eq!(output("x is (1 + 2) * 3", "x"), Value::Number(9.0));
        assert_eq!(output("x is 2 ^ 3 ^ 2", "x"), Value::Number(64.0));
        assert_eq!(output("x is -2 + 5", "x"), Value::Number(3.0));
    }

    #[test]
    fn test_comparison_binds_tighter_than_logic() {
        assert_eq!(output("x is 1 < 2 and 3 > 4", "x"), Value::Boolean(false));
        assert_eq!(output("x is 1 < 2 or 3 > 4", "x"), Value::Boolean(true));
    }

    #[test]
    fn test_conditional_forms() {
        assert_eq!(output("x is true then 1 else 2", "x"), Value::Number(1.0));
        assert_eq!(output("x is true then't 1 else 2", "x"), Value::Number(2.0));
        assert_eq!(output("x is 0 == 1 ?= 2", "x"), Value::Number(2.0));
        assert_eq!(output("x is false elseif true then 1 else 2", "x"), Value::Number(1.0));
        assert_eq!(output("x is false elseif false then 1 else 2", "x"), Value::Number(2.0));
        assert_eq!(output("x is false then 1 elsen't 5", "x"), Value::Boolean(true));
    }

    #[test]
    fn test_missing_else_is_error() {
        let result = parse("x is true then 1");
        assert!(result.error_message().unwrap().contains("Expected 'else'"));
    }

    #[test]
    fn test_deferred_expression_keeps_references() {
        let tokens = tokenize("y is x * 3").unwrap();
        let mut parser = TokenParser::new(tokens, ParseOptions::quiet(), &DisabledCapabilities);
        let decl = parser.parse_declaration().unwrap();
        assert!(decl.references.contains("x"));
        assert!(!decl.expr.is_literal());
    }

    #[test]
    fn test_literal_operands_fold() {
        let tokens = tokenize("y is 2 * 3 + 1").unwrap();
        let mut parser = TokenParser::new(tokens, ParseOptions::quiet(), &DisabledCapabilities);
        let decl = parser.parse_declaration().unwrap();
        assert_eq!(decl.expr.as_literal(), Some(&Value::Number(7.0)));
    }

    #[test]
    fn test_keyword_without_call_is_text() {
        assert_eq!(output("x is JSON", "x"), Value::string("JSON"));
    }

    #[test]
    fn test_string_escapes_are_decoded() {
        assert_eq!(output(r#"x is "a\"b""#, "x"), Value::string("a\"b"));
    }

    #[test]
    fn test_unexpected_top_level_token() {
        let result = parse("x is 1, + 2");
        assert_eq!(
            result.error_message().as_deref(),
            Some("Unexpected token: + at position 8")
        );
    }
}
