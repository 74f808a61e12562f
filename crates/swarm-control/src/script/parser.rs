//! Recursive-descent parser producing the program AST.
//!
//! Grammar (precedence from loosest to tightest):
//!
//! ```text
//!   program    := stmt*
//!   stmt       := "var"? IDENT "=" expr ";"
//!              |  "if" "(" expr ")" block ("else" (if-stmt | block))?
//!              |  "while" "(" expr ")" block
//!              |  expr ";"
//!              |  ";"
//!   block      := "{" stmt* "}" | stmt
//!   expr       := or
//!   or         := and ("||" and)*
//!   and        := equality ("&&" equality)*
//!   equality   := compare (("==" | "!=") compare)*
//!   compare    := additive (("<" | "<=" | ">" | ">=") additive)*
//!   additive   := term (("+" | "-") term)*
//!   term       := unary (("*" | "/" | "%") unary)*
//!   unary      := ("!" | "-") unary | primary
//!   primary    := NUMBER | STRING | "true" | "false" | "(" expr ")"
//!              |  "sensorReadings" "." ROLE "." FIELD
//!              |  IDENT ("(" args? ")")?
//! ```

use crate::script::lexer::{Tok, Token};
use crate::{ProbeRole, ScriptFault, SensorRole};

// ── AST ───────────────────────────────────────────────────────────────────────

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum ProbeField {
    Nest,
    Pheromone,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum UnOp {
    Not,
    Neg,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum BinOp {
    Or,
    And,
    Eq,
    Ne,
    Lt,
    Le,
    Gt,
    Ge,
    Add,
    Sub,
    Mul,
    Div,
    Rem,
}

#[derive(Clone, Debug, PartialEq)]
pub enum Expr {
    Num(f64),
    Str(String),
    Bool(bool),
    Name(String),
    Count(SensorRole),
    Probe(ProbeRole, ProbeField),
    Unary(UnOp, Box<Expr>),
    Binary(BinOp, Box<Expr>, Box<Expr>),
    Call(String, Vec<Expr>),
}

#[derive(Clone, Debug, PartialEq)]
pub enum Stmt {
    Assign { name: String, value: Expr, line: u32 },
    Expr(Expr),
    If { cond: Expr, then: Vec<Stmt>, otherwise: Vec<Stmt> },
    While { cond: Expr, body: Vec<Stmt> },
}

// ── Parser ────────────────────────────────────────────────────────────────────

/// Name through which programs read their sensors.
pub const READINGS: &str = "sensorReadings";

/// Deepest statement or bracket nesting, and tallest expression tree, a
/// program may contain.
pub const MAX_NESTING: usize = 64;

pub struct Parser {
    tokens:  Vec<Token>,
    pos:     usize,
    nesting: usize,
}

impl Parser {
    pub fn new(tokens: Vec<Token>) -> Self {
        Self { tokens, pos: 0, nesting: 0 }
    }

    pub fn program(mut self) -> Result<Vec<Stmt>, ScriptFault> {
        let mut stmts = Vec::new();
        while !self.at_end() {
            if let Some(stmt) = self.statement()? {
                stmts.push(stmt);
            }
        }
        Ok(stmts)
    }

    // ── Token cursor ──────────────────────────────────────────────────────

    fn at_end(&self) -> bool {
        self.pos >= self.tokens.len()
    }

    fn peek(&self) -> Option<&Tok> {
        self.tokens.get(self.pos).map(|t| &t.tok)
    }

    fn peek_at(&self, ahead: usize) -> Option<&Tok> {
        self.tokens.get(self.pos + ahead).map(|t| &t.tok)
    }

    fn line(&self) -> u32 {
        self.tokens
            .get(self.pos)
            .or_else(|| self.tokens.last())
            .map_or(1, |t| t.line)
    }

    fn advance(&mut self) -> Option<Tok> {
        let tok = self.tokens.get(self.pos).map(|t| t.tok.clone());
        self.pos += 1;
        tok
    }

    fn eat(&mut self, tok: &Tok) -> bool {
        if self.peek() == Some(tok) {
            self.pos += 1;
            true
        } else {
            false
        }
    }

    fn expect(&mut self, tok: Tok, what: &str) -> Result<(), ScriptFault> {
        if self.eat(&tok) { Ok(()) } else { Err(self.error(format!("expected {what}"))) }
    }

    fn error(&self, message: impl Into<String>) -> ScriptFault {
        let found = match self.peek() {
            Some(tok) => format!(", found {tok:?}"),
            None => ", found end of program".to_string(),
        };
        ScriptFault::Parse { line: self.line(), message: format!("{}{found}", message.into()) }
    }

    /// Run `f` one nesting level deeper.
    fn nested<T>(
        &mut self,
        f: impl FnOnce(&mut Self) -> Result<T, ScriptFault>,
    ) -> Result<T, ScriptFault> {
        if self.nesting >= MAX_NESTING {
            return Err(self.error(format!("nesting deeper than {MAX_NESTING} levels")));
        }
        self.nesting += 1;
        let result = f(self);
        self.nesting -= 1;
        result
    }

    /// Height of a new node whose tallest child is `child` high.
    fn taller(&self, child: usize) -> Result<usize, ScriptFault> {
        let height = child + 1;
        if height > MAX_NESTING {
            Err(self.error(format!("expression deeper than {MAX_NESTING} levels")))
        } else {
            Ok(height)
        }
    }

    fn ident(&mut self, what: &str) -> Result<String, ScriptFault> {
        match self.peek() {
            Some(Tok::Ident(name)) => {
                let name = name.clone();
                self.pos += 1;
                Ok(name)
            }
            _ => Err(self.error(format!("expected {what}"))),
        }
    }

    // ── Statements ────────────────────────────────────────────────────────

    fn statement(&mut self) -> Result<Option<Stmt>, ScriptFault> {
        self.nested(Self::statement_inner)
    }

    fn statement_inner(&mut self) -> Result<Option<Stmt>, ScriptFault> {
        match self.peek() {
            Some(Tok::Semi) => {
                self.pos += 1;
                Ok(None)
            }
            Some(Tok::If) => self.if_statement().map(Some),
            Some(Tok::While) => {
                self.pos += 1;
                self.expect(Tok::LParen, "`(` after `while`")?;
                let cond = self.expression()?;
                self.expect(Tok::RParen, "`)`")?;
                let body = self.block()?;
                Ok(Some(Stmt::While { cond, body }))
            }
            Some(Tok::Var) => {
                self.pos += 1;
                let line = self.line();
                let name = self.ident("a variable name")?;
                self.expect(Tok::Assign, "`=`")?;
                let value = self.expression()?;
                self.end_statement()?;
                Ok(Some(Stmt::Assign { name, value, line }))
            }
            Some(Tok::Ident(_)) if self.peek_at(1) == Some(&Tok::Assign) => {
                let line = self.line();
                let name = self.ident("a variable name")?;
                self.pos += 1;
                let value = self.expression()?;
                self.end_statement()?;
                Ok(Some(Stmt::Assign { name, value, line }))
            }
            Some(_) => {
                let expr = self.expression()?;
                self.end_statement()?;
                Ok(Some(Stmt::Expr(expr)))
            }
            None => Err(self.error("expected a statement")),
        }
    }

    /// A trailing `;` may be omitted before `}` or the end of the program.
    fn end_statement(&mut self) -> Result<(), ScriptFault> {
        if self.eat(&Tok::Semi) || self.at_end() || self.peek() == Some(&Tok::RBrace) {
            Ok(())
        } else {
            Err(self.error("expected `;`"))
        }
    }

    fn if_statement(&mut self) -> Result<Stmt, ScriptFault> {
        self.expect(Tok::If, "`if`")?;
        self.expect(Tok::LParen, "`(` after `if`")?;
        let cond = self.expression()?;
        self.expect(Tok::RParen, "`)`")?;
        let then = self.block()?;
        let otherwise = if self.eat(&Tok::Else) {
            if self.peek() == Some(&Tok::If) {
                vec![self.nested(Self::if_statement)?]
            } else {
                self.block()?
            }
        } else {
            Vec::new()
        };
        Ok(Stmt::If { cond, then, otherwise })
    }

    fn block(&mut self) -> Result<Vec<Stmt>, ScriptFault> {
        if !self.eat(&Tok::LBrace) {
            return Ok(self.statement()?.into_iter().collect());
        }
        let mut stmts = Vec::new();
        loop {
            match self.peek() {
                Some(Tok::RBrace) => {
                    self.pos += 1;
                    return Ok(stmts);
                }
                None => return Err(self.error("expected `}`")),
                Some(_) => {
                    if let Some(stmt) = self.statement()? {
                        stmts.push(stmt);
                    }
                }
            }
        }
    }

    // ── Expressions ───────────────────────────────────────────────────────
    //
    // Every producer returns the expression with the height of its tree so
    // operator chains cannot build an arbitrarily deep AST.

    fn expression(&mut self) -> Result<Expr, ScriptFault> {
        self.expression_with_height().map(|(e, _)| e)
    }

    fn expression_with_height(&mut self) -> Result<(Expr, usize), ScriptFault> {
        self.nested(|p| p.binary_level(0))
    }

    /// Operator table, loosest first.
    fn level_op(level: usize, tok: &Tok) -> Option<BinOp> {
        match (level, tok) {
            (0, Tok::OrOr)    => Some(BinOp::Or),
            (1, Tok::AndAnd)  => Some(BinOp::And),
            (2, Tok::EqEq)    => Some(BinOp::Eq),
            (2, Tok::NotEq)   => Some(BinOp::Ne),
            (3, Tok::Lt)      => Some(BinOp::Lt),
            (3, Tok::Le)      => Some(BinOp::Le),
            (3, Tok::Gt)      => Some(BinOp::Gt),
            (3, Tok::Ge)      => Some(BinOp::Ge),
            (4, Tok::Plus)    => Some(BinOp::Add),
            (4, Tok::Minus)   => Some(BinOp::Sub),
            (5, Tok::Star)    => Some(BinOp::Mul),
            (5, Tok::Slash)   => Some(BinOp::Div),
            (5, Tok::Percent) => Some(BinOp::Rem),
            _ => None,
        }
    }

    const LEVELS: usize = 6;

    fn binary_level(&mut self, level: usize) -> Result<(Expr, usize), ScriptFault> {
        if level == Self::LEVELS {
            return self.unary();
        }
        let (mut lhs, mut height) = self.binary_level(level + 1)?;
        while let Some(op) = self.peek().and_then(|t| Self::level_op(level, t)) {
            self.pos += 1;
            let (rhs, rhs_height) = self.binary_level(level + 1)?;
            height = self.taller(height.max(rhs_height))?;
            lhs = Expr::Binary(op, Box::new(lhs), Box::new(rhs));
        }
        Ok((lhs, height))
    }

    fn unary(&mut self) -> Result<(Expr, usize), ScriptFault> {
        let mut ops = Vec::new();
        loop {
            if self.eat(&Tok::Bang) {
                ops.push(UnOp::Not);
            } else if self.eat(&Tok::Minus) {
                ops.push(UnOp::Neg);
            } else {
                break;
            }
        }
        let (mut expr, mut height) = self.primary()?;
        for op in ops.into_iter().rev() {
            height = self.taller(height)?;
            expr = Expr::Unary(op, Box::new(expr));
        }
        Ok((expr, height))
    }

    fn primary(&mut self) -> Result<(Expr, usize), ScriptFault> {
        let line = self.line();
        match self.advance() {
            Some(Tok::Num(v)) => Ok((Expr::Num(v), 1)),
            Some(Tok::Str(s)) => Ok((Expr::Str(s), 1)),
            Some(Tok::True) => Ok((Expr::Bool(true), 1)),
            Some(Tok::False) => Ok((Expr::Bool(false), 1)),
            Some(Tok::LParen) => {
                let inner = self.expression_with_height()?;
                self.expect(Tok::RParen, "`)`")?;
                Ok(inner)
            }
            Some(Tok::Ident(name)) if name == READINGS => Ok((self.reading(line)?, 1)),
            Some(Tok::Ident(name)) => {
                if !self.eat(&Tok::LParen) {
                    return Ok((Expr::Name(name), 1));
                }
                let mut args = Vec::new();
                let mut tallest = 0;
                if !self.eat(&Tok::RParen) {
                    loop {
                        let (arg, height) = self.expression_with_height()?;
                        args.push(arg);
                        tallest = tallest.max(height);
                        if self.eat(&Tok::RParen) {
                            break;
                        }
                        self.expect(Tok::Comma, "`,` or `)`")?;
                    }
                }
                Ok((Expr::Call(name, args), self.taller(tallest)?))
            }
            _ => {
                self.pos = self.pos.saturating_sub(1);
                Err(self.error("expected an expression"))
            }
        }
    }

    /// `sensorReadings.<role>.count` or `sensorReadings.<probe>.<field>`.
    fn reading(&mut self, line: u32) -> Result<Expr, ScriptFault> {
        self.expect(Tok::Dot, "`.` after `sensorReadings`")?;
        let source = self.ident("a sensor name")?;
        self.expect(Tok::Dot, "`.` after the sensor name")?;
        let field = self.ident("a reading field")?;

        let bad = |what: String| ScriptFault::Parse { line, message: what };
        if let Ok(role) = source.parse::<SensorRole>() {
            return match field.as_str() {
                "count" => Ok(Expr::Count(role)),
                other => Err(bad(format!("sensor `{source}` has no field `{other}`"))),
            };
        }
        if let Ok(probe) = source.parse::<ProbeRole>() {
            return match field.as_str() {
                "nestValue" => Ok(Expr::Probe(probe, ProbeField::Nest)),
                "pheromoneValue" => Ok(Expr::Probe(probe, ProbeField::Pheromone)),
                other => Err(bad(format!("probe `{source}` has no field `{other}`"))),
            };
        }
        Err(bad(format!("unknown sensor `{source}`")))
    }
}
