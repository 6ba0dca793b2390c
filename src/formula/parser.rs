//! Recursive-descent parser for hour formulas.
//!
//! Produces a tagged AST; nothing in the language can reference anything
//! beyond numbers, attribute codes and the fixed function set, so the
//! evaluator never executes arbitrary code.
//!
//! # Grammar (lowest to highest precedence)
//!
//! ```text
//! expr       := comparison ('?' expr ':' expr)?
//! comparison := additive (('<'|'<='|'>'|'>='|'='|'<>') additive)?
//! additive   := term (('+'|'-') term)*
//! term       := unary (('*'|'/') unary)*
//! unary      := '-' unary | primary
//! primary    := NUMBER | IDENT | IDENT '(' args ')' | '(' expr ')'
//! ```

use super::lexer::Token;
use super::FormulaError;

/// A parsed formula expression.
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    Number(f64),
    /// An attribute code, resolved against the attribute map at evaluation.
    Attribute(String),
    Neg(Box<Expr>),
    Binary {
        op: BinOp,
        lhs: Box<Expr>,
        rhs: Box<Expr>,
    },
    Compare {
        op: CmpOp,
        lhs: Box<Expr>,
        rhs: Box<Expr>,
    },
    Ternary {
        cond: Box<Expr>,
        then: Box<Expr>,
        otherwise: Box<Expr>,
    },
    Call {
        func: Func,
        args: Vec<Expr>,
    },
}

/// Arithmetic operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinOp {
    Add,
    Sub,
    Mul,
    Div,
}

/// Comparison operators; comparisons evaluate to 1 or 0.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CmpOp {
    Lt,
    Le,
    Gt,
    Ge,
    Eq,
    Ne,
}

/// The fixed function set. Names are matched case-insensitively.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Func {
    If,
    RoundUp,
    RoundDown,
    Round,
    Sum,
    Max,
    Min,
}

impl Func {
    fn from_name(name: &str) -> Option<Self> {
        let func = match name.to_ascii_uppercase().as_str() {
            "IF" => Self::If,
            "ROUNDUP" => Self::RoundUp,
            "ROUNDDOWN" => Self::RoundDown,
            "ROUND" => Self::Round,
            "SUM" => Self::Sum,
            "MAX" => Self::Max,
            "MIN" => Self::Min,
            _ => return None,
        };
        Some(func)
    }

    /// Canonical name for error messages.
    pub fn name(&self) -> &'static str {
        match self {
            Self::If => "IF",
            Self::RoundUp => "ROUNDUP",
            Self::RoundDown => "ROUNDDOWN",
            Self::Round => "ROUND",
            Self::Sum => "SUM",
            Self::Max => "MAX",
            Self::Min => "MIN",
        }
    }

    fn check_arity(&self, got: usize) -> Result<(), FormulaError> {
        let expected = match self {
            Self::If => "3",
            Self::RoundUp | Self::RoundDown => "1",
            Self::Round => "2",
            Self::Sum | Self::Max | Self::Min => "1 or more",
        };
        let ok = match self {
            Self::If => got == 3,
            Self::RoundUp | Self::RoundDown => got == 1,
            Self::Round => got == 2,
            Self::Sum | Self::Max | Self::Min => got >= 1,
        };
        if ok {
            Ok(())
        } else {
            Err(FormulaError::WrongArity {
                func: self.name(),
                expected,
                got,
            })
        }
    }
}

/// Parses a token stream into an expression.
pub fn parse(tokens: Vec<Token>) -> Result<Expr, FormulaError> {
    let mut parser = Parser { tokens, pos: 0 };
    let expr = parser.expr()?;
    if parser.pos < parser.tokens.len() {
        return Err(FormulaError::Malformed(format!(
            "unexpected input after expression: {:?}",
            parser.tokens[parser.pos]
        )));
    }
    Ok(expr)
}

struct Parser {
    tokens: Vec<Token>,
    pos: usize,
}

impl Parser {
    fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.pos)
    }

    fn advance(&mut self) -> Option<Token> {
        let token = self.tokens.get(self.pos).cloned();
        if token.is_some() {
            self.pos += 1;
        }
        token
    }

    fn eat(&mut self, token: &Token) -> bool {
        if self.peek() == Some(token) {
            self.pos += 1;
            true
        } else {
            false
        }
    }

    fn expect(&mut self, token: Token, context: &str) -> Result<(), FormulaError> {
        if self.eat(&token) {
            Ok(())
        } else {
            Err(FormulaError::Malformed(format!(
                "expected {token:?} {context}, found {:?}",
                self.peek()
            )))
        }
    }

    fn expr(&mut self) -> Result<Expr, FormulaError> {
        let cond = self.comparison()?;
        if self.eat(&Token::Question) {
            let then = self.expr()?;
            self.expect(Token::Colon, "in conditional")?;
            let otherwise = self.expr()?;
            return Ok(Expr::Ternary {
                cond: Box::new(cond),
                then: Box::new(then),
                otherwise: Box::new(otherwise),
            });
        }
        Ok(cond)
    }

    fn comparison(&mut self) -> Result<Expr, FormulaError> {
        let lhs = self.additive()?;
        let op = match self.peek() {
            Some(Token::Lt) => CmpOp::Lt,
            Some(Token::Le) => CmpOp::Le,
            Some(Token::Gt) => CmpOp::Gt,
            Some(Token::Ge) => CmpOp::Ge,
            Some(Token::Eq) => CmpOp::Eq,
            Some(Token::Ne) => CmpOp::Ne,
            _ => return Ok(lhs),
        };
        self.pos += 1;
        let rhs = self.additive()?;
        Ok(Expr::Compare {
            op,
            lhs: Box::new(lhs),
            rhs: Box::new(rhs),
        })
    }

    fn additive(&mut self) -> Result<Expr, FormulaError> {
        let mut lhs = self.term()?;
        loop {
            let op = match self.peek() {
                Some(Token::Plus) => BinOp::Add,
                Some(Token::Minus) => BinOp::Sub,
                _ => return Ok(lhs),
            };
            self.pos += 1;
            let rhs = self.term()?;
            lhs = Expr::Binary {
                op,
                lhs: Box::new(lhs),
                rhs: Box::new(rhs),
            };
        }
    }

    fn term(&mut self) -> Result<Expr, FormulaError> {
        let mut lhs = self.unary()?;
        loop {
            let op = match self.peek() {
                Some(Token::Star) => BinOp::Mul,
                Some(Token::Slash) => BinOp::Div,
                _ => return Ok(lhs),
            };
            self.pos += 1;
            let rhs = self.unary()?;
            lhs = Expr::Binary {
                op,
                lhs: Box::new(lhs),
                rhs: Box::new(rhs),
            };
        }
    }

    fn unary(&mut self) -> Result<Expr, FormulaError> {
        if self.eat(&Token::Minus) {
            let inner = self.unary()?;
            return Ok(Expr::Neg(Box::new(inner)));
        }
        self.primary()
    }

    fn primary(&mut self) -> Result<Expr, FormulaError> {
        match self.advance() {
            Some(Token::Number(value)) => Ok(Expr::Number(value)),
            Some(Token::LParen) => {
                let inner = self.expr()?;
                self.expect(Token::RParen, "to close group")?;
                Ok(inner)
            }
            Some(Token::Ident(name)) => {
                if self.eat(&Token::LParen) {
                    let func = Func::from_name(&name)
                        .ok_or_else(|| FormulaError::UnknownFunction(name.clone()))?;
                    let args = self.args()?;
                    func.check_arity(args.len())?;
                    Ok(Expr::Call { func, args })
                } else {
                    Ok(Expr::Attribute(name))
                }
            }
            other => Err(FormulaError::Malformed(format!(
                "expected a value, found {other:?}"
            ))),
        }
    }

    fn args(&mut self) -> Result<Vec<Expr>, FormulaError> {
        let mut args = Vec::new();
        if self.eat(&Token::RParen) {
            return Ok(args);
        }
        loop {
            args.push(self.expr()?);
            if self.eat(&Token::Comma) {
                continue;
            }
            self.expect(Token::RParen, "to close argument list")?;
            return Ok(args);
        }
    }
}
