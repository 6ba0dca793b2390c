//! Hour-formula evaluation.
//!
//! Task effort can be expressed as a small spreadsheet-style formula over
//! the project's attribute set, e.g. `IF(telas > 10, telas * 4, 16)` or
//! `ROUNDUP(endpoints / 2) + 8`. This module tokenizes, parses and
//! interprets those formulas over a tagged AST. It is an expression
//! evaluator, not a scripting facility: the only names it resolves are
//! attribute codes and the seven fixed functions.
//!
//! # Supported forms
//!
//! - numbers, attribute codes, `+ - * / ( )`
//! - comparisons `< <= > >= = <>` (yielding 1 or 0) and the ternary `?:`
//! - `IF(cond, a, b)`, `ROUNDUP(v)`, `ROUNDDOWN(v)`, `ROUND(v, d)`,
//!   `SUM(...)`, `MAX(...)`, `MIN(...)` (names case-insensitive)

mod eval;
mod lexer;
mod parser;

use std::collections::HashMap;

use thiserror::Error;

use crate::models::Task;

pub use parser::{BinOp, CmpOp, Expr, Func};

/// Why a formula failed to produce a value.
///
/// Formula failures are non-fatal to a processing pass: the batch path
/// falls back to zero hours and records the failure per task.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum FormulaError {
    /// A character outside the language.
    #[error("unexpected character '{0}' in formula")]
    UnexpectedChar(char),
    /// The token stream does not form a valid expression.
    #[error("malformed expression: {0}")]
    Malformed(String),
    /// A call to a name outside the fixed function set.
    #[error("unknown function '{0}'")]
    UnknownFunction(String),
    /// A known function called with the wrong number of arguments.
    #[error("{func} expects {expected} argument(s), got {got}")]
    WrongArity {
        func: &'static str,
        expected: &'static str,
        got: usize,
    },
    /// An attribute code missing from the attribute map.
    #[error("unresolved attribute '{0}'")]
    UnresolvedAttribute(String),
    /// The result was infinite or not a number.
    #[error("formula did not produce a finite number")]
    NonFinite,
}

/// Parses a formula string without evaluating it.
///
/// Useful for validating stored formulas ahead of a pass.
pub fn parse_formula(formula: &str) -> Result<Expr, FormulaError> {
    parser::parse(lexer::tokenize(formula)?)
}

/// Evaluates a formula string against an attribute map.
///
/// ```
/// use std::collections::HashMap;
/// use taskplan::formula::evaluate_formula;
///
/// let attrs = HashMap::from([("complexidade".to_string(), 11.0)]);
/// let hours = evaluate_formula("IF(complexidade > 10, 5, 2)", &attrs).unwrap();
/// assert_eq!(hours, 5.0);
/// ```
pub fn evaluate_formula(
    formula: &str,
    attributes: &HashMap<String, f64>,
) -> Result<f64, FormulaError> {
    eval::evaluate(&parse_formula(formula)?, attributes)
}

/// Computes a task's effort in hours.
///
/// A present formula is authoritative; `fixed_hours` is returned directly
/// when no formula is given; a task with neither costs zero hours.
pub fn compute_hours(task: &Task, attributes: &HashMap<String, f64>) -> Result<f64, FormulaError> {
    match &task.hours_formula {
        Some(formula) if !formula.trim().is_empty() => evaluate_formula(formula, attributes),
        _ => Ok(task.fixed_hours.unwrap_or(0.0)),
    }
}
