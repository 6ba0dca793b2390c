//! AST interpreter for hour formulas.
//!
//! Walks the parsed expression with attribute values resolved from the
//! caller's map. Comparisons yield 1 or 0; conditionals treat any nonzero
//! value as true, so `IF` and `?:` compose with comparisons directly.

use std::collections::HashMap;

use super::parser::{BinOp, CmpOp, Expr, Func};
use super::FormulaError;

/// Evaluates an expression against an attribute map.
///
/// The final value must be finite; division by zero or overflow surfaces
/// as [`FormulaError::NonFinite`] rather than propagating infinities into
/// scheduling.
pub fn evaluate(expr: &Expr, attributes: &HashMap<String, f64>) -> Result<f64, FormulaError> {
    let value = eval(expr, attributes)?;
    if value.is_finite() {
        Ok(value)
    } else {
        Err(FormulaError::NonFinite)
    }
}

fn eval(expr: &Expr, attributes: &HashMap<String, f64>) -> Result<f64, FormulaError> {
    match expr {
        Expr::Number(value) => Ok(*value),
        Expr::Attribute(name) => attributes
            .get(name)
            .copied()
            .ok_or_else(|| FormulaError::UnresolvedAttribute(name.clone())),
        Expr::Neg(inner) => Ok(-eval(inner, attributes)?),
        Expr::Binary { op, lhs, rhs } => {
            let a = eval(lhs, attributes)?;
            let b = eval(rhs, attributes)?;
            Ok(match op {
                BinOp::Add => a + b,
                BinOp::Sub => a - b,
                BinOp::Mul => a * b,
                BinOp::Div => a / b,
            })
        }
        Expr::Compare { op, lhs, rhs } => {
            let a = eval(lhs, attributes)?;
            let b = eval(rhs, attributes)?;
            let holds = match op {
                CmpOp::Lt => a < b,
                CmpOp::Le => a <= b,
                CmpOp::Gt => a > b,
                CmpOp::Ge => a >= b,
                CmpOp::Eq => a == b,
                CmpOp::Ne => a != b,
            };
            Ok(if holds { 1.0 } else { 0.0 })
        }
        Expr::Ternary { cond, then, otherwise } => {
            if truthy(eval(cond, attributes)?) {
                eval(then, attributes)
            } else {
                eval(otherwise, attributes)
            }
        }
        Expr::Call { func, args } => call(*func, args, attributes),
    }
}

fn call(func: Func, args: &[Expr], attributes: &HashMap<String, f64>) -> Result<f64, FormulaError> {
    match func {
        Func::If => {
            if truthy(eval(&args[0], attributes)?) {
                eval(&args[1], attributes)
            } else {
                eval(&args[2], attributes)
            }
        }
        Func::RoundUp => Ok(eval(&args[0], attributes)?.ceil()),
        Func::RoundDown => Ok(eval(&args[0], attributes)?.floor()),
        Func::Round => {
            let value = eval(&args[0], attributes)?;
            let decimals = eval(&args[1], attributes)?;
            let factor = 10f64.powi(decimals as i32);
            Ok((value * factor).round() / factor)
        }
        Func::Sum => {
            let mut total = 0.0;
            for arg in args {
                total += eval(arg, attributes)?;
            }
            Ok(total)
        }
        Func::Max => fold(args, attributes, f64::max),
        Func::Min => fold(args, attributes, f64::min),
    }
}

fn fold(
    args: &[Expr],
    attributes: &HashMap<String, f64>,
    pick: fn(f64, f64) -> f64,
) -> Result<f64, FormulaError> {
    let mut acc = eval(&args[0], attributes)?;
    for arg in &args[1..] {
        acc = pick(acc, eval(arg, attributes)?);
    }
    Ok(acc)
}

#[inline]
fn truthy(value: f64) -> bool {
    value != 0.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::formula::lexer::tokenize;
    use crate::formula::parser::parse;

    fn eval_str(input: &str, attributes: &HashMap<String, f64>) -> Result<f64, FormulaError> {
        evaluate(&parse(tokenize(input)?)?, attributes)
    }

    fn attrs(pairs: &[(&str, f64)]) -> HashMap<String, f64> {
        pairs.iter().map(|(k, v)| ((*k).to_string(), *v)).collect()
    }

    #[test]
    fn test_if_with_comparison() {
        let a = attrs(&[("x", 11.0)]);
        assert_eq!(eval_str("IF(x>10,5,2)", &a).unwrap(), 5.0);

        let a = attrs(&[("x", 5.0)]);
        assert_eq!(eval_str("IF(x>10,5,2)", &a).unwrap(), 2.0);
    }

    #[test]
    fn test_rounding_functions() {
        let a = HashMap::new();
        assert_eq!(eval_str("ROUNDUP(3.2)", &a).unwrap(), 4.0);
        assert_eq!(eval_str("ROUNDDOWN(3.8)", &a).unwrap(), 3.0);
        assert!((eval_str("ROUND(3.456, 2)", &a).unwrap() - 3.46).abs() < 1e-10);
        assert_eq!(eval_str("ROUND(3.456, 0)", &a).unwrap(), 3.0);
    }

    #[test]
    fn test_sum_max_min() {
        let a = attrs(&[("telas", 4.0), ("apis", 2.0)]);
        assert_eq!(eval_str("SUM(telas, apis, 1)", &a).unwrap(), 7.0);
        assert_eq!(eval_str("MAX(telas, apis)", &a).unwrap(), 4.0);
        assert_eq!(eval_str("MIN(telas, apis, 10)", &a).unwrap(), 2.0);
    }

    #[test]
    fn test_arithmetic_with_attributes() {
        let a = attrs(&[("endpoints", 3.0)]);
        assert_eq!(eval_str("endpoints * 4 + 2", &a).unwrap(), 14.0);
    }

    #[test]
    fn test_ternary() {
        let a = attrs(&[("n", 2.0)]);
        assert_eq!(eval_str("n >= 2 ? n * 3 : 1", &a).unwrap(), 6.0);
        let a = attrs(&[("n", 1.0)]);
        assert_eq!(eval_str("n >= 2 ? n * 3 : 1", &a).unwrap(), 1.0);
    }

    #[test]
    fn test_negation() {
        let a = attrs(&[("x", 4.0)]);
        assert_eq!(eval_str("-x + 10", &a).unwrap(), 6.0);
    }

    #[test]
    fn test_unresolved_attribute() {
        let a = HashMap::new();
        assert_eq!(
            eval_str("horas_base * 2", &a),
            Err(FormulaError::UnresolvedAttribute("horas_base".into()))
        );
    }

    #[test]
    fn test_division_by_zero_is_non_finite() {
        let a = HashMap::new();
        assert_eq!(eval_str("1 / 0", &a), Err(FormulaError::NonFinite));
    }

    #[test]
    fn test_nested_functions() {
        let a = attrs(&[("pontos", 7.0)]);
        // ROUNDUP(7 / 2) = 4; MAX(4, 3) = 4
        assert_eq!(eval_str("MAX(ROUNDUP(pontos / 2), 3)", &a).unwrap(), 4.0);
    }

    #[test]
    fn test_comparison_yields_unit() {
        let a = attrs(&[("x", 3.0)]);
        assert_eq!(eval_str("(x > 2) * 5", &a).unwrap(), 5.0);
        assert_eq!(eval_str("(x > 4) * 5", &a).unwrap(), 0.0);
    }
}
