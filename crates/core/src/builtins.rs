//! Built-in symbol namespaces.
//!
//! `math` covers the scalar functions documents most often invoke directly.
//! Hosts that need more register their own namespaces on the registry.

use crate::call::CallArgs;
use crate::error::ResolveError;
use crate::namespace::StaticNamespace;
use crate::value::Value;

/// The `math` namespace: scalar functions over `f64`, plus `pi`.
pub fn math() -> StaticNamespace {
    StaticNamespace::new()
        .with_value("pi", std::f64::consts::PI)
        .with_fn("sqrt", |args| unary(args, "sqrt", f64::sqrt))
        .with_fn("abs", |args| unary(args, "abs", f64::abs))
        .with_fn("floor", |args| unary(args, "floor", f64::floor))
        .with_fn("ceil", |args| unary(args, "ceil", f64::ceil))
        .with_fn("pow", pow)
        .with_fn("min", |args| reduce(args, "min", f64::min))
        .with_fn("max", |args| reduce(args, "max", f64::max))
        .with_fn("sum", |args| Ok(Value::Float(numbers(args, "sum")?.iter().sum())))
}

fn unary(args: &CallArgs, name: &str, f: impl Fn(f64) -> f64) -> Result<Value, ResolveError> {
    let value = args.sole().ok_or_else(|| ResolveError::Invocation {
        message: format!("{name} takes exactly one argument, got {}", args.len()),
    })?;
    Ok(Value::Float(f(expect_number(value, name)?)))
}

fn pow(args: &CallArgs) -> Result<Value, ResolveError> {
    let nums = numbers(args, "pow")?;
    match nums.as_slice() {
        [base, exp] => Ok(Value::Float(base.powf(*exp))),
        other => Err(ResolveError::Invocation {
            message: format!("pow takes exactly two arguments, got {}", other.len()),
        }),
    }
}

fn reduce(
    args: &CallArgs,
    name: &str,
    f: impl Fn(f64, f64) -> f64,
) -> Result<Value, ResolveError> {
    let nums = numbers(args, name)?;
    let (first, rest) = nums.split_first().ok_or_else(|| ResolveError::Invocation {
        message: format!("{name} needs at least one argument"),
    })?;
    Ok(Value::Float(rest.iter().fold(*first, |acc, x| f(acc, *x))))
}

fn numbers(args: &CallArgs, name: &str) -> Result<Vec<f64>, ResolveError> {
    args.values().map(|v| expect_number(v, name)).collect()
}

fn expect_number(value: &Value, name: &str) -> Result<f64, ResolveError> {
    value.as_f64().ok_or_else(|| ResolveError::Invocation {
        message: format!("{name} expects a number, got {}", value.type_name()),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::namespace::SymbolNamespace;
    use crate::symbol::Symbol;

    fn call(name: &str, positional: &[Value]) -> Result<Value, ResolveError> {
        let Some(Symbol::Func(f)) = math().resolve(name) else {
            panic!("{name} is not a math function");
        };
        let mut args = CallArgs::new();
        for v in positional {
            args.push(v.clone());
        }
        f(&args)
    }

    #[test]
    fn sqrt_of_nine() {
        assert_eq!(call("sqrt", &[Value::Int(9)]).unwrap(), Value::Float(3.0));
    }

    #[test]
    fn pow_min_max_sum() {
        assert_eq!(
            call("pow", &[Value::Int(2), Value::Int(10)]).unwrap(),
            Value::Float(1024.0)
        );
        assert_eq!(
            call("min", &[Value::Int(3), Value::Int(1), Value::Int(2)]).unwrap(),
            Value::Float(1.0)
        );
        assert_eq!(
            call("max", &[Value::Float(1.5), Value::Int(1)]).unwrap(),
            Value::Float(1.5)
        );
        assert_eq!(
            call("sum", &[Value::Int(1), Value::Int(2), Value::Int(3)]).unwrap(),
            Value::Float(6.0)
        );
    }

    #[test]
    fn non_numeric_argument_is_rejected() {
        let err = call("sqrt", &[Value::from("nine")]).unwrap_err();
        assert!(matches!(err, ResolveError::Invocation { .. }));
    }

    #[test]
    fn arity_is_checked() {
        let err = call("sqrt", &[Value::Int(1), Value::Int(2)]).unwrap_err();
        assert!(matches!(err, ResolveError::Invocation { .. }));
        let err = call("min", &[]).unwrap_err();
        assert!(matches!(err, ResolveError::Invocation { .. }));
    }
}
