//! The two built-in functions pre-populated into every global namespace.

use num_bigint::BigInt;
use num_traits::Zero;

use crate::error::{err_fmt, BinpResult, ErrorKind};
use crate::value::Value;

/// A built-in, fixed-arity function. Unlike user functions these never
/// re-enter the dispatcher; they compute directly over already-evaluated
/// argument values.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Builtin {
    IntNegate,
    BoolNegate,
}

impl Builtin {
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Self::IntNegate => "int_negate",
            Self::BoolNegate => "bool_negate",
        }
    }

    #[must_use]
    pub fn arity(self) -> usize {
        match self {
            Self::IntNegate | Self::BoolNegate => 1,
        }
    }

    /// The declared type of the single parameter, used to select the right
    /// expression evaluator when resolving a call's argument tokens.
    #[must_use]
    pub fn param_type(self) -> crate::value::TypeName {
        match self {
            Self::IntNegate => crate::value::TypeName::Int,
            Self::BoolNegate => crate::value::TypeName::Bool,
        }
    }

    pub fn call(self, args: &[Value], line_num: usize, line_text: &str) -> BinpResult<Value> {
        if args.len() != self.arity() {
            err_fmt!(ErrorKind::Argument; line_num, line_text;
                "{} expects {} argument(s), got {}", self.name(), self.arity(), args.len());
        }
        match self {
            Self::IntNegate => {
                let Some(n) = args[0].as_int() else {
                    err_fmt!(ErrorKind::Value; line_num, line_text; "int_negate expects an int argument");
                };
                Ok(Value::Int(BigInt::zero() - n))
            }
            Self::BoolNegate => {
                let Some(b) = args[0].as_bool() else {
                    err_fmt!(ErrorKind::Value; line_num, line_text; "bool_negate expects a bool argument");
                };
                Ok(Value::Bool(!b))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn int_negate_flips_sign() {
        let result = Builtin::IntNegate.call(&[Value::Int(5.into())], 0, "").unwrap();
        assert_eq!(result.as_int().unwrap(), &num_bigint::BigInt::from(-5));
    }

    #[test]
    fn bool_negate_flips_truth() {
        let result = Builtin::BoolNegate.call(&[Value::Bool(true)], 0, "").unwrap();
        assert_eq!(result.as_bool(), Some(false));
    }

    #[test]
    fn wrong_arity_is_an_argument_error() {
        let err = Builtin::IntNegate.call(&[], 0, "").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Argument);
    }
}
