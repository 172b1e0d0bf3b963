//! User-defined and built-in callables, unified behind one `Function` value.

use std::rc::Rc;

use crate::callable::Builtin;
use crate::error::{err_fmt, BinpResult, ErrorKind};
use crate::expressions;
use crate::namespace::Namespace;
use crate::value::{TypeName, Value};
use crate::{dispatch, io::PrintWriter};

/// A declared parameter: its type and its bound name.
#[derive(Debug, Clone)]
pub struct Param {
    pub type_name: TypeName,
    pub name: String,
}

/// A function defined in source via `var <ret> func <name> = ( … ) =>`.
///
/// `lines` shares the whole program's token vector by `Rc` so defining a
/// function never copies the source; only the half-open `[body_start,
/// body_end)` range of absolute line indices is recorded.
#[derive(Debug, Clone)]
pub struct UserFunction {
    pub name: String,
    pub return_type: TypeName,
    pub params: Vec<Param>,
    lines: Rc<Vec<Vec<String>>>,
    body_start: usize,
    body_end: usize,
}

impl UserFunction {
    #[must_use]
    pub fn new(name: String, return_type: TypeName, params: Vec<Param>, lines: Rc<Vec<Vec<String>>>, body_start: usize, body_end: usize) -> Self {
        Self { name, return_type, params, lines, body_start, body_end }
    }

    pub(crate) fn lines(&self) -> &Rc<Vec<Vec<String>>> {
        &self.lines
    }
}

/// Either kind of callable; both live in the namespace as `Value::Function`.
#[derive(Debug, Clone)]
pub enum Function {
    User(UserFunction),
    Builtin(Builtin),
}

impl Function {
    #[must_use]
    pub fn name(&self) -> &str {
        match self {
            Self::User(f) => &f.name,
            Self::Builtin(b) => b.name(),
        }
    }

    #[must_use]
    pub fn arity(&self) -> usize {
        match self {
            Self::User(f) => f.params.len(),
            Self::Builtin(b) => b.arity(),
        }
    }

    /// Textual form used by `display_text` when a function value is rendered
    /// (e.g. interpolated into an `output` string without being called).
    #[must_use]
    pub fn signature_text(&self) -> String {
        match self {
            Self::User(f) => format!("<function '{}'>", f.name),
            Self::Builtin(b) => format!("<builtin function '{}'>", b.name()),
        }
    }

    /// Runs a call: `arg_groups` is the already top-level-comma-split,
    /// not-yet-evaluated token list per argument, in source order.
    pub fn call(&self, arg_groups: &[Vec<String>], caller_ns: &Namespace, printer: &mut dyn PrintWriter, line_num: usize, line_text: &str) -> BinpResult<Value> {
        if arg_groups.len() != self.arity() {
            err_fmt!(ErrorKind::Argument; line_num, line_text;
                "'{}' expects {} argument(s), got {}", self.name(), self.arity(), arg_groups.len());
        }
        match self {
            Self::Builtin(b) => {
                let mut values = Vec::with_capacity(arg_groups.len());
                for group in arg_groups {
                    values.push(expressions::eval_tokens(&b.param_type(), group, caller_ns, printer, line_num, line_text)?);
                }
                b.call(&values, line_num, line_text)
            }
            Self::User(f) => {
                let mut callee_ns = caller_ns.snapshot_for_call();
                for (param, arg_tokens) in f.params.iter().zip(arg_groups) {
                    let value = expressions::eval_tokens(&param.type_name, arg_tokens, &callee_ns, printer, line_num, line_text)?;
                    callee_ns.set(param.name.clone(), value);
                }
                let outcome = dispatch::run_block(f.lines(), f.body_start, f.body_end, &mut callee_ns, true, printer)?;
                match outcome {
                    Some((return_tokens, return_line, return_text)) => {
                        if return_tokens.is_empty() {
                            return match f.return_type {
                                TypeName::Null => Ok(Value::Null),
                                _ => err_fmt!(ErrorKind::Value; return_line, return_text;
                                    "function '{}' declares return type '{}' but returned no value", f.name, f.return_type),
                            };
                        }
                        expressions::eval_tokens(&f.return_type, &return_tokens, &callee_ns, printer, return_line, &return_text)
                    }
                    None => match f.return_type {
                        TypeName::Null => Ok(Value::Null),
                        _ => err_fmt!(ErrorKind::Value; line_num, line_text;
                            "function '{}' declares return type '{}' but never returned", f.name, f.return_type),
                    },
                }
            }
        }
    }
}

/// Parses a parenthesised parameter declaration list (the tokens strictly
/// between `(` and the matching `)`), e.g. `int` `x` `,` `str` `y`.
pub fn parse_params(tokens: &[String]) -> BinpResult<Vec<Param>> {
    if tokens.is_empty() {
        return Ok(Vec::new());
    }
    let groups: Vec<&[String]> = tokens.split(|t| t == ",").collect();
    let mut params = Vec::with_capacity(groups.len());
    for group in groups {
        let [type_tok, name_tok] = group else {
            err_fmt!(ErrorKind::Syntax; 0, tokens.join(" "); "malformed parameter declaration: {:?}", group);
        };
        params.push(Param { type_name: TypeName::parse(type_tok), name: name_tok.clone() });
    }
    Ok(params)
}

/// Finds the line, relative to `lines`, holding exactly `["end", name]`.
/// Returns the absolute index (`search_start + offset`).
pub fn find_matching_end(lines: &[Vec<String>], search_start: usize, name: &str) -> Option<usize> {
    lines.iter().position(|line| line.len() == 2 && line[0] == "end" && line[1] == name).map(|offset| search_start + offset)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_multiple_parameters() {
        let tokens: Vec<String> = ["int", "x", ",", "str", "y"].iter().map(|s| s.to_string()).collect();
        let params = parse_params(&tokens).unwrap();
        assert_eq!(params.len(), 2);
        assert_eq!(params[0].name, "x");
        assert_eq!(params[1].type_name, TypeName::Str);
    }

    #[test]
    fn zero_parameters_is_fine() {
        assert!(parse_params(&[]).unwrap().is_empty());
    }

    #[test]
    fn finds_matching_end_by_exact_two_token_match() {
        let lines: Vec<Vec<String>> = vec![vec!["output".into(), "'hi'".into()], vec!["end".into(), "fact".into()]];
        assert_eq!(find_matching_end(&lines, 3, "fact"), Some(4));
    }
}
