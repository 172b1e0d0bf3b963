//! Classifies one preformatted line by its leading token and routes it to a
//! handler; the top-level entry point for running any range of lines,
//! top-level program or function body alike.

use std::rc::Rc;

use crate::control;
use crate::error::{err_fmt, BinpError, BinpResult, ErrorKind};
use crate::expressions::{self, render_tokens};
use crate::function::{self, Function, UserFunction};
use crate::io::PrintWriter;
use crate::namespace::Namespace;
use crate::value::{TypeName, Value};

/// A propagating `return`: its raw (unevaluated) token list, the absolute
/// line it appeared on, and that line's rendered text for error reporting.
pub(crate) type ReturnOutcome = (Vec<String>, usize, String);

const RESERVED: &[&str] = &[
    "if", "else", "while", "end", "then", "return", "func", "int", "str", "bool", "fn", "null", "tup", "var", "output", "input", "true", "false",
];

pub(crate) fn validate_identifier(name: &str, line_num: usize, line_text: &str) -> BinpResult<()> {
    let mut chars = name.chars();
    let starts_ok = chars.next().is_some_and(|c| c.is_ascii_alphabetic() || c == '_');
    let rest_ok = chars.all(|c| c.is_ascii_alphanumeric() || c == '_');
    if !starts_ok || !rest_ok || RESERVED.contains(&name) {
        err_fmt!(ErrorKind::Syntax; line_num, line_text; "'{}' is not a valid identifier", name);
    }
    Ok(())
}

/// Runs every line in `[start, end)` against `ns` in order, returning early
/// with the first propagating return it observes.
pub fn run_block(lines: &Rc<Vec<Vec<String>>>, start: usize, end: usize, ns: &mut Namespace, execute: bool, printer: &mut dyn PrintWriter) -> BinpResult<Option<ReturnOutcome>> {
    let mut i = start;
    while i < end {
        let (next_i, ret) = dispatch_line(lines, i, ns, execute, printer)?;
        if ret.is_some() {
            return Ok(ret);
        }
        i = next_i;
    }
    Ok(None)
}

/// Dispatches exactly one statement starting at `i`, which may itself span
/// many lines (an `if`/`while` block or a function definition).
pub(crate) fn dispatch_line(lines: &Rc<Vec<Vec<String>>>, i: usize, ns: &mut Namespace, execute: bool, printer: &mut dyn PrintWriter) -> BinpResult<(usize, Option<ReturnOutcome>)> {
    let tokens = &lines[i];
    if tokens.is_empty() || tokens[0] == "$" {
        return Ok((i + 1, None));
    }
    let text = render_tokens(tokens);
    match tokens[0].as_str() {
        "output" => {
            if execute {
                let rendered = expressions::eval_tokens(&TypeName::Str, &tokens[1..], ns, printer, i, &text)?;
                printer.print_line(&format!(" >> {}", rendered.display_text()));
            }
            Ok((i + 1, None))
        }
        "var" => dispatch_var(lines, i, tokens, &text, ns, execute, printer),
        "if" => control::run_if(lines, i, ns, execute, printer),
        "while" => control::run_while(lines, i, ns, execute, printer),
        "return" => {
            if execute {
                Ok((i + 1, Some((tokens[1..].to_vec(), i, text))))
            } else {
                Ok((i + 1, None))
            }
        }
        _ if tokens.get(1).map(String::as_str) == Some("(") => {
            if execute {
                expressions::eval_statement_call(tokens, ns, printer, i, &text)?;
            }
            Ok((i + 1, None))
        }
        _ => err_fmt!(ErrorKind::Syntax; i, text; "unrecognised statement"),
    }
}

fn dispatch_var(lines: &Rc<Vec<Vec<String>>>, i: usize, tokens: &[String], text: &str, ns: &mut Namespace, execute: bool, printer: &mut dyn PrintWriter) -> BinpResult<(usize, Option<ReturnOutcome>)> {
    if tokens.len() >= 3 && tokens[2] == "func" {
        return dispatch_function_def(lines, i, tokens, text, ns, execute);
    }

    let (Some(type_tok), Some(name_tok)) = (tokens.get(1), tokens.get(2)) else {
        err_fmt!(ErrorKind::Syntax; i, text; "malformed 'var' declaration");
    };
    if tokens.get(3).map(String::as_str) != Some("=") {
        err_fmt!(ErrorKind::Syntax; i, text; "expected '=' in 'var' declaration");
    }
    if !execute {
        return Ok((i + 1, None));
    }

    validate_identifier(name_tok, i, text)?;
    let type_name = TypeName::parse(type_tok);
    let rhs = &tokens[4..];
    let value = if rhs.len() == 1 && rhs[0] == "input" {
        let mut raw = String::new();
        std::io::stdin()
            .read_line(&mut raw)
            .map_err(|e| BinpError::new(ErrorKind::Runtime, i, text, format!("failed to read input: {e}")))?;
        let input_tokens = crate::lexer::preformat_line(raw.trim_end_matches(['\n', '\r']));
        expressions::eval_tokens(&type_name, &input_tokens, ns, printer, i, text)?
    } else {
        expressions::eval_tokens(&type_name, rhs, ns, printer, i, text)?
    };
    ns.set(name_tok.clone(), value);
    Ok((i + 1, None))
}

/// `var <ret> func <name> = ( <params> ) =>`
fn dispatch_function_def(lines: &Rc<Vec<Vec<String>>>, i: usize, tokens: &[String], text: &str, ns: &mut Namespace, execute: bool) -> BinpResult<(usize, Option<ReturnOutcome>)> {
    let (Some(ret_tok), Some(name_tok)) = (tokens.get(1), tokens.get(3)) else {
        err_fmt!(ErrorKind::Syntax; i, text; "malformed function definition");
    };
    if tokens.get(4).map(String::as_str) != Some("=") {
        err_fmt!(ErrorKind::Syntax; i, text; "expected '=' in function definition");
    }
    if tokens.get(5).map(String::as_str) != Some("(") {
        err_fmt!(ErrorKind::Syntax; i, text; "expected '(' in function definition");
    }
    let Some(close) = tokens.iter().enumerate().skip(6).find(|(_, t)| *t == ")").map(|(idx, _)| idx) else {
        err_fmt!(ErrorKind::Syntax; i, text; "unmatched '(' in function definition");
    };
    if tokens.get(close + 1).map(String::as_str) != Some("=>") {
        err_fmt!(ErrorKind::Syntax; i, text; "expected '=>' after function parameters");
    }

    let name = name_tok.clone();
    let Some(end_idx) = function::find_matching_end(&lines[i + 1..], i + 1, &name) else {
        err_fmt!(ErrorKind::Syntax; i, text; "no matching 'end {}' for function definition", name);
    };

    if execute {
        validate_identifier(&name, i, text)?;
        let params = function::parse_params(&tokens[6..close])?;
        let return_type = TypeName::parse(ret_tok);
        let user_fn = UserFunction::new(name.clone(), return_type, params, Rc::clone(lines), i + 1, end_idx);
        ns.set(name, Value::Function(std::rc::Rc::new(Function::User(user_fn))));
    }
    Ok((end_idx + 1, None))
}
