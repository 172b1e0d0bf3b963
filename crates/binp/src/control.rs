//! `if`/`else`/`end` and `while`/`else`/`end` block handlers.
//!
//! Neither handler counts nested `end` tokens itself: a nested `if`/`while`
//! opener is handed back to [`dispatch_line`], which consumes that whole
//! nested block and returns the index just past its own `end` — so this
//! module only ever sees `else`/`end` lines that belong to its own block.

use std::rc::Rc;

use crate::dispatch::{dispatch_line, ReturnOutcome};
use crate::error::{err_fmt, BinpResult, ErrorKind};
use crate::expressions::{self, render_tokens};
use crate::io::PrintWriter;
use crate::namespace::Namespace;
use crate::value::{TypeName, Value};

/// Extracts the tokens strictly between `if`/`while`'s `(` and its matching
/// `)`, verifying the line ends in `=>`.
fn extract_condition<'a>(tokens: &'a [String], line_num: usize, line_text: &str) -> BinpResult<&'a [String]> {
    if tokens.get(1).map(String::as_str) != Some("(") {
        err_fmt!(ErrorKind::Syntax; line_num, line_text; "expected '(' after '{}'", tokens[0]);
    }
    let mut depth = 0i32;
    let mut close = None;
    for (idx, tok) in tokens.iter().enumerate().skip(1) {
        match tok.as_str() {
            "(" => depth += 1,
            ")" => {
                depth -= 1;
                if depth == 0 {
                    close = Some(idx);
                    break;
                }
            }
            _ => {}
        }
    }
    let Some(close) = close else {
        err_fmt!(ErrorKind::Syntax; line_num, line_text; "unmatched '(' in '{}' condition", tokens[0]);
    };
    if tokens.get(close + 1).map(String::as_str) != Some("=>") {
        err_fmt!(ErrorKind::Syntax; line_num, line_text; "expected '=>' after '{}' condition", tokens[0]);
    }
    Ok(&tokens[2..close])
}

fn eval_condition(cond_tokens: &[String], ns: &mut Namespace, printer: &mut dyn PrintWriter, line_num: usize, line_text: &str) -> BinpResult<bool> {
    match expressions::eval_tokens(&TypeName::Bool, cond_tokens, ns, printer, line_num, line_text)? {
        Value::Bool(b) => Ok(b),
        _ => unreachable!("eval_tokens(&TypeName::Bool, ..) always yields Value::Bool"),
    }
}

/// `if ( cond ) => … [else …] end`. Single pass: the active half (then or
/// else) runs with `execute` unchanged, the inactive half is walked with
/// `execute = false` purely to find `end`.
pub(crate) fn run_if(lines: &Rc<Vec<Vec<String>>>, i: usize, ns: &mut Namespace, execute: bool, printer: &mut dyn PrintWriter) -> BinpResult<(usize, Option<ReturnOutcome>)> {
    let tokens = &lines[i];
    let text = render_tokens(tokens);
    let cond_tokens = extract_condition(tokens, i, &text)?.to_vec();
    let cond_true = if execute { eval_condition(&cond_tokens, ns, printer, i, &text)? } else { false };

    let (end_idx, ret) = walk_branches(lines, i + 1, i, &text, ns, execute, cond_true, printer)?;
    Ok((end_idx + 1, ret))
}

/// `while ( cond ) => … [else …] end`. One pass per visit: the loop body
/// runs once if the condition holds, advancing `next_i` back to `i` so the
/// caller's dispatch loop re-enters and re-evaluates the condition; on a
/// false condition, the `else` half (if present) runs exactly once and
/// `next_i` moves past the whole block.
pub(crate) fn run_while(lines: &Rc<Vec<Vec<String>>>, i: usize, ns: &mut Namespace, execute: bool, printer: &mut dyn PrintWriter) -> BinpResult<(usize, Option<ReturnOutcome>)> {
    let tokens = &lines[i];
    let text = render_tokens(tokens);
    let cond_tokens = extract_condition(tokens, i, &text)?.to_vec();
    let cond_true = if execute { eval_condition(&cond_tokens, ns, printer, i, &text)? } else { false };

    let (end_idx, ret) = walk_branches(lines, i + 1, i, &text, ns, execute, cond_true, printer)?;
    if ret.is_some() {
        return Ok((end_idx + 1, ret));
    }
    if cond_true {
        Ok((i, None))
    } else {
        Ok((end_idx + 1, None))
    }
}

/// Walks from `start` until the `end` belonging to this block, running the
/// `then` half (lines before `else`) when `then_active`, and the `else` half
/// (if any) when `!then_active`, both gated by `outer_execute`. Returns the
/// absolute index of the `end` line and any propagating return.
///
/// `open_line`/`open_text` identify the `if`/`while` line that opened this
/// block, for the error raised if `end` is never found.
fn walk_branches(
    lines: &Rc<Vec<Vec<String>>>,
    start: usize,
    open_line: usize,
    open_text: &str,
    ns: &mut Namespace,
    outer_execute: bool,
    then_active: bool,
    printer: &mut dyn PrintWriter,
) -> BinpResult<(usize, Option<ReturnOutcome>)> {
    let mut j = start;
    let mut in_else = false;
    loop {
        if j >= lines.len() {
            err_fmt!(ErrorKind::Syntax; open_line, open_text; "unmatched 'end'");
        }
        let tokens = &lines[j];
        if tokens.len() == 1 && tokens[0] == "end" {
            return Ok((j, None));
        }
        if tokens.len() == 1 && tokens[0] == "else" {
            in_else = true;
            j += 1;
            continue;
        }
        let active_now = if in_else { !then_active } else { then_active };
        let (next_j, ret) = dispatch_line(lines, j, ns, outer_execute && active_now, printer)?;
        if ret.is_some() {
            return Ok((next_j, ret));
        }
        j = next_j;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::io::NoPrint;
    use crate::lexer::preformat_line;

    fn program(src: &str) -> Rc<Vec<Vec<String>>> {
        Rc::new(src.lines().map(preformat_line).collect())
    }

    #[test]
    fn if_runs_then_branch_when_true() {
        let lines = program("if ( 1 == 1 ) =>\noutput 'yes'\nelse\noutput 'no'\nend");
        let mut ns = Namespace::new();
        let mut printer = crate::io::CollectStringPrint::new();
        let (next_i, ret) = run_if(&lines, 0, &mut ns, true, &mut printer).unwrap();
        assert!(ret.is_none());
        assert_eq!(next_i, 5);
        assert_eq!(printer.into_string(), " >> yes");
    }

    #[test]
    fn while_reenters_same_line_while_true() {
        let lines = program("var int i = 0\nwhile ( i < 3 ) =>\noutput i\nvar int i = i + 1\nend");
        let mut ns = Namespace::new();
        let mut printer = NoPrint;
        let (_, _) = crate::dispatch::dispatch_line(&lines, 0, &mut ns, true, &mut printer).unwrap();
        let mut i = 1;
        let mut iterations = 0;
        loop {
            let (next_i, ret) = run_while(&lines, i, &mut ns, true, &mut printer).unwrap();
            assert!(ret.is_none());
            if next_i == i {
                iterations += 1;
                assert!(iterations <= 10, "loop did not terminate");
                continue;
            }
            break;
        }
        assert_eq!(ns.get("i").unwrap().as_int().unwrap(), &num_bigint::BigInt::from(3));
    }

    #[test]
    fn missing_end_is_a_syntax_error_not_a_panic() {
        let lines = program("if ( 1 == 1 ) =>\noutput 'yes'");
        let mut ns = Namespace::new();
        let mut printer = NoPrint;
        let err = run_if(&lines, 0, &mut ns, true, &mut printer).unwrap_err();
        assert_eq!(err.kind(), crate::error::ErrorKind::Syntax);
    }
}
