//! Variable/call resolution and the three typed expression evaluators
//! (integer, boolean, string) that every RHS in BinP is routed through.

use num_bigint::BigInt;
use num_traits::Zero;

use crate::error::{err_fmt, BinpResult, ErrorKind};
use crate::function::Function;
use crate::io::PrintWriter;
use crate::lexer::is_tight_atom;
use crate::namespace::Namespace;
use crate::value::{int_div, int_mod, TypeName, Value};

/// A token after substitution: either still a raw token (operator, keyword,
/// function name, unresolved identifier) or a value looked up from the
/// namespace.
#[derive(Debug, Clone)]
enum Atom {
    Value(Value),
    Token(String),
}

/// Evaluates `tokens` as an expression of the given declared type.
pub fn eval_tokens(type_name: &TypeName, tokens: &[String], ns: &Namespace, printer: &mut dyn PrintWriter, line_num: usize, line_text: &str) -> BinpResult<Value> {
    match type_name {
        TypeName::Int => eval_int(tokens, ns, printer, line_num, line_text),
        TypeName::Bool => eval_bool(tokens, ns, printer, line_num, line_text),
        TypeName::Null => eval_null(tokens, ns, printer, line_num, line_text),
        TypeName::Str | TypeName::Other(_) => eval_str(tokens, ns, printer, line_num, line_text),
    }
}

/// Resolves `tokens` purely for side effects (a bare `name ( … )` statement
/// whose result is discarded).
pub(crate) fn eval_statement_call(tokens: &[String], ns: &Namespace, printer: &mut dyn PrintWriter, line_num: usize, line_text: &str) -> BinpResult<()> {
    resolve(tokens, ns, printer, line_num, line_text)?;
    Ok(())
}

/// Renders a token list the way `output` and string substitution do: tokens
/// join with a single space, except around atoms the preformatter introduced
/// spacing for, which render tight against their neighbours.
pub(crate) fn render_tokens(tokens: &[String]) -> String {
    let mut out = String::new();
    let mut prev_tight = false;
    for (i, tok) in tokens.iter().enumerate() {
        let tight = is_tight_atom(tok);
        if i > 0 && !tight && !prev_tight {
            out.push(' ');
        }
        out.push_str(tok);
        prev_tight = tight;
    }
    out
}

/// Left-to-right substitution + call resolution pass.
///
/// Each token is classified in turn: a bound non-function identifier becomes
/// a `Value` atom; a bound function identifier immediately followed by `(`
/// triggers a call (its arguments, split on top-level commas, are each
/// resolved independently by `Function::call`/`eval_tokens`, which recurses
/// into this same function for nested calls — innermost calls resolve first
/// because they must finish before an outer call site's argument list does);
/// everything else passes through unchanged as a `Token`.
fn resolve(tokens: &[String], ns: &Namespace, printer: &mut dyn PrintWriter, line_num: usize, line_text: &str) -> BinpResult<Vec<Atom>> {
    let mut atoms = Vec::with_capacity(tokens.len());
    let mut i = 0;
    while i < tokens.len() {
        let tok = &tokens[i];
        let is_call_site = tokens.get(i + 1).map(String::as_str) == Some("(")
            && matches!(ns.get(tok), Some(Value::Function(_)));
        if is_call_site {
            let Some(Value::Function(function)) = ns.get(tok).cloned() else { unreachable!() };
            let close = matching_close(tokens, i + 1, line_num, line_text)?;
            let inner = &tokens[i + 2..close];
            let arg_groups = split_top_level(inner, ",");
            let arg_groups = if inner.is_empty() { Vec::new() } else { arg_groups };
            let result = function.call(&arg_groups, ns, printer, line_num, line_text)?;
            atoms.push(Atom::Value(result));
            i = close + 1;
            continue;
        }
        match ns.get(tok) {
            Some(Value::Function(_)) => atoms.push(Atom::Token(tok.clone())),
            Some(value) => atoms.push(Atom::Value(value.clone())),
            None => atoms.push(Atom::Token(tok.clone())),
        }
        i += 1;
    }
    Ok(atoms)
}

/// Finds the index of the `)` matching the `(` at `tokens[open_idx]`.
fn matching_close(tokens: &[String], open_idx: usize, line_num: usize, line_text: &str) -> BinpResult<usize> {
    let mut depth = 0usize;
    for (offset, tok) in tokens[open_idx..].iter().enumerate() {
        match tok.as_str() {
            "(" => depth += 1,
            ")" => {
                depth -= 1;
                if depth == 0 {
                    return Ok(open_idx + offset);
                }
            }
            _ => {}
        }
    }
    err_fmt!(ErrorKind::Syntax; line_num, line_text; "unmatched parenthesis");
}

/// Splits on top-level occurrences of `sep` (not inside nested parens).
fn split_top_level(tokens: &[String], sep: &str) -> Vec<Vec<String>> {
    let mut groups = Vec::new();
    let mut current = Vec::new();
    let mut depth = 0i32;
    for tok in tokens {
        match tok.as_str() {
            "(" => depth += 1,
            ")" => depth -= 1,
            _ => {}
        }
        if depth == 0 && tok == sep {
            groups.push(std::mem::take(&mut current));
        } else {
            current.push(tok.clone());
        }
    }
    groups.push(current);
    groups
}

fn is_int_literal(token: &str) -> bool {
    let digits = token.strip_prefix('-').unwrap_or(token);
    !digits.is_empty() && digits.bytes().all(|b| b.is_ascii_digit())
}

struct IntParser<'a> {
    atoms: &'a [Atom],
    pos: usize,
    line_num: usize,
    line_text: &'a str,
}

impl<'a> IntParser<'a> {
    fn peek_op(&self) -> Option<&str> {
        match self.atoms.get(self.pos) {
            Some(Atom::Token(t)) => Some(t.as_str()),
            _ => None,
        }
    }

    fn parse_expr(&mut self) -> BinpResult<BigInt> {
        let mut acc = self.parse_term()?;
        loop {
            match self.peek_op() {
                Some("+") => {
                    self.pos += 1;
                    acc += self.parse_term()?;
                }
                Some("-") => {
                    self.pos += 1;
                    acc -= self.parse_term()?;
                }
                _ => break,
            }
        }
        Ok(acc)
    }

    fn parse_term(&mut self) -> BinpResult<BigInt> {
        let mut acc = self.parse_factor()?;
        loop {
            match self.peek_op() {
                Some("*") => {
                    self.pos += 1;
                    acc *= self.parse_factor()?;
                }
                Some("/") => {
                    self.pos += 1;
                    let rhs = self.parse_factor()?;
                    if rhs.is_zero() {
                        err_fmt!(ErrorKind::Value; self.line_num, self.line_text; "division by zero");
                    }
                    acc = int_div(&acc, &rhs);
                }
                Some("%") => {
                    self.pos += 1;
                    let rhs = self.parse_factor()?;
                    if rhs.is_zero() {
                        err_fmt!(ErrorKind::Value; self.line_num, self.line_text; "modulo by zero");
                    }
                    acc = int_mod(&acc, &rhs);
                }
                _ => break,
            }
        }
        Ok(acc)
    }

    fn parse_factor(&mut self) -> BinpResult<BigInt> {
        match self.atoms.get(self.pos) {
            Some(Atom::Token(t)) if t == "(" => {
                self.pos += 1;
                let value = self.parse_expr()?;
                match self.atoms.get(self.pos) {
                    Some(Atom::Token(t)) if t == ")" => {
                        self.pos += 1;
                        Ok(value)
                    }
                    _ => err_fmt!(ErrorKind::Syntax; self.line_num, self.line_text; "expected ')'"),
                }
            }
            Some(Atom::Value(Value::Int(n))) => {
                self.pos += 1;
                Ok(n.clone())
            }
            Some(Atom::Token(t)) if is_int_literal(t) => {
                let n: BigInt = t.parse().expect("is_int_literal guarantees a parseable integer");
                self.pos += 1;
                Ok(n)
            }
            Some(_) => err_fmt!(ErrorKind::Value; self.line_num, self.line_text; "invalid cast of type 'int'"),
            None => err_fmt!(ErrorKind::Syntax; self.line_num, self.line_text; "expected an integer expression"),
        }
    }
}

fn eval_int(tokens: &[String], ns: &Namespace, printer: &mut dyn PrintWriter, line_num: usize, line_text: &str) -> BinpResult<Value> {
    let atoms = resolve(tokens, ns, printer, line_num, line_text)?;
    let mut parser = IntParser { atoms: &atoms, pos: 0, line_num, line_text };
    let value = parser.parse_expr()?;
    if parser.pos != atoms.len() {
        err_fmt!(ErrorKind::Syntax; line_num, line_text; "unexpected trailing tokens in integer expression");
    }
    Ok(Value::Int(value))
}

/// The kind-tagged leaf a boolean-expression operand resolves to.
enum RawLeaf {
    Bool(bool),
    Int(BigInt),
}

fn leaf_kind(atom: &Atom, line_num: usize, line_text: &str) -> BinpResult<RawLeaf> {
    match atom {
        Atom::Value(Value::Bool(b)) => Ok(RawLeaf::Bool(*b)),
        Atom::Value(Value::Int(n)) => Ok(RawLeaf::Int(n.clone())),
        Atom::Token(t) if t == "true" || t == "True" => Ok(RawLeaf::Bool(true)),
        Atom::Token(t) if t == "false" || t == "False" => Ok(RawLeaf::Bool(false)),
        Atom::Token(t) if is_int_literal(t) => {
            let n: BigInt = t.parse().expect("is_int_literal guarantees a parseable integer");
            Ok(RawLeaf::Int(n))
        }
        _ => err_fmt!(ErrorKind::Value; line_num, line_text; "invalid cast of type 'bool'"),
    }
}

/// Coerces a leaf to `bool` for `&&`/`||`: integers only at exactly 0 or 1.
fn leaf_as_logical(leaf: RawLeaf, line_num: usize, line_text: &str) -> BinpResult<bool> {
    match leaf {
        RawLeaf::Bool(b) => Ok(b),
        RawLeaf::Int(n) if n == BigInt::zero() => Ok(false),
        RawLeaf::Int(n) if n == BigInt::from(1) => Ok(true),
        RawLeaf::Int(_) => err_fmt!(ErrorKind::Value; line_num, line_text; "only 0 or 1 may be used as a boolean in '&&'/'||'"),
    }
}

fn strip_wrapping_parens(mut atoms: Vec<Atom>) -> Vec<Atom> {
    loop {
        let wraps = atoms.len() >= 2
            && matches!(atoms.first(), Some(Atom::Token(t)) if t == "(")
            && matches!(atoms.last(), Some(Atom::Token(t)) if t == ")")
            && fully_wraps(&atoms);
        if !wraps {
            break;
        }
        atoms = atoms[1..atoms.len() - 1].to_vec();
    }
    atoms
}

fn fully_wraps(atoms: &[Atom]) -> bool {
    let mut depth = 0i32;
    for (i, atom) in atoms.iter().enumerate() {
        match atom {
            Atom::Token(t) if t == "(" => depth += 1,
            Atom::Token(t) if t == ")" => {
                depth -= 1;
                if depth == 0 && i != atoms.len() - 1 {
                    return false;
                }
            }
            _ => {}
        }
    }
    depth == 0
}

fn eval_bool(tokens: &[String], ns: &Namespace, printer: &mut dyn PrintWriter, line_num: usize, line_text: &str) -> BinpResult<Value> {
    let atoms = strip_wrapping_parens(resolve(tokens, ns, printer, line_num, line_text)?);
    match atoms.len() {
        1 => match leaf_kind(&atoms[0], line_num, line_text)? {
            RawLeaf::Bool(b) => Ok(Value::Bool(b)),
            RawLeaf::Int(_) => err_fmt!(ErrorKind::Value; line_num, line_text; "expected a boolean expression"),
        },
        3 => {
            let Atom::Token(op) = &atoms[1] else {
                err_fmt!(ErrorKind::Syntax; line_num, line_text; "expected a boolean operator");
            };
            let op = op.clone();
            let left = leaf_kind(&atoms[0], line_num, line_text)?;
            let right = leaf_kind(&atoms[2], line_num, line_text)?;
            match op.as_str() {
                "==" | "!=" | "<" | "<=" | ">" | ">=" => {
                    let (RawLeaf::Int(l), RawLeaf::Int(r)) = (left, right) else {
                        err_fmt!(ErrorKind::Value; line_num, line_text; "'{}' requires two integer operands", op);
                    };
                    let result = match op.as_str() {
                        "==" => l == r,
                        "!=" => l != r,
                        "<" => l < r,
                        "<=" => l <= r,
                        ">" => l > r,
                        ">=" => l >= r,
                        _ => unreachable!(),
                    };
                    Ok(Value::Bool(result))
                }
                "&&" | "||" => {
                    let l = leaf_as_logical(left, line_num, line_text)?;
                    let r = leaf_as_logical(right, line_num, line_text)?;
                    Ok(Value::Bool(if op == "&&" { l && r } else { l || r }))
                }
                other => err_fmt!(ErrorKind::Syntax; line_num, line_text; "unknown boolean operator '{}'", other),
            }
        }
        _ => err_fmt!(ErrorKind::Syntax; line_num, line_text; "malformed boolean expression"),
    }
}

fn eval_null(tokens: &[String], ns: &Namespace, printer: &mut dyn PrintWriter, line_num: usize, line_text: &str) -> BinpResult<Value> {
    let atoms = resolve(tokens, ns, printer, line_num, line_text)?;
    match atoms.as_slice() {
        [Atom::Value(Value::Null)] => Ok(Value::Null),
        [Atom::Token(t)] if t == "null" => Ok(Value::Null),
        _ => err_fmt!(ErrorKind::Value; line_num, line_text; "expected 'null'"),
    }
}

fn eval_str(tokens: &[String], ns: &Namespace, printer: &mut dyn PrintWriter, line_num: usize, line_text: &str) -> BinpResult<Value> {
    let atoms = resolve(tokens, ns, printer, line_num, line_text)?;
    let mut pieces = Vec::with_capacity(atoms.len());
    for atom in &atoms {
        match atom {
            Atom::Value(v) => pieces.push(v.display_text()),
            Atom::Token(t) if t.len() >= 2 && t.starts_with('\'') && t.ends_with('\'') => {
                pieces.push(t[1..t.len() - 1].to_owned());
            }
            Atom::Token(t) => pieces.push(t.clone()),
        }
    }
    Ok(Value::Str(render_tokens(&pieces).into()))
}
