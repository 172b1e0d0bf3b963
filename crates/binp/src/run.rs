//! Parses a whole source file once and drives it to completion.

use std::rc::Rc;

use num_bigint::BigInt;

use crate::callable::Builtin;
use crate::dispatch;
use crate::error::{err_fmt, BinpResult, ErrorKind};
use crate::function::Function;
use crate::io::PrintWriter;
use crate::lexer;
use crate::namespace::Namespace;
use crate::value::Value;

/// A preformatted BinP program: the whole source file tokenised once, up
/// front, into an ordered vector of lines.
#[derive(Debug, Clone)]
pub struct Program {
    lines: Rc<Vec<Vec<String>>>,
}

impl Program {
    #[must_use]
    pub fn parse(source: &str) -> Self {
        Self { lines: Rc::new(lexer::preformat_source(source)) }
    }

    /// Builds a fresh global namespace with the pre-populated bindings
    /// (`ARG_COUNT`/`ARG_i`, `int_negate`, `bool_negate`) and runs the whole
    /// program against it.
    pub fn run(&self, args: &[String], printer: &mut dyn PrintWriter) -> BinpResult<()> {
        let mut ns = Namespace::new();
        install_globals(&mut ns, args);
        self.run_with_namespace(&mut ns, printer)
    }

    /// Runs the program against an existing namespace, for the REPL (which
    /// persists globals install once and keeps feeding lines afterward).
    pub fn run_with_namespace(&self, ns: &mut Namespace, printer: &mut dyn PrintWriter) -> BinpResult<()> {
        match dispatch::run_block(&self.lines, 0, self.lines.len(), ns, true, printer)? {
            Some((_, line_num, line_text)) => {
                err_fmt!(ErrorKind::Syntax; line_num, line_text; "'return' outside of a function body");
            }
            None => Ok(()),
        }
    }

    #[must_use]
    pub fn line_count(&self) -> usize {
        self.lines.len()
    }
}

/// Installs `ARG_COUNT`, `ARG_0..ARG_{n-1}`, and the two built-in functions.
pub fn install_globals(ns: &mut Namespace, args: &[String]) {
    ns.set("ARG_COUNT", Value::Int(BigInt::from(args.len())));
    for (index, arg) in args.iter().enumerate() {
        ns.set(format!("ARG_{index}"), Value::Str(arg.as_str().into()));
    }
    ns.set("int_negate", Value::Function(Rc::new(Function::Builtin(Builtin::IntNegate))));
    ns.set("bool_negate", Value::Function(Rc::new(Function::Builtin(Builtin::BoolNegate))));
}
