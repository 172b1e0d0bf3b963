//! Interactive mode: prompts for one line at a time, accumulating an open
//! `if`/`while`/function block across prompts, and executes each completed
//! top-level statement against a namespace that persists for the session.

use std::io::{self, BufRead, Write};
use std::rc::Rc;

use crate::dispatch;
use crate::io::PrintWriter;
use crate::lexer;
use crate::namespace::Namespace;
use crate::run::install_globals;

const TOP_PROMPT: &str = "> ";
const CONTINUATION_PROMPT: &str = ">> ";

fn opens_block(tokens: &[String]) -> bool {
    matches!(tokens.first().map(String::as_str), Some("if") | Some("while")) || (tokens.len() >= 3 && tokens[0] == "var" && tokens[2] == "func")
}

fn closes_block(tokens: &[String]) -> bool {
    tokens.first().map(String::as_str) == Some("end")
}

/// Runs the interactive loop against `reader`/`writer` for prompts, with
/// program output going through `printer`. Returns the process exit code.
pub fn run_interactive(args: &[String], reader: &mut dyn BufRead, writer: &mut dyn Write, printer: &mut dyn PrintWriter) -> i32 {
    let mut ns = Namespace::new();
    install_globals(&mut ns, args);

    let mut pending: Vec<Vec<String>> = Vec::new();
    let mut depth: i32 = 0;

    loop {
        let _ = write!(writer, "{}", if depth == 0 { TOP_PROMPT } else { CONTINUATION_PROMPT });
        let _ = writer.flush();

        let mut raw = String::new();
        let bytes_read = match reader.read_line(&mut raw) {
            Ok(n) => n,
            Err(_) => return 3,
        };
        if bytes_read == 0 {
            return 0;
        }
        let line = raw.trim_end_matches(['\n', '\r']);

        if depth == 0 && pending.is_empty() && line.trim().is_empty() {
            return 0;
        }

        let tokens = lexer::preformat_line(line);
        if opens_block(&tokens) {
            depth += 1;
        } else if closes_block(&tokens) {
            depth -= 1;
        }
        pending.push(tokens);

        if depth <= 0 {
            let lines = Rc::new(std::mem::take(&mut pending));
            depth = 0;
            match dispatch::run_block(&lines, 0, lines.len(), &mut ns, true, printer) {
                Ok(_) => {}
                Err(err) => {
                    let _ = writeln!(io::stderr(), "{err}");
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::io::CollectStringPrint;

    #[test]
    fn executes_a_single_line_statement() {
        let mut reader = io::Cursor::new(b"output 'hi'\n".to_vec());
        let mut writer = Vec::new();
        let mut printer = CollectStringPrint::new();
        let code = run_interactive(&[], &mut reader, &mut writer, &mut printer);
        assert_eq!(code, 0);
        assert_eq!(printer.into_string(), " >> hi");
    }

    #[test]
    fn recovers_after_a_malformed_line() {
        let mut reader = io::Cursor::new(b"this is nonsense\noutput 'still alive'\n".to_vec());
        let mut writer = Vec::new();
        let mut printer = CollectStringPrint::new();
        let code = run_interactive(&[], &mut reader, &mut writer, &mut printer);
        assert_eq!(code, 0);
        assert_eq!(printer.into_string(), " >> still alive");
    }

    #[test]
    fn executes_a_multi_line_block_once_complete() {
        let source = b"if ( 1 == 1 ) =>\noutput 'yes'\nend\n".to_vec();
        let mut reader = io::Cursor::new(source);
        let mut writer = Vec::new();
        let mut printer = CollectStringPrint::new();
        run_interactive(&[], &mut reader, &mut writer, &mut printer);
        assert_eq!(printer.into_string(), " >> yes");
    }

    #[test]
    fn blank_line_at_top_level_ends_session() {
        let mut reader = io::Cursor::new(b"\n".to_vec());
        let mut writer = Vec::new();
        let mut printer = CollectStringPrint::new();
        assert_eq!(run_interactive(&[], &mut reader, &mut writer, &mut printer), 0);
    }
}
