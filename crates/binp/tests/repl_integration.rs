//! Interactive-mode coverage: error recovery and ARG_* population, driven
//! through the public `run_interactive` entry point with in-memory I/O.

use std::io::Cursor;

use binp::{run_interactive, CollectStringPrint};

#[test]
fn recovers_from_a_malformed_line_without_exiting() {
    let mut reader = Cursor::new(b"nonsense here\noutput 'still running'\n".to_vec());
    let mut writer = Vec::new();
    let mut printer = CollectStringPrint::new();
    let code = run_interactive(&[], &mut reader, &mut writer, &mut printer);
    assert_eq!(code, 0);
    assert_eq!(printer.into_string(), " >> still running");
}

#[test]
fn arg_globals_are_populated_in_interactive_mode() {
    let mut reader = Cursor::new(b"output ARG_COUNT\noutput ARG_0\noutput ARG_1\n".to_vec());
    let mut writer = Vec::new();
    let mut printer = CollectStringPrint::new();
    let args = vec!["first".to_owned(), "second".to_owned()];
    run_interactive(&args, &mut reader, &mut writer, &mut printer);
    assert_eq!(printer.into_string(), " >> 2\n >> first\n >> second");
}

#[test]
fn accumulates_a_multi_line_function_definition_across_prompts() {
    let source = "\
var int func square = ( int n ) =>
return n * n
end square
output square ( 6 )
";
    let mut reader = Cursor::new(source.as_bytes().to_vec());
    let mut writer = Vec::new();
    let mut printer = CollectStringPrint::new();
    run_interactive(&[], &mut reader, &mut writer, &mut printer);
    assert_eq!(printer.into_string(), " >> 36");
}

#[test]
fn blank_line_ends_the_session_cleanly() {
    let mut reader = Cursor::new(b"\n".to_vec());
    let mut writer = Vec::new();
    let mut printer = CollectStringPrint::new();
    assert_eq!(run_interactive(&[], &mut reader, &mut writer, &mut printer), 0);
}
