//! Output abstraction so `output` and the REPL never call `println!` directly.

/// Somewhere BinP's `output` statement (and the interactive prompt) can write
/// a line of text.
pub trait PrintWriter {
    fn print_line(&mut self, text: &str);
}

/// Writes to real standard output. Used by the CLI driver and REPL.
#[derive(Debug, Default)]
pub struct StdPrint;

impl PrintWriter for StdPrint {
    fn print_line(&mut self, text: &str) {
        println!("{text}");
    }
}

/// Collects every line into an in-memory buffer, newline-joined. Used by
/// integration tests to assert on exact captured output.
#[derive(Debug, Default)]
pub struct CollectStringPrint {
    lines: Vec<String>,
}

impl CollectStringPrint {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn into_string(self) -> String {
        self.lines.join("\n")
    }

    #[must_use]
    pub fn lines(&self) -> &[String] {
        &self.lines
    }
}

impl PrintWriter for CollectStringPrint {
    fn print_line(&mut self, text: &str) {
        self.lines.push(text.to_owned());
    }
}

/// Discards everything written to it. Used where a `PrintWriter` is required
/// structurally (e.g. evaluating a builtin's arguments) but output is
/// immaterial to the caller.
#[derive(Debug, Default)]
pub struct NoPrint;

impl PrintWriter for NoPrint {
    fn print_line(&mut self, _text: &str) {}
}
