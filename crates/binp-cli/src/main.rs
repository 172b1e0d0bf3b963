use std::env;
use std::fs;
use std::io;
use std::process::ExitCode;

use binp::{Program, StdPrint};

fn main() -> ExitCode {
    let args: Vec<String> = env::args().collect();

    let Some(file_path) = args.get(1) else {
        let stdin = io::stdin();
        let mut reader = stdin.lock();
        let mut stdout = io::stdout();
        let code = binp::run_interactive(&[], &mut reader, &mut stdout, &mut StdPrint);
        return exit_code(code);
    };

    if !has_binp_extension(file_path) {
        eprintln!("error: source file must have a '.binp' extension, got '{file_path}'");
        return ExitCode::from(1);
    }

    let source = match read_file(file_path) {
        Ok(source) => source,
        Err(err) => {
            eprintln!("error: {err}");
            return ExitCode::from(1);
        }
    };

    let program_args = args[2..].to_vec();
    let program = Program::parse(&source);
    match program.run(&program_args, &mut StdPrint) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("{err}");
            ExitCode::from(3)
        }
    }
}

fn has_binp_extension(file_path: &str) -> bool {
    file_path.ends_with(".binp")
}

fn read_file(file_path: &str) -> Result<String, String> {
    match fs::metadata(file_path) {
        Ok(metadata) if metadata.is_file() => {}
        Ok(_) => return Err(format!("{file_path} is not a file")),
        Err(err) => return Err(format!("could not read {file_path}: {err}")),
    }
    fs::read_to_string(file_path).map_err(|err| format!("could not read {file_path}: {err}"))
}

fn exit_code(code: i32) -> ExitCode {
    u8::try_from(code).map(ExitCode::from).unwrap_or(ExitCode::FAILURE)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_a_missing_binp_extension() {
        assert!(!has_binp_extension("notes.txt"));
        assert!(has_binp_extension("program.binp"));
    }

    #[test]
    fn reading_a_missing_file_is_an_error() {
        assert!(read_file("/no/such/path.binp").is_err());
    }
}
