//! CLI tool to inspect how source files tokenize and parse.

use std::fs;
use std::process::ExitCode;

use srcfront::{Error, FileId, format, parse, tokenize_file};

fn main() -> ExitCode {
    let args: Vec<String> = std::env::args().collect();

    if args.len() < 2 || args[1] == "--help" || args[1] == "-h" {
        eprintln!("Usage: srcfront <command> [files...]");
        eprintln!();
        eprintln!("Commands:");
        eprintln!("  tokens  Print the token stream of each file");
        eprintln!("  ast     Print the syntax tree of each file");
        eprintln!("  fmt     Print each file in canonical form");
        eprintln!("  check   Check that each file parses");
        eprintln!();
        eprintln!("Examples:");
        eprintln!("  srcfront check main.src");
        eprintln!("  srcfront fmt main.src");
        return ExitCode::from(2);
    }

    let command = args[1].as_str();
    let files = &args[2..];

    if !matches!(command, "tokens" | "ast" | "fmt" | "check") {
        eprintln!("Unknown command: {command}");
        return ExitCode::from(2);
    }

    if files.is_empty() {
        eprintln!("Error: no files specified");
        return ExitCode::from(2);
    }

    let mut had_error = false;

    for (index, path) in files.iter().enumerate() {
        let content = match fs::read_to_string(path) {
            Ok(c) => c,
            Err(e) => {
                eprintln!("{path}: {e}");
                had_error = true;
                continue;
            }
        };

        let file = FileId(u32::try_from(index).unwrap_or(u32::MAX));
        if let Err(e) = run(command, path, &content, file) {
            let (line, column) = e.location().line_col(&content);
            eprintln!("{path}:{line}:{column}: {e}");
            had_error = true;
        }
    }

    if had_error {
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    }
}

fn run(command: &str, path: &str, content: &str, file: FileId) -> Result<(), Error> {
    let tokens = tokenize_file(content, file)?;

    if command == "tokens" {
        for token in &tokens {
            let (line, column) = token.location.line_col(content);
            println!("{line}:{column}\t{}", token.value);
        }
        return Ok(());
    }

    let nodes = parse(&tokens)?;
    match command {
        "ast" => println!("{nodes:#?}"),
        "fmt" => print!("{}", format(&nodes)),
        _ => eprintln!("{path}: valid ({} top-level item(s))", nodes.len()),
    }
    Ok(())
}
