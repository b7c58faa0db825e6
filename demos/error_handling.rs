//! Demonstrate error handling for invalid source.

fn report(input: &str) {
    match srcfront::parse_str(input) {
        Ok(_) => println!("Parsed OK (unexpected)"),
        Err(srcfront::Error::Lex(e)) => {
            let (line, column) = e.location.line_col(input);
            println!("Lex error: {e}");
            println!("  Kind: {:?}", e.kind);
            println!("  Location: line {line}, column {column}");
        }
        Err(srcfront::Error::Parse(e)) => {
            let (line, column) = e.location.line_col(input);
            println!("Parse error: {e}");
            println!("  Kind: {:?}", e.kind);
            println!("  Location: line {line}, column {column}");
        }
    }
}

fn main() {
    // Unterminated text literal
    report("var greeting = \"hello;\n");

    println!();

    // Unclosed block
    report("while (x) {\n    x--;\n");

    println!();

    // Assignment to something that is not a variable
    report("var a = 1;\n(a + 1) = 2;\n");
}
