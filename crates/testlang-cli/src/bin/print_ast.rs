use std::env;

fn main() {
    let mut tokens = false;
    let mut path = None;
    for arg in env::args().skip(1) {
        match arg.as_str() {
            "--tokens" => tokens = true,
            _ => path = Some(arg),
        }
    }
    let path = path.unwrap_or_else(|| {
        eprintln!("usage: testlang-print-ast <path.test> [--tokens]");
        std::process::exit(2);
    });
    let src = std::fs::read_to_string(&path).unwrap_or_else(|e| {
        eprintln!("failed to read {}: {}", path, e);
        std::process::exit(1);
    });

    if tokens {
        match testlang_frontend::tokenize(&src) {
            Ok(tokens) => {
                for token in tokens {
                    println!("{}\t{}", token.position, token.kind);
                }
            }
            Err(e) => {
                eprintln!("lex error: {}", e);
                std::process::exit(1);
            }
        }
        return;
    }

    match testlang_frontend::parse_program(&src) {
        Ok(ast) => {
            println!("{:#?}", ast);
        }
        Err(e) => {
            eprintln!("parse error: {}", e);
            std::process::exit(1);
        }
    }
}
