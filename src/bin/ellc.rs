use std::io::{Read, Write};

use ell::{compiler::Normalizer, options::Options, reader::read, runtime::Runtime};
use termcolor::StandardStream;

fn main() {
    env_logger::init();

    let opts = match Options::parse() {
        Ok(opts) => opts,
        Err(err) => {
            eprintln!("Error: {}", err);
            std::process::exit(1);
        }
    };

    let source = match &opts.filename {
        Some(file) => std::fs::read_to_string(file),
        None => {
            let mut buf = String::new();
            std::io::stdin().read_to_string(&mut buf).map(|_| buf)
        }
    };

    let source = match source {
        Ok(source) => source,
        Err(err) => {
            eprintln!("Error: {}", err);
            std::process::exit(1);
        }
    };

    let rt = match Runtime::boot() {
        Ok(rt) => rt,
        Err(err) => {
            eprintln!("Error: {}", err);
            std::process::exit(1);
        }
    };

    let root = match read(&rt, &source) {
        Ok(root) => root,
        Err(err) => {
            eprintln!("Error: {}", err);
            std::process::exit(1);
        }
    };

    let mut out = StandardStream::stdout(opts.color.choice());

    if opts.print_syntax {
        match rt.print(&root.clone().into()) {
            Ok(text) => {
                if let Err(err) = writeln!(out, ";; {}", text) {
                    eprintln!("Error: {}", err);
                    std::process::exit(1);
                }
            }
            Err(err) => {
                eprintln!("Error: {}", err);
                std::process::exit(1);
            }
        }
    }

    let norm = match Normalizer::new(&rt) {
        Ok(norm) => norm,
        Err(err) => {
            eprintln!("Error: {}", err);
            std::process::exit(1);
        }
    };

    let mut failed = false;
    for (index, result) in norm.normalize_each(&root).into_iter().enumerate() {
        match result {
            Ok(ast) => {
                if let Err(err) = ast.emit(opts.width, &mut out) {
                    eprintln!("Error: {}", err);
                    std::process::exit(1);
                }
            }
            Err(err) => {
                eprintln!("Error in form {}: {}", index + 1, err);
                failed = true;
            }
        }
    }

    if failed {
        std::process::exit(1);
    }
}
