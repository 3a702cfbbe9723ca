//! `json-diff`: compare two documents.
//!
//! Usage:
//!   json-diff <paths|values|changed|object> '<other-json>'
//!
//! Document A is read from stdin, document B is the second argument.

use json_scope::json_cli::diff;
use std::io::{self, Read, Write};

fn main() {
    env_logger::init();

    let args: Vec<String> = std::env::args().collect();
    let (mode, other) = match (args.get(1), args.get(2)) {
        (Some(mode), Some(other)) => (mode.clone(), other.clone()),
        _ => {
            eprintln!("Usage: json-diff <paths|values|changed|object> '<other-json>'");
            std::process::exit(1);
        }
    };

    let mut buf = String::new();
    if let Err(e) = io::stdin().read_to_string(&mut buf) {
        eprintln!("{e}");
        std::process::exit(1);
    }

    match diff(buf.trim(), &other, &mode) {
        Ok(result) => {
            if let Err(e) = writeln!(io::stdout(), "{result}") {
                eprintln!("{e}");
                std::process::exit(1);
            }
        }
        Err(e) => {
            eprintln!("{e}");
            std::process::exit(1);
        }
    }
}
