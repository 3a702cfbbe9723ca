//! `json-pick`: keep only the given fields of a document.
//!
//! Usage:
//!   json-pick [--exclude] <path>...
//!
//! The document is read from stdin. With `--exclude` the given fields are
//! dropped instead.

use json_scope::json_cli::pick;
use std::io::{self, Read, Write};

fn main() {
    env_logger::init();

    let mut exclude = false;
    let mut paths = Vec::new();
    for arg in std::env::args().skip(1) {
        match arg.as_str() {
            "--exclude" | "-x" => exclude = true,
            _ => paths.push(arg),
        }
    }

    let mut buf = String::new();
    if let Err(e) = io::stdin().read_to_string(&mut buf) {
        eprintln!("{e}");
        std::process::exit(1);
    }

    match pick(buf.trim(), &paths, exclude) {
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
