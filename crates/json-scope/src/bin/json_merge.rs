//! `json-merge`: merge selected fields of a patch into a document.
//!
//! Usage:
//!   json-merge [--exclude] '<patch-json>' <path>...
//!
//! The document is read from stdin, the patch is the first positional
//! argument. Conflicting changes outside the selection are reported with
//! `RUST_LOG=warn`.

use json_scope::json_cli::merge;
use std::io::{self, Read, Write};

fn main() {
    env_logger::init();

    let mut exclude = false;
    let mut positional = Vec::new();
    for arg in std::env::args().skip(1) {
        match arg.as_str() {
            "--exclude" | "-x" => exclude = true,
            _ => positional.push(arg),
        }
    }
    if positional.is_empty() {
        eprintln!("First argument must be the patch document.");
        std::process::exit(1);
    }
    let patch = positional.remove(0);

    let mut buf = String::new();
    if let Err(e) = io::stdin().read_to_string(&mut buf) {
        eprintln!("{e}");
        std::process::exit(1);
    }

    match merge(buf.trim(), &patch, &positional, exclude) {
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
