//! `json-readonly`: print byte ranges of read-only fields.
//!
//! Usage:
//!   json-readonly [--split] [--no-comma] <path>...
//!
//! The JSON text (comments allowed) is read from stdin unmodified, so the
//! printed offsets index into exactly the bytes that were given.

use json_scope::json_cli::readonly_ranges;
use json_scope::ReadonlyRangeOptions;
use std::io::{self, Read, Write};

fn main() {
    env_logger::init();

    let mut options = ReadonlyRangeOptions::default();
    let mut paths = Vec::new();
    for arg in std::env::args().skip(1) {
        match arg.as_str() {
            "--split" => options.split_key_value = true,
            "--no-comma" => options.include_comma = false,
            _ => paths.push(arg),
        }
    }

    let mut buf = String::new();
    if let Err(e) = io::stdin().read_to_string(&mut buf) {
        eprintln!("{e}");
        std::process::exit(1);
    }

    match readonly_ranges(&buf, &paths, &options) {
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
