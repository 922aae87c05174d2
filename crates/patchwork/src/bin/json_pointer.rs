//! `json-pointer`: resolve a JSON Pointer (RFC 6901).
//!
//! Usage:
//!   json-pointer '/a/0'               # print the property/element readings
//!   json-pointer '/a/0' --doc doc.json
//!   json-pointer '/a/0' --stdin < doc.json

use std::fs;
use std::io::{self, Read};
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;
use patchwork::json_cli::{describe_pointer, init_logging, lookup_pointer};

#[derive(Debug, Parser)]
#[command(name = "json-pointer", about = "Resolve a JSON Pointer")]
struct Cli {
    /// The pointer, e.g. `/foo/0`.
    pointer: String,

    /// Look the pointer up in this document.
    #[arg(long, value_name = "PATH", conflicts_with = "stdin")]
    doc: Option<PathBuf>,

    /// Look the pointer up in a document read from stdin.
    #[arg(long)]
    stdin: bool,

    /// Raise logging on stderr to `debug`.
    #[arg(short, long)]
    verbose: bool,
}

fn run(cli: &Cli) -> Result<()> {
    let doc = match (&cli.doc, cli.stdin) {
        (Some(path), _) => Some(
            fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?,
        ),
        (None, true) => {
            let mut buf = String::new();
            io::stdin()
                .read_to_string(&mut buf)
                .context("reading document from stdin")?;
            Some(buf)
        }
        (None, false) => None,
    };
    let out = match doc {
        Some(doc) => lookup_pointer(doc.trim(), &cli.pointer)?,
        None => describe_pointer(&cli.pointer)?,
    };
    println!("{}", serde_json::to_string_pretty(&out)?);
    Ok(())
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);
    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{e:#}");
            ExitCode::FAILURE
        }
    }
}
