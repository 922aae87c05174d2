//! `json-patch`: apply a JSON Patch (RFC 6902) to a document.
//!
//! Usage:
//!   json-patch '<patch-array-json>' < doc.json
//!   json-patch --patch-file patch.json --doc doc.json --pretty
//!
//! The document is read from stdin unless `--doc` is given.

use std::fs;
use std::io::{self, Read};
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{bail, Context, Result};
use clap::Parser;
use patchwork::json_cli::{apply_json_patch, init_logging};
use patchwork::json_patch::ApplyPatchOptions;

#[derive(Debug, Parser)]
#[command(name = "json-patch", about = "Apply a JSON Patch to a JSON document")]
struct Cli {
    /// Patch as a JSON array string.
    patch: Option<String>,

    /// Read the patch from a file instead.
    #[arg(long, value_name = "PATH", conflicts_with = "patch")]
    patch_file: Option<PathBuf>,

    /// Document file. Defaults to stdin.
    #[arg(long, value_name = "PATH")]
    doc: Option<PathBuf>,

    /// Reject patches with more instructions than this.
    #[arg(long, value_name = "N")]
    max_operations: Option<usize>,

    /// Pretty-print the result.
    #[arg(long)]
    pretty: bool,

    /// Log each applied instruction to stderr.
    #[arg(short, long)]
    verbose: bool,
}

fn read_input(path: Option<&PathBuf>) -> Result<String> {
    match path {
        Some(path) => {
            fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))
        }
        None => {
            let mut buf = String::new();
            io::stdin()
                .read_to_string(&mut buf)
                .context("reading document from stdin")?;
            Ok(buf)
        }
    }
}

fn run(cli: Cli) -> Result<()> {
    let patch = match (cli.patch, &cli.patch_file) {
        (Some(patch), _) => patch,
        (None, Some(path)) => {
            fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?
        }
        (None, None) => bail!("a patch argument or --patch-file is required"),
    };
    let doc = read_input(cli.doc.as_ref())?;
    let options = ApplyPatchOptions {
        max_operations: cli.max_operations,
        ..ApplyPatchOptions::default()
    };
    let result = apply_json_patch(doc.trim(), &patch, &options)?;
    let out = if cli.pretty {
        serde_json::to_string_pretty(&result)?
    } else {
        serde_json::to_string(&result)?
    };
    println!("{out}");
    Ok(())
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);
    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{e:#}");
            ExitCode::FAILURE
        }
    }
}
