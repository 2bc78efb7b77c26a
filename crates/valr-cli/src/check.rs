//! # Check: validate inputs against a schema document.
//!
//! Each `--input` is parsed as JSON; text that is not valid JSON is taken
//! as a plain string, so `--input abc` and `--input '"abc"'` are the same.
//! Without `--input`, one input is read per line of standard input.
//!
//! Prints `ok` or the failure message per input, in order.

use std::io::{BufRead, Write};
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use serde_json::Value;
use valr_schema::Valr;

use crate::{load_document, EXIT_INVALID, EXIT_OK};

/// Arguments for `valr check`.
#[derive(Args, Debug)]
pub struct CheckArgs {
    /// Schema document (YAML, or JSON with a `.json` extension).
    #[arg(long)]
    pub schema: PathBuf,

    /// Input to validate. Repeat for several inputs.
    #[arg(long = "input", value_name = "JSON")]
    pub inputs: Vec<String>,

    /// Print one JSON outcome object per input instead of plain text.
    #[arg(long)]
    pub json: bool,
}

/// Parse a command-line input.
pub fn parse_input(raw: &str) -> Value {
    serde_json::from_str(raw).unwrap_or_else(|_| Value::String(raw.to_string()))
}

/// Execute `valr check`.
pub fn run_check(args: &CheckArgs, valr: &Valr) -> Result<u8> {
    let schema = load_document(&args.schema)?
        .build(valr)
        .with_context(|| format!("cannot build schema from {}", args.schema.display()))?;

    let inputs: Vec<String> = if args.inputs.is_empty() {
        std::io::stdin()
            .lock()
            .lines()
            .collect::<std::io::Result<_>>()
            .context("failed to read inputs from stdin")?
    } else {
        args.inputs.clone()
    };

    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    let mut failed = 0usize;
    for raw in &inputs {
        let input = parse_input(raw);
        let message = schema.check(&input);
        tracing::debug!(input = %input, passed = message.is_none(), "checked input");
        if message.is_some() {
            failed += 1;
        }
        if args.json {
            let outcome = serde_json::json!({
                "input": input,
                "error": message.is_some(),
                "message": message,
            });
            writeln!(out, "{outcome}")?;
        } else {
            writeln!(out, "{}", message.as_deref().unwrap_or("ok"))?;
        }
    }

    tracing::info!(inputs = inputs.len(), failed, "check finished");
    Ok(if failed == 0 { EXIT_OK } else { EXIT_INVALID })
}
