//! # Messages: print the effective message table.

use anyhow::Result;
use clap::Args;
use valr_schema::Valr;

use crate::EXIT_OK;

/// Arguments for `valr messages`.
#[derive(Args, Debug)]
pub struct MessagesArgs {
    /// Print `key = template` lines instead of nested JSON.
    #[arg(long)]
    pub flat: bool,
}

/// Render the table as requested.
pub fn render(args: &MessagesArgs, valr: &Valr) -> Result<String> {
    let table = valr.messages().snapshot();
    if args.flat {
        Ok(table
            .flatten()
            .iter()
            .map(|(key, template)| format!("{key} = {template}"))
            .collect::<Vec<_>>()
            .join("\n"))
    } else {
        Ok(serde_json::to_string_pretty(&table.to_value())?)
    }
}

/// Execute `valr messages`.
pub fn run_messages(args: &MessagesArgs, valr: &Valr) -> Result<u8> {
    println!("{}", render(args, valr)?);
    Ok(EXIT_OK)
}
