//! # valr CLI entry point
//!
//! Parses command-line arguments and dispatches to subcommand handlers.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use valr_cli::check::{run_check, CheckArgs};
use valr_cli::messages::{run_messages, MessagesArgs};
use valr_cli::rules::{run_rules, RulesArgs};
use valr_cli::{build_valr, EXIT_USAGE};

/// valr: declarative value validation.
///
/// Builds schemas from YAML/JSON documents, validates inputs against them,
/// and shows the rules a form runner would receive.
#[derive(Parser, Debug)]
#[command(name = "valr", version, about, long_about = None)]
struct Cli {
    /// Enable verbose output. Repeat for more verbosity (-v, -vv, -vvv).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Message file (YAML or JSON) merged over the built-in table.
    #[arg(long, global = true, env = "VALR_MESSAGES")]
    messages: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Validate inputs against a schema document.
    Check(CheckArgs),

    /// Print the compiled rules of a schema document as JSON.
    Rules(RulesArgs),

    /// Print the effective message table.
    Messages(MessagesArgs),
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let filter = match cli.verbose {
        0 => EnvFilter::new("warn"),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    tracing::debug!("valr CLI starting");

    let result = build_valr(cli.messages.as_deref()).and_then(|valr| match &cli.command {
        Commands::Check(args) => run_check(args, &valr),
        Commands::Rules(args) => run_rules(args, &valr),
        Commands::Messages(args) => run_messages(args, &valr),
    });

    match result {
        Ok(code) => ExitCode::from(code),
        Err(e) => {
            tracing::error!("{e:#}");
            eprintln!("error: {e:#}");
            ExitCode::from(EXIT_USAGE)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use valr_cli::rules::TriggerArg;

    #[test]
    fn cli_parse_check_with_inputs() {
        let cli = Cli::try_parse_from([
            "valr", "check", "--schema", "name.yaml", "--input", "ab", "--input", "\"abc\"",
        ])
        .unwrap();
        if let Commands::Check(args) = cli.command {
            assert_eq!(args.schema, PathBuf::from("name.yaml"));
            assert_eq!(args.inputs, vec!["ab".to_string(), "\"abc\"".to_string()]);
            assert!(!args.json);
        } else {
            panic!("expected check");
        }
    }

    #[test]
    fn cli_parse_check_requires_schema() {
        assert!(Cli::try_parse_from(["valr", "check", "--input", "x"]).is_err());
    }

    #[test]
    fn cli_parse_rules_trigger() {
        let cli = Cli::try_parse_from(["valr", "rules", "--schema", "s.json", "--trigger", "both"])
            .unwrap();
        if let Commands::Rules(args) = cli.command {
            assert_eq!(args.trigger, Some(TriggerArg::Both));
        } else {
            panic!("expected rules");
        }
    }

    #[test]
    fn cli_parse_rules_rejects_unknown_trigger() {
        assert!(
            Cli::try_parse_from(["valr", "rules", "--schema", "s.json", "--trigger", "focus"])
                .is_err()
        );
    }

    #[test]
    fn cli_parse_global_flags_after_subcommand() {
        let cli = Cli::try_parse_from([
            "valr",
            "messages",
            "--flat",
            "-vv",
            "--messages",
            "en.yaml",
        ])
        .unwrap();
        assert_eq!(cli.verbose, 2);
        assert_eq!(cli.messages, Some(PathBuf::from("en.yaml")));
        assert!(matches!(cli.command, Commands::Messages(MessagesArgs { flat: true })));
    }

    #[test]
    fn cli_parse_requires_subcommand() {
        assert!(Cli::try_parse_from(["valr"]).is_err());
    }
}
