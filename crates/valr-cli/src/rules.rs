//! # Rules: print compiled rule metadata.
//!
//! Shows what a form runner would receive for a schema document: one entry
//! per compiled group or raw rule, with its declarative fields. Validators
//! are closures and are reported only as present or absent.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Args, ValueEnum};
use serde::Serialize;
use valr_core::{RuleMeta, Trigger};
use valr_schema::{Rule, Valr};

use crate::{load_document, EXIT_OK};

/// Trigger events accepted on the command line.
#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum TriggerArg {
    /// Re-validate when the value changes.
    Change,
    /// Re-validate when the field loses focus.
    Blur,
    /// Re-validate on both events.
    Both,
}

impl From<TriggerArg> for Trigger {
    fn from(arg: TriggerArg) -> Self {
        match arg {
            TriggerArg::Change => Trigger::Change,
            TriggerArg::Blur => Trigger::Blur,
            TriggerArg::Both => Trigger::Both,
        }
    }
}

/// Arguments for `valr rules`.
#[derive(Args, Debug)]
pub struct RulesArgs {
    /// Schema document (YAML, or JSON with a `.json` extension).
    #[arg(long)]
    pub schema: PathBuf,

    /// Emit trigger-style rules tagged with these events.
    #[arg(long, value_enum)]
    pub trigger: Option<TriggerArg>,
}

#[derive(Debug, Serialize)]
struct RuleReport {
    /// `compiled` or `raw`.
    source: &'static str,
    /// Descriptors in a compiled group.
    #[serde(skip_serializing_if = "Option::is_none")]
    size: Option<usize>,
    #[serde(flatten)]
    meta: RuleMeta,
}

fn report(rules: &[Rule], trigger: Option<Trigger>) -> Vec<RuleReport> {
    rules
        .iter()
        .map(|rule| {
            let (source, size) = match rule {
                Rule::Compiled(compiled) => ("compiled", Some(compiled.size())),
                Rule::Raw(_) => ("raw", None),
            };
            let meta = match trigger {
                Some(_) => valr_schema::to_trigger_rule(rule.clone(), trigger).meta(),
                None => valr_schema::to_form_rule(rule.clone()).meta(),
            };
            RuleReport { source, size, meta }
        })
        .collect()
}

/// Execute `valr rules`.
pub fn run_rules(args: &RulesArgs, valr: &Valr) -> Result<u8> {
    let schema = load_document(&args.schema)?
        .build(valr)
        .with_context(|| format!("cannot build schema from {}", args.schema.display()))?;
    let rules = report(&schema.rules(), args.trigger.map(Trigger::from));
    println!("{}", serde_json::to_string_pretty(&rules)?);
    Ok(EXIT_OK)
}
