//! Record fields from command-line arguments
//!
//! `key=value` sets a string field. `key:=json` sets a field to a raw JSON
//! value, so `featured:=true`, `year:=2024` and `tags:='["a","b"]'` keep
//! their JSON types.

use anyhow::{bail, Context, Result};
use folio_core::patch::parse_fields;
use folio_core::Fields;
use serde_json::Value;

use crate::cli::FieldArgs;

/// Build a field object from `--data` and FIELD arguments
///
/// FIELD arguments are applied after `--data` and win on conflicts.
pub fn collect(args: &FieldArgs) -> Result<Fields> {
    let mut fields = match &args.data {
        Some(text) => parse_fields(text).context("--data must be a JSON object")?,
        None => Fields::new(),
    };

    for assignment in &args.fields {
        let (key, value) = parse_assignment(assignment)?;
        fields.insert(key, value);
    }

    Ok(fields)
}

/// Parse one `key=value` or `key:=json` argument
pub fn parse_assignment(arg: &str) -> Result<(String, Value)> {
    let Some(eq) = arg.find('=') else {
        bail!("Invalid field '{}': expected key=value or key:=json", arg);
    };

    let (key, raw) = if arg[..eq].ends_with(':') {
        (&arg[..eq - 1], true)
    } else {
        (&arg[..eq], false)
    };
    let text = &arg[eq + 1..];

    let key = key.trim();
    if key.is_empty() {
        bail!("Invalid field '{}': empty key", arg);
    }

    let value = if raw {
        serde_json::from_str(text)
            .with_context(|| format!("Invalid JSON for field '{}': {}", key, text))?
    } else {
        Value::String(text.to_string())
    };

    Ok((key.to_string(), value))
}
