//! Expression rewrite command.

use std::collections::BTreeMap;

use anyhow::{Context, Result};
use serde::Serialize;
use tablewright::ExpressionNames;

#[derive(Serialize)]
struct Rewritten {
    key_condition: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    filter: Option<String>,
    names: BTreeMap<String, String>,
}

pub fn run(key_condition: &str, filter: Option<&str>) -> Result<()> {
    let mut names = ExpressionNames::new();
    let key_condition = names
        .rewrite(key_condition)
        .context("Invalid key condition")?;
    let filter = filter
        .map(|f| names.rewrite(f))
        .transpose()
        .context("Invalid filter")?;

    let rewritten = Rewritten {
        key_condition,
        filter,
        names: names.into_map(),
    };
    println!("{}", serde_json::to_string_pretty(&rewritten)?);
    Ok(())
}
