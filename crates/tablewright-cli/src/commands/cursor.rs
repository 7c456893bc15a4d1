//! Continuation token commands.

use anyhow::{Context, Result};
use tablewright::{Item, decode_cursor, encode_cursor};

pub fn encode(key: &str) -> Result<()> {
    let key: Item = serde_json::from_str(key).context("Key attributes must be store JSON")?;
    let token = encode_cursor(&key).context("Failed to encode cursor")?;
    println!("{token}");
    Ok(())
}

pub fn decode(token: &str) -> Result<()> {
    let key = decode_cursor(token).context("Failed to decode cursor")?;
    println!("{}", serde_json::to_string_pretty(&key)?);
    Ok(())
}
