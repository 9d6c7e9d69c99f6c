//! Thin wrapper around the OS keyring for the Notion token.

use tracing::debug;

use crate::error::{NotionError, Result};

const SERVICE: &str = "timelog";
const NOTION_TOKEN_KEY: &str = "notion_token";

/// Environment variable that overrides the stored token.
pub const NOTION_TOKEN_ENV: &str = "NOTION_TOKEN";

pub fn get(key: &str) -> Result<Option<String>> {
    let entry = keyring::Entry::new(SERVICE, key)?;
    match entry.get_password() {
        Ok(pw) => Ok(Some(pw)),
        Err(keyring::Error::NoEntry) => Ok(None),
        Err(e) => Err(e.into()),
    }
}

pub fn set(key: &str, value: &str) -> Result<()> {
    let entry = keyring::Entry::new(SERVICE, key)?;
    entry.set_password(value)?;
    Ok(())
}

pub fn delete(key: &str) -> Result<()> {
    let entry = keyring::Entry::new(SERVICE, key)?;
    match entry.delete_credential() {
        Ok(()) => Ok(()),
        Err(keyring::Error::NoEntry) => Ok(()),
        Err(e) => Err(e.into()),
    }
}

/// Token from `NOTION_TOKEN`, falling back to the keyring.
pub fn notion_token() -> Result<String> {
    if let Some(token) = std::env::var(NOTION_TOKEN_ENV).ok().filter(|t| !t.is_empty()) {
        debug!("using Notion token from environment");
        return Ok(token);
    }
    get(NOTION_TOKEN_KEY)?
        .filter(|t| !t.is_empty())
        .ok_or_else(|| NotionError::MissingToken.into())
}

pub fn set_notion_token(token: &str) -> Result<()> {
    set(NOTION_TOKEN_KEY, token)
}

pub fn delete_notion_token() -> Result<()> {
    delete(NOTION_TOKEN_KEY)
}

/// Whether a token is available without printing it.
pub fn has_notion_token() -> bool {
    notion_token().is_ok()
}
