//! Parse-or-default for numeric settings.
//!
//! Every numeric field goes through [`parse_or_default`]: a value that does not
//! parse, or parses but fails the field's check, is replaced by the field
//! default. Nothing is surfaced to the caller beyond a `warn` log line.

use std::str::FromStr;
use tracing::warn;

pub const DEFAULT_RPC_PORT: u16 = 8332;
pub const DEFAULT_GUI_PORT: u16 = 8080;

pub fn parse_or_default<T, F>(field: &str, raw: &str, default: T, accept: F) -> T
where
    T: FromStr,
    F: Fn(&T) -> bool,
{
    match raw.trim().parse::<T>() {
        Ok(value) if accept(&value) => value,
        _ => {
            warn!(field, value = raw, "invalid value, falling back to default");
            default
        }
    }
}

/// Ports must satisfy `1 < port < 65535`.
pub fn port_or_default(field: &str, raw: &str, default: u16) -> u16 {
    parse_or_default(field, raw, default, |port: &u16| *port > 1 && *port < u16::MAX)
}
