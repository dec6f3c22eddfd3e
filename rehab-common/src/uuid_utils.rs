//! UUID utilities
//!
//! Entity ids are UUIDv4 stored as hyphenated TEXT.

use uuid::Uuid;

use crate::{Error, Result};

/// Generate a new UUIDv4
pub fn generate() -> Uuid {
    Uuid::new_v4()
}

/// Parse a UUID read back from a TEXT column
pub fn parse_stored(column: &str, s: &str) -> Result<Uuid> {
    Uuid::parse_str(s).map_err(|e| Error::corrupt(column, s, e))
}
