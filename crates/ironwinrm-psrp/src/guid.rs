//! GUID wire conversion: the first three groups are little-endian, the last two are
//! written as given.
use uuid::Uuid;

use crate::PowerShellRemotingError;

pub fn parse(value: &str) -> Result<Uuid, PowerShellRemotingError> {
    Uuid::parse_str(value.trim()).map_err(|e| PowerShellRemotingError::InvalidUuid {
        value: value.to_owned(),
        reason: e.to_string(),
    })
}

pub fn uuid_to_bytes(id: &Uuid) -> [u8; 16] {
    id.to_bytes_le()
}

/// Reassembles the canonical upper-case string from wire bytes.
pub fn bytes_to_uuid_string(bytes: &[u8; 16]) -> String {
    format!("{:X}", Uuid::from_bytes_le(*bytes).hyphenated())
}
