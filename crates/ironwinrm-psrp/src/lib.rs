pub mod cores;
pub mod fragment;
pub mod message;
pub mod guid;

pub use cores::*;
pub use fragment::*;
pub use message::*;

use base64::Engine;
use tracing::debug;

#[derive(Debug, thiserror::Error)]
pub enum PowerShellRemotingError {
    #[error("Invalid PowerShell remoting message: {0}")]
    InvalidMessage(String),

    #[error("Invalid UUID {value:?}: {reason}")]
    InvalidUuid { value: String, reason: String },

    #[error("Invalid message type {0:?}")]
    InvalidMessageType(String),

    #[error("IO Error: {0}")]
    IoError(String),
}

impl From<std::io::Error> for PowerShellRemotingError {
    fn from(err: std::io::Error) -> Self {
        Self::IoError(err.to_string())
    }
}

/// Encodes `payload` as one complete client-to-server fragment addressed to the given
/// shell and command.
pub fn encode(
    shell_id: &str,
    command_id: &str,
    message_type_hex: &str,
    payload: &str,
) -> Result<Vec<u8>, PowerShellRemotingError> {
    let message = PowerShellRemotingMessage::builder()
        .message_type(MessageType::from_hex(message_type_hex)?)
        .shell_id(guid::parse(shell_id)?)
        .command_id(guid::parse(command_id)?)
        .data(payload.as_bytes().to_vec())
        .build();

    let object_id = u64::from(rand::random::<u8>());
    let fragment = Fragment::single(object_id, message.pack()?);
    debug!(
        object_id,
        message_type = ?message.message_type,
        length = fragment.data.len(),
        "encoded psrp fragment"
    );
    fragment.pack()
}

/// [`encode`], base64 encoded for a Command body's Arguments.
pub fn encode_base64(
    shell_id: &str,
    command_id: &str,
    message_type_hex: &str,
    payload: &str,
) -> Result<String, PowerShellRemotingError> {
    let bytes = encode(shell_id, command_id, message_type_hex, payload)?;
    Ok(base64::engine::general_purpose::STANDARD.encode(bytes))
}
