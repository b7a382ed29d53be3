use byteorder::{LittleEndian, WriteBytesExt};
use uuid::Uuid;

use crate::guid::uuid_to_bytes;
use crate::{Destination, MessageType, PowerShellRemotingError};

pub const UTF8_BOM: [u8; 3] = [0xEF, 0xBB, 0xBF];

/// <https://learn.microsoft.com/en-us/openspecs/windows_protocols/ms-psrp/497ac440-89fb-4cb3-9cc1-3434c1aa74c3>
#[derive(Debug, Clone, typed_builder::TypedBuilder)]
pub struct PowerShellRemotingMessage {
    #[builder(default = Destination::Server)]
    pub destination: Destination,
    pub message_type: MessageType,
    pub shell_id: Uuid,
    pub command_id: Uuid,
    /// UTF-8 payload, written after the byte-order mark.
    pub data: Vec<u8>,
}

impl PowerShellRemotingMessage {
    pub fn pack(&self) -> Result<Vec<u8>, PowerShellRemotingError> {
        let mut buffer = Vec::with_capacity(43 + self.data.len());
        buffer.write_u32::<LittleEndian>(self.destination as u32)?;
        buffer.write_u32::<LittleEndian>(self.message_type.value())?;
        buffer.extend_from_slice(&uuid_to_bytes(&self.shell_id));
        buffer.extend_from_slice(&uuid_to_bytes(&self.command_id));
        buffer.extend_from_slice(&UTF8_BOM);
        buffer.extend_from_slice(&self.data);
        Ok(buffer)
    }
}
