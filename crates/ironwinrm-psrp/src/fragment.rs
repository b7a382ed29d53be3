use byteorder::{BigEndian, WriteBytesExt};

use crate::PowerShellRemotingError;

pub const FRAGMENT_HEADER_LEN: usize = 21;

const START_FLAG: u8 = 0x01;
const END_FLAG: u8 = 0x02;

/// One fragment of a PowerShell remoting message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Fragment {
    pub object_id: u64,
    pub fragment_id: u64,
    pub start: bool,
    pub end: bool,
    pub data: Vec<u8>,
}

impl Fragment {
    /// A message carried whole: fragment id 0, both start and end set.
    pub fn single(object_id: u64, data: Vec<u8>) -> Self {
        Self {
            object_id,
            fragment_id: 0,
            start: true,
            end: true,
            data,
        }
    }

    pub fn flags(&self) -> u8 {
        let mut flags = 0u8;
        if self.start {
            flags |= START_FLAG;
        }
        if self.end {
            flags |= END_FLAG;
        }
        flags
    }

    /// Wire layout: object id and fragment id as u64 BE, flags, u32 BE length, blob.
    pub fn pack(&self) -> Result<Vec<u8>, PowerShellRemotingError> {
        let length = u32::try_from(self.data.len()).map_err(|_| {
            PowerShellRemotingError::InvalidMessage(format!(
                "fragment blob of {} bytes exceeds u32 length",
                self.data.len()
            ))
        })?;

        let mut buffer = Vec::with_capacity(FRAGMENT_HEADER_LEN + self.data.len());
        buffer.write_u64::<BigEndian>(self.object_id)?;
        buffer.write_u64::<BigEndian>(self.fragment_id)?;
        buffer.write_u8(self.flags())?;
        buffer.write_u32::<BigEndian>(length)?;
        buffer.extend_from_slice(&self.data);
        Ok(buffer)
    }
}
