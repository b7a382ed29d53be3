use crate::PowerShellRemotingError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Destination {
    Client = 0x0000_0001,
    Server = 0x0000_0002,
}

impl TryFrom<u32> for Destination {
    type Error = PowerShellRemotingError;

    fn try_from(value: u32) -> Result<Self, Self::Error> {
        match value {
            0x0000_0001 => Ok(Self::Client),
            0x0000_0002 => Ok(Self::Server),
            _ => Err(PowerShellRemotingError::InvalidMessage(format!(
                "Unknown Destination value: 0x{value:08x}"
            ))),
        }
    }
}

macro_rules! message_types {
    ($($variant:ident = $value:literal),* $(,)?) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq)]
        pub enum MessageType {
            $($variant,)*
        }

        impl MessageType {
            pub const fn value(self) -> u32 {
                match self {
                    $(Self::$variant => $value,)*
                }
            }
        }

        impl TryFrom<u32> for MessageType {
            type Error = PowerShellRemotingError;

            fn try_from(value: u32) -> Result<Self, Self::Error> {
                match value {
                    $($value => Ok(Self::$variant),)*
                    _ => Err(PowerShellRemotingError::InvalidMessageType(format!(
                        "0x{value:08x}"
                    ))),
                }
            }
        }
    };
}

message_types!(
    SessionCapability = 0x0001_0002,
    InitRunspacepool = 0x0001_0004,
    PublicKey = 0x0001_0005,
    EncryptedSessionKey = 0x0001_0006,
    PublicKeyRequest = 0x0001_0007,
    ConnectRunspacepool = 0x0001_0008,
    SetMaxRunspaces = 0x0002_1002,
    SetMinRunspaces = 0x0002_1003,
    RunspaceAvailability = 0x0002_1004,
    RunspacepoolState = 0x0002_1005,
    CreatePipeline = 0x0002_1006,
    GetAvailableRunspaces = 0x0002_1007,
    UserEvent = 0x0002_1008,
    ApplicationPrivateData = 0x0002_1009,
    GetCommandMetadata = 0x0002_100A,
    RunspacepoolInitData = 0x0002_100B,
    ResetRunspaceState = 0x0002_100C,
    RunspacepoolHostCall = 0x0002_1100,
    RunspacepoolHostResponse = 0x0002_1101,
    PipelineInput = 0x0004_1002,
    EndOfPipelineInput = 0x0004_1003,
    PipelineOutput = 0x0004_1004,
    ErrorRecord = 0x0004_1005,
    PipelineState = 0x0004_1006,
    DebugRecord = 0x0004_1007,
    VerboseRecord = 0x0004_1008,
    WarningRecord = 0x0004_1009,
    ProgressRecord = 0x0004_1010,
    InformationRecord = 0x0004_1011,
    PipelineHostCall = 0x0004_1100,
    PipelineHostResponse = 0x0004_1101,
);

impl MessageType {
    /// Parses a hexadecimal code such as `00021006` or `0x00021006`.
    pub fn from_hex(hex: &str) -> Result<Self, PowerShellRemotingError> {
        let digits = hex
            .trim()
            .trim_start_matches("0x")
            .trim_start_matches("0X");
        let value = u32::from_str_radix(digits, 16)
            .map_err(|_| PowerShellRemotingError::InvalidMessageType(hex.to_owned()))?;
        Self::try_from(value)
    }
}
