#[derive(thiserror::Error, Debug)]
pub enum ConnectError {
    #[error("No compatible NetMD device found at index {index} ({found} attached)")]
    NoDeviceFound { index: usize, found: usize },

    #[error("USB error: {0}")]
    UsbError(#[from] rusb::Error),
}

#[derive(thiserror::Error, Debug)]
pub enum CommandError {
    #[error("USB error: {0}")]
    TransportFailure(#[from] rusb::Error),

    #[error("No matching response from the device after {0} polls")]
    PollTimeout(u32),

    #[error("Device did not settle after {0} polls")]
    NoSyncResponse(u32),

    #[error("Command was rejected by the device: {0:02x?}")]
    Rejected(Vec<u8>),

    #[error("Malformed response from the device, expected at least {expected} bytes, received {received}")]
    ProtocolMismatch { expected: usize, received: usize },

    #[error("Unexpected {field} value in response: {value:#04x}")]
    UnknownValue { field: &'static str, value: u8 },

    #[error("Title is too long to send ({0} bytes)")]
    TitleTooLong(usize),
}
