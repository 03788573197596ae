use std::time::Duration;

/// Timing used by the transport when talking to a recorder.
///
/// The defaults match what recorders have been observed to need: ten polls, 100ms apart, per
/// command, and a one second limit on any single control transfer.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct TransportConfig {
    /// Number of polls made for a response (or for the device to settle) before giving up.
    pub retries: u32,

    /// Pause between unanswered polls.
    pub backoff: Duration,

    /// Timeout handed to each individual control transfer.
    pub usb_timeout: Duration,

    /// Dump every frame sent and received to the debug log.
    pub debug: bool,
}

impl Default for TransportConfig {
    fn default() -> Self {
        Self {
            retries: 10,
            backoff: Duration::from_millis(100),
            usb_timeout: Duration::from_secs(1),
            debug: false,
        }
    }
}

impl TransportConfig {
    pub fn with_debug(debug: bool) -> Self {
        Self {
            debug,
            ..Default::default()
        }
    }
}
