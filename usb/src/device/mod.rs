use crate::config::TransportConfig;
use crate::device::base::{FullNetMDDevice, NetMDDevice};
use crate::error::ConnectError;

pub mod base;

// Recorders need no vendor driver on any platform, libusb handles them everywhere.
mod libusb;
use crate::device::libusb::device;

#[cfg(test)]
pub(crate) mod mock;

pub fn find_devices() -> Result<Vec<NetMDDevice>, ConnectError> {
    device::find_devices()
}

/// Binds to the `index`th attached recorder, using the default transport timings.
pub fn open(index: usize, debug: bool) -> Result<Box<dyn FullNetMDDevice>, ConnectError> {
    open_with_config(index, TransportConfig::with_debug(debug))
}

pub fn open_with_config(
    index: usize,
    config: TransportConfig,
) -> Result<Box<dyn FullNetMDDevice>, ConnectError> {
    Ok(Box::new(device::NetMDUSB::bind(index, config)?))
}
