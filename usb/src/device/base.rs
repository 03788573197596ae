use crate::codec::{self, Request, ResponseStatus};
use crate::commands::{Descriptor, DescriptorAction};
use crate::config::TransportConfig;
use crate::devices::SupportedDevice;
use crate::error::CommandError;
use log::{debug, warn};
use netmd_types::{DiscCapacity, DiscStatus, Encoding, RecordingParameters, TrackLength};
use std::thread::sleep;

pub(crate) const REQUEST_POLL: u8 = 0x01;
pub(crate) const REQUEST_SEND: u8 = 0x80;
pub(crate) const REQUEST_RECEIVE: u8 = 0x81;

const POLL_LENGTH: usize = 4;
const POLL_READY: u8 = 0x01;

// This is a basic SuperTrait which defines all the 'Parts' of a NetMD session for use.
pub trait FullNetMDDevice: AttachNetMD + NetMDCommands + Send {}

pub trait AttachNetMD {
    /// The registry entry this session was bound against.
    fn model(&self) -> &'static SupportedDevice;

    /// Address of the output endpoint found while binding, if the device exposed one.
    fn out_endpoint(&self) -> Option<u8>;

    /// Releases the device handle and the USB context. The session can't be used afterwards.
    fn close(self: Box<Self>);
}

/// The polled request / response transport. Implementors only need to supply the two vendor
/// control transfers, everything else is built on top of them.
pub trait ExecutableNetMD {
    fn read_control(
        &mut self,
        request: u8,
        value: u16,
        index: u16,
        length: usize,
    ) -> Result<Vec<u8>, rusb::Error>;

    fn write_control(
        &mut self,
        request: u8,
        value: u16,
        index: u16,
        data: &[u8],
    ) -> Result<(), rusb::Error>;

    fn transport_config(&self) -> &TransportConfig;

    /// Returns the number of bytes waiting to be received, or None if nothing is ready.
    fn poll(&mut self) -> Result<Option<usize>, CommandError> {
        let buffer = self.read_control(REQUEST_POLL, 0, 0, POLL_LENGTH)?;
        match (buffer.first(), buffer.get(2)) {
            (Some(&POLL_READY), Some(&length)) => Ok(Some(usize::from(length))),
            _ => Ok(None),
        }
    }

    fn receive(&mut self, length: usize) -> Result<Vec<u8>, CommandError> {
        let buffer = self.read_control(REQUEST_RECEIVE, 0, 0, length)?;
        let debug = self.transport_config().debug;

        // An empty frame has no status tag, it can only ever be a mismatch.
        let Some(&tag) = buffer.first() else {
            if debug {
                debug!(" -> Empty frame <-");
            }
            return Ok(buffer);
        };

        match ResponseStatus::from(tag) {
            ResponseStatus::Accepted => {
                if debug {
                    debug!(" -> Accepted -> {:02x?}", buffer);
                }
            }
            ResponseStatus::Rejected => {
                if debug {
                    debug!(" -> Rejected -> {:02x?}", buffer);
                }
                return Err(CommandError::Rejected(buffer));
            }
            ResponseStatus::Interim => {
                if debug {
                    debug!(" -> Interim <-");
                }
            }
            ResponseStatus::NotImplemented => {
                warn!("Command not implemented by device: {:02x?}", buffer);
            }
            ResponseStatus::Unknown(tag) => {
                warn!("Unknown response status {:#04x}: {:02x?}", tag, buffer);
            }
        }
        Ok(buffer)
    }

    /// Sends a request, then polls until the response carrying its header turns up.
    fn raw_call(&mut self, request: &Request) -> Result<Vec<u8>, CommandError> {
        let config = *self.transport_config();
        let frame = request.to_bytes();
        if config.debug {
            debug!("Sending {:?} <- {:02x?}", request.command(), frame);
        }

        // Whatever this reports, the command goes out anyway.
        let _ = self.poll()?;
        self.write_control(REQUEST_SEND, 0, 0, &frame)?;

        for attempt in 1..=config.retries {
            if let Some(length) = self.poll()? {
                let response = self.receive(length)?;

                let status = response.first().copied().map(ResponseStatus::from);
                if status == Some(ResponseStatus::Interim) {
                    if config.debug {
                        debug!(
                            "Interim response for {:?} (Attempt {} of {})",
                            request.command(),
                            attempt,
                            config.retries
                        );
                    }
                } else if request.matches(&response) {
                    return Ok(response);
                } else if config.debug {
                    let end = response.len().min(request.header().len());
                    debug!(
                        "Skipping mismatch: {:02x?} <-> {:02x?}",
                        response.get(1..end).unwrap_or_default(),
                        &request.header()[1..]
                    );
                }
            }
            sleep(config.backoff);
        }

        debug!(
            "No response for {:?} after {} polls",
            request.command(),
            config.retries
        );
        Err(CommandError::PollTimeout(config.retries))
    }

    /// Part of the Sharp exclusivity handshake, Sony units accept it and do nothing.
    fn acquire(&mut self) -> Result<(), CommandError> {
        self.raw_call(&codec::acquire())?;
        Ok(())
    }

    fn release(&mut self) -> Result<(), CommandError> {
        self.raw_call(&codec::release())?;
        Ok(())
    }

    /// Blocks until the device reports it has fully finished its last operation. Some units
    /// (Sharp IM-DR410/420, Sony MZ-N420D) crash if sent anything before then.
    fn wait(&mut self) -> Result<(), CommandError> {
        let config = *self.transport_config();
        for _ in 0..config.retries {
            let buffer = self.read_control(REQUEST_POLL, 0, 0, POLL_LENGTH)?;
            if buffer.len() != POLL_LENGTH {
                if config.debug {
                    debug!("Sync response was {} bytes, expected 4", buffer.len());
                }
            } else if buffer.iter().all(|&byte| byte == 0) {
                return Ok(());
            }
            sleep(config.backoff);
        }
        Err(CommandError::NoSyncResponse(config.retries))
    }
}

// These are commands that can be executed, but the transport must be implemented..
pub trait NetMDCommands: ExecutableNetMD {
    fn request_disc_capacity(&mut self) -> Result<DiscCapacity, CommandError> {
        // Only Sharp units need this, a refusal doesn't stop the query.
        if let Err(error) = self.release() {
            warn!("Release before capacity query failed: {}", error);
        }
        let response = self.raw_call(&codec::disc_capacity())?;
        codec::parse_disc_capacity(&response)
    }

    fn request_disc_header(&mut self) -> Result<String, CommandError> {
        let response = self.raw_call(&codec::disc_title())?;
        Ok(String::from_utf8_lossy(codec::parse_title(&response)?).into_owned())
    }

    fn set_disc_header(&mut self, title: &str) -> Result<(), CommandError> {
        self.release()?;

        // The old length has to be the raw byte count, not a decoded string length.
        let response = self.raw_call(&codec::disc_title())?;
        let old_length = codec::parse_title(&response)?.len();

        let request = codec::set_disc_title(title.as_bytes(), old_length)?;
        write_title(self, Descriptor::DiscTitle, &request, true)
    }

    fn recording_parameters(&mut self) -> Result<RecordingParameters, CommandError> {
        let response = self.raw_call(&codec::recording_parameters())?;
        codec::parse_recording_parameters(&response)
    }

    fn request_status(&mut self) -> Result<DiscStatus, CommandError> {
        let response = self.raw_call(&codec::status())?;
        codec::parse_status(&response)
    }

    fn request_track_count(&mut self) -> Result<u16, CommandError> {
        self.raw_call(&codec::descriptor_state(
            Descriptor::DiscContents,
            DescriptorAction::OpenRead,
        ))?;
        let response = self.raw_call(&codec::track_count())?;
        codec::parse_track_count(&response)
    }

    fn request_track_title(&mut self, track: u16) -> Result<String, CommandError> {
        let response = self.raw_call(&codec::track_title(track))?;
        Ok(String::from_utf8_lossy(codec::parse_title(&response)?).into_owned())
    }

    /// Renames a track. `is_new` skips reading the old title and the descriptor preparation,
    /// which is only valid straight after the track was created.
    fn set_track_title(
        &mut self,
        track: u16,
        title: &str,
        is_new: bool,
    ) -> Result<(), CommandError> {
        self.release()?;

        let old_length = if is_new {
            0
        } else {
            let response = self.raw_call(&codec::track_title(track))?;
            codec::parse_title(&response)?.len()
        };

        let request = codec::set_track_title(track, title.as_bytes(), old_length)?;
        write_title(self, Descriptor::TrackTitles, &request, !is_new)
    }

    /// Removes a track for good. Follow with `wait()` on units which need to settle.
    fn erase_track(&mut self, track: u16) -> Result<(), CommandError> {
        self.raw_call(&codec::erase_track(track))?;
        Ok(())
    }

    fn move_track(&mut self, from: u16, to: u16) -> Result<(), CommandError> {
        self.raw_call(&codec::descriptor_state(
            Descriptor::DiscContents,
            DescriptorAction::Close,
        ))?;
        self.raw_call(&codec::move_track(from, to))?;
        Ok(())
    }

    fn request_track_length(&mut self, track: u16) -> Result<TrackLength, CommandError> {
        let response = self.raw_call(&codec::track_length(track))?;
        codec::parse_track_length(&response)
    }

    fn request_track_encoding(&mut self, track: u16) -> Result<Encoding, CommandError> {
        let response = self.raw_call(&codec::track_encoding(track))?;
        codec::parse_track_encoding(&response)
    }
}

// Existing titles need their descriptor cycled through read, close and write before the rename
// will stick, and closing again afterwards. Nothing is undone if a step fails part way through,
// so the descriptor may be left open.
fn write_title<D: ExecutableNetMD + ?Sized>(
    device: &mut D,
    descriptor: Descriptor,
    request: &Request,
    existing: bool,
) -> Result<(), CommandError> {
    if existing {
        for action in [
            DescriptorAction::OpenRead,
            DescriptorAction::Close,
            DescriptorAction::OpenWrite,
        ] {
            device.raw_call(&codec::descriptor_state(descriptor, action))?;
        }
    }

    device.raw_call(request)?;

    if existing {
        device.raw_call(&codec::descriptor_state(descriptor, DescriptorAction::Close))?;
    }
    Ok(())
}

// We primarily need the bus number, and address for comparison..
#[derive(Debug, Clone)]
pub struct NetMDDevice {
    pub(crate) bus_number: u8,
    pub(crate) address: u8,
    pub(crate) model: &'static SupportedDevice,
}

impl NetMDDevice {
    pub fn bus_number(&self) -> u8 {
        self.bus_number
    }
    pub fn address(&self) -> u8 {
        self.address
    }
    pub fn model(&self) -> &'static SupportedDevice {
        self.model
    }
}
