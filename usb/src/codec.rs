// Request building and response parsing for each command. Responses carry their values at fixed
// offsets, all of which live in `offsets` below, and every read is bounds checked so a short
// frame from the device becomes an error rather than a panic.
use crate::commands::{Command, Descriptor, DescriptorAction};
use crate::error::CommandError;
use byteorder::{BigEndian, ByteOrder};
use netmd_types::{Channels, DiscCapacity, DiscStatus, Encoding, RecordingParameters, TrackLength};

pub(crate) mod offsets {
    pub const TITLE: usize = 25;
    pub const TRACK_COUNT: usize = 23;
    pub const TRACK_LENGTH: usize = 27;

    pub const CAPACITY_RECORDED: usize = 29;
    pub const CAPACITY_TOTAL: usize = 35;
    pub const CAPACITY_AVAILABLE: usize = 42;

    pub const RECORDING_ENCODING: usize = 34;
    pub const RECORDING_CHANNELS: usize = 35;

    pub const STATUS_DISC: usize = 26;

    // Counted back from the end of the response, not from the start.
    pub const TRACK_ENCODING_FROM_END: usize = 2;
}

const STATUS_DISC_PRESENT: u8 = 0x40;

/// The leading byte of every frame received from the device.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum ResponseStatus {
    NotImplemented,
    Accepted,
    Rejected,
    Interim,
    Unknown(u8),
}

impl From<u8> for ResponseStatus {
    fn from(tag: u8) -> Self {
        match tag {
            0x08 => ResponseStatus::NotImplemented,
            0x09 => ResponseStatus::Accepted,
            0x0a => ResponseStatus::Rejected,
            0x0f => ResponseStatus::Interim,
            tag => ResponseStatus::Unknown(tag),
        }
    }
}

/// A single command ready to send: the header doubles as the key used to recognise the response.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Request {
    command: Command,
    header: Vec<u8>,
    payload: Vec<u8>,
}

impl Request {
    pub fn new(command: Command, payload: Vec<u8>) -> Self {
        Self {
            command,
            header: command.header(),
            payload,
        }
    }

    pub fn command(&self) -> Command {
        self.command
    }

    pub fn header(&self) -> &[u8] {
        &self.header
    }

    pub fn payload(&self) -> &[u8] {
        &self.payload
    }

    pub fn to_bytes(&self) -> Vec<u8> {
        let mut frame = Vec::with_capacity(self.header.len() + self.payload.len());
        frame.extend_from_slice(&self.header);
        frame.extend_from_slice(&self.payload);
        frame
    }

    /// Whether a received frame answers this request. The first byte is the status tag on the
    /// way back, so it's excluded on both sides.
    pub fn matches(&self, response: &[u8]) -> bool {
        response.len() >= self.header.len() && response[1..self.header.len()] == self.header[1..]
    }
}

fn be16(value: u16) -> [u8; 2] {
    let mut out = [0; 2];
    BigEndian::write_u16(&mut out, value);
    out
}

fn title_length(title: &[u8]) -> Result<u16, CommandError> {
    u16::try_from(title.len()).map_err(|_| CommandError::TitleTooLong(title.len()))
}

pub fn acquire() -> Request {
    let mut payload = vec![0x0c];
    payload.extend_from_slice(&[0xff; 12]);
    Request::new(Command::Acquire, payload)
}

pub fn release() -> Request {
    let mut payload = vec![0x00];
    payload.extend_from_slice(&[0xff; 12]);
    Request::new(Command::Release, payload)
}

pub fn descriptor_state(descriptor: Descriptor, action: DescriptorAction) -> Request {
    Request::new(
        Command::ChangeDescriptorState(descriptor, action),
        vec![0x00],
    )
}

pub fn disc_capacity() -> Request {
    Request::new(
        Command::GetDiscCapacity,
        vec![0x30, 0x80, 0x03, 0x00, 0xff, 0x00, 0x00, 0x00, 0x00, 0x00],
    )
}

pub fn disc_title() -> Request {
    Request::new(Command::GetDiscTitle, title_query_payload(0))
}

pub fn set_disc_title(title: &[u8], old_length: usize) -> Result<Request, CommandError> {
    Ok(Request::new(
        Command::SetDiscTitle,
        title_write_payload(0, title, old_length)?,
    ))
}

pub fn recording_parameters() -> Request {
    Request::new(
        Command::GetRecordingParameters,
        vec![
            0x88, 0x01, 0x00, 0x30, 0x88, 0x05, 0x00, 0x30, 0x88, 0x07, 0x00, 0xff, 0x00, 0x00,
            0x00, 0x00, 0x00,
        ],
    )
}

pub fn status() -> Request {
    Request::new(
        Command::GetStatus,
        vec![
            0x88, 0x00, 0x00, 0x30, 0x88, 0x04, 0x00, 0xff, 0x00, 0x00, 0x00, 0x00, 0x00,
        ],
    )
}

pub fn track_count() -> Request {
    Request::new(
        Command::GetTrackCount,
        vec![0x30, 0x00, 0x10, 0x00, 0xff, 0x00, 0x00, 0x00, 0x00, 0x00],
    )
}

pub fn track_title(track: u16) -> Request {
    Request::new(Command::GetTrackTitle, title_query_payload(track))
}

pub fn set_track_title(
    track: u16,
    title: &[u8],
    old_length: usize,
) -> Result<Request, CommandError> {
    Ok(Request::new(
        Command::SetTrackTitle,
        title_write_payload(track, title, old_length)?,
    ))
}

pub fn track_length(track: u16) -> Request {
    let mut payload = vec![0x01];
    payload.extend_from_slice(&be16(track));
    payload.extend_from_slice(&[0x30, 0x00, 0x01, 0x00, 0xff, 0x00, 0x00, 0x00, 0x00, 0x00]);
    Request::new(Command::GetTrackLength, payload)
}

pub fn track_encoding(track: u16) -> Request {
    let mut payload = be16(track).to_vec();
    payload.extend_from_slice(&[0x30, 0x80, 0x07, 0x00, 0xff, 0x00, 0x00, 0x00, 0x00, 0x00]);
    Request::new(Command::GetTrackEncoding, payload)
}

pub fn erase_track(track: u16) -> Request {
    let mut payload = vec![0x10, 0x01];
    payload.extend_from_slice(&be16(track));
    Request::new(Command::EraseTrack, payload)
}

pub fn move_track(from: u16, to: u16) -> Request {
    let mut payload = vec![0x10, 0x01];
    payload.extend_from_slice(&be16(from));
    payload.extend_from_slice(&[0x20, 0x10, 0x01]);
    payload.extend_from_slice(&be16(to));
    Request::new(Command::MoveTrack, payload)
}

fn title_query_payload(slot: u16) -> Vec<u8> {
    let mut payload = be16(slot).to_vec();
    payload.extend_from_slice(&[0x30, 0x00, 0x0a, 0x00, 0xff, 0x00, 0x00, 0x00, 0x00, 0x00]);
    payload
}

// Slot, fixed block, new length, two zero bytes, old length, then the new title itself.
fn title_write_payload(
    slot: u16,
    title: &[u8],
    old_length: usize,
) -> Result<Vec<u8>, CommandError> {
    let new_length = title_length(title)?;
    let old_length = u16::try_from(old_length).map_err(|_| CommandError::TitleTooLong(old_length))?;

    let mut payload = Vec::with_capacity(14 + title.len());
    payload.extend_from_slice(&be16(slot));
    payload.extend_from_slice(&[0x30, 0x00, 0x0a, 0x00, 0x50, 0x00]);
    payload.extend_from_slice(&be16(new_length));
    payload.extend_from_slice(&[0x00, 0x00]);
    payload.extend_from_slice(&be16(old_length));
    payload.extend_from_slice(title);
    Ok(payload)
}

fn byte_at(response: &[u8], offset: usize) -> Result<u8, CommandError> {
    response
        .get(offset)
        .copied()
        .ok_or(CommandError::ProtocolMismatch {
            expected: offset + 1,
            received: response.len(),
        })
}

fn slice_at(response: &[u8], offset: usize, length: usize) -> Result<&[u8], CommandError> {
    response
        .get(offset..offset + length)
        .ok_or(CommandError::ProtocolMismatch {
            expected: offset + length,
            received: response.len(),
        })
}

/// Reads a byte whose two nibbles are decimal digits, so 0x17 is 17.
pub fn bcd_to_int(value: u8) -> u64 {
    u64::from(value >> 4) * 10 + u64::from(value & 0x0f)
}

/// Reads hours, minutes and seconds from three consecutive bytes, returning the total seconds.
pub fn read_duration(response: &[u8], offset: usize) -> Result<u64, CommandError> {
    let time = slice_at(response, offset, 3)?;
    Ok(bcd_to_int(time[0]) * 3600 + bcd_to_int(time[1]) * 60 + bcd_to_int(time[2]))
}

pub fn parse_disc_capacity(response: &[u8]) -> Result<DiscCapacity, CommandError> {
    Ok(DiscCapacity {
        recorded: read_duration(response, offsets::CAPACITY_RECORDED)?,
        total: read_duration(response, offsets::CAPACITY_TOTAL)?,
        available: read_duration(response, offsets::CAPACITY_AVAILABLE)?,
    })
}

/// The raw title bytes, which run from the title offset to the end of the frame.
pub fn parse_title(response: &[u8]) -> Result<&[u8], CommandError> {
    response
        .get(offsets::TITLE..)
        .ok_or(CommandError::ProtocolMismatch {
            expected: offsets::TITLE,
            received: response.len(),
        })
}

pub fn parse_recording_parameters(response: &[u8]) -> Result<RecordingParameters, CommandError> {
    let encoding = byte_at(response, offsets::RECORDING_ENCODING)?;
    let channels = byte_at(response, offsets::RECORDING_CHANNELS)?;

    Ok(RecordingParameters {
        encoding: Encoding::from_id(encoding).ok_or(CommandError::UnknownValue {
            field: "encoding",
            value: encoding,
        })?,
        channels: Channels::from_id(channels).ok_or(CommandError::UnknownValue {
            field: "channels",
            value: channels,
        })?,
    })
}

pub fn parse_status(response: &[u8]) -> Result<DiscStatus, CommandError> {
    Ok(DiscStatus {
        disc_present: byte_at(response, offsets::STATUS_DISC)? == STATUS_DISC_PRESENT,
    })
}

pub fn parse_track_count(response: &[u8]) -> Result<u16, CommandError> {
    Ok(BigEndian::read_u16(slice_at(
        response,
        offsets::TRACK_COUNT,
        2,
    )?))
}

pub fn parse_track_length(response: &[u8]) -> Result<TrackLength, CommandError> {
    Ok(TrackLength(read_duration(response, offsets::TRACK_LENGTH)?))
}

pub fn parse_track_encoding(response: &[u8]) -> Result<Encoding, CommandError> {
    let offset = response
        .len()
        .checked_sub(offsets::TRACK_ENCODING_FROM_END)
        .ok_or(CommandError::ProtocolMismatch {
            expected: offsets::TRACK_ENCODING_FROM_END,
            received: response.len(),
        })?;
    let value = byte_at(response, offset)?;
    Encoding::from_id(value).ok_or(CommandError::UnknownValue {
        field: "encoding",
        value,
    })
}
