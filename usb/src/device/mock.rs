// An in-memory recorder for tests. It answers the three control requests the way a real unit
// does: frames written with REQUEST_SEND are answered by queueing a response, polls report the
// length of the oldest queued response, and REQUEST_RECEIVE hands it over. Behind that sits a
// small model of a disc so the command layer can be checked end to end.
use crate::codec::bcd_to_int;
use crate::commands::{Command, Descriptor, DescriptorAction};
use crate::config::TransportConfig;
use crate::device::base::{
    AttachNetMD, ExecutableNetMD, FullNetMDDevice, NetMDCommands, REQUEST_POLL, REQUEST_RECEIVE,
    REQUEST_SEND,
};
use crate::devices::{self, SupportedDevice, VID_SONY};
use byteorder::{BigEndian, ByteOrder};
use netmd_types::{Channels, Encoding};
use std::collections::VecDeque;
use std::time::Duration;

const ACCEPTED: u8 = 0x09;
const REJECTED: u8 = 0x0a;
const INTERIM: u8 = 0x0f;
const NOT_IMPLEMENTED: u8 = 0x08;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MockTrack {
    pub title: Vec<u8>,
    pub encoding: Encoding,
    pub seconds: u64,
}

impl MockTrack {
    pub fn new(title: &str, encoding: Encoding, seconds: u64) -> Self {
        Self {
            title: title.as_bytes().to_vec(),
            encoding,
            seconds,
        }
    }
}

pub struct MockNetMD {
    config: TransportConfig,
    model: &'static SupportedDevice,

    pub disc_title: Vec<u8>,
    pub tracks: Vec<MockTrack>,
    pub total_seconds: u64,
    pub recording: (Encoding, Channels),
    pub disc_present: bool,

    /// Every frame written to the device, in order.
    pub sent: Vec<Vec<u8>>,
    /// Number of polls made, including those made by `wait()`.
    pub polls: usize,

    /// Frames delivered ahead of the next real response, as if left over from earlier commands.
    pub stale: VecDeque<Vec<u8>>,
    /// Interim frames delivered ahead of each real response.
    pub interim_frames: usize,
    /// When set, every poll reports "not ready" with this first byte.
    pub never_ready: Option<u8>,
    /// Number of sync polls which report the device as still busy.
    pub busy_polls: usize,
    /// Headers which the device refuses.
    pub reject: Vec<Vec<u8>>,
    /// Cuts every response down to this many bytes.
    pub truncate: Option<usize>,
    /// Fails the next receive with this error.
    pub receive_error: Option<rusb::Error>,
    /// Replaces the status tag of every real response.
    pub status_tag: Option<u8>,

    pending: VecDeque<Vec<u8>>,
}

impl MockNetMD {
    pub fn new() -> Self {
        Self {
            config: TransportConfig {
                retries: 10,
                backoff: Duration::ZERO,
                usb_timeout: Duration::from_millis(10),
                debug: true,
            },
            model: devices::lookup(VID_SONY, 0x0075).unwrap(),
            disc_title: b"Mix Tape".to_vec(),
            tracks: vec![
                MockTrack::new("Opening", Encoding::StandardPlay, 185),
                MockTrack::new("Interlude", Encoding::LongPlay2, 62),
                MockTrack::new("Finale", Encoding::LongPlay4, 3725),
            ],
            total_seconds: 80 * 60,
            recording: (Encoding::StandardPlay, Channels::Stereo),
            disc_present: true,
            sent: Vec::new(),
            polls: 0,
            stale: VecDeque::new(),
            interim_frames: 0,
            never_ready: None,
            busy_polls: 0,
            reject: Vec::new(),
            truncate: None,
            receive_error: None,
            status_tag: None,
            pending: VecDeque::new(),
        }
    }

    pub fn with_config(mut self, config: TransportConfig) -> Self {
        self.config = config;
        self
    }

    pub fn titles(&self) -> Vec<String> {
        self.tracks
            .iter()
            .map(|track| String::from_utf8_lossy(&track.title).into_owned())
            .collect()
    }

    /// Frames sent for a given command, in order.
    pub fn sent_for(&self, command: Command) -> Vec<&Vec<u8>> {
        let header = command.header();
        self.sent
            .iter()
            .filter(|frame| frame.starts_with(&header))
            .collect()
    }

    /// Decodes every frame sent back into the command it carried.
    pub fn commands_sent(&self) -> Vec<Command> {
        self.sent.iter().map(|frame| identify(frame)).collect()
    }

    pub fn recorded_seconds(&self) -> u64 {
        self.tracks.iter().map(|track| track.seconds).sum()
    }

    fn respond(&mut self, frame: &[u8]) -> Vec<u8> {
        let mut response = frame.to_vec();
        response[0] = ACCEPTED;

        if self.reject.iter().any(|header| frame.starts_with(header)) {
            response[0] = REJECTED;
            return response;
        }

        let is = |command: Command| frame.starts_with(&command.header());

        if is(Command::Acquire)
            || is(Command::Release)
            || frame.starts_with(&[0x00, 0x18, 0x08])
        {
            // Descriptor state changes and the handshake are simply acknowledged.
        } else if is(Command::GetDiscCapacity) {
            let recorded = self.recorded_seconds();
            response.resize(45, 0);
            response[29..32].copy_from_slice(&to_time(recorded));
            response[35..38].copy_from_slice(&to_time(self.total_seconds));
            response[42..45]
                .copy_from_slice(&to_time(self.total_seconds.saturating_sub(recorded)));
        } else if is(Command::GetDiscTitle) {
            response.resize(25, 0);
            response.extend_from_slice(&self.disc_title);
        } else if is(Command::SetDiscTitle) {
            let (old_length, title) = title_write(frame);
            if old_length != self.disc_title.len() {
                response[0] = REJECTED;
            } else {
                self.disc_title = title;
            }
        } else if is(Command::GetRecordingParameters) {
            response.resize(36, 0);
            response[34] = self.recording.0.id();
            response[35] = self.recording.1.id();
        } else if is(Command::GetStatus) {
            response.resize(27, 0);
            response[26] = if self.disc_present { 0x40 } else { 0x80 };
        } else if is(Command::GetTrackCount) {
            response.resize(25, 0);
            BigEndian::write_u16(&mut response[23..25], self.tracks.len() as u16);
        } else if is(Command::GetTrackTitle) {
            match self.track(&frame[7..9]) {
                Some(track) => {
                    let title = track.title.clone();
                    response.resize(25, 0);
                    response.extend_from_slice(&title);
                }
                None => response[0] = REJECTED,
            }
        } else if is(Command::SetTrackTitle) {
            let index = usize::from(BigEndian::read_u16(&frame[7..9]));
            let (old_length, title) = title_write(frame);
            match self.tracks.get_mut(index) {
                Some(track) if track.title.len() == old_length => track.title = title,
                _ => response[0] = REJECTED,
            }
        } else if is(Command::GetTrackEncoding) && frame[10] == 0x80 {
            match self.track(&frame[7..9]) {
                Some(track) => {
                    let encoding = track.encoding.id();
                    response.truncate(Command::GetTrackEncoding.header().len() + 2);
                    response.extend_from_slice(&[encoding, 0x00]);
                }
                None => response[0] = REJECTED,
            }
        } else if is(Command::GetTrackLength) {
            match self.track(&frame[7..9]) {
                Some(track) => {
                    let seconds = track.seconds;
                    response.resize(30, 0);
                    response[27..30].copy_from_slice(&to_time(seconds));
                }
                None => response[0] = REJECTED,
            }
        } else if is(Command::EraseTrack) {
            let index = usize::from(BigEndian::read_u16(&frame[9..11]));
            if index < self.tracks.len() {
                self.tracks.remove(index);
            } else {
                response[0] = REJECTED;
            }
        } else if is(Command::MoveTrack) {
            let from = usize::from(BigEndian::read_u16(&frame[9..11]));
            let to = usize::from(BigEndian::read_u16(&frame[14..16]));
            if from < self.tracks.len() && to < self.tracks.len() {
                let track = self.tracks.remove(from);
                self.tracks.insert(to, track);
            } else {
                response[0] = REJECTED;
            }
        } else {
            response[0] = NOT_IMPLEMENTED;
        }
        response
    }

    fn track(&self, index: &[u8]) -> Option<&MockTrack> {
        self.tracks.get(usize::from(BigEndian::read_u16(index)))
    }
}

fn identify(frame: &[u8]) -> Command {
    if frame.starts_with(&Command::Release.header()) {
        return match frame.get(3) {
            Some(0x0c) => Command::Acquire,
            _ => Command::Release,
        };
    }

    let mut candidates = vec![
        Command::GetDiscCapacity,
        Command::GetDiscTitle,
        Command::SetDiscTitle,
        Command::GetRecordingParameters,
        Command::GetStatus,
        Command::GetTrackCount,
        Command::GetTrackTitle,
        Command::SetTrackTitle,
        Command::EraseTrack,
        Command::MoveTrack,
    ];
    for descriptor in [
        Descriptor::DiscTitle,
        Descriptor::TrackTitles,
        Descriptor::DiscContents,
    ] {
        for action in [
            DescriptorAction::Close,
            DescriptorAction::OpenRead,
            DescriptorAction::OpenWrite,
        ] {
            candidates.push(Command::ChangeDescriptorState(descriptor, action));
        }
    }

    if let Some(command) = candidates
        .into_iter()
        .find(|command| frame.starts_with(&command.header()))
    {
        return command;
    }

    // Length and encoding queries share a prefix, the query block tells them apart.
    match frame.get(10) {
        Some(0x80) => Command::GetTrackEncoding,
        _ => Command::GetTrackLength,
    }
}

fn to_bcd(value: u64) -> u8 {
    (((value / 10) << 4) | (value % 10)) as u8
}

fn to_time(seconds: u64) -> [u8; 3] {
    let time = [
        to_bcd(seconds / 3600),
        to_bcd((seconds / 60) % 60),
        to_bcd(seconds % 60),
    ];
    debug_assert_eq!(
        bcd_to_int(time[0]) * 3600 + bcd_to_int(time[1]) * 60 + bcd_to_int(time[2]),
        seconds
    );
    time
}

// Title writes carry (after the seven byte header): slot, fixed block, new length, zeroes, old
// length, then the title.
fn title_write(frame: &[u8]) -> (usize, Vec<u8>) {
    let payload = &frame[7..];
    let new_length = usize::from(BigEndian::read_u16(&payload[8..10]));
    let old_length = usize::from(BigEndian::read_u16(&payload[12..14]));
    let title = payload[14..].to_vec();
    assert_eq!(new_length, title.len(), "new title length field is wrong");
    (old_length, title)
}

impl ExecutableNetMD for MockNetMD {
    fn read_control(
        &mut self,
        request: u8,
        _value: u16,
        _index: u16,
        length: usize,
    ) -> Result<Vec<u8>, rusb::Error> {
        match request {
            REQUEST_POLL => {
                self.polls += 1;
                if let Some(tag) = self.never_ready {
                    return Ok(vec![tag, 0x00, 0x00, 0x00]);
                }
                if self.busy_polls > 0 {
                    self.busy_polls -= 1;
                    return Ok(vec![0x00, 0x00, 0x00, 0x01]);
                }
                let mut poll = match self.pending.front() {
                    Some(frame) => vec![0x01, 0x81, frame.len() as u8, 0x00],
                    None => vec![0x00; 4],
                };
                poll.truncate(length);
                Ok(poll)
            }
            REQUEST_RECEIVE => {
                if let Some(error) = self.receive_error.take() {
                    return Err(error);
                }
                let mut frame = self.pending.pop_front().ok_or(rusb::Error::Pipe)?;
                frame.truncate(length);
                Ok(frame)
            }
            _ => Err(rusb::Error::NotSupported),
        }
    }

    fn write_control(
        &mut self,
        request: u8,
        _value: u16,
        _index: u16,
        data: &[u8],
    ) -> Result<(), rusb::Error> {
        if request != REQUEST_SEND {
            return Err(rusb::Error::NotSupported);
        }
        self.sent.push(data.to_vec());

        let mut response = self.respond(data);
        if let Some(tag) = self.status_tag {
            response[0] = tag;
        }
        if let Some(length) = self.truncate {
            response.truncate(length);
        }

        while let Some(stale) = self.stale.pop_front() {
            self.pending.push_back(stale);
        }
        for _ in 0..self.interim_frames {
            let mut interim = data.to_vec();
            interim[0] = INTERIM;
            self.pending.push_back(interim);
        }
        self.pending.push_back(response);
        Ok(())
    }

    fn transport_config(&self) -> &TransportConfig {
        &self.config
    }
}

impl AttachNetMD for MockNetMD {
    fn model(&self) -> &'static SupportedDevice {
        self.model
    }

    fn out_endpoint(&self) -> Option<u8> {
        Some(0x02)
    }

    fn close(self: Box<Self>) {}
}

impl NetMDCommands for MockNetMD {}
impl FullNetMDDevice for MockNetMD {}
