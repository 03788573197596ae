// Every command the recorder understands, and the header which both selects the operation and
// identifies its response. The device has no request ids, so a response belongs to whichever
// command's header it echoes back (ignoring the leading status byte).

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Command {
    Acquire,
    Release,
    ChangeDescriptorState(Descriptor, DescriptorAction),
    GetDiscCapacity,
    GetDiscTitle,
    SetDiscTitle,
    GetRecordingParameters,
    GetStatus,
    GetTrackCount,
    GetTrackTitle,
    SetTrackTitle,
    GetTrackLength,
    GetTrackEncoding,
    EraseTrack,
    MoveTrack,
}

impl Command {
    pub fn header(&self) -> Vec<u8> {
        match self {
            Command::Acquire | Command::Release => vec![0x00, 0xff, 0x01],
            Command::ChangeDescriptorState(descriptor, action) => {
                let mut header = vec![0x00, 0x18, 0x08];
                header.extend_from_slice(&descriptor.id());
                header.push(action.id());
                header
            }
            Command::GetDiscCapacity => vec![0x00, 0x18, 0x06, 0x02, 0x10, 0x10, 0x00],
            Command::GetDiscTitle => vec![0x00, 0x18, 0x06, 0x02, 0x20, 0x18, 0x01],
            Command::SetDiscTitle => vec![0x00, 0x18, 0x07, 0x02, 0x20, 0x18, 0x01],
            Command::GetRecordingParameters => vec![0x00, 0x18, 0x09, 0x80, 0x01, 0x03, 0x30],
            Command::GetStatus => vec![0x00, 0x18, 0x09, 0x80, 0x01, 0x02, 0x30],
            Command::GetTrackCount => vec![0x00, 0x18, 0x06, 0x02, 0x10, 0x10, 0x01],
            Command::GetTrackTitle => vec![0x00, 0x18, 0x06, 0x02, 0x20, 0x18, 0x02],
            Command::SetTrackTitle => vec![0x00, 0x18, 0x07, 0x02, 0x20, 0x18, 0x02],

            // Shorter than the rest, the remaining header byte travels as the first payload byte.
            Command::GetTrackLength => vec![0x00, 0x18, 0x06, 0x02, 0x20, 0x10],
            Command::GetTrackEncoding => vec![0x00, 0x18, 0x06, 0x02, 0x20, 0x10, 0x01],
            Command::EraseTrack => vec![0x00, 0x18, 0x40, 0xff, 0x01, 0x00, 0x20],
            Command::MoveTrack => vec![0x00, 0x18, 0x43, 0xff, 0x00, 0x00, 0x20],
        }
    }
}

/// The on-device metadata blocks which need opening before they can be read from or written to.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Descriptor {
    DiscTitle,
    TrackTitles,
    DiscContents,
}

impl Descriptor {
    pub fn id(&self) -> [u8; 3] {
        match self {
            Descriptor::DiscTitle => [0x10, 0x18, 0x01],
            Descriptor::TrackTitles => [0x10, 0x18, 0x02],
            Descriptor::DiscContents => [0x10, 0x10, 0x01],
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum DescriptorAction {
    Close,
    OpenRead,
    OpenWrite,
}

impl DescriptorAction {
    pub fn id(&self) -> u8 {
        match self {
            DescriptorAction::Close => 0x00,
            DescriptorAction::OpenRead => 0x01,
            DescriptorAction::OpenWrite => 0x03,
        }
    }
}
