#[cfg(feature = "clap")]
use clap::ValueEnum;
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};
use std::fmt::Formatter;
use strum::{Display, EnumCount, EnumIter};

/// The recording density of a track, or the default the recorder will use for new ones.
#[derive(Copy, Clone, Debug, Display, EnumIter, EnumCount, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "clap", derive(ValueEnum))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Encoding {
    #[strum(to_string = "SP")]
    StandardPlay,
    #[strum(to_string = "LP2")]
    LongPlay2,
    #[strum(to_string = "LP4")]
    LongPlay4,
}

impl Encoding {
    pub fn id(&self) -> u8 {
        match self {
            Encoding::StandardPlay => 0x90,
            Encoding::LongPlay2 => 0x92,
            Encoding::LongPlay4 => 0x93,
        }
    }

    pub fn from_id(id: u8) -> Option<Self> {
        match id {
            0x90 => Some(Encoding::StandardPlay),
            0x92 => Some(Encoding::LongPlay2),
            0x93 => Some(Encoding::LongPlay4),
            _ => None,
        }
    }
}

#[derive(Copy, Clone, Debug, Display, EnumIter, EnumCount, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "clap", derive(ValueEnum))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Channels {
    Stereo,
    Mono,
}

impl Channels {
    pub fn id(&self) -> u8 {
        match self {
            Channels::Stereo => 0x00,
            Channels::Mono => 0x01,
        }
    }

    pub fn from_id(id: u8) -> Option<Self> {
        match id {
            0x00 => Some(Channels::Stereo),
            0x01 => Some(Channels::Mono),
            _ => None,
        }
    }
}

/// Disc usage in seconds, as reported by the recorder.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct DiscCapacity {
    pub recorded: u64,
    pub total: u64,
    pub available: u64,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct RecordingParameters {
    pub encoding: Encoding,
    pub channels: Channels,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct DiscStatus {
    pub disc_present: bool,
}

#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct TrackInfo {
    pub index: u16,
    pub title: String,
    pub encoding: Encoding,
    pub length: TrackLength,
}

/// A duration in whole seconds, displayed as `h:mm:ss`.
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct TrackLength(pub u64);

impl TrackLength {
    pub fn seconds(&self) -> u64 {
        self.0
    }
}

impl std::fmt::Display for TrackLength {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}:{:02}:{:02}",
            self.0 / 3600,
            (self.0 / 60) % 60,
            self.0 % 60
        )
    }
}

impl std::fmt::Debug for TrackLength {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}s", self.0)
    }
}
