use netmd_types::{DiscCapacity, RecordingParameters, TrackInfo, TrackLength};
use netmd_usb::error::CommandError;
use netmd_usb::FullNetMDDevice;
use serde::Serialize;
use std::fmt::{Display, Formatter};

#[derive(Debug, Serialize)]
pub struct DiscReport {
    pub model: String,
    pub title: String,
    pub track_count: u16,
    pub capacity: DiscCapacity,
    pub recording: RecordingParameters,
}

impl DiscReport {
    pub fn read(device: &mut dyn FullNetMDDevice) -> Result<Self, CommandError> {
        Ok(Self {
            model: device.model().name.to_string(),
            title: device.request_disc_header()?,
            track_count: device.request_track_count()?,
            capacity: device.request_disc_capacity()?,
            recording: device.recording_parameters()?,
        })
    }
}

impl Display for DiscReport {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Device:     {}", self.model)?;
        writeln!(f, "Title:      {}", self.title)?;
        writeln!(f, "Tracks:     {}", self.track_count)?;
        writeln!(
            f,
            "Recorded:   {} of {} ({} available)",
            TrackLength(self.capacity.recorded),
            TrackLength(self.capacity.total),
            TrackLength(self.capacity.available)
        )?;
        write!(
            f,
            "Recording:  {} {}",
            self.recording.encoding, self.recording.channels
        )
    }
}

pub fn read_tracks(device: &mut dyn FullNetMDDevice) -> Result<Vec<TrackInfo>, CommandError> {
    let count = device.request_track_count()?;
    let mut tracks = Vec::with_capacity(usize::from(count));
    for index in 0..count {
        tracks.push(TrackInfo {
            index,
            title: device.request_track_title(index)?,
            encoding: device.request_track_encoding(index)?,
            length: device.request_track_length(index)?,
        });
    }
    Ok(tracks)
}

pub fn format_tracks(tracks: &[TrackInfo]) -> String {
    tracks
        .iter()
        .map(|track| {
            format!(
                "{:>3}  {:<3}  {:>8}  {}",
                track.index,
                track.encoding.to_string(),
                track.length.to_string(),
                track.title
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}
