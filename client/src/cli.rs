use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[clap(about, version, author)]
pub struct Cli {
    /// The recorder to talk to, counting from 0 in USB enumeration order.
    /// This only matters if more than one NetMD device is attached.
    #[clap(long, default_value = "0")]
    pub device: usize,

    /// Log every frame sent to and received from the recorder (shown at the debug log level)
    #[clap(long)]
    pub debug: bool,

    /// Minimum log level to print out
    #[clap(long, value_enum, default_value = "info")]
    pub log_level: LevelFilter,

    /// How many times to poll for each response before giving up
    #[clap(long, default_value = "10")]
    pub retries: u32,

    /// Milliseconds to wait between polls
    #[clap(long, default_value = "100")]
    pub backoff_ms: u64,

    /// Print disc and track information as JSON
    #[clap(long)]
    pub json: bool,

    #[clap(subcommand)]
    pub command: SubCommands,
}

#[derive(Subcommand, Debug, PartialEq, Eq)]
pub enum SubCommands {
    /// List attached NetMD recorders
    List,

    /// Show the disc title, capacity, and recording settings
    Info,

    /// List every track on the disc
    Tracks,

    /// Rename the disc
    SetTitle { title: String },

    /// Rename a track (numbered from 0)
    SetTrackTitle {
        track: u16,
        title: String,

        /// The track has only just been recorded and has no title yet
        #[clap(long)]
        new: bool,
    },

    /// Erase a track (numbered from 0), this can't be undone!
    Erase { track: u16 },

    /// Move a track to a new position (both numbered from 0)
    Move { from: u16, to: u16 },

    /// Wait until the recorder has finished whatever it's doing
    Wait,
}

#[repr(usize)]
#[derive(clap::ValueEnum, Copy, Clone, Eq, PartialEq, Debug)]
pub enum LevelFilter {
    /// A level lower than all log levels.
    Off,
    /// Corresponds to the `Error` log level.
    Error,
    /// Corresponds to the `Warn` log level.
    Warn,
    /// Corresponds to the `Info` log level.
    Info,
    /// Corresponds to the `Debug` log level.
    Debug,
    /// Corresponds to the `Trace` log level.
    Trace,
}
