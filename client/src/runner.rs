use crate::cli::{Cli, LevelFilter, SubCommands};
use crate::report::{format_tracks, read_tracks, DiscReport};
use anyhow::{bail, Context, Result};
use clap::Parser;
use log::{debug, info};
use netmd_usb::{
    find_devices, open_with_config, AttachNetMD, ExecutableNetMD, FullNetMDDevice, NetMDCommands,
    TransportConfig,
};
use serde_json::json;
use simplelog::{ColorChoice, CombinedLogger, Config, TermLogger, TerminalMode};
use std::time::Duration;

pub fn run_cli() -> Result<()> {
    let cli: Cli = Cli::parse();

    // Frame dumps are logged at debug, so asking for them implies that level.
    let mut level: log::LevelFilter = cli.log_level.into();
    if cli.debug {
        level = level.max(log::LevelFilter::Debug);
    }

    CombinedLogger::init(vec![TermLogger::new(
        level,
        Config::default(),
        TerminalMode::Mixed,
        ColorChoice::Auto,
    )])
    .context("Could not configure the logger")?;

    if cli.command == SubCommands::List {
        return list_devices(cli.json);
    }

    let config = TransportConfig {
        retries: cli.retries,
        backoff: Duration::from_millis(cli.backoff_ms),
        debug: cli.debug,
        ..Default::default()
    };

    let mut device = open_with_config(cli.device, config)
        .with_context(|| format!("Unable to open NetMD device {}", cli.device))?;

    let result = execute(device.as_mut(), &cli);
    device.close();
    result
}

fn list_devices(as_json: bool) -> Result<()> {
    let devices = find_devices().context("Unable to enumerate USB devices")?;

    if as_json {
        let list: Vec<_> = devices
            .iter()
            .enumerate()
            .map(|(index, device)| {
                json!({
                    "index": index,
                    "name": device.model().name,
                    "vendor_id": device.model().vendor_id,
                    "product_id": device.model().product_id,
                    "bus_number": device.bus_number(),
                    "address": device.address(),
                })
            })
            .collect();
        println!("{}", serde_json::to_string_pretty(&list)?);
        return Ok(());
    }

    if devices.is_empty() {
        println!("No NetMD devices are connected.");
    }
    for (index, device) in devices.iter().enumerate() {
        println!(
            "{} - {} on bus {}, address {}",
            index,
            device.model().name,
            device.bus_number(),
            device.address()
        );
    }
    Ok(())
}

fn execute(device: &mut dyn FullNetMDDevice, cli: &Cli) -> Result<()> {
    match &cli.command {
        // Handled before a device is opened.
        SubCommands::List => {}
        SubCommands::Info => {
            if !device.request_status()?.disc_present {
                bail!("There is no disc in the {}", device.model().name);
            }
            let report = DiscReport::read(device).context("Could not read the disc")?;
            if cli.json {
                println!("{}", serde_json::to_string_pretty(&report)?);
            } else {
                println!("{}", report);
            }
        }
        SubCommands::Tracks => {
            let tracks = read_tracks(device).context("Could not read the track list")?;
            if cli.json {
                println!("{}", serde_json::to_string_pretty(&tracks)?);
            } else if tracks.is_empty() {
                println!("The disc is blank.");
            } else {
                println!("{}", format_tracks(&tracks));
            }
        }
        SubCommands::SetTitle { title } => {
            device
                .set_disc_header(title)
                .context("Unable to set the disc title")?;
            info!("Disc title set to '{}'", title);
        }
        SubCommands::SetTrackTitle { track, title, new } => {
            device
                .set_track_title(*track, title, *new)
                .with_context(|| format!("Unable to set the title of track {}", track))?;
            info!("Track {} title set to '{}'", track, title);
        }
        SubCommands::Erase { track } => {
            device
                .erase_track(*track)
                .with_context(|| format!("Unable to erase track {}", track))?;
            device.wait().context("The recorder did not settle")?;
            info!("Erased track {}", track);
        }
        SubCommands::Move { from, to } => {
            device
                .move_track(*from, *to)
                .with_context(|| format!("Unable to move track {} to {}", from, to))?;
            device.wait().context("The recorder did not settle")?;
            info!("Moved track {} to position {}", from, to);
        }
        SubCommands::Wait => {
            device.wait().context("The recorder did not settle")?;
            debug!("{} is idle", device.model().name);
        }
    }
    Ok(())
}

impl From<LevelFilter> for log::LevelFilter {
    fn from(level: LevelFilter) -> Self {
        match level {
            LevelFilter::Off => log::LevelFilter::Off,
            LevelFilter::Error => log::LevelFilter::Error,
            LevelFilter::Warn => log::LevelFilter::Warn,
            LevelFilter::Info => log::LevelFilter::Info,
            LevelFilter::Debug => log::LevelFilter::Debug,
            LevelFilter::Trace => log::LevelFilter::Trace,
        }
    }
}
