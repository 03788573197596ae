pub use rusb;
pub mod codec;
pub mod commands;
pub mod config;
pub mod devices;
pub mod error;

mod device;

pub use config::TransportConfig;
pub use device::base::{
    AttachNetMD, ExecutableNetMD, FullNetMDDevice, NetMDCommands, NetMDDevice,
};
pub use device::{find_devices, open, open_with_config};
