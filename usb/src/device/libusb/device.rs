use crate::config::TransportConfig;
use crate::device::base::{
    AttachNetMD, ExecutableNetMD, FullNetMDDevice, NetMDCommands, NetMDDevice,
};
use crate::devices::{self, SupportedDevice};
use crate::error::ConnectError;
use log::{debug, info, warn};
use rusb::{
    Context, Device, DeviceDescriptor, DeviceHandle, Direction, Recipient, RequestType, UsbContext,
};

pub struct NetMDUSB {
    handle: DeviceHandle<Context>,
    device: Device<Context>,
    model: &'static SupportedDevice,
    out_endpoint: Option<u8>,
    device_is_claimed: bool,
    config: TransportConfig,

    // Held so the context outlives the handle, and goes away with the session.
    _context: Context,
}

impl NetMDUSB {
    /// Binds to the `index`th attached recorder found in the registry, in enumeration order.
    pub fn bind(index: usize, config: TransportConfig) -> Result<Self, ConnectError> {
        let context = Context::new()?;
        let mut attached = usb_devices(&context)?;
        let ids: Vec<(u16, u16)> = attached
            .iter()
            .map(|(_, descriptor)| (descriptor.vendor_id(), descriptor.product_id()))
            .collect();

        let (position, model) = devices::select(&ids, index)?;
        let (device, descriptor) = attached.swap_remove(position);

        let mut handle = device.open()?;
        info!(
            "Connected to {} on bus {}, address {}",
            model.name,
            device.bus_number(),
            device.address()
        );

        let out_endpoint = find_out_endpoint(&device, &descriptor);
        match out_endpoint {
            Some(address) => {
                if config.debug {
                    debug!("Bound output endpoint {:#04x}", address);
                }
            }
            None => warn!("{} exposes no output endpoint", model.name),
        }

        let device_is_claimed = handle.claim_interface(0).is_ok();
        if !device_is_claimed {
            debug!("Unable to claim interface 0, continuing with control transfers only");
        }

        Ok(Self {
            handle,
            device,
            model,
            out_endpoint,
            device_is_claimed,
            config,
            _context: context,
        })
    }
}

impl ExecutableNetMD for NetMDUSB {
    fn read_control(
        &mut self,
        request: u8,
        value: u16,
        index: u16,
        length: usize,
    ) -> Result<Vec<u8>, rusb::Error> {
        let mut buf = vec![0; length];
        let response_length = self.handle.read_control(
            rusb::request_type(Direction::In, RequestType::Vendor, Recipient::Interface),
            request,
            value,
            index,
            &mut buf,
            self.config.usb_timeout,
        )?;
        buf.truncate(response_length);
        Ok(buf)
    }

    fn write_control(
        &mut self,
        request: u8,
        value: u16,
        index: u16,
        data: &[u8],
    ) -> Result<(), rusb::Error> {
        self.handle.write_control(
            rusb::request_type(Direction::Out, RequestType::Vendor, Recipient::Interface),
            request,
            value,
            index,
            data,
            self.config.usb_timeout,
        )?;

        Ok(())
    }

    fn transport_config(&self) -> &TransportConfig {
        &self.config
    }
}

impl AttachNetMD for NetMDUSB {
    fn model(&self) -> &'static SupportedDevice {
        self.model
    }

    fn out_endpoint(&self) -> Option<u8> {
        self.out_endpoint
    }

    fn close(mut self: Box<Self>) {
        if self.device_is_claimed {
            if let Err(error) = self.handle.release_interface(0) {
                debug!("Error releasing interface on {:?}: {}", self.device, error);
            }
        }
        info!("Closed {}", self.model.name);
    }
}

impl NetMDCommands for NetMDUSB {}
impl FullNetMDDevice for NetMDUSB {}

// Every attached device whose descriptor could be read, in enumeration order.
fn usb_devices(context: &Context) -> Result<Vec<(Device<Context>, DeviceDescriptor)>, rusb::Error> {
    let mut found = Vec::new();
    for device in context.devices()?.iter() {
        if let Ok(descriptor) = device.device_descriptor() {
            found.push((device, descriptor));
        }
    }
    Ok(found)
}

fn find_out_endpoint(device: &Device<Context>, descriptor: &DeviceDescriptor) -> Option<u8> {
    for config_index in 0..descriptor.num_configurations() {
        let Ok(config) = device.config_descriptor(config_index) else {
            continue;
        };
        for interface in config.interfaces() {
            for setting in interface.descriptors() {
                if let Some(endpoint) = setting
                    .endpoint_descriptors()
                    .find(|endpoint| endpoint.direction() == Direction::Out)
                {
                    return Some(endpoint.address());
                }
            }
        }
    }
    None
}

pub fn find_devices() -> Result<Vec<NetMDDevice>, ConnectError> {
    let context = Context::new()?;
    let mut found = Vec::new();
    for (device, descriptor) in usb_devices(&context)? {
        if let Some(model) = devices::lookup(descriptor.vendor_id(), descriptor.product_id()) {
            debug!("Found {}", model.name);
            found.push(NetMDDevice {
                bus_number: device.bus_number(),
                address: device.address(),
                model,
            });
        }
    }
    Ok(found)
}
