// The table of recorders known to speak NetMD, and whether they can record in the enhanced
// long play modes. Aiwa units were built by Sony, and report Sony's vendor id.
use crate::error::ConnectError;

pub const VID_SHARP: u16 = 0x04dd;
pub const VID_SONY: u16 = 0x054c;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct SupportedDevice {
    pub vendor_id: u16,
    pub product_id: u16,
    pub name: &'static str,
    pub supports_enhanced_lp: bool,
}

impl SupportedDevice {
    const fn new(
        vendor_id: u16,
        product_id: u16,
        name: &'static str,
        supports_enhanced_lp: bool,
    ) -> Self {
        Self {
            vendor_id,
            product_id,
            name,
            supports_enhanced_lp,
        }
    }
}

pub static SUPPORTED_DEVICES: &[SupportedDevice] = &[
    SupportedDevice::new(VID_SHARP, 0x7202, "Sharp IM-MT899H", false),
    SupportedDevice::new(VID_SHARP, 0x9013, "Sharp IM-DR400/DR410/DR420", true),
    SupportedDevice::new(VID_SHARP, 0x9014, "Sharp IM-DR80", false),
    SupportedDevice::new(VID_SONY, 0x0034, "Sony PCLK-XX", false),
    SupportedDevice::new(VID_SONY, 0x0036, "Sony", false),
    SupportedDevice::new(VID_SONY, 0x0075, "Sony MZ-N1", false),
    SupportedDevice::new(VID_SONY, 0x007c, "Sony", false),
    SupportedDevice::new(VID_SONY, 0x0080, "Sony LAM-1", false),
    SupportedDevice::new(VID_SONY, 0x0081, "Sony MDS-JB980/JE780", true),
    SupportedDevice::new(VID_SONY, 0x0084, "Sony MZ-N505", false),
    SupportedDevice::new(VID_SONY, 0x0085, "Sony MZ-S1", false),
    SupportedDevice::new(VID_SONY, 0x0086, "Sony MZ-N707", false),
    SupportedDevice::new(VID_SONY, 0x008e, "Sony CMT-C7NT", false),
    SupportedDevice::new(VID_SONY, 0x0097, "Sony PCGA-MDN1", false),
    SupportedDevice::new(VID_SONY, 0x00ad, "Sony CMT-L7HD", false),
    SupportedDevice::new(VID_SONY, 0x00c6, "Sony MZ-N10", false),
    SupportedDevice::new(VID_SONY, 0x00c7, "Sony MZ-N910", false),
    SupportedDevice::new(VID_SONY, 0x00c8, "Sony MZ-N710/NF810", false),
    SupportedDevice::new(VID_SONY, 0x00c9, "Sony MZ-N510/N610", false),
    SupportedDevice::new(VID_SONY, 0x00ca, "Sony MZ-NE410/NF520D", false),
    SupportedDevice::new(VID_SONY, 0x00eb, "Sony MZ-NE810/NE910", false),
    SupportedDevice::new(VID_SONY, 0x0101, "Sony LAM-10", false),
    SupportedDevice::new(VID_SONY, 0x0113, "Aiwa AM-NX1", false),
    SupportedDevice::new(VID_SONY, 0x013f, "Sony MDS-S500", false),
    SupportedDevice::new(VID_SONY, 0x014c, "Aiwa AM-NX9", false),
    SupportedDevice::new(VID_SONY, 0x017e, "Sony MZ-NH1", false),
    SupportedDevice::new(VID_SONY, 0x0180, "Sony MZ-NH3D", false),
    SupportedDevice::new(VID_SONY, 0x0182, "Sony MZ-NH900", false),
    SupportedDevice::new(VID_SONY, 0x0184, "Sony MZ-NH700/NH800", false),
    SupportedDevice::new(VID_SONY, 0x0186, "Sony MZ-NH600", false),
    SupportedDevice::new(VID_SONY, 0x0187, "Sony MZ-NH600D", false),
    SupportedDevice::new(VID_SONY, 0x0188, "Sony MZ-N920", false),
    SupportedDevice::new(VID_SONY, 0x018a, "Sony LAM-3", false),
    SupportedDevice::new(VID_SONY, 0x01e9, "Sony MZ-DH10P", false),
    SupportedDevice::new(VID_SONY, 0x0219, "Sony MZ-RH10", false),
    SupportedDevice::new(VID_SONY, 0x021b, "Sony MZ-RH710/MZ-RH910", false),
    SupportedDevice::new(VID_SONY, 0x021d, "Sony CMT-AH10", false),
    SupportedDevice::new(VID_SONY, 0x022c, "Sony CMT-AH10", false),
    SupportedDevice::new(VID_SONY, 0x023c, "Sony DS-HMD1", false),
    SupportedDevice::new(VID_SONY, 0x0286, "Sony MZ-RH1", false),
];

pub fn lookup(vendor_id: u16, product_id: u16) -> Option<&'static SupportedDevice> {
    SUPPORTED_DEVICES
        .iter()
        .find(|device| device.vendor_id == vendor_id && device.product_id == product_id)
}

/// Picks the `index`th recorder out of a list of attached (vendor, product) ids, skipping anything
/// not in the registry. Returns its position in `ids` along with the matched entry.
pub fn select(
    ids: &[(u16, u16)],
    index: usize,
) -> Result<(usize, &'static SupportedDevice), ConnectError> {
    let matches: Vec<_> = ids
        .iter()
        .enumerate()
        .filter_map(|(position, &(vendor_id, product_id))| {
            lookup(vendor_id, product_id).map(|model| (position, model))
        })
        .collect();

    let found = matches.len();
    matches
        .into_iter()
        .nth(index)
        .ok_or(ConnectError::NoDeviceFound { index, found })
}
