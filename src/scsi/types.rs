use super::constants::{inquiry_layout::*, SCSI_IOCTL_DATA_IN, SCSI_IOCTL_DATA_OUT, SCSI_IOCTL_DATA_UNSPECIFIED};

/// Data transfer direction of a pass-through command
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DataDirection {
    In,
    Out,
    Unspecified,
}

impl DataDirection {
    pub fn as_ioctl_value(self) -> u8 {
        match self {
            DataDirection::In => SCSI_IOCTL_DATA_IN,
            DataDirection::Out => SCSI_IOCTL_DATA_OUT,
            DataDirection::Unspecified => SCSI_IOCTL_DATA_UNSPECIFIED,
        }
    }
}

/// Volume-level device controls used by the eject sequence
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VolumeControl {
    Lock,
    Dismount,
    EjectMedia,
}

impl VolumeControl {
    pub fn description(&self) -> &'static str {
        match self {
            VolumeControl::Lock => "volume lock",
            VolumeControl::Dismount => "volume dismount",
            VolumeControl::EjectMedia => "media eject",
        }
    }
}

/// Identification fields of a standard INQUIRY response
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InquiryData {
    pub peripheral_device_type: u8,
    pub vendor_id: String,
    pub product_id: String,
    pub product_revision: String,
}

impl InquiryData {
    /// Parse the fixed-format portion of a standard INQUIRY response.
    /// Fields that fall outside `data` come back empty.
    pub fn parse(data: &[u8]) -> Self {
        Self {
            peripheral_device_type: data.first().map_or(0, |b| b & 0x1F),
            vendor_id: fixed_field(data, VENDOR_ID_OFFSET, VENDOR_ID_LEN),
            product_id: fixed_field(data, PRODUCT_ID_OFFSET, PRODUCT_ID_LEN),
            product_revision: fixed_field(data, PRODUCT_REVISION_OFFSET, PRODUCT_REVISION_LEN),
        }
    }
}

/// Unit Serial Number VPD page (0x80)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnitSerialNumberPage {
    pub page_code: u8,
    pub page_length: u8,
    pub serial_number: String,
}

impl UnitSerialNumberPage {
    /// The page length byte decides how many serial bytes are valid; the copy
    /// is bounded by [`MAX_SERIAL_NUMBER_LEN`] and by `data` itself.
    pub fn parse(data: &[u8]) -> Self {
        let page_code = data.get(VPD_PAGE_CODE_OFFSET).copied().unwrap_or(0);
        let page_length = data.get(VPD_PAGE_LENGTH_OFFSET).copied().unwrap_or(0);
        let len = (page_length as usize).min(MAX_SERIAL_NUMBER_LEN);

        Self {
            page_code,
            page_length,
            serial_number: fixed_field(data, VPD_SERIAL_NUMBER_OFFSET, len),
        }
    }
}

fn fixed_field(data: &[u8], offset: usize, len: usize) -> String {
    let end = offset.saturating_add(len).min(data.len());
    if offset >= end {
        return String::new();
    }
    bytes_to_string(&data[offset..end])
}

/// Convert a fixed-width ASCII field to a string, stopping at the first NUL.
/// Space padding is kept as reported.
pub fn bytes_to_string(bytes: &[u8]) -> String {
    let end = bytes.iter().position(|&b| b == 0).unwrap_or(bytes.len());
    String::from_utf8_lossy(&bytes[..end]).into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn inquiry_response(vendor: &[u8; 8], product: &[u8; 16]) -> Vec<u8> {
        let mut data = vec![0u8; 1024];
        data[0] = 0x01; // sequential-access device
        data[8..16].copy_from_slice(vendor);
        data[16..32].copy_from_slice(product);
        data[32..36].copy_from_slice(b"J5SW");
        data
    }

    #[test]
    fn test_inquiry_parse() {
        let data = inquiry_response(b"HP      ", b"Ultrium 6-SCSI  ");
        let inquiry = InquiryData::parse(&data);
        assert_eq!(inquiry.peripheral_device_type, 1);
        assert_eq!(inquiry.vendor_id, "HP      ");
        assert_eq!(inquiry.product_id, "Ultrium 6-SCSI  ");
        assert_eq!(inquiry.product_revision, "J5SW");
    }

    #[test]
    fn test_inquiry_parse_short_response() {
        let inquiry = InquiryData::parse(&[0x01, 0, 0, 0, 0, 0, 0, 0, b'I', b'B', b'M']);
        assert_eq!(inquiry.vendor_id, "IBM");
        assert_eq!(inquiry.product_id, "");
    }

    #[test]
    fn test_serial_page_uses_page_length() {
        let mut data = vec![0u8; 1024];
        data[1] = 0x80;
        data[3] = 6;
        data[4..14].copy_from_slice(b"ABC123XXXX");
        let page = UnitSerialNumberPage::parse(&data);
        assert_eq!(page.page_code, 0x80);
        assert_eq!(page.serial_number, "ABC123");
    }

    #[test]
    fn test_serial_page_truncates_to_field_size() {
        let mut data = vec![b'9'; 1024];
        data[1] = 0x80;
        data[3] = 200;
        let page = UnitSerialNumberPage::parse(&data);
        assert_eq!(page.page_length, 200);
        assert_eq!(page.serial_number.len(), MAX_SERIAL_NUMBER_LEN);
    }

    #[test]
    fn test_serial_page_zero_length() {
        let mut data = vec![b'Z'; 64];
        data[1] = 0x80;
        data[3] = 0;
        let page = UnitSerialNumberPage::parse(&data);
        assert_eq!(page.serial_number, "");
    }

    #[test]
    fn test_serial_page_bounded_by_buffer() {
        let data = [0x01, 0x80, 0x00, 0x10, b'S', b'N'];
        let page = UnitSerialNumberPage::parse(&data);
        assert_eq!(page.serial_number, "SN");
    }

    #[test]
    fn test_direction_values() {
        assert_eq!(DataDirection::Out.as_ioctl_value(), 0);
        assert_eq!(DataDirection::In.as_ioctl_value(), 1);
        assert_eq!(DataDirection::Unspecified.as_ioctl_value(), 2);
    }
}
