// SCSI constant definitions
pub const SENSE_INFO_LEN: usize = 64;
pub const MAX_CDB_LEN: usize = 16;
pub const MIN_CDB_LEN: usize = 6;

/// Data buffer used for every enumeration command
pub const ENUM_BUFFER_LEN: usize = 1024;

// Command timeouts (seconds)
/// SCSI status byte for GOOD; anything else (CHECK CONDITION, BUSY, ...) is a failure
pub const SCSI_STATUS_GOOD: u8 = 0x00;
pub const SCSI_STATUS_CHECK_CONDITION: u8 = 0x02;

pub const INQUIRY_TIMEOUT_SECS: u32 = 10;
pub const LOAD_TIMEOUT_SECS: u32 = 300;

// Mode pages
pub const TC_MP_PC_CURRENT: u8 = 0x00;
pub const TC_MP_MEDIUM_PARTITION: u8 = 0x11;
pub const MODE_SENSE_ALLOCATION_LEN: u8 = 255;

// VPD pages
pub const VPD_UNIT_SERIAL_NUMBER: u8 = 0x80;

// SCSI data direction
pub const SCSI_IOCTL_DATA_OUT: u8 = 0;
pub const SCSI_IOCTL_DATA_IN: u8 = 1;
pub const SCSI_IOCTL_DATA_UNSPECIFIED: u8 = 2;

// IOCTL / FSCTL codes
pub const IOCTL_SCSI_PASS_THROUGH_DIRECT: u32 = 0x0004_D014;
pub const IOCTL_STORAGE_GET_DEVICE_NUMBER: u32 = 0x002D_1080;
pub const FSCTL_LOCK_VOLUME: u32 = 0x0009_0018;
pub const FSCTL_DISMOUNT_VOLUME: u32 = 0x0009_0020;
pub const IOCTL_DISK_EJECT_MEDIA: u32 = 0x0007_4808;

// SCSI Commands Module
pub mod scsi_commands {
    pub const INQUIRY: u8 = 0x12;
    pub const MODE_SENSE_6: u8 = 0x1A;
    pub const LOAD_UNLOAD: u8 = 0x1B;
}

// INQUIRY response layout
pub mod inquiry_layout {
    pub const VENDOR_ID_OFFSET: usize = 8;
    pub const VENDOR_ID_LEN: usize = 8;
    pub const PRODUCT_ID_OFFSET: usize = 16;
    pub const PRODUCT_ID_LEN: usize = 16;
    pub const PRODUCT_REVISION_OFFSET: usize = 32;
    pub const PRODUCT_REVISION_LEN: usize = 4;

    pub const VPD_PAGE_CODE_OFFSET: usize = 1;
    pub const VPD_PAGE_LENGTH_OFFSET: usize = 3;
    pub const VPD_SERIAL_NUMBER_OFFSET: usize = 4;
    pub const MAX_SERIAL_NUMBER_LEN: usize = 32;
}
