use std::ffi::c_void;

use super::constants::{MAX_CDB_LEN, MIN_CDB_LEN, SCSI_STATUS_GOOD, SENSE_INFO_LEN};
use super::types::DataDirection;
use crate::error::{LtfsCmdError, Result};

/// SCSI Pass Through Direct structure (SCSI_PASS_THROUGH_DIRECT in ntddscsi.h)
#[repr(C)]
#[derive(Debug)]
pub struct ScsiPassThroughDirect {
    pub length: u16,
    pub scsi_status: u8,
    pub path_id: u8,
    pub target_id: u8,
    pub lun: u8,
    pub cdb_length: u8,
    pub sense_info_length: u8,
    pub data_in: u8,
    pub data_transfer_length: u32,
    pub timeout_value: u32,
    pub data_buffer: *mut c_void,
    pub sense_info_offset: u32,
    pub cdb: [u8; MAX_CDB_LEN],
}

/// Pass-through request with the sense region placed directly after the header
#[repr(C)]
#[derive(Debug)]
pub struct ScsiPassThroughDirectWithSense {
    pub sptd: ScsiPassThroughDirect,
    pub sense: [u8; SENSE_INFO_LEN],
}

/// STORAGE_DEVICE_NUMBER returned by IOCTL_STORAGE_GET_DEVICE_NUMBER
#[repr(C)]
#[derive(Debug, Default, Clone, Copy)]
pub struct StorageDeviceNumber {
    pub device_type: u32,
    pub device_number: u32,
    pub partition_number: u32,
}

impl ScsiPassThroughDirectWithSense {
    /// Build a request for `cdb`. The data buffer pointer is left null; the
    /// caller attaches it right before issuing the ioctl.
    pub fn new(
        cdb: &[u8],
        data_transfer_length: u32,
        direction: DataDirection,
        timeout_secs: u32,
    ) -> Result<Self> {
        if cdb.len() < MIN_CDB_LEN || cdb.len() > MAX_CDB_LEN {
            return Err(LtfsCmdError::parameter_validation(format!(
                "CDB length {} outside {}..={}",
                cdb.len(),
                MIN_CDB_LEN,
                MAX_CDB_LEN
            )));
        }

        let mut cdb_bytes = [0u8; MAX_CDB_LEN];
        cdb_bytes[..cdb.len()].copy_from_slice(cdb);

        Ok(Self {
            sptd: ScsiPassThroughDirect {
                length: std::mem::size_of::<ScsiPassThroughDirect>() as u16,
                scsi_status: 0,
                path_id: 0,
                target_id: 0,
                lun: 0,
                cdb_length: cdb.len() as u8,
                sense_info_length: SENSE_INFO_LEN as u8,
                data_in: direction.as_ioctl_value(),
                data_transfer_length,
                timeout_value: timeout_secs,
                data_buffer: std::ptr::null_mut(),
                sense_info_offset: std::mem::size_of::<ScsiPassThroughDirect>() as u32,
                cdb: cdb_bytes,
            },
            sense: [0u8; SENSE_INFO_LEN],
        })
    }

    /// True when the target returned GOOD status. The ioctl itself succeeds
    /// on CHECK CONDITION, so this must be checked after every transfer.
    pub fn succeeded(&self) -> bool {
        self.sptd.scsi_status == SCSI_STATUS_GOOD
    }
}
