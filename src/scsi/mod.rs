//! SCSI Pass-Through Layer
//!
//! Typed CDBs, the `SCSI_PASS_THROUGH_DIRECT` request layout and the
//! [`ScsiDevice`] seam every tape operation goes through.

use tracing::debug;

use crate::error::Result;

pub mod cdb;
pub mod constants;
pub mod ffi;
pub mod types;

#[cfg(windows)]
mod device;

pub use cdb::Cdb;
pub use constants::*;
pub use types::{bytes_to_string, DataDirection, InquiryData, UnitSerialNumberPage, VolumeControl};

#[cfg(windows)]
pub use device::{open_device, WindowsScsiDevice};

/// An open device handle. Dropping the value closes the handle.
pub trait ScsiDevice {
    /// Path the handle was opened from
    fn device_path(&self) -> &str;

    /// IOCTL_STORAGE_GET_DEVICE_NUMBER
    fn storage_device_number(&mut self) -> Result<u32>;

    /// Send one CDB through the pass-through transport.
    ///
    /// `Ok(false)` means the command failed; sense data is not inspected.
    /// `Err` is reserved for requests that could not be built at all.
    fn scsi_io_control(
        &mut self,
        cdb: &[u8],
        data_buffer: Option<&mut [u8]>,
        direction: DataDirection,
        timeout: u32,
    ) -> Result<bool>;

    /// Volume lock / dismount / media eject
    fn volume_control(&mut self, control: VolumeControl) -> Result<bool>;
}

/// Encode `cdb` and issue it on `device`
pub fn issue_scsi_command(
    device: &mut dyn ScsiDevice,
    cdb: &Cdb,
    data_buffer: Option<&mut [u8]>,
    direction: DataDirection,
    timeout: u32,
) -> Result<bool> {
    let bytes = cdb.encode();
    debug!(
        "Issuing {} on {}: CDB {}",
        cdb.name(),
        device.device_path(),
        hex::encode(bytes)
    );

    let result = device.scsi_io_control(&bytes, data_buffer, direction, timeout)?;
    if !result {
        debug!("{} failed on {}", cdb.name(), device.device_path());
    }

    Ok(result)
}
