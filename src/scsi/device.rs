//! Windows Device Handles
//!
//! Opening devices with full sharing, and the ioctls issued on them.

use std::ffi::CString;
use tracing::{debug, warn};

use winapi::{
    shared::{
        minwindef::{DWORD, LPVOID},
        ntdef::HANDLE,
    },
    um::{
        errhandlingapi::GetLastError,
        fileapi::{CreateFileA, OPEN_EXISTING},
        handleapi::{CloseHandle, INVALID_HANDLE_VALUE},
        ioapiset::DeviceIoControl,
        winnt::{FILE_SHARE_DELETE, FILE_SHARE_READ, FILE_SHARE_WRITE, GENERIC_READ, GENERIC_WRITE},
    },
};

use super::constants::*;
use super::ffi::{ScsiPassThroughDirectWithSense, StorageDeviceNumber};
use super::{DataDirection, ScsiDevice, VolumeControl};
use crate::error::{LtfsCmdError, Result};

/// Owned device handle, closed on drop
pub struct WindowsScsiDevice {
    handle: HANDLE,
    device_path: String,
}

/// Open a device path for read/write. Other processes keep full access to
/// the device while it is open.
pub fn open_device(device_path: &str) -> Result<WindowsScsiDevice> {
    debug!("Opening device: {}", device_path);

    let path_cstring = CString::new(device_path).map_err(|e| {
        LtfsCmdError::system(format!("Device path conversion error: {}", e))
    })?;

    unsafe {
        let handle = CreateFileA(
            path_cstring.as_ptr(),
            GENERIC_READ | GENERIC_WRITE,
            FILE_SHARE_DELETE | FILE_SHARE_READ | FILE_SHARE_WRITE,
            std::ptr::null_mut(),
            OPEN_EXISTING,
            0,
            std::ptr::null_mut(),
        );

        if handle == INVALID_HANDLE_VALUE {
            let error_code = GetLastError();
            return Err(LtfsCmdError::tape_device(format!(
                "Cannot open device {}: Windows error code 0x{:08X}",
                device_path, error_code
            )));
        }

        Ok(WindowsScsiDevice {
            handle,
            device_path: device_path.to_string(),
        })
    }
}

impl WindowsScsiDevice {
    fn simple_ioctl(&self, code: DWORD) -> bool {
        let mut bytes_returned: DWORD = 0;
        unsafe {
            DeviceIoControl(
                self.handle,
                code,
                std::ptr::null_mut(),
                0,
                std::ptr::null_mut(),
                0,
                &mut bytes_returned,
                std::ptr::null_mut(),
            ) != 0
        }
    }
}

impl ScsiDevice for WindowsScsiDevice {
    fn device_path(&self) -> &str {
        &self.device_path
    }

    fn storage_device_number(&mut self) -> Result<u32> {
        let mut number = StorageDeviceNumber::default();
        let mut bytes_returned: DWORD = 0;

        let ok = unsafe {
            DeviceIoControl(
                self.handle,
                IOCTL_STORAGE_GET_DEVICE_NUMBER,
                std::ptr::null_mut(),
                0,
                &mut number as *mut StorageDeviceNumber as LPVOID,
                std::mem::size_of::<StorageDeviceNumber>() as DWORD,
                &mut bytes_returned,
                std::ptr::null_mut(),
            ) != 0
        };

        if !ok {
            let error_code = unsafe { GetLastError() };
            return Err(LtfsCmdError::tape_device(format!(
                "Device number query failed on {}: Windows error code 0x{:08X}",
                self.device_path, error_code
            )));
        }

        Ok(number.device_number)
    }

    fn scsi_io_control(
        &mut self,
        cdb: &[u8],
        mut data_buffer: Option<&mut [u8]>,
        direction: DataDirection,
        timeout: u32,
    ) -> Result<bool> {
        let buffer_length = data_buffer.as_ref().map_or(0, |buf| buf.len()) as u32;
        let mut request =
            ScsiPassThroughDirectWithSense::new(cdb, buffer_length, direction, timeout)?;

        request.sptd.data_buffer = data_buffer
            .as_mut()
            .map_or(std::ptr::null_mut(), |buf| buf.as_mut_ptr() as *mut std::ffi::c_void);

        let request_len = std::mem::size_of::<ScsiPassThroughDirectWithSense>() as DWORD;
        let request_ptr = &mut request as *mut ScsiPassThroughDirectWithSense as LPVOID;
        let mut bytes_returned: DWORD = 0;

        let result = unsafe {
            DeviceIoControl(
                self.handle,
                IOCTL_SCSI_PASS_THROUGH_DIRECT,
                request_ptr,
                request_len,
                request_ptr,
                request_len,
                &mut bytes_returned,
                std::ptr::null_mut(),
            ) != 0
        };

        if !result {
            let error_code = unsafe { GetLastError() };
            warn!(
                "SCSI command failed: Windows error code 0x{:08X}, CDB: {}",
                error_code,
                hex::encode(cdb)
            );
            return Ok(false);
        }

        if !request.succeeded() {
            warn!(
                "SCSI command returned status 0x{:02X}, CDB: {}",
                request.sptd.scsi_status,
                hex::encode(cdb)
            );
            return Ok(false);
        }

        Ok(true)
    }

    fn volume_control(&mut self, control: VolumeControl) -> Result<bool> {
        let code = match control {
            VolumeControl::Lock => FSCTL_LOCK_VOLUME,
            VolumeControl::Dismount => FSCTL_DISMOUNT_VOLUME,
            VolumeControl::EjectMedia => IOCTL_DISK_EJECT_MEDIA,
        };

        let result = self.simple_ioctl(code);
        if !result {
            let error_code = unsafe { GetLastError() };
            warn!(
                "{} failed on {}: Windows error code 0x{:08X}",
                control.description(),
                self.device_path,
                error_code
            );
        }

        Ok(result)
    }
}

impl Drop for WindowsScsiDevice {
    fn drop(&mut self) {
        unsafe {
            if self.handle != INVALID_HANDLE_VALUE {
                CloseHandle(self.handle);
                debug!("Device handle closed: {}", self.device_path);
            }
        }
    }
}
