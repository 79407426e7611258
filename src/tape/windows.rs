//! SetupAPI-backed Tape System

use std::ffi::CStr;
use tracing::debug;

use winapi::{
    shared::{
        guiddef::GUID,
        minwindef::DWORD,
        winerror::ERROR_INSUFFICIENT_BUFFER,
    },
    um::{
        errhandlingapi::GetLastError,
        handleapi::INVALID_HANDLE_VALUE,
        setupapi::{
            SetupDiDestroyDeviceInfoList, SetupDiEnumDeviceInterfaces,
            SetupDiGetClassDevsA, SetupDiGetDeviceInterfaceDetailA, DIGCF_DEVICEINTERFACE,
            DIGCF_PRESENT, HDEVINFO, SP_DEVICE_INTERFACE_DATA, SP_DEVICE_INTERFACE_DETAIL_DATA_A,
        },
    },
};

use super::{InterfaceSet, TapeSystem};
use crate::error::{LtfsCmdError, Result};
use crate::scsi::{open_device, ScsiDevice};

/// GUID_DEVINTERFACE_TAPE {53F5630B-B6BF-11D0-94F2-00A0C91EFB8B}
const GUID_DEVINTERFACE_TAPE: GUID = GUID {
    Data1: 0x53f5_630b,
    Data2: 0xb6bf,
    Data3: 0x11d0,
    Data4: [0x94, 0xf2, 0x00, 0xa0, 0xc9, 0x1e, 0xfb, 0x8b],
};

#[derive(Debug, Default)]
pub struct WindowsTapeSystem;

impl WindowsTapeSystem {
    pub fn new() -> Self {
        Self
    }
}

impl TapeSystem for WindowsTapeSystem {
    fn tape_interfaces(&self) -> Result<Box<dyn InterfaceSet + '_>> {
        let dev_info = unsafe {
            SetupDiGetClassDevsA(
                &GUID_DEVINTERFACE_TAPE,
                std::ptr::null(),
                std::ptr::null_mut(),
                DIGCF_DEVICEINTERFACE | DIGCF_PRESENT,
            )
        };

        if dev_info == INVALID_HANDLE_VALUE {
            let error_code = unsafe { GetLastError() };
            return Err(LtfsCmdError::system(format!(
                "SetupDiGetClassDevs failed: Windows error code 0x{:08X}",
                error_code
            )));
        }

        Ok(Box::new(TapeInterfaceSet { dev_info }))
    }

    fn open(&self, device_path: &str) -> Result<Box<dyn ScsiDevice>> {
        Ok(Box::new(open_device(device_path)?))
    }
}

/// Device information set for the tape interface class
struct TapeInterfaceSet {
    dev_info: HDEVINFO,
}

impl TapeInterfaceSet {
    /// Two-step detail query: ask for the required size, then fill a buffer of that size.
    fn resolve_path(&self, interface_data: &mut SP_DEVICE_INTERFACE_DATA) -> Result<String> {
        let mut required_size: DWORD = 0;

        unsafe {
            SetupDiGetDeviceInterfaceDetailA(
                self.dev_info,
                interface_data,
                std::ptr::null_mut(),
                0,
                &mut required_size,
                std::ptr::null_mut(),
            );

            let error_code = GetLastError();
            if required_size == 0 || error_code != ERROR_INSUFFICIENT_BUFFER {
                return Err(LtfsCmdError::system(format!(
                    "Interface detail size query failed: Windows error code 0x{:08X}",
                    error_code
                )));
            }
        }

        // u32 storage keeps the detail structure aligned
        let words = (required_size as usize + 3) / 4;
        let mut buffer = vec![0u32; words.max(2)];
        let detail = buffer.as_mut_ptr() as *mut SP_DEVICE_INTERFACE_DETAIL_DATA_A;

        unsafe {
            (*detail).cbSize = std::mem::size_of::<SP_DEVICE_INTERFACE_DETAIL_DATA_A>() as DWORD;

            let ok = SetupDiGetDeviceInterfaceDetailA(
                self.dev_info,
                interface_data,
                detail,
                required_size,
                &mut required_size,
                std::ptr::null_mut(),
            );

            if ok == 0 {
                let error_code = GetLastError();
                return Err(LtfsCmdError::system(format!(
                    "Interface detail query failed: Windows error code 0x{:08X}",
                    error_code
                )));
            }

            let path = CStr::from_ptr((*detail).DevicePath.as_ptr());
            Ok(path.to_string_lossy().into_owned())
        }
    }
}

impl InterfaceSet for TapeInterfaceSet {
    fn device_path(&mut self, index: u32) -> Option<Result<String>> {
        let mut interface_data: SP_DEVICE_INTERFACE_DATA = unsafe { std::mem::zeroed() };
        interface_data.cbSize = std::mem::size_of::<SP_DEVICE_INTERFACE_DATA>() as DWORD;

        let present = unsafe {
            SetupDiEnumDeviceInterfaces(
                self.dev_info,
                std::ptr::null_mut(),
                &GUID_DEVINTERFACE_TAPE,
                index,
                &mut interface_data,
            ) != 0
        };

        if !present {
            debug!("No tape interface at index {}", index);
            return None;
        }

        Some(self.resolve_path(&mut interface_data))
    }
}

impl Drop for TapeInterfaceSet {
    fn drop(&mut self) {
        unsafe {
            SetupDiDestroyDeviceInfoList(self.dev_info);
        }
        debug!("Tape interface set released");
    }
}
