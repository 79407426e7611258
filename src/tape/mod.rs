//! Tape Drive Discovery and Media Control
//!
//! - `enumerate`: walk tape-class device interfaces and identify each drive
//! - `media`: load and eject
//! - `windows`: SetupAPI-backed [`TapeSystem`]

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::{LtfsCmdError, Result};
use crate::scsi::ScsiDevice;

pub mod enumerate;
pub mod media;

#[cfg(windows)]
mod windows;

#[cfg(test)]
pub(crate) mod fake;

pub use enumerate::{enumerate_tape_devices, EnumerationReport, SkipReason, SkippedInterface};
pub use media::{eject_tape, load_tape};

#[cfg(windows)]
pub use windows::WindowsTapeSystem;

/// Prefix turning a device name into an openable path
pub const DEVICE_PATH_PREFIX: &str = r"\\.\";

/// Present tape-class device interfaces. Dropping the set releases it.
pub trait InterfaceSet {
    /// Resolve the interface at `index` to a device path.
    ///
    /// `None` ends the enumeration. `Some(Err(_))` means an interface exists
    /// at `index` but its path could not be resolved.
    fn device_path(&mut self, index: u32) -> Option<Result<String>>;
}

/// Host facilities the tape layer consumes
pub trait TapeSystem {
    fn tape_interfaces(&self) -> Result<Box<dyn InterfaceSet + '_>>;

    fn open(&self, device_path: &str) -> Result<Box<dyn ScsiDevice>>;
}

/// The platform tape system
pub fn platform_system() -> Result<Box<dyn TapeSystem>> {
    #[cfg(windows)]
    {
        Ok(Box::new(WindowsTapeSystem::new()))
    }

    #[cfg(not(windows))]
    {
        Err(LtfsCmdError::unsupported("Non-Windows platform"))
    }
}

/// One drive that answered both identification inquiries
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TapeDeviceInfo {
    pub device_index: u32,
    pub vendor_id: String,
    pub product_id: String,
    #[serde(default)]
    pub product_revision: String,
    pub serial_number: String,
    pub device_path: String,
}

impl TapeDeviceInfo {
    pub fn tape_name(&self) -> TapeName {
        TapeName(self.device_index)
    }
}

impl fmt::Display for TapeDeviceInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}: [{}] {} {}",
            self.tape_name(),
            self.serial_number,
            self.vendor_id,
            self.product_id
        )
    }
}

/// Logical tape device name, `TAPE<n>`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TapeName(pub u32);

impl TapeName {
    pub fn index(&self) -> u32 {
        self.0
    }

    /// `\\.\TAPE<n>`
    pub fn device_path(&self) -> String {
        device_path_for(&self.to_string())
    }
}

impl fmt::Display for TapeName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "TAPE{}", self.0)
    }
}

impl FromStr for TapeName {
    type Err = LtfsCmdError;

    fn from_str(s: &str) -> Result<Self> {
        let upper = s.trim().to_ascii_uppercase();
        let digits = upper.strip_prefix("TAPE").ok_or_else(|| {
            LtfsCmdError::parameter_validation(format!(
                "Invalid format for tape drive argument: {}",
                s
            ))
        })?;

        if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
            return Err(LtfsCmdError::parameter_validation(format!(
                "Invalid tape drive index: {}",
                s
            )));
        }

        digits
            .parse::<u32>()
            .map(TapeName)
            .map_err(|e| LtfsCmdError::parameter_validation(format!("Invalid tape drive index: {}", e)))
    }
}

/// Build the openable path for a device or volume name (`TAPE0`, `T:`)
pub fn device_path_for(name: &str) -> String {
    if name.starts_with(DEVICE_PATH_PREFIX) {
        name.to_string()
    } else {
        format!("{}{}", DEVICE_PATH_PREFIX, name)
    }
}
