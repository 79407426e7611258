//! ltfscmd Library
//!
//! Tape drive discovery and identification over SCSI pass-through, plus the
//! drive-letter mapping, media and service control used by the `ltfscmd`
//! configurator.

pub mod cli;
pub mod commands;
pub mod config;
pub mod error;
pub mod logger;
pub mod mapping;
pub mod scsi;
pub mod service;
pub mod system;
pub mod tape;

// Re-export key types for easier use
pub use config::Config;
pub use error::{LtfsCmdError, Result};
pub use mapping::{DriveLetter, DriveMapping, JsonMappingStore, MappingStore};
pub use scsi::{Cdb, DataDirection, InquiryData, ScsiDevice, UnitSerialNumberPage, VolumeControl};
pub use tape::{
    eject_tape, enumerate_tape_devices, load_tape, EnumerationReport, TapeDeviceInfo, TapeName,
    TapeSystem,
};
