//! Drive Letter Mappings
//!
//! A mapping ties a drive letter to a tape device name and the serial number
//! of the drive that held that name when the mapping was made, so mappings
//! can be repaired when device numbers shift.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use crate::error::{LtfsCmdError, Result};

mod json_store;

pub use json_store::JsonMappingStore;

pub const MIN_DRIVE_LETTER: char = 'D';
pub const MAX_DRIVE_LETTER: char = 'Z';

/// A mappable drive letter, `D` to `Z`
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "char", into = "char")]
pub struct DriveLetter(char);

impl DriveLetter {
    pub fn new(letter: char) -> Result<Self> {
        let letter = letter.to_ascii_uppercase();
        if !(MIN_DRIVE_LETTER..=MAX_DRIVE_LETTER).contains(&letter) {
            return Err(LtfsCmdError::parameter_validation(format!(
                "Invalid drive letter: {}",
                letter
            )));
        }
        Ok(Self(letter))
    }

    pub fn as_char(&self) -> char {
        self.0
    }

    /// `\\.\X:`
    pub fn volume_path(&self) -> String {
        crate::tape::device_path_for(&self.to_string())
    }
}

impl TryFrom<char> for DriveLetter {
    type Error = LtfsCmdError;

    fn try_from(letter: char) -> Result<Self> {
        Self::new(letter)
    }
}

impl From<DriveLetter> for char {
    fn from(letter: DriveLetter) -> char {
        letter.0
    }
}

impl fmt::Display for DriveLetter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:", self.0)
    }
}

impl FromStr for DriveLetter {
    type Err = LtfsCmdError;

    /// Accepts `X:`
    fn from_str(s: &str) -> Result<Self> {
        let mut chars = s.chars();
        match (chars.next(), chars.next(), chars.next()) {
            (Some(letter), Some(':'), None) if letter.is_ascii_alphabetic() => Self::new(letter),
            _ => Err(LtfsCmdError::parameter_validation(format!(
                "Invalid format for drive letter argument: {}",
                s
            ))),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DriveMapping {
    pub drive_letter: DriveLetter,
    pub device_name: String,
    pub serial_number: String,
    pub log_dir: PathBuf,
    pub work_dir: PathBuf,
    pub show_offline: bool,
    pub created: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated: Option<DateTime<Utc>>,
}

impl fmt::Display for DriveMapping {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} [{}]",
            self.drive_letter, self.device_name, self.serial_number
        )
    }
}

/// Persisted drive-letter mappings
pub trait MappingStore {
    /// All mappings, ordered by drive letter
    fn mappings(&self) -> Result<Vec<DriveMapping>>;

    fn get(&self, letter: DriveLetter) -> Result<Option<DriveMapping>>;

    /// Fails if `mapping.drive_letter` is already mapped
    fn create(&mut self, mapping: DriveMapping) -> Result<()>;

    /// Fails if `letter` is not mapped
    fn remove(&mut self, letter: DriveLetter) -> Result<()>;

    fn update_device(&mut self, letter: DriveLetter, device_name: &str) -> Result<()>;

    fn mapping_count(&self) -> Result<usize> {
        Ok(self.mappings()?.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_drive_letter_parse() {
        assert_eq!("T:".parse::<DriveLetter>().unwrap().as_char(), 'T');
        assert_eq!("e:".parse::<DriveLetter>().unwrap().as_char(), 'E');
        assert!("T".parse::<DriveLetter>().is_err());
        assert!("TT".parse::<DriveLetter>().is_err());
        assert!("T:\\".parse::<DriveLetter>().is_err());
        assert!("1:".parse::<DriveLetter>().is_err());
    }

    #[test]
    fn test_drive_letter_range() {
        assert!("C:".parse::<DriveLetter>().is_err());
        assert!("A:".parse::<DriveLetter>().is_err());
        assert!("D:".parse::<DriveLetter>().is_ok());
        assert!("Z:".parse::<DriveLetter>().is_ok());
        assert!("z:".parse::<DriveLetter>().is_ok());
    }

    #[test]
    fn test_drive_letter_paths() {
        let letter = DriveLetter::new('t').unwrap();
        assert_eq!(letter.to_string(), "T:");
        assert_eq!(letter.volume_path(), r"\\.\T:");
    }

    #[test]
    fn test_drive_letter_serde() {
        let letter = DriveLetter::new('T').unwrap();
        assert_eq!(serde_json::to_string(&letter).unwrap(), "\"T\"");
        assert!(serde_json::from_str::<DriveLetter>("\"B\"").is_err());
    }
}
