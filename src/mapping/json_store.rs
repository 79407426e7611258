use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use super::{DriveLetter, DriveMapping, MappingStore};
use crate::error::{LtfsCmdError, Result};

#[derive(Debug, Default, Serialize, Deserialize)]
struct MappingDocument {
    #[serde(default)]
    mappings: Vec<DriveMapping>,
}

/// Mapping store persisted as one JSON document. A missing file is an empty store.
#[derive(Debug, Clone)]
pub struct JsonMappingStore {
    path: PathBuf,
}

impl JsonMappingStore {
    pub fn new<P: Into<PathBuf>>(path: P) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn load(&self) -> Result<MappingDocument> {
        if !self.path.exists() {
            debug!("Mapping file {} not found, starting empty", self.path.display());
            return Ok(MappingDocument::default());
        }

        let content = fs::read_to_string(&self.path)?;
        let mut document: MappingDocument = serde_json::from_str(&content).map_err(|e| {
            LtfsCmdError::mapping(format!(
                "Cannot parse mapping file {}: {}",
                self.path.display(),
                e
            ))
        })?;
        document.mappings.sort_by_key(|m| m.drive_letter);
        Ok(document)
    }

    /// Write through a sibling temp file so a failed write never truncates the store
    fn save(&self, document: &MappingDocument) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }

        let content = serde_json::to_string_pretty(document)?;
        let tmp_path = self.path.with_extension("json.tmp");
        fs::write(&tmp_path, content)?;
        fs::rename(&tmp_path, &self.path)?;

        debug!(
            "Saved {} mapping(s) to {}",
            document.mappings.len(),
            self.path.display()
        );
        Ok(())
    }
}

impl MappingStore for JsonMappingStore {
    fn mappings(&self) -> Result<Vec<DriveMapping>> {
        Ok(self.load()?.mappings)
    }

    fn get(&self, letter: DriveLetter) -> Result<Option<DriveMapping>> {
        Ok(self
            .load()?
            .mappings
            .into_iter()
            .find(|m| m.drive_letter == letter))
    }

    fn create(&mut self, mapping: DriveMapping) -> Result<()> {
        let mut document = self.load()?;
        if document
            .mappings
            .iter()
            .any(|m| m.drive_letter == mapping.drive_letter)
        {
            return Err(LtfsCmdError::mapping(format!(
                "Mapping for {} already exists",
                mapping.drive_letter
            )));
        }

        info!("Creating mapping {}", mapping);
        document.mappings.push(mapping);
        document.mappings.sort_by_key(|m| m.drive_letter);
        self.save(&document)
    }

    fn remove(&mut self, letter: DriveLetter) -> Result<()> {
        let mut document = self.load()?;
        let before = document.mappings.len();
        document.mappings.retain(|m| m.drive_letter != letter);

        if document.mappings.len() == before {
            return Err(LtfsCmdError::mapping(format!(
                "Mapping for {} does not exist",
                letter
            )));
        }

        info!("Removed mapping for {}", letter);
        self.save(&document)
    }

    fn update_device(&mut self, letter: DriveLetter, device_name: &str) -> Result<()> {
        let mut document = self.load()?;
        let mapping = document
            .mappings
            .iter_mut()
            .find(|m| m.drive_letter == letter)
            .ok_or_else(|| {
                LtfsCmdError::mapping(format!("Mapping for {} does not exist", letter))
            })?;

        mapping.device_name = device_name.to_string();
        mapping.updated = Some(Utc::now());
        self.save(&document)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn mapping(letter: char, device: &str, serial: &str) -> DriveMapping {
        DriveMapping {
            drive_letter: DriveLetter::new(letter).unwrap(),
            device_name: device.to_string(),
            serial_number: serial.to_string(),
            log_dir: PathBuf::from(r"C:\ProgramData\Hewlett-Packard\LTFS"),
            work_dir: PathBuf::from(r"C:\tmp\LTFS"),
            show_offline: true,
            created: Utc::now(),
            updated: None,
        }
    }

    fn store(dir: &TempDir) -> JsonMappingStore {
        JsonMappingStore::new(dir.path().join("nested").join("mappings.json"))
    }

    #[test]
    fn test_missing_file_is_empty() {
        let dir = TempDir::new().unwrap();
        let store = store(&dir);
        assert_eq!(store.mapping_count().unwrap(), 0);
        assert!(store.get(DriveLetter::new('T').unwrap()).unwrap().is_none());
    }

    #[test]
    fn test_create_get_and_order() {
        let dir = TempDir::new().unwrap();
        let mut store = store(&dir);
        store.create(mapping('T', "TAPE0", "ABC123")).unwrap();
        store.create(mapping('E', "TAPE1", "XYZ789")).unwrap();

        let letters: Vec<char> = store
            .mappings()
            .unwrap()
            .iter()
            .map(|m| m.drive_letter.as_char())
            .collect();
        assert_eq!(letters, vec!['E', 'T']);

        let t = store.get(DriveLetter::new('T').unwrap()).unwrap().unwrap();
        assert_eq!(t.device_name, "TAPE0");
        assert_eq!(t.serial_number, "ABC123");

        // reopen from disk
        let reopened = JsonMappingStore::new(store.path());
        assert_eq!(reopened.mapping_count().unwrap(), 2);
    }

    #[test]
    fn test_duplicate_create_rejected() {
        let dir = TempDir::new().unwrap();
        let mut store = store(&dir);
        store.create(mapping('T', "TAPE0", "ABC123")).unwrap();
        let err = store.create(mapping('T', "TAPE1", "XYZ789")).unwrap_err();
        assert!(matches!(err, LtfsCmdError::Mapping(_)));
    }

    #[test]
    fn test_remove() {
        let dir = TempDir::new().unwrap();
        let mut store = store(&dir);
        let letter = DriveLetter::new('T').unwrap();
        store.create(mapping('T', "TAPE0", "ABC123")).unwrap();

        store.remove(letter).unwrap();
        assert_eq!(store.mapping_count().unwrap(), 0);
        assert!(store.remove(letter).is_err());
    }

    #[test]
    fn test_update_device() {
        let dir = TempDir::new().unwrap();
        let mut store = store(&dir);
        let letter = DriveLetter::new('T').unwrap();
        store.create(mapping('T', "TAPE0", "ABC123")).unwrap();

        store.update_device(letter, "TAPE2").unwrap();
        let updated = store.get(letter).unwrap().unwrap();
        assert_eq!(updated.device_name, "TAPE2");
        assert!(updated.updated.is_some());

        assert!(store
            .update_device(DriveLetter::new('E').unwrap(), "TAPE1")
            .is_err());
    }

    #[test]
    fn test_corrupt_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("mappings.json");
        fs::write(&path, "{ not json").unwrap();
        let store = JsonMappingStore::new(&path);
        assert!(matches!(store.mappings(), Err(LtfsCmdError::Mapping(_))));
    }
}
