//! Mapping Command Handlers
//!
//! `listmappings`, `map`, `unmap` and `remap`. Every change to the mapping
//! store is followed by a service restart so the filesystem service sees it.

use chrono::Utc;
use std::path::PathBuf;
use tracing::{error, info, warn};

use super::{volume_online, Context};
use crate::error::{LtfsCmdError, Result};
use crate::mapping::{DriveLetter, DriveMapping, MappingStore};
use crate::tape::{enumerate_tape_devices, TapeName};

pub fn list_mappings(ctx: &Context) -> Result<()> {
    let mappings = ctx
        .mappings
        .mappings()
        .map_err(|e| LtfsCmdError::mapping(format!("Failed to get mappings: {}", e)))?;

    print!("{}", render_mappings(&mappings));
    Ok(())
}

pub fn render_mappings(mappings: &[DriveMapping]) -> String {
    if mappings.is_empty() {
        return "\nNo mappings found.\n".to_string();
    }

    let mut out = String::from("\nCurrent drive mappings:\n\n");
    for mapping in mappings {
        out.push_str(&mapping.to_string());
        out.push('\n');
    }
    out
}

pub struct MapRequest {
    pub drive: DriveLetter,
    pub tape: TapeName,
    pub show_offline: bool,
    pub log_dir: Option<PathBuf>,
    pub work_dir: Option<PathBuf>,
}

pub fn map_drive(ctx: &mut Context, request: MapRequest) -> Result<()> {
    let MapRequest {
        drive,
        tape,
        show_offline,
        log_dir,
        work_dir,
    } = request;

    if volume_online(ctx.tapes, drive) {
        return Err(LtfsCmdError::mapping(format!(
            "Drive letter {} already in use",
            drive
        )));
    }

    let report = enumerate_tape_devices(ctx.tapes)?;
    if !report.any_found() {
        return Err(LtfsCmdError::tape_device("No tape drives found"));
    }

    let device = report
        .find(tape.index())
        .ok_or_else(|| LtfsCmdError::tape_device(format!("Drive {} not found", tape)))?;

    if ctx.mappings.get(drive)?.is_some() {
        return Err(LtfsCmdError::mapping(format!(
            "Mapping for {} already exists",
            drive
        )));
    }

    let mapping = DriveMapping {
        drive_letter: drive,
        device_name: tape.to_string(),
        serial_number: device.serial_number.clone(),
        log_dir: log_dir.unwrap_or_else(|| ctx.config.log_dir.clone()),
        work_dir: work_dir.unwrap_or_else(|| ctx.config.work_dir.clone()),
        show_offline,
        created: Utc::now(),
        updated: None,
    };

    ctx.mappings
        .create(mapping)
        .map_err(|e| LtfsCmdError::mapping(format!("Failed to create mapping: {}", e)))?;

    restart_service(ctx)?;

    info!("Mapped {} to {}", drive, tape);
    Ok(())
}

pub fn unmap_drive(ctx: &mut Context, drive: DriveLetter) -> Result<()> {
    let count = ctx.mappings.mapping_count()?;
    if count == 0 {
        return Err(LtfsCmdError::mapping("No drives currently mapped"));
    }

    ctx.mappings
        .remove(drive)
        .map_err(|e| LtfsCmdError::mapping(format!("Failed to remove mapping: {}", e)))?;

    ctx.service
        .stop()
        .map_err(|e| LtfsCmdError::service(format!("Failed to stop LTFS service: {}", e)))?;

    if count > 1 {
        ctx.service
            .start()
            .map_err(|e| LtfsCmdError::service(format!("Failed to start LTFS service: {}", e)))?;
    }

    info!("Unmapped {}", drive);
    Ok(())
}

/// Point every mapping at the device name its drive's serial number now
/// carries. Returns the number of mappings changed.
pub fn remap_drives(ctx: &mut Context) -> Result<usize> {
    let report = enumerate_tape_devices(ctx.tapes)?;
    if !report.any_found() {
        return Err(LtfsCmdError::tape_device("No tape drives found"));
    }

    let mappings = ctx.mappings.mappings()?;
    let mut changes = 0usize;
    let mut failures = 0usize;

    for drive in &report.devices {
        let device_name = drive.tape_name().to_string();

        for mapping in mappings
            .iter()
            .filter(|m| m.serial_number == drive.serial_number && m.device_name != device_name)
        {
            match ctx.mappings.update_device(mapping.drive_letter, &device_name) {
                Ok(()) => {
                    println!(
                        "{} {} [{}] -> {}",
                        mapping.drive_letter, mapping.device_name, mapping.serial_number, device_name
                    );
                    changes += 1;
                }
                Err(e) => {
                    error!(
                        "Failed to update existing mapping for {}: {}",
                        mapping.drive_letter, e
                    );
                    failures += 1;
                }
            }
        }
    }

    println!("\n{} mapping(s) updated.", changes);

    if changes > 0 {
        restart_service(ctx)?;
    }

    if failures > 0 {
        warn!("{} mapping update(s) failed", failures);
        return Err(LtfsCmdError::mapping(format!(
            "{} mapping update(s) failed",
            failures
        )));
    }

    Ok(changes)
}

fn restart_service(ctx: &Context) -> Result<()> {
    ctx.service
        .stop()
        .map_err(|e| LtfsCmdError::service(format!("Failed to stop LTFS service: {}", e)))?;
    ctx.service
        .start()
        .map_err(|e| LtfsCmdError::service(format!("Failed to start LTFS service: {}", e)))
}
