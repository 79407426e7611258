//! Tape Device Enumeration
//!
//! Every present tape interface is opened in turn and identified with a
//! standard INQUIRY and a unit serial number INQUIRY. A failing interface is
//! recorded in the report and the scan moves on.

use thiserror::Error;
use tracing::{debug, info};

use super::{InterfaceSet, TapeDeviceInfo, TapeSystem};
use crate::error::{LtfsCmdError, Result};
use crate::scsi::{
    issue_scsi_command, Cdb, DataDirection, InquiryData, ScsiDevice, UnitSerialNumberPage,
    ENUM_BUFFER_LEN, INQUIRY_TIMEOUT_SECS, MODE_SENSE_ALLOCATION_LEN, TC_MP_MEDIUM_PARTITION,
    TC_MP_PC_CURRENT,
};

/// Why an interface produced no [`TapeDeviceInfo`]
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SkipReason {
    #[error("device path could not be resolved: {0}")]
    PathUnresolved(String),

    #[error("open failed: {0}")]
    OpenFailed(String),

    #[error("device number unavailable: {0}")]
    DeviceNumberUnavailable(String),

    #[error("standard INQUIRY failed")]
    InquiryFailed,

    #[error("unit serial number INQUIRY failed")]
    SerialNumberFailed,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedInterface {
    pub interface_index: u32,
    pub device_path: Option<String>,
    pub reason: SkipReason,
}

/// Outcome of one scan
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EnumerationReport {
    /// Identified drives in interface order
    pub devices: Vec<TapeDeviceInfo>,
    /// Interface indices the OS reported, resolved or not
    pub interfaces_visited: u32,
    pub skipped: Vec<SkippedInterface>,
}

impl EnumerationReport {
    /// True once any interface was visited, even if no drive could be
    /// identified on it. Use [`devices_enumerated`](Self::devices_enumerated)
    /// to count identified drives.
    pub fn any_found(&self) -> bool {
        self.interfaces_visited > 0
    }

    pub fn devices_enumerated(&self) -> usize {
        self.devices.len()
    }

    pub fn find(&self, device_index: u32) -> Option<&TapeDeviceInfo> {
        self.devices.iter().find(|d| d.device_index == device_index)
    }
}

/// Scan all present tape interfaces.
///
/// Only a failure to obtain the interface set itself is an error; everything
/// that goes wrong on an individual interface lands in `skipped`.
pub fn enumerate_tape_devices(system: &dyn TapeSystem) -> Result<EnumerationReport> {
    debug!("Enumerating tape device interfaces");

    let mut interfaces = system.tape_interfaces().map_err(|e| {
        LtfsCmdError::tape_device(format!("Tape interface enumeration failed: {}", e))
    })?;

    let report = scan_interfaces(system, interfaces.as_mut());
    drop(interfaces);

    info!(
        "Tape enumeration finished: {} interface(s) visited, {} drive(s) identified",
        report.interfaces_visited,
        report.devices_enumerated()
    );

    Ok(report)
}

fn scan_interfaces(system: &dyn TapeSystem, interfaces: &mut dyn InterfaceSet) -> EnumerationReport {
    let mut report = EnumerationReport::default();
    let mut index = 0u32;

    while let Some(resolved) = interfaces.device_path(index) {
        report.interfaces_visited += 1;

        let outcome = match resolved {
            Ok(path) => probe_interface(system, &path)
                .map_err(|reason| (Some(path), reason)),
            Err(e) => Err((None, SkipReason::PathUnresolved(e.to_string()))),
        };

        match outcome {
            Ok(info) => {
                debug!("Interface {}: {}", index, info);
                report.devices.push(info);
            }
            Err((device_path, reason)) => {
                debug!(
                    "Interface {} ({}) skipped: {}",
                    index,
                    device_path.as_deref().unwrap_or("<unresolved>"),
                    reason
                );
                report.skipped.push(SkippedInterface {
                    interface_index: index,
                    device_path,
                    reason,
                });
            }
        }

        index += 1;
    }

    report
}

/// Open one interface and identify the drive behind it. The handle is closed
/// when this returns.
fn probe_interface(
    system: &dyn TapeSystem,
    device_path: &str,
) -> std::result::Result<TapeDeviceInfo, SkipReason> {
    let mut device = system
        .open(device_path)
        .map_err(|e| SkipReason::OpenFailed(e.to_string()))?;

    identify_device(device.as_mut())
}

fn identify_device(device: &mut dyn ScsiDevice) -> std::result::Result<TapeDeviceInfo, SkipReason> {
    let device_index = device
        .storage_device_number()
        .map_err(|e| SkipReason::DeviceNumberUnavailable(e.to_string()))?;

    let mut data_buffer = [0u8; ENUM_BUFFER_LEN];

    let inquiry = Cdb::standard_inquiry(ENUM_BUFFER_LEN as u16);
    if !issue_data_in(device, &inquiry, &mut data_buffer) {
        return Err(SkipReason::InquiryFailed);
    }
    let identity = InquiryData::parse(&data_buffer);
    debug!(
        "{}: peripheral device type 0x{:02X}, revision {}",
        device.device_path(),
        identity.peripheral_device_type,
        identity.product_revision.trim_end()
    );

    data_buffer.fill(0);
    let serial_inquiry = Cdb::serial_number_inquiry(ENUM_BUFFER_LEN as u16);
    if !issue_data_in(device, &serial_inquiry, &mut data_buffer) {
        return Err(SkipReason::SerialNumberFailed);
    }
    let serial_page = UnitSerialNumberPage::parse(&data_buffer);

    // Medium partition page. Read for LTFS capability checks, not interpreted yet.
    data_buffer.fill(0);
    let mode_sense = Cdb::mode_sense(
        TC_MP_MEDIUM_PARTITION,
        TC_MP_PC_CURRENT,
        MODE_SENSE_ALLOCATION_LEN,
    );
    let partition_page_read = issue_data_in(device, &mode_sense, &mut data_buffer);
    debug!(
        "MODE SENSE page 0x{:02X} on {}: {}",
        TC_MP_MEDIUM_PARTITION,
        device.device_path(),
        if partition_page_read { "ok" } else { "failed" }
    );

    Ok(TapeDeviceInfo {
        device_index,
        vendor_id: identity.vendor_id,
        product_id: identity.product_id,
        product_revision: identity.product_revision,
        serial_number: serial_page.serial_number,
        device_path: device.device_path().to_string(),
    })
}

fn issue_data_in(device: &mut dyn ScsiDevice, cdb: &Cdb, buffer: &mut [u8]) -> bool {
    match issue_scsi_command(
        device,
        cdb,
        Some(buffer),
        DataDirection::In,
        INQUIRY_TIMEOUT_SECS,
    ) {
        Ok(result) => result,
        Err(e) => {
            debug!("{} could not be issued: {}", cdb.name(), e);
            false
        }
    }
}
