//! Tape Load / Eject

use tracing::{debug, info};

use super::{device_path_for, TapeSystem};
use crate::error::{LtfsCmdError, Result};
use crate::scsi::{issue_scsi_command, Cdb, DataDirection, VolumeControl, LOAD_TIMEOUT_SECS};

/// Physically load the tape in `device_name` (e.g. `TAPE0`)
pub fn load_tape(system: &dyn TapeSystem, device_name: &str) -> Result<()> {
    let path = device_path_for(device_name);
    info!("Loading tape: {}", device_name);

    let mut device = system.open(&path)?;

    let loaded = issue_scsi_command(
        device.as_mut(),
        &Cdb::load(),
        None,
        DataDirection::Unspecified,
        LOAD_TIMEOUT_SECS,
    )?;

    if !loaded {
        return Err(LtfsCmdError::scsi(format!(
            "LOAD command failed on {}",
            device_name
        )));
    }

    debug!("Tape loaded: {}", device_name);
    Ok(())
}

/// Lock, dismount and eject. Stops at the first step that fails.
pub fn eject_tape(system: &dyn TapeSystem, device_name: &str) -> Result<()> {
    let path = device_path_for(device_name);
    info!("Ejecting tape: {}", device_name);

    let mut device = system.open(&path)?;

    for control in [
        VolumeControl::Lock,
        VolumeControl::Dismount,
        VolumeControl::EjectMedia,
    ] {
        if !device.volume_control(control)? {
            return Err(LtfsCmdError::tape_device(format!(
                "{} failed on {}",
                control.description(),
                device_name
            )));
        }
        debug!("{} succeeded on {}", control.description(), device_name);
    }

    Ok(())
}
