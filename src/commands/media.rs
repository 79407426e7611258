//! Media Command Handlers
//!
//! `load`, `loadonly`, `mount` and `eject` act on the tape behind a mapped
//! drive letter.

use tracing::info;

use super::{volume_online, Context};
use crate::error::{LtfsCmdError, Result};
use crate::mapping::DriveLetter;
use crate::tape::{eject_tape, load_tape};

fn mapped_device(ctx: &Context, drive: DriveLetter) -> Result<String> {
    ctx.mappings
        .get(drive)?
        .map(|m| m.device_name)
        .ok_or_else(|| LtfsCmdError::mapping(format!("Mapping for {} does not exist", drive)))
}

fn require_online(ctx: &Context, drive: DriveLetter) -> Result<()> {
    if volume_online(ctx.tapes, drive) {
        Ok(())
    } else {
        Err(LtfsCmdError::tape_device(
            "Cannot start file system. LTFS not running",
        ))
    }
}

/// Load the tape behind `drive`. With `mount`, the mapped volume must then
/// answer an open.
pub fn load_drive(ctx: &Context, drive: DriveLetter, mount: bool) -> Result<()> {
    let device_name = mapped_device(ctx, drive)?;

    load_tape(ctx.tapes, &device_name)?;
    info!("Tape loaded in {} ({})", device_name, drive);

    if mount {
        require_online(ctx, drive)?;
    }

    Ok(())
}

pub fn mount_drive(ctx: &Context, drive: DriveLetter) -> Result<()> {
    require_online(ctx, drive)
}

pub fn eject_drive(ctx: &Context, drive: DriveLetter) -> Result<()> {
    let device_name = mapped_device(ctx, drive)?;

    eject_tape(ctx.tapes, &device_name)
        .map_err(|e| LtfsCmdError::tape_device(format!("Failed to eject tape: {}", e)))?;
    info!("Tape ejected from {} ({})", device_name, drive);

    // The service refreshes the volume when it is touched after an eject
    require_online(ctx, drive)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::mappings::{map_drive, MapRequest};
    use crate::commands::testing::Harness;
    use crate::mapping::MappingStore;
    use crate::scsi::VolumeControl;
    use crate::tape::{
        fake::{Event, FakeInterface, FakeTapeSystem},
        TapeName,
    };

    fn letter(c: char) -> DriveLetter {
        DriveLetter::new(c).unwrap()
    }

    /// Drive reachable both by interface path and by `\\.\TAPE0`
    fn mapped_harness(configure: impl FnOnce(&mut FakeInterface)) -> Harness {
        let mut named = FakeInterface::drive(r"\\.\TAPE0", 0, "HP", "Ultrium 6", "ABC123");
        configure(&mut named);
        let mut harness = Harness::new(FakeTapeSystem::new(vec![named]));
        map_drive(
            &mut harness.context(),
            MapRequest {
                drive: letter('T'),
                tape: TapeName(0),
                show_offline: true,
                log_dir: None,
                work_dir: None,
            },
        )
        .unwrap();
        assert_eq!(harness.store.mapping_count().unwrap(), 1);
        harness
    }

    #[test]
    fn test_load_and_mount() {
        let mut harness = mapped_harness(|_| {});
        harness.tapes.set_volume_online('T');
        load_drive(&harness.context(), letter('T'), true).unwrap();
        assert!(harness
            .tapes
            .issued_cdbs()
            .contains(&vec![0x1B, 0, 0, 0, 0x01, 0]));
    }

    #[test]
    fn test_load_without_service() {
        let mut harness = mapped_harness(|_| {});
        let err = load_drive(&harness.context(), letter('T'), true).unwrap_err();
        assert!(err.to_string().contains("LTFS not running"));

        // loadonly does not care
        load_drive(&harness.context(), letter('T'), false).unwrap();
    }

    #[test]
    fn test_load_unmapped_letter() {
        let mut harness = mapped_harness(|_| {});
        let err = load_drive(&harness.context(), letter('U'), false).unwrap_err();
        assert!(err.to_string().contains("Mapping for U: does not exist"));
    }

    #[test]
    fn test_load_failure_propagates() {
        let mut harness = mapped_harness(|d| d.load_ok = false);
        assert!(load_drive(&harness.context(), letter('T'), false).is_err());
        assert_eq!(
            harness.tapes.events().last(),
            Some(&Event::Close(r"\\.\TAPE0".to_string()))
        );
    }

    #[test]
    fn test_eject_failure() {
        let mut harness = mapped_harness(|d| d.eject_ok = false);
        harness.tapes.set_volume_online('T');
        let err = eject_drive(&harness.context(), letter('T')).unwrap_err();
        assert!(err.to_string().contains("Failed to eject tape"));
        assert!(harness
            .tapes
            .events()
            .contains(&Event::Volume(VolumeControl::Dismount)));
    }

    #[test]
    fn test_eject_then_poll() {
        let mut harness = mapped_harness(|_| {});
        harness.tapes.set_volume_online('T');
        eject_drive(&harness.context(), letter('T')).unwrap();
    }

    #[test]
    fn test_mount() {
        let mut harness = mapped_harness(|_| {});
        assert!(mount_drive(&harness.context(), letter('T')).is_err());
        harness.tapes.set_volume_online('T');
        assert!(mount_drive(&harness.context(), letter('T')).is_ok());
    }
}
