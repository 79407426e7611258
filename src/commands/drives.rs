//! `listdrives` Command Handler

use tracing::info;

use super::Context;
use crate::error::Result;
use crate::tape::{enumerate_tape_devices, EnumerationReport};

pub fn list_drives(ctx: &Context, json: bool) -> Result<()> {
    info!("Scanning tape devices");

    let report = enumerate_tape_devices(ctx.tapes)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&report.devices)?);
    } else {
        print!("{}", render_drive_list(&report));
    }

    Ok(())
}

/// The header is printed whenever an interface was visited, even if none
/// of them could be identified.
pub fn render_drive_list(report: &EnumerationReport) -> String {
    if !report.any_found() {
        return "\nNo tape drives found.\n".to_string();
    }

    let mut out = String::from("\nCurrently attached tape drives:\n\n");
    for drive in &report.devices {
        out.push_str(&drive.to_string());
        out.push('\n');
    }
    out
}
