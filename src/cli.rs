use clap::{Parser, Subcommand};
use std::path::PathBuf;

use crate::mapping::DriveLetter;
use crate::tape::TapeName;

#[derive(Parser)]
#[command(name = "ltfscmd")]
#[command(about = "Command line LTFS configurator for Windows")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Emit logs as JSON
    #[arg(long, global = true)]
    pub log_json: bool,

    /// Specify configuration file path
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// List attached tape drives
    #[command(name = "listdrives")]
    ListDrives {
        /// Print the drive list as JSON
        #[arg(long)]
        json: bool,
    },

    /// List drive letter mappings
    #[command(name = "listmappings")]
    ListMappings,

    /// Map a drive letter to a tape drive
    Map {
        /// Drive letter, e.g. T:
        #[arg(short = 'd', long = "drive", value_name = "DRIVE:", value_parser = parse_drive_letter)]
        drive: DriveLetter,

        /// Tape device name from `listdrives`, e.g. TAPE0
        #[arg(short = 't', long = "tape", value_name = "TAPEn", value_parser = parse_tape_name)]
        tape: TapeName,

        /// Show all files as online (not recommended)
        #[arg(short = 'n', long = "all-online")]
        all_online: bool,

        /// Override the LTFS log directory
        #[arg(short = 'l', long = "log-dir")]
        log_dir: Option<PathBuf>,

        /// Override the LTFS working directory
        #[arg(short = 'w', long = "work-dir")]
        work_dir: Option<PathBuf>,
    },

    /// Remove a drive letter mapping
    Unmap {
        #[arg(short = 'd', long = "drive", value_name = "DRIVE:", value_parser = parse_drive_letter)]
        drive: DriveLetter,
    },

    /// Repair mappings whose tape device index changed
    Remap,

    /// Start the LTFS filesystem service
    Start,

    /// Stop the LTFS filesystem service
    Stop,

    /// Physically load tape and mount the filesystem
    Load {
        #[arg(short = 'd', long = "drive", value_name = "DRIVE:", value_parser = parse_drive_letter)]
        drive: DriveLetter,
    },

    /// Physically load tape without mounting the filesystem
    #[command(name = "loadonly")]
    LoadOnly {
        #[arg(short = 'd', long = "drive", value_name = "DRIVE:", value_parser = parse_drive_letter)]
        drive: DriveLetter,
    },

    /// Mount the filesystem of a loaded tape
    Mount {
        #[arg(short = 'd', long = "drive", value_name = "DRIVE:", value_parser = parse_drive_letter)]
        drive: DriveLetter,
    },

    /// Unmount the filesystem and physically eject the tape
    Eject {
        #[arg(short = 'd', long = "drive", value_name = "DRIVE:", value_parser = parse_drive_letter)]
        drive: DriveLetter,
    },
}

impl Cli {
    pub fn parse_args() -> Self {
        Self::parse()
    }
}

fn parse_drive_letter(s: &str) -> Result<DriveLetter, String> {
    s.parse().map_err(|e: crate::error::LtfsCmdError| e.to_string())
}

fn parse_tape_name(s: &str) -> Result<TapeName, String> {
    s.parse().map_err(|e: crate::error::LtfsCmdError| e.to_string())
}
