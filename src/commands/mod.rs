//! Command Handlers Module
//!
//! This module contains handlers for all CLI subcommands. Handlers reach the
//! host only through the collaborators bundled in [`Context`].

use std::path::Path;
use tracing::debug;

use crate::config::Config;
use crate::error::{LtfsCmdError, Result};
use crate::mapping::{DriveLetter, MappingStore};
use crate::service::ServiceControl;
use crate::tape::TapeSystem;

pub mod drives;
pub mod mappings;
pub mod media;
pub mod service;

pub struct Context<'a> {
    pub config: &'a Config,
    pub tapes: &'a dyn TapeSystem,
    pub mappings: &'a mut dyn MappingStore,
    pub service: &'a dyn ServiceControl,
}

/// A mapped drive letter answers an open once the filesystem service has
/// mounted the tape. Opening it also prompts the service to read the tape.
pub fn volume_online(tapes: &dyn TapeSystem, letter: DriveLetter) -> bool {
    let online = tapes.open(&letter.volume_path()).is_ok();
    debug!("Volume {} online: {}", letter, online);
    online
}

/// Refuse to run unelevated, then load the configuration
pub fn prepare(elevated: bool, config_path: Option<&Path>) -> Result<Config> {
    if !elevated {
        return Err(LtfsCmdError::system("This process requires elevation"));
    }
    Config::load(config_path)
}
