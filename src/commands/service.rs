//! `start` / `stop` Command Handlers

use tracing::info;

use super::Context;
use crate::error::{LtfsCmdError, Result};

pub fn start_service(ctx: &Context) -> Result<()> {
    ctx.service
        .start()
        .map_err(|e| LtfsCmdError::service(format!("Failed to start service: {}", e)))?;
    info!("Service {} started", ctx.config.service_name);
    Ok(())
}

pub fn stop_service(ctx: &Context) -> Result<()> {
    ctx.service
        .stop()
        .map_err(|e| LtfsCmdError::service(format!("Failed to stop service: {}", e)))?;
    info!("Service {} stopped", ctx.config.service_name);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::testing::Harness;
    use crate::tape::fake::FakeTapeSystem;

    #[test]
    fn test_start_and_stop() {
        let mut harness = Harness::new(FakeTapeSystem::new(vec![]));
        start_service(&harness.context()).unwrap();
        stop_service(&harness.context()).unwrap();
        assert_eq!(harness.service_calls(), vec!["start", "stop"]);
    }

    #[test]
    fn test_start_failure_is_reported() {
        let mut harness = Harness::new(FakeTapeSystem::new(vec![]));
        harness.service.fail_start = true;
        let err = start_service(&harness.context()).unwrap_err();
        assert!(err.to_string().contains("Failed to start service"));
    }
}
