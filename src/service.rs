//! Filesystem Service Control
//!
//! The LTFS filesystem service picks up mapping changes only on restart.

use crate::config::Config;
use crate::error::Result;

/// Start/stop of the background filesystem service
pub trait ServiceControl {
    /// Succeeds if the service is already running
    fn start(&self) -> Result<()>;

    /// Succeeds if the service is already stopped
    fn stop(&self) -> Result<()>;
}

/// The platform service controller for `config.service_name`
pub fn platform_service(config: &Config) -> Result<Box<dyn ServiceControl>> {
    #[cfg(windows)]
    {
        Ok(Box::new(windows::WindowsService::new(
            &config.service_name,
            std::time::Duration::from_secs(config.service_timeout_secs),
        )))
    }

    #[cfg(not(windows))]
    {
        let _ = config;
        Err(crate::error::LtfsCmdError::unsupported("Non-Windows platform"))
    }
}

#[cfg(windows)]
mod windows {
    use std::ffi::CString;
    use std::time::{Duration, Instant};
    use tracing::{debug, info};

    use winapi::{
        shared::{
            minwindef::DWORD,
            winerror::{ERROR_SERVICE_ALREADY_RUNNING, ERROR_SERVICE_NOT_ACTIVE},
        },
        um::{
            errhandlingapi::GetLastError,
            winsvc::{
                CloseServiceHandle, ControlService, OpenSCManagerA, OpenServiceA,
                QueryServiceStatus, StartServiceA, SC_HANDLE, SC_MANAGER_CONNECT,
                SERVICE_CONTROL_STOP, SERVICE_QUERY_STATUS, SERVICE_RUNNING, SERVICE_START,
                SERVICE_STATUS, SERVICE_STOP, SERVICE_STOPPED,
            },
        },
    };

    use super::ServiceControl;
    use crate::error::{LtfsCmdError, Result};

    const POLL_INTERVAL: Duration = Duration::from_millis(500);

    /// Closes an SCM or service handle on drop
    struct ScHandle(SC_HANDLE);

    impl Drop for ScHandle {
        fn drop(&mut self) {
            unsafe {
                CloseServiceHandle(self.0);
            }
        }
    }

    pub struct WindowsService {
        name: String,
        timeout: Duration,
    }

    impl WindowsService {
        pub fn new(name: &str, timeout: Duration) -> Self {
            Self {
                name: name.to_string(),
                timeout,
            }
        }

        /// Returns (manager, service); the manager must outlive the service handle.
        fn open(&self) -> Result<(ScHandle, ScHandle)> {
            let name = CString::new(self.name.as_str())
                .map_err(|e| LtfsCmdError::service(format!("Invalid service name: {}", e)))?;

            unsafe {
                let manager = OpenSCManagerA(std::ptr::null(), std::ptr::null(), SC_MANAGER_CONNECT);
                if manager.is_null() {
                    return Err(last_error("Cannot open service control manager"));
                }
                let manager = ScHandle(manager);

                let service = OpenServiceA(
                    manager.0,
                    name.as_ptr(),
                    SERVICE_START | SERVICE_STOP | SERVICE_QUERY_STATUS,
                );
                if service.is_null() {
                    return Err(last_error(&format!("Cannot open service {}", self.name)));
                }

                Ok((manager, ScHandle(service)))
            }
        }

        fn current_state(&self, service: &ScHandle) -> Result<DWORD> {
            let mut status: SERVICE_STATUS = unsafe { std::mem::zeroed() };
            if unsafe { QueryServiceStatus(service.0, &mut status) } == 0 {
                return Err(last_error(&format!("Cannot query service {}", self.name)));
            }
            Ok(status.dwCurrentState)
        }

        fn wait_for_state(&self, service: &ScHandle, target: DWORD) -> Result<()> {
            let deadline = Instant::now() + self.timeout;
            loop {
                let state = self.current_state(service)?;
                if state == target {
                    return Ok(());
                }
                if Instant::now() >= deadline {
                    return Err(LtfsCmdError::service(format!(
                        "Timed out waiting for service {} (state {})",
                        self.name, state
                    )));
                }
                std::thread::sleep(POLL_INTERVAL);
            }
        }
    }

    impl ServiceControl for WindowsService {
        fn start(&self) -> Result<()> {
            let (_manager, service) = self.open()?;

            if self.current_state(&service)? == SERVICE_RUNNING {
                debug!("Service {} already running", self.name);
                return Ok(());
            }

            info!("Starting service {}", self.name);
            if unsafe { StartServiceA(service.0, 0, std::ptr::null_mut()) } == 0 {
                let error_code = unsafe { GetLastError() };
                if error_code != ERROR_SERVICE_ALREADY_RUNNING {
                    return Err(LtfsCmdError::service(format!(
                        "Cannot start service {}: Windows error code 0x{:08X}",
                        self.name, error_code
                    )));
                }
            }

            self.wait_for_state(&service, SERVICE_RUNNING)
        }

        fn stop(&self) -> Result<()> {
            let (_manager, service) = self.open()?;

            if self.current_state(&service)? == SERVICE_STOPPED {
                debug!("Service {} already stopped", self.name);
                return Ok(());
            }

            info!("Stopping service {}", self.name);
            let mut status: SERVICE_STATUS = unsafe { std::mem::zeroed() };
            if unsafe { ControlService(service.0, SERVICE_CONTROL_STOP, &mut status) } == 0 {
                let error_code = unsafe { GetLastError() };
                if error_code != ERROR_SERVICE_NOT_ACTIVE {
                    return Err(LtfsCmdError::service(format!(
                        "Cannot stop service {}: Windows error code 0x{:08X}",
                        self.name, error_code
                    )));
                }
            }

            self.wait_for_state(&service, SERVICE_STOPPED)
        }
    }

    fn last_error(context: &str) -> LtfsCmdError {
        let error_code = unsafe { GetLastError() };
        LtfsCmdError::service(format!(
            "{}: Windows error code 0x{:08X}",
            context, error_code
        ))
    }
}
