//! Host Checks

use tracing::debug;

/// Whether the current process token is elevated
pub fn is_elevated() -> bool {
    #[cfg(windows)]
    {
        use winapi::{
            shared::minwindef::{DWORD, LPVOID},
            um::{
                handleapi::CloseHandle,
                processthreadsapi::{GetCurrentProcess, OpenProcessToken},
                securitybaseapi::GetTokenInformation,
                winnt::{TokenElevation, HANDLE, TOKEN_ELEVATION, TOKEN_QUERY},
            },
        };

        unsafe {
            let mut token: HANDLE = std::ptr::null_mut();
            if OpenProcessToken(GetCurrentProcess(), TOKEN_QUERY, &mut token) == 0 {
                debug!("OpenProcessToken failed");
                return false;
            }

            let mut elevation = TOKEN_ELEVATION { TokenIsElevated: 0 };
            let mut size = std::mem::size_of::<TOKEN_ELEVATION>() as DWORD;
            let ok = GetTokenInformation(
                token,
                TokenElevation,
                &mut elevation as *mut TOKEN_ELEVATION as LPVOID,
                size,
                &mut size,
            ) != 0;

            CloseHandle(token);

            ok && elevation.TokenIsElevated != 0
        }
    }

    #[cfg(not(windows))]
    {
        debug!("Elevation check not available on this platform");
        false
    }
}
