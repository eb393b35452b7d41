//! Error codes and exit status for vigilctl

use vigil_common::{ConfigError, FetchError};

/// Exit code for success
pub const EXIT_SUCCESS: i32 = 0;

/// Exit code for general errors
pub const EXIT_GENERAL_ERROR: i32 = 1;

/// Exit code when the API returns a body that cannot be decoded
pub const EXIT_INVALID_RESPONSE: i32 = 65;

/// Exit code when the API is unreachable or times out
pub const EXIT_API_UNAVAILABLE: i32 = 70;

/// Exit code for a missing, unreadable or invalid config file
pub const EXIT_CONFIG_ERROR: i32 = 78;

/// Map a command failure to its exit status
pub fn exit_code(err: &anyhow::Error) -> i32 {
    for cause in err.chain() {
        if let Some(fetch) = cause.downcast_ref::<FetchError>() {
            return match fetch {
                FetchError::Decode(_) => EXIT_INVALID_RESPONSE,
                e if e.is_unavailable() => EXIT_API_UNAVAILABLE,
                _ => EXIT_GENERAL_ERROR,
            };
        }
        if cause.downcast_ref::<ConfigError>().is_some() {
            return EXIT_CONFIG_ERROR;
        }
    }
    EXIT_GENERAL_ERROR
}
