//! Exit codes for the CLI

use liftoff_connect::{ConnectError, ErrorKind};

/// Success
pub const SUCCESS: u8 = 0;

/// General error
pub const ERROR: u8 = 1;

/// Configuration error (env file, private key, flags)
pub const CONFIG_ERROR: u8 = 2;

/// App Store Connect rejected a request
pub const REQUEST_ERROR: u8 = 3;

/// App or build not found
pub const NOT_FOUND: u8 = 4;

/// Builds never became valid
pub const BUILD_ERROR: u8 = 5;

/// Version tool missing or failed
pub const TOOL_ERROR: u8 = 6;

/// Pick the exit code for a failed command
pub fn for_error(err: &anyhow::Error) -> u8 {
    let Some(connect) = err.downcast_ref::<ConnectError>() else {
        return ERROR;
    };

    match connect.kind() {
        ErrorKind::Configuration => CONFIG_ERROR,
        ErrorKind::Request => REQUEST_ERROR,
        ErrorKind::NotFound => NOT_FOUND,
        ErrorKind::Build => BUILD_ERROR,
        ErrorKind::Tool => TOOL_ERROR,
        ErrorKind::Other => ERROR,
    }
}
