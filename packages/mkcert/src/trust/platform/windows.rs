//! Windows trust store integration via `certutil` and the Root store.

use std::process::Command;

use super::run;
use crate::authority::Authority;
use crate::error::Result;

/// Add the CA to the Root store
///
/// # Errors
///
/// Returns an error if `certutil -addstore` fails.
pub fn install(authority: &Authority) -> Result<()> {
    let mut command = Command::new("certutil");
    command
        .args(["-addstore", "-f", "Root"])
        .arg(authority.certificate_path());
    run("install", command)
}

/// Remove the CA from the Root store by serial number
///
/// # Errors
///
/// Returns an error if `certutil -delstore` fails.
pub fn uninstall(authority: &Authority) -> Result<()> {
    let mut command = Command::new("certutil");
    command
        .args(["-delstore", "Root"])
        .arg(&authority.metadata().serial_number);
    run("uninstall", command)
}
