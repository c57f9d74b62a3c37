//! macOS trust store integration via `security` and the System keychain.

use tracing::debug;

use super::{run, Escalation};
use crate::authority::Authority;
use crate::error::Result;

const SYSTEM_KEYCHAIN: &str = "/Library/Keychains/System.keychain";

/// Add the CA to the System keychain as a trusted root
///
/// # Errors
///
/// Returns an error if `security add-trusted-cert` fails.
pub fn install(authority: &Authority) -> Result<()> {
    let cert_path = authority.certificate_path().to_string_lossy().into_owned();
    debug!(name = %authority.unique_name(), "adding trusted cert to {}", SYSTEM_KEYCHAIN);

    run(
        "install",
        Escalation::detect().command(
            "security",
            &["add-trusted-cert", "-d", "-k", SYSTEM_KEYCHAIN, cert_path.as_str()],
        ),
    )
}

/// Remove the CA's trust settings from the admin domain
///
/// # Errors
///
/// Returns an error if `security remove-trusted-cert` fails.
pub fn uninstall(authority: &Authority) -> Result<()> {
    let cert_path = authority.certificate_path().to_string_lossy().into_owned();

    run(
        "uninstall",
        Escalation::detect().command(
            "security",
            &["remove-trusted-cert", "-d", cert_path.as_str()],
        ),
    )
}
