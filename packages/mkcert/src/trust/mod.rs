//! System trust store integration
//!
//! [`TrustStore`] is the seam between the install/uninstall state machine and
//! the host. [`SystemTrustStore`] is the real implementation:
//!
//! - `native`: verification against the roots the OS reports as trusted
//! - `platform`: per-family commands that add or remove the CA

pub mod native;
pub mod platform;

use crate::authority::Authority;
use crate::caroot::OsFamily;
use crate::error::Result;

/// A trust store the local CA can be registered with
pub trait TrustStore {
    /// Register the CA as a trust anchor
    ///
    /// # Errors
    ///
    /// Returns an error if the platform refuses the change.
    fn install(&self, authority: &Authority) -> Result<()>;

    /// Remove the CA's registration, leaving its files in place
    ///
    /// # Errors
    ///
    /// Returns an error if the platform refuses the change.
    fn uninstall(&self, authority: &Authority) -> Result<()>;

    /// Whether the CA certificate currently verifies against this store
    ///
    /// Verification failures of any kind read as `false`.
    fn is_trusted(&self, authority: &Authority) -> bool;
}

impl<T: TrustStore + ?Sized> TrustStore for &T {
    fn install(&self, authority: &Authority) -> Result<()> {
        (**self).install(authority)
    }

    fn uninstall(&self, authority: &Authority) -> Result<()> {
        (**self).uninstall(authority)
    }

    fn is_trusted(&self, authority: &Authority) -> bool {
        (**self).is_trusted(authority)
    }
}

/// The host's system trust store
#[derive(Debug, Clone, Copy)]
pub struct SystemTrustStore {
    family: OsFamily,
}

impl SystemTrustStore {
    /// Store for the given family
    #[must_use]
    pub fn new(family: OsFamily) -> Self {
        Self { family }
    }

    /// Store for the host this binary runs on
    #[must_use]
    pub fn for_host() -> Self {
        Self::new(OsFamily::current())
    }
}

impl TrustStore for SystemTrustStore {
    fn install(&self, authority: &Authority) -> Result<()> {
        match self.family {
            OsFamily::Unix => platform::linux::install(authority),
            OsFamily::MacOs => platform::macos::install(authority),
            OsFamily::Windows => platform::windows::install(authority),
        }
    }

    fn uninstall(&self, authority: &Authority) -> Result<()> {
        match self.family {
            OsFamily::Unix => platform::linux::uninstall(authority),
            OsFamily::MacOs => platform::macos::uninstall(authority),
            OsFamily::Windows => platform::windows::uninstall(authority),
        }
    }

    fn is_trusted(&self, authority: &Authority) -> bool {
        native::is_trusted_by_native_roots(authority)
    }
}
