//! Run orchestration
//!
//! [`Mkcert`] is the context for one invocation. It owns the configuration,
//! the loaded CA and the trust store handle, and drives the install, uninstall
//! and issue flows in a fixed order. Every failure is returned to the caller.

use std::path::{Path, PathBuf};

use tracing::{debug, info, warn};

use crate::authority::{self, Authority};
use crate::caroot::{resolve_caroot, EnvSource, OsFamily};
use crate::config::{Mode, ModeFlags, RunConfig};
use crate::error::{MkcertError, Result};
use crate::identifiers::validate_identifiers;
use crate::issuance::{self, IssuedCertificate};
use crate::trust::TrustStore;

/// Result of an install request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InstallOutcome {
    /// The CA already verified; the trust store was not touched
    AlreadyTrusted,
    /// The platform installer ran and reported success
    Installed,
}

/// What a completed run did
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunOutcome {
    /// Only the storage root was requested; nothing was created
    Caroot(PathBuf),
    /// Install ran and there was nothing to issue
    Installed(InstallOutcome),
    /// The CA was removed from the trust store
    Uninstalled,
    /// No names were given; the caller should print usage
    Usage,
    /// A certificate was issued
    Issued(IssuedCertificate),
}

/// State for a single run against one CA and one trust store
#[derive(Debug)]
pub struct Mkcert<S> {
    config: RunConfig,
    caroot: PathBuf,
    authority: Authority,
    store: S,
    /// Set after a successful install. System roots are typically loaded once
    /// per process, so the fresh anchor cannot be observed until the next run.
    ignore_check_failure: bool,
}

impl<S: TrustStore> Mkcert<S> {
    /// Prepare the storage root and load (or create) the CA in it
    ///
    /// # Errors
    ///
    /// Returns an error if the directory cannot be created or the CA cannot
    /// be loaded or created.
    pub fn bootstrap(config: RunConfig, caroot: PathBuf, store: S) -> Result<Self> {
        authority::ensure_storage(&caroot)?;
        let authority = authority::load_or_create(&caroot)?;
        debug!("using the local CA at {}", caroot.display());

        Ok(Self {
            config,
            caroot,
            authority,
            store,
            ignore_check_failure: false,
        })
    }

    /// Storage root in use
    #[must_use]
    pub fn caroot(&self) -> &Path {
        &self.caroot
    }

    /// The loaded CA
    #[must_use]
    pub fn authority(&self) -> &Authority {
        &self.authority
    }

    /// Whether the CA currently counts as trusted
    #[must_use]
    pub fn check(&self) -> bool {
        if self.ignore_check_failure {
            return true;
        }
        self.store.is_trusted(&self.authority)
    }

    /// Make the CA trusted, doing nothing if it already is
    ///
    /// # Errors
    ///
    /// Returns an error if the platform installer fails, or if the CA still
    /// does not verify afterwards.
    pub fn install(&mut self) -> Result<InstallOutcome> {
        if self.check() {
            info!("The local CA is already installed in the system trust store! 👍");
            return Ok(InstallOutcome::AlreadyTrusted);
        }

        self.store.install(&self.authority)?;
        self.ignore_check_failure = true;
        debug!("trusting the new install until the next run re-reads the system roots");

        if !self.check() {
            return Err(MkcertError::InstallUnverified);
        }
        info!("The local CA is now installed in the system trust store! ⚡️");
        Ok(InstallOutcome::Installed)
    }

    /// Remove the CA from the trust store without checking its current state
    ///
    /// The CA files on disk are kept.
    ///
    /// # Errors
    ///
    /// Returns an error if the platform uninstaller fails.
    pub fn uninstall(&self) -> Result<()> {
        self.store.uninstall(&self.authority)?;
        info!("The local CA is now uninstalled from the system trust store! 👋");
        Ok(())
    }

    /// Execute the configured mode, issuing into `out_dir` when names were given
    ///
    /// # Errors
    ///
    /// Returns the first fatal error encountered. Invalid names are detected
    /// before any certificate is written.
    pub fn run(&mut self, out_dir: &Path) -> Result<RunOutcome> {
        match self.config.mode() {
            Mode::Install => {
                let outcome = self.install()?;
                if self.config.identifiers().is_empty() {
                    return Ok(RunOutcome::Installed(outcome));
                }
            }
            Mode::Uninstall => {
                self.uninstall()?;
                return Ok(RunOutcome::Uninstalled);
            }
            Mode::Issue => {
                if !self.check() {
                    warn!("Note: the local CA is not installed in the system trust store! ⚠️");
                    warn!("Run \"mkcert -install\" to avoid verification errors ‼️");
                }
            }
        }

        if self.config.identifiers().is_empty() {
            return Ok(RunOutcome::Usage);
        }

        let identifiers = validate_identifiers(self.config.identifiers())?;
        let issued = issuance::issue(&self.authority, &identifiers, out_dir)?;
        Ok(RunOutcome::Issued(issued))
    }
}

/// One full invocation: flags, storage root, CA, then the configured mode
///
/// Flag conflicts and an unresolvable storage root are reported before the
/// filesystem or `store` is touched.
///
/// # Errors
///
/// Returns the first fatal error of any step.
pub fn run_cli<S: TrustStore>(
    flags: ModeFlags,
    env: &dyn EnvSource,
    family: OsFamily,
    store: S,
    out_dir: &Path,
) -> Result<RunOutcome> {
    let config = flags.into_config()?;
    let caroot = resolve_caroot(env, family)?;

    if config.print_caroot() {
        return Ok(RunOutcome::Caroot(caroot));
    }

    let mut mkcert = Mkcert::bootstrap(config, caroot, store)?;
    mkcert.run(out_dir)
}
