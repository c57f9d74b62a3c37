//! Local certificate authority
//!
//! This module owns the CA's key material for the lifetime of a run:
//!
//! - `store`: storage root creation and load-or-create of the key pair
//! - `generation`: minting and persisting a brand new self-signed CA

pub mod generation;
pub mod store;

use std::fmt;
use std::path::PathBuf;

use rcgen::{Issuer, KeyPair};
use rustls::pki_types::CertificateDer;

pub use store::{ensure_storage, load_or_create, ROOT_CERT_FILE, ROOT_KEY_FILE};

/// Where the authority in memory came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthoritySource {
    /// Read from an existing pair on disk
    Loaded,
    /// Generated during this run, then persisted and read back
    Generated,
}

/// Descriptive fields extracted from the CA certificate
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthorityMetadata {
    /// Subject distinguished name
    pub subject: String,
    /// Serial number as lowercase hex
    pub serial_number: String,
    /// End of the validity period
    pub valid_until: String,
    /// Origin of this authority
    pub source: AuthoritySource,
}

/// The CA certificate together with its signing key
///
/// Both halves are always present: the record is only ever built from a pair
/// that parsed successfully, and it is replaced wholesale rather than mutated.
pub struct Authority {
    dir: PathBuf,
    certificate_der: CertificateDer<'static>,
    issuer: Issuer<'static, KeyPair>,
    metadata: AuthorityMetadata,
}

impl Authority {
    /// Path of the CA certificate file
    #[must_use]
    pub fn certificate_path(&self) -> PathBuf {
        self.dir.join(ROOT_CERT_FILE)
    }

    /// CA certificate in DER form
    #[must_use]
    pub fn certificate_der(&self) -> &CertificateDer<'static> {
        &self.certificate_der
    }

    /// Signer for leaf certificates
    #[must_use]
    pub fn issuer(&self) -> &Issuer<'static, KeyPair> {
        &self.issuer
    }

    /// Extracted certificate details
    #[must_use]
    pub fn metadata(&self) -> &AuthorityMetadata {
        &self.metadata
    }

    /// Stable name used when registering with a trust store
    #[must_use]
    pub fn unique_name(&self) -> String {
        format!("mkcert_development_CA_{}", self.metadata.serial_number)
    }
}

impl fmt::Debug for Authority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Authority")
            .field("dir", &self.dir)
            .field("metadata", &self.metadata)
            .finish_non_exhaustive()
    }
}
