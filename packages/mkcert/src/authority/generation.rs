//! New CA generation
//!
//! Mints a self-signed CA with rcgen and writes it under the storage root. The
//! caller reads the pair back from disk, so a freshly created CA goes through
//! the same parsing path as an existing one.

use std::fs;
use std::io::Write;
use std::path::Path;

use rcgen::{
    BasicConstraints, CertificateParams, DistinguishedName, DnType, IsCa, KeyPair,
    KeyUsagePurpose, SerialNumber,
};
use time::{Duration, OffsetDateTime};
use tracing::debug;

use super::store::{ROOT_CERT_FILE, ROOT_KEY_FILE};
use crate::error::{MkcertError, Result};

/// Organization name stamped on every generated CA
pub const CA_ORGANIZATION: &str = "mkcert development CA";

const CA_VALIDITY_YEARS: i64 = 10;

/// Generate a CA key pair and certificate and persist both under `dir`
///
/// The key is written first with owner-only permissions, then the certificate.
///
/// # Errors
///
/// Returns an error if key generation, self-signing or either write fails.
pub fn write_new_authority(dir: &Path) -> Result<()> {
    let owner = owner_label();
    let generate = |e: rcgen::Error| MkcertError::GenerateAuthority(e.to_string());

    let mut params = CertificateParams::new(Vec::default()).map_err(generate)?;
    params.is_ca = IsCa::Ca(BasicConstraints::Constrained(0));
    params.key_usages = vec![KeyUsagePurpose::KeyCertSign, KeyUsagePurpose::CrlSign];
    params.serial_number = Some(random_serial());

    let mut dn = DistinguishedName::new();
    dn.push(DnType::OrganizationName, CA_ORGANIZATION);
    dn.push(DnType::OrganizationalUnitName, owner.as_str());
    dn.push(DnType::CommonName, format!("mkcert {owner}"));
    params.distinguished_name = dn;

    let now = OffsetDateTime::now_utc();
    params.not_before = now;
    params.not_after = now + Duration::days(365 * CA_VALIDITY_YEARS);

    let key_pair = KeyPair::generate().map_err(generate)?;
    let cert = params.self_signed(&key_pair).map_err(generate)?;

    write_private(&dir.join(ROOT_KEY_FILE), &key_pair.serialize_pem())?;
    write_public(&dir.join(ROOT_CERT_FILE), &cert.pem())?;

    debug!(owner = %owner, "generated CA certificate and key in {}", dir.display());
    Ok(())
}

/// `user@host` of whoever is running the tool
pub(crate) fn owner_label() -> String {
    let user = std::env::var("USER")
        .or_else(|_| std::env::var("USERNAME"))
        .unwrap_or_else(|_| "unknown".to_string());
    let host = hostname::get()
        .ok()
        .and_then(|h| h.into_string().ok())
        .unwrap_or_else(|| "localhost".to_string());
    format!("{user}@{host}")
}

/// Positive random 128-bit serial
pub(crate) fn random_serial() -> SerialNumber {
    let mut bytes: [u8; 16] = rand::random();
    bytes[0] &= 0x7f;
    bytes[0] |= 0x01;
    SerialNumber::from_slice(&bytes)
}

/// Write a certificate file readable by everyone
pub(crate) fn write_public(path: &Path, contents: &str) -> Result<()> {
    fs::write(path, contents).map_err(|source| MkcertError::WriteFile {
        path: path.to_path_buf(),
        source,
    })
}

/// Write a private key file readable only by its owner
pub(crate) fn write_private(path: &Path, contents: &str) -> Result<()> {
    let mut options = fs::OpenOptions::new();
    options.write(true).create(true).truncate(true);
    #[cfg(unix)]
    {
        use std::os::unix::fs::OpenOptionsExt;
        options.mode(0o600);
    }

    options
        .open(path)
        .and_then(|mut file| file.write_all(contents.as_bytes()))
        .map_err(|source| MkcertError::WriteFile {
            path: path.to_path_buf(),
            source,
        })
}
