//! Leaf certificate issuance
//!
//! Signs one certificate covering every requested name with the local CA and
//! writes it next to its key, using a file name derived from the names.

use std::path::{Path, PathBuf};

use rcgen::{
    CertificateParams, DistinguishedName, DnType, ExtendedKeyUsagePurpose, KeyPair,
    KeyUsagePurpose, SanType,
};
use time::{Duration, OffsetDateTime};
use tracing::{debug, info};

use crate::authority::generation::{owner_label, random_serial, write_private, write_public};
use crate::authority::Authority;
use crate::error::{MkcertError, Result};
use crate::identifiers::Identifier;

/// Organization name stamped on every leaf certificate
pub const LEAF_ORGANIZATION: &str = "mkcert development certificate";

/// Leaf validity, kept under the 825 day limit clients enforce
const LEAF_VALIDITY_DAYS: i64 = 825;

/// Files and details of a freshly issued certificate
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IssuedCertificate {
    /// Certificate PEM file
    pub cert_path: PathBuf,
    /// Private key PEM file
    pub key_path: PathBuf,
    /// Names in the subject alternative name extension, in request order
    pub names: Vec<String>,
    /// End of the validity period
    pub not_after: OffsetDateTime,
}

/// Base file name for a set of names: `example.com+2`, `_wildcard.example.com`
///
/// Returns an empty string for an empty list.
pub fn output_base_name<S: AsRef<str>>(names: &[S]) -> String {
    let Some(first) = names.first() else {
        return String::new();
    };

    let mut base = first.as_ref().replace(':', "_").replace('*', "_wildcard");
    if names.len() > 1 {
        base.push_str(&format!("+{}", names.len() - 1));
    }
    base
}

/// Issue a certificate for `identifiers` and write it into `out_dir`
///
/// # Errors
///
/// Returns an error if `identifiers` is empty, signing fails, or either file
/// cannot be written.
pub fn issue(
    authority: &Authority,
    identifiers: &[Identifier],
    out_dir: &Path,
) -> Result<IssuedCertificate> {
    if identifiers.is_empty() {
        return Err(MkcertError::Issuance("no names to certify".to_string()));
    }
    let issuance = |e: rcgen::Error| MkcertError::Issuance(e.to_string());

    let mut params = CertificateParams::new(Vec::default()).map_err(issuance)?;
    params.subject_alt_names = identifiers
        .iter()
        .map(|id| match id.ip() {
            Some(ip) => Ok(SanType::IpAddress(ip)),
            None => id.as_str().try_into().map(SanType::DnsName),
        })
        .collect::<std::result::Result<Vec<_>, rcgen::Error>>()
        .map_err(issuance)?;

    let mut dn = DistinguishedName::new();
    dn.push(DnType::OrganizationName, LEAF_ORGANIZATION);
    dn.push(DnType::OrganizationalUnitName, owner_label());
    params.distinguished_name = dn;

    params.key_usages = vec![
        KeyUsagePurpose::DigitalSignature,
        KeyUsagePurpose::KeyEncipherment,
    ];
    params.extended_key_usages = vec![ExtendedKeyUsagePurpose::ServerAuth];
    params.use_authority_key_identifier_extension = true;
    params.serial_number = Some(random_serial());

    let now = OffsetDateTime::now_utc();
    let not_after = now + Duration::days(LEAF_VALIDITY_DAYS);
    params.not_before = now;
    params.not_after = not_after;

    let key_pair = KeyPair::generate().map_err(issuance)?;
    let cert = params
        .signed_by(&key_pair, authority.issuer())
        .map_err(issuance)?;

    let names: Vec<String> = identifiers.iter().map(|id| id.as_str().to_string()).collect();
    let base = output_base_name(&names);
    let cert_path = out_dir.join(format!("{base}.pem"));
    let key_path = out_dir.join(format!("{base}-key.pem"));

    write_public(&cert_path, &cert.pem())?;
    write_private(&key_path, &key_pair.serialize_pem())?;
    debug!(count = names.len(), "signed leaf certificate with {}", authority.unique_name());

    let issued = IssuedCertificate {
        cert_path,
        key_path,
        names,
        not_after,
    };
    report(&issued, identifiers);
    Ok(issued)
}

fn report(issued: &IssuedCertificate, identifiers: &[Identifier]) {
    info!("Created a new certificate valid for the following names 📜");
    for name in &issued.names {
        info!(" - {:?}", name);
    }
    if identifiers.iter().any(Identifier::is_wildcard) {
        info!("Reminder: X.509 wildcards only go one level deep, so this won't match a.b.example.com ℹ️");
    }
    info!(
        "The certificate is at {:?} and the key at {:?} ✅",
        issued.cert_path.display().to_string(),
        issued.key_path.display().to_string()
    );
    info!(
        "It will expire on {} {} {} 🗓",
        issued.not_after.day(),
        issued.not_after.month(),
        issued.not_after.year()
    );
}
