//! Filesystem state of the local CA
//!
//! The storage root holds exactly two files with fixed names. An existing pair
//! is always loaded as-is; a new CA is only minted when neither file exists.

use std::fs;
use std::path::Path;

use rcgen::{Issuer, KeyPair};
use rustls::pki_types::CertificateDer;
use tracing::{debug, info};

use super::{generation, Authority, AuthorityMetadata, AuthoritySource};
use crate::error::{MkcertError, Result};

/// CA certificate file name
pub const ROOT_CERT_FILE: &str = "rootCA.pem";

/// CA private key file name
pub const ROOT_KEY_FILE: &str = "rootCA-key.pem";

/// Create the storage root and any missing parents
///
/// # Errors
///
/// Returns [`MkcertError::CreateCaroot`] if the directory cannot be created.
pub fn ensure_storage(dir: &Path) -> Result<()> {
    let mut builder = fs::DirBuilder::new();
    builder.recursive(true);
    #[cfg(unix)]
    {
        use std::os::unix::fs::DirBuilderExt;
        builder.mode(0o755);
    }

    builder
        .create(dir)
        .map_err(|source| MkcertError::CreateCaroot {
            path: dir.to_path_buf(),
            source,
        })
}

/// Load the CA from `dir`, minting and persisting one first if none exists
///
/// # Errors
///
/// Returns an error if:
/// - only one of the two CA files exists
/// - an existing file cannot be read or parsed
/// - generating or writing a new CA fails
pub fn load_or_create(dir: &Path) -> Result<Authority> {
    let cert_path = dir.join(ROOT_CERT_FILE);
    let key_path = dir.join(ROOT_KEY_FILE);

    match (exists(&cert_path)?, exists(&key_path)?) {
        (true, true) => load(dir, AuthoritySource::Loaded),
        (false, false) => {
            generation::write_new_authority(dir)?;
            info!("Created a new local CA 💥");
            load(dir, AuthoritySource::Generated)
        }
        (true, false) => Err(MkcertError::IncompleteAuthority {
            dir: dir.to_path_buf(),
            missing: key_path,
        }),
        (false, true) => Err(MkcertError::IncompleteAuthority {
            dir: dir.to_path_buf(),
            missing: cert_path,
        }),
    }
}

fn exists(path: &Path) -> Result<bool> {
    path.try_exists()
        .map_err(|source| MkcertError::ReadAuthority {
            path: path.to_path_buf(),
            source,
        })
}

fn read(path: &Path) -> Result<String> {
    fs::read_to_string(path).map_err(|source| MkcertError::ReadAuthority {
        path: path.to_path_buf(),
        source,
    })
}

fn corrupt(path: &Path, reason: impl ToString) -> MkcertError {
    MkcertError::CorruptAuthority {
        path: path.to_path_buf(),
        reason: reason.to_string(),
    }
}

fn load(dir: &Path, source: AuthoritySource) -> Result<Authority> {
    let cert_path = dir.join(ROOT_CERT_FILE);
    let key_path = dir.join(ROOT_KEY_FILE);

    let certificate_pem = read(&cert_path)?;
    let key_pem = read(&key_path)?;

    let (certificate_der, metadata, public_key) =
        parse_certificate(&cert_path, &certificate_pem, source)?;

    let key_pair = KeyPair::from_pem(&key_pem).map_err(|e| corrupt(&key_path, e))?;
    if key_pair.public_key_raw() != public_key.as_slice() {
        return Err(corrupt(
            &key_path,
            "private key does not match the CA certificate",
        ));
    }

    let issuer =
        Issuer::from_ca_cert_pem(&certificate_pem, key_pair).map_err(|e| corrupt(&cert_path, e))?;

    debug!(
        subject = %metadata.subject,
        serial = %metadata.serial_number,
        valid_until = %metadata.valid_until,
        "loaded local CA from {}",
        dir.display()
    );

    Ok(Authority {
        dir: dir.to_path_buf(),
        certificate_der,
        issuer,
        metadata,
    })
}

/// Parse the CA certificate, returning its DER, metadata and raw public key
fn parse_certificate(
    path: &Path,
    pem: &str,
    source: AuthoritySource,
) -> Result<(CertificateDer<'static>, AuthorityMetadata, Vec<u8>)> {
    let der = rustls_pemfile::certs(&mut pem.as_bytes())
        .next()
        .ok_or_else(|| corrupt(path, "no certificate found in PEM data"))?
        .map_err(|e| corrupt(path, e))?;

    let (metadata, public_key) = {
        let (_, cert) =
            x509_parser::parse_x509_certificate(der.as_ref()).map_err(|e| corrupt(path, e))?;

        if !cert.is_ca() {
            return Err(corrupt(path, "certificate is not a CA"));
        }

        let metadata = AuthorityMetadata {
            subject: cert.subject().to_string(),
            serial_number: hex::encode(cert.raw_serial()),
            valid_until: cert.validity().not_after.to_string(),
            source,
        };
        (metadata, cert.public_key().subject_public_key.data.to_vec())
    };

    Ok((der, metadata, public_key))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn creates_then_reloads_the_same_authority() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path().join("nested").join("caroot");

        ensure_storage(&root).unwrap();
        let created = load_or_create(&root).unwrap();
        assert_eq!(created.metadata().source, AuthoritySource::Generated);
        assert!(root.join(ROOT_CERT_FILE).is_file());
        assert!(root.join(ROOT_KEY_FILE).is_file());

        let loaded = load_or_create(&root).unwrap();
        assert_eq!(loaded.metadata().source, AuthoritySource::Loaded);
        assert_eq!(loaded.certificate_der(), created.certificate_der());
        assert_eq!(loaded.unique_name(), created.unique_name());
        assert!(loaded.metadata().subject.contains("mkcert development CA"));

        let year = time::OffsetDateTime::now_utc().year();
        let until = &loaded.metadata().valid_until;
        assert!(
            until.contains(&(year + 9).to_string()) || until.contains(&(year + 10).to_string()),
            "unexpected expiry {until}"
        );
    }

    #[test]
    fn ensure_storage_is_idempotent() {
        let dir = tempfile::tempdir().unwrap();
        ensure_storage(dir.path()).unwrap();
        ensure_storage(dir.path()).unwrap();
    }

    #[test]
    fn ensure_storage_fails_under_a_file() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("occupied");
        fs::write(&file, "x").unwrap();
        let err = ensure_storage(&file.join("caroot")).unwrap_err();
        assert!(matches!(err, MkcertError::CreateCaroot { .. }));
    }

    #[test]
    fn truncated_key_is_fatal_and_not_regenerated() {
        let dir = tempfile::tempdir().unwrap();
        load_or_create(dir.path()).unwrap();

        let key_path = dir.path().join(ROOT_KEY_FILE);
        let cert_before = fs::read(dir.path().join(ROOT_CERT_FILE)).unwrap();
        let key = fs::read_to_string(&key_path).unwrap();
        fs::write(&key_path, &key[..key.len() / 2]).unwrap();

        let err = load_or_create(dir.path()).unwrap_err();
        assert!(
            matches!(&err, MkcertError::CorruptAuthority { path, .. } if path == &key_path),
            "unexpected error: {err}"
        );
        assert_eq!(fs::read(dir.path().join(ROOT_CERT_FILE)).unwrap(), cert_before);
    }

    #[test]
    fn garbage_certificate_is_fatal() {
        let dir = tempfile::tempdir().unwrap();
        load_or_create(dir.path()).unwrap();
        fs::write(dir.path().join(ROOT_CERT_FILE), "not a certificate").unwrap();

        let err = load_or_create(dir.path()).unwrap_err();
        assert!(matches!(err, MkcertError::CorruptAuthority { .. }));
    }

    #[test]
    fn mismatched_key_is_fatal() {
        let first = tempfile::tempdir().unwrap();
        let second = tempfile::tempdir().unwrap();
        load_or_create(first.path()).unwrap();
        load_or_create(second.path()).unwrap();

        fs::copy(
            second.path().join(ROOT_KEY_FILE),
            first.path().join(ROOT_KEY_FILE),
        )
        .unwrap();

        let err = load_or_create(first.path()).unwrap_err();
        assert!(matches!(err, MkcertError::CorruptAuthority { .. }));
    }

    #[test]
    fn half_a_pair_is_never_completed() {
        let dir = tempfile::tempdir().unwrap();
        load_or_create(dir.path()).unwrap();
        fs::remove_file(dir.path().join(ROOT_KEY_FILE)).unwrap();

        let err = load_or_create(dir.path()).unwrap_err();
        assert!(matches!(err, MkcertError::IncompleteAuthority { .. }));
        assert!(!dir.path().join(ROOT_KEY_FILE).exists());

        let other = tempfile::tempdir().unwrap();
        load_or_create(other.path()).unwrap();
        fs::remove_file(other.path().join(ROOT_CERT_FILE)).unwrap();
        assert!(matches!(
            load_or_create(other.path()),
            Err(MkcertError::IncompleteAuthority { .. })
        ));
    }
}
