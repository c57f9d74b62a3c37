//! Verification against the platform's trusted roots
//!
//! A self-signed CA verifies exactly when it is itself one of the trust
//! anchors, so the check compares anchors rather than building a chain.

use rustls::pki_types::TrustAnchor;
use rustls::RootCertStore;
use tracing::{debug, warn};

use crate::authority::Authority;

/// Whether the CA is among the roots the OS currently trusts
///
/// The native root set is read once per call. Platforms that cache it for the
/// life of the process will not reflect a change made by this same process.
pub fn is_trusted_by_native_roots(authority: &Authority) -> bool {
    let cert_result = rustls_native_certs::load_native_certs();
    for err in &cert_result.errors {
        debug!("native root load error: {}", err);
    }

    let mut root_store = RootCertStore::empty();
    for cert in cert_result.certs {
        if let Err(e) = root_store.add(cert) {
            debug!("skipping unparsable system root: {}", e);
        }
    }
    debug!("loaded {} system roots", root_store.len());

    is_trusted_by(&root_store, authority)
}

/// Whether `roots` contains the CA as a trust anchor
pub fn is_trusted_by(roots: &RootCertStore, authority: &Authority) -> bool {
    let mut ours = RootCertStore::empty();
    if let Err(e) = ours.add(authority.certificate_der().clone()) {
        warn!("the local CA certificate is not a usable trust anchor: {}", e);
        return false;
    }
    let Some(anchor) = ours.roots.first() else {
        return false;
    };

    roots.roots.iter().any(|root| same_anchor(root, anchor))
}

fn same_anchor(a: &TrustAnchor<'_>, b: &TrustAnchor<'_>) -> bool {
    a.subject.as_ref() == b.subject.as_ref()
        && a.subject_public_key_info.as_ref() == b.subject_public_key_info.as_ref()
}
