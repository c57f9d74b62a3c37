#![allow(clippy::doc_markdown)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::uninlined_format_args)]

//! Locally-trusted development certificates
//!
//! Keeps one private CA in a per-user storage root, registers it with the
//! system trust store on request, and signs leaf certificates for hostnames,
//! wildcard names and IP addresses.

pub mod authority;
pub mod caroot;
pub mod config;
pub mod error;
pub mod identifiers;
pub mod issuance;
pub mod orchestrator;
pub mod trust;

pub use authority::{Authority, AuthorityMetadata, AuthoritySource};
pub use caroot::{resolve_caroot, EnvSource, OsFamily, ProcessEnv};
pub use config::{normalize_flags, Mode, ModeFlags, RunConfig};
pub use error::{MkcertError, Result};
pub use identifiers::{validate_identifiers, Identifier};
pub use issuance::IssuedCertificate;
pub use orchestrator::{run_cli, InstallOutcome, Mkcert, RunOutcome};
pub use trust::{SystemTrustStore, TrustStore};
