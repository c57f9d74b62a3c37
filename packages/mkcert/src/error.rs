//! Error types for local CA management
//!
//! Every variant is fatal for the current run. Components return these values
//! and the binary's top-level handler turns them into a message and an exit code.

use std::path::PathBuf;

/// Errors raised while resolving, loading, trusting or issuing from the local CA
#[derive(Debug, thiserror::Error)]
pub enum MkcertError {
    /// No storage root could be derived from the environment
    #[error("failed to find the default CA location, set one as the CAROOT env var")]
    CarootUnresolved,

    /// Two mutually exclusive mode flags were set together
    #[error("you can't set -{first} and -{second} at the same time")]
    ConflictingModes {
        /// First flag, without the leading dash
        first: &'static str,
        /// Second flag, without the leading dash
        second: &'static str,
    },

    /// The storage root directory could not be created
    #[error("failed to create the CAROOT {}: {source}", path.display())]
    CreateCaroot {
        /// Directory that was being created
        path: PathBuf,
        /// Underlying I/O failure
        #[source]
        source: std::io::Error,
    },

    /// An existing CA file could not be read
    #[error("failed to read the CA file {}: {source}", path.display())]
    ReadAuthority {
        /// File that was being read
        path: PathBuf,
        /// Underlying I/O failure
        #[source]
        source: std::io::Error,
    },

    /// An existing CA file is present but unusable
    #[error("failed to parse the CA file {}: {reason}", path.display())]
    CorruptAuthority {
        /// Offending file
        path: PathBuf,
        /// Parser diagnostic
        reason: String,
    },

    /// Only one half of the certificate/key pair exists on disk
    #[error(
        "the local CA in {} is incomplete ({} is missing), refusing to create a new one over it",
        dir.display(),
        missing.display()
    )]
    IncompleteAuthority {
        /// Storage root
        dir: PathBuf,
        /// File that should exist alongside its counterpart
        missing: PathBuf,
    },

    /// Key or certificate generation for a new CA failed
    #[error("failed to generate the CA: {0}")]
    GenerateAuthority(String),

    /// A certificate or key file could not be written
    #[error("failed to save {}: {source}", path.display())]
    WriteFile {
        /// Destination file
        path: PathBuf,
        /// Underlying I/O failure
        #[source]
        source: std::io::Error,
    },

    /// A requested name is neither a hostname nor an IP literal
    #[error("{0:?} is not a valid hostname or IP")]
    InvalidIdentifier(String),

    /// A trust store command failed or could not be run
    #[error("{action} failed: `{command}`: {detail}")]
    Platform {
        /// What was being attempted, e.g. "install"
        action: &'static str,
        /// Command line that was executed
        command: String,
        /// Exit status and stderr, or the spawn error
        detail: String,
    },

    /// The trust store accepted the CA but it still does not verify
    #[error(
        "installing failed. Please report the issue with details about your environment at https://github.com/FiloSottile/mkcert/issues/new"
    )]
    InstallUnverified,

    /// Leaf certificate generation failed
    #[error("failed to generate certificate: {0}")]
    Issuance(String),
}

/// Result alias used across the crate
pub type Result<T> = std::result::Result<T, MkcertError>;
