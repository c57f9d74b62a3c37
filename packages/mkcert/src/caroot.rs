//! Storage root resolution
//!
//! The CA lives in a single directory. It is taken verbatim from `$CAROOT` when
//! that is set, otherwise it is derived from the host's per-user data directory
//! through a [`DataDirStrategy`] chosen once per [`OsFamily`].

use std::borrow::Borrow;
use std::collections::HashMap;
use std::ffi::{OsStr, OsString};
use std::hash::{BuildHasher, Hash};
use std::path::{Path, PathBuf};

use crate::error::{MkcertError, Result};

/// Environment variable overriding the storage root
pub const CAROOT_ENV: &str = "CAROOT";

/// Subdirectory appended to the platform data directory
pub const TOOL_DIR_NAME: &str = "mkcert";

/// Read-only view of environment variables
///
/// Values are raw OS strings; a path that is not valid UTF-8 is still a path.
pub trait EnvSource {
    /// Value of `key`, or `None` when unset
    fn var(&self, key: &str) -> Option<OsString>;

    /// Value of `key`, treating an empty value as unset
    fn non_empty(&self, key: &str) -> Option<OsString> {
        self.var(key).filter(|value| !value.is_empty())
    }
}

/// The real process environment
#[derive(Debug, Clone, Copy, Default)]
pub struct ProcessEnv;

impl EnvSource for ProcessEnv {
    fn var(&self, key: &str) -> Option<OsString> {
        std::env::var_os(key)
    }
}

impl<K, V, H> EnvSource for HashMap<K, V, H>
where
    K: Borrow<str> + Hash + Eq,
    V: AsRef<OsStr>,
    H: BuildHasher,
{
    fn var(&self, key: &str) -> Option<OsString> {
        self.get(key).map(|value| value.as_ref().to_os_string())
    }
}

/// Operating system families with distinct data directory conventions
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OsFamily {
    /// Windows
    Windows,
    /// macOS
    MacOs,
    /// Linux, the BSDs and other Unix-likes
    Unix,
}

impl OsFamily {
    /// Family of the host this binary was built for
    #[must_use]
    pub fn current() -> Self {
        if cfg!(windows) {
            Self::Windows
        } else if cfg!(target_os = "macos") {
            Self::MacOs
        } else {
            Self::Unix
        }
    }

    /// Data directory strategy for this family
    #[must_use]
    pub fn data_dir_strategy(self) -> &'static dyn DataDirStrategy {
        match self {
            Self::Windows => &LocalAppData,
            Self::MacOs => &ApplicationSupport,
            Self::Unix => &XdgDataHome,
        }
    }
}

/// Locates the per-user application data directory
pub trait DataDirStrategy {
    /// Base data directory, or `None` when the environment does not provide one
    fn data_dir(&self, env: &dyn EnvSource) -> Option<PathBuf>;
}

/// `%LocalAppData%`
#[derive(Debug)]
pub struct LocalAppData;

impl DataDirStrategy for LocalAppData {
    fn data_dir(&self, env: &dyn EnvSource) -> Option<PathBuf> {
        env.non_empty("LocalAppData").map(PathBuf::from)
    }
}

/// `$HOME/Library/Application Support`
#[derive(Debug)]
pub struct ApplicationSupport;

impl DataDirStrategy for ApplicationSupport {
    fn data_dir(&self, env: &dyn EnvSource) -> Option<PathBuf> {
        let home = env.non_empty("HOME")?;
        Some(Path::new(&home).join("Library").join("Application Support"))
    }
}

/// `$XDG_DATA_HOME`, falling back to `$HOME/.local/share`
#[derive(Debug)]
pub struct XdgDataHome;

impl DataDirStrategy for XdgDataHome {
    fn data_dir(&self, env: &dyn EnvSource) -> Option<PathBuf> {
        if let Some(dir) = env.non_empty("XDG_DATA_HOME") {
            return Some(PathBuf::from(dir));
        }
        let home = env.non_empty("HOME")?;
        Some(Path::new(&home).join(".local").join("share"))
    }
}

/// Resolve the storage root for `family`
///
/// # Errors
///
/// Returns [`MkcertError::CarootUnresolved`] when neither the override nor the
/// platform convention yields a directory.
pub fn resolve_caroot(env: &dyn EnvSource, family: OsFamily) -> Result<PathBuf> {
    resolve_caroot_with(env, family.data_dir_strategy())
}

/// Resolve the storage root with an explicit strategy
///
/// # Errors
///
/// Returns [`MkcertError::CarootUnresolved`] when neither the override nor
/// `strategy` yields a directory.
pub fn resolve_caroot_with(env: &dyn EnvSource, strategy: &dyn DataDirStrategy) -> Result<PathBuf> {
    if let Some(dir) = env.non_empty(CAROOT_ENV) {
        return Ok(PathBuf::from(dir));
    }

    let base = strategy
        .data_dir(env)
        .ok_or(MkcertError::CarootUnresolved)?;
    Ok(base.join(TOOL_DIR_NAME))
}
