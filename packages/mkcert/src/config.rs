//! Run configuration
//!
//! Built once from the parsed command line and never mutated afterwards.

use std::ffi::OsString;

use crate::error::{MkcertError, Result};

/// Long flags that may also be spelled with a single dash, Go `flag` style
const SINGLE_DASH_FLAGS: &[&str] = &["install", "uninstall", "CAROOT", "log-level", "help", "version"];

/// What a run does with the local CA
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    /// Add the CA to the system trust store, then issue if names were given
    Install,
    /// Remove the CA from the system trust store
    Uninstall,
    /// Check trust passively and issue for the given names
    Issue,
}

/// Raw mode flags and positional names as they came off the command line
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ModeFlags {
    /// `-install`
    pub install: bool,
    /// `-uninstall`
    pub uninstall: bool,
    /// `-CAROOT`
    pub print_caroot: bool,
    /// Positional hostnames and IPs
    pub identifiers: Vec<String>,
}

impl ModeFlags {
    /// Check the flags and freeze them into a [`RunConfig`]
    ///
    /// # Errors
    ///
    /// Returns [`MkcertError::ConflictingModes`] for mutually exclusive flags.
    pub fn into_config(self) -> Result<RunConfig> {
        RunConfig::new(
            self.install,
            self.uninstall,
            self.print_caroot,
            self.identifiers,
        )
    }
}

/// Immutable settings for one invocation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunConfig {
    mode: Mode,
    print_caroot: bool,
    identifiers: Vec<String>,
}

impl RunConfig {
    /// Build a configuration from the raw mode flags
    ///
    /// # Errors
    ///
    /// Returns [`MkcertError::ConflictingModes`] when more than one of
    /// `install`, `uninstall` and `print_caroot` is set.
    pub fn new(
        install: bool,
        uninstall: bool,
        print_caroot: bool,
        identifiers: Vec<String>,
    ) -> Result<Self> {
        if install && uninstall {
            return Err(MkcertError::ConflictingModes {
                first: "install",
                second: "uninstall",
            });
        }
        if print_caroot && (install || uninstall) {
            return Err(MkcertError::ConflictingModes {
                first: "CAROOT",
                second: if install { "install" } else { "uninstall" },
            });
        }

        let mode = if install {
            Mode::Install
        } else if uninstall {
            Mode::Uninstall
        } else {
            Mode::Issue
        };

        Ok(Self {
            mode,
            print_caroot,
            identifiers,
        })
    }

    /// Selected mode
    #[must_use]
    pub fn mode(&self) -> Mode {
        self.mode
    }

    /// Whether the run only prints the storage root
    #[must_use]
    pub fn print_caroot(&self) -> bool {
        self.print_caroot
    }

    /// Names to certify, in command line order
    #[must_use]
    pub fn identifiers(&self) -> &[String] {
        &self.identifiers
    }
}

/// Rewrite `-install` style flags to `--install` so both spellings parse
///
/// Arguments after a bare `--` are left untouched.
pub fn normalize_flags<I>(args: I) -> Vec<OsString>
where
    I: IntoIterator<Item = OsString>,
{
    let mut passthrough = false;
    args.into_iter()
        .map(|arg| {
            if passthrough {
                return arg;
            }
            let Some(text) = arg.to_str() else {
                return arg;
            };
            if text == "--" {
                passthrough = true;
                return arg;
            }
            match text.strip_prefix('-') {
                Some(rest) if !rest.starts_with('-') && is_single_dash_flag(rest) => {
                    OsString::from(format!("--{rest}"))
                }
                _ => arg,
            }
        })
        .collect()
}

fn is_single_dash_flag(rest: &str) -> bool {
    let name = rest.split_once('=').map_or(rest, |(name, _)| name);
    SINGLE_DASH_FLAGS.contains(&name)
}
