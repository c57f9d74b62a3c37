//! Linux trust store integration
//!
//! Distributions differ in where anchors live and which tool rebuilds the
//! bundle. The first anchor directory that exists decides both.

use std::path::{Path, PathBuf};

use tracing::debug;

use super::{run, Escalation};
use crate::authority::Authority;
use crate::error::{MkcertError, Result};

/// An anchor directory and the command that refreshes the system bundle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AnchorLayout {
    /// Directory the CA certificate is copied into
    pub anchor_dir: &'static str,
    /// Refresh command and its arguments
    pub refresh: &'static [&'static str],
}

/// Known layouts, in probing order
pub const LAYOUTS: &[AnchorLayout] = &[
    // RHEL, Fedora, CentOS
    AnchorLayout {
        anchor_dir: "/etc/pki/ca-trust/source/anchors",
        refresh: &["update-ca-trust", "extract"],
    },
    // Debian, Ubuntu, Alpine
    AnchorLayout {
        anchor_dir: "/usr/local/share/ca-certificates",
        refresh: &["update-ca-certificates"],
    },
    // Arch
    AnchorLayout {
        anchor_dir: "/etc/ca-certificates/trust-source/anchors",
        refresh: &["trust", "extract-compat"],
    },
    // openSUSE
    AnchorLayout {
        anchor_dir: "/usr/share/pki/trust/anchors",
        refresh: &["update-ca-certificates"],
    },
];

/// First layout whose anchor directory exists
pub fn detect_layout() -> Option<&'static AnchorLayout> {
    detect_layout_in(LAYOUTS, |dir| Path::new(dir).is_dir())
}

fn detect_layout_in<'a>(
    layouts: &'a [AnchorLayout],
    exists: impl Fn(&str) -> bool,
) -> Option<&'a AnchorLayout> {
    layouts.iter().find(|layout| exists(layout.anchor_dir))
}

/// Destination of the CA certificate inside `layout`
pub fn anchor_path(layout: &AnchorLayout, authority: &Authority) -> PathBuf {
    Path::new(layout.anchor_dir).join(format!("{}.crt", authority.unique_name()))
}

fn require_layout(action: &'static str) -> Result<&'static AnchorLayout> {
    detect_layout().ok_or_else(|| MkcertError::Platform {
        action,
        command: "locate system trust store".to_string(),
        detail: "installing to the system store is not yet supported on this Linux 😣".to_string(),
    })
}

fn refresh(action: &'static str, layout: &AnchorLayout, escalation: Escalation) -> Result<()> {
    let (program, args) = layout
        .refresh
        .split_first()
        .ok_or_else(|| MkcertError::Platform {
            action,
            command: String::new(),
            detail: "no refresh command configured".to_string(),
        })?;
    run(action, escalation.command(program, args))
}

/// Copy the CA into the anchor directory and rebuild the bundle
///
/// # Errors
///
/// Returns an error if no known layout exists or either command fails.
pub fn install(authority: &Authority) -> Result<()> {
    let layout = require_layout("install")?;
    let escalation = Escalation::detect();
    let target = anchor_path(layout, authority).to_string_lossy().into_owned();
    let source = authority
        .certificate_path()
        .to_string_lossy()
        .into_owned();

    debug!("copying {} to {}", source, target);
    run(
        "install",
        escalation.command("cp", &[source.as_str(), target.as_str()]),
    )?;
    refresh("install", layout, escalation)
}

/// Remove the CA from the anchor directory and rebuild the bundle
///
/// # Errors
///
/// Returns an error if no known layout exists or either command fails.
pub fn uninstall(authority: &Authority) -> Result<()> {
    let layout = require_layout("uninstall")?;
    let escalation = Escalation::detect();
    let target = anchor_path(layout, authority).to_string_lossy().into_owned();

    run("uninstall", escalation.command("rm", &["-f", target.as_str()]))?;
    refresh("uninstall", layout, escalation)
}
