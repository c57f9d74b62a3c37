//! Per-family trust store commands
//!
//! - Linux and other Unix-likes: distribution anchor directory plus refresh tool
//! - macOS: `security` against the System keychain
//! - Windows: `certutil` against the Root store

pub mod linux;
pub mod macos;
pub mod windows;

use std::process::Command;

use tracing::debug;

use crate::error::{MkcertError, Result};

/// Run `command`, turning a spawn failure or non-zero exit into an error
pub(crate) fn run(action: &'static str, mut command: Command) -> Result<()> {
    let rendered = render(&command);
    debug!("running `{}`", rendered);

    let output = command.output().map_err(|e| MkcertError::Platform {
        action,
        command: rendered.clone(),
        detail: e.to_string(),
    })?;

    if output.status.success() {
        return Ok(());
    }

    let stderr = String::from_utf8_lossy(&output.stderr);
    Err(MkcertError::Platform {
        action,
        command: rendered,
        detail: format!(
            "exit code {}: {}",
            output.status.code().unwrap_or(-1),
            stderr.trim()
        ),
    })
}

/// How privileged commands are launched, decided once per operation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Escalation {
    sudo: bool,
}

impl Escalation {
    /// Inspect the host: use `sudo` unless already root or `sudo` is missing
    pub(crate) fn detect() -> Self {
        let sudo = !is_root() && sudo_available();
        debug!(sudo, "privilege escalation");
        Self { sudo }
    }

    /// Run commands as they are
    #[cfg(test)]
    pub(crate) fn direct() -> Self {
        Self { sudo: false }
    }

    /// Run commands through `sudo`
    #[cfg(test)]
    pub(crate) fn through_sudo() -> Self {
        Self { sudo: true }
    }

    /// Build `program args...`, prefixed with `sudo` when escalating
    pub(crate) fn command(self, program: &str, args: &[&str]) -> Command {
        if !self.sudo {
            let mut command = Command::new(program);
            command.args(args);
            return command;
        }

        let mut command = Command::new("sudo");
        command
            .arg("--prompt=Sudo password:")
            .arg("--")
            .arg(program)
            .args(args);
        command
    }
}

fn is_root() -> bool {
    Command::new("id")
        .arg("-u")
        .output()
        .map(|out| out.status.success() && String::from_utf8_lossy(&out.stdout).trim() == "0")
        .unwrap_or(false)
}

fn sudo_available() -> bool {
    Command::new("sudo")
        .arg("--version")
        .output()
        .map(|out| out.status.success())
        .unwrap_or(false)
}

/// Shell-like rendering of a command for diagnostics
pub(crate) fn render(command: &Command) -> String {
    std::iter::once(command.get_program())
        .chain(command.get_args())
        .map(|part| part.to_string_lossy().into_owned())
        .collect::<Vec<_>>()
        .join(" ")
}
