//! External process execution for restore scripts.

use std::path::{Path, PathBuf};

use tokio::process::Command;
use tracing::{debug, error, info};

#[cfg(test)]
#[path = "command_tests.rs"]
mod tests;

/// Errors from running an external command.
#[derive(Debug, thiserror::Error)]
pub enum CommandError {
    #[error("Failed to start '{command}': {source}")]
    Spawn {
        command: String,
        #[source]
        source: std::io::Error,
    },

    #[error("'{command}' exited with {}", code.map_or_else(|| "a signal".to_string(), |c| format!("code {c}")))]
    Failed {
        command: String,
        code: Option<i32>,
        stdout: String,
        stderr: String,
    },
}

impl CommandError {
    /// The error followed by whatever the command printed.
    pub fn report(&self) -> String {
        match self {
            CommandError::Spawn { .. } => self.to_string(),
            CommandError::Failed { stdout, stderr, .. } => {
                format!("{}\n{}\n{}", self, stdout, stderr)
            }
        }
    }
}

/// A program with fixed arguments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShellCommand {
    program: PathBuf,
    args: Vec<String>,
}

impl ShellCommand {
    pub fn new<I, S>(program: impl Into<PathBuf>, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            program: program.into(),
            args: args.into_iter().map(Into::into).collect(),
        }
    }

    /// `{project_root}/psh.phar e2e:cleanup`, run by the cleanup server.
    pub fn psh_cleanup(project_root: &Path) -> Self {
        Self::new(project_root.join("psh.phar"), ["e2e:cleanup"])
    }

    /// `{shopware_root}/bin/console e2e:restore-db`, used for local runs.
    pub fn console_restore(shopware_root: &Path) -> Self {
        Self::new(shopware_root.join("bin").join("console"), ["e2e:restore-db"])
    }

    pub fn program(&self) -> &Path {
        &self.program
    }

    pub fn args(&self) -> &[String] {
        &self.args
    }

    /// The command line as it would be typed.
    pub fn display(&self) -> String {
        let mut line = self.program.display().to_string();
        for arg in &self.args {
            line.push(' ');
            line.push_str(arg);
        }
        line
    }

    /// Runs the command to completion.
    ///
    /// # Returns
    /// The command's standard output when it exits with code 0.
    pub async fn run(&self) -> Result<String, CommandError> {
        let line = self.display();
        info!(command = %line, "Running command");

        let output = Command::new(&self.program)
            .args(&self.args)
            .output()
            .await
            .map_err(|source| {
                error!(command = %line, error = %source, "Command could not be started");
                CommandError::Spawn {
                    command: line.clone(),
                    source,
                }
            })?;

        let stdout = String::from_utf8_lossy(&output.stdout).into_owned();
        let stderr = String::from_utf8_lossy(&output.stderr).into_owned();

        if !output.status.success() {
            error!(
                command = %line,
                code = ?output.status.code(),
                stderr = %stderr.trim(),
                "Command failed"
            );
            return Err(CommandError::Failed {
                command: line,
                code: output.status.code(),
                stdout,
                stderr,
            });
        }

        debug!(command = %line, "Command finished");
        Ok(stdout)
    }
}
