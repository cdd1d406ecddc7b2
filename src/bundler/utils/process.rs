//! Native toolchain invocation.
//!
//! Profiles never spawn processes directly; they describe an [`Invocation`]
//! and hand it to the command's [`ProcessRunner`].

use crate::bundler::error::{Error, Result};
use async_trait::async_trait;
use std::{
    fmt,
    path::{Path, PathBuf},
};

/// A single native tool invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    program: PathBuf,
    args: Vec<String>,
    env: Vec<(String, String)>,
    current_dir: Option<PathBuf>,
}

impl Invocation {
    /// Starts an invocation of `program`.
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
            env: Vec::new(),
            current_dir: None,
        }
    }

    /// Appends one argument.
    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    /// Appends a path argument.
    pub fn path_arg(self, path: &Path) -> Self {
        self.arg(path.display().to_string())
    }

    /// Appends several arguments.
    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    /// Sets an environment variable for the child.
    pub fn env(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.env.push((key.into(), value.into()));
        self
    }

    /// Runs the child from `dir`.
    pub fn current_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.current_dir = Some(dir.into());
        self
    }

    /// Program to run.
    pub fn program(&self) -> &Path {
        &self.program
    }

    /// Arguments, in order.
    pub fn arguments(&self) -> &[String] {
        &self.args
    }

    /// Extra environment variables.
    pub fn environment(&self) -> &[(String, String)] {
        &self.env
    }

    /// Short program name for messages.
    pub fn command_name(&self) -> String {
        self.program
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| self.program.display().to_string())
    }
}

impl fmt::Display for Invocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.program.display())?;
        for arg in &self.args {
            write!(f, " {}", arg)?;
        }
        Ok(())
    }
}

/// Executes invocations and waits for them to finish.
#[async_trait]
pub trait ProcessRunner: Send + Sync {
    /// Runs `invocation` to completion; a non-zero exit is an error.
    async fn run(&self, invocation: &Invocation) -> Result<()>;
}

/// [`ProcessRunner`] that spawns real processes with tokio.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemRunner;

#[async_trait]
impl ProcessRunner for SystemRunner {
    async fn run(&self, invocation: &Invocation) -> Result<()> {
        log::debug!("Running: {}", invocation);

        let mut command = tokio::process::Command::new(invocation.program());
        command.args(invocation.arguments());
        for (key, value) in invocation.environment() {
            command.env(key, value);
        }
        if let Some(dir) = &invocation.current_dir {
            command.current_dir(dir);
        }

        let status = command.status().await.map_err(|error| Error::CommandFailed {
            command: invocation.command_name(),
            error,
        })?;

        if !status.success() {
            return Err(Error::CommandStatus {
                command: invocation.command_name(),
                code: status.code(),
            });
        }
        Ok(())
    }
}
