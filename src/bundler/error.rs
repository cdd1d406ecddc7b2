//! Error taxonomy for stage composition and tool provisioning.
//!
//! The first three variants ([`Error::MissingTool`], [`Error::NetworkFailure`],
//! [`Error::Configuration`]) are the classified failures callers are expected to
//! match on. Everything else is propagated as-is from the filesystem, the fetch
//! primitive or the native toolchain.

use crate::bundler::compose::Stage;
use crate::bundler::utils::http::FetchError;
use std::{fmt::Display, io, path::PathBuf};
use thiserror::Error;

/// Result type alias for bundler operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors produced by the bundler core.
#[derive(Debug, Error)]
pub enum Error {
    /// A required tool is absent and could not (or may not) be installed.
    #[error("Unable to locate {tool}. Has it been installed?")]
    MissingTool {
        /// Tool name.
        tool: String,
    },

    /// A fetch failed at the connection level.
    #[error("Network failure while {operation}. Is your computer offline?")]
    NetworkFailure {
        /// What was being attempted, e.g. "downloading linuxdeploy artifacts".
        operation: String,
    },

    /// No fragment exists for the requested platform/format/stage, or no
    /// fragment handles a hook the stage needs.
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// An upgrade was requested for a tool that lives outside the tools directory.
    #[error("{tool} is not managed by the bundler; upgrade it with your system package manager")]
    UnmanagedTool {
        /// Tool name.
        tool: String,
    },

    /// A stage ran before the stage it depends on.
    #[error("{} does not exist; run `{run_first}` first", .path.display())]
    Prerequisite {
        /// The missing path.
        path: PathBuf,
        /// Stage that produces it.
        run_first: Stage,
    },

    /// Unclassified fetch error, propagated unmodified.
    #[error(transparent)]
    Fetch(#[from] FetchError),

    /// A native tool could not be spawned.
    #[error("failed to run `{command}`: {error}")]
    CommandFailed {
        /// Program name.
        command: String,
        /// Spawn error.
        error: io::Error,
    },

    /// A native tool exited unsuccessfully.
    #[error("`{command}` exited with status {code:?}")]
    CommandStatus {
        /// Program name.
        command: String,
        /// Exit code, if the process was not killed by a signal.
        code: Option<i32>,
    },

    /// Filesystem error with the operation and path that caused it.
    #[error("{context} {}: {error}", .path.display())]
    Fs {
        /// Operation being performed.
        context: &'static str,
        /// Path involved.
        path: PathBuf,
        /// Underlying error.
        error: io::Error,
    },

    /// Bare I/O error.
    #[error("{0}")]
    IoError(#[from] io::Error),

    /// Build state (de)serialization error.
    #[error("{0}")]
    Json(#[from] serde_json::Error),

    /// Info.plist generation error.
    #[error("{0}")]
    Plist(#[from] plist::Error),

    /// Template rendering error.
    #[error("{0}")]
    Template(#[from] handlebars::RenderError),

    /// Directory walk error.
    #[error("{0}")]
    WalkDir(#[from] walkdir::Error),

    /// Path prefix error while mirroring directory trees.
    #[error("{0}")]
    StripPrefix(#[from] std::path::StripPrefixError),

    /// Anything else.
    #[error("{0}")]
    GenericError(String),
}

impl Error {
    /// Shorthand for [`Error::MissingTool`].
    pub fn missing_tool(tool: impl Into<String>) -> Self {
        Self::MissingTool { tool: tool.into() }
    }

    /// Whether this is a [`Error::Configuration`] failure.
    pub fn is_configuration(&self) -> bool {
        matches!(self, Self::Configuration(_))
    }
}

/// Attach a message to a failure or to a missing value.
pub trait Context<T> {
    /// Converts the failure into an [`Error::GenericError`] prefixed with `msg`.
    fn context<C: Display>(self, msg: C) -> Result<T>;
}

impl<T> Context<T> for Option<T> {
    fn context<C: Display>(self, msg: C) -> Result<T> {
        self.ok_or_else(|| Error::GenericError(msg.to_string()))
    }
}

impl<T> Context<T> for Result<T> {
    fn context<C: Display>(self, msg: C) -> Result<T> {
        self.map_err(|e| Error::GenericError(format!("{msg}: {e}")))
    }
}

/// Attach the operation and path to an I/O failure.
pub trait ErrorExt<T> {
    /// Wraps the error as [`Error::Fs`].
    fn fs_context(self, context: &'static str, path: impl Into<PathBuf>) -> Result<T>;
}

impl<T> ErrorExt<T> for std::result::Result<T, io::Error> {
    fn fs_context(self, context: &'static str, path: impl Into<PathBuf>) -> Result<T> {
        self.map_err(|error| Error::Fs {
            context,
            path: path.into(),
            error,
        })
    }
}

/// Return early with an [`Error::GenericError`].
#[macro_export]
macro_rules! bail {
    ($($arg:tt)*) => {
        return Err($crate::bundler::Error::GenericError(format!($($arg)*)))
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fs_context_keeps_path_and_operation() {
        let err = std::fs::read("/definitely/not/here")
            .fs_context("reading fixture", "/definitely/not/here")
            .unwrap_err();
        let msg = err.to_string();
        assert!(msg.starts_with("reading fixture /definitely/not/here"));
    }

    #[test]
    fn option_context_becomes_generic_error() {
        let err = None::<u8>.context("no main binary").unwrap_err();
        assert!(matches!(err, Error::GenericError(ref m) if m == "no main binary"));
    }

    #[test]
    fn network_failure_names_operation() {
        let err = Error::NetworkFailure {
            operation: "downloading linuxdeploy artifacts".into(),
        };
        assert!(err.to_string().contains("linuxdeploy"));
    }
}
