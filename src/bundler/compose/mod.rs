//! Command composition.
//!
//! A build command is a point in platform × format × stage. Rather than one
//! type per combination, each axis contributes a fragment implementing
//! [`Hooks`] and the [`Composer`] assembles the three into a [`Command`].
//! Conflicts between fragments are settled by the fixed table in
//! [`precedence`].
//!
//! # Module Organization
//!
//! - [`stage`] - Lifecycle stages
//! - [`precedence`] - Which fragment answers which hook
//! - [`hooks`] - Fragment contracts
//! - [`command`] - Composed command and its context
//! - [`registry`] - Registered fragments
//! - [`composer`] - Triple to command

pub mod command;
pub mod composer;
pub mod hooks;
pub mod precedence;
pub mod registry;
pub mod stage;

pub use command::{Command, CommandContext, HostEnvironment};
pub use composer::Composer;
pub use hooks::{
    FormatProfile, Hooks, Layout, PathContext, PlatformProfile, SkeletonEntry, StageMixin,
    StageOutcome,
};
pub use precedence::{Hook, Layer};
pub use registry::ProfileRegistry;
pub use stage::Stage;
