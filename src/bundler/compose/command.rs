//! Composed commands and the context their fragments run against.

use super::{
    Stage,
    hooks::{Hooks, Layout, PathContext, SkeletonEntry, StageMixin, StageOutcome},
    precedence::{Hook, Layer},
};
use crate::bundler::{
    error::{Error, Result},
    settings::Settings,
    tools::{ToolEnvironment, ToolHandle, ToolKind, ToolRegistry},
    utils::{
        fs::HostFs,
        process::{Invocation, ProcessRunner},
    },
};
use std::{fmt, path::PathBuf, sync::Arc};

/// Host capabilities shared by every command a [`Composer`](super::Composer)
/// builds.
#[derive(Clone)]
pub struct HostEnvironment {
    tools: ToolEnvironment,
    runner: Arc<dyn ProcessRunner>,
}

impl HostEnvironment {
    /// Bundles the tool environment with a process runner.
    pub fn new(tools: ToolEnvironment, runner: Arc<dyn ProcessRunner>) -> Self {
        Self { tools, runner }
    }

    /// Environment managed tools are resolved against.
    pub fn tools(&self) -> &ToolEnvironment {
        &self.tools
    }

    pub(super) fn runner(&self) -> Arc<dyn ProcessRunner> {
        Arc::clone(&self.runner)
    }
}

impl fmt::Debug for HostEnvironment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HostEnvironment")
            .field("tools", &self.tools)
            .finish_non_exhaustive()
    }
}

/// The three fragments of a command, addressed by [`Layer`].
pub(super) struct Fragments {
    pub(super) platform: Arc<dyn Hooks>,
    pub(super) format: Arc<dyn Hooks>,
    pub(super) stage: Arc<dyn Hooks>,
}

/// Everything a fragment can see and do while a command runs.
///
/// Hooks are always dispatched through the context so the precedence table
/// is the single place deciding which fragment answers.
pub struct CommandContext {
    platform: &'static str,
    format: &'static str,
    description: &'static str,
    stage: Stage,
    fragments: Fragments,
    settings: Settings,
    tools: ToolRegistry,
    runner: Arc<dyn ProcessRunner>,
}

impl CommandContext {
    #[allow(clippy::too_many_arguments)]
    pub(super) fn new(
        platform: &'static str,
        format: &'static str,
        description: &'static str,
        stage: Stage,
        fragments: Fragments,
        settings: Settings,
        tools: ToolRegistry,
        runner: Arc<dyn ProcessRunner>,
    ) -> Self {
        Self {
            platform,
            format,
            description,
            stage,
            fragments,
            settings,
            tools,
            runner,
        }
    }

    /// Platform name.
    pub fn platform(&self) -> &'static str {
        self.platform
    }

    /// Output format name.
    pub fn format(&self) -> &'static str {
        self.format
    }

    /// Human description of the target, e.g. "Linux AppImage".
    pub fn description(&self) -> &'static str {
        self.description
    }

    /// Stage being run.
    pub fn stage(&self) -> Stage {
        self.stage
    }

    /// The application descriptor.
    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// `platform/format/stage`, as used in error messages.
    pub fn triple(&self) -> String {
        format!("{}/{}/{}", self.platform, self.format, self.stage)
    }

    fn fragment(&self, layer: Layer) -> &Arc<dyn Hooks> {
        match layer {
            Layer::Platform => &self.fragments.platform,
            Layer::Format => &self.fragments.format,
            Layer::Stage => &self.fragments.stage,
        }
    }

    fn path_context(&self) -> PathContext<'_> {
        PathContext {
            app: &self.settings,
            platform: self.platform,
            format: self.format,
        }
    }

    fn unhandled(&self, hook: Hook) -> Error {
        Error::Configuration(format!(
            "no fragment of {} implements `{}`",
            self.triple(),
            hook
        ))
    }

    fn resolve_path<F>(&self, hook: Hook, f: F) -> Result<PathBuf>
    where
        F: Fn(&dyn Hooks, &PathContext<'_>) -> Option<PathBuf>,
    {
        let cx = self.path_context();
        hook.precedence()
            .iter()
            .find_map(|layer| f(self.fragment(*layer).as_ref(), &cx))
            .ok_or_else(|| self.unhandled(hook))
    }

    /// Directory holding everything generated for this app/platform/format.
    pub fn bundle_path(&self) -> Result<PathBuf> {
        self.resolve_path(Hook::BundlePath, |hooks, cx| hooks.bundle_path(cx))
    }

    /// The built artifact.
    pub fn binary_path(&self) -> Result<PathBuf> {
        let bundle = self.bundle_path()?;
        self.resolve_path(Hook::BinaryPath, |hooks, cx| hooks.binary_path(cx, &bundle))
    }

    /// Directory the skeleton is populated into.
    pub fn project_path(&self) -> Result<PathBuf> {
        let bundle = self.bundle_path()?;
        let binary = self.binary_path()?;
        self.resolve_path(Hook::ProjectPath, |hooks, cx| {
            hooks.project_path(cx, &bundle, &binary)
        })
    }

    /// What Run launches.
    pub fn executable_path(&self) -> Result<PathBuf> {
        let project = self.project_path()?;
        let binary = self.binary_path()?;
        self.resolve_path(Hook::ExecutablePath, |hooks, cx| {
            hooks.executable_path(cx, &project, &binary)
        })
    }

    /// Where Package writes the distributable.
    pub fn distribution_path(&self) -> Result<PathBuf> {
        self.resolve_path(Hook::DistributionPath, |hooks, cx| {
            hooks.distribution_path(cx)
        })
    }

    /// All resolved paths of this command.
    pub fn layout(&self) -> Result<Layout> {
        let bundle = self.bundle_path()?;
        let binary = self.binary_path()?;
        let project = self.project_path()?;
        let executable = self.executable_path()?;
        let distribution = self.distribution_path()?;
        Ok(Layout {
            bundle,
            binary,
            project,
            executable,
            distribution,
        })
    }

    /// Skeleton entries Create and Update materialize.
    pub fn skeleton(&self) -> Result<Vec<SkeletonEntry>> {
        let layout = self.layout()?;
        let cx = self.path_context();
        for layer in Hook::Skeleton.precedence() {
            if let Some(entries) = self.fragment(*layer).skeleton(&cx, &layout)? {
                return Ok(entries);
            }
        }
        Err(self.unhandled(Hook::Skeleton))
    }

    /// Signs the built artifact through the first profile that can.
    pub async fn sign_app(&mut self, identity: &str) -> Result<()> {
        for layer in Hook::Sign.precedence() {
            let fragment = Arc::clone(self.fragment(*layer));
            if fragment.sign_app(self, identity).await? {
                return Ok(());
            }
        }
        Err(self.unhandled(Hook::Sign))
    }

    /// Dispatches a primary-action hook in precedence order.
    pub async fn perform(&mut self, hook: Hook) -> Result<()> {
        for layer in hook.precedence() {
            let fragment = Arc::clone(self.fragment(*layer));
            let handled = match hook {
                Hook::Open => fragment.open_app(self).await?,
                Hook::Build => fragment.build_app(self).await?,
                Hook::Run => fragment.run_app(self).await?,
                Hook::Package => fragment.package_app(self).await?,
                Hook::Publish => fragment.publish_app(self).await?,
                _ => crate::bail!("`{}` is not an action hook", hook),
            };
            if handled {
                log::debug!("{} handled by the {:?} fragment", hook, layer);
                return Ok(());
            }
        }
        Err(self.unhandled(hook))
    }

    /// Resolves a managed tool, installing it on first use.
    pub async fn tool(&mut self, kind: ToolKind) -> Result<ToolHandle> {
        self.tools.resolve(kind).await
    }

    /// This command's tool registry.
    pub fn tools(&self) -> &ToolRegistry {
        &self.tools
    }

    /// Mutable access to the tool registry.
    pub fn tools_mut(&mut self) -> &mut ToolRegistry {
        &mut self.tools
    }

    /// Host filesystem, shared with tool resolution.
    pub fn fs(&self) -> &dyn HostFs {
        self.tools.environment().fs()
    }

    /// Runs a native toolchain command.
    pub async fn run(&self, invocation: &Invocation) -> Result<()> {
        log::info!("Running {}", invocation);
        self.runner.run(invocation).await
    }
}

/// A runnable point in platform × format × stage.
pub struct Command {
    action: Arc<dyn StageMixin>,
    cx: CommandContext,
}

impl Command {
    pub(super) fn new(action: Arc<dyn StageMixin>, cx: CommandContext) -> Self {
        Self { action, cx }
    }

    /// One-line description, e.g. "Build a macOS app.".
    pub fn description(&self) -> String {
        self.cx.stage.describe(self.cx.description)
    }

    /// Runs the stage.
    pub async fn execute(&mut self) -> Result<StageOutcome> {
        log::info!("{}", self.description());
        let action = Arc::clone(&self.action);
        action.run(&mut self.cx).await
    }

    /// The command's context.
    pub fn context(&self) -> &CommandContext {
        &self.cx
    }

    /// Mutable access to the command's context.
    pub fn context_mut(&mut self) -> &mut CommandContext {
        &mut self.cx
    }
}
