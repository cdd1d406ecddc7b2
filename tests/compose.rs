//! Composition, hook precedence and the stage lifecycle across platforms.

mod common;

use async_trait::async_trait;
use common::{fake_host, hello_app};
use kodegen_bundler_pipeline::bundler::{
    BundleSettings, Command, Composer, Error, ProfileRegistry, Settings, Stage, StageOutcome,
    ToolKind,
    compose::{
        CommandContext, FormatProfile, Hook, Hooks, Layout, PathContext, PlatformProfile,
        SkeletonEntry, StageMixin,
    },
    error::Result,
    stages::{self, state},
};
use std::{
    path::{Path, PathBuf},
    sync::{Arc, Mutex},
};

type Trace = Arc<Mutex<Vec<&'static str>>>;

fn calls(trace: &Trace) -> Vec<&'static str> {
    trace.lock().unwrap().clone()
}

struct StubPlatform {
    trace: Trace,
}

impl PlatformProfile for StubPlatform {
    fn name(&self) -> &'static str {
        "stub"
    }
}

#[async_trait]
impl Hooks for StubPlatform {
    fn bundle_path(&self, cx: &PathContext<'_>) -> Option<PathBuf> {
        Some(cx.app.base_directory().join("from-platform"))
    }

    fn distribution_path(&self, cx: &PathContext<'_>) -> Option<PathBuf> {
        Some(cx.app.base_directory().join("from-platform.dist"))
    }

    async fn open_app(&self, _cx: &mut CommandContext) -> Result<bool> {
        self.trace.lock().unwrap().push("platform");
        Ok(true)
    }
}

struct StubFormat {
    trace: Trace,
    claims_bundle: bool,
    claims_open: bool,
}

impl FormatProfile for StubFormat {
    fn platform(&self) -> &'static str {
        "stub"
    }

    fn name(&self) -> &'static str {
        "raw"
    }

    fn description(&self) -> &'static str {
        "stub bundle"
    }
}

#[async_trait]
impl Hooks for StubFormat {
    fn bundle_path(&self, cx: &PathContext<'_>) -> Option<PathBuf> {
        self.claims_bundle
            .then(|| cx.app.base_directory().join("from-format"))
    }

    fn binary_path(&self, _cx: &PathContext<'_>, bundle: &Path) -> Option<PathBuf> {
        Some(bundle.join("app.bin"))
    }

    fn project_path(&self, _cx: &PathContext<'_>, bundle: &Path, _binary: &Path) -> Option<PathBuf> {
        Some(bundle.to_path_buf())
    }

    fn executable_path(&self, _cx: &PathContext<'_>, _project: &Path, binary: &Path) -> Option<PathBuf> {
        Some(binary.to_path_buf())
    }

    fn skeleton(&self, _cx: &PathContext<'_>, layout: &Layout) -> Result<Option<Vec<SkeletonEntry>>> {
        Ok(Some(vec![SkeletonEntry::File {
            path: layout.project.join("marker"),
            contents: b"stub".to_vec(),
        }]))
    }

    async fn open_app(&self, _cx: &mut CommandContext) -> Result<bool> {
        self.trace.lock().unwrap().push("format");
        Ok(self.claims_open)
    }
}

/// Replaces the Open stage; records itself and optionally handles the action.
struct TracedOpen {
    trace: Trace,
    claims_open: bool,
}

#[async_trait]
impl Hooks for TracedOpen {
    async fn open_app(&self, _cx: &mut CommandContext) -> Result<bool> {
        self.trace.lock().unwrap().push("stage");
        Ok(self.claims_open)
    }
}

#[async_trait]
impl StageMixin for TracedOpen {
    fn stage(&self) -> Stage {
        Stage::Open
    }

    async fn run(&self, cx: &mut CommandContext) -> Result<StageOutcome> {
        cx.perform(Hook::Open).await?;
        Ok(StageOutcome::Opened {
            bundle: cx.bundle_path()?,
        })
    }
}

fn stub_registry(trace: &Trace, claims_bundle: bool, format_opens: bool, stage_opens: bool) -> ProfileRegistry {
    let mut registry = ProfileRegistry::new();
    registry
        .register_platform(StubPlatform {
            trace: Arc::clone(trace),
        })
        .register_format(StubFormat {
            trace: Arc::clone(trace),
            claims_bundle,
            claims_open: format_opens,
        });
    stages::register(&mut registry);
    registry.register_stage(TracedOpen {
        trace: Arc::clone(trace),
        claims_open: stage_opens,
    });
    registry
}

fn stub_command(tmp: &Path, registry: ProfileRegistry, stage: Stage) -> Command {
    let host = fake_host(&tmp.join("tools"));
    Composer::new(registry, host.host)
        .compose_stage("stub", "raw", stage, hello_app(tmp, BundleSettings::default()))
        .unwrap()
}

#[tokio::test]
async fn format_path_hooks_beat_the_platform() {
    let tmp = tempfile::tempdir().unwrap();
    let trace = Trace::default();
    let command = stub_command(tmp.path(), stub_registry(&trace, true, false, false), Stage::Open);

    assert_eq!(
        command.context().bundle_path().unwrap(),
        tmp.path().join("from-format")
    );
}

#[tokio::test]
async fn platform_answers_path_hooks_the_format_declines() {
    let tmp = tempfile::tempdir().unwrap();
    let trace = Trace::default();
    let command = stub_command(tmp.path(), stub_registry(&trace, false, false, false), Stage::Open);

    let layout = command.context().layout().unwrap();
    assert_eq!(layout.bundle, tmp.path().join("from-platform"));
    assert_eq!(layout.binary, tmp.path().join("from-platform").join("app.bin"));
    assert_eq!(layout.distribution, tmp.path().join("from-platform.dist"));
}

#[tokio::test]
async fn stage_handles_its_primary_action_first() {
    let tmp = tempfile::tempdir().unwrap();
    let trace = Trace::default();
    let mut command = stub_command(tmp.path(), stub_registry(&trace, true, true, true), Stage::Open);

    command.execute().await.unwrap();

    assert_eq!(calls(&trace), vec!["stage"]);
}

#[tokio::test]
async fn declined_actions_fall_through_to_the_next_layer() {
    let tmp = tempfile::tempdir().unwrap();
    let trace = Trace::default();
    let mut command = stub_command(tmp.path(), stub_registry(&trace, true, false, false), Stage::Open);

    command.execute().await.unwrap();

    assert_eq!(calls(&trace), vec!["stage", "format", "platform"]);
}

#[tokio::test]
async fn unhandled_hooks_are_configuration_errors() {
    let tmp = tempfile::tempdir().unwrap();
    let trace = Trace::default();
    let mut command = stub_command(tmp.path(), stub_registry(&trace, true, false, false), Stage::Run);

    let err = command.context_mut().perform(Hook::Run).await.unwrap_err();
    assert!(err.is_configuration());
    assert!(err.to_string().contains("stub/raw/run"));
    assert!(err.to_string().contains("run_app"));

    let err = command.context_mut().sign_app("-").await.unwrap_err();
    assert!(err.to_string().contains("sign_app"));
}

#[tokio::test]
async fn composing_an_unknown_triple_fails_before_running() {
    let tmp = tempfile::tempdir().unwrap();
    let host = fake_host(&tmp.path().join("tools"));
    let composer = Composer::new(ProfileRegistry::builtin(), host.host);
    let app = hello_app(tmp.path(), BundleSettings::default());

    let err = composer.compose("android", "apk", "build", app.clone()).err().unwrap();
    assert!(err.is_configuration());
    assert!(err.to_string().contains("available platforms: macos, linux, windows"));

    let err = composer.compose("linux", "flatpak", "build", app.clone()).err().unwrap();
    assert!(err.to_string().contains("available formats: appimage"));

    let err = composer.compose("linux", "appimage", "deploy", app).err().unwrap();
    assert!(err.is_configuration());
}

#[tokio::test]
async fn stage_without_a_fragment_is_a_configuration_error() {
    let tmp = tempfile::tempdir().unwrap();
    let trace = Trace::default();
    let mut registry = ProfileRegistry::new();
    registry
        .register_platform(StubPlatform {
            trace: Arc::clone(&trace),
        })
        .register_format(StubFormat {
            trace,
            claims_bundle: true,
            claims_open: true,
        });
    let host = fake_host(&tmp.path().join("tools"));

    let err = Composer::new(registry, host.host)
        .compose_stage("stub", "raw", Stage::Create, hello_app(tmp.path(), BundleSettings::default()))
        .err()
        .unwrap();
    assert!(err.to_string().contains("create"));
}

/// Composes linux/appimage commands against the host fakes.
struct Pipeline {
    composer: Composer,
    app: Settings,
}

impl Pipeline {
    fn command(&self, stage: Stage) -> Command {
        self.composer
            .compose_stage("linux", "appimage", stage, self.app.clone())
            .unwrap()
    }

    async fn run(&self, stage: Stage) -> Result<StageOutcome> {
        self.command(stage).execute().await
    }

    fn bundle(&self) -> PathBuf {
        self.app.base_directory().join("build/hello/linux/appimage")
    }

    fn app_dir(&self) -> PathBuf {
        self.bundle().join("Hello World.AppDir")
    }

    fn appimage(&self) -> PathBuf {
        self.bundle().join("Hello_World-0.2.0-x86_64.AppImage")
    }
}

fn pipeline(root: &Path, host: &common::FakeHost, bundle: BundleSettings) -> Pipeline {
    Pipeline {
        composer: Composer::new(ProfileRegistry::builtin(), host.host.clone()),
        app: hello_app(root, bundle),
    }
}

fn assert_prerequisite(err: Error, stage: Stage) {
    match err {
        Error::Prerequisite { run_first, .. } => assert_eq!(run_first, stage),
        other => panic!("expected a prerequisite error, got {other:?}"),
    }
}

#[tokio::test]
async fn create_populates_the_app_dir_and_is_repeatable() {
    let tmp = tempfile::tempdir().unwrap();
    let host = fake_host(&tmp.path().join("tools"));
    let p = pipeline(tmp.path(), &host, BundleSettings::default());

    let outcome = p.run(Stage::Create).await.unwrap();
    assert_eq!(outcome, StageOutcome::Created { bundle: p.bundle() });
    std::fs::write(p.bundle().join("stale.txt"), b"old").unwrap();

    p.run(Stage::Create).await.unwrap();

    assert!(!p.bundle().join("stale.txt").exists());
    assert!(p.app_dir().join("usr/bin/hello").is_file());
    assert!(p.app_dir().join("usr/lib").is_dir());
    let desktop = std::fs::read_to_string(p.app_dir().join("hello.desktop")).unwrap();
    assert!(desktop.contains("Name=Hello World\n"));
    assert!(desktop.contains("Exec=hello\n"));

    assert!(host.fetcher.fetched().is_empty());
    assert!(host.runner.invocations().is_empty());
}

#[tokio::test]
async fn create_marks_copied_binaries_executable_through_the_host() {
    let tmp = tempfile::tempdir().unwrap();
    let host = fake_host(&tmp.path().join("tools"));
    let p = pipeline(tmp.path(), &host, BundleSettings::default());

    p.run(Stage::Create).await.unwrap();

    assert_eq!(host.fs.made_executable(), vec![p.app_dir().join("usr/bin/hello")]);
}

#[tokio::test]
async fn update_requires_a_created_bundle() {
    let tmp = tempfile::tempdir().unwrap();
    let host = fake_host(&tmp.path().join("tools"));
    let p = pipeline(tmp.path(), &host, BundleSettings::default());

    let err = p.run(Stage::Update).await.unwrap_err();
    assert_prerequisite(err, Stage::Create);
    assert!(!p.bundle().exists());
}

#[tokio::test]
async fn build_provisions_linuxdeploy_on_first_use() {
    let tmp = tempfile::tempdir().unwrap();
    let tools = tmp.path().join("tools");
    let host = fake_host(&tools);
    let p = pipeline(tmp.path(), &host, BundleSettings::default());

    p.run(Stage::Create).await.unwrap();
    assert!(host.fetcher.fetched().is_empty());

    let outcome = p.run(Stage::Build).await.unwrap();
    assert_eq!(outcome, StageOutcome::Built { binary: p.appimage() });

    assert_eq!(host.fetcher.fetched().len(), 3);
    let invocations = host.runner.invocations();
    assert_eq!(invocations.len(), 1);
    let linuxdeploy = &invocations[0];
    assert_eq!(
        linuxdeploy.program(),
        tools.join("linuxdeploy-x86_64.AppImage").as_path()
    );
    assert!(linuxdeploy.arguments().iter().any(|a| a == "--appdir"));
    assert!(
        linuxdeploy
            .environment()
            .contains(&("ARCH".to_string(), "x86_64".to_string()))
    );

    let recorded = state::load(&p.bundle()).await.unwrap().unwrap();
    assert_eq!(recorded.format, "appimage");
    assert_eq!(recorded.version, "0.2.0");
}

#[tokio::test]
async fn update_invalidates_the_previous_build() {
    let tmp = tempfile::tempdir().unwrap();
    let host = fake_host(&tmp.path().join("tools"));
    let p = pipeline(tmp.path(), &host, BundleSettings::default());

    p.run(Stage::Create).await.unwrap();
    p.run(Stage::Build).await.unwrap();
    assert!(state::path(&p.bundle()).exists());

    p.run(Stage::Update).await.unwrap();
    p.run(Stage::Update).await.unwrap();

    assert!(!state::path(&p.bundle()).exists());
    assert!(p.app_dir().join("usr/bin/hello").is_file());
    assert_prerequisite(p.run(Stage::Package).await.unwrap_err(), Stage::Build);
}

#[tokio::test]
async fn package_and_run_require_a_build() {
    let tmp = tempfile::tempdir().unwrap();
    let host = fake_host(&tmp.path().join("tools"));
    let p = pipeline(tmp.path(), &host, BundleSettings::default());

    p.run(Stage::Create).await.unwrap();

    assert_prerequisite(p.run(Stage::Package).await.unwrap_err(), Stage::Build);
    assert_prerequisite(p.run(Stage::Run).await.unwrap_err(), Stage::Build);
    assert!(host.runner.invocations().is_empty());
}

#[tokio::test]
async fn publish_without_a_channel_is_a_configuration_error() {
    let tmp = tempfile::tempdir().unwrap();
    let host = fake_host(&tmp.path().join("tools"));
    let p = pipeline(tmp.path(), &host, BundleSettings::default());

    let err = p.run(Stage::Publish).await.unwrap_err();
    assert!(err.is_configuration());
    assert!(err.to_string().contains("publish_channel"));
}

#[tokio::test]
async fn package_then_publish_ships_artifact_and_checksum() {
    let tmp = tempfile::tempdir().unwrap();
    let channel = tmp.path().join("releases");
    let host = fake_host(&tmp.path().join("tools"));
    let p = pipeline(
        tmp.path(),
        &host,
        BundleSettings {
            publish_channel: Some(channel.clone()),
            ..Default::default()
        },
    );

    p.run(Stage::Create).await.unwrap();
    p.run(Stage::Build).await.unwrap();
    // The recording runner never spawns linuxdeploy, so stand in for its output.
    std::fs::write(p.appimage(), b"appimage bytes").unwrap();

    let artifact = match p.run(Stage::Package).await.unwrap() {
        StageOutcome::Packaged(artifact) => artifact,
        other => panic!("expected a packaged artifact, got {other:?}"),
    };
    let dist = tmp.path().join("dist/Hello_World-0.2.0-x86_64.AppImage");
    assert_eq!(artifact.path, dist);
    assert_eq!(artifact.size, 14);
    assert_eq!(artifact.checksum.len(), 64);
    assert!(artifact.checksum_path().is_file());

    let outcome = p.run(Stage::Publish).await.unwrap();
    let published = channel.join("Hello_World-0.2.0-x86_64.AppImage");
    assert_eq!(
        outcome,
        StageOutcome::Published {
            destination: published.clone()
        }
    );
    assert_eq!(std::fs::read(&published).unwrap(), b"appimage bytes");
    assert!(channel.join("Hello_World-0.2.0-x86_64.AppImage.sha256").is_file());
}

#[tokio::test]
async fn each_command_gets_a_fresh_tool_registry() {
    let tmp = tempfile::tempdir().unwrap();
    let host = fake_host(&tmp.path().join("tools"));
    let p = pipeline(tmp.path(), &host, BundleSettings::default());

    p.run(Stage::Create).await.unwrap();
    let mut build = p.command(Stage::Build);
    build.execute().await.unwrap();
    assert!(build.context().tools().is_resolved(ToolKind::LinuxDeploy));

    let mut next = p.command(Stage::Build);
    assert!(!next.context().tools().is_resolved(ToolKind::LinuxDeploy));

    // Already installed: the second build fetches nothing new.
    next.execute().await.unwrap();
    assert_eq!(host.fetcher.fetched().len(), 3);
}

fn compose_for(host: &common::FakeHost, app: &Settings, platform: &str, format: &str, stage: Stage) -> Command {
    Composer::new(ProfileRegistry::builtin(), host.host.clone())
        .compose_stage(platform, format, stage, app.clone())
        .unwrap()
}

#[tokio::test]
async fn macos_build_ad_hoc_signs_the_app_without_downloads() {
    let tmp = tempfile::tempdir().unwrap();
    let host = fake_host(&tmp.path().join("tools"));
    let app = hello_app(tmp.path(), BundleSettings::default());
    let bundle = tmp.path().join("build/hello/macos/app");
    let app_path = bundle.join("Hello World.app");

    compose_for(&host, &app, "macos", "app", Stage::Create)
        .execute()
        .await
        .unwrap();
    assert!(app_path.join("Contents/MacOS/hello").is_file());
    assert!(app_path.join("Contents/Info.plist").is_file());

    let outcome = compose_for(&host, &app, "macos", "app", Stage::Build)
        .execute()
        .await
        .unwrap();
    assert_eq!(outcome, StageOutcome::Built { binary: app_path.clone() });

    let invocations = host.runner.invocations();
    assert_eq!(invocations.len(), 1);
    let codesign = &invocations[0];
    assert_eq!(codesign.program(), Path::new("codesign"));
    assert_eq!(codesign.arguments()[..4], ["--sign", "-", "--force", "--deep"]);
    assert!(!codesign.arguments().iter().any(|a| a == "--timestamp"));
    assert_eq!(
        codesign.arguments().last().unwrap(),
        &app_path.display().to_string()
    );
    assert!(host.fetcher.fetched().is_empty());
    assert_eq!(state::load(&bundle).await.unwrap().unwrap().format, "app");
}

fn write_windows_binary(root: &Path) {
    std::fs::write(root.join("target/release/hello.exe"), b"MZ").unwrap();
}

#[tokio::test]
async fn nsis_build_without_makensis_is_a_missing_tool() {
    let tmp = tempfile::tempdir().unwrap();
    let host = fake_host(&tmp.path().join("tools"));
    let app = hello_app(tmp.path(), BundleSettings::default());
    write_windows_binary(tmp.path());
    let bundle = tmp.path().join("build/hello/windows/nsis");

    compose_for(&host, &app, "windows", "nsis", Stage::Create)
        .execute()
        .await
        .unwrap();
    assert!(bundle.join("src/hello.exe").is_file());

    let err = compose_for(&host, &app, "windows", "nsis", Stage::Build)
        .execute()
        .await
        .unwrap_err();

    assert!(matches!(err, Error::MissingTool { ref tool } if tool == "makensis"), "{err:?}");
    assert!(host.fetcher.fetched().is_empty());
    assert!(host.runner.invocations().is_empty());
    assert!(!state::path(&bundle).exists());
}

#[tokio::test]
async fn nsis_build_runs_makensis_from_path() {
    let tmp = tempfile::tempdir().unwrap();
    let host = fake_host(&tmp.path().join("tools"));
    host.fs.put_on_path("makensis", Path::new("/usr/bin/makensis"));
    let app = hello_app(tmp.path(), BundleSettings::default());
    write_windows_binary(tmp.path());
    let bundle = tmp.path().join("build/hello/windows/nsis");

    compose_for(&host, &app, "windows", "nsis", Stage::Create)
        .execute()
        .await
        .unwrap();
    let installer = match compose_for(&host, &app, "windows", "nsis", Stage::Build)
        .execute()
        .await
        .unwrap()
    {
        StageOutcome::Built { binary } => binary,
        other => panic!("expected a built installer, got {other:?}"),
    };

    let invocations = host.runner.invocations();
    assert_eq!(invocations.len(), 1);
    let makensis = &invocations[0];
    assert_eq!(makensis.program(), Path::new("/usr/bin/makensis"));
    assert!(
        makensis
            .arguments()
            .contains(&format!("-DOUTPUT_FILE={}", installer.display()))
    );
    assert_eq!(
        makensis.arguments().last().unwrap(),
        &bundle.join("installer.nsi").display().to_string()
    );
    assert!(installer.starts_with(&bundle));
    assert_eq!(host.fs.which_calls(), 1);
    assert!(host.fetcher.fetched().is_empty());
}
