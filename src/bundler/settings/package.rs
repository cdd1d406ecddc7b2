//! Package metadata and configuration.

/// Package metadata and configuration.
///
/// Contains core application information used across all platforms and
/// formats. Maps from the `Cargo.toml` `[package]` section.
///
/// # Examples
///
/// ```no_run
/// use kodegen_bundler_pipeline::bundler::PackageSettings;
///
/// let settings = PackageSettings {
///     product_name: "myapp".into(),
///     formal_name: Some("My App".into()),
///     version: "1.0.0".into(),
///     description: "An awesome application".into(),
///     homepage: Some("https://example.com".into()),
///     authors: Some(vec!["Author Name <email@example.com>".into()]),
/// };
/// ```
#[derive(Debug, Clone, Default)]
pub struct PackageSettings {
    /// Machine name of the application (`Cargo.toml` `package.name`).
    pub product_name: String,

    /// Human-readable name shown in bundle names and menus.
    ///
    /// Default: None (uses `product_name`)
    pub formal_name: Option<String>,

    /// Version string in semantic versioning format.
    pub version: String,

    /// Brief description of the application.
    pub description: String,

    /// Homepage URL for the application.
    pub homepage: Option<String>,

    /// List of package authors, "Name <email@example.com>".
    pub authors: Option<Vec<String>>,
}
