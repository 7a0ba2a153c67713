//! Package metadata.

/// Package metadata read from the project manifest.
///
/// `name` and `version` are used verbatim in binary names, archive names,
/// the formula and the tap commit message. The version is not parsed.
///
/// # Examples
///
/// ```no_run
/// use kodegen_bundler_standalone::bundler::PackageSettings;
///
/// let settings = PackageSettings {
///     name: "hygen".into(),
///     version: "6.1.0".into(),
///     ..Default::default()
/// };
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PackageSettings {
    /// Program name, e.g. `hygen`.
    pub name: String,

    /// Version string, e.g. `6.1.0`.
    pub version: String,

    /// Manifest description, used as the formula `desc` when set.
    pub description: Option<String>,

    /// Manifest homepage, used as the formula `homepage` when set.
    pub homepage: Option<String>,
}
