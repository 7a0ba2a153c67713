//! Homebrew formula generation.
//!
//! Renders the Ruby formula that points Homebrew at the macOS archive of a
//! release. Rendering is a pure function of its inputs.

use crate::bundler::{FormulaSettings, Platform};

/// Data for generating a Homebrew formula.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormulaData {
    /// Formula class name (e.g. `Hygen`)
    pub class_name: String,
    /// Description
    pub desc: String,
    /// Homepage URL
    pub homepage: String,
    /// Archive download URL
    pub url: String,
    /// Version
    pub version: String,
    /// SHA-256 checksum of the archive
    pub sha256: String,
    /// Binary installed into `bin`
    pub binary: String,
}

impl FormulaData {
    /// Formula data for `name` at `version`, using the release URL conventions
    /// from `settings`.
    pub fn for_release(
        settings: &FormulaSettings,
        name: &str,
        version: &str,
        checksum: &str,
    ) -> Self {
        let archive = Platform::FORMULA.archive_file_name(name, version);
        Self {
            class_name: class_name(name),
            desc: settings.description.clone(),
            homepage: settings.homepage.clone(),
            url: format!(
                "{}/v{version}/{archive}",
                settings.release_url.trim_end_matches('/')
            ),
            version: version.to_string(),
            sha256: checksum.to_string(),
            binary: name.to_string(),
        }
    }
}

/// Homebrew formula generator.
pub struct FormulaGenerator;

impl FormulaGenerator {
    /// Generates a Ruby formula from the data.
    #[must_use]
    pub fn generate(data: &FormulaData) -> String {
        format!(
            r##"VER = "{version}"
SHA = "{sha256}"

class {class_name} < Formula
  desc "{desc}"
  homepage "{homepage}"
  url "{url}"
  version VER
  sha256 SHA

  def install
    bin.install "{binary}"
  end

  test do
    assert_match version.to_s, shell_output("#{{bin}}/{binary} --version")
  end
end
"##,
            version = ruby_escape(&data.version),
            sha256 = ruby_escape(&data.sha256),
            class_name = data.class_name,
            desc = ruby_escape(&data.desc),
            homepage = ruby_escape(&data.homepage),
            url = ruby_escape(&data.url),
            binary = ruby_escape(&data.binary),
        )
    }
}

/// Renders the formula for `name` from a checksum and version.
#[must_use]
pub fn render_formula(
    settings: &FormulaSettings,
    name: &str,
    checksum: &str,
    version: &str,
) -> String {
    FormulaGenerator::generate(&FormulaData::for_release(settings, name, version, checksum))
}

/// File name of the formula inside the tap, e.g. `hygen.rb`.
pub fn formula_file_name(name: &str) -> String {
    format!("{name}.rb")
}

/// Homebrew class name for a formula: `hygen` -> `Hygen`, `my-tool` -> `MyTool`.
pub fn class_name(name: &str) -> String {
    name.split(['-', '_', '.'])
        .filter(|part| !part.is_empty())
        .map(|part| {
            let mut chars = part.chars();
            match chars.next() {
                Some(first) => first.to_ascii_uppercase().to_string() + chars.as_str(),
                None => String::new(),
            }
        })
        .collect()
}

/// Escapes characters that would end or interpolate inside a Ruby double-quoted string.
fn ruby_escape(value: &str) -> String {
    value
        .replace('\\', "\\\\")
        .replace('"', "\\\"")
        .replace("#{", "\\#{")
}

#[cfg(test)]
mod tests {
    use super::*;

    const SHA: &str = "2cf24dba5fb0a30e26e83b2ac5b9e29e1b161e5c1fa7425e73043362938b9824";

    #[test]
    fn renders_hygen_formula() {
        let formula = render_formula(&FormulaSettings::default(), "hygen", SHA, "6.1.0");

        assert!(formula.starts_with("VER = \"6.1.0\"\nSHA = \""));
        assert!(formula.contains(&format!("SHA = \"{SHA}\"")));
        assert!(formula.contains("class Hygen < Formula"));
        assert!(formula.contains(
            "url \"https://github.com/jondot/hygen/releases/download/v6.1.0/hygen.macos.v6.1.0.tar.gz\""
        ));
        assert!(formula.contains("homepage \"http://www.hygen.io/\""));
        assert!(formula.contains("bin.install \"hygen\""));
        assert!(formula.contains("shell_output(\"#{bin}/hygen --version\")"));
        assert!(formula.ends_with("end\n"));
    }

    #[test]
    fn rendering_is_deterministic() {
        let settings = FormulaSettings::default();
        assert_eq!(
            render_formula(&settings, "hygen", SHA, "6.1.0"),
            render_formula(&settings, "hygen", SHA, "6.1.0")
        );
        assert_ne!(
            render_formula(&settings, "hygen", SHA, "6.1.0"),
            render_formula(&settings, "hygen", SHA, "6.1.1")
        );
    }

    #[test]
    fn version_and_checksum_appear_only_where_templated() {
        let formula = render_formula(&FormulaSettings::default(), "hygen", SHA, "9.9.9");
        assert_eq!(formula.matches(SHA).count(), 1);
        // VER line plus twice in the URL.
        assert_eq!(formula.matches("9.9.9").count(), 3);
    }

    #[test]
    fn trailing_slash_in_release_url_is_ignored() {
        let settings = FormulaSettings {
            release_url: "https://example.com/dl/".into(),
            ..Default::default()
        };
        let data = FormulaData::for_release(&settings, "hygen", "1.0.0", SHA);
        assert_eq!(data.url, "https://example.com/dl/v1.0.0/hygen.macos.v1.0.0.tar.gz");
    }

    #[test]
    fn class_names() {
        assert_eq!(class_name("hygen"), "Hygen");
        assert_eq!(class_name("my-tool"), "MyTool");
        assert_eq!(class_name("a_b.c"), "ABC");
    }

    #[test]
    fn quotes_and_interpolation_are_escaped() {
        let settings = FormulaSettings {
            description: r#"Say "hi" #{system}"#.into(),
            ..Default::default()
        };
        let formula = render_formula(&settings, "hygen", SHA, "1.0.0");
        assert!(formula.contains(r#"desc "Say \"hi\" \#{system}""#));
    }

    #[test]
    fn formula_file_is_named_after_package() {
        assert_eq!(formula_file_name("hygen"), "hygen.rb");
    }
}
