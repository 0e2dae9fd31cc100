//! Version discovery from the Gradle build configuration.
//!
//! The Android build script declares the release version on a single line,
//! e.g. `versionName = "1.8.15"`. The resolver scans the file line by line
//! for that marker and extracts the quoted literal following it. This is a
//! local, deterministic input, so any failure here is fatal with no retry.

use crate::error::{Result, VersionError};
use semver::Version;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

/// Marker identifying the version declaration line
pub const VERSION_MARKER: &str = "versionName";

/// Resolve the release version from a build configuration file.
///
/// The version is parsed into a [`semver::Version`] immediately so that no
/// network action can run against a malformed version string.
pub fn resolve_version(build_file: &Path) -> Result<Version> {
    let file = File::open(build_file).map_err(|source| VersionError::Unreadable {
        path: build_file.to_path_buf(),
        source,
    })?;

    for line in BufReader::new(file).lines() {
        let line = line.map_err(|source| VersionError::Unreadable {
            path: build_file.to_path_buf(),
            source,
        })?;

        let Some(marker_at) = line.find(VERSION_MARKER) else {
            continue;
        };

        let raw = quoted_value(&line[marker_at + VERSION_MARKER.len()..]).ok_or_else(|| {
            VersionError::MissingQuotedValue {
                path: build_file.to_path_buf(),
            }
        })?;

        let version = Version::parse(raw).map_err(|source| VersionError::ParseFailed {
            version: raw.to_string(),
            source,
        })?;

        log::debug!("resolved version {version} from {}", build_file.display());
        return Ok(version);
    }

    Err(VersionError::DeclarationNotFound {
        path: build_file.to_path_buf(),
    }
    .into())
}

/// Extract the first double-quoted literal from a line fragment.
fn quoted_value(fragment: &str) -> Option<&str> {
    let open = fragment.find('"')?;
    let rest = &fragment[open + 1..];
    let close = rest.find('"')?;
    Some(&rest[..close])
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_build_file(content: &str) -> (tempfile::TempDir, std::path::PathBuf) {
        let dir = tempfile::tempdir().expect("create temp dir");
        let path = dir.path().join("build.gradle.kts");
        let mut file = File::create(&path).expect("create build file");
        file.write_all(content.as_bytes()).expect("write build file");
        (dir, path)
    }

    #[test]
    fn extracts_quoted_version_token() {
        let (_dir, path) = write_build_file(
            "android {\n    defaultConfig {\n        versionCode = 42\n        versionName = \"1.8.15\"\n    }\n}\n",
        );
        let version = resolve_version(&path).expect("version resolves");
        assert_eq!(version, Version::new(1, 8, 15));
    }

    #[test]
    fn whitespace_and_position_do_not_matter() {
        let (_dir, path) =
            write_build_file("// header\n\n\t\t  versionName=\"2.0.0\"   // trailing\n");
        let version = resolve_version(&path).expect("version resolves");
        assert_eq!(version, Version::new(2, 0, 0));
    }

    #[test]
    fn missing_marker_is_fatal() {
        let (_dir, path) = write_build_file("android {\n    versionCode = 42\n}\n");
        let err = resolve_version(&path).expect_err("marker absent");
        assert!(matches!(
            err,
            crate::error::ReleaseError::Version(VersionError::DeclarationNotFound { .. })
        ));
    }

    #[test]
    fn unquoted_declaration_is_fatal() {
        let (_dir, path) = write_build_file("versionName = release\n");
        let err = resolve_version(&path).expect_err("no quoted value");
        assert!(matches!(
            err,
            crate::error::ReleaseError::Version(VersionError::MissingQuotedValue { .. })
        ));
    }

    #[test]
    fn non_semver_token_is_fatal() {
        let (_dir, path) = write_build_file("versionName = \"one point eight\"\n");
        let err = resolve_version(&path).expect_err("not a semver token");
        assert!(matches!(
            err,
            crate::error::ReleaseError::Version(VersionError::ParseFailed { .. })
        ));
    }

    #[test]
    fn unreadable_file_is_fatal() {
        let err = resolve_version(Path::new("/nonexistent/build.gradle.kts"))
            .expect_err("file absent");
        assert!(matches!(
            err,
            crate::error::ReleaseError::Version(VersionError::Unreadable { .. })
        ));
    }
}
