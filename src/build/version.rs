//! Release version bumping.
//!
//! The canonical version lives in `VERSION`. The editor and the engine each
//! embed the version and the revision it was cut from as source constants;
//! `bump` rewrites those constants and the canonical file together. Nothing
//! is committed or tagged.

use crate::build::{
    Configuration, Error, Result,
    error::ErrorExt,
    exec::{CommandRunner, Executor},
    revision,
};
use regex::{NoExpand, Regex};
use std::path::{Path, PathBuf};

/// Canonical version file, relative to the project root.
pub const VERSION_FILE: &str = "VERSION";

/// Source file carrying constants to rewrite.
struct VersionedSource {
    path: &'static str,
    version_pattern: &'static str,
    version_template: &'static str,
    revision_pattern: &'static str,
    revision_template: &'static str,
}

const SOURCES: [VersionedSource; 2] = [
    VersionedSource {
        path: "com.dynamo.cr/com.dynamo.cr.editor/src/com/dynamo/cr/editor/Activator.java",
        version_pattern: r#"public static final String VERSION = "[0-9\.]+";"#,
        version_template: r#"public static final String VERSION = "{}";"#,
        revision_pattern: r#"public static final String VERSION_SHA1 = ".*?";"#,
        revision_template: r#"public static final String VERSION_SHA1 = "{}";"#,
    },
    VersionedSource {
        path: "engine/engine/src/engine_version.h",
        version_pattern: r#"const char\* VERSION = "[0-9\.]+";"#,
        version_template: r#"const char* VERSION = "{}";"#,
        revision_pattern: r#"const char\* VERSION_SHA1 = ".*?";"#,
        revision_template: r#"const char* VERSION_SHA1 = "{}";"#,
    },
];

/// Outcome of a bump.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct VersionRecord {
    /// Version before the bump
    pub previous: String,
    /// Version after the bump
    pub version: String,
    /// Revision embedded alongside the version
    pub revision: String,
}

/// Next version: `explicit` verbatim, or `current` with its last component
/// incremented by one.
///
/// # Errors
///
/// [`Error::InvalidVersion`] when incrementing and any component of
/// `current` is not an unsigned integer, or the last one is already at the
/// maximum.
pub fn next_version(current: &str, explicit: Option<&str>) -> Result<String> {
    if let Some(explicit) = explicit {
        return Ok(explicit.to_string());
    }

    let mut parts = current
        .split('.')
        .map(|p| p.parse::<u64>())
        .collect::<std::result::Result<Vec<_>, _>>()
        .map_err(|_| Error::InvalidVersion(current.to_string()))?;

    let last = parts
        .last_mut()
        .ok_or_else(|| Error::InvalidVersion(current.to_string()))?;
    *last = last
        .checked_add(1)
        .ok_or_else(|| Error::InvalidVersion(current.to_string()))?;

    Ok(parts
        .iter()
        .map(u64::to_string)
        .collect::<Vec<_>>()
        .join("."))
}

/// Replaces the single match of `pattern` in `text` with `replacement`.
///
/// # Errors
///
/// [`Error::PatternMismatch`] when `pattern` matches zero or several times.
pub fn replace_once(text: &str, pattern: &str, replacement: &str, path: &Path) -> Result<String> {
    let re = Regex::new(pattern)?;
    let matches = re.find_iter(text).count();
    if matches != 1 {
        return Err(Error::PatternMismatch {
            path: path.to_path_buf(),
            pattern: pattern.to_string(),
            matches,
        });
    }
    Ok(re.replacen(text, 1, NoExpand(replacement)).into_owned())
}

/// Reads the first line of the canonical version file.
pub async fn read_version(project_root: &Path) -> Result<String> {
    let path = project_root.join(VERSION_FILE);
    let contents = tokio::fs::read_to_string(&path)
        .await
        .fs_context("reading version file", &path)?;
    contents
        .lines()
        .next()
        .map(|l| l.trim().to_string())
        .filter(|l| !l.is_empty())
        .ok_or_else(|| Error::InvalidVersion(String::new()))
}

/// Bumps the version and refreshes the embedded revision.
///
/// Every file is patched in memory first; nothing is written unless each
/// constant was found exactly once.
pub async fn bump<R: CommandRunner>(
    config: &Configuration,
    exec: &Executor<R>,
) -> Result<VersionRecord> {
    let root = config.project_root();
    let previous = read_version(root).await?;
    let version = next_version(&previous, config.explicit_version())?;
    let revision = revision::current(config, exec).await?;

    let mut patched: Vec<(PathBuf, String)> = Vec::with_capacity(SOURCES.len());
    for source in &SOURCES {
        let path = root.join(source.path);
        let text = tokio::fs::read_to_string(&path)
            .await
            .fs_context("reading versioned source", &path)?;
        let text = replace_once(
            &text,
            source.version_pattern,
            &source.version_template.replace("{}", &version),
            &path,
        )?;
        let text = replace_once(
            &text,
            source.revision_pattern,
            &source.revision_template.replace("{}", &revision),
            &path,
        )?;
        patched.push((path, text));
    }

    for (path, text) in &patched {
        tokio::fs::write(path, text)
            .await
            .fs_context("writing versioned source", path)?;
    }

    let version_path = root.join(VERSION_FILE);
    tokio::fs::write(&version_path, &version)
        .await
        .fs_context("writing version file", &version_path)?;

    println!("Bumping engine version from {} to {}", previous, version);
    println!("Review changes and commit");

    Ok(VersionRecord {
        previous,
        version,
        revision,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::build::exec::{Environment, recording::RecordingRunner};
    use crate::build::{ConfigurationBuilder, Platform};

    const ACTIVATOR: &str = r#"package com.dynamo.cr.editor;

public class Activator extends AbstractUIPlugin {
    public static final String PLUGIN_ID = "com.dynamo.cr.editor";
    public static final String VERSION = "1.2.3";
    public static final String VERSION_SHA1 = "0ld5ha1";

    private static Activator plugin;
}
"#;

    const ENGINE_VERSION: &str = r#"#ifndef ENGINE_VERSION_H
#define ENGINE_VERSION_H
namespace dmEngine
{
    const char* VERSION = "1.2.3";
    const char* VERSION_SHA1 = "";
}
#endif
"#;

    fn seed(root: &Path, version: &str) {
        std::fs::write(root.join(VERSION_FILE), format!("{version}\n")).unwrap();
        for (source, body) in SOURCES.iter().zip([ACTIVATOR, ENGINE_VERSION]) {
            let path = root.join(source.path);
            std::fs::create_dir_all(path.parent().unwrap()).unwrap();
            std::fs::write(path, body).unwrap();
        }
    }

    fn config(root: &Path, explicit: Option<&str>) -> Configuration {
        let mut builder = ConfigurationBuilder::new()
            .project_root(root)
            .eclipse_home("/opt/eclipse")
            .host(Platform::Linux);
        if let Some(v) = explicit {
            builder = builder.explicit_version(v);
        }
        builder.build().unwrap()
    }

    fn exec() -> Executor<RecordingRunner> {
        Executor::new(
            RecordingRunner::new().stdout("git", "c0ffee1 Release prep\n"),
            Environment::default(),
        )
    }

    #[test]
    fn increments_last_component() {
        for (current, expected) in [
            ("1.2.3", "1.2.4"),
            ("0.9", "0.10"),
            ("7", "8"),
            ("1.2.99", "1.2.100"),
        ] {
            assert_eq!(next_version(current, None).unwrap(), expected);
        }
    }

    #[test]
    fn explicit_version_is_used_verbatim() {
        for current in ["1.2.3", "not-a-version", ""] {
            assert_eq!(next_version(current, Some("2.0.0-beta")).unwrap(), "2.0.0-beta");
        }
    }

    #[test]
    fn non_numeric_components_are_rejected() {
        assert!(matches!(
            next_version("1.2.x", None),
            Err(Error::InvalidVersion(v)) if v == "1.2.x"
        ));
    }

    #[test]
    fn overflowing_last_component_is_rejected() {
        let current = format!("1.2.{}", u64::MAX);
        assert!(matches!(
            next_version(&current, None),
            Err(Error::InvalidVersion(v)) if v == current
        ));
        assert_eq!(
            next_version(&format!("{}.0", u64::MAX), None).unwrap(),
            format!("{}.1", u64::MAX)
        );
    }

    #[test]
    fn replace_once_requires_a_single_match() {
        let path = Path::new("f");
        let pattern = r#"VERSION = "[0-9\.]+";"#;
        assert!(matches!(
            replace_once("nothing here", pattern, "x", path),
            Err(Error::PatternMismatch { matches: 0, .. })
        ));
        assert!(matches!(
            replace_once(r#"VERSION = "1"; VERSION = "2";"#, pattern, "x", path),
            Err(Error::PatternMismatch { matches: 2, .. })
        ));
        assert_eq!(
            replace_once(r#"a VERSION = "1.0"; b"#, pattern, r#"VERSION = "$1";"#, path).unwrap(),
            r#"a VERSION = "$1"; b"#
        );
    }

    #[tokio::test]
    async fn bump_rewrites_constants_and_version_file() {
        let dir = tempfile::tempdir().unwrap();
        seed(dir.path(), "1.2.3");

        let record = bump(&config(dir.path(), None), &exec()).await.unwrap();
        assert_eq!(
            record,
            VersionRecord {
                previous: "1.2.3".into(),
                version: "1.2.4".into(),
                revision: "c0ffee1".into(),
            }
        );

        assert_eq!(
            std::fs::read_to_string(dir.path().join(VERSION_FILE)).unwrap(),
            "1.2.4"
        );
        let activator = std::fs::read_to_string(dir.path().join(SOURCES[0].path)).unwrap();
        assert_eq!(
            activator,
            ACTIVATOR
                .replace(r#"VERSION = "1.2.3""#, r#"VERSION = "1.2.4""#)
                .replace(r#"VERSION_SHA1 = "0ld5ha1""#, r#"VERSION_SHA1 = "c0ffee1""#)
        );
        let engine = std::fs::read_to_string(dir.path().join(SOURCES[1].path)).unwrap();
        assert_eq!(
            engine,
            ENGINE_VERSION
                .replace(r#"VERSION = "1.2.3""#, r#"VERSION = "1.2.4""#)
                .replace(r#"VERSION_SHA1 = """#, r#"VERSION_SHA1 = "c0ffee1""#)
        );
    }

    #[tokio::test]
    async fn explicit_version_still_refreshes_revision() {
        let dir = tempfile::tempdir().unwrap();
        seed(dir.path(), "1.2.3");

        let record = bump(&config(dir.path(), Some("1.3.0")), &exec())
            .await
            .unwrap();
        assert_eq!(record.version, "1.3.0");

        let engine = std::fs::read_to_string(dir.path().join(SOURCES[1].path)).unwrap();
        assert!(engine.contains(r#"const char* VERSION = "1.3.0";"#));
        assert!(engine.contains(r#"const char* VERSION_SHA1 = "c0ffee1";"#));
    }

    #[tokio::test]
    async fn missing_constant_leaves_every_file_untouched() {
        let dir = tempfile::tempdir().unwrap();
        seed(dir.path(), "1.2.3");
        let engine_path = dir.path().join(SOURCES[1].path);
        std::fs::write(&engine_path, "namespace dmEngine {}\n").unwrap();

        let err = bump(&config(dir.path(), None), &exec()).await.unwrap_err();
        assert!(matches!(err, Error::PatternMismatch { matches: 0, .. }));

        assert_eq!(
            std::fs::read_to_string(dir.path().join(VERSION_FILE)).unwrap(),
            "1.2.3\n"
        );
        assert_eq!(
            std::fs::read_to_string(dir.path().join(SOURCES[0].path)).unwrap(),
            ACTIVATOR
        );
    }

    #[tokio::test]
    async fn git_failure_stops_bump() {
        let dir = tempfile::tempdir().unwrap();
        seed(dir.path(), "1.2.3");
        let exec = Executor::new(RecordingRunner::new().fail("git", 128), Environment::default());

        let err = bump(&config(dir.path(), None), &exec).await.unwrap_err();
        assert_eq!(err.exit_code(), 128);
        assert_eq!(
            std::fs::read_to_string(dir.path().join(VERSION_FILE)).unwrap(),
            "1.2.3\n"
        );
    }
}
