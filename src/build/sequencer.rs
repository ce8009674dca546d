//! Ordered engine and documentation builds.
//!
//! Each engine component is configured, built and installed by waf in its own
//! source directory. Components are built one at a time in [`ENGINE_COMPONENTS`]
//! order, since every component installs headers and libraries the later ones
//! link against. The first failing component stops the sequence.

use crate::build::{
    Configuration, Result,
    exec::{CommandRunner, Executor, PYTHON},
};
use std::path::{Path, PathBuf};

/// Engine components in dependency order.
pub const ENGINE_COMPONENTS: &[&str] = &[
    "dlib",
    "ddf",
    "particle",
    "glfw",
    "graphics",
    "hid",
    "input",
    "physics",
    "resource",
    "lua",
    "script",
    "render",
    "gameobject",
    "gui",
    "sound",
    "gamesys",
    "tools",
    "record",
    "engine",
];

/// Foundational library rebuilt for the host before cross-compiling; it
/// provides the code generators the cross build runs.
pub const HOST_PREREQUISITE: &str = "dlib";

/// waf actions run for every component.
const WAF_ACTIONS: [&str; 4] = ["distclean", "configure", "build", "install"];

/// Flags for one waf run.
#[derive(Clone, Debug, Default)]
struct WafFlags {
    platform: Option<String>,
    skip_tests: bool,
    skip_codesign: bool,
}

impl WafFlags {
    fn to_args(&self, install_root: &Path) -> Vec<String> {
        let mut args = vec![
            "configure".to_string(),
            format!("--prefix={}", install_root.display()),
        ];
        if let Some(platform) = &self.platform {
            args.push(format!("--platform={platform}"));
        }
        if self.skip_tests {
            args.push("--skip-tests".to_string());
        }
        if self.skip_codesign {
            args.push("--skip-codesign".to_string());
        }
        args.extend(WAF_ACTIONS.iter().map(|a| a.to_string()));
        args
    }
}

fn waf_script(config: &Configuration) -> PathBuf {
    config.ext_dir().join("bin").join("waf")
}

async fn run_waf<R: CommandRunner>(
    config: &Configuration,
    exec: &Executor<R>,
    source_dir: &Path,
    flags: &WafFlags,
) -> Result<()> {
    exec.run(
        exec.command(PYTHON.as_str())
            .arg(waf_script(config))
            .args(flags.to_args(config.install_root()))
            .current_dir(source_dir),
    )
    .await
}

/// Builds every engine component for the target platform.
///
/// When cross-compiling, [`HOST_PREREQUISITE`] is first built for the host
/// (no `--platform` flag) and tests are skipped for every build.
pub async fn build_engine<R: CommandRunner>(
    config: &Configuration,
    exec: &Executor<R>,
) -> Result<()> {
    let engine_dir = config.project_root().join("engine");

    if config.is_cross_compiling() {
        log::info!("Building {} for host platform", HOST_PREREQUISITE);
        let flags = WafFlags {
            platform: None,
            skip_tests: config.skip_tests(),
            skip_codesign: config.skip_codesign(),
        };
        run_waf(config, exec, &engine_dir.join(HOST_PREREQUISITE), &flags).await?;
    }

    let flags = WafFlags {
        platform: Some(config.target_platform().to_string()),
        skip_tests: config.skip_tests(),
        skip_codesign: config.skip_codesign(),
    };
    for component in ENGINE_COMPONENTS {
        log::info!("Building {}", component);
        run_waf(config, exec, &engine_dir.join(component), &flags).await?;
    }

    Ok(())
}

/// Builds the engine reference documentation.
pub async fn build_docs<R: CommandRunner>(
    config: &Configuration,
    exec: &Executor<R>,
) -> Result<()> {
    log::info!("Building docs");
    let flags = WafFlags {
        platform: None,
        skip_tests: config.skip_tests(),
        skip_codesign: false,
    };
    run_waf(
        config,
        exec,
        &config.project_root().join("engine").join("docs"),
        &flags,
    )
    .await
}
