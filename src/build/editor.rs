//! Editor and server product builds.
//!
//! Both products are Eclipse RCP applications assembled by a headless PDE
//! build: the plugin sources are staged into a fresh build directory and the
//! Equinox launcher runs the product's ant script against it.

use crate::build::{
    Configuration, Result,
    error::ErrorExt,
    exec::{CommandRunner, Executor},
    utils::fs,
};
use std::io::Write;
use std::path::{Path, PathBuf};

/// Equinox launcher bundled with the supported Eclipse release.
const EQUINOX_VERSION: &str = "1.2.0.v20110502";

/// Plugins that resolve native resources through a `DYNAMO_HOME` link.
const LINKED_PLUGINS: [&str; 3] = ["common", "luaeditor", "builtins"];

/// Linux installers pick up the JRE through p2 root files.
const EDITOR_ROOT_PROPERTIES: &str = "root.linux.gtk.x86=absolute:${buildDirectory}/plugins/com.dynamo.cr.editor/jre_linux/
root.linux.gtk.x86.permissions.755=jre/";

/// Folder inside the Windows installer zip.
const WINDOWS_ZIP_PREFIX: &str = "Defold";

/// An Eclipse product built from `com.dynamo.cr`.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Product {
    /// Desktop editor
    Editor,
    /// Project server
    Server,
}

impl Product {
    /// Name used for build directories and ant/properties files.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Editor => "editor",
            Self::Server => "server",
        }
    }
}

fn cr_root(config: &Configuration) -> PathBuf {
    config.project_root().join("com.dynamo.cr")
}

/// Links the install root into the plugins and runs the Maven test build.
pub async fn test_cr<R: CommandRunner>(config: &Configuration, exec: &Executor<R>) -> Result<()> {
    let cr = cr_root(config);
    for plugin in LINKED_PLUGINS {
        exec.run(
            exec.command("ln")
                .arg("-sfn")
                .arg(config.install_root())
                .arg(cr.join(format!("com.dynamo.cr.{plugin}")).join("DYNAMO_HOME")),
        )
        .await?;
    }

    let mvn = config.ext_dir().join("share/maven/bin/mvn");
    exec.run(
        exec.command(mvn)
            .args(["clean", "verify"])
            .current_dir(cr.join("com.dynamo.cr.parent")),
    )
    .await
}

/// Builds the server product.
pub async fn build_server<R: CommandRunner>(
    config: &Configuration,
    exec: &Executor<R>,
) -> Result<()> {
    build_product(config, exec, Product::Server).await.map(|_| ())
}

/// Builds the editor product and bundles the Windows JRE into its installer.
pub async fn build_editor<R: CommandRunner>(
    config: &Configuration,
    exec: &Executor<R>,
) -> Result<()> {
    let build_dir = build_product(config, exec, Product::Editor).await?;

    // p2 cannot carry the JRE on win32, so it is added to the zip directly.
    let zip = build_dir.join("I.Defold/Defold-win32.win32.x86.zip");
    let jre_root = build_dir.join("plugins/com.dynamo.cr.editor/jre_win32");
    bundle_directory(&zip, &jre_root, WINDOWS_ZIP_PREFIX).await
}

/// Stages a clean build directory and runs the PDE build for `product`.
///
/// Returns the build directory.
pub async fn build_product<R: CommandRunner>(
    config: &Configuration,
    exec: &Executor<R>,
    product: Product,
) -> Result<PathBuf> {
    let name = product.as_str();
    let build_dir = config.product_build_dir(name);

    fs::remove_dir_all(&build_dir).await?;
    fs::create_dir_all(&build_dir.join("plugins"), false).await?;
    fs::create_dir_all(&build_dir.join("features"), false).await?;

    if product == Product::Editor {
        let properties = build_dir.join("root.properties");
        tokio::fs::write(&properties, EDITOR_ROOT_PROPERTIES)
            .await
            .fs_context("writing root properties", &properties)?;
    }

    let workspace = config
        .project_root()
        .join("tmp")
        .join(format!("workspace_{name}"));
    fs::create_dir_all(&workspace, true).await?;

    let mut plugins = tokio::fs::read_dir(cr_root(config))
        .await
        .fs_context("listing plugins", cr_root(config))?;
    let mut sources = Vec::new();
    while let Some(entry) = plugins.next_entry().await? {
        sources.push(entry.path());
    }
    sources.sort();

    for source in sources {
        let Some(plugin) = source.file_name() else {
            continue;
        };
        let dst = build_dir.join("plugins").join(plugin);
        log::info!("Copying .../{} -> {}", plugin.to_string_lossy(), dst.display());
        if source.is_dir() {
            fs::copy_dir(&source, &dst).await?;
        } else {
            fs::copy_file(&source, &dst).await?;
        }
    }

    let eclipse = config.eclipse_home();
    let launcher = eclipse
        .join("plugins")
        .join(format!("org.eclipse.equinox.launcher_{EQUINOX_VERSION}.jar"));
    let ci = config.project_root().join("ci/cr");

    exec.run(
        exec.command("java")
            .args(["-Xms256m", "-Xmx1500m", "-jar"])
            .arg(launcher)
            .args(["-application", "org.eclipse.ant.core.antRunner"])
            .arg("-buildfile")
            .arg(format!("ci/cr/build_{name}.xml"))
            .arg(format!("-DbaseLocation={}", eclipse.display()))
            .arg(format!("-DbuildDirectory={}", build_dir.display()))
            .arg(format!(
                "-DbuildProperties={}",
                ci.join(format!("{name}.properties")).display()
            ))
            .arg("-data")
            .arg(&workspace)
            .current_dir(config.project_root()),
    )
    .await?;

    Ok(build_dir)
}

/// Appends every file below `root` to the existing zip at `zip_path`, under
/// `prefix/` with `/`-separated relative paths.
pub async fn bundle_directory(zip_path: &Path, root: &Path, prefix: &str) -> Result<()> {
    log::info!("Bundling {} into {}", root.display(), zip_path.display());

    let zip_path = zip_path.to_path_buf();
    let root = root.to_path_buf();
    let prefix = prefix.to_string();

    tokio::task::spawn_blocking(move || -> Result<()> {
        let file = std::fs::OpenOptions::new()
            .read(true)
            .write(true)
            .open(&zip_path)
            .fs_context("opening installer zip", &zip_path)?;
        let mut zip = zip::ZipWriter::new_append(file)?;
        let options = zip::write::SimpleFileOptions::default();

        for entry in walkdir::WalkDir::new(&root).sort_by_file_name() {
            let entry = entry?;
            if !entry.file_type().is_file() {
                continue;
            }
            let rel = entry.path().strip_prefix(&root)?;
            let name = std::iter::once(prefix.clone())
                .chain(rel.components().map(|c| c.as_os_str().to_string_lossy().into_owned()))
                .collect::<Vec<_>>()
                .join("/");

            zip.start_file(name, options)?;
            let mut src = std::fs::File::open(entry.path()).fs_context("opening", entry.path())?;
            std::io::copy(&mut src, &mut zip)?;
        }

        zip.finish()?.flush()?;
        Ok(())
    })
    .await
    .map_err(|e| crate::build::Error::GenericError(format!("Zip task panicked: {}", e)))?
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::build::exec::{Environment, recording::RecordingRunner};
    use crate::build::{ConfigurationBuilder, Platform};
    use std::io::Read;

    fn config(root: &Path) -> Configuration {
        ConfigurationBuilder::new()
            .project_root(root)
            .eclipse_home("/opt/eclipse")
            .host(Platform::Linux)
            .build()
            .unwrap()
    }

    fn seed_plugins(root: &Path) {
        let cr = root.join("com.dynamo.cr");
        for plugin in ["com.dynamo.cr.editor", "com.dynamo.cr.server"] {
            std::fs::create_dir_all(cr.join(plugin).join("src")).unwrap();
            std::fs::write(cr.join(plugin).join("plugin.xml"), plugin).unwrap();
        }
    }

    #[tokio::test]
    async fn server_build_stages_plugins_and_runs_pde() {
        let dir = tempfile::tempdir().unwrap();
        seed_plugins(dir.path());
        let config = config(dir.path());
        let stale = config.product_build_dir("server").join("stale");
        std::fs::create_dir_all(&stale).unwrap();

        let exec = Executor::new(RecordingRunner::new(), Environment::default());
        build_server(&config, &exec).await.unwrap();

        let build = config.product_build_dir("server");
        assert!(!stale.exists());
        assert!(build.join("features").is_dir());
        assert!(!build.join("root.properties").exists());
        assert_eq!(
            std::fs::read_to_string(build.join("plugins/com.dynamo.cr.editor/plugin.xml")).unwrap(),
            "com.dynamo.cr.editor"
        );
        assert!(dir.path().join("tmp/workspace_server").is_dir());

        let calls = exec.runner().calls();
        assert_eq!(calls.len(), 1);
        let argv = calls[0].argv();
        assert_eq!(argv[0], "java");
        assert_eq!(
            argv[4],
            "/opt/eclipse/plugins/org.eclipse.equinox.launcher_1.2.0.v20110502.jar"
        );
        assert!(argv.contains(&"ci/cr/build_server.xml".to_string()));
        assert!(argv.contains(&format!("-DbuildDirectory={}", build.display())));
        assert!(argv.contains(&"-DbaseLocation=/opt/eclipse".to_string()));
        assert_eq!(
            argv.last().map(PathBuf::from),
            Some(dir.path().join("tmp/workspace_server"))
        );
    }

    #[tokio::test]
    async fn editor_build_writes_root_properties_and_requires_installer_zip() {
        let dir = tempfile::tempdir().unwrap();
        seed_plugins(dir.path());
        let config = config(dir.path());

        let exec = Executor::new(RecordingRunner::new(), Environment::default());
        let err = build_editor(&config, &exec).await.unwrap_err();
        assert!(err.to_string().contains("opening installer zip"));

        let properties = config.product_build_dir("editor").join("root.properties");
        assert_eq!(
            std::fs::read_to_string(properties).unwrap(),
            EDITOR_ROOT_PROPERTIES
        );
    }

    #[tokio::test]
    async fn failing_pde_build_is_propagated() {
        let dir = tempfile::tempdir().unwrap();
        seed_plugins(dir.path());
        let exec = Executor::new(RecordingRunner::new().fail("java", 13), Environment::default());

        let err = build_server(&config(dir.path()), &exec).await.unwrap_err();
        assert_eq!(err.exit_code(), 13);
    }

    #[tokio::test]
    async fn jre_is_appended_under_prefix() {
        let dir = tempfile::tempdir().unwrap();
        let zip_path = dir.path().join("Defold-win32.win32.x86.zip");
        {
            let mut zip = zip::ZipWriter::new(std::fs::File::create(&zip_path).unwrap());
            zip.start_file("Defold/Defold.exe", zip::write::SimpleFileOptions::default())
                .unwrap();
            zip.write_all(b"MZ").unwrap();
            zip.finish().unwrap();
        }
        let jre = dir.path().join("jre_win32");
        std::fs::create_dir_all(jre.join("jre/bin")).unwrap();
        std::fs::write(jre.join("jre/bin/java.exe"), "java").unwrap();

        bundle_directory(&zip_path, &jre, "Defold").await.unwrap();

        let mut archive = zip::ZipArchive::new(std::fs::File::open(&zip_path).unwrap()).unwrap();
        let mut names: Vec<String> = archive.file_names().map(str::to_string).collect();
        names.sort();
        assert_eq!(names, ["Defold/Defold.exe", "Defold/jre/bin/java.exe"]);

        let mut contents = String::new();
        archive
            .by_name("Defold/jre/bin/java.exe")
            .unwrap()
            .read_to_string(&mut contents)
            .unwrap();
        assert_eq!(contents, "java");
    }

    #[tokio::test]
    async fn test_cr_links_install_root_then_runs_maven() {
        let dir = tempfile::tempdir().unwrap();
        let config = config(dir.path());
        let exec = Executor::new(RecordingRunner::new(), Environment::default());
        test_cr(&config, &exec).await.unwrap();

        let calls = exec.runner().calls();
        assert_eq!(calls.len(), 4);
        for (call, plugin) in calls.iter().zip(LINKED_PLUGINS) {
            assert_eq!(call.program, "ln");
            assert_eq!(call.args[0], "-sfn");
            assert!(call.args[2].ends_with(&format!("com.dynamo.cr.{plugin}/DYNAMO_HOME")));
        }
        assert!(calls[3].program.ends_with("ext/share/maven/bin/mvn"));
        assert_eq!(calls[3].args, ["clean", "verify"]);
        assert_eq!(
            calls[3].cwd.as_deref(),
            Some(dir.path().join("com.dynamo.cr/com.dynamo.cr.parent").as_path())
        );
    }
}
