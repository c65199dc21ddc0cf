//! Running a package's install script against its unpacked source.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;

use jpkg_schema::Package;

use crate::error::InstallStepError;
use crate::io::extract;
use crate::paths::Layout;

/// Local copies of a package's artifacts, as returned by a fetcher.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Artifacts {
    pub source: PathBuf,
    pub install_script: PathBuf,
}

/// Performs the install step of an archive package.
pub trait Installer {
    /// # Errors
    ///
    /// Returns an [`InstallStepError`] if unpacking or the script fails.
    fn run_install(
        &self,
        package: &Package,
        artifacts: &Artifacts,
        env: &BTreeMap<String, String>,
    ) -> Result<(), InstallStepError>;
}

impl<T: Installer + ?Sized> Installer for &T {
    fn run_install(
        &self,
        package: &Package,
        artifacts: &Artifacts,
        env: &BTreeMap<String, String>,
    ) -> Result<(), InstallStepError> {
        (**self).run_install(package, artifacts, env)
    }
}

/// Unpacks the source into `build/<name>` and runs the install script there.
///
/// The script sees the configured environment plus `JPKG_PACKAGE_NAME`,
/// `JPKG_PACKAGE_VERSION` and `JPKG_PREFIX`.
#[derive(Debug, Clone)]
pub struct ScriptInstaller {
    build_dir: PathBuf,
    prefix: PathBuf,
}

impl ScriptInstaller {
    pub fn new(build_dir: impl Into<PathBuf>, prefix: impl Into<PathBuf>) -> Self {
        Self {
            build_dir: build_dir.into(),
            prefix: prefix.into(),
        }
    }

    pub fn from_layout(layout: &Layout) -> Self {
        Self::new(layout.build_dir(), layout.base())
    }

    /// Working directory used for a package.
    pub fn work_dir(&self, package: &Package) -> PathBuf {
        self.build_dir.join(&package.name)
    }
}

impl Installer for ScriptInstaller {
    fn run_install(
        &self,
        package: &Package,
        artifacts: &Artifacts,
        env: &BTreeMap<String, String>,
    ) -> Result<(), InstallStepError> {
        let work_dir = self.work_dir(package);
        if work_dir.exists() {
            fs::remove_dir_all(&work_dir)?;
        }
        fs::create_dir_all(&work_dir)?;

        let files = extract::unpack(&artifacts.source, &work_dir)?;
        tracing::debug!("Unpacked {} files for {}", files.len(), package);

        let script = absolute(&artifacts.install_script)?;
        tracing::info!("Running {} in {}", script.display(), work_dir.display());

        let status = Command::new(&script)
            .current_dir(&work_dir)
            .envs(env)
            .env("JPKG_PACKAGE_NAME", package.name.as_str())
            .env("JPKG_PACKAGE_VERSION", package.version.as_str())
            .env("JPKG_PREFIX", &self.prefix)
            .status()
            .map_err(|source| InstallStepError::Launch {
                script: script.clone(),
                source,
            })?;

        if !status.success() {
            return Err(InstallStepError::Script { script, status });
        }
        Ok(())
    }
}

fn absolute(path: &Path) -> Result<PathBuf, InstallStepError> {
    if path.is_absolute() {
        Ok(path.to_path_buf())
    } else {
        Ok(std::env::current_dir()?.join(path))
    }
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;
    use std::os::unix::fs::PermissionsExt;

    fn write_script(path: &Path, body: &str) {
        fs::write(path, format!("#!/bin/sh\n{body}\n")).unwrap();
        fs::set_permissions(path, fs::Permissions::from_mode(0o755)).unwrap();
    }

    fn write_tar(path: &Path, name: &str, content: &str) {
        let mut builder = tar::Builder::new(Vec::new());
        let mut header = tar::Header::new_gnu();
        header.set_size(content.len() as u64);
        header.set_mode(0o644);
        header.set_cksum();
        builder
            .append_data(&mut header, name, content.as_bytes())
            .unwrap();
        fs::write(path, builder.into_inner().unwrap()).unwrap();
    }

    fn setup(script_body: &str) -> (tempfile::TempDir, ScriptInstaller, Artifacts) {
        let dir = tempfile::tempdir().unwrap();
        let layout = Layout::new(dir.path());
        let source = dir.path().join("lib.tar");
        let install_script = dir.path().join("lib.sh");
        write_tar(&source, "VERSION", "1.0");
        write_script(&install_script, script_body);

        (
            dir,
            ScriptInstaller::from_layout(&layout),
            Artifacts {
                source,
                install_script,
            },
        )
    }

    #[test]
    fn test_script_runs_in_unpacked_source() {
        let (dir, installer, artifacts) =
            setup("cat VERSION > \"$JPKG_PREFIX/$JPKG_PACKAGE_NAME-$JPKG_PACKAGE_VERSION.$FLAVOR\"");
        let package = jpkg_schema::Package::archive("lib", "1.0", &[]);
        let env = BTreeMap::from([("FLAVOR".to_string(), "txt".to_string())]);

        installer.run_install(&package, &artifacts, &env).unwrap();

        let marker = dir.path().join("lib-1.0.txt");
        assert_eq!(fs::read_to_string(marker).unwrap(), "1.0");
        assert!(installer.work_dir(&package).join("VERSION").exists());
    }

    #[test]
    fn test_work_dir_is_cleared() {
        let (_dir, installer, artifacts) = setup("test ! -e stale");
        let package = jpkg_schema::Package::archive("lib", "1.0", &[]);
        let work_dir = installer.work_dir(&package);
        fs::create_dir_all(&work_dir).unwrap();
        fs::write(work_dir.join("stale"), "old").unwrap();

        installer
            .run_install(&package, &artifacts, &BTreeMap::new())
            .unwrap();
    }

    #[test]
    fn test_script_failure_carries_status() {
        let (_dir, installer, artifacts) = setup("exit 3");
        let package = jpkg_schema::Package::archive("lib", "1.0", &[]);

        let err = installer
            .run_install(&package, &artifacts, &BTreeMap::new())
            .unwrap_err();
        match err {
            InstallStepError::Script { status, .. } => assert_eq!(status.code(), Some(3)),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_script_not_executable() {
        let (_dir, installer, artifacts) = setup("true");
        fs::set_permissions(
            &artifacts.install_script,
            fs::Permissions::from_mode(0o644),
        )
        .unwrap();
        let package = jpkg_schema::Package::archive("lib", "1.0", &[]);

        let err = installer
            .run_install(&package, &artifacts, &BTreeMap::new())
            .unwrap_err();
        assert!(matches!(err, InstallStepError::Launch { .. }));
    }
}
