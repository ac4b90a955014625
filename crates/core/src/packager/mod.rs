//! Builds the deployable archives: one per dependency layer and one per function.

pub mod archive;
pub mod config;
pub mod function;
pub mod layer;
pub mod policy;

use std::fs;
use std::path::{Path, PathBuf};

use error_stack::ResultExt;
use thiserror::Error;
use tracing::{error, info, instrument};

use self::config::{Layout, PackagerConfig};
use self::policy::{outcome_for, FailureKind, Outcome};

#[derive(Error, Debug)]
pub enum PackagerError {
    #[error("Lambda source file not found: {}", .0.display())]
    MissingSource(PathBuf),
    #[error("Requirements file not found: {}", .0.display())]
    MissingRequirements(PathBuf),
    #[error("Failed to install layer dependencies for {0}")]
    InstallFailed(String),
    #[error("Filesystem operation failed on {}", .0.display())]
    Io(PathBuf),
    #[error("Failed to write archive {}", .0.display())]
    Archive(PathBuf),
    #[error("Invalid packager configuration")]
    Config,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedArchive {
    pub name: String,
    pub reason: String,
}

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct PackagingReport {
    pub built: Vec<PathBuf>,
    pub skipped: Vec<SkippedArchive>,
}

#[derive(Debug, Clone)]
pub struct Packager {
    layout: Layout,
    config: PackagerConfig,
}

impl Packager {
    pub fn new(layout: Layout, config: PackagerConfig) -> Self {
        Self { layout, config }
    }

    /// Builds every layer archive, then every function archive. Missing inputs are skipped;
    /// any other failure stops the run (see [`policy::POLICY`]).
    #[instrument(skip(self), fields(base_dir = %self.layout.base_dir.display()))]
    pub async fn run(&self) -> error_stack::Result<PackagingReport, PackagerError> {
        ensure_directory_exists(&self.layout.deployments_dir())?;

        let mut report = PackagingReport::default();

        for layer in &self.config.layers {
            let result = layer::create_layer_zip(&self.layout, layer).await;
            record(&mut report, &layer.name, result)?;
        }

        for function_name in &self.config.functions {
            let result = function::create_lambda_zip(&self.layout, &self.config, function_name);
            record(&mut report, function_name, result)?;
        }

        info!(
            "{} archive(s) created, {} skipped",
            report.built.len(),
            report.skipped.len()
        );
        Ok(report)
    }
}

/// Applies the failure policy to one archive's result.
fn record(
    report: &mut PackagingReport,
    name: &str,
    result: error_stack::Result<PathBuf, PackagerError>,
) -> error_stack::Result<(), PackagerError> {
    match result {
        Ok(path) => {
            report.built.push(path);
            Ok(())
        }
        Err(err) => match outcome_for(FailureKind::of(err.current_context())) {
            Outcome::Skip => {
                report.skipped.push(SkippedArchive {
                    name: name.to_string(),
                    reason: err.current_context().to_string(),
                });
                Ok(())
            }
            Outcome::Abort => {
                error!("An error occurred while packaging {}: {:?}", name, err);
                Err(err)
            }
        },
    }
}

fn ensure_directory_exists(directory: &Path) -> error_stack::Result<(), PackagerError> {
    if !directory.exists() {
        fs::create_dir_all(directory)
            .change_context_lazy(|| PackagerError::Io(directory.to_path_buf()))?;
        info!("Created directory: {}", directory.display());
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::config::{InstallCommand, LayerConfig};
    use super::*;
    use std::fs::File;

    fn archive_names(zip_path: &Path) -> Vec<String> {
        let archive = zip::ZipArchive::new(File::open(zip_path).unwrap()).unwrap();
        let mut names: Vec<String> = archive.file_names().map(String::from).collect();
        names.sort();
        names
    }

    fn shell_install(script: &str) -> InstallCommand {
        InstallCommand {
            program: "sh".to_string(),
            args: vec![
                "-c".to_string(),
                script.to_string(),
                "sh".to_string(),
                "{requirements}".to_string(),
                "{target}".to_string(),
            ],
        }
    }

    fn layer(install: InstallCommand) -> LayerConfig {
        LayerConfig {
            install,
            ..LayerConfig::default()
        }
    }

    fn write(path: &Path, contents: &str) {
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, contents).unwrap();
    }

    fn tree() -> (tempfile::TempDir, Layout) {
        let dir = tempfile::tempdir().unwrap();
        let layout = Layout::new(dir.path());
        (dir, layout)
    }

    #[tokio::test]
    async fn test_builds_layer_and_function_archives() {
        let (_dir, layout) = tree();
        write(
            &layout.layer_source_dir().join("google_sheets_layer/requirements.txt"),
            "gspread\n",
        );
        write(&layout.lambda_source_dir().join("get_sheets_all_records"), "binary");
        write(&layout.lambda_source_dir().join("client_secret.json"), "{}");

        let config = PackagerConfig {
            layers: vec![layer(shell_install(
                "mkdir -p \"$2/gspread\" && cp \"$1\" \"$2/gspread/REQUIREMENTS\"",
            ))],
            ..PackagerConfig::default()
        };

        let report = Packager::new(layout.clone(), config).run().await.unwrap();

        let deployments = layout.deployments_dir();
        assert_eq!(
            report.built,
            vec![
                deployments.join("google_sheets_layer.zip"),
                deployments.join("get_sheets_all_records.zip"),
            ]
        );
        assert!(report.skipped.is_empty());
        assert_eq!(
            archive_names(&deployments.join("google_sheets_layer.zip")),
            vec!["python/", "python/gspread/", "python/gspread/REQUIREMENTS"]
        );
        assert_eq!(
            archive_names(&deployments.join("get_sheets_all_records.zip")),
            vec!["bootstrap", "client_secret.json"]
        );
    }

    #[tokio::test]
    async fn test_function_without_credential_file() {
        let (_dir, layout) = tree();
        write(&layout.lambda_source_dir().join("get_sheets_all_records"), "binary");

        let config = PackagerConfig {
            layers: Vec::new(),
            ..PackagerConfig::default()
        };
        Packager::new(layout.clone(), config).run().await.unwrap();

        assert_eq!(
            archive_names(&layout.deployments_dir().join("get_sheets_all_records.zip")),
            vec!["bootstrap"]
        );
    }

    #[tokio::test]
    async fn test_missing_inputs_are_skipped() {
        let (_dir, layout) = tree();
        write(&layout.lambda_source_dir().join("present.py"), "def handler(): pass\n");

        let config = PackagerConfig {
            functions: vec!["absent".to_string(), "present".to_string()],
            source_extension: ".py".to_string(),
            entry_point: "lambda_function.py".to_string(),
            ..PackagerConfig::default()
        };
        let report = Packager::new(layout.clone(), config).run().await.unwrap();

        assert_eq!(report.built, vec![layout.deployments_dir().join("present.zip")]);
        let skipped: Vec<&str> = report.skipped.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(skipped, vec!["google_sheets_layer", "absent"]);
        assert!(report.skipped[0].reason.starts_with("Requirements file not found"));
        assert!(report.skipped[1].reason.starts_with("Lambda source file not found"));
        assert!(!layout.deployments_dir().join("absent.zip").exists());
    }

    #[tokio::test]
    async fn test_install_failure_aborts_run() {
        let (_dir, layout) = tree();
        write(
            &layout.layer_source_dir().join("google_sheets_layer/requirements.txt"),
            "gspread\n",
        );
        write(&layout.lambda_source_dir().join("get_sheets_all_records"), "binary");

        let config = PackagerConfig {
            layers: vec![layer(shell_install("exit 3"))],
            ..PackagerConfig::default()
        };
        let err = Packager::new(layout.clone(), config).run().await.unwrap_err();

        assert!(matches!(
            err.current_context(),
            PackagerError::InstallFailed(name) if name == "google_sheets_layer"
        ));
        assert!(!layout
            .deployments_dir()
            .join("get_sheets_all_records.zip")
            .exists());
    }

    #[tokio::test]
    async fn test_unknown_install_program_aborts_run() {
        let (_dir, layout) = tree();
        write(
            &layout.layer_source_dir().join("google_sheets_layer/requirements.txt"),
            "gspread\n",
        );

        let config = PackagerConfig {
            layers: vec![layer(InstallCommand {
                program: "definitely-not-an-installer-on-path".to_string(),
                args: Vec::new(),
            })],
            ..PackagerConfig::default()
        };
        let err = Packager::new(layout, config).run().await.unwrap_err();
        assert!(matches!(
            err.current_context(),
            PackagerError::InstallFailed(_)
        ));
    }

    #[tokio::test]
    async fn test_creates_deployments_directory() {
        let (_dir, layout) = tree();
        let config = PackagerConfig {
            functions: Vec::new(),
            layers: Vec::new(),
            ..PackagerConfig::default()
        };
        let report = Packager::new(layout.clone(), config).run().await.unwrap();

        assert!(layout.deployments_dir().is_dir());
        assert_eq!(report, PackagingReport::default());
    }
}
