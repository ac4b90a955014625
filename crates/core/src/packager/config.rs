use std::path::{Path, PathBuf};

use config::Config;
use error_stack::ResultExt;
use serde::Deserialize;

use super::PackagerError;

pub const DEFAULT_CONFIG_NAME: &str = "Packager";
pub const REQUIREMENTS_PLACEHOLDER: &str = "{requirements}";
pub const TARGET_PLACEHOLDER: &str = "{target}";

/// Fixed source tree consumed by the packager, rooted at `base_dir`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Layout {
    pub base_dir: PathBuf,
}

impl Layout {
    pub fn new<P: Into<PathBuf>>(base_dir: P) -> Self {
        Self {
            base_dir: base_dir.into(),
        }
    }

    pub fn src_dir(&self) -> PathBuf {
        self.base_dir.join("src")
    }

    pub fn lambda_source_dir(&self) -> PathBuf {
        self.src_dir().join("lambdas")
    }

    pub fn layer_source_dir(&self) -> PathBuf {
        self.src_dir().join("layers")
    }

    pub fn deployments_dir(&self) -> PathBuf {
        self.src_dir().join("terraform").join("deployments")
    }
}

/// External command that installs a layer's dependencies into a staging directory.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct InstallCommand {
    pub program: String,
    /// `{requirements}` and `{target}` are replaced with the requirements file and the
    /// staging directory.
    pub args: Vec<String>,
}

impl InstallCommand {
    pub fn render_args(&self, requirements: &Path, target: &Path) -> Vec<String> {
        let requirements = requirements.to_string_lossy();
        let target = target.to_string_lossy();
        self.args
            .iter()
            .map(|arg| {
                arg.replace(REQUIREMENTS_PLACEHOLDER, &requirements)
                    .replace(TARGET_PLACEHOLDER, &target)
            })
            .collect()
    }
}

impl Default for InstallCommand {
    fn default() -> Self {
        Self {
            program: "pip".to_string(),
            args: [
                "install",
                "-r",
                REQUIREMENTS_PLACEHOLDER,
                "--target",
                TARGET_PLACEHOLDER,
                "--platform",
                "manylinux2014_x86_64",
                "--only-binary=:all:",
                "--upgrade",
            ]
            .into_iter()
            .map(String::from)
            .collect(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct LayerConfig {
    pub name: String,
    pub requirements_file: String,
    /// Directory inside the archive that receives the installed packages.
    pub target_subdir: String,
    pub install: InstallCommand,
}

impl Default for LayerConfig {
    fn default() -> Self {
        Self {
            name: "google_sheets_layer".to_string(),
            requirements_file: "requirements.txt".to_string(),
            target_subdir: "python".to_string(),
            install: InstallCommand::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct PackagerConfig {
    pub functions: Vec<String>,
    /// Appended to a function name to find its artifact under `src/lambdas`.
    pub source_extension: String,
    /// Name the artifact gets inside the archive.
    pub entry_point: String,
    /// Optional key file under `src/lambdas`, bundled next to the entry point when present.
    pub credential_file: String,
    pub layers: Vec<LayerConfig>,
}

impl Default for PackagerConfig {
    fn default() -> Self {
        Self {
            functions: vec!["get_sheets_all_records".to_string()],
            source_extension: String::new(),
            entry_point: "bootstrap".to_string(),
            credential_file: "client_secret.json".to_string(),
            layers: vec![LayerConfig::default()],
        }
    }
}

impl PackagerConfig {
    /// Loads `path` when given (it must exist), otherwise the optional `Packager` file in the
    /// working directory. Keys missing from the file keep their defaults.
    pub fn load(path: Option<&Path>) -> error_stack::Result<PackagerConfig, PackagerError> {
        let source = match path {
            Some(path) => config::File::from(path).required(true),
            None => config::File::with_name(DEFAULT_CONFIG_NAME).required(false),
        };

        Config::builder()
            .add_source(source)
            .build()
            .and_then(Config::try_deserialize::<PackagerConfig>)
            .change_context(PackagerError::Config)
            .attach_printable_lazy(|| match path {
                Some(path) => format!("config file: {}", path.display()),
                None => format!("config file: {} (optional)", DEFAULT_CONFIG_NAME),
            })
    }
}
