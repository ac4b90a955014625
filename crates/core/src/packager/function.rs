use std::fs;
use std::path::PathBuf;

use error_stack::{report, ResultExt};
use tracing::{error, info, instrument};

use super::archive::zip_dir;
use super::config::{Layout, PackagerConfig};
use super::PackagerError;

/// Builds `deployments/<function_name>.zip` holding the function artifact, renamed to the
/// entry point, and the credential key file when one exists.
#[instrument(skip(layout, config))]
pub fn create_lambda_zip(
    layout: &Layout,
    config: &PackagerConfig,
    function_name: &str,
) -> error_stack::Result<PathBuf, PackagerError> {
    let source_dir = layout.lambda_source_dir();
    let source_path = source_dir.join(format!("{}{}", function_name, config.source_extension));
    let zip_path = layout
        .deployments_dir()
        .join(format!("{}.zip", function_name));

    if !source_path.is_file() {
        error!("Lambda source file not found: {}", source_path.display());
        return Err(report!(PackagerError::MissingSource(source_path)));
    }

    let staging = tempfile::tempdir().change_context(PackagerError::Io(std::env::temp_dir()))?;
    info!("Creating Lambda ZIP: {}", function_name);

    let entry_point = staging.path().join(&config.entry_point);
    fs::copy(&source_path, &entry_point)
        .change_context_lazy(|| PackagerError::Io(source_path.clone()))
        .attach_printable_lazy(|| format!("copying to {}", entry_point.display()))?;

    if !config.credential_file.is_empty() {
        let credential = source_dir.join(&config.credential_file);
        if credential.is_file() {
            fs::copy(&credential, staging.path().join(&config.credential_file))
                .change_context_lazy(|| PackagerError::Io(credential.clone()))?;
        }
    }

    zip_dir(staging.path(), &zip_path)?;
    info!("Lambda ZIP created successfully: {}", zip_path.display());
    Ok(zip_path)
}
