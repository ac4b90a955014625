use std::fs;
use std::path::{Path, PathBuf};

use error_stack::{report, ResultExt};
use tokio::process::Command;
use tracing::{error, info, instrument};

use super::archive::zip_dir;
use super::config::{LayerConfig, Layout};
use super::PackagerError;

/// Builds `deployments/<layer>.zip` from the packages the layer's install command puts into a
/// scratch directory.
#[instrument(skip(layout, layer), fields(layer_name = %layer.name))]
pub async fn create_layer_zip(
    layout: &Layout,
    layer: &LayerConfig,
) -> error_stack::Result<PathBuf, PackagerError> {
    let requirements_file = layout
        .layer_source_dir()
        .join(&layer.name)
        .join(&layer.requirements_file);
    let zip_path = layout.deployments_dir().join(format!("{}.zip", layer.name));

    if !requirements_file.is_file() {
        error!(
            "Requirements file not found: {}",
            requirements_file.display()
        );
        return Err(report!(PackagerError::MissingRequirements(
            requirements_file
        )));
    }

    let staging = tempfile::tempdir().change_context(PackagerError::Io(std::env::temp_dir()))?;
    info!("Creating layer ZIP: {}", layer.name);
    install_layer_dependencies(staging.path(), &requirements_file, layer).await?;

    zip_dir(staging.path(), &zip_path)?;
    info!("Layer ZIP created successfully: {}", zip_path.display());
    Ok(zip_path)
}

async fn install_layer_dependencies(
    temp_dir: &Path,
    requirements_file: &Path,
    layer: &LayerConfig,
) -> error_stack::Result<(), PackagerError> {
    let target = temp_dir.join(&layer.target_subdir);
    fs::create_dir_all(&target).change_context_lazy(|| PackagerError::Io(target.clone()))?;

    let args = layer.install.render_args(requirements_file, &target);
    let status = Command::new(&layer.install.program)
        .args(&args)
        .status()
        .await;

    match status {
        Ok(status) if status.success() => {
            info!("Layer dependencies installed successfully");
            Ok(())
        }
        Ok(status) => {
            error!("Failed to install layer dependencies: {}", status);
            Err(report!(PackagerError::InstallFailed(layer.name.clone()))
                .attach_printable(format!("{} {}", layer.install.program, args.join(" ")))
                .attach_printable(format!("exit status: {}", status)))
        }
        Err(err) => {
            error!("Failed to install layer dependencies: {}", err);
            Err(report!(PackagerError::InstallFailed(layer.name.clone()))
                .attach_printable(format!("could not start {}: {}", layer.install.program, err)))
        }
    }
}
