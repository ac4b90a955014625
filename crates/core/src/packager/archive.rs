use std::fs::{File, Metadata};
use std::io;
use std::path::{Component, Path};

use error_stack::{report, ResultExt};
use walkdir::WalkDir;
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, DateTime, ZipWriter};

use super::PackagerError;

/// Zips everything under `root` into `zip_path`, replacing any previous archive.
///
/// Entry names are relative to `root` and use `/`. Entries are written in file-name order with
/// a fixed timestamp, so the same tree always gives the same archive. Returns the number of
/// entries written.
pub fn zip_dir(root: &Path, zip_path: &Path) -> error_stack::Result<usize, PackagerError> {
    let archive_error = || PackagerError::Archive(zip_path.to_path_buf());

    let file = File::create(zip_path).change_context_lazy(archive_error)?;
    let mut writer = ZipWriter::new(file);
    let mut entries = 0;

    for entry in WalkDir::new(root).min_depth(1).sort_by_file_name() {
        let entry = entry.change_context_lazy(|| PackagerError::Io(root.to_path_buf()))?;
        let name = entry_name(root, entry.path())?;
        let metadata = entry
            .metadata()
            .change_context_lazy(|| PackagerError::Io(entry.path().to_path_buf()))?;
        let options = file_options(&metadata);

        if metadata.is_dir() {
            writer
                .add_directory(name, options)
                .change_context_lazy(archive_error)?;
        } else {
            writer
                .start_file(name, options)
                .change_context_lazy(archive_error)?;
            let mut source = File::open(entry.path())
                .change_context_lazy(|| PackagerError::Io(entry.path().to_path_buf()))?;
            io::copy(&mut source, &mut writer).change_context_lazy(archive_error)?;
        }
        entries += 1;
    }

    writer.finish().change_context_lazy(archive_error)?;
    Ok(entries)
}

fn entry_name(root: &Path, path: &Path) -> error_stack::Result<String, PackagerError> {
    let relative = path
        .strip_prefix(root)
        .change_context_lazy(|| PackagerError::Io(path.to_path_buf()))?;

    let mut parts = Vec::new();
    for component in relative.components() {
        match component {
            Component::Normal(part) => parts.push(part.to_string_lossy().into_owned()),
            _ => {
                return Err(report!(PackagerError::Io(path.to_path_buf()))
                    .attach_printable("unexpected path component inside staging directory"))
            }
        }
    }
    Ok(parts.join("/"))
}

fn file_options(metadata: &Metadata) -> SimpleFileOptions {
    let options = SimpleFileOptions::default()
        .compression_method(CompressionMethod::Deflated)
        .last_modified_time(DateTime::default());

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        options.unix_permissions(metadata.permissions().mode() & 0o777)
    }
    #[cfg(not(unix))]
    {
        let _ = metadata;
        options
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Read;

    fn names(zip_path: &Path) -> Vec<String> {
        let archive = zip::ZipArchive::new(File::open(zip_path).unwrap()).unwrap();
        let mut names: Vec<String> = archive.file_names().map(String::from).collect();
        names.sort();
        names
    }

    #[test]
    fn test_zip_dir_keeps_relative_layout() {
        let staging = tempfile::tempdir().unwrap();
        std::fs::create_dir_all(staging.path().join("python/pkg")).unwrap();
        std::fs::write(staging.path().join("python/pkg/__init__.py"), "x = 1\n").unwrap();
        std::fs::write(staging.path().join("top.txt"), "top").unwrap();

        let out = tempfile::tempdir().unwrap();
        let zip_path = out.path().join("layer.zip");
        let entries = zip_dir(staging.path(), &zip_path).unwrap();

        assert_eq!(entries, 4);
        assert_eq!(
            names(&zip_path),
            vec!["python/", "python/pkg/", "python/pkg/__init__.py", "top.txt"]
        );

        let mut archive = zip::ZipArchive::new(File::open(&zip_path).unwrap()).unwrap();
        let mut contents = String::new();
        archive
            .by_name("python/pkg/__init__.py")
            .unwrap()
            .read_to_string(&mut contents)
            .unwrap();
        assert_eq!(contents, "x = 1\n");
    }

    #[test]
    fn test_zip_dir_is_deterministic() {
        let staging = tempfile::tempdir().unwrap();
        std::fs::write(staging.path().join("b"), "b").unwrap();
        std::fs::write(staging.path().join("a"), "a").unwrap();

        let out = tempfile::tempdir().unwrap();
        let first = out.path().join("first.zip");
        let second = out.path().join("second.zip");
        zip_dir(staging.path(), &first).unwrap();
        zip_dir(staging.path(), &second).unwrap();

        assert_eq!(std::fs::read(&first).unwrap(), std::fs::read(&second).unwrap());
    }

    #[test]
    fn test_empty_directory_gives_empty_archive() {
        let staging = tempfile::tempdir().unwrap();
        let out = tempfile::tempdir().unwrap();
        let zip_path = out.path().join("empty.zip");

        assert_eq!(zip_dir(staging.path(), &zip_path).unwrap(), 0);
        assert!(names(&zip_path).is_empty());
    }
}
