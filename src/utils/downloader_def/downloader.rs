use std::{
    fmt,
    path::{Path, PathBuf},
};

use tracing::{debug, info};

use crate::utils::{
    dir::DirUtils,
    downloader_def::{extract::ZipExtractor, r#trait::ContentSource},
    errors::AcquireError,
    progress::ProgressUtils,
};

/// Name of the temporary archive written into the export directory.
pub const ARCHIVE_FILE_NAME: &str = "layer-content.zip";
/// Subdirectory of the export directory receiving the extracted tree.
pub const CONTENT_DIR_NAME: &str = "layer-content";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AcquireStage {
    Idle,
    Downloading,
    Downloaded,
    Extracting,
    Extracted,
    CleanedUp,
    Failed,
}

impl fmt::Display for AcquireStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            AcquireStage::Idle => "idle",
            AcquireStage::Downloading => "downloading",
            AcquireStage::Downloaded => "downloaded",
            AcquireStage::Extracting => "extracting",
            AcquireStage::Extracted => "extracted",
            AcquireStage::CleanedUp => "cleaned up",
            AcquireStage::Failed => "failed",
        };
        f.write_str(name)
    }
}

/// Downloads a layer archive into an export directory and unpacks it there.
pub struct ContentAcquirer<S: ContentSource> {
    source: S,
    show_progress: bool,
}

impl<S: ContentSource> ContentAcquirer<S> {
    pub fn new(source: S, show_progress: bool) -> Self {
        Self {
            source,
            show_progress,
        }
    }

    /// Fetches `location` into `dest_dir/layer-content.zip`, extracts it into
    /// `dest_dir/layer-content` and removes the archive.
    ///
    /// Returns the absolute path of the extracted tree. On failure the archive
    /// and a partially extracted tree may be left behind.
    pub fn acquire(&self, location: &str, dest_dir: &Path) -> Result<PathBuf, AcquireError> {
        self.run_stages(location, dest_dir).inspect_err(|err| {
            debug!("Acquisition {} -> {}: {}", err.stage(), AcquireStage::Failed, err);
        })
    }

    fn run_stages(&self, location: &str, dest_dir: &Path) -> Result<PathBuf, AcquireError> {
        let dest = DirUtils::ensure_absolute_dir(dest_dir).map_err(|source| {
            AcquireError::Destination {
                path: dest_dir.to_path_buf(),
                source,
            }
        })?;
        let archive = dest.join(ARCHIVE_FILE_NAME);
        let content_dir = dest.join(CONTENT_DIR_NAME);

        Self::enter(AcquireStage::Downloading);
        let spinner = ProgressUtils::display_loader(
            "Downloading layer content...".to_owned(),
            self.show_progress,
        );
        let downloaded = self.source.download(location, &archive);
        spinner.finish_and_clear();
        let size = downloaded.map_err(|source| AcquireError::Download {
            path: archive.clone(),
            source,
        })?;
        Self::enter(AcquireStage::Downloaded);
        info!("Downloaded {} bytes to {:?}", size, archive);

        Self::enter(AcquireStage::Extracting);
        let spinner = ProgressUtils::display_loader(
            format!("Extracting into {}...", content_dir.display()),
            self.show_progress,
        );
        let extracted = ZipExtractor::extract(&archive, &content_dir);
        spinner.finish_and_clear();
        let members = extracted.map_err(|source| AcquireError::Extract {
            path: archive.clone(),
            source,
        })?;
        Self::enter(AcquireStage::Extracted);
        info!("Extracted {} archive members into {:?}", members, content_dir);

        std::fs::remove_file(&archive).map_err(|source| AcquireError::Cleanup {
            archive: archive.clone(),
            extracted: content_dir.clone(),
            source,
        })?;
        Self::enter(AcquireStage::CleanedUp);

        Ok(content_dir)
    }

    fn enter(stage: AcquireStage) {
        debug!("Acquisition stage: {}", stage);
    }
}

#[cfg(test)]
mod tests {
    use std::{
        cell::Cell,
        collections::BTreeMap,
        fs,
        path::{Path, PathBuf},
    };

    use super::*;
    use crate::utils::{
        downloader_def::extract::tests::write_zip,
        errors::{DownloadError, ExtractError},
    };

    /// Serves the bytes of a prepared archive regardless of location.
    struct FixtureSource {
        archive: PathBuf,
        calls: Cell<usize>,
    }

    impl ContentSource for FixtureSource {
        fn download(&self, _location: &str, dest_path: &Path) -> Result<u64, DownloadError> {
            self.calls.set(self.calls.get() + 1);
            fs::copy(&self.archive, dest_path).map_err(|source| DownloadError::Io {
                path: dest_path.to_path_buf(),
                source,
            })
        }
    }

    struct DeniedSource;

    impl ContentSource for DeniedSource {
        fn download(&self, _location: &str, _dest_path: &Path) -> Result<u64, DownloadError> {
            Err(DownloadError::Status { status: 403 })
        }
    }

    fn fixture(dir: &Path) -> FixtureSource {
        let archive = dir.join("fixture.zip");
        write_zip(
            &archive,
            &[
                ("a/", 0o755, b""),
                ("a/b.txt", 0o644, b"layer bytes"),
                ("python/lib/mod.py", 0o644, b"print('hi')\n"),
            ],
        );
        FixtureSource {
            archive,
            calls: Cell::new(0),
        }
    }

    fn snapshot(root: &Path) -> BTreeMap<PathBuf, Vec<u8>> {
        let mut files = BTreeMap::new();
        let mut dirs = vec![root.to_path_buf()];
        while let Some(dir) = dirs.pop() {
            for entry in fs::read_dir(&dir).unwrap() {
                let path = entry.unwrap().path();
                if path.is_dir() {
                    dirs.push(path);
                } else {
                    let rel = path.strip_prefix(root).unwrap().to_path_buf();
                    files.insert(rel, fs::read(&path).unwrap());
                }
            }
        }
        files
    }

    #[test]
    fn test_acquire_extracts_and_cleans_up() {
        let tmp = tempfile::tempdir().unwrap();
        let source = fixture(tmp.path());
        let dest = tmp.path().join("export");
        let acquirer = ContentAcquirer::new(source, false);

        let content_dir = acquirer
            .acquire("https://example.com/layer?versionId=1", &dest)
            .unwrap();

        assert!(content_dir.is_absolute());
        assert_eq!(content_dir, dest.join(CONTENT_DIR_NAME));
        assert_eq!(
            fs::read(content_dir.join("a").join("b.txt")).unwrap(),
            b"layer bytes"
        );
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            let mode = fs::metadata(content_dir.join("a/b.txt"))
                .unwrap()
                .permissions()
                .mode();
            assert_eq!(mode & 0o777, 0o644);
        }
        assert!(!dest.join(ARCHIVE_FILE_NAME).exists());
        assert_eq!(acquirer.source.calls.get(), 1);
    }

    #[test]
    fn test_acquire_is_repeatable() {
        let tmp = tempfile::tempdir().unwrap();
        let acquirer = ContentAcquirer::new(fixture(tmp.path()), false);

        let first = acquirer
            .acquire("https://example.com/l", &tmp.path().join("one"))
            .unwrap();
        let second = acquirer
            .acquire("https://example.com/l", &tmp.path().join("two"))
            .unwrap();

        assert_ne!(first, second);
        assert_eq!(snapshot(&first), snapshot(&second));
        assert_eq!(snapshot(&first).len(), 2);
    }

    #[test]
    fn test_acquire_download_failure() {
        let tmp = tempfile::tempdir().unwrap();
        let dest = tmp.path().join("export");
        let acquirer = ContentAcquirer::new(DeniedSource, false);

        let err = acquirer.acquire("https://example.com/l", &dest).unwrap_err();

        assert_eq!(err.stage(), AcquireStage::Downloading);
        assert!(matches!(
            err,
            AcquireError::Download {
                source: DownloadError::Status { status: 403 },
                ..
            }
        ));
        // Destination is created before downloading
        assert!(dest.is_dir());
        assert!(!dest.join(CONTENT_DIR_NAME).exists());
    }

    #[test]
    fn test_acquire_unsafe_archive_keeps_archive() {
        let tmp = tempfile::tempdir().unwrap();
        let archive = tmp.path().join("evil.zip");
        write_zip(&archive, &[("../../escape.txt", 0o644, b"x")]);
        let dest = tmp.path().join("export");
        let acquirer = ContentAcquirer::new(
            FixtureSource {
                archive,
                calls: Cell::new(0),
            },
            false,
        );

        let err = acquirer.acquire("https://example.com/l", &dest).unwrap_err();

        assert_eq!(err.stage(), AcquireStage::Extracting);
        assert!(matches!(
            err,
            AcquireError::Extract {
                source: ExtractError::UnsafePath { .. },
                ..
            }
        ));
        assert!(dest.join(ARCHIVE_FILE_NAME).exists());
        assert!(!tmp.path().join("escape.txt").exists());
    }

    /// Writes the archive, then locks the export directory so the archive
    /// cannot be unlinked while the extracted tree stays writable.
    #[cfg(unix)]
    struct LockingSource;

    #[cfg(unix)]
    impl ContentSource for LockingSource {
        fn download(&self, _location: &str, dest_path: &Path) -> Result<u64, DownloadError> {
            use std::os::unix::fs::PermissionsExt;

            write_zip(dest_path, &[("a/b.txt", 0o644, b"layer bytes")]);
            let dest = dest_path.parent().unwrap();
            fs::set_permissions(dest, fs::Permissions::from_mode(0o555)).unwrap();
            Ok(fs::metadata(dest_path).unwrap().len())
        }
    }

    #[cfg(unix)]
    #[test]
    fn test_acquire_cleanup_failure_keeps_tree() {
        use std::os::unix::fs::PermissionsExt;

        let tmp = tempfile::tempdir().unwrap();
        let dest = tmp.path().join("export");
        fs::create_dir_all(dest.join(CONTENT_DIR_NAME)).unwrap();

        // Privileged users ignore directory permissions
        fs::set_permissions(&dest, fs::Permissions::from_mode(0o555)).unwrap();
        let privileged = fs::write(dest.join(".writable"), b"").is_ok();
        fs::set_permissions(&dest, fs::Permissions::from_mode(0o755)).unwrap();
        if privileged {
            eprintln!("skipping: directory permissions are not enforced for this user");
            return;
        }

        let acquirer = ContentAcquirer::new(LockingSource, false);
        let err = acquirer.acquire("https://example.com/l", &dest).unwrap_err();
        fs::set_permissions(&dest, fs::Permissions::from_mode(0o755)).unwrap();

        assert_eq!(err.stage(), AcquireStage::Extracted);
        match err {
            AcquireError::Cleanup {
                archive, extracted, ..
            } => {
                assert_eq!(archive, dest.join(ARCHIVE_FILE_NAME));
                assert_eq!(extracted, dest.join(CONTENT_DIR_NAME));
            }
            other => panic!("unexpected error: {other:?}"),
        }
        assert!(dest.join(ARCHIVE_FILE_NAME).exists());
        assert_eq!(
            fs::read(dest.join(CONTENT_DIR_NAME).join("a/b.txt")).unwrap(),
            b"layer bytes"
        );
    }
}
