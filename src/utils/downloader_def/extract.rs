use std::{
    fs::{self, DirBuilder, File, OpenOptions},
    io::{self, BufWriter, Read, Write as _},
    path::Path,
};

use tracing::debug;
use zip::ZipArchive;

use crate::utils::errors::ExtractError;

const DEFAULT_DIR_MODE: u32 = 0o755;
const DEFAULT_FILE_MODE: u32 = 0o644;
/// Only permission bits are restored; setuid/setgid/sticky are dropped.
const MODE_MASK: u32 = 0o777;

pub struct ZipExtractor;

impl ZipExtractor {
    /// Extracts every member of `archive_path` below `dest`, in archive order,
    /// and returns the number of members processed.
    ///
    /// Members whose path would land outside `dest` (absolute paths or `..`
    /// escaping the root) abort the extraction. Whatever was written before a
    /// failure stays on disk.
    pub fn extract(archive_path: &Path, dest: &Path) -> Result<usize, ExtractError> {
        let file = File::open(archive_path).map_err(|source| ExtractError::Io {
            path: archive_path.to_path_buf(),
            source,
        })?;
        let mut archive = ZipArchive::new(file).map_err(|source| ExtractError::Open {
            path: archive_path.to_path_buf(),
            source,
        })?;

        Self::create_dir(dest, DEFAULT_DIR_MODE)?;

        for index in 0..archive.len() {
            let mut member = archive
                .by_index(index)
                .map_err(|source| ExtractError::Member { index, source })?;

            let Some(relative) = member.enclosed_name() else {
                return Err(ExtractError::UnsafePath {
                    name: member.name().to_owned(),
                });
            };
            let out_path = dest.join(relative);
            let recorded_mode = member.unix_mode().map(|mode| mode & MODE_MASK);

            if member.is_dir() {
                let mode = recorded_mode.unwrap_or(DEFAULT_DIR_MODE);
                Self::create_dir(&out_path, mode)?;
                Self::set_mode(&out_path, mode)?;
            } else {
                if let Some(parent) = out_path.parent() {
                    Self::create_dir(parent, DEFAULT_DIR_MODE)?;
                }
                let mode = recorded_mode.unwrap_or(DEFAULT_FILE_MODE);
                let written = Self::write_file(&mut member, &out_path, mode)?;
                debug!("Extracted {:?} ({} bytes)", out_path, written);
            }
        }

        Ok(archive.len())
    }

    fn create_dir(path: &Path, mode: u32) -> Result<(), ExtractError> {
        let mut builder = DirBuilder::new();
        builder.recursive(true);

        #[cfg(unix)]
        {
            use std::os::unix::fs::DirBuilderExt;
            builder.mode(mode);
        }
        #[cfg(not(unix))]
        let _ = mode;

        builder.create(path).map_err(|source| ExtractError::Io {
            path: path.to_path_buf(),
            source,
        })
    }

    fn write_file(member: &mut impl Read, path: &Path, mode: u32) -> Result<u64, ExtractError> {
        let io_err = |source| ExtractError::Io {
            path: path.to_path_buf(),
            source,
        };

        let mut options = OpenOptions::new();
        options.write(true).create(true).truncate(true);

        #[cfg(unix)]
        {
            use std::os::unix::fs::OpenOptionsExt;
            options.mode(mode);
        }

        let mut writer = BufWriter::new(options.open(path).map_err(io_err)?);
        let written = io::copy(member, &mut writer).map_err(io_err)?;
        writer.flush().map_err(io_err)?;
        drop(writer);

        // Creation mode is filtered by the umask and ignored for existing files
        Self::set_mode(path, mode)?;
        Ok(written)
    }

    fn set_mode(path: &Path, mode: u32) -> Result<(), ExtractError> {
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            fs::set_permissions(path, fs::Permissions::from_mode(mode)).map_err(|source| {
                ExtractError::Io {
                    path: path.to_path_buf(),
                    source,
                }
            })?;
        }
        #[cfg(not(unix))]
        let _ = (path, mode);

        Ok(())
    }
}
