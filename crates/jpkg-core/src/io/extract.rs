//! Source archive unpacking (tar, optionally gzip-compressed).

use std::fs::{self, File};
use std::io::{BufReader, Read, Seek, SeekFrom};
use std::path::{Component, Path, PathBuf};

use flate2::read::GzDecoder;

use crate::error::InstallStepError;

const GZIP_MAGIC: [u8; 2] = [0x1f, 0x8b];

/// Unpack `archive` into `dest_dir`, returning the files written.
///
/// Gzip compression is detected from the first bytes, not the file name.
///
/// # Errors
///
/// Returns [`InstallStepError::UnsafePath`] for entries escaping `dest_dir`,
/// or [`InstallStepError::Unpack`] if the archive can not be read.
pub fn unpack(archive: &Path, dest_dir: &Path) -> Result<Vec<PathBuf>, InstallStepError> {
    let unpack_err = |source| InstallStepError::Unpack {
        archive: archive.to_path_buf(),
        source,
    };

    let mut file = File::open(archive).map_err(unpack_err)?;
    let gzipped = is_gzip(&mut file).map_err(unpack_err)?;
    let reader = BufReader::new(file);

    tracing::debug!(
        "Unpacking {} ({}) into {}",
        archive.display(),
        if gzipped { "tar.gz" } else { "tar" },
        dest_dir.display()
    );

    if gzipped {
        extract_tar(GzDecoder::new(reader), dest_dir, archive)
    } else {
        extract_tar(reader, dest_dir, archive)
    }
}

fn is_gzip(file: &mut File) -> std::io::Result<bool> {
    let mut magic = [0u8; 2];
    let n = file.read(&mut magic)?;
    file.seek(SeekFrom::Start(0))?;
    Ok(n == 2 && magic == GZIP_MAGIC)
}

fn extract_tar<R: Read>(
    reader: R,
    dest_dir: &Path,
    archive_path: &Path,
) -> Result<Vec<PathBuf>, InstallStepError> {
    let unpack_err = |source| InstallStepError::Unpack {
        archive: archive_path.to_path_buf(),
        source,
    };

    fs::create_dir_all(dest_dir)?;

    let mut archive = tar::Archive::new(reader);
    let mut extracted = Vec::new();

    for entry in archive.entries().map_err(unpack_err)? {
        let mut entry = entry.map_err(unpack_err)?;
        let relative_path: PathBuf = entry.path().map_err(unpack_err)?.components().collect();

        // Reject anything that could land outside dest_dir
        if relative_path
            .components()
            .any(|c| !matches!(c, Component::Normal(_) | Component::CurDir))
        {
            return Err(InstallStepError::UnsafePath(relative_path));
        }

        let absolute_path = dest_dir.join(&relative_path);

        if entry.header().entry_type().is_dir() {
            fs::create_dir_all(&absolute_path)?;
            continue;
        }

        if let Some(parent) = absolute_path.parent() {
            fs::create_dir_all(parent)?;
        }

        entry.unpack(&absolute_path).map_err(unpack_err)?;
        extracted.push(absolute_path);
    }

    Ok(extracted)
}

#[cfg(test)]
mod tests {
    use super::*;
    use flate2::Compression;
    use flate2::write::GzEncoder;
    use tempfile::tempdir;

    fn tar_bytes(files: &[(&str, &str)]) -> Vec<u8> {
        let mut builder = tar::Builder::new(Vec::new());
        for (path, content) in files {
            let mut header = tar::Header::new_gnu();
            header.set_size(content.len() as u64);
            header.set_mode(0o644);
            header.set_cksum();
            builder
                .append_data(&mut header, path, content.as_bytes())
                .unwrap();
        }
        builder.into_inner().unwrap()
    }

    #[test]
    fn test_unpack_plain_tar() {
        let dir = tempdir().unwrap();
        let archive = dir.path().join("lib.tar");
        fs::write(&archive, tar_bytes(&[("src/main.c", "int main;")])).unwrap();

        let out = dir.path().join("out");
        let files = unpack(&archive, &out).unwrap();

        assert_eq!(files, vec![out.join("src/main.c")]);
        assert_eq!(
            fs::read_to_string(out.join("src/main.c")).unwrap(),
            "int main;"
        );
    }

    #[test]
    fn test_unpack_gzip_detected_by_content() {
        let dir = tempdir().unwrap();
        // no .gz suffix on purpose
        let archive = dir.path().join("lib.archive");
        let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
        std::io::Write::write_all(&mut encoder, &tar_bytes(&[("README", "hello")])).unwrap();
        fs::write(&archive, encoder.finish().unwrap()).unwrap();

        let out = dir.path().join("out");
        unpack(&archive, &out).unwrap();
        assert_eq!(fs::read_to_string(out.join("README")).unwrap(), "hello");
    }

    #[test]
    fn test_unpack_rejects_parent_dir() {
        let dir = tempdir().unwrap();
        let archive = dir.path().join("evil.tar");

        // tar::Builder refuses `..` paths, so write the name into the header directly
        let mut header = tar::Header::new_old();
        header.as_old_mut().name[..9].copy_from_slice(b"../escape");
        header.set_size(1);
        header.set_mode(0o644);
        header.set_cksum();
        let mut builder = tar::Builder::new(Vec::new());
        builder.append(&header, &b"x"[..]).unwrap();
        fs::write(&archive, builder.into_inner().unwrap()).unwrap();

        let out = dir.path().join("out");
        let err = unpack(&archive, &out).unwrap_err();
        assert!(matches!(err, InstallStepError::UnsafePath(_)));
        assert!(!dir.path().join("escape").exists());
    }

    #[test]
    fn test_unpack_missing_archive() {
        let dir = tempdir().unwrap();
        let err = unpack(&dir.path().join("nope.tar"), dir.path()).unwrap_err();
        assert!(matches!(err, InstallStepError::Unpack { .. }));
    }
}
