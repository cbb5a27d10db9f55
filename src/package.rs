//! Extracting a template archive into a scratch tree and zipping it back up.

use std::fs;
use std::io::{self, Cursor, Write};
use std::path::{Path, PathBuf};

use tempfile::TempDir;
use tracing::debug;
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipArchive, ZipWriter};

use crate::assets::{CardAsset, IMAGES_DIR};
use crate::error::{GenerateError, GenerateResult};
use crate::manifest::{MANIFEST_PATH, Manifest};

const CONTENT_DIR: &str = "content";

/// An extracted template tree, deleted when dropped.
#[derive(Debug)]
pub struct ScratchTree {
    dir: TempDir,
}

impl ScratchTree {
    /// Unpack `template` into a fresh temporary directory.
    pub fn extract(template: &[u8]) -> GenerateResult<Self> {
        let mut archive = ZipArchive::new(Cursor::new(template))
            .map_err(|err| GenerateError::archive(format!("cannot open template: {err}")))?;
        let dir = tempfile::Builder::new().prefix("memorycards-").tempdir()?;

        for idx in 0..archive.len() {
            let mut entry = archive.by_index(idx)?;
            let Some(relative) = entry.enclosed_name() else {
                return Err(GenerateError::archive(format!(
                    "entry `{}` escapes the archive root",
                    entry.name()
                )));
            };
            let target = dir.path().join(relative);
            if entry.is_dir() {
                fs::create_dir_all(&target)?;
                continue;
            }
            if let Some(parent) = target.parent() {
                fs::create_dir_all(parent)?;
            }
            let mut out = fs::File::create(&target)?;
            io::copy(&mut entry, &mut out)?;
        }
        debug!(entries = archive.len(), root = %dir.path().display(), "extracted template");
        Ok(Self { dir })
    }

    pub fn root(&self) -> &Path {
        self.dir.path()
    }

    fn manifest_path(&self) -> PathBuf {
        self.root().join(MANIFEST_PATH)
    }

    fn images_dir(&self) -> PathBuf {
        self.root().join(CONTENT_DIR).join(IMAGES_DIR)
    }

    /// Read and parse the template manifest.
    pub fn read_manifest(&self) -> GenerateResult<Manifest> {
        let path = self.manifest_path();
        let bytes = match fs::read(&path) {
            Ok(bytes) => bytes,
            Err(err) if err.kind() == io::ErrorKind::NotFound => {
                return Err(GenerateError::ManifestMissing {
                    path: MANIFEST_PATH.to_string(),
                });
            }
            Err(err) => return Err(err.into()),
        };
        Manifest::from_slice(&bytes)
    }

    pub fn write_manifest(&self, manifest: &Manifest) -> GenerateResult<()> {
        fs::write(self.manifest_path(), manifest.to_pretty_json()?)?;
        Ok(())
    }

    /// Write card images into `content/images`, creating it if needed.
    pub fn write_assets<'a>(
        &self,
        assets: impl IntoIterator<Item = &'a CardAsset>,
    ) -> GenerateResult<usize> {
        let dir = self.images_dir();
        fs::create_dir_all(&dir)?;
        let mut written = 0;
        for asset in assets {
            fs::write(dir.join(&asset.file_name), &asset.bytes)?;
            written += 1;
        }
        Ok(written)
    }

    /// Zip every file under the root, using `/`-separated relative paths in sorted order.
    pub fn archive(&self) -> GenerateResult<Vec<u8>> {
        let mut files = Vec::new();
        collect_files(self.root(), self.root(), &mut files)?;
        files.sort();

        let options = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);
        let mut writer = ZipWriter::new(Cursor::new(Vec::new()));
        for relative in &files {
            writer.start_file(relative.as_str(), options)?;
            let bytes = fs::read(self.root().join(relative))?;
            writer.write_all(&bytes)?;
        }
        let cursor = writer.finish()?;
        debug!(entries = files.len(), "archived package");
        Ok(cursor.into_inner())
    }
}

fn collect_files(root: &Path, dir: &Path, files: &mut Vec<String>) -> io::Result<()> {
    for entry in fs::read_dir(dir)? {
        let entry = entry?;
        let path = entry.path();
        if entry.file_type()?.is_dir() {
            collect_files(root, &path, files)?;
        } else if let Ok(relative) = path.strip_prefix(root) {
            let name = relative
                .components()
                .map(|c| c.as_os_str().to_string_lossy())
                .collect::<Vec<_>>()
                .join("/");
            files.push(name);
        }
    }
    Ok(())
}
