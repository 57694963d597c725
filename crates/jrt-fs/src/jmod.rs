//! Module image provider (`jrt` scheme) backed by packaged modules.
//!
//! [`JmodImageLoader`] plays the part of the dynamic loader: it accepts the
//! installation's provider helper archive (`jrt-fs.jar`), checks that it is
//! a readable archive, and yields a [`JmodImageProvider`]. The provider
//! synthesizes the module image from the `jmods/*.jmod` files of the
//! installation:
//!
//! ```text
//! /modules/<module>/<resource path>
//! /packages/<package>/<module>
//! ```
//!
//! Package names use dots (`java.lang`). Modules are listed by name and
//! packages by name, so listings from this provider are sorted.

use crate::memory::MemoryFileSystem;
use crate::tree::EntryTree;
use jrt_core::{
    Error, FileSystemProvider, FsAddress, FsHandle, FsPath, ProviderLoader, ProviderOptions,
    ProviderSource, Result,
};
use std::collections::BTreeMap;
use std::fs::{self, File};
use std::io::{self, BufReader, Read, Seek, SeekFrom};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use zip::ZipArchive;

/// Option key overriding the installation root used by the provider.
pub const JAVA_HOME_OPTION: &str = "java.home";

/// Default directory of packaged modules, relative to the installation root.
pub const DEFAULT_JMODS_DIR: &str = "jmods";

const JMOD_MAGIC: [u8; 4] = [b'J', b'M', 0x01, 0x00];
const CLASSES_PREFIX: &str = "classes/";

/// Loads the module image provider from a helper archive.
///
/// The image is built from packaged modules only. Installations without a
/// modules directory, such as linked runtime images, cannot be indexed:
/// opening their image fails with [`Error::InstallationNotFound`] naming
/// the missing directory.
#[derive(Debug, Clone)]
pub struct JmodImageLoader {
    jmods_dir: PathBuf,
}

impl JmodImageLoader {
    /// Creates a loader reading modules from `<root>/jmods`.
    #[must_use]
    pub fn new() -> Self {
        Self {
            jmods_dir: PathBuf::from(DEFAULT_JMODS_DIR),
        }
    }

    /// Overrides the modules directory, relative to the installation root.
    #[must_use]
    pub fn with_jmods_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.jmods_dir = dir.into();
        self
    }
}

impl Default for JmodImageLoader {
    fn default() -> Self {
        Self::new()
    }
}

impl ProviderLoader for JmodImageLoader {
    fn load(&self, source: &ProviderSource) -> Result<Arc<dyn FileSystemProvider>> {
        let load_error = |e: Box<dyn std::error::Error + Send + Sync>| Error::ProviderLoad {
            archive: source.archive.clone(),
            source: e,
        };

        let file = File::open(&source.archive).map_err(|e| load_error(Box::new(e)))?;
        let helper = ZipArchive::new(BufReader::new(file)).map_err(|e| load_error(Box::new(e)))?;
        tracing::debug!(
            "Loaded provider archive {} ({} entries)",
            source.archive.display(),
            helper.len()
        );

        Ok(Arc::new(JmodImageProvider::new(
            &source.install_root,
            &self.jmods_dir,
        )))
    }
}

/// Provider synthesizing the `jrt:/` module image from packaged modules.
#[derive(Debug, Clone)]
pub struct JmodImageProvider {
    install_root: PathBuf,
    jmods_dir: PathBuf,
}

impl JmodImageProvider {
    /// Creates a provider for the installation at `install_root`.
    ///
    /// `jmods_dir` is relative to the installation root.
    #[must_use]
    pub fn new(install_root: &Path, jmods_dir: &Path) -> Self {
        Self {
            install_root: install_root.to_path_buf(),
            jmods_dir: jmods_dir.to_path_buf(),
        }
    }

    /// Builds the module image from every `*.jmod` file in `jmods`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Io`] if the directory cannot be read and
    /// [`Error::Archive`] if a module file is not a readable archive.
    pub fn build_image(jmods: &Path, address: FsAddress) -> Result<MemoryFileSystem> {
        let modules = list_modules(jmods)?;

        let mut tree = EntryTree::new();
        let modules_root = FsPath::root().join("modules")?;
        let packages_root = FsPath::root().join("packages")?;
        tree.insert_dir(&modules_root)?;
        tree.insert_dir(&packages_root)?;

        let mut packages: BTreeMap<String, Vec<String>> = BTreeMap::new();
        for (module, path) in &modules {
            let module_dir = modules_root.join(module)?;
            tree.insert_dir(&module_dir)?;

            for resource in class_entries(path)? {
                let inserted = module_dir
                    .join(&resource)
                    .and_then(|file| tree.insert_file(&file));
                if let Err(e) = inserted {
                    tracing::warn!("Skipping '{}' in {}: {}", resource, path.display(), e);
                    continue;
                }
                if let Some(package) = package_of(&resource) {
                    let owners = packages.entry(package).or_default();
                    if owners.last() != Some(module) {
                        owners.push(module.clone());
                    }
                }
            }
        }

        for (package, owners) in &packages {
            let package_dir = packages_root.join(package)?;
            for module in owners {
                tree.insert_dir(&package_dir.join(module)?)?;
            }
        }

        tracing::debug!(
            "Built module image from {}: {} modules, {} packages",
            jmods.display(),
            modules.len(),
            packages.len()
        );
        Ok(MemoryFileSystem::from_tree(address, tree))
    }
}

impl FileSystemProvider for JmodImageProvider {
    fn scheme(&self) -> &str {
        FsAddress::MODULE_IMAGE_SCHEME
    }

    fn new_file_system(&self, address: &FsAddress, options: &ProviderOptions) -> Result<FsHandle> {
        if address.scheme() != self.scheme() {
            return Err(Error::ProviderNotFound {
                scheme: address.scheme().to_string(),
                address: address.to_string(),
            });
        }

        let root = options
            .get(JAVA_HOME_OPTION)
            .map_or_else(|| self.install_root.clone(), PathBuf::from);
        let jmods = root.join(&self.jmods_dir);
        if !jmods.is_dir() {
            tracing::debug!("{} does not exist", jmods.display());
            return Err(Error::InstallationNotFound {
                root,
                missing: jmods,
            });
        }
        let image = Self::build_image(&jmods, address.clone())?;
        Ok(image.into_handle())
    }
}

fn list_modules(jmods: &Path) -> Result<Vec<(String, PathBuf)>> {
    let read_error = |e| Error::io(format!("reading {}", jmods.display()), e);

    let mut modules = Vec::new();
    for entry in fs::read_dir(jmods).map_err(read_error)? {
        let path = entry.map_err(read_error)?.path();
        if path.extension().is_none_or(|ext| ext != "jmod") {
            continue;
        }
        if let Some(name) = path.file_stem().and_then(|s| s.to_str()) {
            modules.push((name.to_string(), path.clone()));
        }
    }
    modules.sort();
    Ok(modules)
}

/// Returns the file entries below `classes/`, with the prefix removed.
fn class_entries(jmod: &Path) -> Result<Vec<String>> {
    let archive_error = |e: Box<dyn std::error::Error + Send + Sync>| Error::Archive {
        path: jmod.to_path_buf(),
        source: e,
    };

    let mut file = BufReader::new(
        File::open(jmod).map_err(|e| Error::io(format!("opening {}", jmod.display()), e))?,
    );
    let mut magic = [0u8; 4];
    let has_header = file.read_exact(&mut magic).is_ok() && magic == JMOD_MAGIC;
    let offset = if has_header { JMOD_MAGIC.len() as u64 } else { 0 };
    file.seek(SeekFrom::Start(offset))
        .map_err(|e| archive_error(Box::new(e)))?;

    let zip = ZipArchive::new(OffsetReader::new(file, offset))
        .map_err(|e| archive_error(Box::new(e)))?;
    Ok(zip
        .file_names()
        .filter(|name| !name.ends_with('/'))
        .filter_map(|name| name.strip_prefix(CLASSES_PREFIX))
        .filter(|name| !name.is_empty())
        .map(str::to_string)
        .collect())
}

fn package_of(resource: &str) -> Option<String> {
    let (dir, _) = resource.rsplit_once('/')?;
    if dir.starts_with("META-INF") {
        return None;
    }
    Some(dir.replace('/', "."))
}

/// Presents a stream starting `offset` bytes in as if it started at zero.
///
/// Packaged module files carry a short header in front of the zip data.
#[derive(Debug)]
struct OffsetReader<R> {
    inner: R,
    offset: u64,
}

impl<R> OffsetReader<R> {
    const fn new(inner: R, offset: u64) -> Self {
        Self { inner, offset }
    }
}

impl<R: Read> Read for OffsetReader<R> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        self.inner.read(buf)
    }
}

impl<R: Seek> Seek for OffsetReader<R> {
    fn seek(&mut self, pos: SeekFrom) -> io::Result<u64> {
        let target = match pos {
            SeekFrom::Start(n) => SeekFrom::Start(n + self.offset),
            other => other,
        };
        let absolute = self.inner.seek(target)?;
        absolute.checked_sub(self.offset).ok_or_else(|| {
            io::Error::new(io::ErrorKind::InvalidInput, "seek before start of archive data")
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn test_package_of() {
        assert_eq!(package_of("java/lang/Object.class").as_deref(), Some("java.lang"));
        assert_eq!(package_of("module-info.class"), None);
        assert_eq!(package_of("META-INF/services/x.Y"), None);
    }

    #[test]
    fn test_offset_reader_hides_header() {
        let data = b"HDR!payload".to_vec();
        let mut cursor = Cursor::new(data);
        cursor.seek(SeekFrom::Start(4)).unwrap();
        let mut reader = OffsetReader::new(cursor, 4);

        assert_eq!(reader.seek(SeekFrom::Start(0)).unwrap(), 0);
        let mut out = String::new();
        reader.read_to_string(&mut out).unwrap();
        assert_eq!(out, "payload");

        assert_eq!(reader.seek(SeekFrom::End(-4)).unwrap(), 3);
        assert!(reader.seek(SeekFrom::Current(-10)).is_err());
    }

    #[test]
    fn test_loader_rejects_non_archive_helper() {
        let dir = tempfile::TempDir::new().unwrap();
        let helper = dir.path().join("jrt-fs.jar");
        fs::write(&helper, b"definitely not a zip").unwrap();

        let err = JmodImageLoader::new()
            .load(&ProviderSource {
                install_root: dir.path().to_path_buf(),
                archive: helper,
            })
            .unwrap_err();
        assert!(matches!(err, Error::ProviderLoad { .. }));
        assert!(err.is_io_error());
    }

    #[test]
    fn test_provider_rejects_foreign_scheme() {
        let provider = JmodImageProvider::new(Path::new("/jdk"), Path::new("jmods"));
        let err = provider
            .new_file_system(&FsAddress::new("jar", "file:/x"), &ProviderOptions::new())
            .unwrap_err();
        assert!(err.is_fatal());
    }

    #[test]
    fn test_build_image_missing_jmods_dir() {
        let dir = tempfile::TempDir::new().unwrap();
        let err = JmodImageProvider::build_image(&dir.path().join("jmods"), FsAddress::module_image())
            .unwrap_err();
        assert!(matches!(err, Error::Io { .. }));
    }

    #[test]
    fn test_installation_without_jmods_is_not_found() {
        let dir = tempfile::TempDir::new().unwrap();
        fs::create_dir_all(dir.path().join("lib/modules")).unwrap();
        let provider = JmodImageProvider::new(dir.path(), Path::new(DEFAULT_JMODS_DIR));

        let err = provider
            .new_file_system(&FsAddress::module_image(), &ProviderOptions::new())
            .unwrap_err();
        assert!(err.is_not_found());
        match err {
            Error::InstallationNotFound { missing, .. } => {
                assert_eq!(missing, dir.path().join("jmods"));
            }
            other => panic!("unexpected error: {other}"),
        }
    }
}
