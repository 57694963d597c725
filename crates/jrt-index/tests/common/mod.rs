//! Shared test doubles and installation fixtures.

#![allow(dead_code)]

use jrt_core::{Error, FsAddress, FsPath, Result, VirtualFileSystem};
use std::collections::{HashMap, HashSet};
use std::fs;
use std::io::{Cursor, Write};
use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};
use tempfile::TempDir;
use zip::write::SimpleFileOptions;

/// Filesystem with scripted listings, injected listing failures and an
/// optionally failing close.
#[derive(Debug)]
pub struct ScriptedFs {
    address: FsAddress,
    listings: HashMap<String, Vec<String>>,
    failing: HashSet<String>,
    close_fails: bool,
    open: AtomicBool,
}

impl ScriptedFs {
    pub fn new(location: &str) -> Self {
        Self {
            address: FsAddress::new("test", location),
            listings: HashMap::new(),
            failing: HashSet::new(),
            close_fails: false,
            open: AtomicBool::new(true),
        }
    }

    /// Children of `dir`, returned in exactly this order.
    pub fn with_listing(mut self, dir: &str, children: &[&str]) -> Self {
        let base = if dir == "/" { String::new() } else { dir.to_string() };
        self.listings.insert(
            dir.to_string(),
            children.iter().map(|c| format!("{base}/{c}")).collect(),
        );
        self
    }

    pub fn with_failing_listing(mut self, dir: &str) -> Self {
        self.failing.insert(dir.to_string());
        self
    }

    pub const fn with_failing_close(mut self) -> Self {
        self.close_fails = true;
        self
    }
}

impl VirtualFileSystem for ScriptedFs {
    fn address(&self) -> &FsAddress {
        &self.address
    }

    fn list(&self, dir: &FsPath) -> Result<Vec<FsPath>> {
        if self.failing.contains(dir.as_str()) {
            return Err(Error::io(
                format!("listing {dir}"),
                std::io::Error::other("injected failure"),
            ));
        }
        let children = self.listings.get(dir.as_str()).ok_or_else(|| Error::PathNotFound {
            path: dir.to_string(),
        })?;
        children.iter().map(FsPath::new).collect()
    }

    fn is_dir(&self, path: &FsPath) -> bool {
        self.listings.contains_key(path.as_str())
    }

    fn is_open(&self) -> bool {
        self.open.load(Ordering::Acquire)
    }

    fn close(&self) -> Result<()> {
        if self.close_fails {
            return Err(Error::io(
                format!("closing {}", self.address),
                std::io::Error::other("injected close failure"),
            ));
        }
        if self.open.swap(false, Ordering::AcqRel) {
            Ok(())
        } else {
            Err(Error::FileSystemClosed {
                address: self.address.to_string(),
            })
        }
    }
}

pub fn zip_bytes(entries: &[&str]) -> Vec<u8> {
    let mut writer = zip::ZipWriter::new(Cursor::new(Vec::new()));
    for name in entries {
        if name.ends_with('/') {
            writer
                .add_directory(*name, SimpleFileOptions::default())
                .unwrap();
        } else {
            writer.start_file(*name, SimpleFileOptions::default()).unwrap();
            writer.write_all(b"\xCA\xFE\xBA\xBE").unwrap();
        }
    }
    writer.finish().unwrap().into_inner()
}

pub fn write_jmod(jmods: &Path, module: &str, classes: &[&str]) {
    let entries: Vec<String> = classes.iter().map(|c| format!("classes/{c}")).collect();
    let names: Vec<&str> = entries.iter().map(String::as_str).collect();
    let mut bytes = b"JM\x01\x00".to_vec();
    bytes.extend(zip_bytes(&names));
    fs::write(jmods.join(format!("{module}.jmod")), bytes).unwrap();
}

/// Modern installation: `lib/jrt-fs.jar` plus two packaged modules.
pub fn modern_install() -> TempDir {
    let temp = TempDir::new().unwrap();
    let root = temp.path();
    fs::create_dir_all(root.join("lib")).unwrap();
    fs::create_dir_all(root.join("jmods")).unwrap();
    fs::write(
        root.join("lib/jrt-fs.jar"),
        zip_bytes(&["jdk/internal/jrtfs/JrtFileSystemProvider.class"]),
    )
    .unwrap();

    write_jmod(
        &root.join("jmods"),
        "java.base",
        &["module-info.class", "java/lang/Object.class", "java/util/Map.class"],
    );
    write_jmod(
        &root.join("jmods"),
        "java.sql",
        &["module-info.class", "java/sql/Driver.class"],
    );
    temp
}

/// Early installation: `lib/ct.sym` with packages listed out of order.
pub fn symbol_install() -> TempDir {
    let temp = TempDir::new().unwrap();
    fs::create_dir_all(temp.path().join("lib")).unwrap();
    fs::write(
        temp.path().join("lib/ct.sym"),
        zip_bytes(&[
            "packages/java.util/java.base/",
            "packages/java.awt/java.desktop/",
            "packages/java.lang/java.base/",
            "packages/sun.empty/",
        ]),
    )
    .unwrap();
    temp
}
