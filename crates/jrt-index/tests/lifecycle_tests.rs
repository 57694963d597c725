//! Opening real installations on disk, handle reuse and disposal.

mod common;

use common::{ScriptedFs, modern_install, symbol_install};
use jrt_core::{FsHandle, RootId};
use jrt_index::{FileSystemOpener, HandleRegistry, IndexSource, JrtSession, dispose_all};
use std::sync::Arc;
use tempfile::TempDir;

#[test]
fn test_module_image_index() {
    let install = modern_install();
    let session = JrtSession::default();

    let index = session
        .index_installation(install.path(), IndexSource::ModuleImage)
        .unwrap();

    let entries: Vec<_> = index.packages.iter().collect();
    assert_eq!(
        entries,
        vec![
            ("java.lang", "java.base"),
            ("java.sql", "java.sql"),
            ("java.util", "java.base"),
        ]
    );
    assert_eq!(session.registry().len(), 1);
}

#[test]
fn test_symbol_archive_index_keeps_archive_order() {
    let install = symbol_install();
    let session = JrtSession::default();

    let index = session
        .index_installation(install.path(), IndexSource::SymbolArchive)
        .unwrap();

    let keys: Vec<_> = index.packages.keys().collect();
    assert_eq!(keys, vec!["java.util", "java.awt", "java.lang"]);
    assert_eq!(index.packages.get("sun.empty"), None);
}

#[test]
fn test_missing_archives_register_nothing() {
    let empty = TempDir::new().unwrap();
    let registry = HandleRegistry::new();
    let opener = FileSystemOpener::new();

    assert!(opener
        .open_module_filesystem(&registry, empty.path())
        .unwrap_err()
        .is_not_found());
    assert!(opener
        .open_symbol_archive_filesystem(&registry, empty.path())
        .unwrap_err()
        .is_not_found());
    assert!(registry.is_empty());
}

#[test]
fn test_symbol_archive_opened_twice_is_reused() {
    let install = symbol_install();
    let registry = HandleRegistry::new();
    let opener = FileSystemOpener::new();

    let first = opener
        .open_symbol_archive_filesystem(&registry, install.path())
        .unwrap();
    let second = opener
        .open_symbol_archive_filesystem(&registry, install.path())
        .unwrap();

    assert!(Arc::ptr_eq(&first, &second));
    assert_eq!(registry.len(), 1);
    assert_eq!(opener.file_systems().open_count(), 1);
}

#[test]
fn test_reuse_across_openers_sharing_a_table() {
    let install = symbol_install();
    let opener = FileSystemOpener::new();
    let other = opener.clone();

    let first = opener
        .open_symbol_archive_filesystem(&HandleRegistry::new(), install.path())
        .unwrap();
    let second = other
        .open_symbol_archive_filesystem(&HandleRegistry::new(), install.path())
        .unwrap();
    assert!(Arc::ptr_eq(&first, &second));
}

#[test]
fn test_reopen_after_close_creates_new_handle() {
    let install = symbol_install();
    let registry = HandleRegistry::new();
    let opener = FileSystemOpener::new();

    let first = opener
        .open_symbol_archive_filesystem(&registry, install.path())
        .unwrap();
    assert!(dispose_all(&registry).is_clean());

    let second = opener
        .open_symbol_archive_filesystem(&registry, install.path())
        .unwrap();
    assert!(!Arc::ptr_eq(&first, &second));
    assert!(second.is_open());
}

#[test]
fn test_dispose_isolates_close_failures() {
    let registry = HandleRegistry::new();
    let good_a: FsHandle = Arc::new(ScriptedFs::new("/a"));
    let bad: FsHandle = Arc::new(ScriptedFs::new("/bad").with_failing_close());
    let good_b: FsHandle = Arc::new(ScriptedFs::new("/b"));

    registry.register(RootId::new("/a"), Arc::clone(&good_a));
    registry.register(RootId::new("/bad"), Arc::clone(&bad));
    registry.register(RootId::new("/b"), Arc::clone(&good_b));

    let report = dispose_all(&registry);

    assert_eq!(report.closed, 2);
    assert_eq!(report.failures.len(), 1);
    assert_eq!(report.failures[0].id, RootId::new("/bad"));
    assert!(!good_a.is_open());
    assert!(!good_b.is_open());
}

#[test]
fn test_second_dispose_reports_closed_handles() {
    let install = modern_install();
    let session = JrtSession::default();
    session.open(install.path(), IndexSource::ModuleImage).unwrap();

    assert_eq!(session.dispose().closed, 1);
    let again = session.dispose();
    assert_eq!(again.closed, 0);
    assert_eq!(again.failures.len(), 1);
    assert!(again.failures[0].error.is_closed());
}

#[test]
fn test_session_drop_closes_handles() {
    let install = modern_install();
    let handle = {
        let session = JrtSession::default();
        session.open(install.path(), IndexSource::ModuleImage).unwrap()
    };
    assert!(!handle.is_open());
}

#[test]
fn test_reopening_a_root_closes_the_displaced_handle() {
    let install = modern_install();
    let session = JrtSession::default();

    let first = session.open(install.path(), IndexSource::ModuleImage).unwrap();
    let second = session.open(install.path(), IndexSource::ModuleImage).unwrap();

    assert!(!Arc::ptr_eq(&first, &second));
    assert!(!first.is_open());
    assert!(second.is_open());
    assert_eq!(session.registry().len(), 1);

    drop(session);
    assert!(!second.is_open());
}

#[test]
fn test_displaced_handle_shared_with_another_root_stays_open() {
    let install = modern_install();
    let symbols = symbol_install();
    std::fs::copy(
        symbols.path().join("lib/ct.sym"),
        install.path().join("lib/ct.sym"),
    )
    .unwrap();
    let registry = HandleRegistry::new();
    let opener = FileSystemOpener::new();
    let alias = install.path().join("");

    let archive = opener
        .open_symbol_archive_filesystem(&registry, install.path())
        .unwrap();
    opener
        .open_symbol_archive_filesystem(&registry, &alias)
        .unwrap();

    let image = opener
        .open_module_filesystem(&registry, install.path())
        .unwrap();
    assert!(archive.is_open());
    assert!(Arc::ptr_eq(
        &registry.get(&RootId::from_path(install.path())).unwrap(),
        &image
    ));

    let report = dispose_all(&registry);
    assert_eq!(report.closed, 2);
    assert!(report.is_clean());
}

#[test]
fn test_dispose_releases_archive_shared_by_two_roots() {
    let install = symbol_install();
    let registry = HandleRegistry::new();
    let opener = FileSystemOpener::new();
    let alias = install.path().join("");

    let first = opener
        .open_symbol_archive_filesystem(&registry, install.path())
        .unwrap();
    let second = opener
        .open_symbol_archive_filesystem(&registry, &alias)
        .unwrap();
    assert!(Arc::ptr_eq(&first, &second));
    assert_eq!(registry.len(), 2);

    let report = dispose_all(&registry);
    assert_eq!(report.closed, 1);
    assert!(report.is_clean());
    assert!(!first.is_open());
}
