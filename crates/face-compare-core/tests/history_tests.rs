mod common;

use common::write_image;
use face_compare_core::history::HistoryCatalog;
use std::fs::{self, File};
use std::path::PathBuf;
use std::time::{Duration, SystemTime};
use tempfile::tempdir;

fn set_mtime(path: &PathBuf, secs_ago: u64) {
    let file = File::options().write(true).open(path).unwrap();
    file.set_modified(SystemTime::now() - Duration::from_secs(secs_ago))
        .unwrap();
}

#[test]
fn test_list_filters_to_supported_images() {
    let upload = tempdir().unwrap();
    write_image(upload.path(), "a.png");
    write_image(upload.path(), "b.JPEG");
    write_image(upload.path(), "c.webp");
    write_image(upload.path(), "d.jpg");
    write_image(upload.path(), "notes.txt");
    write_image(upload.path(), "archive.png.bak");
    write_image(upload.path(), "no_extension");
    fs::create_dir(upload.path().join("folder.png")).unwrap();

    let listing = HistoryCatalog::new(upload.path()).list();

    let mut names: Vec<_> = listing
        .iter()
        .map(|e| e.path().file_name().unwrap().to_string_lossy().into_owned())
        .collect();
    names.sort();
    assert_eq!(names, vec!["a.png", "b.JPEG", "c.webp", "d.jpg"]);
}

#[test]
fn test_list_is_newest_first() {
    let upload = tempdir().unwrap();
    let oldest = write_image(upload.path(), "zzz.png");
    let middle = write_image(upload.path(), "aaa.jpg");
    let newest = write_image(upload.path(), "mmm.webp");
    set_mtime(&oldest, 300);
    set_mtime(&middle, 200);
    set_mtime(&newest, 100);

    let listing = HistoryCatalog::new(upload.path()).list();

    let paths: Vec<_> = listing.iter().map(|e| e.path().to_path_buf()).collect();
    assert_eq!(paths, vec![newest, middle, oldest]);
    assert!(listing
        .windows(2)
        .all(|pair| pair[0].modified > pair[1].modified));
}

#[test]
fn test_list_of_missing_directory_is_empty() {
    let tmp = tempdir().unwrap();
    let catalog = HistoryCatalog::new(tmp.path().join("missing"));
    assert!(catalog.list().is_empty());
    assert!(catalog.try_list().is_err());
}

#[test]
fn test_list_is_fresh_each_call() {
    let upload = tempdir().unwrap();
    let catalog = HistoryCatalog::new(upload.path());
    assert!(catalog.list().is_empty());

    write_image(upload.path(), "late.png");

    assert_eq!(catalog.list().len(), 1);
}
