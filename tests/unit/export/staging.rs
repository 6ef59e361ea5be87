use super::*;

#[test]
fn remove_deletes_file_and_tolerates_missing() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("a_00001_.mp3");
    std::fs::write(&path, b"id3").unwrap();

    StagingFile::new(path.clone()).remove().unwrap();
    assert!(!path.exists());

    StagingFile::new(path.clone()).remove().unwrap();
}

#[test]
fn drop_deletes_unremoved_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("b_00001_.mp3");
    {
        let staging = StagingFile::new(path.clone());
        std::fs::write(staging.path(), b"id3").unwrap();
    }
    assert!(!path.exists());
}

#[test]
fn failed_removal_is_cleanup_error() {
    let dir = tempfile::tempdir().unwrap();
    // A non-empty directory cannot be removed with remove_file.
    let path = dir.path().join("c_00001_.mp3");
    std::fs::create_dir(&path).unwrap();
    std::fs::write(path.join("inner"), b"x").unwrap();

    let err = StagingFile::new(path.clone()).remove().unwrap_err();
    assert!(matches!(err, ClipError::ResourceCleanupFailed(_)));
}
