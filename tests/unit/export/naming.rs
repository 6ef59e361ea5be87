use super::*;

#[test]
fn prefix_with_folder_splits_into_subfolder_and_base() {
    let t = resolve_prefix(Path::new("/out"), "test/clip", 64, 64).unwrap();
    assert_eq!(t.full_output_folder, PathBuf::from("/out/test"));
    assert_eq!(t.subfolder, "test");
    assert_eq!(t.base, "clip");
    assert_eq!(t.file_name(1, "mp4"), "clip_00001_.mp4");
}

#[test]
fn backslashes_and_dots_are_normalized() {
    let t = resolve_prefix(Path::new("/out"), r"a\.\b/c", 1, 1).unwrap();
    assert_eq!(t.subfolder, "a/b");
    assert_eq!(t.base, "c");

    let root = resolve_prefix(Path::new("/out"), "plain", 1, 1).unwrap();
    assert_eq!(root.subfolder, "");
    assert_eq!(root.full_output_folder, PathBuf::from("/out"));
}

#[test]
fn size_tokens_expand() {
    let t = resolve_prefix(Path::new("/out"), "v/%width%x%height%", 640, 480).unwrap();
    assert_eq!(t.base, "640x480");
}

#[test]
fn escaping_prefixes_are_rejected() {
    for prefix in ["../x", "a/../../x", "/abs/x", r"\abs", "C:evil", "", "dir/", "./"] {
        assert!(
            matches!(
                resolve_prefix(Path::new("/out"), prefix, 1, 1),
                Err(ClipError::InvalidInput(_))
            ),
            "{prefix:?}"
        );
    }
}

#[test]
fn colon_is_rejected_in_any_component() {
    for prefix in ["v:intro", "a/v:intro", r"a\b:c\clip", "a:b/clip"] {
        assert!(
            matches!(
                resolve_prefix(Path::new("/out"), prefix, 1, 1),
                Err(ClipError::InvalidInput(_))
            ),
            "{prefix:?}"
        );
    }
}

#[test]
fn counter_parsing_is_strict() {
    assert_eq!(parse_counter("clip_00007_.mp4", "clip"), Some(7));
    assert_eq!(parse_counter("clip_00007_.mp3", "clip"), Some(7));
    assert_eq!(parse_counter("clip_123456_.mp4", "clip"), Some(123_456));
    assert_eq!(parse_counter("clip_x0007_.mp4", "clip"), None);
    assert_eq!(parse_counter("clip_00007.mp4", "clip"), None);
    assert_eq!(parse_counter("clipper_00007_.mp4", "clip"), None);
    assert_eq!(parse_counter("other_00007_.mp4", "clip"), None);
}

#[test]
fn next_counter_follows_highest_existing() {
    let dir = tempfile::tempdir().unwrap();
    let t = resolve_prefix(dir.path(), "clip", 1, 1).unwrap();
    assert_eq!(t.next_counter().unwrap(), 1);

    std::fs::write(t.file_path(3, "mp4"), b"").unwrap();
    std::fs::write(t.file_path(9, "mp3"), b"").unwrap();
    std::fs::write(dir.path().join("unrelated_00050_.mp4"), b"").unwrap();
    assert_eq!(t.next_counter().unwrap(), 10);
}

#[test]
fn reservations_never_collide_and_clean_up_unless_committed() {
    let dir = tempfile::tempdir().unwrap();
    let t = resolve_prefix(dir.path(), "clip", 1, 1).unwrap();

    let a = t.reserve("mp4").unwrap();
    let b = t.reserve("mp4").unwrap();
    assert_ne!(a.counter(), b.counter());
    assert!(a.path().exists() && b.path().exists());

    let kept = a.commit();
    let dropped = b.path().to_path_buf();
    drop(b);
    assert!(kept.exists());
    assert!(!dropped.exists());
}

#[test]
fn reserve_continues_after_existing_files() {
    let dir = tempfile::tempdir().unwrap();
    let t = resolve_prefix(dir.path(), "clip", 1, 1).unwrap();
    std::fs::write(t.file_path(5, "mp4"), b"").unwrap();
    let r = t.reserve("mp4").unwrap();
    assert_eq!(r.counter(), 6);
    assert_eq!(r.file_name(), "clip_00006_.mp4");
}
