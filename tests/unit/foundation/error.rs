use super::*;

#[test]
fn display_prefixes_are_stable() {
    assert!(
        ClipError::invalid_input("x")
            .to_string()
            .contains("invalid input:")
    );
    assert!(
        ClipError::export_failed("x")
            .to_string()
            .contains("export failed:")
    );
    assert!(
        ClipError::cleanup_failed("x")
            .to_string()
            .contains("resource cleanup failed:")
    );
    assert!(ClipError::config("x").to_string().contains("config error:"));
    assert_eq!(ClipError::Cancelled.to_string(), "export cancelled");
}

#[test]
fn other_preserves_source() {
    let base = std::io::Error::other("boom");
    let err = ClipError::Other(anyhow::Error::new(base));
    assert!(err.to_string().contains("boom"));
}
