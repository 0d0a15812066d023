use super::*;

#[test]
fn display_prefixes_are_stable() {
    assert!(
        StudioError::validation("x")
            .to_string()
            .contains("validation error:")
    );
    assert!(StudioError::asset("x").to_string().contains("asset error:"));
    assert!(StudioError::setup("x").to_string().contains("setup error:"));
    assert!(
        StudioError::playback("x")
            .to_string()
            .contains("playback error:")
    );
    assert!(StudioError::encode("x").to_string().contains("encode error:"));
    assert!(
        StudioError::serde("x")
            .to_string()
            .contains("serialization error:")
    );
}

#[test]
fn other_preserves_source() {
    let base = std::io::Error::other("boom");
    let err = StudioError::Other(anyhow::Error::new(base));
    assert!(err.to_string().contains("boom"));
}
