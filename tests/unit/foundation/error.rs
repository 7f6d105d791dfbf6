use super::*;

#[test]
fn display_prefixes_are_stable() {
    assert!(
        TourscopeError::data_load("x")
            .to_string()
            .contains("data load error:")
    );
    assert!(
        TourscopeError::data_shape("x")
            .to_string()
            .contains("data shape error:")
    );
    assert!(
        TourscopeError::validation("x")
            .to_string()
            .contains("validation error:")
    );
    assert!(
        TourscopeError::playback("x")
            .to_string()
            .contains("playback error:")
    );
    assert!(
        TourscopeError::encode("x")
            .to_string()
            .contains("encode error:")
    );
}

#[test]
fn invalid_tour_index_names_both_bounds() {
    let err = TourscopeError::InvalidTourIndex {
        index: 7,
        num_nodes: 7,
    };
    let msg = err.to_string();
    assert!(msg.contains("index 7"));
    assert!(msg.contains("7 nodes"));
    assert!(err.is_per_frame());
    assert!(!TourscopeError::data_load("x").is_per_frame());
}

#[test]
fn other_preserves_source() {
    let base = std::io::Error::other("boom");
    let err = TourscopeError::Other(anyhow::Error::new(base));
    assert!(err.to_string().contains("boom"));
}
