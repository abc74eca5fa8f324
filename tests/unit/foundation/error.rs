use super::*;

#[test]
fn display_prefixes_are_stable() {
    assert!(
        BoltzError::precondition("x")
            .to_string()
            .contains("precondition violation:")
    );
    assert!(
        BoltzError::render("x")
            .to_string()
            .contains("render failure:")
    );
    assert!(
        BoltzError::assembly("x")
            .to_string()
            .contains("assembly failure:")
    );
}

#[test]
fn other_preserves_source() {
    let base = std::io::Error::other("boom");
    let err = BoltzError::Other(anyhow::Error::new(base));
    assert!(err.to_string().contains("boom"));
}
