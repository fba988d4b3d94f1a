use super::*;

#[test]
fn display_prefixes_are_stable() {
    assert!(
        PixgraphError::contract("x")
            .to_string()
            .contains("contract violation:")
    );
    assert!(
        PixgraphError::missing_input("x")
            .to_string()
            .contains("missing required input:")
    );
    assert!(
        PixgraphError::unresolved("x")
            .to_string()
            .contains("unresolved format:")
    );
    assert!(
        PixgraphError::allocation("x")
            .to_string()
            .contains("allocation error:")
    );
    assert!(
        PixgraphError::validation("x")
            .to_string()
            .contains("validation error:")
    );
    assert!(PixgraphError::graph("x").to_string().contains("graph error:"));
}

#[test]
fn other_preserves_source() {
    let base = std::io::Error::other("boom");
    let err = PixgraphError::Other(anyhow::Error::new(base));
    assert!(err.to_string().contains("boom"));
}
