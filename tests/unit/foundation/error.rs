use super::*;

#[test]
fn helpers_build_matching_variants() {
    assert!(matches!(
        GammaError::unsupported_operator("xor"),
        GammaError::UnsupportedOperator(m) if m == "xor"
    ));
    assert!(matches!(GammaError::validation("v"), GammaError::Validation(m) if m == "v"));
    assert!(matches!(GammaError::config("c"), GammaError::Config(m) if m == "c"));
}

#[test]
fn display_names_the_layout() {
    let e = GammaError::UnsupportedSurface(PixelLayout::IntRgb);
    assert_eq!(e.to_string(), "unsupported surface type: IntRgb");
    let e = GammaError::UnsupportedPixelFormat(PixelLayout::IntArgbPre);
    assert_eq!(e.to_string(), "unsupported pixel format: IntArgbPre");
}

#[test]
fn anyhow_errors_are_transparent() {
    let e: GammaError = anyhow::anyhow!("disk on fire").into();
    assert!(matches!(e, GammaError::Other(_)));
    assert_eq!(e.to_string(), "disk on fire");
}
