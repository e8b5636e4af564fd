use super::*;

#[test]
fn only_src_over_has_a_blender() {
    assert_eq!(BlendMode::for_rule(CompositeRule::SrcOver).unwrap(), BlendMode::SrcOver);
    for rule in [
        CompositeRule::Clear,
        CompositeRule::Src,
        CompositeRule::DstOver,
        CompositeRule::SrcIn,
        CompositeRule::Xor,
    ] {
        assert!(
            matches!(BlendMode::for_rule(rule), Err(GammaError::UnsupportedOperator(_))),
            "{rule:?}"
        );
    }
}

#[test]
fn src_over_weights() {
    let s: Pixel16 = [65025, 0, 0, 255];
    let d: Pixel16 = [0, 0, 65025, 255];
    assert_eq!(BlendMode::SrcOver.blend(&s, &d, 255, 0), s);
    assert_eq!(BlendMode::SrcOver.blend(&[0; 4], &d, 255, 255), d);
}

#[test]
fn composite_alpha_is_validated_and_quantized() {
    assert!(Composite::new(CompositeRule::SrcOver, 1.5).is_err());
    assert!(Composite::new(CompositeRule::SrcOver, -0.1).is_err());
    assert!(Composite::new(CompositeRule::SrcOver, f32::NAN).is_err());

    assert_eq!(Composite::src_over().alpha8(), 255);
    assert_eq!(Composite::src_over().with_alpha(0.5).unwrap().alpha8(), 128);
    assert_eq!(Composite::src_over().with_alpha(0.0).unwrap().alpha8(), 0);
}

#[test]
fn resolve_keeps_extra_alpha() {
    let c = Composite::src_over().with_alpha(0.25).unwrap();
    let r = BlendComposite::resolve(&c, false).unwrap();
    assert_eq!(r.mode(), BlendMode::SrcOver);
    assert_eq!(r.extra_alpha(), 64);
}

#[test]
fn src_with_opaque_solid_paint_resolves_to_src_over() {
    let c = Composite::new(CompositeRule::Src, 1.0).unwrap();
    assert_eq!(
        BlendComposite::resolve(&c, true).unwrap(),
        BlendComposite::default()
    );
    // translucent paint or extra alpha keeps Src semantics, which we cannot blend
    assert!(matches!(
        BlendComposite::resolve(&c, false),
        Err(GammaError::UnsupportedOperator(_))
    ));
    let faded = Composite::new(CompositeRule::Src, 0.5).unwrap();
    assert!(matches!(
        BlendComposite::resolve(&faded, true),
        Err(GammaError::UnsupportedOperator(_))
    ));
}

#[test]
fn composite_serializes_snake_case() {
    let c = Composite::new(CompositeRule::DstOver, 1.0).unwrap();
    let json = serde_json::to_string(&c).unwrap();
    assert_eq!(json, r#"{"rule":"dst_over","alpha":1.0}"#);
}
