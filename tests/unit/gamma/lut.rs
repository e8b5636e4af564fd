use super::*;

#[test]
fn tables_have_fixed_endpoints_and_size() {
    let lut = GammaLut::new(2.2);
    assert_eq!(lut.dir()[0], 0);
    assert_eq!(lut.dir()[255], MAX_COLORS_16);
    assert_eq!(lut.inv().len(), MAX_COLORS_16 as usize + 1);
    assert_eq!(lut.inv()[0], 0);
    assert_eq!(u32::from(lut.inv()[MAX_COLORS_16 as usize]), MAX_COLORS_16);
}

#[test]
fn tables_are_monotonic() {
    for gamma in [1.0, 1.8, 2.2, 2.4] {
        let lut = GammaLut::new(gamma);
        assert!(lut.dir().windows(2).all(|w| w[0] <= w[1]), "dir g={gamma}");
        assert!(lut.inv().windows(2).all(|w| w[0] <= w[1]), "inv g={gamma}");
    }
}

#[test]
fn expand_compress_roundtrip_within_one() {
    let lut = GammaLut::new(2.2);
    for c in 0..=255u8 {
        let back = lut.compress8(lut.expand(c));
        assert!(back.abs_diff(c) <= 1, "c={c} back={back}");
    }
}

#[test]
fn identity_tables_roundtrip_exactly() {
    let lut = GammaLut::identity();
    assert_eq!(lut.gamma(), 1.0);
    for c in 0..=255u8 {
        assert_eq!(lut.expand(c), u32::from(c) * MAX_COLORS_8);
        assert_eq!(lut.compress8(lut.expand(c)), c);
    }
}

#[test]
fn gamma_darkens_midtones_in_linear_light() {
    let lut = GammaLut::new(2.2);
    // display 50% grey is about 22% linear
    let mid = lut.expand(128);
    assert!(mid > 13_000 && mid < 15_500, "mid={mid}");
}

#[test]
#[should_panic(expected = "gamma must be finite")]
fn rejects_non_positive_gamma() {
    let _ = GammaLut::new(0.0);
}

#[test]
fn shared_tables_are_reused() {
    let a = GammaLut::shared();
    let b = GammaLut::shared();
    assert!(Arc::ptr_eq(&a, &b));
}
