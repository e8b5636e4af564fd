use super::*;

fn vars<'a>(pairs: &'a [(&'a str, &'a str)]) -> impl Fn(&str) -> Option<String> + 'a {
    move |key| {
        pairs
            .iter()
            .find(|(k, _)| *k == key)
            .map(|(_, v)| (*v).to_string())
    }
}

#[test]
fn defaults_are_gamma_2_2_with_correction() {
    let cfg = CompositeConfig::default();
    assert_eq!(cfg.gamma, DEFAULT_GAMMA);
    assert!(cfg.gamma_correction);
    assert_eq!(cfg.effective_gamma(), 2.2);
}

#[test]
fn lookup_overrides_defaults() {
    let cfg = CompositeConfig::from_lookup(vars(&[
        (GAMMA_ENV, " 1.8 "),
        (GAMMA_CORRECTION_ENV, "off"),
    ]));
    assert_eq!(cfg.gamma, 1.8);
    assert!(!cfg.gamma_correction);
    assert_eq!(cfg.effective_gamma(), 1.0);
}

#[test]
fn lookup_ignores_unparseable_values() {
    let cfg = CompositeConfig::from_lookup(vars(&[
        (GAMMA_ENV, "bright"),
        (GAMMA_CORRECTION_ENV, "maybe"),
    ]));
    assert_eq!(cfg, CompositeConfig::default());
}

#[test]
fn json_fills_missing_fields_with_defaults() {
    let cfg = CompositeConfig::from_json_str(r#"{ "gamma": 2.4 }"#).unwrap();
    assert_eq!(cfg.gamma, 2.4);
    assert!(cfg.gamma_correction);

    let cfg = CompositeConfig::from_json_str("{}").unwrap();
    assert_eq!(cfg, CompositeConfig::default());
}

#[test]
fn json_rejects_garbage_and_bad_gamma() {
    assert!(matches!(
        CompositeConfig::from_json_str("not json"),
        Err(GammaError::Config(_))
    ));
    assert!(matches!(
        CompositeConfig::from_json_str(r#"{ "gamma": 0.0 }"#),
        Err(GammaError::Config(_))
    ));
    assert!(matches!(
        CompositeConfig::from_json_str(r#"{ "gamma": -2.2 }"#),
        Err(GammaError::Config(_))
    ));
}

#[test]
fn lut_follows_effective_gamma() {
    let cfg = CompositeConfig {
        gamma: 2.2,
        gamma_correction: false,
    };
    let lut = cfg.lut().unwrap();
    assert_eq!(lut.gamma(), 1.0);
    assert_eq!(lut.expand(128), 128 * 255);

    let bad = CompositeConfig {
        gamma: f64::NAN,
        gamma_correction: true,
    };
    assert!(bad.lut().is_err());
}

#[test]
fn install_rejects_invalid_config() {
    let bad = CompositeConfig {
        gamma: f64::INFINITY,
        gamma_correction: true,
    };
    assert!(matches!(bad.install(), Err(GammaError::Config(_))));
}

#[test]
fn parse_bool_accepts_common_spellings() {
    for s in ["1", "true", "YES", " on "] {
        assert_eq!(parse_bool(s), Some(true), "{s}");
    }
    for s in ["0", "false", "No", "off"] {
        assert_eq!(parse_bool(s), Some(false), "{s}");
    }
    assert_eq!(parse_bool(""), None);
}
