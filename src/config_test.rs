#![allow(clippy::float_cmp)]

use std::collections::HashMap;

use super::*;

fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
    let map: HashMap<String, String> = pairs.iter().map(|(k, v)| ((*k).to_owned(), (*v).to_owned())).collect();
    move |key| map.get(key).cloned()
}

// =============================================================================
// defaults
// =============================================================================

#[test]
fn empty_lookup_yields_defaults() {
    let config = ExplorerConfig::from_lookup(lookup(&[])).unwrap();
    assert_eq!(config, ExplorerConfig::default());
    assert_eq!(config.view, ViewState::default());
    assert_eq!(config.viewport, ViewportSize::new(DEFAULT_WIDTH, DEFAULT_HEIGHT));
    assert_eq!(config.max_iterations, DEFAULT_MAX_ITERATIONS);
    assert_eq!(config.delivery_capacity, DEFAULT_DELIVERY_CAPACITY);
}

#[test]
fn from_env_without_variables_uses_defaults() {
    unsafe {
        for key in [
            "MANDELVIEW_CENTER_X",
            "MANDELVIEW_CENTER_Y",
            "MANDELVIEW_SCALE",
            "MANDELVIEW_WIDTH",
            "MANDELVIEW_HEIGHT",
            "MANDELVIEW_MAX_ITERATIONS",
            "MANDELVIEW_DELIVERY_CAPACITY",
        ] {
            std::env::remove_var(key);
        }
    }
    assert_eq!(ExplorerConfig::from_env().unwrap(), ExplorerConfig::default());
}

// =============================================================================
// overrides
// =============================================================================

#[test]
fn all_keys_override_defaults() {
    let config = ExplorerConfig::from_lookup(lookup(&[
        ("MANDELVIEW_CENTER_X", "-0.5"),
        ("MANDELVIEW_CENTER_Y", " 0.25 "),
        ("MANDELVIEW_SCALE", "0.01"),
        ("MANDELVIEW_WIDTH", "800"),
        ("MANDELVIEW_HEIGHT", "600"),
        ("MANDELVIEW_MAX_ITERATIONS", "1000"),
        ("MANDELVIEW_DELIVERY_CAPACITY", "4"),
    ]))
    .unwrap();
    assert_eq!(config.view, ViewState::new(-0.5, 0.25, 0.01));
    assert_eq!(config.viewport, ViewportSize::new(800, 600));
    assert_eq!(config.max_iterations, 1000);
    assert_eq!(config.delivery_capacity, 4);
}

#[test]
fn coordinator_config_starts_from_configured_view() {
    let config = ExplorerConfig::from_lookup(lookup(&[("MANDELVIEW_SCALE", "0.5")])).unwrap();
    let coordinator = config.coordinator();
    assert_eq!(coordinator.initial.scale, 0.5);
    assert_eq!(coordinator.zoom_in_factor, CoordinatorConfig::default().zoom_in_factor);
}

#[test]
fn worker_config_carries_capacity() {
    let config = ExplorerConfig::from_lookup(lookup(&[("MANDELVIEW_DELIVERY_CAPACITY", "3")])).unwrap();
    assert_eq!(config.worker().delivery_capacity, 3);
}

// =============================================================================
// errors
// =============================================================================

#[test]
fn unparseable_width_is_an_error() {
    let err = ExplorerConfig::from_lookup(lookup(&[("MANDELVIEW_WIDTH", "wide")])).unwrap_err();
    assert_eq!(
        err,
        ConfigError::Invalid { key: "MANDELVIEW_WIDTH", value: "wide".into(), expected: "pixel count" }
    );
}

#[test]
fn negative_width_is_an_error() {
    let err = ExplorerConfig::from_lookup(lookup(&[("MANDELVIEW_WIDTH", "-1")])).unwrap_err();
    assert!(matches!(err, ConfigError::Invalid { key: "MANDELVIEW_WIDTH", .. }));
}

#[test]
fn zero_scale_is_an_error() {
    let err = ExplorerConfig::from_lookup(lookup(&[("MANDELVIEW_SCALE", "0")])).unwrap_err();
    assert_eq!(err, ConfigError::BadScale(0.0));
}

#[test]
fn infinite_scale_is_an_error() {
    let err = ExplorerConfig::from_lookup(lookup(&[("MANDELVIEW_SCALE", "inf")])).unwrap_err();
    assert!(matches!(err, ConfigError::BadScale(_)));
}

#[test]
fn nan_center_is_an_error() {
    let err = ExplorerConfig::from_lookup(lookup(&[("MANDELVIEW_CENTER_X", "NaN")])).unwrap_err();
    assert!(matches!(err, ConfigError::NotFinite { key: "MANDELVIEW_CENTER_X", .. }));
}

#[test]
fn error_message_names_key() {
    let err = ExplorerConfig::from_lookup(lookup(&[("MANDELVIEW_HEIGHT", "tall")])).unwrap_err();
    assert_eq!(err.to_string(), "MANDELVIEW_HEIGHT=\"tall\" is not a valid pixel count");
}

// =============================================================================
// env_parse
// =============================================================================

#[test]
fn env_parse_reads_process_environment() {
    unsafe { std::env::set_var("__MANDELVIEW_TEST_EP__", "99") };
    let val: usize = env_parse(&|k: &str| std::env::var(k).ok(), "__MANDELVIEW_TEST_EP__", "count", 0).unwrap();
    assert_eq!(val, 99);
    unsafe { std::env::remove_var("__MANDELVIEW_TEST_EP__") };
}
