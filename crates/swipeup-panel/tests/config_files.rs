//! Loading panel configuration from TOML and JSON files.

use std::io::Write;
use std::time::Duration;

use swipeup_core::animation::{CommitMotion, Easing};
use swipeup_panel::{ConfigError, PanelConfig};

#[test]
fn toml_file_overrides_selected_fields() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(
        file,
        r#"
collapsed_height = 72.0
close_threshold_divisor = 5.0
velocity_window_ms = 80

[motion]
kind = "spring"
stiffness = 220.0
damping = 24.0
"#
    )
    .unwrap();

    let config = PanelConfig::from_toml_file(file.path()).unwrap();
    assert_eq!(config.collapsed_height, 72.0);
    assert_eq!(config.close_threshold_divisor, 5.0);
    assert_eq!(config.velocity_window, Duration::from_millis(80));
    assert_eq!(
        config.motion,
        CommitMotion::Spring {
            stiffness: 220.0,
            damping: 24.0
        }
    );
    assert_eq!(config.open_threshold_divisor, 10.0);
}

#[test]
fn json_tween_motion_with_easing() {
    let config = PanelConfig::from_json_str(
        r#"{"motion": {"kind": "tween", "duration_ms": 320, "easing": {"kind": "ease_out"}}}"#,
    )
    .unwrap();
    assert_eq!(
        config.motion,
        CommitMotion::Tween {
            duration: Duration::from_millis(320),
            easing: Easing::EaseOut
        }
    );
}

#[test]
fn toml_round_trips_defaults() {
    let text = PanelConfig::default().to_toml_string().unwrap();
    assert_eq!(PanelConfig::from_toml_str(&text).unwrap(), PanelConfig::default());
}

#[test]
fn missing_file_is_io_error() {
    let err = PanelConfig::from_toml_file("/definitely/not/here.toml").unwrap_err();
    assert!(matches!(err, ConfigError::Io(_)));
}

#[test]
fn malformed_inputs_report_parser() {
    assert!(matches!(
        PanelConfig::from_toml_str("collapsed_height = \"tall\""),
        Err(ConfigError::Toml(_))
    ));
    assert!(matches!(
        PanelConfig::from_json_str("{"),
        Err(ConfigError::Json(_))
    ));
}

#[test]
fn out_of_range_values_fail_validation() {
    let err = PanelConfig::from_toml_str("content_opacity_floor = 2.0\nclaim_ratio = 0.0\n")
        .unwrap_err();
    match err {
        ConfigError::Validation(errors) => assert_eq!(errors.len(), 2),
        other => panic!("unexpected error {other}"),
    }
}
