use chrono::Utc;

use fleet_maintenance::logic::{authorize, AuthError};
use fleet_maintenance::models::Settings;

fn settings_with_code(code: &str) -> Settings {
    Settings {
        pending_before_hours: 20,
        pending_after_hours: 15,
        master_admin_code: code.into(),
        updated_at: Utc::now(),
    }
}

#[test]
fn correct_code_authorizes() {
    assert_eq!(authorize("1234", &settings_with_code("1234")), Ok(()));
}

#[test]
fn empty_submission_is_invalid_when_code_is_configured() {
    assert_eq!(
        authorize("", &settings_with_code("1234")),
        Err(AuthError::InvalidCode)
    );
}

#[test]
fn wrong_code_is_invalid() {
    assert_eq!(
        authorize("4321", &settings_with_code("1234")),
        Err(AuthError::InvalidCode)
    );
}

#[test]
fn comparison_is_case_sensitive() {
    assert_eq!(
        authorize("abcd", &settings_with_code("ABCD")),
        Err(AuthError::InvalidCode)
    );
}

#[test]
fn unconfigured_code_refuses_even_a_matching_submission() {
    assert_eq!(
        authorize("1234", &settings_with_code("")),
        Err(AuthError::NotConfigured)
    );
    assert_eq!(
        authorize("", &settings_with_code("")),
        Err(AuthError::NotConfigured)
    );
}
