use super::*;

// =============================================================
// Classification
// =============================================================

#[test]
fn bad_request_with_field_errors_is_validation() {
    let body = r#"{"email": ["Enter a valid email address."], "password": ["This field is required.", "Too short."]}"#;
    let err = ApiError::from_response(400, body);

    let fields = err.field_errors().expect("field errors");
    assert_eq!(fields["password"], vec!["This field is required.", "Too short."]);
    assert_eq!(err.message(), "email: Enter a valid email address.");
    assert_eq!(err.error_code(), "E_VALIDATION");
}

#[test]
fn non_field_errors_become_the_message() {
    let err = ApiError::from_response(400, r#"{"non_field_errors": ["Invalid credentials"]}"#);
    assert_eq!(err.message(), "Invalid credentials");
    assert!(matches!(err, ApiError::Validation { .. }));
}

#[test]
fn detail_wins_over_fields() {
    let err = ApiError::from_response(401, r#"{"detail": "Invalid token."}"#);
    assert!(err.is_unauthorized());
    assert_eq!(err.message(), "Invalid token.");
    assert!(err.field_errors().is_none());
}

#[test]
fn forbidden_is_unauthorized() {
    let err = ApiError::from_response(403, "");
    assert!(matches!(err, ApiError::Unauthorized { status: 403, .. }));
    assert_eq!(err.message(), "You do not have permission to perform this action.");
}

#[test]
fn not_found_uses_default_message_for_html_body() {
    let err = ApiError::from_response(404, "<html>Not Found</html>");
    assert!(matches!(err, ApiError::NotFound { .. }));
    assert_eq!(err.message(), "The requested resource was not found.");
}

#[test]
fn server_error_is_unexpected_with_status() {
    let err = ApiError::from_response(502, "");
    assert!(matches!(err, ApiError::Unexpected { status: Some(502), .. }));
    assert!(err.message().contains("502"));
    assert_eq!(err.error_code(), "E_UNEXPECTED");
}

#[test]
fn message_key_is_not_a_field() {
    let err = ApiError::from_response(400, r#"{"message": "Bad input", "title": "Required"}"#);
    assert_eq!(err.message(), "Bad input");
    let fields = err.field_errors().unwrap();
    assert!(!fields.contains_key("message"));
    assert_eq!(fields["title"], vec!["Required"]);
}

#[test]
fn nested_non_string_values_are_not_field_errors() {
    let err = ApiError::from_response(400, r#"{"image": {"size": ["too big"]}, "count": 3}"#);
    assert!(err.field_errors().is_none());
    assert_eq!(err.message(), "The request was invalid.");
}

// =============================================================
// Other variants
// =============================================================

#[test]
fn unexpected_shape_mentions_cause() {
    let err = ApiError::unexpected_shape("missing field `user`");
    assert!(err.message().contains("missing field `user`"));
    assert!(matches!(err, ApiError::Unexpected { status: None, .. }));
}

#[test]
fn session_error_code() {
    let io = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "read-only");
    let err = ApiError::from(SessionError::from(io));
    assert_eq!(err.error_code(), "E_SESSION");
    assert!(err.message().contains("read-only"));
}
