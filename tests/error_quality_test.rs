//! Error message quality tests
//!
//! Tests that verify error messages are helpful and distinguishable.

use tomcat_exporter::error::ExporterError;

#[test]
fn test_http_status_error_message_clarity() {
    // Given: A non-success response from the status page
    let error = ExporterError::HttpStatus {
        url: "http://localhost:8080/manager/status/all?XML=true".to_string(),
        status: 401,
    };

    // When: Converting to string
    let message = format!("{}", error);

    // Then: Message should name the URL and the status
    assert!(message.starts_with("Transport error"));
    assert!(message.contains("/manager/status/all"));
    assert!(message.contains("401"));
    assert!(error.is_transport());
}

#[test]
fn test_decode_error_message_clarity() {
    let error = ExporterError::Decode("unexpected end of input".to_string());

    let message = format!("{}", error);

    assert!(message.starts_with("Decode error"));
    assert!(message.contains("unexpected end of input"));
    assert!(!error.is_transport());
}

#[test]
fn test_shape_mismatch_message_clarity() {
    let error = ExporterError::ShapeMismatch("<memory> is missing the free attribute".to_string());

    let message = format!("{}", error);

    assert!(message.starts_with("Shape mismatch"));
    assert!(message.contains("free"));
}

#[test]
fn test_jolokia_error_message_clarity() {
    // Given: An error reported inside a Jolokia body
    let error = ExporterError::Jolokia {
        status: 404,
        message: "javax.management.InstanceNotFoundException".to_string(),
    };

    // When: Converting to string
    let message = format!("{}", error);

    // Then: Message should carry the embedded status and text
    assert!(message.contains("Jolokia error"));
    assert!(message.contains("404"));
    assert!(message.contains("InstanceNotFoundException"));
}

#[test]
fn test_json_syntax_error_converts_to_decode() {
    // Given: A JSON parsing error
    let json_err = serde_json::from_str::<serde_json::Value>("invalid json").unwrap_err();

    // When: Converting into an exporter error
    let error = ExporterError::from(json_err);

    // Then: It is classified as a decode failure
    assert!(matches!(error, ExporterError::Decode(_)));
}

#[test]
fn test_json_data_error_converts_to_shape_mismatch() {
    let json_err = serde_json::from_str::<u32>("\"not a number\"").unwrap_err();

    let error = ExporterError::from(json_err);

    assert!(matches!(error, ExporterError::ShapeMismatch(_)));
}

#[test]
fn test_server_error_message_clarity() {
    // Given: A server error
    let error = ExporterError::Server("Failed to bind to port".to_string());

    // When: Converting to string
    let message = format!("{}", error);

    // Then: Message should clearly indicate server issue
    assert!(message.contains("HTTP server error"));
    assert!(message.contains("Failed to bind"));
}

#[test]
fn test_error_messages_are_distinguishable() {
    // Given: Different error types
    let decode_err = format!("{}", ExporterError::Decode("test".to_string()));
    let shape_err = format!("{}", ExporterError::ShapeMismatch("test".to_string()));
    let config_err = format!("{}", ExporterError::Config("test".to_string()));
    let server_err = format!("{}", ExporterError::Server("test".to_string()));

    // Then: Each should have a unique prefix
    assert!(decode_err.starts_with("Decode error"));
    assert!(shape_err.starts_with("Shape mismatch"));
    assert!(config_err.starts_with("Configuration error"));
    assert!(server_err.starts_with("HTTP server error"));

    // All should be different
    assert_ne!(decode_err, shape_err);
    assert_ne!(shape_err, config_err);
    assert_ne!(config_err, server_err);
}

#[test]
fn test_error_debug_format() {
    // Given: An error instance
    let error = ExporterError::ShapeMismatch("missing threadInfo".to_string());

    // When: Using debug format
    let debug_message = format!("{:?}", error);

    // Then: Should include variant name and details
    assert!(debug_message.contains("ShapeMismatch"));
    assert!(debug_message.contains("missing threadInfo"));
}
