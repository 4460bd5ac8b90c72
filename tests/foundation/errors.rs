//! Integration tests for error types
//!
//! Tests Error construction, kinds, and context display.

use tagmarsh_foundation::{Error, ErrorContext, ErrorKind, Phase};

#[test]
fn kinds_are_matchable() {
    assert!(matches!(
        Error::unsupported_value("function `f`").kind,
        ErrorKind::UnsupportedValue(_)
    ));
    assert!(matches!(
        Error::malformed_envelope("bad").kind,
        ErrorKind::MalformedEnvelope(_)
    ));
    assert_eq!(
        Error::stack_depth_exceeded(8).kind,
        ErrorKind::StackDepthExceeded { limit: 8 }
    );
}

#[test]
fn unregistered_names_the_type() {
    let err = Error::unregistered_type("Frobnicator");
    assert_eq!(err.to_string(), "unregistered type: Frobnicator");
}

#[test]
fn context_phase_only() {
    let err = Error::codec("eof").with_context(ErrorContext::new().with_phase(Phase::Codec));
    assert_eq!(err.to_string(), "codec error: eof (during codec)");
}

#[test]
fn context_path_only() {
    let err = Error::invalid_moment("yesterday")
        .with_context(ErrorContext::new().with_path("$.value"));
    assert_eq!(err.to_string(), "invalid moment: \"yesterday\" (at $.value)");
}

#[test]
fn errors_are_std_errors() {
    fn takes_std_error(_: &dyn std::error::Error) {}
    takes_std_error(&Error::duplicate_registration("Point"));
}
