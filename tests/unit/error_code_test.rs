//! Tests for the error taxonomy

use reinvoke_scheduler::core::{name_of, ErrorClass, ErrorCode};

#[test]
fn test_parse_is_case_insensitive() {
    assert_eq!(ErrorCode::parse("throttling"), ErrorCode::Throttling);
    assert_eq!(ErrorCode::parse("THROTTLING"), ErrorCode::Throttling);
    assert_eq!(ErrorCode::parse("Throttling"), ErrorCode::Throttling);
    assert_eq!(ErrorCode::parse("notfound"), ErrorCode::NotFound);
}

#[test]
fn test_parse_unmatched_is_unknown() {
    assert_eq!(ErrorCode::parse("not-a-code"), ErrorCode::Unknown);
    assert_eq!(ErrorCode::parse(""), ErrorCode::Unknown);
    assert_eq!(ErrorCode::parse(" Throttling"), ErrorCode::Unknown);
    assert_eq!("whatever".parse::<ErrorCode>(), Ok(ErrorCode::Unknown));
}

#[test]
fn test_names_round_trip_through_parse() {
    for code in ErrorCode::ALL {
        assert_eq!(ErrorCode::parse(code.name()), code);
        assert_eq!(code.to_string(), code.name());
    }
}

#[test]
fn test_name_of_out_of_range() {
    assert_eq!(name_of(0), "Unknown");
    assert_eq!(name_of(8), "Throttling");
    assert_eq!(name_of(14), "InternalFailure");
    assert_eq!(name_of(15), "Unknown");
    assert_eq!(name_of(-1), "Unknown");
    assert_eq!(ErrorCode::Unknown.name(), "Unknown");
}

#[test]
fn test_classification_table() {
    let retriable = [
        ErrorCode::ResourceConflict,
        ErrorCode::Throttling,
        ErrorCode::NotStabilized,
        ErrorCode::ServiceInternalError,
        ErrorCode::NetworkFailure,
    ];
    for code in ErrorCode::ALL {
        let expected = if retriable.contains(&code) {
            ErrorClass::Retriable
        } else {
            ErrorClass::Terminal
        };
        assert_eq!(code.class(), expected, "{code}");
        assert_eq!(code.is_retriable(), !code.is_terminal());
    }
    assert!(ErrorCode::Unknown.is_terminal());
}

#[test]
fn test_serializes_as_canonical_name() {
    let json = serde_json::to_string(&ErrorCode::AlreadyExists).unwrap();
    assert_eq!(json, "\"AlreadyExists\"");
    let parsed: ErrorCode = serde_json::from_str("\"networkfailure\"").unwrap();
    assert_eq!(parsed, ErrorCode::NetworkFailure);
    let unknown: ErrorCode = serde_json::from_str("\"Bogus\"").unwrap();
    assert_eq!(unknown, ErrorCode::Unknown);
}
