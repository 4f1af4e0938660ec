use miette::Diagnostic;
use minilock_common::Granularity;
use minilock_parser::{ParseErrorKind, parse_schedule};
use minilock_transaction::{Operation, OperationKind};

#[test]
fn test_parse_long_schedule() {
    let ops = parse_schedule(
        "r4(v)r3(y)r1(y)r1(x)w2(u)r2(x)w1(y)r2(y)c1w4(u)r3(x)c4w2(x)c2w3(u)w3(z)c3",
    )
    .unwrap();
    assert_eq!(ops.len(), 17);
    assert_eq!(ops[8], Operation::commit(1));
    assert_eq!(ops[9], Operation::write(4, "u"));
    let txns: Vec<_> = ops.iter().map(Operation::txn).collect();
    assert_eq!(txns, [4, 3, 1, 1, 2, 2, 1, 2, 1, 4, 3, 4, 2, 2, 3, 3, 3]);
}

#[test]
fn test_round_trip_display() {
    let input = "r1(x) r2(y updl) r3(z updl pagl) w4(u tabl) w5(v arel) c1";
    let ops = parse_schedule(input).unwrap();
    let printed: Vec<_> = ops.iter().map(ToString::to_string).collect();
    assert_eq!(printed.join(" "), input);
    assert_eq!(ops[3].granularity(), Granularity::Table);
    assert!(matches!(
        ops[2].kind(),
        OperationKind::Read {
            is_update: true,
            ..
        }
    ));
}

#[test]
fn test_whole_schedule_rejected() {
    let err = parse_schedule("r1(x) w2(y").unwrap_err();
    assert_eq!(err.kind(), &ParseErrorKind::UnexpectedEof("\")\""));
    assert_eq!(err.span(), &(10..10));
    assert_eq!(err.position(), (1, 11));
}

#[test]
fn test_invalid_token_diagnostic() {
    let err = parse_schedule("r1(x) r2(y%)").unwrap_err();
    assert_eq!(err.kind(), &ParseErrorKind::InvalidToken("%".into()));
    assert_eq!(
        err.to_string(),
        "syntax error at or near line 1, column 11: invalid token \"%\""
    );
    assert!(err.source_code().is_some());
    let labels: Vec<_> = err.labels().unwrap().collect();
    assert_eq!(labels.len(), 1);
    assert_eq!(labels[0].offset(), 10);
    assert_eq!(labels[0].len(), 1);
    assert_eq!(labels[0].label(), Some("here"));
}

#[test]
fn test_unexpected_token() {
    let err = parse_schedule("x1(y)").unwrap_err();
    assert_eq!(err.kind(), &ParseErrorKind::Unexpected {
        expected: "an operation",
        found: "x".into()
    });
    let err = parse_schedule("r(y)").unwrap_err();
    assert_eq!(err.kind(), &ParseErrorKind::Unexpected {
        expected: "a transaction id",
        found: "(".into()
    });
    let err = parse_schedule("c184467440737095516150").unwrap_err();
    assert!(matches!(err.kind(), ParseErrorKind::NumberOutOfRange(_)));
}
