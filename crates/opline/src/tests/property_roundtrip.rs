use alloc::string::{String, ToString};

use quickcheck::{QuickCheck, TestResult};

use super::arbitrary::{RequestLine, ShapedLine};
use crate::{ParsedRequest, ParserOptions, parse_request, tests::utils::events_with};

/// The request without separator offsets, which move when the line is
/// re-serialized.
fn shape(request: &ParsedRequest) -> ParsedRequest {
    let mut shape = request.clone();
    for property in shape.properties.iter_mut().flatten() {
        property.value_separator = None;
    }
    shape
}

fn roundtrip(line: &str) -> TestResult {
    let Ok(first) = parse_request(line) else {
        return TestResult::discard();
    };
    let rendered = first.to_string();
    let second = match parse_request(&rendered) {
        Ok(second) => second,
        Err(err) => return TestResult::error(alloc::format!("{rendered:?}: {err}")),
    };
    if shape(&first) != shape(&second) {
        return TestResult::error(alloc::format!("{line:?} -> {rendered:?}"));
    }

    // Re-serializing is idempotent, so the event stream is too.
    let again: String = second.to_string();
    let events = events_with(&rendered, ParserOptions::default()).ok();
    let events_again = events_with(&again, ParserOptions::default()).ok();
    TestResult::from_bool(again == rendered && events == events_again)
}

/// Property: rendering an accepted line and parsing it again yields the same
/// request.
#[test]
fn roundtrip_random_lines_quickcheck() {
    #[allow(clippy::needless_pass_by_value)]
    fn prop(line: RequestLine) -> TestResult {
        roundtrip(&line.0)
    }

    #[cfg(not(miri))]
    let tests = if is_ci::cached() { 10_000 } else { 1_000 };
    #[cfg(miri)]
    let tests = 10;

    QuickCheck::new()
        .tests(tests)
        .max_tests(tests * 20)
        .quickcheck(prop as fn(RequestLine) -> TestResult);
}

#[test]
fn roundtrip_shaped_lines_quickcheck() {
    #[allow(clippy::needless_pass_by_value)]
    fn prop(line: ShapedLine) -> TestResult {
        roundtrip(&line.0)
    }

    QuickCheck::new()
        .tests(1_000)
        .max_tests(20_000)
        .quickcheck(prop as fn(ShapedLine) -> TestResult);
}

#[test]
fn roundtrip_known_lines() {
    for line in [
        "/subsystem=logging/console-handler=CONSOLE:write-attribute(name=level,value=INFO) > out.log",
        "/a=\"x y\":op(k=\"1,2\",j=[3],e=,b) >> out",
        "(a=\\))",
        "=",
        "> >",
        ":op( a b = \" c \" )",
    ] {
        let first = parse_request(line).unwrap();
        let second = parse_request(&first.to_string()).unwrap();
        assert_eq!(shape(&first), shape(&second), "{line:?}");
        assert!(!roundtrip(line).is_failure(), "{line:?}");
    }
    assert_eq!(parse_request("(a=\\))").unwrap().to_string(), "(a=\")\")");
}
