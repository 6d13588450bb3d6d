#![expect(missing_docs)]

use opline::{
    AddressStep, ErrorKind, NoopCallbackHandler, ParsedRequest, RedirectMode, StateParser, grammar,
    parse_request,
};
use quickcheck_macros::quickcheck;
use rstest::rstest;

fn properties(request: &ParsedRequest) -> Vec<(&str, Option<&str>)> {
    request
        .properties
        .iter()
        .flatten()
        .map(|p| (p.name.as_str(), p.value.as_deref()))
        .collect()
}

#[rstest]
#[case(
    "/core-service=management/management-interface=http-interface:read-attribute(name=security-realm)",
    2,
    "read-attribute",
    &[("name", Some("security-realm"))]
)]
#[case(
    "/socket-binding-group=standard-sockets/remote-destination-outbound-socket-binding=proxy1:add(host=localhost,port=8590)",
    2,
    "add",
    &[("host", Some("localhost")), ("port", Some("8590"))]
)]
#[case(
    "/subsystem=elytron/configurable-sasl-server-factory=f:write-attribute(name=filters, value=[{pattern-filter=x}])",
    2,
    "write-attribute",
    &[("name", Some("filters")), ("value", Some("[{pattern-filter=x}]"))]
)]
#[case(
    "/subsystem=elytron/properties-realm=r:add(users-properties={path=u.properties},groups-properties={path=g.properties})",
    2,
    "add",
    &[
        ("users-properties", Some("{path=u.properties}")),
        ("groups-properties", Some("{path=g.properties}")),
    ]
)]
#[case(
    "/core-service=management/security-realm=r/authentication=ldap/cache=by-search-time:flush-cache()",
    4,
    "flush-cache",
    &[]
)]
#[case(
    "/core-service=management/security-realm=r/authentication=ldap/cache=by-search-time:read-resource(include-runtime=true, recursive)",
    4,
    "read-resource",
    &[("include-runtime", Some("true")), ("recursive", None)]
)]
fn management_requests(
    #[case] line: &str,
    #[case] segments: usize,
    #[case] operation: &str,
    #[case] expected: &[(&str, Option<&str>)],
) {
    let request = parse_request(line).unwrap();

    assert_eq!(request.address.len(), segments);
    assert_eq!(request.operation.as_deref(), Some(operation));
    assert_eq!(properties(&request), expected);
    assert_eq!(request.redirect, None);
}

#[test]
fn address_only_requests() {
    let request =
        parse_request("/subsystem=datasources/data-source=\"java:/H2DS\"/connection-properties")
            .unwrap();
    let address: Vec<(&str, Option<&str>)> = request
        .address
        .iter()
        .filter_map(AddressStep::segment)
        .map(|s| (s.node_type.as_str(), s.name.as_deref()))
        .collect();

    assert_eq!(
        address,
        [
            ("subsystem", Some("datasources")),
            ("data-source", Some("java:/H2DS")),
            ("connection-properties", None),
        ]
    );
    assert_eq!(request.operation, None);
}

#[test]
fn redirected_output() {
    let request = parse_request(":read-resource(recursive=true) >> /tmp/dump.txt").unwrap();
    let redirect = request.redirect.unwrap();

    assert_eq!(redirect.mode, RedirectMode::Append);
    assert_eq!(redirect.target, "/tmp/dump.txt");
}

#[test]
fn errors_point_at_the_opening_character() {
    let line = "/subsystem=logging:write-attribute(name=level,value=\"INFO)";
    let err = parse_request(line).unwrap_err();

    assert_eq!(err.kind, ErrorKind::UnterminatedQuote);
    assert_eq!(&line[err.offset..], "\"INFO)");
}

#[test]
fn rendered_request_parses_back() {
    let line = "/a=\"x,y\":op(v=[1,2], w=\"say \\\"hi\\\"\") > out";
    let request = parse_request(line).unwrap();
    let rendered = request.to_string();

    insta::assert_snapshot!(rendered, @r#"/a="x,y":op(v="[1,2]",w="say \"hi\"") > out"#);
    assert_eq!(parse_request(&rendered).unwrap().address, request.address);
}

/// A sink that ignores everything accepts exactly the lines the collector
/// accepts.
#[quickcheck]
#[allow(clippy::needless_pass_by_value)]
fn validation_agrees_with_collection(line: String) -> bool {
    let validated = StateParser::default()
        .parse(&line, &mut NoopCallbackHandler, &grammar::INITIAL)
        .map_err(|e| e.kind);
    let collected = parse_request(&line).map(|_| ()).map_err(|e| e.kind);
    validated == collected
}
