#![expect(missing_docs)]

use core::fmt::Write;

use insta::assert_snapshot;
use opline::{StateEvent, StateId, grammar};

/// Renders the event stream with consecutive characters of one state joined.
fn render(line: &str) -> String {
    let mut events = Vec::new();
    opline::parse(line, &mut events, &grammar::INITIAL).expect("line parses");

    let mut out = String::new();
    let mut run: Option<(StateId, String, usize)> = None;
    let flush = |out: &mut String, run: &mut Option<(StateId, String, usize)>| {
        if let Some((state, text, offset)) = run.take() {
            writeln!(out, "{state} {text:?}@{offset}").unwrap();
        }
    };
    for event in events {
        match event {
            StateEvent::Character { state, ch, offset } => {
                let same_state = matches!(&run, Some((current, _, _)) if *current == state);
                if same_state {
                    if let Some((_, text, _)) = &mut run {
                        text.push(ch);
                    }
                } else {
                    flush(&mut out, &mut run);
                    run = Some((state, ch.to_string(), offset));
                }
            }
            other => {
                flush(&mut out, &mut run);
                writeln!(out, "{other}").unwrap();
            }
        }
    }
    flush(&mut out, &mut run);
    out
}

#[test]
fn snapshot_full_request() {
    assert_snapshot!(
        render(
            "/subsystem=elytron/filesystem-realm=fs:add(path=users,relative-to=jboss.server.config.dir) >> realm.log"
        ),
        @r#"
    INITIAL "/"@0
    +NODE@0
    NODE "subsystem"@1
    +NODE_NAME@10
    NODE_NAME "elytron"@11
    -NODE_NAME@18 '/'
    -NODE@18 '/'
    +NODE@18
    NODE "filesystem-realm"@19
    +NODE_NAME@35
    NODE_NAME "fs"@36
    -NODE_NAME@38 ':'
    -NODE@38 ':'
    +OP_NAME@38
    OP_NAME "add"@39
    -OP_NAME@42 '('
    +PROP_LIST@42
    +PROPERTY@43
    PROPERTY "path"@43
    +PROP_VALUE@47
    PROP_VALUE "users"@48
    -PROP_VALUE@53 ','
    -PROPERTY@53 ','
    +PROPERTY@53
    PROPERTY "relative-to"@54
    +PROP_VALUE@65
    PROP_VALUE "jboss.server.config.dir"@66
    -PROP_VALUE@89 ')'
    -PROPERTY@89 ')'
    -PROP_LIST@89 ')'
    +REQUEST_END@89
    -REQUEST_END@91 '>'
    +OUT_REDIRECT@91
    OUT_REDIRECT ">"@92
    +OUT_TARGET@93
    OUT_TARGET "realm.log"@94
    -OUT_TARGET@103 eoc
    -OUT_REDIRECT@103 eoc
    "#
    );
}

#[test]
fn snapshot_literals_in_values() {
    assert_snapshot!(
        render(r#"(a={x=[1]},b="q,\")")"#),
        @r#"
    +PROP_LIST@0
    +PROPERTY@1
    PROPERTY "a"@1
    +PROP_VALUE@2
    +BRACES@3
    BRACES "{x=[1]}"@3
    -BRACES@9 '}'
    -PROP_VALUE@10 ','
    -PROPERTY@10 ','
    +PROPERTY@10
    PROPERTY "b"@11
    +PROP_VALUE@12
    +QUOTES@13
    QUOTES "q,"@14
    +ESCAPE@16
    ESCAPE "\""@17
    -ESCAPE@17 '"'
    QUOTES ")"@18
    -QUOTES@19 '"'
    -PROP_VALUE@20 ')'
    -PROPERTY@20 ')'
    -PROP_LIST@20 ')'
    +REQUEST_END@20
    -REQUEST_END@21 eoc
    "#
    );
}
