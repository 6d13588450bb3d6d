#![no_main]
use std::cell::RefCell;
use std::fmt::Write;

use arbitrary::Arbitrary;
use libfuzzer_sys::{fuzz_mutator, fuzz_target, fuzzer_mutate};
use opline::{ParserOptions, QuoteEscape, StateEvent, StateParser, grammar, parse_request};
use rand::rngs::SmallRng;
use rand::{Rng, RngCore, SeedableRng};

const HEADER: usize = 1; // option flags

thread_local! {
    static RNG: RefCell<SmallRng> =
        RefCell::new(SmallRng::from_os_rng());
}

/// Fragments that steer the parser into every state.
static META: &[&str] = &[
    "/", "=", ":", "(", ")", ",", "\"", "\\", "[", "]", "{", "}", ">", ">>", " ", "\t",
    "\u{3000}",
];

fn with_rng<F, R>(f: F) -> R
where
    F: FnOnce(&mut SmallRng) -> R,
{
    RNG.with(|cell| f(&mut cell.borrow_mut()))
}

fn mutator(data: &mut [u8], size: usize, max_size: usize, seed: u32) -> usize {
    if size < HEADER || seed.is_multiple_of(10) {
        data[0] = with_rng(|rng| rng.next_u32() as u8 & 0x07);

        let line = loop {
            let len = with_rng(|rng| rng.random_range(size / 2..size * 2 + 1).min(max_size));
            let bytes: Vec<u8> = with_rng(|rng| (0..len).map(|_| rng.random::<u8>()).collect());
            if let Ok(request) = ArbitraryRequest::arbitrary(&mut arbitrary::Unstructured::new(&bytes))
            {
                break request.render();
            }
        };

        let mut written = HEADER;
        written += append(&mut data[written..max_size], line.as_bytes());
        if with_rng(|rng| rng.random_bool(0.3)) {
            let meta = with_rng(|rng| META[rng.random_range(0..META.len())]);
            written += append(&mut data[written..max_size], meta.as_bytes());
        }
        written
    } else {
        fuzzer_mutate(data, size, max_size)
    }
}

fn append(buf: &mut [u8], bytes: &[u8]) -> usize {
    let len = bytes.len().min(buf.len());
    buf[..len].copy_from_slice(&bytes[..len]);
    len
}

fuzz_mutator!(|data: &mut [u8], size: usize, max_size: usize, seed: u32| {
    mutator(data, size, max_size, seed)
});

/// A request-shaped line; parts are free text so that meta characters still
/// show up where the grammar does not expect them.
#[derive(Debug, Arbitrary)]
struct ArbitraryRequest {
    address: Vec<(String, Option<String>)>,
    operation: Option<String>,
    properties: Option<Vec<(String, Option<String>)>>,
    redirect: Option<(bool, String)>,
}

impl ArbitraryRequest {
    fn render(&self) -> String {
        let mut line = String::new();
        for (node_type, name) in &self.address {
            let _ = write!(line, "/{node_type}");
            if let Some(name) = name {
                let _ = write!(line, "={name}");
            }
        }
        if let Some(operation) = &self.operation {
            let _ = write!(line, ":{operation}");
        }
        if let Some(properties) = &self.properties {
            line.push('(');
            for (i, (name, value)) in properties.iter().enumerate() {
                if i > 0 {
                    line.push(',');
                }
                line.push_str(name);
                if let Some(value) = value {
                    let _ = write!(line, "={value}");
                }
            }
            line.push(')');
        }
        if let Some((append, target)) = &self.redirect {
            let op = if *append { ">>" } else { ">" };
            let _ = write!(line, " {op} {target}");
        }
        line
    }
}

fn parser(data: &[u8]) {
    if data.len() < HEADER {
        return;
    }

    let flags = data[0];
    let line = String::from_utf8_lossy(&data[HEADER..]).into_owned();

    let parser = StateParser::new(ParserOptions {
        quote_escape: if flags & 1 != 0 {
            QuoteEscape::Verbatim
        } else {
            QuoteEscape::Backslash
        },
        lenient_brackets: flags & 2 != 0,
        allow_unicode_whitespace: flags & 4 != 0,
        panic_on_error: false,
    });

    let mut events = Vec::<StateEvent>::new();
    let result = parser.parse(&line, &mut events, &grammar::INITIAL);
    let count = |pred: fn(&StateEvent) -> bool| events.iter().filter(|e| pred(e)).count();
    let entered = count(|e| matches!(e, StateEvent::Entered { .. }));
    let left = count(|e| matches!(e, StateEvent::Leaving { .. }));
    match result {
        Ok(()) => assert_eq!(entered, left, "unbalanced events for {line:?}"),
        Err(_) => assert!(entered >= left, "more leaves than enters for {line:?}"),
    }

    // Rendering an accepted request must give a line that parses to it again.
    if let Ok(request) = parse_request(&line) {
        let rendered = request.to_string();
        let again = parse_request(&rendered)
            .unwrap_or_else(|err| panic!("{line:?} rendered as {rendered:?}: {err}"));
        assert_eq!(request.absolute, again.absolute);
        assert_eq!(request.address, again.address);
        assert_eq!(request.operation, again.operation);
        assert_eq!(request.redirect, again.redirect);
    }
}

fuzz_target!(|data: &[u8]| parser(data));
