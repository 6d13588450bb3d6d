//! Parses one request line and prints what the parser reports.
//!
//! ```bash
//! RUST_LOG=opline=trace cargo run -p opline --example parse_line -- \
//!     '/subsystem=logging/console-handler=CONSOLE:write-attribute(name=level,value=INFO) > out.log'
//! ```
//!
//! Without an argument a built-in line is used.

use opline::{
    ParsingStateCallbackHandler, Rejection, RequestCollector, StateEvent, StateId, StateParser,
    grammar,
};

const DEFAULT_LINE: &str =
    "/subsystem=elytron/filesystem-realm=fs:add(path=users, relative-to=jboss.server.config.dir) >> realm.log";

/// Records the events and builds the request in one pass.
#[derive(Default)]
struct Tee {
    events: Vec<StateEvent>,
    collector: RequestCollector,
}

impl ParsingStateCallbackHandler for Tee {
    fn entered_state(&mut self, state: StateId, offset: usize) -> Result<(), Rejection> {
        self.events.entered_state(state, offset)?;
        self.collector.entered_state(state, offset)
    }

    fn character(&mut self, state: StateId, ch: char, offset: usize) -> Result<(), Rejection> {
        self.events.character(state, ch, offset)?;
        self.collector.character(state, ch, offset)
    }

    fn leaving_state(
        &mut self,
        state: StateId,
        offset: usize,
        closing: Option<char>,
    ) -> Result<(), Rejection> {
        self.events.leaving_state(state, offset, closing)?;
        self.collector.leaving_state(state, offset, closing)
    }
}

fn main() {
    env_logger::init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let line = if args.is_empty() {
        DEFAULT_LINE.to_string()
    } else {
        args.join(" ")
    };

    let mut tee = Tee::default();
    let result = StateParser::default().parse(&line, &mut tee, &grammar::INITIAL);

    for event in &tee.events {
        println!("{event}");
    }
    println!();

    match result {
        Ok(()) => {
            let request = tee.collector.into_request();
            println!("{request:#?}");
            println!("{request}");
        }
        Err(err) => {
            let column = line[..err.offset].chars().count();
            eprintln!("{line}");
            eprintln!("{}^ {err}", " ".repeat(column));
            if let Some(separator) = tee.collector.last_separator() {
                eprintln!("line ends on {separator:?}");
            }
            std::process::exit(1);
        }
    }
}
