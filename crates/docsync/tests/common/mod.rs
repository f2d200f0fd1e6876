#![allow(dead_code)]

use std::cell::RefCell;
use std::rc::Rc;

use docsync::memory::MemoryDocument;
use docsync::{Engine, Event, EventKind};
use serde_json::Value;
use tracing_subscriber::EnvFilter;

pub type Log<T> = Rc<RefCell<Vec<T>>>;

/// Route engine logs to the test harness; `RUST_LOG=docsync=trace` to see them.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

/// Collect the payload of every `changed` event.
pub fn record_changes(engine: &mut Engine<MemoryDocument>) -> Log<Value> {
    let log: Log<Value> = Rc::default();
    let sink = Rc::clone(&log);
    engine.on(EventKind::Changed, move |_, event| {
        if let Event::Changed(data) = event {
            sink.borrow_mut().push(data.clone());
        }
        Ok(())
    });
    log
}

/// Collect the `(path, value)` of every `path-changed` event.
pub fn record_path_changes(engine: &mut Engine<MemoryDocument>) -> Log<(String, Value)> {
    let log: Log<(String, Value)> = Rc::default();
    let sink = Rc::clone(&log);
    engine.on(EventKind::PathChanged, move |_, event| {
        if let Event::PathChanged { path, value } = event {
            sink.borrow_mut().push((path.clone(), value.clone()));
        }
        Ok(())
    });
    log
}
