//! The engine instance tying the collaborators together.
//!
//! Built-in collaborators are ordinary bus listeners registered before any
//! extension:
//!
//! - `write` runs the document writer over every leaf of the data object.
//! - `read` runs the document reader and emits one `path-changed` per node.
//! - `path-changed` feeds the change aggregator. A value the data object
//!   cannot hold is recorded against its node and the pass goes on.
//! - `send-changes` emits `changed` when the aggregator is dirty.

use std::fmt;

use serde_json::Value;

use crate::aggregator::ChangeAggregator;
use crate::binding::{Binding, BINDING_ATTRIBUTE};
use crate::error::{BindingError, BindingIssue, Error};
use crate::events::{Event, EventBus, EventKind, SubscriptionId};
use crate::facet::FacetTable;
use crate::host::Host;
use crate::{reader, writer};

/// Node event names observed for inbound edits by default.
pub const DEFAULT_EVENTS: [&str; 5] = ["checked", "selected", "input", "change", "read"];

/// Node event name that requests a pull, whatever its target.
pub const READ_TRIGGER: &str = "read";

/// Collaborator registration run once at construction.
pub type Extension<H> = Box<dyn FnOnce(&mut Engine<H>) -> Result<(), Error>>;

pub struct Options<H: Host> {
    /// Node event names treated as edits of a bound node.
    pub events: Vec<String>,
    /// Run in order after the built-in collaborators, before `init`.
    pub extensions: Vec<Extension<H>>,
}

impl<H: Host> Default for Options<H> {
    fn default() -> Self {
        Self {
            events: DEFAULT_EVENTS.iter().map(|e| e.to_string()).collect(),
            extensions: Vec::new(),
        }
    }
}

impl<H: Host> fmt::Debug for Options<H> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Options")
            .field("events", &self.events)
            .field("extensions", &self.extensions.len())
            .finish()
    }
}

impl<H: Host> Options<H> {
    pub fn with_events<I, S>(mut self, events: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.events = events.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_extension(
        mut self,
        extension: impl FnOnce(&mut Engine<H>) -> Result<(), Error> + 'static,
    ) -> Self {
        self.extensions.push(Box::new(extension));
        self
    }
}

/// Keeps one data object and the bound nodes of one host document in sync.
pub struct Engine<H: Host> {
    host: H,
    data: Value,
    events: Vec<String>,
    bus: EventBus<Engine<H>>,
    facets: FacetTable<H>,
    aggregator: ChangeAggregator,
    issues: Vec<BindingIssue<H::Node>>,
}

impl<H: Host> fmt::Debug for Engine<H> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Engine")
            .field("data", &self.data)
            .field("events", &self.events)
            .field("bus", &self.bus)
            .field("aggregator", &self.aggregator)
            .field("issues", &self.issues)
            .finish()
    }
}

impl<H: Host + 'static> Engine<H> {
    /// Build an engine, run the extensions, emit `init`, then push `data`
    /// to the document.
    pub fn new(host: H, data: Value, options: Options<H>) -> Result<Self, Error> {
        let Options { events, extensions } = options;
        let mut engine = Self {
            host,
            data,
            events,
            bus: EventBus::default(),
            facets: FacetTable::default(),
            aggregator: ChangeAggregator::new(),
            issues: Vec::new(),
        };
        engine.register_collaborators();
        for extension in extensions {
            extension(&mut engine)?;
        }
        engine.emit(&Event::Init)?;
        engine.emit(&Event::Write)?;
        tracing::debug!(listeners = engine.bus.len(), "engine initialized");
        Ok(engine)
    }

    fn register_collaborators(&mut self) {
        self.bus.subscribe(EventKind::Write, |engine, _| {
            engine.write_all();
            Ok(())
        });
        self.bus
            .subscribe(EventKind::Read, |engine, _| engine.read_from_document());
        self.bus.subscribe(EventKind::PathChanged, |engine, event| {
            if let Event::PathChanged { path, value } = event {
                engine.aggregator.add_change(&mut engine.data, path, value)?;
            }
            Ok(())
        });
        self.bus
            .subscribe(EventKind::SendChanges, |engine, _| engine.send_changes());
    }

    /// Deliver `event` to its listeners, synchronously and in order.
    ///
    /// Stops at the first listener error.
    pub fn emit(&mut self, event: &Event) -> Result<(), Error> {
        tracing::trace!(event = %event.kind(), "emit");
        for (id, handler) in self.bus.listeners(event.kind()) {
            if self.bus.is_subscribed(id) {
                handler(self, event)?;
            }
        }
        Ok(())
    }

    pub fn on(
        &mut self,
        kind: EventKind,
        handler: impl Fn(&mut Engine<H>, &Event) -> Result<(), Error> + 'static,
    ) -> SubscriptionId {
        self.bus.subscribe(kind, handler)
    }

    pub fn off(&mut self, id: SubscriptionId) -> bool {
        self.bus.unsubscribe(id)
    }

    /// Push the data object (optionally replaced first) to every bound node.
    pub fn push_to_document(&mut self, replacement: Option<Value>) -> Result<(), Error> {
        if let Some(data) = replacement {
            self.data = data;
        }
        self.emit(&Event::Write)?;
        self.emit(&Event::SendChanges)
    }

    /// Pull every bound node into the data object and return it.
    pub fn pull_from_document(&mut self) -> Result<&Value, Error> {
        self.emit(&Event::Read)?;
        self.emit(&Event::SendChanges)?;
        Ok(&self.data)
    }

    /// React to a node event reported by the host.
    ///
    /// [`READ_TRIGGER`] pulls the whole document first. An observed event on
    /// a bound node is then an edit of that node. Anything else is ignored.
    pub fn handle_node_event(
        &mut self,
        name: &str,
        target: Option<&H::Node>,
    ) -> Result<(), Error> {
        let edited = target
            .filter(|_| self.observes(name))
            .filter(|node| self.host.attribute(node, BINDING_ATTRIBUTE).is_some());
        if name == READ_TRIGGER {
            self.emit(&Event::Read)?;
            self.emit(&Event::SendChanges)?;
        }
        match edited {
            Some(node) => self.node_edited(node),
            None => {
                if name != READ_TRIGGER {
                    tracing::trace!(event = name, "ignored node event");
                }
                Ok(())
            }
        }
    }

    /// Propagate the current value of `node` to its siblings and the data
    /// object.
    fn node_edited(&mut self, node: &H::Node) -> Result<(), Error> {
        let binding = match Binding::resolve(&self.host, node) {
            Ok(binding) => binding,
            Err(error) => {
                self.issues.push(BindingIssue::record(node.clone(), error));
                return Ok(());
            }
        };
        let value = self.facets.read(&self.host, node, &binding.facet);
        tracing::debug!(?node, path = %binding.path, "node edited");
        self.write_to_document(&value, &binding.path, Some(node));
        self.apply_node_value(node.clone(), binding.path, value)?;
        self.emit(&Event::SendChanges)
    }

    /// Emit `path-changed` for a value read from `node`.
    ///
    /// A conflict with the data object becomes an issue for that node rather
    /// than an error.
    fn apply_node_value(&mut self, node: H::Node, path: String, value: Value) -> Result<(), Error> {
        match self.emit(&Event::PathChanged { path, value }) {
            Err(Error::Binding(error @ BindingError::Conflict { .. })) => {
                self.issues.push(BindingIssue::record(node, error));
                Ok(())
            }
            result => result,
        }
    }

    /// Write `value` to every node bound to `path` except `origin`.
    pub fn write_to_document(
        &mut self,
        value: &Value,
        path: &str,
        origin: Option<&H::Node>,
    ) -> usize {
        writer::write_to_document(
            &mut self.host,
            &self.facets,
            value,
            path,
            origin,
            &mut self.issues,
        )
    }

    /// Read every bound node and emit one `path-changed` per node.
    ///
    /// Nodes whose value conflicts with the data object are skipped and
    /// recorded; the rest of the pass still applies.
    pub fn read_from_document(&mut self) -> Result<(), Error> {
        let changes = reader::read_from_document(&self.host, &self.facets, &mut self.issues);
        for (node, path, value) in changes {
            self.apply_node_value(node, path, value)?;
        }
        Ok(())
    }

    fn write_all(&mut self) -> usize {
        writer::write_all(&mut self.host, &self.facets, &self.data, &mut self.issues)
    }

    fn send_changes(&mut self) -> Result<(), Error> {
        if !self.aggregator.take_changes() {
            return Ok(());
        }
        tracing::debug!("data changed");
        let snapshot = self.data.clone();
        self.emit(&Event::Changed(snapshot))
    }
}

impl<H: Host> Engine<H> {
    pub fn data(&self) -> &Value {
        &self.data
    }

    pub fn host(&self) -> &H {
        &self.host
    }

    /// Direct host access, e.g. to apply user edits before
    /// [`Engine::handle_node_event`].
    pub fn host_mut(&mut self) -> &mut H {
        &mut self.host
    }

    pub fn observes(&self, event: &str) -> bool {
        self.events.iter().any(|e| e == event)
    }

    pub fn facets(&self) -> &FacetTable<H> {
        &self.facets
    }

    pub fn facets_mut(&mut self) -> &mut FacetTable<H> {
        &mut self.facets
    }

    pub fn is_dirty(&self) -> bool {
        self.aggregator.is_dirty()
    }

    pub fn issues(&self) -> &[BindingIssue<H::Node>] {
        &self.issues
    }

    /// Drain the nodes skipped since the last call.
    pub fn take_issues(&mut self) -> Vec<BindingIssue<H::Node>> {
        std::mem::take(&mut self.issues)
    }
}
