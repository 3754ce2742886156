//! Structural events emitted while a tree operation runs.
//!
//! Every operation collects its own trace: the recorder is created at the start
//! of a facade call and handed back to the caller with the result, so no event
//! ever leaks from one operation into the next.

use serde::Serialize;

use crate::node::Color;

/// Which way a walk descends or a rotation turns.
#[derive(PartialEq, Eq, Copy, Clone, Debug, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Left,
    Right,
}

impl Direction {
    pub fn opposite(self) -> Self {
        match self {
            Direction::Left => Direction::Right,
            Direction::Right => Direction::Left,
        }
    }
}

/// A single step of an operation, in execution order.
#[derive(PartialEq, Eq, Clone, Debug, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Event<K> {
    /// The probe key was compared against the key held by `node`.
    Compare { node: K, other: K },
    /// The walk moved to a child.
    Descend { direction: Direction },
    /// A rotation was performed around `axis`, which moves down in `direction`.
    Rotate { axis: K, direction: Direction },
    /// `node` was painted `color`.
    Recolor { node: K, color: Color },
    /// `node` was attached at a new position, or its key was moved into another node.
    Relink { node: K },
}

impl<K> Event<K> {
    pub fn is_compare(&self) -> bool {
        matches!(self, Event::Compare { .. })
    }

    pub fn is_rotate(&self) -> bool {
        matches!(self, Event::Rotate { .. })
    }

    pub fn is_recolor(&self) -> bool {
        matches!(self, Event::Recolor { .. })
    }
}

/// Append-only event log for one operation.
#[derive(Debug)]
pub(crate) struct Recorder<K> {
    events: Vec<Event<K>>,
    enabled: bool,
}

impl<K> Recorder<K> {
    pub(crate) fn new(enabled: bool) -> Self {
        Recorder {
            events: Vec::new(),
            enabled,
        }
    }

    /// Records the event built by `make`. The closure is skipped entirely when
    /// recording is switched off, so keys are only cloned for callers that want a trace.
    pub(crate) fn record(&mut self, make: impl FnOnce() -> Event<K>) {
        if self.enabled {
            self.events.push(make());
        }
    }

    pub(crate) fn len(&self) -> usize {
        self.events.len()
    }

    pub(crate) fn into_events(self) -> Vec<Event<K>> {
        self.events
    }
}
