//! Registry that owns the states of a machine.

use super::state::{State, StateId};
use std::collections::HashMap;
use thiserror::Error;

/// Errors from assembling a graph.
#[derive(Debug, Error, PartialEq)]
pub enum GraphError {
    #[error("State {0} is not part of this graph")]
    UnknownState(StateId),

    #[error("State '{name}' is already defined")]
    AlreadyDefined { name: String },
}

enum Slot<E> {
    Reserved(String),
    Defined(State<E>),
}

/// Owner of every state a machine can visit.
///
/// States that only move forward can be added with [`insert`](Self::insert).
/// Cycles need the successor's id before the successor exists, so those are
/// [`reserve`](Self::reserve)d first and [`define`](Self::define)d later.
///
/// # Example
///
/// ```rust
/// use turnstile::core::{State, StateGraph};
///
/// #[derive(Debug)]
/// enum Toggle { Flip }
///
/// let mut graph = StateGraph::new();
/// let off = graph.reserve("Off");
/// let on = graph.insert(State::builder("On").on_event(move |_: &Toggle| Some(off)).build());
/// graph
///     .define(off, State::builder("Off").on_event(move |_: &Toggle| Some(on)).build())
///     .unwrap();
///
/// assert_eq!(graph.len(), 2);
/// assert!(graph.undefined().is_empty());
/// ```
pub struct StateGraph<E> {
    slots: HashMap<StateId, Slot<E>>,
    order: Vec<StateId>,
}

impl<E> Default for StateGraph<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E> StateGraph<E> {
    pub fn new() -> Self {
        Self {
            slots: HashMap::new(),
            order: Vec::new(),
        }
    }

    /// Add a state and return its new identity.
    pub fn insert(&mut self, state: State<E>) -> StateId {
        self.push(Slot::Defined(state))
    }

    /// Allocate an identity now and supply the state later with [`define`](Self::define).
    pub fn reserve(&mut self, name: impl Into<String>) -> StateId {
        self.push(Slot::Reserved(name.into()))
    }

    /// Fill a reserved slot. Each slot can be defined once.
    pub fn define(&mut self, id: StateId, state: State<E>) -> Result<(), GraphError> {
        let slot = self.slots.get_mut(&id).ok_or(GraphError::UnknownState(id))?;
        if let Slot::Defined(existing) = slot {
            return Err(GraphError::AlreadyDefined {
                name: existing.name.clone(),
            });
        }
        *slot = Slot::Defined(state);
        Ok(())
    }

    /// Look up a defined state.
    pub fn get(&self, id: StateId) -> Option<&State<E>> {
        match self.slots.get(&id)? {
            Slot::Defined(state) => Some(state),
            Slot::Reserved(_) => None,
        }
    }

    /// Name of a defined or reserved state.
    pub fn name(&self, id: StateId) -> Option<&str> {
        self.slots.get(&id).map(|slot| match slot {
            Slot::Defined(state) => state.name.as_str(),
            Slot::Reserved(name) => name.as_str(),
        })
    }

    pub fn contains(&self, id: StateId) -> bool {
        self.slots.contains_key(&id)
    }

    /// All ids in insertion order.
    pub fn ids(&self) -> impl Iterator<Item = StateId> + '_ {
        self.order.iter().copied()
    }

    /// Reserved slots that were never defined.
    pub fn undefined(&self) -> Vec<StateId> {
        self.order
            .iter()
            .copied()
            .filter(|id| matches!(self.slots.get(id), Some(Slot::Reserved(_))))
            .collect()
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    fn push(&mut self, slot: Slot<E>) -> StateId {
        let id = StateId::new();
        self.slots.insert(id, slot);
        self.order.push(id);
        id
    }
}
