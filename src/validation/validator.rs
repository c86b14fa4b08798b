//! Reachability and consistency checks for a state graph.

use crate::core::{Event, StateGraph, StateId};
use crate::validation::violations::GraphViolation;
use std::collections::{HashSet, VecDeque};
use stillwater::validation::Validation;
use stillwater::NonEmptyVec;

/// Checks a graph before it is handed to a machine.
///
/// Pure handlers are probed with every supplied event to discover the edges
/// of the graph. Async handlers cannot be probed without running their side
/// effects; each one is reported as [`GraphViolation::OpaqueHandler`] and
/// contributes no edges. If the reachability search meets such a state, no
/// unreachable-state verdicts are given.
pub struct GraphValidator<'a, E> {
    graph: &'a StateGraph<E>,
    initial: Option<StateId>,
    terminal: Option<StateId>,
    events: &'a [E],
}

impl<'a, E: Event> GraphValidator<'a, E> {
    pub fn new(graph: &'a StateGraph<E>) -> Self {
        Self {
            graph,
            initial: None,
            terminal: None,
            events: &[],
        }
    }

    /// Starting point for the reachability search.
    pub fn initial(mut self, state: StateId) -> Self {
        self.initial = Some(state);
        self
    }

    /// State that must be reachable and must not handle events.
    pub fn terminal(mut self, state: StateId) -> Self {
        self.terminal = Some(state);
        self
    }

    /// Events to probe every state with, usually `MyEvent::VARIANTS`.
    pub fn events(mut self, events: &'a [E]) -> Self {
        self.events = events;
        self
    }

    /// Run every check, accumulating ALL violations.
    pub fn validate(&self) -> Validation<(), NonEmptyVec<GraphViolation>> {
        let mut checks: Vec<Validation<(), NonEmptyVec<GraphViolation>>> = Vec::new();

        for (role, id) in [("initial", self.initial), ("terminal", self.terminal)] {
            if let Some(id) = id {
                if !self.graph.contains(id) {
                    checks.push(Validation::fail(GraphViolation::UnknownState { role }));
                }
            }
        }

        for id in self.graph.undefined() {
            checks.push(Validation::fail(GraphViolation::UndefinedState {
                state: self.name(id),
            }));
        }

        for id in self.graph.ids() {
            let Some(state) = self.graph.get(id) else {
                continue;
            };
            if Some(id) == self.terminal {
                continue;
            }
            for event in self.events {
                match state.probe(event) {
                    Some(Some(target)) if !self.graph.contains(target) => {
                        checks.push(Validation::fail(GraphViolation::DanglingTransition {
                            state: state.name().to_string(),
                            event: event.name().to_string(),
                        }));
                    }
                    Some(_) => {}
                    None => {
                        checks.push(Validation::fail(GraphViolation::OpaqueHandler {
                            state: state.name().to_string(),
                        }));
                        break;
                    }
                }
            }
        }

        if let Some(terminal) = self.terminal.and_then(|id| self.graph.get(id)) {
            for event in self.events {
                if let Some(Some(_)) = terminal.probe(event) {
                    checks.push(Validation::fail(GraphViolation::TerminalHasTransitions {
                        state: terminal.name().to_string(),
                        event: event.name().to_string(),
                    }));
                }
            }
        }

        // Edges behind an async handler are unknown, so an incomplete search
        // proves nothing about reachability.
        if let Some(initial) = self.initial.filter(|id| self.graph.contains(*id)) {
            let (reached, complete) = self.reachable_from(initial);
            for id in self.graph.ids() {
                if !complete || reached.contains(&id) {
                    continue;
                }
                let state = self.name(id);
                let violation = if Some(id) == self.terminal {
                    GraphViolation::TerminalUnreachable { state }
                } else {
                    GraphViolation::UnreachableState { state }
                };
                checks.push(Validation::fail(violation));
            }
        }

        // Accumulate ALL failures using all_vec
        Validation::all_vec(checks).map(|_| ())
    }

    /// Breadth-first search over probed edges. The search stops at the terminal
    /// state since the machine never leaves it.
    ///
    /// The flag is `false` when the search passed through an async handler.
    fn reachable_from(&self, initial: StateId) -> (HashSet<StateId>, bool) {
        let mut reached = HashSet::from([initial]);
        let mut queue = VecDeque::from([initial]);
        let mut complete = true;

        while let Some(id) = queue.pop_front() {
            if Some(id) == self.terminal {
                continue;
            }
            let Some(state) = self.graph.get(id) else {
                continue;
            };
            for event in self.events {
                match state.probe(event) {
                    Some(Some(target)) => {
                        if self.graph.contains(target) && reached.insert(target) {
                            queue.push_back(target);
                        }
                    }
                    Some(None) => {}
                    None => {
                        complete = false;
                        break;
                    }
                }
            }
        }
        (reached, complete)
    }

    fn name(&self, id: StateId) -> String {
        self.graph.name(id).unwrap_or_default().to_string()
    }
}
