//! Shared fixtures for integration tests.

#![allow(dead_code)]

use std::sync::{Arc, Mutex};
use turnstile::core::{State, StateGraph, StateId};
use turnstile::{event_enum, StateBuilder};

event_enum! {
    pub enum AuthEvent {
        Authenticated,
        AcceptedTerms,
        AuthFailed,
        Finish,
    }
}

pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("debug")),
        )
        .with_test_writer()
        .try_init();
}

/// Ordered log of callback invocations, shared between states and the test.
#[derive(Clone, Default)]
pub struct CallLog(Arc<Mutex<Vec<String>>>);

impl CallLog {
    pub fn push(&self, entry: impl Into<String>) {
        self.0.lock().unwrap().push(entry.into());
    }

    pub fn entries(&self) -> Vec<String> {
        self.0.lock().unwrap().clone()
    }

    pub fn count(&self, entry: &str) -> usize {
        self.0.lock().unwrap().iter().filter(|e| *e == entry).count()
    }
}

/// A state builder whose entry and exit actions write to `log`.
pub fn logged<E: Send + 'static>(log: &CallLog, name: &'static str) -> StateBuilder<E> {
    let entry_log = log.clone();
    let exit_log = log.clone();
    State::builder(name)
        .on_entry(move || {
            entry_log.push(format!("{name}: enter"));
            async { Ok(()) }
        })
        .on_exit(move || {
            exit_log.push(format!("{name}: exit"));
            async { Ok(()) }
        })
}

pub struct AuthGraph {
    pub graph: StateGraph<AuthEvent>,
    pub signed_out: StateId,
    pub signed_in: StateId,
    pub terminal: StateId,
}

/// SignedOut (start), SignedIn and Terminal:
///
/// - SignedOut: Authenticated / AcceptedTerms -> SignedIn, AuthFailed -> SignedOut, Finish -> Terminal
/// - SignedIn: AuthFailed -> SignedOut, Finish -> Terminal, the rest is ignored
pub fn auth_graph(log: &CallLog) -> AuthGraph {
    let mut graph = StateGraph::new();
    let terminal = graph.insert(logged(log, "Terminal").build());
    let signed_out = graph.reserve("SignedOut");
    let signed_in = graph.insert(
        logged(log, "SignedIn")
            .on_event(move |event: &AuthEvent| match event {
                AuthEvent::Authenticated => None,
                AuthEvent::AcceptedTerms => None,
                AuthEvent::AuthFailed => Some(signed_out),
                AuthEvent::Finish => Some(terminal),
            })
            .build(),
    );
    graph
        .define(
            signed_out,
            logged(log, "SignedOut")
                .on_event(move |event: &AuthEvent| match event {
                    AuthEvent::Authenticated => Some(signed_in),
                    AuthEvent::AcceptedTerms => Some(signed_in),
                    AuthEvent::AuthFailed => Some(signed_out),
                    AuthEvent::Finish => Some(terminal),
                })
                .build(),
        )
        .unwrap();

    AuthGraph {
        graph,
        signed_out,
        signed_in,
        terminal,
    }
}
