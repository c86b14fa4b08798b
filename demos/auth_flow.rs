//! Sign-in flow driven by a producer task.
//!
//! Run with `RUST_LOG=debug cargo run --example auth_flow` to see every event.

use std::time::Duration;
use turnstile::builder::terminal_state;
use turnstile::core::{State, StateGraph};
use turnstile::event_enum;
use turnstile::validation::{GraphValidator, GraphViolation};
use turnstile::{event_queue, MachineConfig, StateMachine};

event_enum! {
    pub enum AuthEvent {
        Authenticated,
        AcceptedTerms,
        AuthFailed,
        Finish,
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let mut graph = StateGraph::new();
    let terminal = terminal_state(&mut graph, "Terminal");
    let signed_out = graph.reserve("SignedOut");
    let signed_in = graph.insert(
        State::builder("SignedIn")
            .on_entry(|| async {
                println!("  welcome back");
                Ok(())
            })
            .on_exit(|| async {
                // Simulate flushing the session
                tokio::time::sleep(Duration::from_millis(50)).await;
                println!("  session closed");
                Ok(())
            })
            .on_event(move |event: &AuthEvent| match event {
                AuthEvent::Authenticated => None,
                AuthEvent::AcceptedTerms => None,
                AuthEvent::AuthFailed => Some(signed_out),
                AuthEvent::Finish => Some(terminal),
            })
            .build(),
    );
    graph.define(
        signed_out,
        State::builder("SignedOut")
            .on_entry(|| async {
                println!("  please sign in");
                Ok(())
            })
            .on_event(move |event: &AuthEvent| match event {
                AuthEvent::Authenticated => Some(signed_in),
                AuthEvent::AcceptedTerms => Some(signed_in),
                AuthEvent::AuthFailed => Some(signed_out),
                AuthEvent::Finish => Some(terminal),
            })
            .build(),
    )?;

    if let stillwater::validation::Validation::Failure(violations) = GraphValidator::new(&graph)
        .initial(signed_out)
        .terminal(terminal)
        .events(AuthEvent::VARIANTS)
        .validate()
    {
        let mut unsound = false;
        for violation in violations.iter() {
            eprintln!("graph problem: {violation}");
            // Async handlers only limit what can be checked
            unsound |= !matches!(violation, GraphViolation::OpaqueHandler { .. });
        }
        if unsound {
            anyhow::bail!("refusing to run an unsound graph");
        }
    }

    let (tx, rx) = event_queue();
    let machine = StateMachine::builder(graph)
        .initial(signed_out)
        .terminal(terminal)
        .events(rx)
        .config(MachineConfig {
            enter_initial_state: true,
            ..MachineConfig::named("auth")
        })
        .observer(|change| {
            println!("#{} {} -> {}", change.sequence, change.event, change.state);
        })
        .build()?;
    let handle = machine.spawn();

    let producer = tokio::spawn(async move {
        for event in [
            AuthEvent::Authenticated,
            AuthEvent::AcceptedTerms,
            AuthEvent::AuthFailed,
            AuthEvent::Authenticated,
        ] {
            tx.send(event)?;
            tokio::time::sleep(Duration::from_millis(100)).await;
        }
        tx.send_after(AuthEvent::Finish, Duration::from_millis(250));
        anyhow::Ok(())
    });

    producer.await??;
    let report = handle.join().await?;

    println!(
        "{:?} in '{}' after {} events",
        report.outcome, report.final_state_name, report.events_processed
    );
    println!("path: {}", report.history.get_path().join(" -> "));
    Ok(())
}
