//! Behaviour of the run loop: ordering, termination, cancellation and failures.

mod common;

use common::{init_tracing, CallLog};
use std::error::Error as _;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::time::Instant;
use turnstile::config::DEFAULT_HISTORY_LIMIT;
use turnstile::core::{State, StateGraph, StateId};
use turnstile::runtime::{CallbackPhase, QueueClosed, RunOutcome};
use turnstile::{event_queue, Event, MachineConfig, MachineError, StateMachine};

#[derive(Clone, Debug, PartialEq)]
enum Job {
    Work(u32),
    Stop,
}

impl Event for Job {
    fn name(&self) -> &str {
        match self {
            Self::Work(_) => "Work",
            Self::Stop => "Stop",
        }
    }
}

/// A single working state that records every `Work` payload and stops on `Stop`.
fn recording_graph(seen: Arc<Mutex<Vec<u32>>>) -> (StateGraph<Job>, StateId, StateId) {
    let mut graph = StateGraph::new();
    let done = graph.insert(State::builder("Done").build());
    let working = graph.insert(
        State::builder("Working")
            .on_event(move |job: &Job| match job {
                Job::Work(n) => {
                    seen.lock().unwrap().push(*n);
                    None
                }
                Job::Stop => Some(done),
            })
            .build(),
    );
    (graph, working, done)
}

#[tokio::test]
async fn starting_in_terminal_consumes_nothing() {
    init_tracing();
    let calls = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&calls);
    let mut graph = StateGraph::new();
    let done = graph.insert(
        State::builder("Done")
            .on_event(move |_: &Job| {
                counter.fetch_add(1, Ordering::SeqCst);
                None
            })
            .build(),
    );

    let (tx, rx) = event_queue();
    tx.send(Job::Work(1)).unwrap();
    let report = StateMachine::builder(graph)
        .initial(done)
        .terminal(done)
        .events(rx)
        .build()
        .unwrap()
        .run()
        .await
        .unwrap();

    assert_eq!(report.outcome, RunOutcome::Terminated);
    assert_eq!(report.events_processed, 0);
    assert!(report.history.is_empty());
    assert_eq!(calls.load(Ordering::SeqCst), 0);
    assert_eq!(tx.send(Job::Work(2)), Err(QueueClosed(Job::Work(2))));
}

#[tokio::test]
async fn ignored_events_are_processed_in_order() {
    let seen = Arc::new(Mutex::new(Vec::new()));
    let (graph, working, done) = recording_graph(Arc::clone(&seen));
    let (tx, rx) = event_queue();
    let handle = StateMachine::builder(graph)
        .initial(working)
        .terminal(done)
        .events(rx)
        .build()
        .unwrap()
        .spawn();

    for n in 0..50 {
        tx.send(Job::Work(n)).unwrap();
        if n % 10 == 0 {
            tokio::task::yield_now().await;
        }
    }
    tx.send(Job::Stop).unwrap();
    let report = handle.join().await.unwrap();

    assert_eq!(report.events_processed, 51);
    assert_eq!(*seen.lock().unwrap(), (0..50).collect::<Vec<_>>());
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_producers_keep_their_own_order() {
    let seen = Arc::new(Mutex::new(Vec::new()));
    let (graph, working, done) = recording_graph(Arc::clone(&seen));
    let (tx, rx) = event_queue();
    let handle = StateMachine::builder(graph)
        .initial(working)
        .terminal(done)
        .events(rx)
        .build()
        .unwrap()
        .spawn();

    let producers: Vec<_> = (0..4u32)
        .map(|producer| {
            let tx = tx.clone();
            tokio::spawn(async move {
                for n in 0..25 {
                    tx.send(Job::Work(producer * 1000 + n)).unwrap();
                }
            })
        })
        .collect();
    for producer in producers {
        producer.await.unwrap();
    }
    tx.send(Job::Stop).unwrap();
    handle.join().await.unwrap();

    let seen = seen.lock().unwrap();
    assert_eq!(seen.len(), 100);
    for producer in 0..4u32 {
        let own: Vec<u32> = seen
            .iter()
            .copied()
            .filter(|n| n / 1000 == producer)
            .collect();
        let expected: Vec<u32> = (0..25).map(|n| producer * 1000 + n).collect();
        assert_eq!(own, expected);
    }
}

#[tokio::test]
async fn stop_cancels_a_waiting_machine() {
    let seen = Arc::new(Mutex::new(Vec::new()));
    let (graph, working, done) = recording_graph(Arc::clone(&seen));
    let (tx, rx) = event_queue();
    let handle = StateMachine::builder(graph)
        .initial(working)
        .terminal(done)
        .events(rx)
        .build()
        .unwrap()
        .spawn();

    tx.send(Job::Work(1)).unwrap();
    tokio::task::yield_now().await;
    let report = handle.stop().await.unwrap();

    assert_eq!(report.outcome, RunOutcome::Cancelled);
    assert_eq!(report.final_state, working);
    assert!(tx.is_closed());
}

#[tokio::test]
async fn trigger_before_run_cancels_immediately() {
    let seen = Arc::new(Mutex::new(Vec::new()));
    let (graph, working, done) = recording_graph(Arc::clone(&seen));
    let (tx, rx) = event_queue();
    let machine = StateMachine::builder(graph)
        .initial(working)
        .terminal(done)
        .events(rx)
        .build()
        .unwrap();

    tx.send(Job::Work(1)).unwrap();
    let trigger = machine.shutdown_trigger();
    trigger.trigger();
    let report = machine.run().await.unwrap();

    assert_eq!(report.outcome, RunOutcome::Cancelled);
    assert_eq!(report.events_processed, 0);
    assert!(seen.lock().unwrap().is_empty());
}

#[tokio::test]
async fn closed_source_is_an_error() {
    let seen = Arc::new(Mutex::new(Vec::new()));
    let (graph, working, done) = recording_graph(Arc::clone(&seen));
    let (tx, rx) = event_queue();
    let machine = StateMachine::builder(graph)
        .initial(working)
        .terminal(done)
        .events(rx)
        .build()
        .unwrap();

    tx.send(Job::Work(7)).unwrap();
    drop(tx);
    let err = machine.run().await.unwrap_err();

    assert!(matches!(
        err,
        MachineError::EventSourceClosed { ref state } if state == "Working"
    ));
    assert_eq!(*seen.lock().unwrap(), vec![7]);
}

#[tokio::test]
async fn failing_exit_reports_state_and_phase() {
    let mut graph = StateGraph::new();
    let done = graph.insert(State::builder("Done").build());
    let leaving = graph.insert(
        State::builder("Leaving")
            .on_exit(|| async { Err(anyhow::anyhow!("disk full")) })
            .on_event(move |_: &Job| Some(done))
            .build(),
    );
    let (tx, rx) = event_queue();
    let machine = StateMachine::builder(graph)
        .initial(leaving)
        .terminal(done)
        .events(rx)
        .build()
        .unwrap();

    tx.send(Job::Stop).unwrap();
    let err = machine.run().await.unwrap_err();

    match &err {
        MachineError::Callback { state, phase, .. } => {
            assert_eq!(state, "Leaving");
            assert_eq!(*phase, CallbackPhase::Exit);
        }
        other => panic!("Expected callback error, got {other:?}"),
    }
    assert_eq!(err.to_string(), "on_exit callback of state 'Leaving' failed");
    assert_eq!(err.source().unwrap().to_string(), "disk full");
}

#[tokio::test]
async fn failing_async_handler_stops_the_run() {
    let log = CallLog::default();
    let exit_log = log.clone();
    let mut graph = StateGraph::new();
    let done = graph.insert(State::builder("Done").build());
    let checking = graph.insert(
        State::builder("Checking")
            .on_exit(move || {
                exit_log.push("Checking: exit");
                async { Ok(()) }
            })
            .on_event_async(move |job: Job| async move {
                match job {
                    Job::Work(n) if n > 10 => anyhow::bail!("{n} is out of range"),
                    Job::Work(_) => Ok(None),
                    Job::Stop => Ok(Some(done)),
                }
            })
            .build(),
    );
    let (tx, rx) = event_queue();
    let machine = StateMachine::builder(graph)
        .initial(checking)
        .terminal(done)
        .events(rx)
        .build()
        .unwrap();

    tx.send(Job::Work(3)).unwrap();
    tx.send(Job::Work(42)).unwrap();
    tx.send(Job::Stop).unwrap();
    let err = machine.run().await.unwrap_err();

    assert!(matches!(
        err,
        MachineError::Callback {
            phase: CallbackPhase::Event,
            ..
        }
    ));
    assert_eq!(err.source().unwrap().to_string(), "42 is out of range");
    assert!(log.entries().is_empty());
}

#[tokio::test]
async fn failing_initial_entry_is_reported() {
    let mut graph = StateGraph::new();
    let done = graph.insert(State::builder("Done").build());
    let start = graph.insert(
        State::builder("Start")
            .on_entry(|| async { Err(anyhow::anyhow!("not ready")) })
            .build(),
    );
    let (_tx, rx) = event_queue::<Job>();
    let machine = StateMachine::builder(graph)
        .initial(start)
        .terminal(done)
        .events(rx)
        .config(MachineConfig {
            enter_initial_state: true,
            ..MachineConfig::default()
        })
        .build()
        .unwrap();

    let err = machine.run().await.unwrap_err();
    assert!(matches!(
        err,
        MachineError::Callback {
            phase: CallbackPhase::Entry,
            ..
        }
    ));
}

#[tokio::test(start_paused = true)]
async fn slow_entry_holds_back_later_events() {
    let log = CallLog::default();
    let entry_log = log.clone();
    let event_log = log.clone();
    let mut graph = StateGraph::new();
    let done = graph.insert(State::builder("Done").build());
    let warming = graph.insert(
        State::builder("Warming")
            .on_entry(move || {
                let log = entry_log.clone();
                async move {
                    tokio::time::sleep(Duration::from_secs(10)).await;
                    log.push("Warming: entered");
                    Ok(())
                }
            })
            .on_event(move |job: &Job| match job {
                Job::Work(n) => {
                    event_log.push(format!("Warming: work {n}"));
                    None
                }
                Job::Stop => Some(done),
            })
            .build(),
    );
    let cold = graph.insert(
        State::builder("Cold")
            .on_event(move |_: &Job| Some(warming))
            .build(),
    );
    let (tx, rx) = event_queue();
    let machine = StateMachine::builder(graph)
        .initial(cold)
        .terminal(done)
        .events(rx)
        .build()
        .unwrap();

    tx.send(Job::Work(0)).unwrap();
    tx.send(Job::Work(1)).unwrap();
    tx.send(Job::Stop).unwrap();
    let started = Instant::now();
    machine.run().await.unwrap();

    assert!(started.elapsed() >= Duration::from_secs(10));
    assert_eq!(log.entries(), vec!["Warming: entered", "Warming: work 1"]);
}

#[tokio::test(start_paused = true)]
async fn delayed_event_finishes_the_run() {
    let seen = Arc::new(Mutex::new(Vec::new()));
    let (graph, working, done) = recording_graph(Arc::clone(&seen));
    let (tx, rx) = event_queue();
    let machine = StateMachine::builder(graph)
        .initial(working)
        .terminal(done)
        .events(rx)
        .build()
        .unwrap();

    let _timer = tx.send_after(Job::Stop, Duration::from_secs(30));
    tx.send(Job::Work(1)).unwrap();
    let started = Instant::now();
    let report = machine.run().await.unwrap();

    assert!(started.elapsed() >= Duration::from_secs(30));
    assert_eq!(report.outcome, RunOutcome::Terminated);
    assert_eq!(*seen.lock().unwrap(), vec![1]);
}

#[tokio::test]
async fn history_keeps_only_the_newest_records() {
    let mut graph = StateGraph::new();
    let done = graph.insert(State::builder("Done").build());
    let pinging = graph.reserve("Pinging");
    graph
        .define(
            pinging,
            State::builder("Pinging")
                .on_event(move |job: &Job| match job {
                    Job::Work(_) => Some(pinging),
                    Job::Stop => Some(done),
                })
                .build(),
        )
        .unwrap();
    let (tx, rx) = event_queue();
    let machine = StateMachine::builder(graph)
        .initial(pinging)
        .terminal(done)
        .events(rx)
        .config(MachineConfig {
            history_limit: Some(2),
            ..MachineConfig::named("bounded")
        })
        .build()
        .unwrap();

    for n in 0..5 {
        tx.send(Job::Work(n)).unwrap();
    }
    tx.send(Job::Stop).unwrap();
    let report = machine.run().await.unwrap();

    let sequences: Vec<u64> = report
        .history
        .transitions()
        .iter()
        .map(|record| record.sequence)
        .collect();
    assert_eq!(sequences, vec![5, 6]);
    assert_eq!(report.history.get_path(), vec!["Pinging", "Pinging", "Done"]);
}

#[tokio::test]
async fn default_history_is_bounded() {
    let mut graph = StateGraph::new();
    let done = graph.insert(State::builder("Done").build());
    let pinging = graph.reserve("Pinging");
    graph
        .define(
            pinging,
            State::builder("Pinging")
                .on_event(move |job: &Job| match job {
                    Job::Work(_) => Some(pinging),
                    Job::Stop => Some(done),
                })
                .build(),
        )
        .unwrap();
    let (tx, rx) = event_queue();
    let machine = StateMachine::builder(graph)
        .initial(pinging)
        .terminal(done)
        .events(rx)
        .build()
        .unwrap();

    let total = DEFAULT_HISTORY_LIMIT as u32 + 10;
    for n in 0..total {
        tx.send(Job::Work(n)).unwrap();
    }
    tx.send(Job::Stop).unwrap();
    let report = machine.run().await.unwrap();

    let transitions = report.history.transitions();
    assert_eq!(transitions.len(), DEFAULT_HISTORY_LIMIT);
    assert_eq!(transitions[0].sequence, 12);
    assert_eq!(transitions.last().unwrap().sequence, u64::from(total) + 1);
}

#[tokio::test]
async fn twin_of_terminal_state_keeps_running() {
    let mut graph = StateGraph::new();
    let done = graph.reserve("Done");
    let finishing = State::builder("Done").on_event(move |job: &Job| match job {
        Job::Work(_) => None,
        Job::Stop => Some(done),
    });
    graph.define(done, finishing.build()).unwrap();
    let twin = graph.insert(finishing.build());
    let start = graph.insert(
        State::builder("Start")
            .on_event(move |_: &Job| Some(twin))
            .build(),
    );
    let (tx, rx) = event_queue();
    let machine = StateMachine::builder(graph)
        .initial(start)
        .terminal(done)
        .events(rx)
        .build()
        .unwrap();

    tx.send(Job::Work(1)).unwrap();
    tx.send(Job::Work(2)).unwrap();
    tx.send(Job::Stop).unwrap();
    let report = machine.run().await.unwrap();

    assert_eq!(report.outcome, RunOutcome::Terminated);
    assert_eq!(report.final_state, done);
    assert_ne!(report.final_state, twin);
    assert_eq!(report.events_processed, 3);
    assert_eq!(report.history.get_path(), vec!["Start", "Done", "Done"]);
    assert_eq!(report.history.transitions()[0].to, twin);
}
