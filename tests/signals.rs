//! OS signal delivery. Kept in its own test binary because the signal is
//! raised on the whole test process.

#![cfg(unix)]

use std::process::Command;
use std::time::Duration;

use listener_group::lifecycle::{
    Coordinator, CoordinatorConfig, Listener, Phase, ShutdownCause, StopOutcome,
    TerminationSignal,
};

mod common;
use common::{Polite, SlowStop};

const RUN_DEADLINE: Duration = Duration::from_secs(5);

fn raise_hangup() {
    let pid = std::process::id().to_string();
    let status = Command::new("kill")
        .args(["-HUP", pid.as_str()])
        .status()
        .expect("failed to run kill");
    assert!(status.success());
}

#[tokio::test]
async fn test_hangup_stops_the_group_once() {
    let coordinator = Coordinator::new(CoordinatorConfig {
        grace_period: Duration::from_secs(2),
        handle_signals: true,
    });
    let handle = coordinator.handle();
    let mut phases = handle.subscribe();
    let listeners: Vec<Box<dyn Listener>> = vec![
        Box::new(Polite { name: "a" }),
        Box::new(SlowStop {
            name: "b",
            delay: Duration::from_millis(300),
        }),
    ];

    let run = tokio::spawn(coordinator.run(listeners));

    // Handlers are installed before the run starts watching.
    phases
        .wait_for(|phase| *phase == Phase::Watching)
        .await
        .unwrap();
    raise_hangup();

    // A second signal while the group is stopping is ignored.
    phases
        .wait_for(|phase| *phase >= Phase::Sweeping)
        .await
        .unwrap();
    raise_hangup();

    let outcome = tokio::time::timeout(RUN_DEADLINE, run)
        .await
        .expect("run did not return after SIGHUP")
        .unwrap();

    assert_eq!(outcome.cause, ShutdownCause::Signal(TerminationSignal::Hangup));
    assert_eq!(outcome.listeners.len(), 2);
    assert_eq!(outcome.report("a").unwrap().outcome, StopOutcome::Stopped);
    assert_eq!(outcome.report("b").unwrap().outcome, StopOutcome::Stopped);
    assert!(outcome.sweep_duration < Duration::from_secs(2));
    assert_eq!(handle.phase(), Phase::Done);
}
