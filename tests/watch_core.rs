// tests/watch_core.rs

use std::time::{Duration, Instant};

use devloop::engine::{
    BuildOutcome, CoreCommand, CoreInput, WatchCore, WatchState, DEBOUNCE_WINDOW,
};
use devloop::watch::{ChangeEvent, ExtensionFilter};

fn core() -> WatchCore {
    WatchCore::new(ExtensionFilter::new("ts"), DEBOUNCE_WINDOW)
}

fn ms(n: u64) -> Duration {
    Duration::from_millis(n)
}

fn changed(path: &str) -> CoreInput {
    CoreInput::Changed(ChangeEvent::written(path))
}

/// Core that has finished its startup build successfully.
fn idle_core(t0: Instant) -> WatchCore {
    let mut core = core();
    core.start();
    core.step(CoreInput::BuildFinished(BuildOutcome::Success), t0);
    assert_eq!(core.state(), WatchState::Idle);
    core
}

#[test]
fn startup_runs_one_unconditional_build() {
    let mut core = core();
    assert_eq!(core.state(), WatchState::Idle);

    let step = core.start();
    assert_eq!(step.commands, vec![CoreCommand::RunBuild]);
    assert!(step.keep_running);
    assert_eq!(core.state(), WatchState::Building { dirty: false });
    assert_eq!(core.builds_started(), 1);

    // A second start while building is a no-op.
    assert!(core.start().commands.is_empty());
    assert_eq!(core.builds_started(), 1);
}

#[test]
fn non_qualifying_changes_never_transition() {
    let t0 = Instant::now();
    let mut core = idle_core(t0);

    for path in ["main.js", "README.md", "tsconfig.json", "src/ts", "src/file.tsx"] {
        let step = core.step(changed(path), t0);
        assert!(step.commands.is_empty(), "{path} produced commands");
        assert_eq!(core.state(), WatchState::Idle, "{path} changed state");
    }

    let step = core.step(CoreInput::DebounceElapsed, t0 + ms(500));
    assert!(step.commands.is_empty());
    assert_eq!(core.builds_started(), 1);
}

#[test]
fn qualifying_change_opens_window() {
    let t0 = Instant::now();
    let mut core = idle_core(t0);

    let step = core.step(changed("aff/app.ts"), t0);
    assert!(step.commands.is_empty());
    assert_eq!(
        core.state(),
        WatchState::Pending {
            deadline: t0 + DEBOUNCE_WINDOW
        }
    );
    assert_eq!(core.deadline(), Some(t0 + DEBOUNCE_WINDOW));
}

#[test]
fn created_files_qualify_too() {
    let t0 = Instant::now();
    let mut core = idle_core(t0);

    core.step(CoreInput::Changed(ChangeEvent::created("new.ts")), t0);
    assert_eq!(core.deadline(), Some(t0 + DEBOUNCE_WINDOW));
}

#[test]
fn events_30ms_apart_build_once_at_80ms() {
    let t0 = Instant::now();
    let mut core = idle_core(t0);

    core.step(changed("a.ts"), t0);
    core.step(changed("b.ts"), t0 + ms(30));
    assert_eq!(core.deadline(), Some(t0 + ms(80)));

    // The timer armed for the first event would have fired at 50ms; it is stale.
    let step = core.step(CoreInput::DebounceElapsed, t0 + ms(50));
    assert!(step.commands.is_empty());
    assert!(matches!(core.state(), WatchState::Pending { .. }));

    let step = core.step(CoreInput::DebounceElapsed, t0 + ms(80));
    assert_eq!(step.commands, vec![CoreCommand::RunBuild]);
    assert_eq!(core.state(), WatchState::Building { dirty: false });
    assert_eq!(core.builds_started(), 2);
}

#[test]
fn window_restarts_instead_of_accumulating() {
    let t0 = Instant::now();
    let mut core = idle_core(t0);

    core.step(changed("a.ts"), t0);
    core.step(changed("a.ts"), t0 + ms(49));
    core.step(changed("a.ts"), t0 + ms(98));
    assert_eq!(core.deadline(), Some(t0 + ms(148)));
}

#[test]
fn change_after_an_expired_window_starts_the_build() {
    let t0 = Instant::now();
    let mut core = idle_core(t0);

    core.step(changed("a.ts"), t0);
    // The 50ms timer has not been delivered yet when the next change lands.
    let step = core.step(changed("b.ts"), t0 + ms(60));
    assert_eq!(step.commands, vec![CoreCommand::RunBuild]);
    assert_eq!(core.state(), WatchState::Building { dirty: true });
    assert_eq!(core.builds_started(), 2);

    // The late change gets its own build afterwards.
    let step = core.step(CoreInput::BuildFinished(BuildOutcome::Success), t0 + ms(70));
    assert_eq!(step.commands, vec![CoreCommand::ReleaseWaiters]);
    assert_eq!(core.deadline(), Some(t0 + ms(120)));
}

#[test]
fn change_exactly_at_the_deadline_counts_as_elapsed() {
    let t0 = Instant::now();
    let mut core = idle_core(t0);

    core.step(changed("a.ts"), t0);
    let step = core.step(changed("b.ts"), t0 + DEBOUNCE_WINDOW);
    assert_eq!(step.commands, vec![CoreCommand::RunBuild]);
}

#[test]
fn non_qualifying_change_does_not_extend_window() {
    let t0 = Instant::now();
    let mut core = idle_core(t0);

    core.step(changed("a.ts"), t0);
    core.step(changed("a.js"), t0 + ms(40));
    assert_eq!(core.deadline(), Some(t0 + DEBOUNCE_WINDOW));
}

#[test]
fn successful_build_releases_waiters() {
    let t0 = Instant::now();
    let mut core = idle_core(t0);

    core.step(changed("a.ts"), t0);
    core.step(CoreInput::DebounceElapsed, t0 + DEBOUNCE_WINDOW);
    let step = core.step(
        CoreInput::BuildFinished(BuildOutcome::Success),
        t0 + ms(200),
    );

    assert_eq!(step.commands, vec![CoreCommand::ReleaseWaiters]);
    assert_eq!(core.state(), WatchState::Idle);
}

#[test]
fn failed_build_releases_nothing_and_returns_to_idle() {
    let t0 = Instant::now();
    let mut core = idle_core(t0);

    core.step(changed("a.ts"), t0);
    core.step(CoreInput::DebounceElapsed, t0 + DEBOUNCE_WINDOW);
    let step = core.step(CoreInput::BuildFinished(BuildOutcome::Failed), t0 + ms(200));

    assert!(step.commands.is_empty());
    assert!(step.keep_running);
    assert_eq!(core.state(), WatchState::Idle);

    // Still accepts the next change.
    core.step(changed("a.ts"), t0 + ms(300));
    assert_eq!(core.deadline(), Some(t0 + ms(350)));
}

#[test]
fn startup_failure_does_not_release() {
    let t0 = Instant::now();
    let mut core = core();
    core.start();
    let step = core.step(CoreInput::BuildFinished(BuildOutcome::Failed), t0);
    assert!(step.commands.is_empty());
    assert_eq!(core.state(), WatchState::Idle);
}

#[test]
fn change_during_build_schedules_one_follow_up() {
    let t0 = Instant::now();
    let mut core = core();
    core.start();

    core.step(changed("a.ts"), t0 + ms(5));
    core.step(changed("b.ts"), t0 + ms(10));
    assert_eq!(core.state(), WatchState::Building { dirty: true });

    let step = core.step(CoreInput::BuildFinished(BuildOutcome::Success), t0 + ms(100));
    assert_eq!(step.commands, vec![CoreCommand::ReleaseWaiters]);
    assert_eq!(core.deadline(), Some(t0 + ms(150)));

    let step = core.step(CoreInput::DebounceElapsed, t0 + ms(150));
    assert_eq!(step.commands, vec![CoreCommand::RunBuild]);
    assert_eq!(core.builds_started(), 2);
}

#[test]
fn stray_inputs_are_ignored() {
    let t0 = Instant::now();
    let mut core = idle_core(t0);

    let step = core.step(CoreInput::BuildFinished(BuildOutcome::Success), t0);
    assert!(step.commands.is_empty());
    assert_eq!(core.state(), WatchState::Idle);

    let step = core.step(CoreInput::DebounceElapsed, t0);
    assert!(step.commands.is_empty());
    assert_eq!(core.state(), WatchState::Idle);
}

#[test]
fn shutdown_stops_the_loop() {
    let t0 = Instant::now();
    let mut core = idle_core(t0);
    let step = core.step(CoreInput::ShutdownRequested, t0);
    assert!(!step.keep_running);
    assert!(step.commands.is_empty());
}
