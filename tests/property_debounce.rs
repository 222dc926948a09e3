use std::time::{Duration, Instant};

use proptest::prelude::*;
use devloop::engine::{BuildOutcome, CoreCommand, CoreInput, WatchCore, DEBOUNCE_WINDOW};
use devloop::watch::{ChangeEvent, ExtensionFilter};

fn idle_core(t0: Instant) -> WatchCore {
    let mut core = WatchCore::new(ExtensionFilter::new("ts"), DEBOUNCE_WINDOW);
    core.start();
    core.step(CoreInput::BuildFinished(BuildOutcome::Success), t0);
    core
}

// Gaps strictly below the window, so the timer never fires mid-burst.
fn burst_strategy() -> impl Strategy<Value = Vec<u64>> {
    let max_gap = DEBOUNCE_WINDOW.as_millis() as u64 - 1;
    proptest::collection::vec(0..=max_gap, 0..30)
}

proptest! {
    #[test]
    fn burst_of_qualifying_events_builds_exactly_once(gaps in burst_strategy()) {
        let t0 = Instant::now();
        let mut core = idle_core(t0);
        let mut now = t0;
        let mut run_builds = 0;

        // First event at t0, then one per gap.
        let step = core.step(CoreInput::Changed(ChangeEvent::written("a.ts")), now);
        prop_assert!(step.commands.is_empty());

        for (i, gap) in gaps.iter().enumerate() {
            now += Duration::from_millis(*gap);
            let path = format!("src/file{i}.ts");
            let step = core.step(CoreInput::Changed(ChangeEvent::written(path)), now);
            prop_assert!(step.commands.is_empty());
        }

        prop_assert_eq!(core.deadline(), Some(now + DEBOUNCE_WINDOW));

        let deadline = core.deadline().unwrap();
        let step = core.step(CoreInput::DebounceElapsed, deadline);
        run_builds += step.commands.iter().filter(|c| **c == CoreCommand::RunBuild).count();

        // Nothing further is pending once the build is under way.
        let step = core.step(CoreInput::DebounceElapsed, deadline + DEBOUNCE_WINDOW);
        run_builds += step.commands.iter().filter(|c| **c == CoreCommand::RunBuild).count();

        prop_assert_eq!(run_builds, 1);
        prop_assert_eq!(core.builds_started(), 2);
    }

    #[test]
    fn non_qualifying_paths_never_leave_idle(
        names in proptest::collection::vec("[a-z]{1,8}\\.(js|json|md|tsx|css)", 1..20)
    ) {
        let t0 = Instant::now();
        let mut core = idle_core(t0);

        for (i, name) in names.iter().enumerate() {
            let now = t0 + Duration::from_millis(i as u64 * 10);
            let step = core.step(CoreInput::Changed(ChangeEvent::written(name.as_str())), now);
            prop_assert!(step.commands.is_empty());
            prop_assert_eq!(core.deadline(), None);
        }

        prop_assert_eq!(core.builds_started(), 1);
    }
}
