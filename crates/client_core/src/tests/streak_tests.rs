use super::*;

fn record_all(tracker: &mut StreakTracker, outcomes: &[Outcome]) -> Vec<StreakUpdate> {
    outcomes.iter().map(|o| tracker.record(*o)).collect()
}

#[test]
fn computer_outcome_always_resets_streak() {
    let mut tracker = StreakTracker::default();
    record_all(
        &mut tracker,
        &[Outcome::Player, Outcome::Player, Outcome::Draw, Outcome::Player],
    );
    let update = tracker.record(Outcome::Computer);
    assert_eq!(update.current_streak, 0);
    assert_eq!(update.combo_multiplier, 1);
}

#[test]
fn draw_preserves_streak_and_multiplier() {
    let mut tracker = StreakTracker::default();
    record_all(&mut tracker, &[Outcome::Player, Outcome::Player, Outcome::Player]);
    let update = tracker.record(Outcome::Draw);
    assert_eq!(update.current_streak, 3);
    assert_eq!(update.best_streak, 3);
    assert_eq!(update.combo_multiplier, 2);
    assert!(!update.combo_triggered, "draws never fire the combo popup");
}

#[test]
fn best_streak_is_the_running_maximum() {
    let mut tracker = StreakTracker::default();
    let updates = record_all(
        &mut tracker,
        &[
            Outcome::Player,
            Outcome::Player,
            Outcome::Computer,
            Outcome::Player,
        ],
    );

    let mut running_max = 0;
    for update in &updates {
        running_max = running_max.max(update.current_streak);
        assert_eq!(update.best_streak, running_max);
    }
    assert_eq!(tracker.snapshot().best_streak, 2);
}

#[test]
fn multiplier_is_one_below_threshold_then_follows_the_formula() {
    let mut tracker = StreakTracker::default();
    for wins in 1..=9u32 {
        let update = tracker.record(Outcome::Player);
        let expected = if wins >= COMBO_THRESHOLD {
            wins / COMBO_THRESHOLD + 1
        } else {
            1
        };
        assert_eq!(update.combo_multiplier, expected, "after {wins} wins");
    }
}

#[test]
fn three_straight_wins_trigger_the_combo_once() {
    let mut tracker = StreakTracker::default();
    let updates = record_all(
        &mut tracker,
        &[Outcome::Player, Outcome::Player, Outcome::Player],
    );

    let fired: Vec<_> = updates.iter().filter(|u| u.combo_triggered).collect();
    assert_eq!(fired.len(), 1);
    assert_eq!(fired[0].current_streak, 3);
    assert_eq!(fired[0].best_streak, 3);
    assert_eq!(fired[0].combo_multiplier, 2);
}

#[test]
fn loss_after_two_wins_keeps_the_best_streak() {
    let mut tracker = StreakTracker::default();
    record_all(&mut tracker, &[Outcome::Player, Outcome::Player]);
    let update = tracker.record(Outcome::Computer);
    assert_eq!(update.current_streak, 0);
    assert_eq!(update.best_streak, 2);
}
