use super::*;

async fn setup() -> ApiContext {
    let storage = Storage::new("sqlite::memory:").await.expect("db");
    ApiContext { storage }
}

#[test]
fn resolve_outcome_covers_the_full_truth_table() {
    use Choice::*;

    for choice in Choice::ALL {
        assert_eq!(resolve_outcome(choice, choice), Outcome::Draw);
    }
    for (player, computer) in [(Rock, Scissors), (Paper, Rock), (Scissors, Paper)] {
        assert_eq!(resolve_outcome(player, computer), Outcome::Player);
        assert_eq!(resolve_outcome(computer, player), Outcome::Computer);
    }
}

#[tokio::test]
async fn play_echoes_choice_and_returns_fresh_stats() {
    let ctx = setup().await;
    let response = play(&ctx, Choice::Rock).await.expect("play");

    assert_eq!(response.player_choice, Choice::Rock);
    assert_eq!(
        response.result,
        resolve_outcome(response.player_choice, response.computer_choice)
    );
    assert_eq!(response.stats.total_games, 1);
    assert_eq!(
        response.stats.player_wins + response.stats.computer_wins + response.stats.draws,
        1
    );
}

#[tokio::test]
async fn stats_accumulate_across_rounds() {
    let ctx = setup().await;
    play(&ctx, Choice::Rock).await.expect("first round");
    play(&ctx, Choice::Paper).await.expect("second round");

    let snapshot = stats(&ctx).await.expect("stats");
    assert_eq!(snapshot.total_games, 2);
}

#[tokio::test]
async fn reset_returns_zeroed_snapshot_and_clears_history() {
    let ctx = setup().await;
    play(&ctx, Choice::Scissors).await.expect("round");

    let response = reset(&ctx).await.expect("reset");
    assert_eq!(response.message, RESET_MESSAGE);
    assert_eq!(response.stats, StatsSnapshot::default());
    assert!(history(&ctx, None).await.expect("history").is_empty());
}

#[tokio::test]
async fn history_lists_recent_rounds_newest_first() {
    let ctx = setup().await;
    play(&ctx, Choice::Rock).await.expect("first");
    play(&ctx, Choice::Paper).await.expect("second");
    play(&ctx, Choice::Scissors).await.expect("third");

    let entries = history(&ctx, None).await.expect("history");
    assert_eq!(entries.len(), 3);
    assert_eq!(entries[0].player_choice, Choice::Scissors);
    assert_eq!(entries[2].player_choice, Choice::Rock);

    let capped = history(&ctx, Some(2)).await.expect("capped history");
    assert_eq!(capped.len(), 2);
}
