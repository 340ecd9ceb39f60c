use std::{
    sync::{
        atomic::{AtomicBool, Ordering},
        Arc,
    },
    time::Duration,
};

use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::Client;
use shared::{
    domain::{Choice, Outcome},
    protocol::{HistoryEntry, PlayRequest, PlayResponse, ResetResponse, StatsSnapshot},
};
use tokio::sync::Mutex;
use tracing::{debug, error};
use url::Url;

mod streak;

pub use streak::{StreakSnapshot, StreakTracker, StreakUpdate, COMBO_THRESHOLD};

const SHAKE_DURATION: Duration = Duration::from_millis(1500);
const COMBO_DISPLAY_DURATION: Duration = Duration::from_secs(2);
const COUNTDOWN_TICK_INTERVAL: Duration = Duration::from_millis(500);

pub const COUNTDOWN_START: u8 = 3;

pub const CONNECTIVITY_ERROR_TEXT: &str = "Error connecting to server";
pub const RESET_ERROR_TEXT: &str = "Error resetting statistics";
pub const RESET_SUCCESS_TEXT: &str = "Statistics reset successfully!";

/// Presentation seam for the controller. A frontend implements this once and
/// the controller never touches anything display-specific directly.
pub trait GameView: Send + Sync + 'static {
    fn render_hands(&self, player: Choice, computer: Choice);
    /// Both hands back to the closed-fist pose shown between rounds.
    fn render_neutral_hands(&self);
    fn set_shaking(&self, shaking: bool);
    fn set_inputs_enabled(&self, enabled: bool);
    fn clear_result(&self);
    fn render_result(&self, outcome: Outcome);
    fn render_message(&self, text: &str);
    fn render_error(&self, text: &str);
    fn render_stats(&self, stats: &StatsSnapshot);
    fn render_streak(&self, current: u32, best: u32);
    fn show_combo_effect(&self, multiplier: u32);
    fn clear_combo_effect(&self);
    fn countdown_tick(&self, remaining: u8);
    fn clear_countdown(&self);
    /// Blocking yes/no prompt guarding the stats reset.
    fn confirm_reset(&self) -> bool;
}

/// The scoring backend as the client sees it. The server owns outcome
/// resolution and the statistics store; this trait only mirrors its
/// HTTP contract.
#[async_trait]
pub trait GameBackend: Send + Sync {
    async fn fetch_stats(&self) -> Result<StatsSnapshot>;
    async fn play(&self, choice: Choice) -> Result<PlayResponse>;
    async fn reset(&self) -> Result<ResetResponse>;
}

pub struct HttpGameBackend {
    http: Client,
    server_url: String,
}

impl HttpGameBackend {
    pub fn new(server_url: impl Into<String>) -> Result<Self> {
        let server_url = server_url.into().trim_end_matches('/').to_string();
        Url::parse(&server_url).with_context(|| format!("invalid server url '{server_url}'"))?;
        Ok(Self {
            http: Client::new(),
            server_url,
        })
    }

    /// Recent rounds from the backend's history table. Not part of the
    /// [`GameBackend`] seam because the play cycle never needs it; frontends
    /// call it directly for their history listings.
    pub async fn fetch_history(&self, limit: u32) -> Result<Vec<HistoryEntry>> {
        let res = self
            .http
            .get(format!("{}/api/history", self.server_url))
            .query(&[("limit", limit)])
            .send()
            .await?
            .error_for_status()?;
        Ok(res.json().await?)
    }
}

#[async_trait]
impl GameBackend for HttpGameBackend {
    async fn fetch_stats(&self) -> Result<StatsSnapshot> {
        let res = self
            .http
            .get(format!("{}/api/stats", self.server_url))
            .send()
            .await?
            .error_for_status()?;
        Ok(res.json().await?)
    }

    async fn play(&self, choice: Choice) -> Result<PlayResponse> {
        let res = self
            .http
            .post(format!("{}/api/play", self.server_url))
            .json(&PlayRequest { choice })
            .send()
            .await?
            .error_for_status()?;
        Ok(res.json().await?)
    }

    async fn reset(&self) -> Result<ResetResponse> {
        let res = self
            .http
            .post(format!("{}/api/reset", self.server_url))
            .send()
            .await?
            .error_for_status()?;
        Ok(res.json().await?)
    }
}

/// Durations of the timed presentation phases. Tests zero them out.
#[derive(Debug, Clone, Copy)]
pub struct AnimationTimings {
    pub shake: Duration,
    pub combo_display: Duration,
    pub countdown_tick: Duration,
}

impl Default for AnimationTimings {
    fn default() -> Self {
        Self {
            shake: SHAKE_DURATION,
            combo_display: COMBO_DISPLAY_DURATION,
            countdown_tick: COUNTDOWN_TICK_INTERVAL,
        }
    }
}

impl AnimationTimings {
    pub fn instant() -> Self {
        Self {
            shake: Duration::ZERO,
            combo_display: Duration::ZERO,
            countdown_tick: Duration::ZERO,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PlayPhase {
    #[default]
    Idle,
    Animating,
    AwaitingResult,
}

#[derive(Default)]
struct ControllerState {
    phase: PlayPhase,
    streak: StreakTracker,
}

/// Orchestrates one play cycle at a time: animate, request, render.
///
/// The busy flag is a reentrancy guard, not a lock: it is checked and set
/// before the first suspension point, and overlapping play attempts are
/// dropped rather than queued.
pub struct InteractionController<V: GameView> {
    backend: Arc<dyn GameBackend>,
    view: Arc<V>,
    timings: AnimationTimings,
    busy: AtomicBool,
    inner: Mutex<ControllerState>,
}

impl<V: GameView> InteractionController<V> {
    pub fn new(backend: Arc<dyn GameBackend>, view: Arc<V>, timings: AnimationTimings) -> Arc<Self> {
        Arc::new(Self {
            backend,
            view,
            timings,
            busy: AtomicBool::new(false),
            inner: Mutex::new(ControllerState::default()),
        })
    }

    pub fn is_busy(&self) -> bool {
        self.busy.load(Ordering::SeqCst)
    }

    pub async fn phase(&self) -> PlayPhase {
        self.inner.lock().await.phase
    }

    pub async fn streak(&self) -> StreakSnapshot {
        self.inner.lock().await.streak.snapshot()
    }

    /// Fetches the current snapshot so the display is populated on startup.
    pub async fn refresh_stats(&self) {
        match self.backend.fetch_stats().await {
            Ok(stats) => self.view.render_stats(&stats),
            Err(err) => {
                error!(%err, "failed to load stats");
                self.view.render_error(CONNECTIVITY_ERROR_TEXT);
            }
        }
    }

    /// Runs one full round. Silently ignored while another round is in
    /// flight. The busy flag is released on success and failure alike.
    pub async fn play_round(&self, choice: Choice) {
        if self
            .busy
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .is_err()
        {
            debug!(%choice, "round already in progress; ignoring play request");
            return;
        }

        self.set_phase(PlayPhase::Animating).await;
        self.view.set_inputs_enabled(false);
        self.view.render_neutral_hands();
        self.view.clear_result();
        self.view.set_shaking(true);
        tokio::time::sleep(self.timings.shake).await;
        self.view.set_shaking(false);

        self.set_phase(PlayPhase::AwaitingResult).await;
        match self.backend.play(choice).await {
            Ok(round) => {
                self.view.render_hands(round.player_choice, round.computer_choice);
                self.view.render_result(round.result);
                self.view.render_stats(&round.stats);
                self.apply_outcome(round.result).await;
            }
            Err(err) => {
                error!(%err, "play request failed");
                self.view.render_error(CONNECTIVITY_ERROR_TEXT);
            }
        }

        self.set_phase(PlayPhase::Idle).await;
        self.view.set_inputs_enabled(true);
        self.busy.store(false, Ordering::SeqCst);
    }

    /// Asks for confirmation, then resets the backend counters. The local
    /// streak state is deliberately left alone.
    pub async fn reset_stats(&self) {
        if !self.view.confirm_reset() {
            debug!("stats reset cancelled at the confirmation prompt");
            return;
        }

        match self.backend.reset().await {
            Ok(response) => {
                self.view.render_stats(&response.stats);
                self.view.render_neutral_hands();
                self.view.render_message(RESET_SUCCESS_TEXT);
            }
            Err(err) => {
                error!(%err, "reset request failed");
                self.view.render_error(RESET_ERROR_TEXT);
            }
        }
    }

    async fn apply_outcome(&self, outcome: Outcome) {
        let update = {
            let mut state = self.inner.lock().await;
            state.streak.record(outcome)
        };

        self.view.render_streak(update.current_streak, update.best_streak);

        if update.combo_triggered {
            self.view.show_combo_effect(update.combo_multiplier);
            let view = Arc::clone(&self.view);
            let linger = self.timings.combo_display;
            tokio::spawn(async move {
                tokio::time::sleep(linger).await;
                view.clear_combo_effect();
            });
        }
    }

    async fn set_phase(&self, phase: PlayPhase) {
        self.inner.lock().await.phase = phase;
    }
}

/// 3-2-1 overlay paced by fixed intervals. Each tick goes through the view,
/// which may pair it with a feedback cue. Independent of outcome resolution,
/// so frontends can run it wherever a pre-roll fits.
pub async fn show_countdown<V: GameView>(view: &V, tick_interval: Duration) {
    for remaining in (1..=COUNTDOWN_START).rev() {
        view.countdown_tick(remaining);
        tokio::time::sleep(tick_interval).await;
    }
    view.clear_countdown();
}

#[cfg(test)]
#[path = "tests/lib_tests.rs"]
mod tests;
