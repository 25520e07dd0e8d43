//! Visual/gesture presence controller
//!
//! The three-level priority machine over the robot's indicator LEDs:
//! thinking > speaking > idle. Modeled as message passing into one owning
//! task instead of shared mutable state behind locks - every LED write
//! happens on that task, so the thinking pulse, the speaking color and the
//! background gesture loop can never race each other.
//!
//! Exits are acknowledged: `exit_speaking` resolves only after the owning
//! task has disarmed the animation ticks and restored the idle color, so a
//! caller that awaits it knows the speaking phase is fully over.

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use domain::{Gesture, LedColor, VisualState};
use tokio::sync::{mpsc, oneshot};
use tokio::time::MissedTickBehavior;
use tracing::{debug, warn};

use crate::ports::LedPort;
use crate::services::GestureDispatcher;

/// Tuning for the presence controller
#[derive(Debug, Clone)]
pub struct PresenceConfig {
    /// Steady color shown while idle
    pub idle_color: LedColor,
    /// Pulse color while thinking
    pub thinking_color: LedColor,
    /// Thinking pulse half-period
    pub pulse_interval: Duration,
    /// Background gesture polling granularity
    pub gesture_poll_interval: Duration,
    /// Per-tick probability of attempting a background gesture
    pub gesture_probability: f64,
    /// LED fade duration in seconds
    pub fade_seconds: f32,
}

impl Default for PresenceConfig {
    fn default() -> Self {
        Self {
            idle_color: LedColor::White,
            thinking_color: LedColor::Blue,
            pulse_interval: Duration::from_millis(600),
            gesture_poll_interval: Duration::from_secs(1),
            gesture_probability: 0.25,
            fade_seconds: 0.3,
        }
    }
}

enum PresenceCommand {
    EnterThinking,
    ExitThinking,
    EnterSpeaking {
        color: LedColor,
        ack: oneshot::Sender<bool>,
    },
    ExitSpeaking {
        ack: oneshot::Sender<()>,
    },
    Query {
        reply: oneshot::Sender<VisualState>,
    },
}

/// Handle to the presence task
///
/// Cheap to clone; all clones talk to the same owning task.
#[derive(Clone)]
pub struct PresenceHandle {
    tx: mpsc::Sender<PresenceCommand>,
}

impl fmt::Debug for PresenceHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PresenceHandle").finish_non_exhaustive()
    }
}

impl PresenceHandle {
    /// Enter the thinking state; always succeeds and preempts speaking
    pub async fn enter_thinking(&self) {
        self.send(PresenceCommand::EnterThinking).await;
    }

    /// Leave the thinking state, returning to idle
    pub async fn exit_thinking(&self) {
        self.send(PresenceCommand::ExitThinking).await;
    }

    /// Request the speaking state with an emotion color
    ///
    /// Returns `false` when the request was dropped because thinking is
    /// active - thinking always wins, and the request is not queued.
    pub async fn enter_speaking(&self, color: LedColor) -> bool {
        let (ack, rx) = oneshot::channel();
        self.send(PresenceCommand::EnterSpeaking { color, ack }).await;
        rx.await.unwrap_or(false)
    }

    /// Leave the speaking state
    ///
    /// Resolves once the owning task has stopped the background animation
    /// and restored the idle color. Idempotent: a second exit is a no-op.
    pub async fn exit_speaking(&self) {
        let (ack, rx) = oneshot::channel();
        self.send(PresenceCommand::ExitSpeaking { ack }).await;
        let _ = rx.await;
    }

    /// Current visual state, for operator tooling and UI indicators
    pub async fn state(&self) -> VisualState {
        let (reply, rx) = oneshot::channel();
        self.send(PresenceCommand::Query { reply }).await;
        rx.await.unwrap_or_default()
    }

    async fn send(&self, command: PresenceCommand) {
        if self.tx.send(command).await.is_err() {
            warn!("Presence task is gone, dropping command");
        }
    }
}

/// Spawns and owns the presence task
#[derive(Debug)]
pub struct PresenceController;

impl PresenceController {
    /// Spawn the owning task and return its handle
    pub fn spawn(
        leds: Arc<dyn LedPort>,
        gestures: Arc<GestureDispatcher>,
        config: PresenceConfig,
    ) -> PresenceHandle {
        let (tx, rx) = mpsc::channel(16);
        tokio::spawn(run(rx, leds, gestures, config));
        PresenceHandle { tx }
    }
}

async fn run(
    mut rx: mpsc::Receiver<PresenceCommand>,
    leds: Arc<dyn LedPort>,
    gestures: Arc<GestureDispatcher>,
    config: PresenceConfig,
) {
    let mut state = VisualState::Idle;
    let mut pulse_on = false;

    let mut pulse = tokio::time::interval(config.pulse_interval);
    pulse.set_missed_tick_behavior(MissedTickBehavior::Skip);
    let mut gesture_tick = tokio::time::interval(config.gesture_poll_interval);
    gesture_tick.set_missed_tick_behavior(MissedTickBehavior::Skip);

    fade(&leds, config.idle_color, config.fade_seconds).await;

    loop {
        tokio::select! {
            command = rx.recv() => {
                let Some(command) = command else {
                    // Every handle dropped; leave the LEDs idle and stop
                    fade(&leds, config.idle_color, config.fade_seconds).await;
                    break;
                };
                handle_command(command, &mut state, &mut pulse_on, &leds, &config).await;
            },
            _ = pulse.tick(), if state.is_thinking() => {
                pulse_on = !pulse_on;
                let color = if pulse_on { config.thinking_color } else { LedColor::Off };
                fade(&leds, color, config.fade_seconds).await;
            },
            _ = gesture_tick.tick(), if state.is_speaking() => {
                if rand::random::<f64>() < config.gesture_probability {
                    let gesture = pick_background_gesture();
                    gestures.try_fire_background(gesture).await;
                }
            },
        }
    }
}

async fn handle_command(
    command: PresenceCommand,
    state: &mut VisualState,
    pulse_on: &mut bool,
    leds: &Arc<dyn LedPort>,
    config: &PresenceConfig,
) {
    match command {
        PresenceCommand::EnterThinking => {
            debug!(from = ?*state, "Entering thinking");
            *state = VisualState::Thinking;
            *pulse_on = true;
            fade(leds, config.thinking_color, config.fade_seconds).await;
        },
        PresenceCommand::ExitThinking => {
            if state.is_thinking() {
                debug!("Exiting thinking");
                *state = VisualState::Idle;
                fade(leds, config.idle_color, config.fade_seconds).await;
            }
        },
        PresenceCommand::EnterSpeaking { color, ack } => {
            if state.is_thinking() {
                // Thinking outranks speaking; drop the request, never queue it
                debug!("Speaking request dropped, thinking holds the indicator");
                let _ = ack.send(false);
            } else {
                debug!(color = ?color, "Entering speaking");
                *state = VisualState::Speaking(color);
                fade(leds, color, config.fade_seconds).await;
                let _ = ack.send(true);
            }
        },
        PresenceCommand::ExitSpeaking { ack } => {
            if state.is_speaking() {
                debug!("Exiting speaking");
                *state = VisualState::Idle;
                fade(leds, config.idle_color, config.fade_seconds).await;
            }
            // Acked after the state change: the animation branches consult
            // the state on this same task, so the loop is provably stopped
            let _ = ack.send(());
        },
        PresenceCommand::Query { reply } => {
            let _ = reply.send(*state);
        },
    }
}

fn pick_background_gesture() -> Gesture {
    Gesture::BACKGROUND[rand::random_range(0..Gesture::BACKGROUND.len())]
}

async fn fade(leds: &Arc<dyn LedPort>, color: LedColor, seconds: f32) {
    // Best-effort: a failed LED write must never take down the task
    if let Err(e) = leds.fade(color, seconds).await {
        warn!(color = ?color, error = %e, "LED write failed");
    }
}
