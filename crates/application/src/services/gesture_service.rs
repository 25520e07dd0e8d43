//! Gesture dispatch with a shared cooldown
//!
//! Two kinds of gestures go through one dispatcher so they share a single
//! cooldown stamp: intentional gestures (fired at speech onset) always
//! execute, background gestures (the liveliness loop) are dropped while any
//! recent firing is still cooling down. Dropped, not queued - a queued
//! physical gesture executing late would desynchronize from speech that has
//! already moved on.

use std::fmt;
use std::sync::Arc;
use std::time::{Duration, Instant};

use domain::Gesture;
use parking_lot::Mutex;
use tracing::{debug, warn};

use crate::ports::GesturePort;

/// Cooldown-limited gesture dispatcher
pub struct GestureDispatcher {
    port: Arc<dyn GesturePort>,
    cooldown: Duration,
    last_fired: Mutex<Option<Instant>>,
}

impl fmt::Debug for GestureDispatcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GestureDispatcher")
            .field("cooldown", &self.cooldown)
            .finish_non_exhaustive()
    }
}

impl GestureDispatcher {
    /// Create a dispatcher over a gesture port
    pub fn new(port: Arc<dyn GesturePort>, cooldown: Duration) -> Self {
        Self {
            port,
            cooldown,
            last_fired: Mutex::new(None),
        }
    }

    /// Fire an intentional gesture
    ///
    /// Always executes, regardless of cooldown, and stamps the cooldown so
    /// the background loop stays quiet for the following window. Best-effort:
    /// robot errors are logged, never returned.
    pub async fn fire_intentional(&self, gesture: Gesture) {
        *self.last_fired.lock() = Some(Instant::now());
        debug!(gesture = %gesture, "Firing intentional gesture");

        if let Err(e) = self.port.run(gesture).await {
            warn!(gesture = %gesture, error = %e, "Intentional gesture failed");
        }
    }

    /// Try to fire a background gesture
    ///
    /// Dropped silently while any firing, intentional or background, is
    /// within the cooldown window. Returns whether the gesture fired.
    pub async fn try_fire_background(&self, gesture: Gesture) -> bool {
        {
            let mut last = self.last_fired.lock();
            if let Some(at) = *last {
                if at.elapsed() < self.cooldown {
                    debug!(gesture = %gesture, "Background gesture dropped, cooling down");
                    return false;
                }
            }
            *last = Some(Instant::now());
        }

        debug!(gesture = %gesture, "Firing background gesture");
        if let Err(e) = self.port.run(gesture).await {
            warn!(gesture = %gesture, error = %e, "Background gesture failed");
        }
        true
    }

    /// Whether a recent firing still blocks background gestures
    #[must_use]
    pub fn is_cooling_down(&self) -> bool {
        self.last_fired
            .lock()
            .is_some_and(|at| at.elapsed() < self.cooldown)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use async_trait::async_trait;
    use domain::Gesture;

    use super::*;
    use crate::error::ApplicationError;

    /// Gesture port that counts executions
    struct CountingGestures {
        count: AtomicUsize,
        fail: bool,
    }

    impl CountingGestures {
        fn new() -> Arc<Self> {
            Arc::new(Self {
                count: AtomicUsize::new(0),
                fail: false,
            })
        }

        fn failing() -> Arc<Self> {
            Arc::new(Self {
                count: AtomicUsize::new(0),
                fail: true,
            })
        }

        fn count(&self) -> usize {
            self.count.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl GesturePort for CountingGestures {
        async fn run(&self, _gesture: Gesture) -> Result<(), ApplicationError> {
            self.count.fetch_add(1, Ordering::SeqCst);
            if self.fail {
                Err(ApplicationError::Robot("joint stuck".to_string()))
            } else {
                Ok(())
            }
        }
    }

    #[tokio::test]
    async fn intentional_gesture_always_fires() {
        let port = CountingGestures::new();
        let dispatcher = GestureDispatcher::new(
            Arc::clone(&port) as Arc<dyn GesturePort>,
            Duration::from_secs(60),
        );

        dispatcher.fire_intentional(Gesture::Wave).await;
        dispatcher.fire_intentional(Gesture::Nod).await;

        // Cooldown does not apply to intentional gestures
        assert_eq!(port.count(), 2);
        assert!(dispatcher.is_cooling_down());
    }

    #[tokio::test]
    async fn background_gesture_is_dropped_during_cooldown() {
        let port = CountingGestures::new();
        let dispatcher = GestureDispatcher::new(
            Arc::clone(&port) as Arc<dyn GesturePort>,
            Duration::from_secs(60),
        );

        assert!(dispatcher.try_fire_background(Gesture::Explaining).await);
        assert!(!dispatcher.try_fire_background(Gesture::Nod).await);
        assert_eq!(port.count(), 1);
    }

    #[tokio::test]
    async fn intentional_firing_blocks_background() {
        let port = CountingGestures::new();
        let dispatcher = GestureDispatcher::new(
            Arc::clone(&port) as Arc<dyn GesturePort>,
            Duration::from_secs(60),
        );

        dispatcher.fire_intentional(Gesture::Excited).await;
        assert!(!dispatcher.try_fire_background(Gesture::Nod).await);
        assert_eq!(port.count(), 1);
    }

    #[tokio::test]
    async fn background_fires_after_the_window_passes() {
        let port = CountingGestures::new();
        let dispatcher = GestureDispatcher::new(
            Arc::clone(&port) as Arc<dyn GesturePort>,
            Duration::from_millis(20),
        );

        assert!(dispatcher.try_fire_background(Gesture::Nod).await);
        tokio::time::sleep(Duration::from_millis(40)).await;
        assert!(!dispatcher.is_cooling_down());
        assert!(dispatcher.try_fire_background(Gesture::Point).await);
        assert_eq!(port.count(), 2);
    }

    #[tokio::test]
    async fn robot_failure_is_swallowed() {
        let port = CountingGestures::failing();
        let dispatcher = GestureDispatcher::new(
            Arc::clone(&port) as Arc<dyn GesturePort>,
            Duration::from_secs(60),
        );

        // Neither call panics or returns an error; the failure is logged
        dispatcher.fire_intentional(Gesture::Wave).await;
        assert_eq!(port.count(), 1);
    }
}
