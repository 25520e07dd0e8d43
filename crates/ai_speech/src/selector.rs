//! Tiered fallback selector
//!
//! Walks the synthesis tiers in fixed priority order, skipping any tier whose
//! quota is exhausted, and only accepts output that passes the container
//! validity check. Tier order is configuration-driven and never re-ranked at
//! runtime by latency or history.
//!
//! Rate-limit bookkeeping:
//! - a `RateLimited` provider error flags the tier and arms a one-shot reset
//!   timer for the next daily boundary (at most one timer at a time)
//! - `reset_rate_limits` clears every flag immediately for operator-triggered
//!   recovery, independent of the timer

use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Local, LocalResult, NaiveTime, Utc};
use domain::EmotionTag;
use parking_lot::Mutex;
use tracing::{debug, info, instrument, warn};

use crate::error::SpeechError;
use crate::ports::SpeechSynthesizer;
use crate::types::{ProviderTier, SynthesisOutput};
use crate::validity;

/// Rate-limit state of one tier
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TierState {
    /// The tier is skipped while this is set
    pub rate_limited: bool,
    /// When the armed reset will clear the flag, if one is armed
    pub reset_at: Option<DateTime<Utc>>,
}

/// Flag storage shared between the selector and its reset timer
///
/// Every mutation funnels through these methods; nothing else touches the
/// flags.
#[derive(Debug, Default)]
struct TierStates {
    inner: Mutex<TierStatesInner>,
}

#[derive(Debug, Default)]
struct TierStatesInner {
    tiers: [TierState; 3],
    reset_scheduled: bool,
}

impl TierStates {
    fn is_rate_limited(&self, tier: ProviderTier) -> bool {
        self.inner.lock().tiers[tier.index()].rate_limited
    }

    /// Flag a tier; returns `true` when the caller must arm the reset timer
    fn mark_rate_limited(&self, tier: ProviderTier, reset_at: DateTime<Utc>) -> bool {
        let mut inner = self.inner.lock();
        let state = &mut inner.tiers[tier.index()];
        state.rate_limited = true;
        state.reset_at = Some(reset_at);

        if inner.reset_scheduled {
            false
        } else {
            inner.reset_scheduled = true;
            true
        }
    }

    /// Clear every flag; idempotent
    fn reset_all(&self) {
        let mut inner = self.inner.lock();
        for state in &mut inner.tiers {
            state.rate_limited = false;
            state.reset_at = None;
        }
        inner.reset_scheduled = false;
    }

    fn snapshot(&self) -> [TierState; 3] {
        self.inner.lock().tiers
    }
}

/// The next occurrence of `hour:00:00` strictly after `now`
fn next_daily_boundary(now: DateTime<Local>, hour: u32) -> DateTime<Local> {
    let boundary_time = NaiveTime::from_hms_opt(hour, 0, 0).unwrap_or(NaiveTime::MIN);
    let mut naive = now.date_naive().and_time(boundary_time);
    if now.time() >= boundary_time {
        naive += chrono::Duration::days(1);
    }

    match naive.and_local_timezone(Local) {
        LocalResult::Single(dt) | LocalResult::Ambiguous(dt, _) => dt,
        // DST gap at the boundary; a day from now is close enough
        LocalResult::None => now + chrono::Duration::days(1),
    }
}

/// Priority-ordered synthesis over up to three back-ends
pub struct TieredSynthesizer {
    tiers: Vec<(ProviderTier, Arc<dyn SpeechSynthesizer>)>,
    states: Arc<TierStates>,
    reset_hour: u32,
    last_used: Mutex<Option<ProviderTier>>,
}

impl std::fmt::Debug for TieredSynthesizer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let names: Vec<&str> = self.tiers.iter().map(|(_, p)| p.name()).collect();
        f.debug_struct("TieredSynthesizer")
            .field("tiers", &names)
            .field("reset_hour", &self.reset_hour)
            .finish_non_exhaustive()
    }
}

impl TieredSynthesizer {
    /// Create a selector over the given tiers, in priority order
    ///
    /// # Errors
    ///
    /// Returns `SpeechError::Configuration` if no tier is given or the reset
    /// hour is out of range.
    pub fn new(
        tiers: Vec<(ProviderTier, Arc<dyn SpeechSynthesizer>)>,
        reset_hour: u32,
    ) -> Result<Self, SpeechError> {
        if tiers.is_empty() {
            return Err(SpeechError::Configuration(
                "At least one synthesis tier must be configured".to_string(),
            ));
        }
        if reset_hour >= 24 {
            return Err(SpeechError::Configuration(format!(
                "Reset hour must be 0-23, got {reset_hour}"
            )));
        }

        info!(
            tiers = ?tiers.iter().map(|(t, p)| format!("{t}:{}", p.name())).collect::<Vec<_>>(),
            reset_hour,
            "Tiered synthesizer initialized"
        );

        Ok(Self {
            tiers,
            states: Arc::new(TierStates::default()),
            reset_hour,
            last_used: Mutex::new(None),
        })
    }

    /// Synthesize `text`, falling through the tiers on failure
    ///
    /// # Errors
    ///
    /// Returns `SpeechError::AllTiersFailed` when every tier was skipped,
    /// failed, or produced invalid audio. Individual provider errors are
    /// absorbed here and only logged.
    #[instrument(skip(self, text), fields(text_len = text.len(), emotion = %emotion))]
    pub async fn synthesize(
        &self,
        text: &str,
        emotion: EmotionTag,
    ) -> Result<SynthesisOutput, SpeechError> {
        for (tier, provider) in &self.tiers {
            if self.states.is_rate_limited(*tier) {
                debug!(tier = %tier, provider = provider.name(), "Skipping rate-limited tier");
                continue;
            }

            match provider.synthesize(text, emotion).await {
                Ok(audio) => {
                    if !validity::is_valid(audio.data(), audio.format()) {
                        warn!(
                            tier = %tier,
                            provider = provider.name(),
                            size = audio.size_bytes(),
                            "Discarding audio with invalid container signature"
                        );
                        continue;
                    }

                    info!(tier = %tier, provider = provider.name(), "Synthesis succeeded");
                    *self.last_used.lock() = Some(*tier);
                    return Ok(SynthesisOutput { audio, tier: *tier });
                },
                Err(SpeechError::RateLimited) => {
                    self.flag_rate_limited(*tier, provider.name());
                },
                Err(e) => {
                    // Transient by policy: no flag, the tier gets retried on
                    // the next utterance.
                    warn!(tier = %tier, provider = provider.name(), error = %e, "Provider failed, trying next tier");
                },
            }
        }

        warn!("All synthesis tiers exhausted");
        Err(SpeechError::AllTiersFailed)
    }

    /// Clear all rate-limit flags immediately
    ///
    /// Operator-triggered recovery; safe to call repeatedly.
    pub fn reset_rate_limits(&self) {
        info!("Manually clearing all rate-limit flags");
        self.states.reset_all();
    }

    /// The tier that produced the most recent successful synthesis
    #[must_use]
    pub fn last_used_tier(&self) -> Option<ProviderTier> {
        *self.last_used.lock()
    }

    /// Current rate-limit state per configured tier
    #[must_use]
    pub fn tier_snapshot(&self) -> Vec<(ProviderTier, TierState)> {
        let states = self.states.snapshot();
        self.tiers
            .iter()
            .map(|(tier, _)| (*tier, states[tier.index()]))
            .collect()
    }

    fn flag_rate_limited(&self, tier: ProviderTier, provider_name: &str) {
        let now = Local::now();
        let boundary = next_daily_boundary(now, self.reset_hour);
        let reset_at = boundary.with_timezone(&Utc);

        warn!(
            tier = %tier,
            provider = provider_name,
            reset_at = %reset_at,
            "Provider rate limited, flagging tier until next reset"
        );

        if self.states.mark_rate_limited(tier, reset_at) {
            let delay = (boundary - now)
                .to_std()
                .unwrap_or(Duration::from_secs(1));
            self.arm_reset_timer(delay);
        }
    }

    fn arm_reset_timer(&self, delay: Duration) {
        let states = Arc::clone(&self.states);
        debug!(delay_s = delay.as_secs(), "Arming rate-limit reset timer");

        tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            info!("Scheduled rate-limit reset reached, clearing all tier flags");
            states.reset_all();
        });
    }
}

#[cfg(test)]
mod tests {
    use std::collections::VecDeque;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use async_trait::async_trait;
    use domain::AudioFormat;

    use super::*;
    use crate::types::AudioData;

    /// Provider that replays a scripted response sequence
    struct ScriptedProvider {
        name: &'static str,
        responses: Mutex<VecDeque<Result<AudioData, SpeechError>>>,
        calls: AtomicUsize,
    }

    impl ScriptedProvider {
        fn new(
            name: &'static str,
            responses: Vec<Result<AudioData, SpeechError>>,
        ) -> Arc<Self> {
            Arc::new(Self {
                name,
                responses: Mutex::new(responses.into()),
                calls: AtomicUsize::new(0),
            })
        }

        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl SpeechSynthesizer for ScriptedProvider {
        async fn synthesize(
            &self,
            _text: &str,
            _emotion: EmotionTag,
        ) -> Result<AudioData, SpeechError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.responses
                .lock()
                .pop_front()
                .unwrap_or_else(|| Ok(valid_wav()))
        }

        fn output_format(&self) -> AudioFormat {
            AudioFormat::Wav
        }

        fn name(&self) -> &'static str {
            self.name
        }
    }

    fn valid_wav() -> AudioData {
        let mut data = b"RIFF".to_vec();
        data.extend_from_slice(&[0, 0, 0, 0]);
        data.extend_from_slice(b"WAVEfmt ");
        data.resize(256, 0);
        AudioData::new(data, AudioFormat::Wav)
    }

    fn garbage_wav() -> AudioData {
        AudioData::new(vec![0x41; 256], AudioFormat::Wav)
    }

    fn two_tiers(
        primary: Arc<ScriptedProvider>,
        secondary: Arc<ScriptedProvider>,
    ) -> TieredSynthesizer {
        TieredSynthesizer::new(
            vec![
                (ProviderTier::Primary, primary as Arc<dyn SpeechSynthesizer>),
                (ProviderTier::Secondary, secondary as Arc<dyn SpeechSynthesizer>),
            ],
            0,
        )
        .unwrap()
    }

    #[test]
    fn rejects_empty_tier_list() {
        let result = TieredSynthesizer::new(vec![], 0);
        assert!(matches!(result, Err(SpeechError::Configuration(_))));
    }

    #[test]
    fn rejects_invalid_reset_hour() {
        let provider = ScriptedProvider::new("p", vec![]) as Arc<dyn SpeechSynthesizer>;
        let result = TieredSynthesizer::new(vec![(ProviderTier::Primary, provider)], 24);
        assert!(matches!(result, Err(SpeechError::Configuration(_))));
    }

    #[tokio::test]
    async fn first_tier_success_stops_the_walk() {
        let primary = ScriptedProvider::new("primary", vec![Ok(valid_wav())]);
        let secondary = ScriptedProvider::new("secondary", vec![]);
        let selector = two_tiers(Arc::clone(&primary), Arc::clone(&secondary));

        let output = selector.synthesize("hello", EmotionTag::Neutral).await.unwrap();

        assert_eq!(output.tier, ProviderTier::Primary);
        assert_eq!(primary.calls(), 1);
        assert_eq!(secondary.calls(), 0);
        assert_eq!(selector.last_used_tier(), Some(ProviderTier::Primary));
    }

    #[tokio::test]
    async fn rate_limited_tier_is_flagged_and_skipped_next_time() {
        let primary = ScriptedProvider::new("primary", vec![Err(SpeechError::RateLimited)]);
        let secondary = ScriptedProvider::new("secondary", vec![]);
        let selector = two_tiers(Arc::clone(&primary), Arc::clone(&secondary));

        let output = selector.synthesize("hello", EmotionTag::Neutral).await.unwrap();
        assert_eq!(output.tier, ProviderTier::Secondary);

        // Second call in the same reset window: tier 1 never attempted
        let output = selector.synthesize("again", EmotionTag::Neutral).await.unwrap();
        assert_eq!(output.tier, ProviderTier::Secondary);
        assert_eq!(primary.calls(), 1);
        assert_eq!(secondary.calls(), 2);

        let snapshot = selector.tier_snapshot();
        assert!(snapshot[0].1.rate_limited);
        assert!(snapshot[0].1.reset_at.is_some());
        assert!(!snapshot[1].1.rate_limited);
    }

    #[tokio::test]
    async fn transient_error_does_not_flag_the_tier() {
        let primary = ScriptedProvider::new(
            "primary",
            vec![Err(SpeechError::Transient("blip".to_string()))],
        );
        let secondary = ScriptedProvider::new("secondary", vec![]);
        let selector = two_tiers(Arc::clone(&primary), Arc::clone(&secondary));

        let output = selector.synthesize("hello", EmotionTag::Neutral).await.unwrap();
        assert_eq!(output.tier, ProviderTier::Secondary);

        // The tier gets retried on the next utterance
        let output = selector.synthesize("again", EmotionTag::Neutral).await.unwrap();
        assert_eq!(output.tier, ProviderTier::Primary);
        assert_eq!(primary.calls(), 2);
    }

    #[tokio::test]
    async fn invalid_audio_is_treated_as_failure() {
        let primary = ScriptedProvider::new("primary", vec![Ok(garbage_wav())]);
        let secondary = ScriptedProvider::new("secondary", vec![]);
        let selector = two_tiers(Arc::clone(&primary), Arc::clone(&secondary));

        let output = selector.synthesize("hello", EmotionTag::Neutral).await.unwrap();

        assert_eq!(output.tier, ProviderTier::Secondary);
        assert_eq!(primary.calls(), 1);
        // Invalid output is a failure, not a rate limit
        assert!(!selector.tier_snapshot()[0].1.rate_limited);
    }

    #[tokio::test]
    async fn exhausting_all_tiers_returns_total_failure() {
        let primary = ScriptedProvider::new("primary", vec![Err(SpeechError::RateLimited)]);
        let secondary = ScriptedProvider::new(
            "secondary",
            vec![Err(SpeechError::Transient("down".to_string()))],
        );
        let tertiary = ScriptedProvider::new("tertiary", vec![Err(SpeechError::RateLimited)]);
        let selector = TieredSynthesizer::new(
            vec![
                (ProviderTier::Primary, primary as Arc<dyn SpeechSynthesizer>),
                (ProviderTier::Secondary, secondary as Arc<dyn SpeechSynthesizer>),
                (ProviderTier::Tertiary, tertiary as Arc<dyn SpeechSynthesizer>),
            ],
            0,
        )
        .unwrap();

        let err = selector
            .synthesize("hello", EmotionTag::Neutral)
            .await
            .unwrap_err();
        assert!(matches!(err, SpeechError::AllTiersFailed));
        assert_eq!(selector.last_used_tier(), None);
    }

    #[tokio::test]
    async fn manual_reset_clears_flags_and_is_idempotent() {
        let primary = ScriptedProvider::new("primary", vec![Err(SpeechError::RateLimited)]);
        let secondary = ScriptedProvider::new("secondary", vec![]);
        let selector = two_tiers(Arc::clone(&primary), Arc::clone(&secondary));

        selector.synthesize("hello", EmotionTag::Neutral).await.unwrap();
        assert!(selector.tier_snapshot()[0].1.rate_limited);

        selector.reset_rate_limits();
        selector.reset_rate_limits(); // Redundant reset must not error or re-flag

        let snapshot = selector.tier_snapshot();
        assert!(snapshot.iter().all(|(_, s)| !s.rate_limited && s.reset_at.is_none()));

        // Tier 1 is attempted again after the reset
        let output = selector.synthesize("again", EmotionTag::Neutral).await.unwrap();
        assert_eq!(output.tier, ProviderTier::Primary);
        assert_eq!(primary.calls(), 2);
    }

    #[tokio::test]
    async fn skips_directly_to_later_tiers_when_earlier_are_flagged() {
        let primary = ScriptedProvider::new("primary", vec![Err(SpeechError::RateLimited)]);
        let secondary = ScriptedProvider::new("secondary", vec![Err(SpeechError::RateLimited)]);
        let tertiary = ScriptedProvider::new("tertiary", vec![]);
        let selector = TieredSynthesizer::new(
            vec![
                (ProviderTier::Primary, Arc::clone(&primary) as Arc<dyn SpeechSynthesizer>),
                (ProviderTier::Secondary, Arc::clone(&secondary) as Arc<dyn SpeechSynthesizer>),
                (ProviderTier::Tertiary, Arc::clone(&tertiary) as Arc<dyn SpeechSynthesizer>),
            ],
            0,
        )
        .unwrap();

        let output = selector.synthesize("hello", EmotionTag::Neutral).await.unwrap();
        assert_eq!(output.tier, ProviderTier::Tertiary);

        let output = selector.synthesize("again", EmotionTag::Neutral).await.unwrap();
        assert_eq!(output.tier, ProviderTier::Tertiary);
        assert_eq!(primary.calls(), 1);
        assert_eq!(secondary.calls(), 1);
        assert_eq!(tertiary.calls(), 2);
    }

    mod boundary {
        use chrono::TimeZone;

        use super::*;

        fn local(y: i32, mo: u32, d: u32, h: u32, mi: u32) -> DateTime<Local> {
            Local.with_ymd_and_hms(y, mo, d, h, mi, 0).unwrap()
        }

        #[test]
        fn before_the_hour_resolves_to_today() {
            let now = local(2025, 6, 1, 2, 30);
            let boundary = next_daily_boundary(now, 4);
            assert_eq!(boundary, local(2025, 6, 1, 4, 0));
        }

        #[test]
        fn at_or_after_the_hour_resolves_to_tomorrow() {
            let now = local(2025, 6, 1, 4, 0);
            let boundary = next_daily_boundary(now, 4);
            assert_eq!(boundary, local(2025, 6, 2, 4, 0));

            let now = local(2025, 6, 1, 23, 59);
            let boundary = next_daily_boundary(now, 4);
            assert_eq!(boundary, local(2025, 6, 2, 4, 0));
        }

        #[test]
        fn midnight_boundary_is_always_tomorrow() {
            let now = local(2025, 6, 1, 0, 0);
            let boundary = next_daily_boundary(now, 0);
            assert_eq!(boundary, local(2025, 6, 2, 0, 0));

            let now = local(2025, 6, 1, 18, 45);
            let boundary = next_daily_boundary(now, 0);
            assert_eq!(boundary, local(2025, 6, 2, 0, 0));
        }

        #[test]
        fn boundary_is_strictly_in_the_future() {
            let now = local(2025, 3, 15, 11, 11);
            for hour in 0..24 {
                assert!(next_daily_boundary(now, hour) > now, "hour {hour}");
            }
        }
    }
}
