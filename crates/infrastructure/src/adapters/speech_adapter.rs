//! Synthesis port adapter over the tiered synthesizer

use std::sync::Arc;

use ai_speech::{
    EdgeTtsProvider, ElevenLabsProvider, OrpheusProvider, ProviderTier, SpeechConfig, SpeechError,
    SpeechSynthesizer, TieredSynthesizer,
};
use application::{ApplicationError, SynthesisPort, SynthesisTier, SynthesizedSpeech};
use async_trait::async_trait;
use domain::EmotionTag;

/// Adapter exposing the tiered synthesizer through `SynthesisPort`
#[derive(Debug)]
pub struct TieredSpeechAdapter {
    inner: TieredSynthesizer,
}

const fn to_port_tier(tier: ProviderTier) -> SynthesisTier {
    match tier {
        ProviderTier::Primary => SynthesisTier::Primary,
        ProviderTier::Secondary => SynthesisTier::Secondary,
        ProviderTier::Tertiary => SynthesisTier::Tertiary,
    }
}

impl TieredSpeechAdapter {
    /// Wrap an existing synthesizer
    #[must_use]
    pub const fn new(inner: TieredSynthesizer) -> Self {
        Self { inner }
    }

    /// Build the full tier stack from configuration
    ///
    /// Tiers appear in fixed priority order - Orpheus, Edge, ElevenLabs -
    /// with unconfigured tiers left out of the walk.
    ///
    /// # Errors
    ///
    /// Returns `SpeechError::Configuration` when a configured provider is
    /// invalid or no tier remains.
    pub fn from_config(config: &SpeechConfig) -> Result<Self, SpeechError> {
        let mut tiers: Vec<(ProviderTier, Arc<dyn SpeechSynthesizer>)> = Vec::new();

        if let Some(orpheus) = &config.orpheus {
            tiers.push((
                ProviderTier::Primary,
                Arc::new(OrpheusProvider::new(orpheus.clone())?),
            ));
        }
        if let Some(edge) = &config.edge {
            tiers.push((
                ProviderTier::Secondary,
                Arc::new(EdgeTtsProvider::new(edge.clone())?),
            ));
        }
        if let Some(eleven) = &config.eleven_labs {
            tiers.push((
                ProviderTier::Tertiary,
                Arc::new(ElevenLabsProvider::new(eleven.clone())?),
            ));
        }

        Ok(Self::new(TieredSynthesizer::new(tiers, config.reset_hour)?))
    }
}

#[async_trait]
impl SynthesisPort for TieredSpeechAdapter {
    async fn synthesize(
        &self,
        text: &str,
        emotion: EmotionTag,
    ) -> Result<SynthesizedSpeech, ApplicationError> {
        let output = self.inner.synthesize(text, emotion).await.map_err(|e| match e {
            SpeechError::AllTiersFailed => ApplicationError::SynthesisExhausted,
            other => ApplicationError::Synthesis(other.to_string()),
        })?;

        let format = output.audio.format();
        Ok(SynthesizedSpeech {
            audio: output.audio.into_data(),
            format,
            tier: to_port_tier(output.tier),
        })
    }

    fn reset_rate_limits(&self) {
        self.inner.reset_rate_limits();
    }

    fn last_used_tier(&self) -> Option<SynthesisTier> {
        self.inner.last_used_tier().map(to_port_tier)
    }
}
