//! Background music and decorative effects.
//!
//! [`AudioChannel`] is the only owner of the audio output. It holds playback back
//! until the first user gesture, keeps at most one looping track audible, and
//! swallows every backend failure so the story degrades to silence instead of
//! stopping.

pub mod synth;
pub mod unlock;

pub use synth::{EFFECT_SAMPLE_RATE, EffectBuffer, EffectKind, render_pop, render_transition};
pub use unlock::{UnlockGate, UnlockSource};

use crate::catalog::{AudioAsset, Track};
use crate::config::AudioConfig;
use crate::error::AudioError;
use rand::SeedableRng;
use rand::rngs::StdRng;
use std::time::Duration;
use tracing::{debug, info, warn};

/// What the backend is asked to loop
#[derive(Debug, Clone, PartialEq)]
pub struct LoopRequest {
    pub asset: AudioAsset,
    pub start_offset: Duration,
    pub volume: f32,
    pub muted: bool,
}

/// The platform audio output.
///
/// Implementations play one looping element at a time and fire-and-forget
/// effect buffers. Errors are reported, never panicked on.
pub trait AudioBackend {
    /// Resume the output after the unlock gesture (e.g. a suspended audio context)
    ///
    /// # Errors
    ///
    /// Returns an error if the output cannot be resumed.
    fn resume(&mut self) -> Result<(), AudioError>;

    /// Start looping an asset, replacing nothing; the caller stops first.
    ///
    /// # Errors
    ///
    /// Returns an error if the asset is missing or playback is refused.
    fn start_loop(&mut self, request: &LoopRequest) -> Result<(), AudioError>;

    /// Stop and release the current loop immediately
    fn stop(&mut self);

    /// Whether `asset` is the loop currently sounding
    fn is_playing(&self, asset: &AudioAsset) -> bool;

    /// Mute or unmute the current loop without restarting it
    fn set_muted(&mut self, muted: bool);

    /// Play a rendered one-shot effect
    ///
    /// # Errors
    ///
    /// Returns an error if effects cannot be played on this output.
    fn play_effect(&mut self, effect: &EffectBuffer) -> Result<(), AudioError>;
}

/// Track request waiting for the unlock gesture
#[derive(Debug, Clone, PartialEq)]
pub struct PendingRequest {
    pub asset: AudioAsset,
    pub start_offset: Duration,
}

/// Gate, track switcher and effect player in front of an [`AudioBackend`]
pub struct AudioChannel {
    backend: Box<dyn AudioBackend>,
    unlocked: bool,
    pending: Option<PendingRequest>,
    active: Option<AudioAsset>,
    muted: bool,
    volume: f32,
    rng: StdRng,
}

impl AudioChannel {
    #[must_use]
    pub fn new(backend: Box<dyn AudioBackend>, config: &AudioConfig) -> Self {
        Self {
            backend,
            unlocked: false,
            pending: None,
            active: None,
            muted: config.start_muted,
            volume: config.volume,
            rng: StdRng::seed_from_u64(config.effects_seed),
        }
    }

    #[must_use]
    pub const fn is_unlocked(&self) -> bool {
        self.unlocked
    }

    #[must_use]
    pub const fn is_muted(&self) -> bool {
        self.muted
    }

    #[must_use]
    pub const fn active_asset(&self) -> Option<&AudioAsset> {
        self.active.as_ref()
    }

    #[must_use]
    pub const fn pending(&self) -> Option<&PendingRequest> {
        self.pending.as_ref()
    }

    /// Open the gate. Only the first call does anything; it returns `true`.
    pub fn request_unlock(&mut self) -> bool {
        if self.unlocked {
            return false;
        }
        self.unlocked = true;
        info!("Audio unlocked");

        if let Err(e) = self.backend.resume() {
            warn!("Failed to resume audio output: {e}");
        }

        if let Some(pending) = self.pending.take() {
            debug!("Playing queued track {}", pending.asset);
            self.start(pending.asset, pending.start_offset);
        }
        true
    }

    /// Convenience for catalog tracks
    pub fn play(&mut self, track: &Track) {
        self.play_track(&track.asset, track.start_offset());
    }

    /// Switch the background loop to `asset`, or queue it while locked.
    pub fn play_track(&mut self, asset: &AudioAsset, start_offset: Duration) {
        if !self.unlocked {
            if let Some(dropped) = self.pending.replace(PendingRequest {
                asset: asset.clone(),
                start_offset,
            }) {
                debug!("Replacing queued track {} with {asset}", dropped.asset);
            }
            return;
        }

        if self.active.as_ref() == Some(asset) && self.backend.is_playing(asset) {
            return;
        }

        self.start(asset.clone(), start_offset);
    }

    fn start(&mut self, asset: AudioAsset, start_offset: Duration) {
        if let Some(previous) = self.active.take() {
            debug!("Stopping {previous}");
            self.backend.stop();
        }

        let request = LoopRequest {
            asset,
            start_offset,
            volume: self.volume,
            muted: self.muted,
        };

        match self.backend.start_loop(&request) {
            Ok(()) => {
                info!(
                    "Playing {} from {:.1}s",
                    request.asset,
                    request.start_offset.as_secs_f64()
                );
                self.active = Some(request.asset);
            }
            Err(e) => {
                warn!("Continuing without music: {e}");
            }
        }
    }

    pub fn set_muted(&mut self, muted: bool) {
        if self.muted == muted {
            return;
        }
        self.muted = muted;
        if self.active.is_some() {
            self.backend.set_muted(muted);
        }
        debug!("Audio {}", if muted { "muted" } else { "unmuted" });
    }

    /// Flip mute; returns the new state
    pub fn toggle_muted(&mut self) -> bool {
        self.set_muted(!self.muted);
        self.muted
    }

    pub fn play_transition_sound(&mut self) {
        if !self.effects_allowed() {
            return;
        }
        let effect = render_transition(EFFECT_SAMPLE_RATE, &mut self.rng);
        self.play_effect(&effect);
    }

    pub fn play_pop_sound(&mut self) {
        if !self.effects_allowed() {
            return;
        }
        let effect = render_pop(EFFECT_SAMPLE_RATE);
        self.play_effect(&effect);
    }

    const fn effects_allowed(&self) -> bool {
        self.unlocked && !self.muted
    }

    fn play_effect(&mut self, effect: &EffectBuffer) {
        if let Err(e) = self.backend.play_effect(effect) {
            debug!("Skipping {:?} effect: {e}", effect.kind);
        }
    }
}

impl std::fmt::Debug for AudioChannel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AudioChannel")
            .field("unlocked", &self.unlocked)
            .field("pending", &self.pending)
            .field("active", &self.active)
            .field("muted", &self.muted)
            .field("volume", &self.volume)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{BackendCall, FakeAudioBackend};

    fn channel() -> (AudioChannel, FakeAudioBackend) {
        let backend = FakeAudioBackend::default();
        let channel = AudioChannel::new(Box::new(backend.clone()), &AudioConfig::default());
        (channel, backend)
    }

    fn asset(name: &str) -> AudioAsset {
        AudioAsset::new(format!("/music/{name}.mp3"))
    }

    #[test]
    fn test_locked_requests_are_last_write_wins() {
        let (mut audio, backend) = channel();

        audio.play_track(&asset("a"), Duration::ZERO);
        audio.play_track(&asset("b"), Duration::ZERO);
        assert!(backend.started().is_empty());

        assert!(audio.request_unlock());
        assert_eq!(backend.started(), vec![asset("b")]);
        assert_eq!(audio.active_asset(), Some(&asset("b")));
        assert!(audio.pending().is_none());
    }

    #[test]
    fn test_unlock_is_idempotent() {
        let (mut audio, backend) = channel();
        audio.play_track(&asset("a"), Duration::from_secs(7));

        assert!(audio.request_unlock());
        assert!(!audio.request_unlock());
        assert_eq!(backend.started(), vec![asset("a")]);
        assert_eq!(
            backend.calls().iter().filter(|c| **c == BackendCall::Resume).count(),
            1
        );
    }

    #[test]
    fn test_unlock_without_pending_plays_nothing() {
        let (mut audio, backend) = channel();
        assert!(audio.request_unlock());
        assert!(backend.started().is_empty());
        assert!(audio.active_asset().is_none());
    }

    #[test]
    fn test_rerequest_of_playing_asset_is_noop() {
        let (mut audio, backend) = channel();
        audio.request_unlock();

        audio.play_track(&asset("a"), Duration::from_secs(10));
        audio.play_track(&asset("a"), Duration::from_secs(10));

        assert_eq!(backend.started(), vec![asset("a")]);
        assert!(!backend.calls().contains(&BackendCall::Stop));
    }

    #[test]
    fn test_rerequest_restarts_when_backend_stopped() {
        let (mut audio, backend) = channel();
        audio.request_unlock();

        audio.play_track(&asset("a"), Duration::ZERO);
        backend.set_playing(false);
        audio.play_track(&asset("a"), Duration::ZERO);

        assert_eq!(backend.started(), vec![asset("a"), asset("a")]);
    }

    #[test]
    fn test_switch_stops_before_start() {
        let (mut audio, backend) = channel();
        audio.request_unlock();

        audio.play_track(&asset("a"), Duration::ZERO);
        audio.play_track(&asset("b"), Duration::from_secs(3));

        let calls = backend.calls();
        let stop = calls.iter().position(|c| *c == BackendCall::Stop).unwrap();
        let start_b = calls
            .iter()
            .position(|c| matches!(c, BackendCall::StartLoop(r) if r.asset == asset("b")))
            .unwrap();
        assert!(stop < start_b);
        assert_eq!(backend.max_concurrent_loops(), 1);
    }

    #[test]
    fn test_start_honors_offset_volume_and_mute() {
        let (mut audio, backend) = channel();
        audio.set_muted(true);
        audio.request_unlock();
        audio.play_track(&asset("a"), Duration::from_secs(132));

        let request = backend.last_loop_request().unwrap();
        assert_eq!(request.start_offset, Duration::from_secs(132));
        assert!(request.muted);
        assert!((request.volume - 0.3).abs() < f32::EPSILON);
    }

    #[test]
    fn test_start_failure_is_swallowed() {
        let (mut audio, backend) = channel();
        backend.fail_asset(&asset("missing"));
        audio.request_unlock();

        audio.play_track(&asset("missing"), Duration::ZERO);
        assert!(audio.active_asset().is_none());

        audio.play_track(&asset("b"), Duration::ZERO);
        assert_eq!(audio.active_asset(), Some(&asset("b")));
    }

    #[test]
    fn test_mute_applies_without_restart() {
        let (mut audio, backend) = channel();
        audio.request_unlock();
        audio.play_track(&asset("a"), Duration::ZERO);

        audio.set_muted(true);
        assert!(backend.calls().contains(&BackendCall::SetMuted(true)));
        assert_eq!(backend.started().len(), 1);
        assert!(!audio.toggle_muted());
    }

    #[test]
    fn test_mute_without_active_asset_skips_backend() {
        let (mut audio, backend) = channel();
        audio.set_muted(true);
        assert!(!backend.calls().iter().any(|c| matches!(c, BackendCall::SetMuted(_))));
    }

    #[test]
    fn test_effects_require_unlock_and_sound() {
        let (mut audio, backend) = channel();

        audio.play_transition_sound();
        audio.play_pop_sound();
        assert!(backend.effects().is_empty());

        audio.request_unlock();
        audio.play_transition_sound();
        audio.play_pop_sound();
        assert_eq!(backend.effects(), vec![EffectKind::Transition, EffectKind::Pop]);

        audio.set_muted(true);
        audio.play_transition_sound();
        assert_eq!(backend.effects().len(), 2);
    }

    #[test]
    fn test_effect_failure_is_swallowed() {
        let (mut audio, backend) = channel();
        backend.fail_effects();
        audio.request_unlock();
        audio.play_transition_sound();
        audio.play_pop_sound();
        assert!(backend.effects().is_empty());
    }
}
