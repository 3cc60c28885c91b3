//! Fakes shared by unit tests.

use crate::audio::{AudioBackend, EffectBuffer, EffectKind, LoopRequest};
use crate::catalog::AudioAsset;
use crate::error::AudioError;
use crate::proposal::Notifier;
use crate::timer::{Scheduler, TimerTicket};
use std::cell::RefCell;
use std::collections::HashSet;
use std::rc::Rc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;

/// Let spawned tasks and the paused clock catch up
pub async fn settle() {
    for _ in 0..8 {
        tokio::task::yield_now().await;
    }
}

#[derive(Debug, Clone)]
pub struct ScheduledTimer {
    pub delay: Duration,
    pub ticket: TimerTicket,
    pub token: CancellationToken,
}

/// Records every schedule call; nothing ever fires on its own
#[derive(Debug, Clone, Default)]
pub struct RecordingScheduler {
    scheduled: Rc<RefCell<Vec<ScheduledTimer>>>,
}

impl RecordingScheduler {
    pub fn all(&self) -> Vec<ScheduledTimer> {
        self.scheduled.borrow().clone()
    }

    /// Timers whose token has not been cancelled
    pub fn live(&self) -> Vec<ScheduledTimer> {
        self.scheduled
            .borrow()
            .iter()
            .filter(|t| !t.token.is_cancelled())
            .cloned()
            .collect()
    }

    pub fn live_count(&self) -> usize {
        self.live().len()
    }

    /// The single live ticket, if exactly one exists
    pub fn live_ticket(&self) -> Option<TimerTicket> {
        match self.live().as_slice() {
            [only] => Some(only.ticket),
            _ => None,
        }
    }
}

impl Scheduler for RecordingScheduler {
    fn schedule(&self, delay: Duration, ticket: TimerTicket) -> CancellationToken {
        let token = CancellationToken::new();
        self.scheduled.borrow_mut().push(ScheduledTimer {
            delay,
            ticket,
            token: token.clone(),
        });
        token
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum BackendCall {
    Resume,
    StartLoop(LoopRequest),
    Stop,
    SetMuted(bool),
    Effect(EffectKind),
}

#[derive(Debug, Default)]
struct FakeAudioState {
    calls: Vec<BackendCall>,
    current: Option<AudioAsset>,
    playing: bool,
    sounding: usize,
    max_sounding: usize,
    failing_assets: HashSet<AudioAsset>,
    fail_effects: bool,
}

/// In-memory backend; clones share state so tests can inspect after handing it off
#[derive(Debug, Clone, Default)]
pub struct FakeAudioBackend {
    state: Rc<RefCell<FakeAudioState>>,
}

impl FakeAudioBackend {
    pub fn calls(&self) -> Vec<BackendCall> {
        self.state.borrow().calls.clone()
    }

    pub fn started(&self) -> Vec<AudioAsset> {
        self.state
            .borrow()
            .calls
            .iter()
            .filter_map(|c| match c {
                BackendCall::StartLoop(r) => Some(r.asset.clone()),
                _ => None,
            })
            .collect()
    }

    pub fn last_loop_request(&self) -> Option<LoopRequest> {
        self.state.borrow().calls.iter().rev().find_map(|c| match c {
            BackendCall::StartLoop(r) => Some(r.clone()),
            _ => None,
        })
    }

    pub fn effects(&self) -> Vec<EffectKind> {
        self.state
            .borrow()
            .calls
            .iter()
            .filter_map(|c| match c {
                BackendCall::Effect(kind) => Some(*kind),
                _ => None,
            })
            .collect()
    }

    pub fn max_concurrent_loops(&self) -> usize {
        self.state.borrow().max_sounding
    }

    pub fn current(&self) -> Option<AudioAsset> {
        self.state.borrow().current.clone()
    }

    /// Simulate the platform stopping playback behind the channel's back
    pub fn set_playing(&self, playing: bool) {
        self.state.borrow_mut().playing = playing;
    }

    pub fn fail_asset(&self, asset: &AudioAsset) {
        self.state.borrow_mut().failing_assets.insert(asset.clone());
    }

    pub fn fail_effects(&self) {
        self.state.borrow_mut().fail_effects = true;
    }
}

impl AudioBackend for FakeAudioBackend {
    fn resume(&mut self) -> Result<(), AudioError> {
        self.state.borrow_mut().calls.push(BackendCall::Resume);
        Ok(())
    }

    fn start_loop(&mut self, request: &LoopRequest) -> Result<(), AudioError> {
        let mut state = self.state.borrow_mut();
        if state.failing_assets.contains(&request.asset) {
            return Err(AudioError::AssetMissing {
                asset: request.asset.to_string(),
            });
        }
        state.calls.push(BackendCall::StartLoop(request.clone()));
        state.current = Some(request.asset.clone());
        state.playing = true;
        state.sounding += 1;
        state.max_sounding = state.max_sounding.max(state.sounding);
        Ok(())
    }

    fn stop(&mut self) {
        let mut state = self.state.borrow_mut();
        state.calls.push(BackendCall::Stop);
        if state.current.take().is_some() {
            state.sounding = state.sounding.saturating_sub(1);
        }
        state.playing = false;
    }

    fn is_playing(&self, asset: &AudioAsset) -> bool {
        let state = self.state.borrow();
        state.playing && state.current.as_ref() == Some(asset)
    }

    fn set_muted(&mut self, muted: bool) {
        self.state.borrow_mut().calls.push(BackendCall::SetMuted(muted));
    }

    fn play_effect(&mut self, effect: &EffectBuffer) -> Result<(), AudioError> {
        let mut state = self.state.borrow_mut();
        if state.fail_effects {
            return Err(AudioError::EffectUnsupported {
                reason: "no audio context".to_string(),
            });
        }
        state.calls.push(BackendCall::Effect(effect.kind));
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub recipient: String,
    pub subject: String,
    pub body: String,
}

#[derive(Debug, Clone, Default)]
pub struct RecordingNotifier {
    sent: Rc<RefCell<Vec<Notice>>>,
}

impl RecordingNotifier {
    pub fn sent(&self) -> Vec<Notice> {
        self.sent.borrow().clone()
    }
}

impl Notifier for RecordingNotifier {
    fn notify(&self, recipient: &str, subject: &str, body: &str) {
        self.sent.borrow_mut().push(Notice {
            recipient: recipient.to_string(),
            subject: subject.to_string(),
            body: body.to_string(),
        });
    }
}
