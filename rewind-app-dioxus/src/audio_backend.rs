//! Audio output through the webview.
//!
//! Background loops play on an `HTMLAudioElement`; effects are rendered in Rust and
//! handed over as WAV data URIs. The webview reports autoplay rejections
//! asynchronously, so the backend tracks the playing flag from those results.

use crate::media::{media_url, resolve};
use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use dioxus::prelude::*;
use rewind_core::{AudioAsset, AudioBackend, AudioError, EffectBuffer, LoopRequest};
use std::cell::Cell;
use std::path::PathBuf;
use std::rc::Rc;
use tracing::{debug, warn};

const LOG_TARGET: &str = "rewind::audio";

/// Player object installed into the page once
const PLAYER_BOOTSTRAP: &str = r"
    if (!window.rewindAudio) {
        window.rewindAudio = {
            current: null,
            context: null,
            play(src, offset, volume, muted) {
                this.stop();
                const el = new Audio(src);
                el.loop = true;
                el.volume = volume;
                el.muted = muted;
                el.currentTime = offset;
                this.current = el;
                return el.play().then(() => true).catch(() => {
                    if (this.current === el) this.current = null;
                    return false;
                });
            },
            stop() {
                if (this.current) {
                    this.current.pause();
                    this.current.removeAttribute('src');
                    this.current.load();
                    this.current = null;
                }
            },
            mute(muted) {
                if (this.current) this.current.muted = muted;
            },
            resume() {
                const Ctx = window.AudioContext || window.webkitAudioContext;
                if (!Ctx) return false;
                if (!this.context) this.context = new Ctx();
                return this.context.resume().then(() => true).catch(() => false);
            },
            effect(src) {
                return new Audio(src).play().then(() => true).catch(() => false);
            },
        };
    }
";

/// Which loop the page was last asked to play, and whether it is still sounding
#[derive(Debug, Default)]
struct LoopStatus {
    generation: Cell<u64>,
    playing: Cell<bool>,
}

impl LoopStatus {
    /// Mark loop `generation` as failed; later loops are unaffected
    fn reject(&self, generation: u64) {
        if self.generation.get() == generation {
            self.playing.set(false);
        }
    }
}

/// [`AudioBackend`] that drives the webview's media elements
pub struct WebviewAudioBackend {
    assets_dir: PathBuf,
    current: Option<AudioAsset>,
    status: Rc<LoopStatus>,
}

impl WebviewAudioBackend {
    pub fn new(assets_dir: PathBuf) -> Self {
        run_script(PLAYER_BOOTSTRAP.to_string(), None);
        Self {
            assets_dir,
            current: None,
            status: Rc::new(LoopStatus::default()),
        }
    }
}

/// Run `script` in the page. With a watched loop, anything but a `true` result
/// marks that loop as no longer playing.
fn run_script(script: String, watched: Option<(Rc<LoopStatus>, u64)>) {
    spawn(async move {
        match document::eval(&script).await {
            Ok(value) => {
                if let Some((status, generation)) = watched
                    && value != serde_json::Value::Bool(true)
                {
                    warn!(target: LOG_TARGET, "Playback was rejected by the webview");
                    status.reject(generation);
                }
            }
            Err(e) => {
                debug!(target: LOG_TARGET, "Audio script failed: {e}");
                if let Some((status, generation)) = watched {
                    status.reject(generation);
                }
            }
        }
    });
}

/// Quote a string for embedding in a script
fn js_string(value: &str) -> String {
    serde_json::to_string(value).unwrap_or_else(|_| "\"\"".to_string())
}

impl AudioBackend for WebviewAudioBackend {
    fn resume(&mut self) -> Result<(), AudioError> {
        run_script("return window.rewindAudio.resume();".to_string(), None);
        Ok(())
    }

    fn start_loop(&mut self, request: &LoopRequest) -> Result<(), AudioError> {
        let Some(path) = resolve(&self.assets_dir, request.asset.as_str()) else {
            return Err(AudioError::PlaybackRejected {
                asset: request.asset.to_string(),
                reason: "path leaves the assets directory".to_string(),
            });
        };
        if !path.is_file() {
            return Err(AudioError::AssetMissing {
                asset: request.asset.to_string(),
            });
        }

        let script = format!(
            "return window.rewindAudio.play({}, {}, {}, {});",
            js_string(&media_url(request.asset.as_str())),
            request.start_offset.as_secs_f64(),
            request.volume,
            request.muted,
        );

        let generation = self.status.generation.get() + 1;
        self.status.generation.set(generation);
        self.status.playing.set(true);
        self.current = Some(request.asset.clone());
        run_script(script, Some((Rc::clone(&self.status), generation)));
        Ok(())
    }

    fn stop(&mut self) {
        self.current = None;
        self.status.playing.set(false);
        run_script("window.rewindAudio.stop();".to_string(), None);
    }

    fn is_playing(&self, asset: &AudioAsset) -> bool {
        self.status.playing.get() && self.current.as_ref() == Some(asset)
    }

    fn set_muted(&mut self, muted: bool) {
        run_script(format!("window.rewindAudio.mute({muted});"), None);
    }

    fn play_effect(&mut self, effect: &EffectBuffer) -> Result<(), AudioError> {
        let wav = effect.to_wav();
        let src = format!("data:audio/wav;base64,{}", STANDARD.encode(wav));
        run_script(
            format!("return window.rewindAudio.effect({});", js_string(&src)),
            None,
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stale_rejection_keeps_newer_loop() {
        let status = LoopStatus::default();
        status.generation.set(2);
        status.playing.set(true);

        status.reject(1);
        assert!(status.playing.get());
        status.reject(2);
        assert!(!status.playing.get());
    }

    fn request(asset: &str) -> LoopRequest {
        LoopRequest {
            asset: AudioAsset::new(asset),
            start_offset: std::time::Duration::ZERO,
            volume: 0.3,
            muted: false,
        }
    }

    #[test]
    fn test_unplayable_assets_are_refused_before_the_page() {
        let mut backend = WebviewAudioBackend {
            assets_dir: std::env::temp_dir().join("rewind-no-such-assets"),
            current: None,
            status: Rc::default(),
        };

        assert!(matches!(
            backend.start_loop(&request("/music/missing.mp3")),
            Err(AudioError::AssetMissing { .. })
        ));
        assert!(matches!(
            backend.start_loop(&request("/../secret.mp3")),
            Err(AudioError::PlaybackRejected { .. })
        ));
        assert!(!backend.is_playing(&AudioAsset::new("/music/missing.mp3")));
    }

    #[test]
    fn test_js_string_escapes() {
        assert_eq!(js_string("a\"b"), "\"a\\\"b\"");
        assert_eq!(js_string("x</script>"), "\"x</script>\"");
    }
}
