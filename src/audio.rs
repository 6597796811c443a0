//! Audio playback using HTML audio elements
//!
//! Each slap gets a fresh element so rapid taps overlap instead of
//! restarting one another.

use wasm_bindgen_futures::JsFuture;
use web_sys::HtmlAudioElement;

use crate::error::PlaybackError;
use crate::feedback::SoundSink;
use crate::session::SoundVariant;

/// Audio manager for the game
#[derive(Debug, Default)]
pub struct AudioManager {
    /// Set once the browser refuses to create audio elements at all
    disabled: bool,
}

impl AudioManager {
    pub fn new() -> Self {
        Self::default()
    }
}

impl SoundSink for AudioManager {
    fn play_sound(&mut self, variant: SoundVariant, volume: f32) -> Result<(), PlaybackError> {
        if self.disabled {
            return Err(PlaybackError::Unavailable("audio disabled".to_string()));
        }

        let asset = variant.asset();
        let audio = HtmlAudioElement::new_with_src(asset).map_err(|e| {
            self.disabled = true;
            log::warn!("Failed to create audio element - audio disabled");
            PlaybackError::Unavailable(format!("{:?}", e))
        })?;
        audio.set_volume(volume.clamp(0.0, 1.0) as f64);

        let promise = audio.play().map_err(|e| PlaybackError::Rejected {
            asset: asset.to_string(),
            reason: format!("{:?}", e),
        })?;

        // Missing files and autoplay blocks reject asynchronously
        wasm_bindgen_futures::spawn_local(async move {
            if let Err(e) = JsFuture::from(promise).await {
                log::warn!(
                    "Audio play failed for {} (audio file may not exist): {:?}",
                    asset,
                    e
                );
            }
        });
        Ok(())
    }
}
