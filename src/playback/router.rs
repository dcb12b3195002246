//! Routes the synthesized reply to the listener's ear.

use crate::audio::AudioSessionController;
use crate::error::Result;
use crate::pipeline::SynthesizedAsset;
use crate::playback::player::{Pan, StereoPlayer};
use crate::session::Side;
use std::sync::Arc;
use tracing::info;

impl From<Side> for Pan {
    fn from(side: Side) -> Self {
        match side {
            Side::Left => Pan::HardLeft,
            Side::Right => Pan::HardRight,
        }
    }
}

/// Hands a synthesized asset to the native player, panned toward the target
/// side, and owns the playback-mode acquire/release around the call.
pub struct PlaybackRouter {
    player: Arc<dyn StereoPlayer>,
    audio_session: Arc<AudioSessionController>,
}

impl PlaybackRouter {
    pub fn new(player: Arc<dyn StereoPlayer>, audio_session: Arc<AudioSessionController>) -> Self {
        Self {
            player,
            audio_session,
        }
    }

    /// Play the asset panned hard toward `side`.
    ///
    /// The audio session enters playback mode for the duration of the call
    /// and is restored to record-ready on every exit, error included: the
    /// guard drops whichever way the player resolves.
    pub async fn route(&self, asset: &SynthesizedAsset, side: Side) -> Result<()> {
        let pan = Pan::from(side);

        info!(side = %side, ?pan, path = %asset.path.display(), "Routing playback");

        let _playback_mode = self.audio_session.begin_playback();
        self.player.play(&asset.path, pan).await
    }
}
