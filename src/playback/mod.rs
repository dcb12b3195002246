pub mod player;
pub mod router;

#[cfg(feature = "playback")]
pub mod rodio;

pub use player::{CompletionListener, CompletionSignal, MockStereoPlayer, Pan, StereoPlayer};
pub use router::PlaybackRouter;

use crate::error::Result;
use std::sync::Arc;

/// Create the stereo player for this build.
pub struct StereoPlayerFactory;

impl StereoPlayerFactory {
    pub fn create() -> Result<Arc<dyn StereoPlayer>> {
        #[cfg(feature = "playback")]
        {
            Ok(Arc::new(rodio::RodioPlayer::new()))
        }

        #[cfg(not(feature = "playback"))]
        {
            Err(crate::error::InterpreterError::playback(
                "built without speaker support (enable the playback feature)",
            ))
        }
    }
}
