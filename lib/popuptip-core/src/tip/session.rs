use crate::surface::{Position, SurfaceProvider, TipSurface};
use crate::tip::scheduler::TimeoutHandle;
use log::error;

pub type TipGeneration = u64;

/// The tip currently on screen.
pub(crate) struct TipSession<P: SurfaceProvider> {
    pub surface: P::Surface,
    pub owner: P::Owner,
    pub position: Position,
    pub text: String,
    pub generation: TipGeneration,
}

/// A session together with its auto-hide timeout. They only ever exist as a pair.
pub(crate) struct ActiveTip<P: SurfaceProvider> {
    pub session: TipSession<P>,
    pub timeout: TimeoutHandle,
}

impl<P: SurfaceProvider> ActiveTip<P> {
    /// Hides the surface and cancels the pending timeout.
    pub fn retire(mut self) {
        if let Err(e) = self.session.surface.hide() {
            error!(
                "Failed to hide tip {} ({:?}): {}",
                self.session.generation, self.session.text, e
            );
        }
        self.timeout.cancel();
    }
}
