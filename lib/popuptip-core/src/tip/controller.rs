use crate::config::Config;
use crate::surface::{Position, SurfaceProvider, TextSurface, TipSurface};
use crate::tip::listener::CloseListener;
use crate::tip::scheduler::Scheduler;
use crate::tip::session::{ActiveTip, TipGeneration, TipSession};
use crate::PopupTipResult;
use log::{debug, error, trace};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, Weak};
use std::time::Duration;

/// Duration used by [`PopupTip::show_default`] unless configured otherwise.
pub const DEFAULT_DURATION_MS: u64 = 100;

struct TipState<P: SurfaceProvider> {
    active: Option<ActiveTip<P>>,
    listener: Option<Box<dyn CloseListener>>,
    generation: TipGeneration,
    text: TextSurface,
}

struct Shared<P: SurfaceProvider> {
    provider: P,
    state: Mutex<TipState<P>>,
}

impl<P: SurfaceProvider> Shared<P> {
    fn lock(&self) -> MutexGuard<'_, TipState<P>> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Tears down the active tip and consumes the pending listener.
    ///
    /// With `expected` set, this is a timeout firing: it only acts if that
    /// generation is still on screen, so a superseded timeout is a no-op.
    fn close(&self, expected: Option<TipGeneration>) {
        let listener = {
            let mut state = self.lock();

            if let Some(expected) = expected {
                match &state.active {
                    Some(active) if active.session.generation == expected => {
                        trace!("Timeout expired for tip {expected}");
                    }
                    _ => {
                        trace!("Ignoring superseded timeout for tip {expected}");
                        return;
                    }
                }
            }

            if let Some(active) = state.active.take() {
                debug!("Hiding tip {}", active.session.generation);
                active.retire();
            }

            state.listener.take()
        };

        // Invoked outside the lock so the listener may use the controller.
        if let Some(listener) = listener {
            trace!("Notifying close listener");
            listener.on_close();
        }
    }
}

/// Shows at most one short-lived message box at a time.
///
/// Every operation serializes on a single lock. Timeouts run on a dedicated
/// scheduler worker and re-enter the same lock to hide their tip.
pub struct PopupTip<P: SurfaceProvider> {
    shared: Arc<Shared<P>>,
    scheduler: Scheduler,
    default_duration_ms: u64,
}

impl<P: SurfaceProvider> PopupTip<P> {
    pub fn new(provider: P) -> PopupTipResult<Self> {
        Self::with_config(provider, &Config::default())
    }

    pub fn with_config(provider: P, config: &Config) -> PopupTipResult<Self> {
        let scheduler = Scheduler::new()?;
        let state = TipState {
            active: None,
            listener: None,
            generation: 0,
            text: TextSurface::new(config.text_style()),
        };

        Ok(Self {
            shared: Arc::new(Shared {
                provider,
                state: Mutex::new(state),
            }),
            scheduler,
            default_duration_ms: config.default_duration_ms,
        })
    }

    pub fn provider(&self) -> &P {
        &self.shared.provider
    }

    pub fn default_duration_ms(&self) -> u64 {
        self.default_duration_ms
    }

    /// Registers the listener notified by the next `hide`, replacing any
    /// listener still pending. The replaced listener is never called.
    pub fn set_next_close_listener<L>(&self, listener: L)
    where
        L: CloseListener,
    {
        self.shared.lock().listener = Some(Box::new(listener));
    }

    pub fn clear_next_close_listener(&self) {
        self.shared.lock().listener = None;
    }

    /// Shows `message` at `(x, y)` relative to `owner` for `duration_ms`,
    /// replacing whatever tip is currently shown.
    ///
    /// Replacing a tip is not a close: the pending listener is left alone.
    pub fn show(&self, owner: &P::Owner, message: &str, x: i32, y: i32, duration_ms: u64) {
        let mut state = self.shared.lock();

        // Retire the old tip and its timeout before the new one is installed,
        // within the same critical section.
        if let Some(previous) = state.active.take() {
            debug!("Replacing tip {}", previous.session.generation);
            previous.retire();
        }

        state.text.set_text(message);
        let position = Position::new(x, y);
        let mut surface = match self
            .shared
            .provider
            .create_surface(owner, &state.text, position)
        {
            Ok(surface) => surface,
            Err(e) => {
                error!("Failed to create tip surface for {message:?}: {e}");
                return;
            }
        };

        if let Err(e) = surface.show() {
            error!("Failed to show tip surface for {message:?}: {e}");
        }

        state.generation = state.generation.wrapping_add(1);
        let generation = state.generation;
        debug!("Showing tip {generation} at ({x}, {y}) for {duration_ms}ms: {message:?}");

        let shared: Weak<Shared<P>> = Arc::downgrade(&self.shared);
        let timeout = self
            .scheduler
            .schedule(Duration::from_millis(duration_ms), move || {
                if let Some(shared) = shared.upgrade() {
                    shared.close(Some(generation));
                }
            });

        state.active = Some(ActiveTip {
            session: TipSession {
                surface,
                owner: owner.clone(),
                position,
                text: message.to_string(),
                generation,
            },
            timeout,
        });
    }

    /// [`show`](Self::show) with the configured default duration.
    pub fn show_default(&self, owner: &P::Owner, message: &str, x: i32, y: i32) {
        self.show(owner, message, x, y, self.default_duration_ms);
    }

    /// Hides the current tip, if any, and notifies the pending close listener.
    ///
    /// The listener fires even when nothing was shown, and only once. It is
    /// taken under the lock but called after the lock is released, so it may
    /// call back into this controller. A `show` from another thread can
    /// therefore run between the teardown and the notification; the listener
    /// must not assume nothing is on screen when it runs.
    pub fn hide(&self) {
        self.shared.close(None);
    }

    pub fn is_showing(&self) -> bool {
        self.shared.lock().active.is_some()
    }

    pub fn current_text(&self) -> Option<String> {
        let state = self.shared.lock();
        state.active.as_ref().map(|a| a.session.text.clone())
    }

    pub fn current_position(&self) -> Option<Position> {
        let state = self.shared.lock();
        state.active.as_ref().map(|a| a.session.position)
    }

    pub fn current_owner(&self) -> Option<P::Owner> {
        let state = self.shared.lock();
        state.active.as_ref().map(|a| a.session.owner.clone())
    }

    pub fn has_pending_listener(&self) -> bool {
        self.shared.lock().listener.is_some()
    }
}

impl<P: SurfaceProvider> Drop for PopupTip<P> {
    fn drop(&mut self) {
        let mut state = self.shared.lock();
        if let Some(active) = state.active.take() {
            debug!("Hiding tip {} on shutdown", active.session.generation);
            active.retire();
        }
        state.listener = None;
    }
}
