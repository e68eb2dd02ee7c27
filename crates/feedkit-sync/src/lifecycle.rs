//! Screen lifecycle adapter
//!
//! A [`ScreenSession`] is what a mounted screen talks to. It owns the
//! screen's view model, invalidation watcher and multiplier controller and
//! turns lifecycle callbacks into resolver, bus and controller calls.
//!
//! Staleness is detected on focus, on a periodic poll and on bus
//! notifications. All three go through the watcher, and at most one resolve
//! runs at a time per session: a trigger that arrives while one is in flight
//! queues a single follow-up.

use crate::engine::SyncContext;
use crate::invalidation::InvalidationWatcher;
use crate::multiplier::MultiplierController;
use crate::resolver::ResolveOutcome;
use crate::view::ResultView;
use feedkit_core::{
    AppEvent, Error, InvalidationToken, Multiplier, Result, ResultEvent, SelectionState,
};
use feedkit_settings::PreferenceStoreExt;
use parking_lot::Mutex;
use std::sync::{Arc, Weak};
use std::time::Duration;
use tokio::sync::broadcast::{self, error::RecvError};
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

#[derive(Debug, Default)]
struct Flight {
    running: bool,
    queued: bool,
    tokens: Vec<InvalidationToken>,
}

struct SessionInner {
    ctx: SyncContext,
    view: ResultView,
    watcher: InvalidationWatcher,
    multiplier: MultiplierController,
    flight: Mutex<Flight>,
}

/// A mounted screen
pub struct ScreenSession {
    inner: Arc<SessionInner>,
    poll: Mutex<Option<JoinHandle<()>>>,
}

impl ScreenSession {
    pub(crate) fn new(ctx: SyncContext, name: impl Into<String>) -> Self {
        let watcher = ctx.invalidation.watcher();
        let multiplier = MultiplierController::new(ctx.store.clone(), ctx.events.clone());
        Self {
            inner: Arc::new(SessionInner {
                view: ResultView::new(name),
                watcher,
                multiplier,
                flight: Mutex::new(Flight::default()),
                ctx,
            }),
            poll: Mutex::new(None),
        }
    }

    /// Screen name
    pub fn name(&self) -> &str {
        self.inner.view.screen()
    }

    /// What the screen displays
    pub fn view(&self) -> &ResultView {
        &self.inner.view
    }

    /// The screen's multiplier controller
    pub fn multiplier(&self) -> &MultiplierController {
        &self.inner.multiplier
    }

    /// The screen became visible
    ///
    /// Starts the staleness poll, reloads the multiplier and then either
    /// resolves (stale token, or no stored result for the selection) or
    /// shows the stored result. Returns the outcome when a resolve ran.
    pub async fn on_screen_focused(&self) -> Result<Option<ResolveOutcome>> {
        if !self.inner.view.is_mounted() {
            return Ok(None);
        }
        self.ensure_polling();

        let multiplier = self.inner.multiplier.load().await;
        self.inner.view.set_multiplier(multiplier);

        self.inner.refresh_on_focus().await
    }

    /// The screen went away
    ///
    /// Stops polling, discards any in-flight result and drops unsaved
    /// multiplier adjustments.
    pub async fn on_screen_unmounted(&self) {
        self.inner.view.detach();
        if let Some(handle) = self.poll.lock().take() {
            handle.abort();
        }
        self.inner.multiplier.reset().await;
        tracing::debug!("[{}] unmounted", self.name());
    }

    /// The user reset their preferences from this screen
    pub async fn on_user_requests_reset(&self) -> Result<InvalidationToken> {
        self.inner
            .ctx
            .reset_preferences()
            .await
            .inspect_err(|e| self.inner.view.set_notice(e.to_string()))
    }

    /// The user pressed + or -
    pub fn on_user_adjusts(&self, delta: f64) -> Multiplier {
        let value = self.inner.multiplier.adjust(delta);
        self.inner.view.set_multiplier(value);
        value
    }

    /// The user saved the displayed multiplier
    pub async fn on_user_saves(&self) -> Result<Multiplier> {
        self.inner
            .multiplier
            .save()
            .await
            .map_err(Error::from)
            .inspect_err(|e| self.inner.view.set_notice(e.to_string()))
    }

    /// The user shared their multiplier
    ///
    /// Always shares the saved value; an unsaved adjustment is not sent.
    pub async fn on_user_shares(&self) -> Result<Multiplier> {
        if self.inner.multiplier.is_dirty() {
            tracing::warn!(
                "[{}] sharing saved multiplier, unsaved value {} is not shared",
                self.name(),
                self.inner.multiplier.current()
            );
        }
        self.inner
            .ctx
            .share
            .share()
            .await
            .map_err(Error::from)
            .inspect_err(|e| self.inner.view.set_notice(e.to_string()))
    }

    /// Run one staleness check, as the periodic poll does
    pub async fn poll_once(&self) -> Result<Option<ResolveOutcome>> {
        self.inner.check_stale().await
    }

    /// Whether the background poll is running
    pub fn is_polling(&self) -> bool {
        self.poll
            .lock()
            .as_ref()
            .is_some_and(|handle| !handle.is_finished())
    }

    fn ensure_polling(&self) {
        let mut poll = self.poll.lock();
        if poll.as_ref().is_some_and(|handle| !handle.is_finished()) {
            return;
        }
        let events = self.inner.ctx.events.receiver();
        let period = self.inner.ctx.poll_interval;
        *poll = Some(tokio::spawn(poll_loop(
            Arc::downgrade(&self.inner),
            events,
            period,
        )));
        tracing::debug!("[{}] polling every {:?}", self.name(), period);
    }
}

impl Drop for ScreenSession {
    fn drop(&mut self) {
        self.inner.view.detach();
        if let Some(handle) = self.poll.get_mut().take() {
            handle.abort();
        }
    }
}

impl std::fmt::Debug for ScreenSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ScreenSession")
            .field("screen", &self.name())
            .field("mounted", &self.inner.view.is_mounted())
            .finish_non_exhaustive()
    }
}

impl SessionInner {
    async fn refresh_on_focus(&self) -> Result<Option<ResolveOutcome>> {
        if let Some(token) = self.watcher.consume_if_stale().await {
            return self.resolve_coalesced(Some(token), None).await;
        }

        let mut selection = self.ctx.resolver.load_selection().await;
        self.ctx.resolver.fill_defaults(&mut selection).await;

        let stored = self
            .ctx
            .store
            .load_result()
            .await
            .filter(|result| result.is_for(&selection.key()));
        match stored {
            Some(result) => {
                tracing::debug!("[{}] showing stored result", self.view.screen());
                self.view.show_stored(result, self.multiplier.current());
                Ok(None)
            }
            None => self.resolve_coalesced(None, Some(selection)).await,
        }
    }

    async fn check_stale(&self) -> Result<Option<ResolveOutcome>> {
        match self.watcher.consume_if_stale().await {
            Some(token) => self.resolve_coalesced(Some(token), None).await,
            None => Ok(None),
        }
    }

    /// Run a resolve unless one is in flight, in which case queue one
    /// follow-up. Tokens are acknowledged once the resolve that covers them
    /// has finished, successful or not.
    async fn resolve_coalesced(
        &self,
        token: Option<InvalidationToken>,
        selection: Option<SelectionState>,
    ) -> Result<Option<ResolveOutcome>> {
        {
            let mut flight = self.flight.lock();
            if flight.running {
                flight.queued = true;
                flight.tokens.extend(token);
                drop(flight);
                tracing::debug!("[{}] resolve in flight, trigger queued", self.view.screen());
                self.ctx
                    .events
                    .emit(AppEvent::Results(ResultEvent::Coalesced {
                        screen: self.view.screen().to_string(),
                    }));
                return Ok(None);
            }
            flight.running = true;
        }

        let mut tokens: Vec<InvalidationToken> = token.into_iter().collect();
        let mut selection = selection;
        loop {
            let result = self.resolve_once(selection.take()).await;
            for token in tokens.drain(..) {
                self.watcher.acknowledge(token);
            }

            let (follow_up, dropped) = {
                let mut flight = self.flight.lock();
                if flight.queued && self.view.is_mounted() {
                    flight.queued = false;
                    (Some(std::mem::take(&mut flight.tokens)), Vec::new())
                } else {
                    let dropped = std::mem::take(&mut flight.tokens);
                    *flight = Flight::default();
                    (None, dropped)
                }
            };
            for token in &dropped {
                self.watcher.abandon(token);
            }
            match follow_up {
                Some(queued) => tokens = queued,
                None => return result,
            }
        }
    }

    async fn resolve_once(
        &self,
        selection: Option<SelectionState>,
    ) -> Result<Option<ResolveOutcome>> {
        let selection = match selection {
            Some(selection) => selection,
            None => {
                let mut selection = self.ctx.resolver.load_selection().await;
                self.ctx.resolver.fill_defaults(&mut selection).await;
                selection
            }
        };

        let outcome = self
            .ctx
            .resolver
            .resolve_for(&self.view, &selection)
            .await?;
        let shown = self.multiplier.rebase(outcome.multiplier);
        self.view.set_multiplier(shown);
        Ok(Some(outcome))
    }
}

async fn poll_loop(
    session: Weak<SessionInner>,
    mut events: broadcast::Receiver<AppEvent>,
    period: Duration,
) {
    let mut ticker = tokio::time::interval(period);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
    ticker.tick().await;
    let mut listening = true;

    loop {
        tokio::select! {
            _ = ticker.tick() => {}
            received = events.recv(), if listening => match received {
                Ok(event) if event.invalidation_token().is_some() => {}
                Ok(_) => continue,
                Err(RecvError::Lagged(skipped)) => {
                    tracing::debug!("Poll lagged behind {} events", skipped);
                }
                Err(RecvError::Closed) => {
                    listening = false;
                    continue;
                }
            }
        }

        let Some(inner) = session.upgrade() else {
            break;
        };
        if !inner.view.is_mounted() {
            break;
        }
        match inner.check_stale().await {
            Ok(_) => {}
            Err(e) if e.is_cancelled() => {}
            Err(e) => tracing::warn!("[{}] {}", inner.view.screen(), e),
        }
    }
    tracing::debug!("Staleness poll stopped");
}
