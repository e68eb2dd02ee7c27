//! Per-screen result view model
//!
//! Holds what one screen is currently showing. Resolves are tagged with a
//! [`ResolveTicket`]; unmounting the screen or starting a newer resolve
//! invalidates older tickets so late results are dropped instead of being
//! applied to a screen that no longer exists.

use feedkit_core::{
    CutParameters, DisplayRow, MeasurementSystem, Multiplier, PersistedResult, SelectionKey,
};
use parking_lot::Mutex;

/// Proof that a resolve was started for the view's current generation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolveTicket {
    generation: u64,
    selection: SelectionKey,
}

impl ResolveTicket {
    /// Selection the resolve was started for
    pub fn selection(&self) -> &SelectionKey {
        &self.selection
    }
}

#[derive(Debug)]
struct ViewState {
    generation: u64,
    mounted: bool,
    displayed: Option<PersistedResult>,
    multiplier: Multiplier,
    warning: Option<String>,
    notice: Option<String>,
}

/// What a single screen displays
#[derive(Debug)]
pub struct ResultView {
    screen: String,
    state: Mutex<ViewState>,
}

impl ResultView {
    /// Create a mounted, empty view
    pub fn new(screen: impl Into<String>) -> Self {
        Self {
            screen: screen.into(),
            state: Mutex::new(ViewState {
                generation: 0,
                mounted: true,
                displayed: None,
                multiplier: Multiplier::NEUTRAL,
                warning: None,
                notice: None,
            }),
        }
    }

    /// Screen name used in logs and events
    pub fn screen(&self) -> &str {
        &self.screen
    }

    /// Whether the screen is still mounted
    pub fn is_mounted(&self) -> bool {
        self.state.lock().mounted
    }

    /// Start a resolve for `selection`
    ///
    /// A displayed snapshot that belongs to a different selection is
    /// cleared right away; one for the same selection stays visible until
    /// the new result replaces it.
    pub fn begin_resolve(&self, selection: &SelectionKey) -> ResolveTicket {
        let mut state = self.state.lock();
        state.generation += 1;
        if state
            .displayed
            .as_ref()
            .is_some_and(|shown| !shown.is_for(selection))
        {
            state.displayed = None;
            state.warning = None;
        }
        ResolveTicket {
            generation: state.generation,
            selection: selection.clone(),
        }
    }

    /// Whether a result for `ticket` may still be applied
    pub fn is_current(&self, ticket: &ResolveTicket) -> bool {
        let state = self.state.lock();
        state.mounted && state.generation == ticket.generation
    }

    /// Show a freshly resolved result; returns false if the ticket is stale
    pub fn present(
        &self,
        ticket: &ResolveTicket,
        result: PersistedResult,
        multiplier: Multiplier,
    ) -> bool {
        let mut state = self.state.lock();
        if !state.mounted || state.generation != ticket.generation {
            return false;
        }
        state.warning = result.snapshot.warning_text().map(str::to_string);
        state.displayed = Some(result);
        state.multiplier = multiplier;
        state.notice = None;
        true
    }

    /// Record a failed resolve as a dismissable notice
    ///
    /// The displayed snapshot, if any, is left in place.
    pub fn fail(&self, ticket: &ResolveTicket, reason: impl Into<String>) -> bool {
        let mut state = self.state.lock();
        if !state.mounted || state.generation != ticket.generation {
            return false;
        }
        state.notice = Some(reason.into());
        true
    }

    /// Show a result read back from storage
    pub fn show_stored(&self, result: PersistedResult, multiplier: Multiplier) {
        let mut state = self.state.lock();
        if !state.mounted {
            return;
        }
        if state.displayed.as_ref() != Some(&result) {
            state.warning = result.snapshot.warning_text().map(str::to_string);
        }
        state.displayed = Some(result);
        state.multiplier = multiplier;
    }

    /// Show an error that did not come from a resolve
    pub fn set_notice(&self, notice: impl Into<String>) {
        self.state.lock().notice = Some(notice.into());
    }

    /// Update the multiplier shown next to the snapshot
    pub fn set_multiplier(&self, multiplier: Multiplier) {
        self.state.lock().multiplier = multiplier;
    }

    /// Unmount: every outstanding ticket becomes stale
    pub fn detach(&self) {
        let mut state = self.state.lock();
        state.mounted = false;
        state.generation += 1;
    }

    /// Currently displayed result
    pub fn result(&self) -> Option<PersistedResult> {
        self.state.lock().displayed.clone()
    }

    /// Multiplier currently applied to the display
    pub fn multiplier(&self) -> Multiplier {
        self.state.lock().multiplier
    }

    /// Advisory of the displayed snapshot, until dismissed
    pub fn warning(&self) -> Option<String> {
        self.state.lock().warning.clone()
    }

    /// Dismiss the advisory until a new snapshot arrives
    pub fn dismiss_warning(&self) {
        self.state.lock().warning = None;
    }

    /// Last error notice, until dismissed
    pub fn notice(&self) -> Option<String> {
        self.state.lock().notice.clone()
    }

    /// Dismiss the error notice
    pub fn dismiss_notice(&self) {
        self.state.lock().notice = None;
    }

    /// Area clearance rows for the displayed snapshot
    pub fn area_clearance_rows(&self, system: MeasurementSystem) -> Vec<DisplayRow> {
        let state = self.state.lock();
        state
            .displayed
            .as_ref()
            .map(|r| CutParameters::area_clearance(&r.snapshot, state.multiplier).rows(system, true))
            .unwrap_or_default()
    }

    /// Profile pass rows for the displayed snapshot
    pub fn profile_rows(&self, system: MeasurementSystem) -> Vec<DisplayRow> {
        let state = self.state.lock();
        state
            .displayed
            .as_ref()
            .map(|r| CutParameters::profile(&r.snapshot, state.multiplier).rows(system, false))
            .unwrap_or_default()
    }
}
