use crate::plans::dto::validate_generate;
use crate::plans::preview::{render, PlanPreview};
use crate::plans::repo::MealPlan;
use crate::plans::tree::PlanTree;
use std::collections::{BTreeMap, HashSet};
use uuid::Uuid;

/// Form input for generate and regenerate.
#[derive(Debug, Clone, PartialEq)]
pub struct GenerateParams {
    pub duration_days: u32,
    pub meals_per_day: u32,
    pub name: String,
}

impl GenerateParams {
    pub fn validate(&self) -> BTreeMap<String, String> {
        validate_generate(self.duration_days, self.meals_per_day, &self.name)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlowState {
    Idle,
    Generating,
    Previewing,
    Accepting,
}

/// Client-side orchestration of the plan lifecycle. The flow never talks to
/// the network itself; a caller drives it with begin_*/resolved calls around
/// its own requests. Responses may resolve out of order, so every generate
/// gets a ticket and only the newest ticket may apply its result.
#[derive(Debug)]
pub struct PlanFlow {
    state: FlowState,
    preview: Option<PlanTree>,
    ticket: u64,
    params: Option<GenerateParams>,
    active: Vec<MealPlan>,
    favorites: HashSet<Uuid>,
    inflight_favorites: HashSet<Uuid>,
    notice: Option<String>,
}

impl Default for PlanFlow {
    fn default() -> Self {
        Self::new()
    }
}

impl PlanFlow {
    pub fn new() -> Self {
        Self {
            state: FlowState::Idle,
            preview: None,
            ticket: 0,
            params: None,
            active: Vec::new(),
            favorites: HashSet::new(),
            inflight_favorites: HashSet::new(),
            notice: None,
        }
    }

    pub fn state(&self) -> FlowState {
        self.state
    }

    pub fn preview(&self) -> Option<&PlanTree> {
        self.preview.as_ref()
    }

    /// Display form of the current preview, if any.
    pub fn preview_rendered(&self) -> Option<PlanPreview> {
        self.preview.as_ref().map(render)
    }

    pub fn active_plans(&self) -> &[MealPlan] {
        &self.active
    }

    pub fn set_active_plans(&mut self, plans: Vec<MealPlan>) {
        self.active = plans;
    }

    pub fn favorites(&self) -> &HashSet<Uuid> {
        &self.favorites
    }

    pub fn set_favorites(&mut self, ids: HashSet<Uuid>) {
        self.favorites = ids;
    }

    pub fn is_favorite(&self, plan_id: Uuid) -> bool {
        self.favorites.contains(&plan_id)
    }

    /// Hands over the current transient notice; the caller owns displaying
    /// and expiring it.
    pub fn take_notice(&mut self) -> Option<String> {
        self.notice.take()
    }

    /// Validates the form and moves to Generating. On validation failure the
    /// per-field messages come back, nothing is submitted and the previous
    /// state is untouched.
    pub fn begin_generate(
        &mut self,
        params: GenerateParams,
    ) -> Result<u64, BTreeMap<String, String>> {
        let errs = params.validate();
        if !errs.is_empty() {
            return Err(errs);
        }
        self.params = Some(params);
        self.ticket += 1;
        self.state = FlowState::Generating;
        Ok(self.ticket)
    }

    /// Re-submits the last parameters. None if nothing was ever submitted.
    pub fn regenerate(&mut self) -> Option<u64> {
        self.params.as_ref()?;
        self.ticket += 1;
        self.state = FlowState::Generating;
        Some(self.ticket)
    }

    /// Applies a generate result. Returns false for a stale ticket, in which
    /// case nothing changes.
    pub fn generation_succeeded(&mut self, ticket: u64, plan: PlanTree) -> bool {
        if ticket != self.ticket || self.state != FlowState::Generating {
            return false;
        }
        self.preview = Some(plan);
        self.state = FlowState::Previewing;
        true
    }

    pub fn generation_failed(&mut self, ticket: u64, message: impl Into<String>) {
        if ticket != self.ticket || self.state != FlowState::Generating {
            return;
        }
        self.state = FlowState::Idle;
        self.notice = Some(message.into());
    }

    /// Starts the accept round-trip, yielding the tree to send. None unless
    /// there is a preview to accept.
    pub fn begin_accept(&mut self) -> Option<PlanTree> {
        if self.state != FlowState::Previewing {
            return None;
        }
        let plan = self.preview.clone()?;
        self.state = FlowState::Accepting;
        Some(plan)
    }

    /// The saved plan goes to the front of the active list and the preview
    /// is gone; it now has a persisted identity.
    pub fn accept_succeeded(&mut self, saved: MealPlan) {
        if self.state != FlowState::Accepting {
            return;
        }
        self.active.insert(0, saved);
        self.preview = None;
        self.state = FlowState::Idle;
    }

    /// A failed accept keeps the preview so the user can retry without
    /// regenerating.
    pub fn accept_failed(&mut self, message: impl Into<String>) {
        if self.state != FlowState::Accepting {
            return;
        }
        self.state = FlowState::Previewing;
        self.notice = Some(message.into());
    }

    /// Discards the unsaved preview unconditionally. Bumping the ticket also
    /// invalidates any generate still in flight.
    pub fn cancel(&mut self) {
        self.preview = None;
        self.ticket += 1;
        self.state = FlowState::Idle;
    }

    pub fn mark_done_succeeded(&mut self, plan_id: Uuid) {
        self.active.retain(|p| p.id != plan_id);
    }

    pub fn mark_done_failed(&mut self, message: impl Into<String>) {
        self.notice = Some(message.into());
    }

    /// Guards the toggle per plan: returns false while a toggle for the same
    /// plan is still in flight, and the caller must not issue a request.
    pub fn begin_favorite_toggle(&mut self, plan_id: Uuid) -> bool {
        self.inflight_favorites.insert(plan_id)
    }

    /// Server confirmed; only now does the local set change.
    pub fn favorite_confirmed(&mut self, plan_id: Uuid, favorited: bool) {
        self.inflight_favorites.remove(&plan_id);
        if favorited {
            self.favorites.insert(plan_id);
        } else {
            self.favorites.remove(&plan_id);
        }
    }

    pub fn favorite_failed(&mut self, plan_id: Uuid, message: impl Into<String>) {
        self.inflight_favorites.remove(&plan_id);
        self.notice = Some(message.into());
    }
}
