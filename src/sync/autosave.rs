use std::time::{Duration, Instant};

use crate::model::ids::TaskId;
use crate::sync::requests::{FieldEdit, MutationRequest};

/// Default quiet period before buffered edits become a request.
pub const QUIET_PERIOD: Duration = Duration::from_secs(1);

/// Debounced accumulator for field edits on one task.
///
/// Edits pile up while the user types; a `FieldUpdate` request is produced
/// only once a quiet period passes with no further edits, and every edit
/// restarts the timer. Time is injected through `Instant` arguments so the
/// debounce is deterministic under test.
///
/// The buffer holds its edits until the collaborator answers: `acknowledge`
/// drops what was sent, `reject` keeps everything for a manual `flush` and
/// never retries on its own, and `cancel` (session closed) discards the
/// buffer so a stale write cannot land afterwards.
#[derive(Debug)]
pub struct AutosaveBuffer {
    task: TaskId,
    quiet: Duration,
    edits: Vec<FieldEdit>,
    in_flight: Vec<FieldEdit>,
    deadline: Option<Instant>,
}

impl AutosaveBuffer {
    pub fn new(task: TaskId) -> Self {
        Self::with_quiet_period(task, QUIET_PERIOD)
    }

    pub fn with_quiet_period(task: TaskId, quiet: Duration) -> Self {
        AutosaveBuffer {
            task,
            quiet,
            edits: Vec::new(),
            in_flight: Vec::new(),
            deadline: None,
        }
    }

    /// The task this buffer edits.
    pub fn task(&self) -> &TaskId {
        &self.task
    }

    /// Edits waiting to be saved.
    pub fn pending(&self) -> &[FieldEdit] {
        &self.edits
    }

    /// Record one edit. A later edit to the same field replaces the earlier
    /// one; the quiet-period timer restarts either way.
    pub fn record(&mut self, edit: FieldEdit, now: Instant) {
        match self.edits.iter_mut().find(|e| e.key() == edit.key()) {
            Some(existing) => *existing = edit,
            None => self.edits.push(edit),
        }
        self.deadline = Some(now + self.quiet);
    }

    /// Produce the pending request if the quiet period has elapsed.
    ///
    /// The edits stay buffered until `acknowledge`; the timer is disarmed so
    /// the same batch cannot fire twice.
    pub fn poll(&mut self, now: Instant) -> Option<MutationRequest> {
        let deadline = self.deadline?;
        if now < deadline {
            return None;
        }
        self.deadline = None;
        self.request()
    }

    /// Produce the pending request immediately: explicit saves and manual
    /// retry after a rejection.
    pub fn flush(&mut self) -> Option<MutationRequest> {
        self.deadline = None;
        self.request()
    }

    /// The collaborator accepted the last request. Drops exactly the edits
    /// that were sent; anything recorded since stays buffered.
    pub fn acknowledge(&mut self) {
        let sent = std::mem::take(&mut self.in_flight);
        self.edits.retain(|e| !sent.contains(e));
    }

    /// The collaborator refused the last request. The edits stay for manual
    /// retry; nothing is retried automatically.
    pub fn reject(&mut self) {
        self.in_flight.clear();
    }

    /// The editing session closed: discard everything so no stale write can
    /// land afterwards.
    pub fn cancel(&mut self) {
        self.edits.clear();
        self.in_flight.clear();
        self.deadline = None;
    }

    fn request(&mut self) -> Option<MutationRequest> {
        if self.edits.is_empty() {
            return None;
        }
        self.in_flight = self.edits.clone();
        Some(MutationRequest::FieldUpdate {
            task: self.task.clone(),
            edits: self.in_flight.clone(),
        })
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
