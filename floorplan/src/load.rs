//! Floor loading: decodes a floor's objects and gates on async glyph resolution.
//!
//! DESIGN
//! ======
//! Every object gets a slot at its index in the floor, so the finished scene
//! keeps the stored z-order no matter in which order glyphs complete. Icons are
//! *scheduled*: the slot waits and the caller receives a `GlyphJob` to resolve
//! on its own schedule. Each `complete` call counts one resolution, successful
//! or not, and the load is ready exactly when the completed count equals the
//! scheduled count. Failed glyphs still count, so the barrier always drains.
//!
//! Tickets carry the generation of the load that issued them. A floor switch
//! replaces the load while the host may still be resolving the old floor's
//! glyphs; those late completions must not count toward the new barrier.
//!
//! Objects that cannot be decoded at all (unknown icons) are never scheduled.
//! They are recorded in `skipped` for the caller to surface as notices.

#[cfg(test)]
#[path = "load_test.rs"]
mod load_test;

use std::sync::atomic::{AtomicU64, Ordering};

use tracing::{debug, warn};

use crate::codec::{DecodeContext, Decoded, GlyphRequest, decode};
use crate::doc::Floor;
use crate::error::DecodeError;
use crate::glyph::GlyphPart;
use crate::icons::IconCatalog;
use crate::scene::{Scene, SceneObject};

static NEXT_GENERATION: AtomicU64 = AtomicU64::new(1);

/// Identifies one scheduled glyph: the load that issued it and the object's
/// index on that floor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Ticket {
    load: u64,
    index: usize,
}

/// A glyph the caller must resolve and hand back through `FloorLoad::complete`.
#[derive(Debug, Clone)]
pub struct GlyphJob {
    pub ticket: Ticket,
    pub request: GlyphRequest,
}

/// Barrier state after a completion.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadProgress {
    Pending { completed: usize, scheduled: usize },
    Ready,
}

#[derive(Debug)]
enum Slot {
    Placed(SceneObject),
    Waiting(GlyphRequest),
    Dropped,
}

/// In-flight load of one floor.
#[derive(Debug)]
pub struct FloorLoad {
    generation: u64,
    slots: Vec<Slot>,
    scheduled: usize,
    completed: usize,
    skipped: Vec<DecodeError>,
    dropped: Vec<usize>,
}

/// A floor loaded in one go by `FloorLoad::load_now`.
#[derive(Debug, Default)]
pub struct LoadedFloor {
    pub scene: Scene,
    pub skipped: Vec<DecodeError>,
    /// Floor indices of the objects missing from `scene`, ascending.
    pub dropped: Vec<usize>,
}

impl FloorLoad {
    /// Decode every object of `floor` and schedule its icons.
    #[must_use]
    pub fn begin(floor: &Floor, catalog: &IconCatalog, ctx: DecodeContext) -> (Self, Vec<GlyphJob>) {
        let generation = NEXT_GENERATION.fetch_add(1, Ordering::Relaxed);
        let mut slots = Vec::with_capacity(floor.objects.len());
        let mut jobs = Vec::new();
        let mut skipped = Vec::new();
        let mut dropped = Vec::new();

        for (index, object) in floor.objects.iter().enumerate() {
            match decode(object, catalog, ctx) {
                Ok(Decoded::Ready(placed)) => slots.push(Slot::Placed(placed)),
                Ok(Decoded::Pending(request)) => {
                    jobs.push(GlyphJob { ticket: Ticket { load: generation, index }, request: request.clone() });
                    slots.push(Slot::Waiting(request));
                }
                Err(e) => {
                    warn!(index, error = %e, "skipping undecodable object");
                    skipped.push(e);
                    dropped.push(index);
                    slots.push(Slot::Dropped);
                }
            }
        }

        debug!(generation, objects = slots.len(), scheduled = jobs.len(), "floor load started");
        let load = Self { generation, slots, scheduled: jobs.len(), completed: 0, skipped, dropped };
        (load, jobs)
    }

    /// Record the outcome of one scheduled glyph.
    ///
    /// Tickets issued by another load, unknown tickets and already-completed
    /// tickets are ignored.
    pub fn complete(&mut self, ticket: Ticket, result: Result<Vec<GlyphPart>, DecodeError>) -> LoadProgress {
        if !self.issued(ticket) {
            debug!(
                ticket_load = ticket.load,
                generation = self.generation,
                "ignoring completion from a superseded load"
            );
            return self.progress();
        }
        let Some(slot) = self.slots.get_mut(ticket.index) else {
            warn!(ticket = ticket.index, "ignoring completion for unknown ticket");
            return self.progress();
        };
        if !matches!(slot, Slot::Waiting(_)) {
            warn!(ticket = ticket.index, "ignoring duplicate completion");
            return self.progress();
        }
        let Slot::Waiting(request) = std::mem::replace(slot, Slot::Dropped) else {
            return self.progress();
        };
        match result {
            Ok(parts) => *slot = Slot::Placed(request.finish(parts)),
            Err(e) => {
                warn!(icon = request.icon(), error = %e, "glyph failed to load");
                self.skipped.push(e);
                self.dropped.push(ticket.index);
            }
        }
        self.completed += 1;
        self.progress()
    }

    /// Whether `ticket` was handed out by this load.
    #[must_use]
    pub fn issued(&self, ticket: Ticket) -> bool {
        ticket.load == self.generation
    }

    #[must_use]
    pub fn progress(&self) -> LoadProgress {
        if self.completed == self.scheduled {
            LoadProgress::Ready
        } else {
            LoadProgress::Pending { completed: self.completed, scheduled: self.scheduled }
        }
    }

    #[must_use]
    pub fn is_ready(&self) -> bool {
        self.progress() == LoadProgress::Ready
    }

    /// Errors for objects that will not appear in the scene.
    #[must_use]
    pub fn skipped(&self) -> &[DecodeError] {
        &self.skipped
    }

    /// Floor indices of objects that will not appear in the scene, ascending.
    #[must_use]
    pub fn dropped(&self) -> Vec<usize> {
        let mut dropped = self.dropped.clone();
        dropped.sort_unstable();
        dropped
    }

    /// The placed scene in stored z-order, once every glyph has completed.
    /// Returns `None` while the barrier is still pending.
    pub fn finish(&mut self) -> Option<Scene> {
        if !self.is_ready() {
            return None;
        }
        let objects = std::mem::take(&mut self.slots)
            .into_iter()
            .filter_map(|slot| match slot {
                Slot::Placed(object) => Some(object),
                Slot::Waiting(_) | Slot::Dropped => None,
            })
            .collect();
        Some(Scene::new(objects))
    }

    /// Resolve every glyph in place and return the finished scene.
    #[must_use]
    pub fn load_now(floor: &Floor, catalog: &IconCatalog, ctx: DecodeContext) -> LoadedFloor {
        let (mut load, jobs) = Self::begin(floor, catalog, ctx);
        for job in jobs {
            let result = job.request.resolve();
            load.complete(job.ticket, result);
        }
        let dropped = load.dropped();
        let skipped = std::mem::take(&mut load.skipped);
        LoadedFloor { scene: load.finish().unwrap_or_default(), skipped, dropped }
    }
}
