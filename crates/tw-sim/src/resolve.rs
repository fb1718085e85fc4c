//! Move conflict resolution.
//!
//! Input: every `Move` intent of the tick, in ascending `AgentId` order,
//! plus the committed occupancy.  Output: the moves that may commit
//! together and a rejection for every other one.  Three passes:
//!
//! 1. **Validity** — the target must still be a legal step for the agent
//!    (adjacent, enterable, no corner cutting) after this tick's edits.
//!    Otherwise [`Rejection::Stale`].
//! 2. **Claims** — among movers sharing a target the lowest `AgentId` wins;
//!    the rest get [`Rejection::Lost`].
//! 3. **Occupancy** — repeated until nothing changes: a mover whose target
//!    is held by an agent that is not (or no longer) moving away, or whose
//!    target's occupant is moving onto the mover's own tile (a swap), gets
//!    [`Rejection::Blocked`].  Rotations of three or more agents commit.
//!
//! After pass 3 every surviving target is distinct and either empty or
//! vacated by another survivor, so committing all of them at once can
//! never stack two agents on one tile.

use rustc_hash::{FxHashMap, FxHashSet};

use tw_core::{AgentId, Coord};
use tw_grid::TileGrid;
use tw_spatial::{AgentConstraints, SpatialIndex};

/// One `Move` intent with the data needed to judge it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MoveRequest {
    pub agent:       AgentId,
    pub from:        Coord,
    pub to:          Coord,
    pub constraints: AgentConstraints,
}

/// Why a move did not commit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rejection {
    /// The target stopped being a legal step.
    Stale { target: Coord },
    /// A lower id claimed the same target.
    Lost { target: Coord, winner: AgentId },
    /// The target's occupant is staying put or swapping.
    Blocked { target: Coord, by: AgentId },
}

impl Rejection {
    /// `true` if the agent should drop its path and search again.
    pub fn requires_replan(&self) -> bool {
        !matches!(self, Rejection::Blocked { .. })
    }
}

/// A move cleared for commit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MoveRecord {
    pub agent: AgentId,
    pub from:  Coord,
    pub to:    Coord,
}

#[derive(Debug, Default)]
pub struct Resolution {
    /// Ascending `AgentId`.
    pub committed: Vec<MoveRecord>,
    /// Ascending `AgentId`.
    pub rejected: Vec<(AgentId, Rejection)>,
}

/// Decide which of `requests` (ascending `AgentId`) commit this tick.
pub fn resolve_moves(
    grid:      &TileGrid,
    index:     &SpatialIndex,
    occupancy: &FxHashMap<Coord, AgentId>,
    requests:  &[MoveRequest],
) -> Resolution {
    let mut rejected = Vec::new();

    // ── Pass 1: validity ──────────────────────────────────────────────────
    let valid: Vec<&MoveRequest> = requests
        .iter()
        .filter(|r| {
            let ok = is_legal_step(grid, index, r);
            if !ok {
                rejected.push((r.agent, Rejection::Stale { target: r.to }));
            }
            ok
        })
        .collect();

    // ── Pass 2: claims ────────────────────────────────────────────────────
    let mut claims: FxHashMap<Coord, AgentId> = FxHashMap::default();
    let mut movers: FxHashMap<AgentId, MoveRecord> = FxHashMap::default();
    for r in valid {
        match claims.get(&r.to) {
            Some(&winner) => rejected.push((r.agent, Rejection::Lost { target: r.to, winner })),
            None => {
                claims.insert(r.to, r.agent);
                movers.insert(r.agent, MoveRecord { agent: r.agent, from: r.from, to: r.to });
            }
        }
    }

    // ── Pass 3: occupancy (fixpoint) ──────────────────────────────────────
    let mut blocked: FxHashSet<AgentId> = FxHashSet::default();
    loop {
        let mut changed = false;
        let mut order: Vec<AgentId> = movers.keys().copied().filter(|a| !blocked.contains(a)).collect();
        order.sort_unstable();
        for agent in order {
            let m = movers[&agent];
            let Some(&occupant) = occupancy.get(&m.to) else { continue };
            let leaving = match movers.get(&occupant) {
                Some(o) if !blocked.contains(&occupant) => o.to != m.from,
                _ => false,
            };
            if !leaving {
                blocked.insert(agent);
                rejected.push((agent, Rejection::Blocked { target: m.to, by: occupant }));
                changed = true;
            }
        }
        if !changed {
            break;
        }
    }

    let mut committed: Vec<MoveRecord> = movers
        .into_values()
        .filter(|m| !blocked.contains(&m.agent))
        .collect();
    committed.sort_unstable_by_key(|m| m.agent);
    rejected.sort_by_key(|(agent, _)| *agent);

    Resolution { committed, rejected }
}

fn is_legal_step(grid: &TileGrid, index: &SpatialIndex, r: &MoveRequest) -> bool {
    let mut ok = false;
    index.for_each_step(grid, r.from, &r.constraints, |next, _| ok |= next == r.to);
    ok
}
