//! `BehaviorEngine` — drives every agent's state machine.
//!
//! # Transitions
//!
//! | From              | Event                                    | To                 |
//! |-------------------|------------------------------------------|--------------------|
//! | any               | `assign_goal`                            | `SeekingPath`      |
//! | any               | `cancel`                                 | `Idle`             |
//! | `SeekingPath`     | path found                               | `Moving`           |
//! | `SeekingPath`     | `NoPathFound` / `InvalidEndpoint`        | `Idle`             |
//! | `Moving`          | next step still enterable                | `Moving`           |
//! | `Moving`          | next step went impassable                | replan (same tick) |
//! | `Moving`          | move lost a conflict / target vanished   | `SeekingPath`      |
//! | `Moving`          | move blocked by an occupant              | `Moving` (waits)   |
//! | `Moving`          | blocked `MAX_BLOCKED_TICKS` in a row     | `SeekingPath`      |
//! | `Moving`          | goal held by an agent that is not moving | `Idle`             |
//! | `Moving`          | path consumed, terminal action set       | `ExecutingAction`  |
//! | `Moving`          | path consumed, no action                 | `Idle`             |
//! | `ExecutingAction` | `Perform` committed                      | `Idle`             |
//!
//! A path whose start is already the goal is consumed the moment it is
//! adopted, so an agent told to go where it stands arrives in the same tick.
//!
//! A mover that has waited `MAX_BLOCKED_TICKS` behind an agent that is not
//! moving searches again with that tile treated as impassable; behind a
//! moving agent it simply searches again.

use tw_agent::{ActivePath, AgentState, AgentStore};
use tw_core::{ActionId, AgentId, Coord};
use tw_grid::TileGrid;
use tw_spatial::Pathfinder;

use crate::{
    Arrival, BehaviorError, BehaviorResult, BlockedOutcome, Decision, Intent, TickContext,
    Transition,
};

/// Consecutive blocked ticks a mover waits before searching again.
pub const MAX_BLOCKED_TICKS: u32 = 4;

/// Per-agent state machine driver, generic over the search algorithm.
///
/// The engine holds no per-agent data: everything lives in the
/// [`AgentStore`] passed in, so one engine can be shared across Rayon
/// workers during the decide phase.
#[derive(Debug, Clone, Default)]
pub struct BehaviorEngine<P: Pathfinder> {
    pathfinder: P,
}

impl<P: Pathfinder> BehaviorEngine<P> {
    pub fn new(pathfinder: P) -> Self {
        Self { pathfinder }
    }

    pub fn pathfinder(&self) -> &P {
        &self.pathfinder
    }

    // ── Commands ──────────────────────────────────────────────────────────

    /// Give `agent` a new destination and optional terminal action.
    ///
    /// Any path in progress is discarded and the agent is `SeekingPath`
    /// immediately.  Only the id and the goal's bounds are checked here;
    /// passability is a matter for the next search, which reports
    /// `InvalidEndpoint` without failing the tick.
    pub fn assign_goal(
        &self,
        agents: &mut AgentStore,
        grid:   &TileGrid,
        agent:  AgentId,
        goal:   Coord,
        action: Option<ActionId>,
    ) -> BehaviorResult<()> {
        let i = agents.slot(agent).ok_or(BehaviorError::AgentNotFound(agent))?;
        if !grid.contains(goal) {
            return Err(BehaviorError::OutOfBounds(goal));
        }
        agents.goal[i]          = Some(goal);
        agents.action[i]        = action;
        agents.path[i]          = None;
        agents.state[i]         = AgentState::SeekingPath;
        agents.blocked_ticks[i] = 0;
        agents.detour[i]        = None;
        Ok(())
    }

    /// Drop goal, path and action; the agent goes `Idle` where it stands.
    pub fn cancel(&self, agents: &mut AgentStore, agent: AgentId) -> BehaviorResult<()> {
        if !agents.is_alive(agent) {
            return Err(BehaviorError::AgentNotFound(agent));
        }
        agents.clear_goal(agent);
        Ok(())
    }

    // ── Decide (read-only) ────────────────────────────────────────────────

    /// Decide what `agent` does this tick.  Pure: reads `ctx`, writes
    /// nothing, and returns the same decision for the same inputs.
    pub fn decide(&self, agent: AgentId, ctx: &TickContext<'_>) -> Decision {
        let agents = ctx.agents;
        let Some(i) = agents.slot(agent) else {
            return Decision::idle(agent);
        };

        match agents.state[i] {
            AgentState::Idle => Decision::idle(agent),

            AgentState::SeekingPath => self.plan(agent, i, ctx, false),

            AgentState::ExecutingAction(action) => Decision {
                agent,
                intent:     Some(Intent::Perform(action)),
                transition: Transition::Stay,
                stale:      false,
            },

            AgentState::Moving => {
                let next = agents.path[i].as_ref().and_then(ActivePath::next_step);
                match next {
                    Some(to) if agents.constraints[i].can_enter_at(ctx.grid, to) => Decision {
                        agent,
                        intent:     Some(Intent::Move { to }),
                        transition: Transition::Stay,
                        stale:      false,
                    },
                    Some(_) => self.plan(agent, i, ctx, true),
                    None    => self.plan(agent, i, ctx, false),
                }
            }
        }
    }

    /// Decisions for every active agent, in ascending `AgentId` order.
    ///
    /// With the `parallel` feature the calls run on the current Rayon pool;
    /// the result is identical to the sequential path.
    pub fn decide_all(&self, ctx: &TickContext<'_>) -> Vec<Decision> {
        let active: Vec<AgentId> = ctx
            .agents
            .agent_ids()
            .filter(|a| ctx.agents.state[a.index()].is_active())
            .collect();

        #[cfg(not(feature = "parallel"))]
        {
            active.iter().map(|&agent| self.decide(agent, ctx)).collect()
        }

        #[cfg(feature = "parallel")]
        {
            use rayon::prelude::*;

            active.par_iter().map(|&agent| self.decide(agent, ctx)).collect()
        }
    }

    /// Search from the agent's position to its goal.
    fn plan(&self, agent: AgentId, i: usize, ctx: &TickContext<'_>, stale: bool) -> Decision {
        let agents = ctx.agents;
        // SeekingPath and Moving always carry a goal.
        let Some(goal) = agents.goal[i] else {
            return Decision::idle(agent);
        };
        let start = agents.position[i];
        let constraints = match agents.detour[i] {
            Some(avoid) => agents.constraints[i].avoiding(avoid),
            None        => agents.constraints[i],
        };

        match self.pathfinder.find_path(ctx.grid, ctx.index, start, goal, &constraints) {
            Ok(path) => {
                let intent = match path.steps().get(1) {
                    Some(&to) => Some(Intent::Move { to }),
                    None      => agents.action[i].map(Intent::Perform),
                };
                Decision { agent, intent, transition: Transition::Follow(path), stale }
            }
            Err(e) => Decision { agent, intent: None, transition: Transition::GiveUp(e), stale },
        }
    }

    // ── Apply (the only state writers) ────────────────────────────────────

    /// Apply the transition part of `decision`.  Returns an [`Arrival`] when
    /// the adopted path is already complete.
    pub fn apply_decision(&self, agents: &mut AgentStore, decision: &Decision) -> Option<Arrival> {
        let i = agents.slot(decision.agent)?;
        match &decision.transition {
            Transition::Stay => None,
            Transition::GiveUp(_) => {
                agents.clear_goal(decision.agent);
                None
            }
            Transition::Follow(path) => {
                agents.detour[i] = None;
                let active = ActivePath::new(path.clone());
                if active.is_finished() {
                    return Some(arrive(agents, decision.agent, i));
                }
                agents.path[i]  = Some(active);
                agents.state[i] = AgentState::Moving;
                None
            }
        }
    }

    /// The world moved `agent` onto `to`.  Advances the path cursor and
    /// returns an [`Arrival`] if that was the last step.
    pub fn on_move_committed(
        &self,
        agents: &mut AgentStore,
        agent:  AgentId,
        to:     Coord,
    ) -> Option<Arrival> {
        let i = agents.slot(agent)?;
        agents.position[i] = to;
        agents.blocked_ticks[i] = 0;
        let finished = match agents.path[i].as_mut() {
            Some(active) => {
                active.advance();
                active.is_finished()
            }
            None => false,
        };
        finished.then(|| arrive(agents, agent, i))
    }

    /// The world refused `agent`'s move.
    ///
    /// With `replan` the path is dropped and the agent searches again next
    /// tick; without it the agent keeps its path and retries the same step.
    pub fn on_move_rejected(&self, agents: &mut AgentStore, agent: AgentId, replan: bool) {
        let Some(i) = agents.slot(agent) else { return };
        if replan {
            agents.path[i]          = None;
            agents.state[i]         = AgentState::SeekingPath;
            agents.blocked_ticks[i] = 0;
        }
    }

    /// `agent`'s step onto `target` was refused because another agent holds
    /// it.  `occupant_moving` is whether that agent asked to move this tick.
    pub fn on_move_blocked(
        &self,
        agents:          &mut AgentStore,
        agent:           AgentId,
        target:          Coord,
        occupant_moving: bool,
    ) -> BlockedOutcome {
        let Some(i) = agents.slot(agent) else { return BlockedOutcome::Wait };
        let at_goal = agents.goal[i] == Some(target);
        if at_goal && !occupant_moving {
            agents.clear_goal(agent);
            return BlockedOutcome::GoalOccupied;
        }

        agents.blocked_ticks[i] += 1;
        if agents.blocked_ticks[i] < MAX_BLOCKED_TICKS {
            return BlockedOutcome::Wait;
        }
        agents.blocked_ticks[i] = 0;
        agents.path[i]          = None;
        agents.state[i]         = AgentState::SeekingPath;
        // Routing around the goal itself would only fail the search.
        if occupant_moving || at_goal {
            BlockedOutcome::Replan
        } else {
            agents.detour[i] = Some(target);
            BlockedOutcome::Detour
        }
    }

    /// The terminal action committed; the agent's goal is complete.
    pub fn on_action_performed(&self, agents: &mut AgentStore, agent: AgentId) {
        agents.clear_goal(agent);
    }
}

/// Path consumed: queue the terminal action or go idle.
fn arrive(agents: &mut AgentStore, agent: AgentId, i: usize) -> Arrival {
    let at = agents.position[i];
    let action = agents.action[i];
    match action {
        Some(a) => {
            agents.path[i]  = None;
            agents.state[i] = AgentState::ExecutingAction(a);
        }
        None => agents.clear_goal(agent),
    }
    Arrival { agent, at, action }
}
