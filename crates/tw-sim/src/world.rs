//! The `World` struct and its step loop.

use std::sync::Arc;

use rustc_hash::{FxHashMap, FxHashSet};
use tracing::{debug, debug_span, warn};

use tw_agent::{ActivePath, AgentState, AgentStore};
use tw_behavior::{BehaviorEngine, BlockedOutcome, Decision, Intent, TickContext, Transition};
use tw_core::{ActionId, AgentId, Coord, SimConfig, Tick};
use tw_grid::{GridError, Tile, TileGrid};
use tw_spatial::{AgentConstraints, Pathfinder, SpatialError, SpatialIndex};

use crate::resolve::{resolve_moves, MoveRecord, MoveRequest, Rejection};
use crate::{SimError, SimEvent, SimObserver, SimResult, WorldSnapshot};

// ── TickReport ────────────────────────────────────────────────────────────────

/// Everything one call to [`World::step`] changed.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TickReport {
    /// The tick that was processed.
    pub tick: Tick,
    /// Committed moves, ascending `AgentId`.
    pub moved: Vec<MoveRecord>,
    /// Committed terminal actions, ascending `AgentId`.
    pub actions: Vec<(AgentId, ActionId)>,
    /// Outcomes in the order the tick produced them.
    pub events: Vec<SimEvent>,
}

impl TickReport {
    /// Events concerning `agent`.
    pub fn events_for(&self, agent: AgentId) -> impl Iterator<Item = &SimEvent> + '_ {
        self.events.iter().filter(move |e| e.agent() == Some(agent))
    }

    /// Where `agent` moved to this tick, if it moved.
    pub fn moved_to(&self, agent: AgentId) -> Option<Coord> {
        self.moved.iter().find(|m| m.agent == agent).map(|m| m.to)
    }
}

// ── World ─────────────────────────────────────────────────────────────────────

/// The simulation: grid, agents, and the step loop that advances them.
///
/// Each [`step`](Self::step) runs these phases in order:
///
/// 0. **Sync** the spatial index with the grid.
/// 1. **Decide** (optionally parallel with the `parallel` feature): one
///    [`Decision`] per active agent from a read-only [`TickContext`].
/// 2. **Transitions** (sequential, ascending `AgentId`): adopt new paths,
///    give up on failed searches.  One agent's failure never touches another.
/// 3. **Edits**: apply queued tile edits, rejecting any that would leave an
///    occupant on a tile it could not enter; re-sync the index.
/// 4. **Resolve** `Move` intents (see [`crate::resolve`]).
/// 5. **Commit** surviving moves and performed actions; advance the clock.
/// 6. **Publish** a new [`WorldSnapshot`].
///
/// Create via [`WorldBuilder`][crate::WorldBuilder].
pub struct World<P: Pathfinder> {
    config:    SimConfig,
    tick:      Tick,
    grid:      TileGrid,
    index:     SpatialIndex,
    agents:    AgentStore,
    engine:    BehaviorEngine<P>,
    occupancy: FxHashMap<Coord, AgentId>,
    /// Edits queued between ticks, applied in phase 3.
    pending_edits: Vec<(Coord, Tile)>,
    snapshot:  Arc<WorldSnapshot>,

    #[cfg(feature = "parallel")]
    pool: Option<rayon::ThreadPool>,
}

impl<P: Pathfinder> World<P> {
    pub(crate) fn new(config: SimConfig, grid: TileGrid, pathfinder: P) -> SimResult<Self> {
        #[cfg(feature = "parallel")]
        let pool = match config.num_threads {
            Some(n) => Some(
                rayon::ThreadPoolBuilder::new()
                    .num_threads(n)
                    .build()
                    .map_err(|e| SimError::Config(e.to_string()))?,
            ),
            None => None,
        };

        let index = SpatialIndex::build(&grid);
        let mut world = Self {
            config,
            tick: Tick::ZERO,
            grid,
            index,
            agents: AgentStore::new(),
            engine: BehaviorEngine::new(pathfinder),
            occupancy: FxHashMap::default(),
            pending_edits: Vec::new(),
            snapshot: Arc::default(),
            #[cfg(feature = "parallel")]
            pool,
        };
        world.publish_snapshot();
        Ok(world)
    }

    // ── Accessors ─────────────────────────────────────────────────────────

    /// The next tick to be processed (equivalently, ticks committed so far).
    pub fn tick(&self) -> Tick {
        self.tick
    }

    pub fn config(&self) -> &SimConfig {
        &self.config
    }

    pub fn grid(&self) -> &TileGrid {
        &self.grid
    }

    pub fn index(&self) -> &SpatialIndex {
        &self.index
    }

    pub fn agents(&self) -> &AgentStore {
        &self.agents
    }

    pub fn engine(&self) -> &BehaviorEngine<P> {
        &self.engine
    }

    /// The latest published snapshot.  Cheap to clone and safe to hand to
    /// another thread; it never changes after publication.
    ///
    /// Republished after every tick and after every command that changes an
    /// agent (`spawn`, `despawn`, `assign_goal*`, `cancel`).  Queued edits
    /// show up once the next tick applies them.
    pub fn snapshot(&self) -> Arc<WorldSnapshot> {
        Arc::clone(&self.snapshot)
    }

    /// Agent standing on `c`.
    pub fn occupant(&self, c: Coord) -> Option<AgentId> {
        self.occupancy.get(&c).copied()
    }

    pub fn agent_state(&self, agent: AgentId) -> Option<AgentState> {
        self.agents.state(agent)
    }

    pub fn agent_position(&self, agent: AgentId) -> Option<Coord> {
        self.agents.position(agent)
    }

    /// Edits waiting for the next tick's edit phase.
    pub fn pending_edits(&self) -> &[(Coord, Tile)] {
        &self.pending_edits
    }

    // ── Commands (between ticks) ──────────────────────────────────────────

    /// Place a new idle agent on `at`.
    ///
    /// Fails with [`SimError::InvalidPlacement`] when `at` is out of bounds or
    /// not enterable under `constraints`, and [`SimError::Occupied`] when
    /// another agent stands there.
    pub fn spawn(&mut self, at: Coord, constraints: AgentConstraints) -> SimResult<AgentId> {
        let agent = self.place(at, constraints)?;
        self.publish_snapshot();
        Ok(agent)
    }

    /// [`spawn`](Self::spawn) without republishing; the builder publishes
    /// once after placing every agent.
    pub(crate) fn place(&mut self, at: Coord, constraints: AgentConstraints) -> SimResult<AgentId> {
        if let Err(SpatialError::InvalidEndpoint { coord, reason }) =
            constraints.check_endpoint(&self.grid, at)
        {
            warn!(%coord, %reason, "spawn rejected");
            return Err(SimError::InvalidPlacement { coord, reason });
        }
        if let Some(&by) = self.occupancy.get(&at) {
            warn!(coord = %at, %by, "spawn rejected: occupied");
            return Err(SimError::Occupied { coord: at, by });
        }
        let agent = self.agents.spawn(at, constraints);
        self.occupancy.insert(at, agent);
        debug!(%agent, %at, "agent spawned");
        Ok(agent)
    }

    /// Remove `agent` from the world.  Its id is never reused.
    pub fn despawn(&mut self, agent: AgentId) -> SimResult<()> {
        let at = self.agents.position(agent).ok_or_else(|| {
            warn!(%agent, "despawn rejected: unknown agent");
            tw_behavior::BehaviorError::AgentNotFound(agent)
        })?;
        self.agents.despawn(agent);
        self.occupancy.remove(&at);
        self.publish_snapshot();
        debug!(%agent, %at, "agent despawned");
        Ok(())
    }

    /// Send `agent` to `goal`.  Any path in progress is discarded.
    pub fn assign_goal(&mut self, agent: AgentId, goal: Coord) -> SimResult<()> {
        self.assign_goal_with_action(agent, goal, None)
    }

    /// Send `agent` to `goal` and have it perform `action` on arrival.
    pub fn assign_goal_with_action(
        &mut self,
        agent:  AgentId,
        goal:   Coord,
        action: Option<ActionId>,
    ) -> SimResult<()> {
        self.engine
            .assign_goal(&mut self.agents, &self.grid, agent, goal, action)
            .map_err(|e| {
                warn!(%agent, %goal, error = %e, "goal rejected");
                SimError::from(e)
            })?;
        self.publish_snapshot();
        debug!(%agent, %goal, "goal assigned");
        Ok(())
    }

    /// Drop `agent`'s goal; it goes idle where it stands.
    pub fn cancel(&mut self, agent: AgentId) -> SimResult<()> {
        self.engine.cancel(&mut self.agents, agent).map_err(|e| {
            warn!(%agent, error = %e, "cancel rejected");
            SimError::from(e)
        })?;
        self.publish_snapshot();
        Ok(())
    }

    /// Queue a tile edit for the next tick's edit phase.
    ///
    /// Out-of-bounds coordinates on a bounded grid fail now; an edit the
    /// occupant could not enter (a wall, or a cost above its ceiling) is
    /// rejected when applied and reported as [`SimEvent::EditRejected`].
    pub fn edit_tile(&mut self, coord: Coord, tile: Tile) -> SimResult<()> {
        if self.grid.is_bounded() && !self.grid.contains(coord) {
            warn!(%coord, "edit rejected: out of bounds");
            return Err(GridError::OutOfBounds(coord).into());
        }
        self.pending_edits.push((coord, tile));
        Ok(())
    }

    // ── Running ───────────────────────────────────────────────────────────

    /// Run from the current tick to `config.end_tick()`.
    ///
    /// Calls observer hooks at every tick boundary.  Use
    /// [`NoopObserver`][crate::NoopObserver] if you don't need callbacks.
    pub fn run<O: SimObserver>(&mut self, observer: &mut O) {
        while self.tick < self.config.end_tick() {
            self.step_with(observer);
        }
        observer.on_sim_end(self.tick);
    }

    /// Run exactly `n` ticks from the current position (ignores `end_tick`).
    pub fn run_ticks<O: SimObserver>(&mut self, n: u64, observer: &mut O) {
        for _ in 0..n {
            self.step_with(observer);
        }
    }

    /// Process one tick with no observer.
    pub fn step(&mut self) -> TickReport {
        self.step_with(&mut crate::NoopObserver)
    }

    /// Process one tick, reporting to `observer`.
    pub fn step_with<O: SimObserver>(&mut self, observer: &mut O) -> TickReport {
        let now = self.tick;
        observer.on_tick_start(now);
        let report = self.process_tick(now);
        for event in &report.events {
            observer.on_event(now, event);
        }
        observer.on_tick_end(&report);
        if self.config.is_snapshot_tick(now) {
            observer.on_snapshot(&self.snapshot);
        }
        report
    }

    // ── Core tick processing ──────────────────────────────────────────────

    fn process_tick(&mut self, now: Tick) -> TickReport {
        let _span = debug_span!("tick", tick = now.0).entered();
        let mut events = Vec::new();

        // ── Phase 0: sync the spatial index ───────────────────────────────
        if self.index.sync(&self.grid) {
            debug!(
                revision = self.grid.revision(),
                rooms = self.index.room_count(),
                "spatial index rebuilt"
            );
        }

        // ── Phase 1: decide (read-only) ───────────────────────────────────
        let decisions = {
            let ctx = TickContext::new(now, &self.grid, &self.index, &self.agents);
            self.decide(&ctx)
        };

        // ── Phase 2: transitions ──────────────────────────────────────────
        //
        // Decisions arrive in ascending AgentId order.  Applying them in
        // that order keeps results identical whether phase 1 ran in
        // parallel or not.
        let mut intents: Vec<(AgentId, Intent)> = Vec::with_capacity(decisions.len());
        for d in &decisions {
            if d.stale {
                let blocked = self
                    .agents
                    .active_path(d.agent)
                    .and_then(ActivePath::next_step)
                    .unwrap_or(self.agents.position[d.agent.index()]);
                events.push(SimEvent::StalePath { agent: d.agent, blocked });
            }
            if let Transition::GiveUp(err) = &d.transition {
                events.push(SimEvent::from_search_error(d.agent, err));
            }
            if let Some(arrival) = self.engine.apply_decision(&mut self.agents, d) {
                events.push(SimEvent::GoalReached { agent: arrival.agent, at: arrival.at });
            }
            if let Some(intent) = d.intent {
                intents.push((d.agent, intent));
            }
        }

        // ── Phase 3: tile edits ───────────────────────────────────────────
        self.apply_edits(&mut events);
        self.index.sync(&self.grid);

        // ── Phase 4: resolve moves ────────────────────────────────────────
        let requests: Vec<MoveRequest> = intents
            .iter()
            .filter_map(|&(agent, intent)| {
                let to = intent.target()?;
                let i = self.agents.slot(agent)?;
                Some(MoveRequest {
                    agent,
                    from: self.agents.position[i],
                    to,
                    constraints: self.agents.constraints[i],
                })
            })
            .collect();
        let resolution = resolve_moves(&self.grid, &self.index, &self.occupancy, &requests);

        let moving: FxHashSet<AgentId> = requests.iter().map(|r| r.agent).collect();
        for &(agent, rejection) in &resolution.rejected {
            match rejection {
                Rejection::Stale { target } => {
                    events.push(SimEvent::StalePath { agent, blocked: target });
                }
                Rejection::Lost { target, winner } => {
                    events.push(SimEvent::ConflictLoss { agent, target, winner });
                }
                Rejection::Blocked { target, by } => {
                    events.push(SimEvent::MoveBlocked { agent, target, by });
                    let outcome = self.engine.on_move_blocked(
                        &mut self.agents,
                        agent,
                        target,
                        moving.contains(&by),
                    );
                    if outcome == BlockedOutcome::GoalOccupied {
                        events.push(SimEvent::GoalOccupied { agent, goal: target, by });
                    }
                    continue;
                }
            }
            self.engine.on_move_rejected(&mut self.agents, agent, rejection.requires_replan());
        }

        // ── Phase 5: commit ───────────────────────────────────────────────
        //
        // Vacate every source before filling any target so rotations land
        // cleanly.
        for m in &resolution.committed {
            self.occupancy.remove(&m.from);
        }
        for m in &resolution.committed {
            self.occupancy.insert(m.to, m.agent);
            if let Some(arrival) = self.engine.on_move_committed(&mut self.agents, m.agent, m.to) {
                events.push(SimEvent::GoalReached { agent: arrival.agent, at: arrival.at });
            }
        }

        let mut actions = Vec::new();
        for &(agent, intent) in &intents {
            let Intent::Perform(action) = intent else { continue };
            if self.agents.state(agent) != Some(AgentState::ExecutingAction(action)) {
                continue;
            }
            let at = self.agents.position[agent.index()];
            self.engine.on_action_performed(&mut self.agents, agent);
            actions.push((agent, action));
            events.push(SimEvent::ActionPerformed { agent, action, at });
        }

        self.tick = now.next();

        // ── Phase 6: publish ──────────────────────────────────────────────
        self.publish_snapshot();

        for event in &events {
            if event.is_warning() {
                warn!(kind = event.kind(), "{event}");
            } else {
                debug!(kind = event.kind(), "{event}");
            }
        }
        debug!(
            moved = resolution.committed.len(),
            actions = actions.len(),
            events = events.len(),
            "tick committed"
        );

        TickReport { tick: now, moved: resolution.committed, actions, events }
    }

    fn decide(&self, ctx: &TickContext<'_>) -> Vec<Decision> {
        #[cfg(feature = "parallel")]
        {
            if let Some(pool) = &self.pool {
                return pool.install(|| self.engine.decide_all(ctx));
            }
        }
        self.engine.decide_all(ctx)
    }

    /// Apply queued edits in the order they were made.  An edit the
    /// occupant of `coord` could not enter is rejected, so no agent ever
    /// stands on a tile it could not have walked onto.
    fn apply_edits(&mut self, events: &mut Vec<SimEvent>) {
        for (coord, tile) in std::mem::take(&mut self.pending_edits) {
            if let Some(&occupant) = self.occupancy.get(&coord) {
                let allowed = self
                    .agents
                    .constraints(occupant)
                    .is_some_and(|c| c.can_enter(&tile));
                if !allowed {
                    events.push(SimEvent::EditRejected { coord, occupant });
                    continue;
                }
            }
            if let Err(e) = self.grid.set(coord, tile) {
                warn!(%coord, error = %e, "edit dropped");
            }
        }
    }

    pub(crate) fn publish_snapshot(&mut self) {
        self.snapshot = Arc::new(WorldSnapshot::capture(
            self.tick,
            &self.grid,
            &self.agents,
            &self.occupancy,
        ));
    }
}
