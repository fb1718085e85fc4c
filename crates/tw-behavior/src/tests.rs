//! Unit tests for tw-behavior.

#[cfg(test)]
mod helpers {
    use tw_agent::AgentStore;
    use tw_core::{AgentId, Coord, Tick};
    use tw_grid::{Tile, TileGrid};
    use tw_spatial::{AStar, AgentConstraints, SpatialIndex};

    use crate::{BehaviorEngine, Decision, TickContext};

    pub struct Fixture {
        pub grid:   TileGrid,
        pub index:  SpatialIndex,
        pub agents: AgentStore,
        pub engine: BehaviorEngine<AStar>,
    }

    impl Fixture {
        pub fn open(w: u32, h: u32) -> Self {
            let grid = TileGrid::bounded(w, h, Tile::open());
            let index = SpatialIndex::build(&grid);
            Self { grid, index, agents: AgentStore::new(), engine: BehaviorEngine::new(AStar::new()) }
        }

        pub fn spawn(&mut self, x: i32, y: i32) -> AgentId {
            self.agents.spawn(Coord::new(x, y), AgentConstraints::four())
        }

        pub fn set(&mut self, c: Coord, tile: Tile) {
            self.grid.set(c, tile).unwrap();
            self.index.sync(&self.grid);
        }

        pub fn decide(&self, agent: AgentId) -> Decision {
            let ctx = TickContext::new(Tick::ZERO, &self.grid, &self.index, &self.agents);
            self.engine.decide(agent, &ctx)
        }

        pub fn decide_all(&self) -> Vec<Decision> {
            let ctx = TickContext::new(Tick::ZERO, &self.grid, &self.index, &self.agents);
            self.engine.decide_all(&ctx)
        }
    }
}

// ── Commands ──────────────────────────────────────────────────────────────────

#[cfg(test)]
mod commands {
    use tw_agent::AgentState;
    use tw_core::{ActionId, AgentId, Coord};

    use crate::BehaviorError;

    #[test]
    fn assign_goal_validates_id_and_bounds() {
        let mut f = super::helpers::Fixture::open(4, 4);
        let a = f.spawn(0, 0);
        let (engine, grid) = (&f.engine, &f.grid);

        assert_eq!(
            engine.assign_goal(&mut f.agents, grid, AgentId(9), Coord::new(1, 1), None),
            Err(BehaviorError::AgentNotFound(AgentId(9)))
        );
        assert_eq!(
            engine.assign_goal(&mut f.agents, grid, a, Coord::new(4, 0), None),
            Err(BehaviorError::OutOfBounds(Coord::new(4, 0)))
        );
        assert_eq!(f.agents.state(a), Some(AgentState::Idle), "failed command changes nothing");

        engine.assign_goal(&mut f.agents, grid, a, Coord::new(3, 3), Some(ActionId(2))).unwrap();
        assert_eq!(f.agents.state(a), Some(AgentState::SeekingPath));
        assert_eq!(f.agents.goal(a), Some(Coord::new(3, 3)));
    }

    #[test]
    fn reassignment_discards_path() {
        let mut f = super::helpers::Fixture::open(4, 4);
        let a = f.spawn(0, 0);
        f.engine.assign_goal(&mut f.agents, &f.grid, a, Coord::new(3, 0), None).unwrap();
        let d = f.decide(a);
        f.engine.apply_decision(&mut f.agents, &d);
        assert_eq!(f.agents.state(a), Some(AgentState::Moving));

        f.engine.assign_goal(&mut f.agents, &f.grid, a, Coord::new(0, 3), None).unwrap();
        assert_eq!(f.agents.state(a), Some(AgentState::SeekingPath));
        assert!(f.agents.active_path(a).is_none());
    }

    #[test]
    fn cancel_goes_idle() {
        let mut f = super::helpers::Fixture::open(4, 4);
        let a = f.spawn(0, 0);
        f.engine.assign_goal(&mut f.agents, &f.grid, a, Coord::new(3, 3), None).unwrap();
        f.engine.cancel(&mut f.agents, a).unwrap();
        assert_eq!(f.agents.state(a), Some(AgentState::Idle));
        assert_eq!(f.agents.goal(a), None);

        f.agents.despawn(a);
        assert_eq!(f.engine.cancel(&mut f.agents, a), Err(BehaviorError::AgentNotFound(a)));
    }
}

// ── Decide ────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod decide {
    use tw_agent::AgentState;
    use tw_core::{ActionId, AgentId, Coord};
    use tw_grid::Tile;
    use tw_spatial::{EndpointReason, SpatialError};

    use crate::{Decision, Intent, Transition};

    #[test]
    fn idle_and_unknown_agents_do_nothing() {
        let mut f = super::helpers::Fixture::open(3, 3);
        let a = f.spawn(0, 0);
        assert_eq!(f.decide(a), Decision::idle(a));
        assert_eq!(f.decide(AgentId(42)), Decision::idle(AgentId(42)));
    }

    #[test]
    fn seeking_agent_moves_in_the_same_tick() {
        let mut f = super::helpers::Fixture::open(5, 1);
        let a = f.spawn(0, 0);
        f.engine.assign_goal(&mut f.agents, &f.grid, a, Coord::new(4, 0), None).unwrap();

        let d = f.decide(a);
        assert_eq!(d.intent, Some(Intent::Move { to: Coord::new(1, 0) }));
        assert!(!d.stale);
        match &d.transition {
            Transition::Follow(path) => assert_eq!(path.cost(), 4.0),
            other => panic!("expected Follow, got {other:?}"),
        }
    }

    #[test]
    fn decide_is_pure() {
        let mut f = super::helpers::Fixture::open(5, 5);
        let a = f.spawn(0, 0);
        f.engine.assign_goal(&mut f.agents, &f.grid, a, Coord::new(4, 4), None).unwrap();
        let before = f.agents.clone();
        let d1 = f.decide(a);
        let d2 = f.decide(a);
        assert_eq!(d1, d2);
        assert_eq!(f.agents.state, before.state);
        assert_eq!(f.agents.path, before.path);
    }

    #[test]
    fn invalid_goal_gives_up() {
        let mut f = super::helpers::Fixture::open(3, 3);
        f.set(Coord::new(2, 2), Tile::wall());
        let a = f.spawn(0, 0);
        f.engine.assign_goal(&mut f.agents, &f.grid, a, Coord::new(2, 2), None).unwrap();

        let d = f.decide(a);
        assert_eq!(d.intent, None);
        assert_eq!(
            d.transition,
            Transition::GiveUp(SpatialError::InvalidEndpoint {
                coord:  Coord::new(2, 2),
                reason: EndpointReason::Impassable,
            })
        );
        f.engine.apply_decision(&mut f.agents, &d);
        assert_eq!(f.agents.state(a), Some(AgentState::Idle));
        assert_eq!(f.agents.goal(a), None);
    }

    #[test]
    fn unreachable_goal_gives_up() {
        let mut f = super::helpers::Fixture::open(3, 3);
        for y in 0..3 {
            f.set(Coord::new(1, y), Tile::wall());
        }
        let a = f.spawn(0, 0);
        f.engine.assign_goal(&mut f.agents, &f.grid, a, Coord::new(2, 0), None).unwrap();
        let d = f.decide(a);
        assert_eq!(
            d.transition,
            Transition::GiveUp(SpatialError::NoPathFound { start: Coord::new(0, 0), goal: Coord::new(2, 0) })
        );
    }

    #[test]
    fn blocked_next_step_replans_in_the_same_tick() {
        let mut f = super::helpers::Fixture::open(3, 3);
        let a = f.spawn(0, 0);
        f.engine.assign_goal(&mut f.agents, &f.grid, a, Coord::new(2, 0), None).unwrap();
        let d = f.decide(a);
        f.engine.apply_decision(&mut f.agents, &d);
        assert_eq!(f.agents.state(a), Some(AgentState::Moving));

        f.set(Coord::new(1, 0), Tile::wall());
        let d = f.decide(a);
        assert!(d.stale);
        assert_eq!(d.intent, Some(Intent::Move { to: Coord::new(0, 1) }));
        match &d.transition {
            Transition::Follow(path) => {
                assert!(!path.contains(Coord::new(1, 0)));
                assert_eq!(path.cost(), 4.0);
            }
            other => panic!("expected Follow, got {other:?}"),
        }
    }

    #[test]
    fn executing_agent_performs() {
        let mut f = super::helpers::Fixture::open(3, 3);
        let a = f.spawn(0, 0);
        f.agents.state[a.index()] = AgentState::ExecutingAction(ActionId(5));
        let d = f.decide(a);
        assert_eq!(d.intent, Some(Intent::Perform(ActionId(5))));
        assert_eq!(d.transition, Transition::Stay);
    }

    #[test]
    fn decide_all_covers_active_agents_in_id_order() {
        let mut f = super::helpers::Fixture::open(6, 6);
        let ids: Vec<AgentId> = (0..6).map(|x| f.spawn(x, 0)).collect();
        for &a in ids.iter().rev().step_by(2) {
            f.engine.assign_goal(&mut f.agents, &f.grid, a, Coord::new(a.0 as i32, 5), None).unwrap();
        }
        let all = f.decide_all();
        let agents: Vec<AgentId> = all.iter().map(|d| d.agent).collect();
        assert_eq!(agents, vec![AgentId(1), AgentId(3), AgentId(5)]);
        for d in &all {
            assert_eq!(d, &f.decide(d.agent));
        }
    }
}

// ── Apply ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod apply {
    use tw_agent::AgentState;
    use tw_core::{ActionId, Coord};

    use crate::{Arrival, BlockedOutcome, Intent, MAX_BLOCKED_TICKS, Transition};

    #[test]
    fn walk_then_act_then_idle() {
        let mut f = super::helpers::Fixture::open(3, 1);
        let a = f.spawn(0, 0);
        f.engine.assign_goal(&mut f.agents, &f.grid, a, Coord::new(2, 0), Some(ActionId(7))).unwrap();

        let mut arrival = None;
        for _ in 0..2 {
            let d = f.decide(a);
            assert_eq!(f.engine.apply_decision(&mut f.agents, &d), None);
            let Some(Intent::Move { to }) = d.intent else { panic!("expected a move") };
            arrival = f.engine.on_move_committed(&mut f.agents, a, to);
        }
        assert_eq!(
            arrival,
            Some(Arrival { agent: a, at: Coord::new(2, 0), action: Some(ActionId(7)) })
        );
        assert_eq!(f.agents.state(a), Some(AgentState::ExecutingAction(ActionId(7))));

        let d = f.decide(a);
        assert_eq!(d.intent, Some(Intent::Perform(ActionId(7))));
        f.engine.on_action_performed(&mut f.agents, a);
        assert_eq!(f.agents.state(a), Some(AgentState::Idle));
        assert_eq!(f.agents.goal(a), None);
    }

    #[test]
    fn goal_at_current_tile_arrives_immediately() {
        let mut f = super::helpers::Fixture::open(3, 3);
        let a = f.spawn(1, 1);
        f.engine.assign_goal(&mut f.agents, &f.grid, a, Coord::new(1, 1), None).unwrap();
        let d = f.decide(a);
        assert_eq!(d.intent, None);
        let arrival = f.engine.apply_decision(&mut f.agents, &d);
        assert_eq!(arrival, Some(Arrival { agent: a, at: Coord::new(1, 1), action: None }));
        assert_eq!(f.agents.state(a), Some(AgentState::Idle));
    }

    #[test]
    fn goal_at_current_tile_with_action_performs_now() {
        let mut f = super::helpers::Fixture::open(3, 3);
        let a = f.spawn(1, 1);
        f.engine.assign_goal(&mut f.agents, &f.grid, a, Coord::new(1, 1), Some(ActionId(1))).unwrap();
        let d = f.decide(a);
        assert_eq!(d.intent, Some(Intent::Perform(ActionId(1))));
        f.engine.apply_decision(&mut f.agents, &d);
        assert_eq!(f.agents.state(a), Some(AgentState::ExecutingAction(ActionId(1))));
    }

    #[test]
    fn rejected_moves() {
        let mut f = super::helpers::Fixture::open(4, 1);
        let a = f.spawn(0, 0);
        f.engine.assign_goal(&mut f.agents, &f.grid, a, Coord::new(3, 0), None).unwrap();
        let d = f.decide(a);
        f.engine.apply_decision(&mut f.agents, &d);

        f.engine.on_move_rejected(&mut f.agents, a, false);
        assert_eq!(f.agents.state(a), Some(AgentState::Moving));
        assert_eq!(f.agents.active_path(a).map(|p| p.cursor()), Some(0));
        assert_eq!(f.agents.position(a), Some(Coord::new(0, 0)));

        f.engine.on_move_rejected(&mut f.agents, a, true);
        assert_eq!(f.agents.state(a), Some(AgentState::SeekingPath));
        assert!(f.agents.active_path(a).is_none());
        assert_eq!(f.agents.goal(a), Some(Coord::new(3, 0)), "goal survives a lost conflict");
    }

    #[test]
    fn blocked_moves_wait_then_search_again() {
        let mut f = super::helpers::Fixture::open(3, 3);
        let a = f.spawn(0, 1);
        let goal = Coord::new(2, 1);
        let blocker = Coord::new(1, 1);
        f.engine.assign_goal(&mut f.agents, &f.grid, a, goal, None).unwrap();
        let d = f.decide(a);
        f.engine.apply_decision(&mut f.agents, &d);

        for _ in 1..MAX_BLOCKED_TICKS {
            let outcome = f.engine.on_move_blocked(&mut f.agents, a, blocker, false);
            assert_eq!(outcome, BlockedOutcome::Wait);
        }
        assert_eq!(f.agents.blocked_ticks(a), MAX_BLOCKED_TICKS - 1);
        assert_eq!(f.engine.on_move_blocked(&mut f.agents, a, blocker, false), BlockedOutcome::Detour);
        assert_eq!(f.agents.state(a), Some(AgentState::SeekingPath));

        let d = f.decide(a);
        let Some(Intent::Move { to }) = d.intent else { panic!("expected a move") };
        assert_ne!(to, blocker);
        let Transition::Follow(path) = &d.transition else { panic!("expected a path") };
        assert!(!path.steps().contains(&blocker));
        f.engine.apply_decision(&mut f.agents, &d);
        assert_eq!(f.agents.detour[a.index()], None, "the detour covers one search");
    }

    #[test]
    fn blocked_behind_a_mover_replans_without_detour() {
        let mut f = super::helpers::Fixture::open(4, 1);
        let a = f.spawn(0, 0);
        f.engine.assign_goal(&mut f.agents, &f.grid, a, Coord::new(3, 0), None).unwrap();
        let d = f.decide(a);
        f.engine.apply_decision(&mut f.agents, &d);

        let mut outcome = BlockedOutcome::Wait;
        for _ in 0..MAX_BLOCKED_TICKS {
            outcome = f.engine.on_move_blocked(&mut f.agents, a, Coord::new(1, 0), true);
        }
        assert_eq!(outcome, BlockedOutcome::Replan);
        assert_eq!(f.agents.detour[a.index()], None);
        assert_eq!(f.agents.goal(a), Some(Coord::new(3, 0)));
    }

    #[test]
    fn occupied_goal_is_dropped() {
        let mut f = super::helpers::Fixture::open(2, 1);
        let a = f.spawn(0, 0);
        let goal = Coord::new(1, 0);
        f.engine.assign_goal(&mut f.agents, &f.grid, a, goal, Some(ActionId(2))).unwrap();
        let d = f.decide(a);
        f.engine.apply_decision(&mut f.agents, &d);

        assert_eq!(f.engine.on_move_blocked(&mut f.agents, a, goal, true), BlockedOutcome::Wait);
        assert_eq!(f.engine.on_move_blocked(&mut f.agents, a, goal, false), BlockedOutcome::GoalOccupied);
        assert_eq!(f.agents.state(a), Some(AgentState::Idle));
        assert_eq!(f.agents.goal(a), None);
        assert_eq!(f.agents.action[a.index()], None);
    }
}
