//! Unit tests for tw-spatial.
//!
//! Maps are written in the ASCII format; line `n` is row `y = n`.

#[cfg(test)]
mod helpers {
    use tw_grid::{Tile, TileGrid};

    use crate::SpatialIndex;

    pub fn open(w: u32, h: u32) -> (TileGrid, SpatialIndex) {
        let grid = TileGrid::bounded(w, h, Tile::open());
        let index = SpatialIndex::build(&grid);
        (grid, index)
    }

    pub fn map(text: &str) -> (TileGrid, SpatialIndex) {
        let grid = TileGrid::from_ascii(text).unwrap();
        let index = SpatialIndex::build(&grid);
        (grid, index)
    }
}

// ── Constraints ───────────────────────────────────────────────────────────────

#[cfg(test)]
mod constraints {
    use tw_core::Coord;
    use tw_grid::{Terrain, Tile};

    use crate::{AgentConstraints, EndpointReason, SpatialError};

    #[test]
    fn cost_ceiling_excludes_expensive_tiles() {
        let c = AgentConstraints::four().with_max_tile_cost(2.0);
        assert!(c.can_enter(&Tile::new(Terrain::Rough)));
        assert!(!c.can_enter(&Tile::new(Terrain::Water)));
        assert!(!c.can_enter(&Tile::wall()));
        assert!(AgentConstraints::default().can_enter(&Tile::new(Terrain::Water)));
    }

    #[test]
    fn endpoint_reasons() {
        let (grid, _) = super::helpers::map("
.#~
");
        let c = AgentConstraints::four().with_max_tile_cost(1.0);
        assert_eq!(c.check_endpoint(&grid, Coord::new(0, 0)), Ok(()));
        let reason = |x, y| match c.check_endpoint(&grid, Coord::new(x, y)) {
            Err(SpatialError::InvalidEndpoint { reason, .. }) => reason,
            other => panic!("unexpected {other:?}"),
        };
        assert_eq!(reason(1, 0), EndpointReason::Impassable);
        assert_eq!(reason(2, 0), EndpointReason::TooCostly);
        assert_eq!(reason(5, 0), EndpointReason::OutOfBounds);
    }

    #[test]
    fn avoided_tile_is_closed_to_steps_only() {
        let (grid, index) = super::helpers::open(3, 3);
        let held = Coord::new(1, 1);
        let c = AgentConstraints::four().avoiding(held);
        assert!(!c.can_enter_at(&grid, held));
        assert!(c.can_enter_at(&grid, Coord::new(0, 1)));
        assert_eq!(c.check_endpoint(&grid, held), Ok(()));
        assert!(!index.neighbors(&grid, Coord::new(0, 1), &c).contains(&held));
        assert_ne!(c, AgentConstraints::four());
    }
}

// ── Index: adjacency & cost ───────────────────────────────────────────────────

#[cfg(test)]
mod adjacency {
    use tw_core::Coord;

    use crate::{AgentConstraints, SpatialError};

    #[test]
    fn four_way_order_is_n_e_s_w() {
        let (grid, index) = super::helpers::open(3, 3);
        let n = index.neighbors(&grid, Coord::new(1, 1), &AgentConstraints::four());
        assert_eq!(n, vec![Coord::new(1, 2), Coord::new(2, 1), Coord::new(1, 0), Coord::new(0, 1)]);
    }

    #[test]
    fn eight_way_appends_diagonals() {
        let (grid, index) = super::helpers::open(3, 3);
        let n = index.neighbors(&grid, Coord::new(1, 1), &AgentConstraints::eight());
        assert_eq!(n.len(), 8);
        assert_eq!(&n[4..], &[Coord::new(2, 2), Coord::new(2, 0), Coord::new(0, 0), Coord::new(0, 2)]);
    }

    #[test]
    fn edges_of_grid_are_clipped() {
        let (grid, index) = super::helpers::open(3, 3);
        let n = index.neighbors(&grid, Coord::new(0, 0), &AgentConstraints::eight());
        assert_eq!(n, vec![Coord::new(0, 1), Coord::new(1, 0), Coord::new(1, 1)]);
        assert!(index.neighbors(&grid, Coord::new(-5, -5), &AgentConstraints::four()).is_empty());
    }

    #[test]
    fn no_corner_cutting() {
        let (grid, index) = super::helpers::map("
..
#.
");
        // (0,0) -> (1,1) would squeeze past the wall at (0,1).
        let n = index.neighbors(&grid, Coord::new(0, 0), &AgentConstraints::eight());
        assert_eq!(n, vec![Coord::new(1, 0)]);
    }

    #[test]
    fn walls_and_ceiling_excluded() {
        let (grid, index) = super::helpers::map("
.~.
#..
");
        let n = index.neighbors(&grid, Coord::new(0, 0), &AgentConstraints::four());
        assert_eq!(n, vec![Coord::new(1, 0)]);
        let n = index.neighbors(
            &grid,
            Coord::new(0, 0),
            &AgentConstraints::four().with_max_tile_cost(1.0),
        );
        assert!(n.is_empty());
    }

    #[test]
    fn cost_is_entry_cost() {
        let (grid, index) = super::helpers::map("
.,
~.
");
        assert_eq!(index.cost(&grid, Coord::new(0, 0), Coord::new(1, 0)), Ok(2.0));
        assert_eq!(index.cost(&grid, Coord::new(1, 0), Coord::new(0, 0)), Ok(1.0));
        assert_eq!(index.cost(&grid, Coord::new(0, 0), Coord::new(0, 1)), Ok(5.0));
        let diag = index.cost(&grid, Coord::new(0, 0), Coord::new(1, 1)).unwrap();
        assert!((diag - std::f32::consts::SQRT_2).abs() < 1e-6);
    }

    #[test]
    fn invalid_edges() {
        let (grid, index) = super::helpers::map("
.#.
");
        let bad = |from: Coord, to: Coord| {
            assert_eq!(index.cost(&grid, from, to), Err(SpatialError::InvalidEdge { from, to }));
        };
        bad(Coord::new(0, 0), Coord::new(2, 0)); // not adjacent
        bad(Coord::new(0, 0), Coord::new(0, 0)); // same tile
        bad(Coord::new(0, 0), Coord::new(1, 0)); // into a wall
        bad(Coord::new(1, 0), Coord::new(2, 0)); // out of a wall
        bad(Coord::new(2, 0), Coord::new(3, 0)); // off the grid
    }
}

// ── Index: areas ──────────────────────────────────────────────────────────────

#[cfg(test)]
mod areas {
    use tw_core::Coord;

    use crate::{bresenham, line_of_sight};

    #[test]
    fn region_radius_one_is_a_plus() {
        let (grid, index) = super::helpers::open(5, 5);
        let r = index.region(&grid, Coord::new(2, 2), 1);
        assert_eq!(
            r,
            vec![Coord::new(2, 1), Coord::new(1, 2), Coord::new(2, 2), Coord::new(3, 2), Coord::new(2, 3)]
        );
    }

    #[test]
    fn region_clipped_to_bounds() {
        let (grid, index) = super::helpers::open(5, 5);
        let r = index.region(&grid, Coord::new(0, 0), 2);
        // Quarter disc of radius 2: (0,0) (1,0) (2,0) (0,1) (1,1) (0,2).
        assert_eq!(r.len(), 6);
        assert!(r.iter().all(|&c| grid.contains(c)));
        assert_eq!(index.region(&grid, Coord::new(2, 2), 0), vec![Coord::new(2, 2)]);
    }

    #[test]
    fn walls_block_sight_but_are_seen() {
        let (grid, index) = super::helpers::map("
.....
..#..
.....
");
        let seen = index.visible(&grid, Coord::new(2, 0), 2);
        assert!(seen.contains(&Coord::new(2, 1)), "the wall itself is visible");
        assert!(!seen.contains(&Coord::new(2, 2)), "tile behind the wall is hidden");
        assert!(seen.contains(&Coord::new(0, 0)));
        assert!(seen.contains(&Coord::new(4, 0)));
    }

    #[test]
    fn bresenham_endpoints_and_length() {
        let line = bresenham(Coord::new(0, 0), Coord::new(4, 2));
        assert_eq!(line.first(), Some(&Coord::new(0, 0)));
        assert_eq!(line.last(), Some(&Coord::new(4, 2)));
        assert_eq!(line.len(), 5);
        for w in line.windows(2) {
            assert!(w[0].is_adjacent(w[1]));
        }
        assert_eq!(bresenham(Coord::new(3, 3), Coord::new(3, 3)), vec![Coord::new(3, 3)]);
    }

    #[test]
    fn adjacent_tiles_always_in_sight() {
        let (grid, _) = super::helpers::map("
###
#.#
###
");
        assert!(line_of_sight(&grid, Coord::new(1, 1), Coord::new(0, 0)));
        assert!(line_of_sight(&grid, Coord::new(0, 1), Coord::new(2, 1)));
        assert!(!line_of_sight(&grid, Coord::new(0, 0), Coord::new(2, 0)));
    }
}

// ── Index: rooms & freshness ──────────────────────────────────────────────────

#[cfg(test)]
mod rooms {
    use tw_core::Coord;
    use tw_grid::{Terrain, Tile};

    use crate::SpatialIndex;

    const SPLIT: &str = "
..#..
..#..
..#..
";

    #[test]
    fn wall_splits_into_two_rooms() {
        let (grid, index) = super::helpers::map(SPLIT);
        assert_eq!(index.room_count(), 2);
        let left = index.room_of(Coord::new(0, 0)).unwrap();
        let right = index.room_of(Coord::new(4, 2)).unwrap();
        assert_ne!(left, right);
        assert_eq!(index.room_size(left), 6);
        assert_eq!(index.room_size(right), 6);
        assert_eq!(index.room_of(Coord::new(2, 1)), None);
        assert!(!index.same_room(Coord::new(1, 1), Coord::new(3, 1)));
        assert!(index.is_current(&grid));
    }

    #[test]
    fn diagonal_gap_does_not_join_rooms() {
        let (_, index) = super::helpers::map("
.#
#.
");
        assert_eq!(index.room_count(), 2);
    }

    #[test]
    fn rough_and_water_are_part_of_rooms() {
        let (_, index) = super::helpers::map("
.,~.
");
        assert_eq!(index.room_count(), 1);
    }

    #[test]
    fn stale_index_is_conservative() {
        let (mut grid, mut index) = super::helpers::map(SPLIT);
        grid.set(Coord::new(2, 1), Tile::new(Terrain::Open)).unwrap();
        assert!(!index.is_current(&grid));
        // Labels still describe the last sync.
        assert!(!index.same_room(Coord::new(0, 0), Coord::new(4, 0)));
        assert_eq!(index.heuristic_scale(&grid), 0.0);

        assert!(index.sync(&grid));
        assert!(!index.sync(&grid), "second sync is a no-op");
        assert_eq!(index.room_count(), 1);
        assert!(index.same_room(Coord::new(0, 0), Coord::new(4, 0)));
    }

    #[test]
    fn unsynced_index_knows_nothing() {
        let (grid, _) = super::helpers::map(SPLIT);
        let index = SpatialIndex::new();
        assert_eq!(index.revision(), None);
        assert!(!index.is_current(&grid));
        assert!(index.same_room(Coord::new(0, 0), Coord::new(4, 0)));
    }

    #[test]
    fn heuristic_scale_is_min_cost() {
        let (grid, index) = super::helpers::map("
,,~
,#~
");
        assert_eq!(index.heuristic_scale(&grid), 2.0);
    }

    #[test]
    fn sparse_grid_rooms() {
        let mut grid = tw_grid::TileGrid::unbounded();
        for x in -3..=3 {
            grid.set(Coord::new(x, 10), Tile::open()).unwrap();
        }
        grid.set(Coord::new(100, 100), Tile::open()).unwrap();
        let index = SpatialIndex::build(&grid);
        assert_eq!(index.room_count(), 2);
        assert!(index.same_room(Coord::new(-3, 10), Coord::new(3, 10)));
    }
}

// ── Edge of the plane ─────────────────────────────────────────────────────────

#[cfg(test)]
mod plane_edge {
    use tw_core::Coord;
    use tw_grid::{Tile, TileGrid};

    use crate::{AgentConstraints, SpatialIndex, bresenham, line_of_sight};

    fn far_corner() -> TileGrid {
        let mut grid = TileGrid::unbounded();
        for x in [i32::MAX - 1, i32::MAX] {
            for y in [i32::MAX - 1, i32::MAX] {
                grid.set(Coord::new(x, y), Tile::open()).unwrap();
            }
        }
        grid.set(Coord::new(i32::MIN, 0), Tile::open()).unwrap();
        grid
    }

    #[test]
    fn index_builds_with_tiles_at_i32_max() {
        let grid = far_corner();
        let index = SpatialIndex::build(&grid);
        assert_eq!(index.room_count(), 2);
        let corner = Coord::new(i32::MAX, i32::MAX);
        assert!(index.same_room(corner, Coord::new(i32::MAX - 1, i32::MAX - 1)));
        assert!(!index.same_room(corner, Coord::new(i32::MIN, 0)));
    }

    #[test]
    fn neighbors_stop_at_the_edge() {
        let grid = far_corner();
        let index = SpatialIndex::build(&grid);
        let corner = Coord::new(i32::MAX, i32::MAX);
        assert_eq!(
            index.neighbors(&grid, corner, &AgentConstraints::eight()),
            [
                Coord::new(i32::MAX, i32::MAX - 1),
                Coord::new(i32::MAX - 1, i32::MAX),
                Coord::new(i32::MAX - 1, i32::MAX - 1),
            ]
        );
        assert!(index.neighbors(&grid, Coord::new(i32::MIN, 0), &AgentConstraints::four()).is_empty());
    }

    #[test]
    fn region_handles_any_radius() {
        let grid = far_corner();
        let index = SpatialIndex::build(&grid);
        let corner = Coord::new(i32::MAX, i32::MAX);
        assert_eq!(index.region(&grid, corner, 1).len(), 3);
        let everything = index.region(&grid, corner, u32::MAX);
        assert_eq!(everything.len(), 4, "the far-west tile is beyond u32::MAX");
        assert!(everything.contains(&corner));
    }

    #[test]
    fn lines_span_the_whole_axis() {
        let line = bresenham(Coord::new(i32::MIN, 0), Coord::new(i32::MIN + 3, 0));
        assert_eq!(line.len(), 4);
        let grid = far_corner();
        assert!(line_of_sight(&grid, Coord::new(i32::MAX - 1, i32::MAX), Coord::new(i32::MAX, i32::MAX)));
    }
}

// ── Path ──────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod path {
    use tw_core::Coord;
    use tw_grid::Tile;

    use crate::{AgentConstraints, Path, SpatialError};

    fn c(x: i32, y: i32) -> Coord {
        Coord::new(x, y)
    }

    #[test]
    fn from_steps_sums_costs() {
        let (grid, index) = super::helpers::map("
.,.
");
        let p = Path::from_steps(&grid, &index, c(0, 0), &[c(1, 0), c(2, 0)], &AgentConstraints::four())
            .unwrap();
        assert_eq!(p.cost(), 3.0);
        assert_eq!(p.step_count(), 3);
        assert_eq!(p.move_count(), 2);
        assert_eq!((p.start(), p.goal()), (c(0, 0), c(2, 0)));
    }

    #[test]
    fn from_steps_rejects_jumps() {
        let (grid, index) = super::helpers::open(4, 1);
        let err = Path::from_steps(&grid, &index, c(0, 0), &[c(2, 0)], &AgentConstraints::four());
        assert_eq!(err, Err(SpatialError::InvalidEdge { from: c(0, 0), to: c(2, 0) }));
    }

    #[test]
    fn waypoints_keep_corners_only() {
        let (grid, index) = super::helpers::open(4, 4);
        let moves = [c(1, 0), c(2, 0), c(3, 0), c(3, 1), c(3, 2), c(2, 2)];
        let p = Path::from_steps(&grid, &index, c(0, 0), &moves, &AgentConstraints::four()).unwrap();
        assert_eq!(p.waypoints(), vec![c(0, 0), c(3, 0), c(3, 2), c(2, 2)]);
        assert_eq!(Path::trivial(c(1, 1), 0).waypoints(), vec![c(1, 1)]);
    }

    #[test]
    fn staleness_and_blocked_steps() {
        let (mut grid, index) = super::helpers::open(4, 1);
        let moves = [c(1, 0), c(2, 0), c(3, 0)];
        let p = Path::from_steps(&grid, &index, c(0, 0), &moves, &AgentConstraints::four()).unwrap();
        assert!(!p.is_stale(&grid));
        assert_eq!(p.first_blocked(&grid, &AgentConstraints::four(), 1), None);

        grid.set(c(2, 0), Tile::wall()).unwrap();
        assert!(p.is_stale(&grid));
        assert_eq!(p.first_blocked(&grid, &AgentConstraints::four(), 1), Some(2));
        assert_eq!(p.first_blocked(&grid, &AgentConstraints::four(), 3), None);
    }
}

// ── A* ────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod astar {
    use tw_core::Coord;
    use tw_grid::{Tile, TileGrid};

    use crate::{AStar, AgentConstraints, EndpointReason, Pathfinder, SpatialError, SpatialIndex};

    fn c(x: i32, y: i32) -> Coord {
        Coord::new(x, y)
    }

    fn assert_valid(grid: &TileGrid, index: &SpatialIndex, steps: &[Coord]) {
        for w in steps.windows(2) {
            assert!(index.cost(grid, w[0], w[1]).is_ok(), "invalid step {} -> {}", w[0], w[1]);
        }
    }

    #[test]
    fn open_field_corner_to_corner() {
        let (grid, index) = super::helpers::open(5, 5);
        let p = AStar::new()
            .find_path(&grid, &index, c(0, 0), c(4, 4), &AgentConstraints::four())
            .unwrap();
        assert_eq!(p.step_count(), 9);
        assert_eq!(p.cost(), 8.0);
        assert_eq!(p.start(), c(0, 0));
        assert_eq!(p.goal(), c(4, 4));
        assert_valid(&grid, &index, p.steps());
    }

    #[test]
    fn routes_around_a_wall() {
        let (mut grid, _) = super::helpers::open(5, 5);
        grid.set(c(2, 2), Tile::wall()).unwrap();
        let index = SpatialIndex::build(&grid);
        let p = AStar::new()
            .find_path(&grid, &index, c(0, 0), c(4, 4), &AgentConstraints::four())
            .unwrap();
        assert_eq!(p.cost(), 8.0);
        assert!(!p.contains(c(2, 2)));
        assert_valid(&grid, &index, p.steps());
    }

    #[test]
    fn start_equals_goal() {
        let (grid, index) = super::helpers::open(3, 3);
        let p = AStar::new()
            .find_path(&grid, &index, c(1, 1), c(1, 1), &AgentConstraints::four())
            .unwrap();
        assert!(p.is_trivial());
        assert_eq!(p.steps(), &[c(1, 1)]);
        assert_eq!(p.cost(), 0.0);
    }

    #[test]
    fn invalid_endpoints_fail_fast() {
        let (grid, index) = super::helpers::map("
..#
");
        let astar = AStar::new();
        let four = AgentConstraints::four();
        assert_eq!(
            astar.find_path(&grid, &index, c(0, 0), c(2, 0), &four),
            Err(SpatialError::InvalidEndpoint { coord: c(2, 0), reason: EndpointReason::Impassable })
        );
        assert_eq!(
            astar.find_path(&grid, &index, c(-1, 0), c(0, 0), &four),
            Err(SpatialError::InvalidEndpoint { coord: c(-1, 0), reason: EndpointReason::OutOfBounds })
        );
    }

    #[test]
    fn disconnected_rooms_rejected_by_index() {
        let (grid, index) = super::helpers::map("
..#..
..#..
");
        let err = AStar::new().find_path(&grid, &index, c(0, 0), c(4, 1), &AgentConstraints::eight());
        assert_eq!(err, Err(SpatialError::NoPathFound { start: c(0, 0), goal: c(4, 1) }));
    }

    #[test]
    fn disconnected_found_by_exhaustion_when_stale() {
        let (grid, _) = super::helpers::map("
..#..
..#..
");
        let stale = SpatialIndex::new();
        let err = AStar::new().find_path(&grid, &stale, c(0, 0), c(4, 1), &AgentConstraints::four());
        assert_eq!(err, Err(SpatialError::NoPathFound { start: c(0, 0), goal: c(4, 1) }));
    }

    #[test]
    fn cost_ceiling_can_disconnect() {
        let (grid, index) = super::helpers::map("
.~.
");
        let c1 = AgentConstraints::four().with_max_tile_cost(1.0);
        let err = AStar::new().find_path(&grid, &index, c(0, 0), c(2, 0), &c1);
        assert_eq!(err, Err(SpatialError::NoPathFound { start: c(0, 0), goal: c(2, 0) }));
        let p = AStar::new()
            .find_path(&grid, &index, c(0, 0), c(2, 0), &AgentConstraints::four())
            .unwrap();
        assert_eq!(p.cost(), 6.0);
    }

    #[test]
    fn prefers_cheap_detour_over_water() {
        let (grid, index) = super::helpers::map("
.~.
...
");
        let p = AStar::new()
            .find_path(&grid, &index, c(0, 0), c(2, 0), &AgentConstraints::four())
            .unwrap();
        assert_eq!(p.cost(), 4.0);
        assert!(!p.contains(c(1, 0)));
    }

    #[test]
    fn eight_way_uses_diagonals() {
        let (grid, index) = super::helpers::open(5, 5);
        let p = AStar::new()
            .find_path(&grid, &index, c(0, 0), c(4, 4), &AgentConstraints::eight())
            .unwrap();
        assert_eq!(p.step_count(), 5);
        assert!((p.cost() - 4.0 * std::f32::consts::SQRT_2).abs() < 1e-4);
        assert_eq!(p.waypoints(), vec![c(0, 0), c(4, 4)]);
    }

    #[test]
    fn repeated_calls_are_identical() {
        let (grid, index) = super::helpers::map("
......
.##.#.
....#.
.#....
");
        let astar = AStar::new();
        let four = AgentConstraints::four();
        let a = astar.find_path(&grid, &index, c(0, 0), c(5, 3), &four).unwrap();
        let b = astar.find_path(&grid, &index, c(0, 0), c(5, 3), &four).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn informed_matches_uninformed_cost() {
        let (grid, index) = super::helpers::map("
..,,~...
.##,#~..
..~.#...
.#....,.
");
        for constraints in [AgentConstraints::four(), AgentConstraints::eight()] {
            let a = AStar::new().find_path(&grid, &index, c(0, 0), c(7, 3), &constraints).unwrap();
            let d = AStar::uninformed().find_path(&grid, &index, c(0, 0), c(7, 3), &constraints).unwrap();
            assert!((a.cost() - d.cost()).abs() < 1e-4, "{} vs {}", a.cost(), d.cost());
        }
    }

    #[test]
    fn avoided_tile_forces_a_detour() {
        let (grid, index) = super::helpers::open(3, 3);
        let straight = AStar::new()
            .find_path(&grid, &index, c(0, 1), c(2, 1), &AgentConstraints::four())
            .unwrap();
        assert_eq!(straight.steps(), [c(0, 1), c(1, 1), c(2, 1)]);

        let around = AgentConstraints::four().avoiding(c(1, 1));
        let detour = AStar::new().find_path(&grid, &index, c(0, 1), c(2, 1), &around).unwrap();
        assert_eq!(detour.steps().len(), 5);
        assert!(!detour.steps().contains(&c(1, 1)));
        assert_valid(&grid, &index, detour.steps());

        let (corridor, index) = super::helpers::open(3, 1);
        let err = AStar::new()
            .find_path(&corridor, &index, c(0, 0), c(2, 0), &AgentConstraints::four().avoiding(c(1, 0)))
            .unwrap_err();
        assert!(matches!(err, SpatialError::NoPathFound { .. }));
    }

    #[test]
    fn unbounded_grid_search() {
        let mut grid = TileGrid::unbounded();
        for x in -10..=10 {
            grid.set(c(x, -50), Tile::open()).unwrap();
        }
        let index = SpatialIndex::build(&grid);
        let p = AStar::new()
            .find_path(&grid, &index, c(-10, -50), c(10, -50), &AgentConstraints::eight())
            .unwrap();
        assert_eq!(p.step_count(), 21);
        assert_eq!(p.cost(), 20.0);
    }
}
