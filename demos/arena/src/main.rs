//! arena — agents wandering a procedurally scattered map.
//!
//! Loads `arena.toml` (or the path given as the first argument), optionally
//! replaces its `[sim]` section with a bare `SimConfig` file given as the
//! second argument, scatters a map from `sim.seed`, drops agents on random free tiles, and keeps every
//! idle agent busy with a fresh random goal.  Events and periodic occupancy
//! go to CSV; logging follows `RUST_LOG` (default `info`).

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::time::Instant;

use anyhow::{Context, Result, bail};
use serde::Deserialize;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use tw_core::{ActionId, AgentId, Coord, SimConfig, SimRng};
use tw_grid::{ScatterConfig, TileGrid, scatter};
use tw_output::{CsvWriter, OutputWriter, SimOutputObserver};
use tw_sim::{SimEvent, SimObserver, TickReport, World, WorldBuilder, WorldSnapshot};
use tw_spatial::{AStar, AgentConstraints};

const DEFAULT_CONFIG: &str = include_str!("../arena.toml");

/// Distinct terminal actions handed out with goals.
const ACTION_KINDS: usize = 4;

// ── Configuration ─────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
#[serde(default)]
struct ArenaConfig {
    output_dir: PathBuf,
    sim:        SimConfig,
    map:        ScatterConfig,
    agents:     AgentsConfig,
}

impl Default for ArenaConfig {
    fn default() -> Self {
        Self {
            output_dir: PathBuf::from("output/arena"),
            sim:        SimConfig::default(),
            map:        ScatterConfig::default(),
            agents:     AgentsConfig::default(),
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(default)]
struct AgentsConfig {
    count:          usize,
    diagonal_share: f64,
    action_share:   f64,
}

impl Default for AgentsConfig {
    fn default() -> Self {
        Self { count: 16, diagonal_share: 0.5, action_share: 0.0 }
    }
}

fn read(path: &str) -> Result<String> {
    std::fs::read_to_string(path).with_context(|| format!("reading {path}"))
}

fn load_config() -> Result<ArenaConfig> {
    let mut args = std::env::args().skip(1);
    let text = match args.next() {
        Some(path) => read(&path)?,
        None       => DEFAULT_CONFIG.to_owned(),
    };
    let mut cfg: ArenaConfig = toml::from_str(&text).context("parsing arena config")?;
    if let Some(path) = args.next() {
        cfg.sim = SimConfig::from_toml_str(&read(&path)?)
            .with_context(|| format!("parsing sim config {path}"))?;
        info!(%path, "sim settings overridden");
    }
    Ok(cfg)
}

// ── Observer wrapper to tally events ──────────────────────────────────────────

struct TallyObserver<W: OutputWriter> {
    inner:     SimOutputObserver<W>,
    by_kind:   BTreeMap<&'static str, usize>,
    moves:     usize,
    snapshots: usize,
}

impl<W: OutputWriter> TallyObserver<W> {
    fn new(inner: SimOutputObserver<W>) -> Self {
        Self { inner, by_kind: BTreeMap::new(), moves: 0, snapshots: 0 }
    }
}

impl<W: OutputWriter> SimObserver for TallyObserver<W> {
    fn on_event(&mut self, tick: tw_core::Tick, event: &SimEvent) {
        *self.by_kind.entry(event.kind()).or_default() += 1;
        self.inner.on_event(tick, event);
    }

    fn on_tick_end(&mut self, report: &TickReport) {
        self.moves += report.moved.len();
        self.inner.on_tick_end(report);
    }

    fn on_snapshot(&mut self, snapshot: &WorldSnapshot) {
        self.snapshots += 1;
        self.inner.on_snapshot(snapshot);
    }

    fn on_sim_end(&mut self, final_tick: tw_core::Tick) {
        self.inner.on_sim_end(final_tick);
    }
}

// ── Setup ─────────────────────────────────────────────────────────────────────

fn free_tiles(grid: &TileGrid) -> Vec<Coord> {
    grid.iter().filter(|(_, t)| t.is_passable()).map(|(c, _)| c).collect()
}

fn build_world(cfg: &ArenaConfig, rng: &mut SimRng) -> Result<(World<AStar>, Vec<Coord>)> {
    let map = ScatterConfig { seed: cfg.sim.seed, ..cfg.map.clone() };
    let grid = scatter(&map);
    let free = free_tiles(&grid);
    if free.len() < cfg.agents.count {
        bail!("map has {} free tiles for {} agents", free.len(), cfg.agents.count);
    }
    info!(width = map.width, height = map.height, free = free.len(), "map scattered");

    let mut world = WorldBuilder::new(grid).config(cfg.sim.clone()).build()?;
    while world.agents().live_count() < cfg.agents.count {
        let Some(&at) = rng.pick(&free) else { break };
        if world.occupant(at).is_some() {
            continue;
        }
        let constraints = if rng.chance(cfg.agents.diagonal_share) {
            AgentConstraints::eight()
        } else {
            AgentConstraints::four()
        };
        world.spawn(at, constraints)?;
    }
    Ok((world, free))
}

/// Give every idle agent a new random goal.
fn retarget(world: &mut World<AStar>, free: &[Coord], cfg: &AgentsConfig, rng: &mut SimRng) -> Result<()> {
    let idle: Vec<AgentId> = world
        .agents()
        .agent_ids()
        .filter(|&a| world.agent_state(a).is_some_and(|s| !s.is_active()))
        .collect();
    for agent in idle {
        let Some(&goal) = rng.pick(free) else { break };
        let action = if rng.chance(cfg.action_share) {
            rng.index(ACTION_KINDS).map(|k| ActionId(k as u16))
        } else {
            None
        };
        world.assign_goal_with_action(agent, goal, action)?;
    }
    Ok(())
}

// ── main ──────────────────────────────────────────────────────────────────────

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let cfg = load_config()?;
    // Streams 0 and 1 of this seed scatter the map.
    let mut rng = SimRng::new(cfg.sim.seed).stream(2);
    let (mut world, free) = build_world(&cfg, &mut rng)?;
    info!(
        agents = world.agents().live_count(),
        ticks = cfg.sim.total_ticks,
        seed = cfg.sim.seed,
        "arena ready"
    );

    let writer = CsvWriter::new(Path::new(&cfg.output_dir))?;
    let mut obs = TallyObserver::new(SimOutputObserver::new(writer));

    let t0 = Instant::now();
    let end = world.config().end_tick();
    while world.tick() < end {
        retarget(&mut world, &free, &cfg.agents, &mut rng)?;
        world.step_with(&mut obs);
    }
    obs.on_sim_end(world.tick());
    let elapsed = t0.elapsed();

    if let Some(e) = obs.inner.take_error() {
        warn!(error = %e, "output incomplete");
    }

    info!(
        ticks = world.tick().0,
        moves = obs.moves,
        snapshots = obs.snapshots,
        secs = elapsed.as_secs_f64(),
        "simulation complete"
    );
    for (kind, n) in &obs.by_kind {
        info!(kind, n, "events");
    }
    info!(dir = %cfg.output_dir.display(), "wrote events.csv and occupancy.csv");

    println!("{}", world.snapshot().to_ascii());
    Ok(())
}
