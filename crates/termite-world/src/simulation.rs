//! Evolution engine for the termite colony.

use crate::grid::Grid;
use crate::snapshot::WorldSnapshot;
use crate::termite::Termite;
use rand::Rng;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};
use termite_core::{
    ColonyStats, Direction, DropJump, Error, EvolutionRule, Result, SimulationConfig,
};
use tracing::{debug, info, instrument, trace};

/// Outcome of one termite's turn
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Action {
    /// Walked into an empty neighbour cell.
    Moved,
    /// Walked onto a chip and picked it up.
    PickedUp,
    /// Released its chip on the cell it stood on.
    Dropped,
    /// Wanted to drop but already stood on a chip; kept carrying.
    DropBlocked,
}

pub struct Simulation {
    grid: Grid,
    termites: Vec<Termite>,
    rule: EvolutionRule,
    drop_jump: DropJump,
    rng: ChaCha8Rng,
    generation: u64,
    pickups: u64,
    drops: u64,
    blocked_drops: u64,
}

impl Simulation {
    pub fn new(config: SimulationConfig) -> Result<Self> {
        config.validate()?;

        let mut rng = ChaCha8Rng::seed_from_u64(config.seed);
        let grid = Grid::from_config(&config.world, &mut rng);

        let termites = (0..config.world.termites)
            .map(|_| {
                let x = rng.gen_range(0..config.world.width);
                let y = rng.gen_range(0..config.world.height);
                Termite::new(
                    termite_core::Position::new(x, y),
                    Direction::random(&mut rng),
                )
            })
            .collect();

        let sim = Self {
            grid,
            termites,
            rule: config.rule,
            drop_jump: config.drop_jump,
            rng,
            generation: 0,
            pickups: 0,
            drops: 0,
            blocked_drops: 0,
        };

        debug!(
            width = config.world.width,
            height = config.world.height,
            termites = sim.termites.len(),
            chips = sim.grid.chip_count(),
            rule = %sim.rule,
            seed = config.seed,
            "Simulation created"
        );

        Ok(sim)
    }

    /// Assemble a simulation from a prepared grid and colony.
    ///
    /// The grid must hold one cell per coordinate, the colony must not be
    /// empty, and every termite must stand inside the grid.
    pub fn from_parts(
        grid: Grid,
        termites: Vec<Termite>,
        rule: EvolutionRule,
        seed: u64,
    ) -> Result<Self> {
        if !grid.is_well_formed() {
            return Err(Error::InvalidConfig(format!(
                "grid {}x{} is malformed",
                grid.width, grid.height
            )));
        }
        if termites.is_empty() {
            return Err(Error::InvalidConfig(
                "termite count must be positive".to_string(),
            ));
        }
        if let Some(stray) = termites.iter().find(|t| !grid.contains(t.position)) {
            return Err(Error::InvalidConfig(format!(
                "termite at {} lies outside the {}x{} grid",
                stray.position, grid.width, grid.height
            )));
        }

        Ok(Self {
            grid,
            termites,
            rule,
            drop_jump: DropJump::default(),
            rng: ChaCha8Rng::seed_from_u64(seed),
            generation: 0,
            pickups: 0,
            drops: 0,
            blocked_drops: 0,
        })
    }

    pub fn with_drop_jump(mut self, drop_jump: DropJump) -> Self {
        self.drop_jump = drop_jump;
        self
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    /// Mutable grid access for placing chips between generations
    pub fn grid_mut(&mut self) -> &mut Grid {
        &mut self.grid
    }

    pub fn termites(&self) -> &[Termite] {
        &self.termites
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn rule(&self) -> EvolutionRule {
        self.rule
    }

    /// Advance one generation under the active rule
    pub fn step(&mut self) {
        self.step_with(self.rule);
    }

    /// Advance one generation under `rule`
    pub fn step_with(&mut self, rule: EvolutionRule) {
        for index in 0..self.termites.len() {
            let facing = self.termites[index].direction;
            let dir = match rule {
                EvolutionRule::RandomWalk => Direction::random(&mut self.rng),
                EvolutionRule::ForwardReverse | EvolutionRule::ForwardJump => {
                    facing.forward_bias(&mut self.rng)
                }
            };
            self.act(index, dir, rule);
        }

        self.generation += 1;
    }

    /// Resolve one termite's turn toward an already chosen direction.
    ///
    /// Returns `None` if `index` is out of range. The generation counter is
    /// left untouched.
    pub fn apply_direction(&mut self, index: usize, dir: Direction) -> Option<Action> {
        if index >= self.termites.len() {
            return None;
        }
        Some(self.act(index, dir, self.rule))
    }

    fn act(&mut self, index: usize, dir: Direction, rule: EvolutionRule) -> Action {
        let termite = &mut self.termites[index];
        let target = self.grid.neighbor(termite.position, dir);

        if !self.grid.has_chip(target) {
            termite.position = target;
            termite.direction = dir;
            return Action::Moved;
        }

        if !termite.carrying {
            termite.position = target;
            termite.direction = dir;
            termite.carrying = true;
            self.grid.set_chip(target, false);
            self.pickups += 1;
            trace!(termite = index, x = target.x, y = target.y, "Picked up chip");
            return Action::PickedUp;
        }

        let here = termite.position;
        if self.grid.has_chip(here) {
            // Dropping onto a chip would destroy one.
            self.blocked_drops += 1;
            trace!(termite = index, x = here.x, y = here.y, "Drop blocked");
            return Action::DropBlocked;
        }

        self.grid.set_chip(here, true);
        termite.carrying = false;
        self.drops += 1;

        match rule {
            EvolutionRule::RandomWalk => {}
            EvolutionRule::ForwardReverse => {
                let back = dir.opposite();
                termite.position = self.grid.neighbor(here, back);
                termite.direction = back;
            }
            EvolutionRule::ForwardJump => match self.drop_jump {
                DropJump::RandomStep => {
                    let jump = Direction::random(&mut self.rng);
                    termite.position = self.grid.neighbor(here, jump);
                    termite.direction = jump;
                }
                DropJump::EmptyCell => {
                    if let Some(empty) = self.grid.random_empty_cell(&mut self.rng) {
                        termite.position = empty;
                    }
                }
            },
        }

        trace!(
            termite = index,
            x = here.x,
            y = here.y,
            to_x = termite.position.x,
            to_y = termite.position.y,
            "Dropped chip"
        );
        Action::Dropped
    }

    /// Run `ticks` generations and summarise
    #[instrument(skip(self), fields(rule = %self.rule))]
    pub fn run(&mut self, ticks: u64) -> SimulationResult {
        let initial = self.stats();
        info!(
            "Starting simulation for {} ticks: {} termites, {} chips",
            ticks,
            self.termites.len(),
            initial.total_chips()
        );

        for _ in 0..ticks {
            self.step();

            if self.generation % 1000 == 0 {
                let stats = self.stats();
                info!(
                    generation = self.generation,
                    chips_on_grid = stats.chips_on_grid,
                    chips_carried = stats.chips_carried,
                    carrying_ratio = format!("{:.2}", stats.carrying_ratio()),
                    clustering = format!("{:.3}", stats.clustering),
                    "Colony progress"
                );
            }
        }

        let result = self.collect_results(initial);
        info!(
            event = "run_summary",
            generations = result.generations,
            pickups = result.pickups,
            drops = result.drops,
            blocked_drops = result.blocked_drops,
            initial_clustering = format!("{:.3}", result.initial.clustering),
            final_clustering = format!("{:.3}", result.final_stats.clustering),
            clustered = result.final_stats.more_clustered_than(&result.initial),
            "Run complete"
        );
        result
    }

    pub fn stats(&self) -> ColonyStats {
        ColonyStats {
            generation: self.generation,
            chips_on_grid: self.grid.chip_count(),
            chips_carried: self.termites.iter().filter(|t| t.carrying).count(),
            termites: self.termites.len(),
            clustering: self.grid.clustering(),
        }
    }

    /// Point-in-time copy for renderers
    pub fn snapshot(&self) -> WorldSnapshot {
        WorldSnapshot::capture(&self.grid, &self.termites, self.generation)
    }

    fn collect_results(&self, initial: ColonyStats) -> SimulationResult {
        SimulationResult {
            generations: self.generation,
            pickups: self.pickups,
            drops: self.drops,
            blocked_drops: self.blocked_drops,
            initial,
            final_stats: self.stats(),
        }
    }
}

/// Summary of a [`Simulation::run`]
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimulationResult {
    pub generations: u64,
    pub pickups: u64,
    pub drops: u64,
    pub blocked_drops: u64,
    pub initial: ColonyStats,
    pub final_stats: ColonyStats,
}

#[cfg(test)]
mod tests {
    use super::*;
    use termite_core::{Position, WorldConfig};

    fn small_config(rule: EvolutionRule) -> SimulationConfig {
        SimulationConfig {
            ticks: 50,
            seed: 1234,
            rule,
            drop_jump: DropJump::RandomStep,
            world: WorldConfig {
                width: 30,
                height: 20,
                termites: 25,
                density: 0.2,
            },
        }
    }

    fn lone_termite(grid: Grid, termite: Termite, rule: EvolutionRule) -> Simulation {
        Simulation::from_parts(grid, vec![termite], rule, 0).unwrap()
    }

    #[test]
    fn test_simulation_creation() {
        let sim = Simulation::new(small_config(EvolutionRule::RandomWalk)).unwrap();
        assert_eq!(sim.termites().len(), 25);
        assert_eq!(sim.generation(), 0);
        assert!(sim.termites().iter().all(|t| !t.carrying));
        assert!(sim.termites().iter().all(|t| sim.grid().contains(t.position)));
    }

    #[test]
    fn test_invalid_config_fails_fast() {
        let mut config = small_config(EvolutionRule::RandomWalk);
        config.world.density = 1.5;
        assert!(matches!(
            Simulation::new(config),
            Err(Error::InvalidConfig(_))
        ));
    }

    #[test]
    fn test_from_parts_rejects_stray_termite() {
        let grid = Grid::new(4, 4);
        let stray = Termite::new(Position::new(4, 0), Direction::North);
        assert!(Simulation::from_parts(grid, vec![stray], EvolutionRule::RandomWalk, 0).is_err());
    }

    #[test]
    fn test_from_parts_rejects_empty_colony() {
        let result = Simulation::from_parts(Grid::new(4, 4), vec![], EvolutionRule::RandomWalk, 0);
        assert!(matches!(result, Err(Error::InvalidConfig(_))));
    }

    #[test]
    fn test_from_parts_rejects_malformed_grid() {
        let grid: Grid =
            serde_json::from_str(r#"{"width": 3, "height": 3, "cells": []}"#).unwrap();
        let termites = vec![Termite::new(Position::new(1, 1), Direction::North)];
        let result = Simulation::from_parts(grid, termites, EvolutionRule::RandomWalk, 0);
        assert!(matches!(result, Err(Error::InvalidConfig(_))));
    }

    #[test]
    fn test_generation_counter() {
        let mut sim = Simulation::new(small_config(EvolutionRule::ForwardJump)).unwrap();
        for expected in 1..=10 {
            sim.step();
            assert_eq!(sim.generation(), expected);
        }
    }

    #[test]
    fn test_pickup_scenario() {
        let mut sim = lone_termite(
            Grid::new(3, 3),
            Termite::new(Position::new(1, 1), Direction::North),
            EvolutionRule::RandomWalk,
        );
        sim.grid_mut().set_chip(Position::new(1, 0), true);

        let action = sim.apply_direction(0, Direction::North);

        assert_eq!(action, Some(Action::PickedUp));
        let termite = &sim.termites()[0];
        assert_eq!(termite.position, Position::new(1, 0));
        assert_eq!(termite.direction, Direction::North);
        assert!(termite.carrying);
        assert!(!sim.grid().has_chip(Position::new(1, 0)));
    }

    #[test]
    fn test_move_into_empty_cell() {
        let mut sim = lone_termite(
            Grid::new(4, 4),
            Termite::new(Position::new(0, 0), Direction::North),
            EvolutionRule::ForwardReverse,
        );

        assert_eq!(sim.apply_direction(0, Direction::NorthWest), Some(Action::Moved));
        let termite = &sim.termites()[0];
        assert_eq!(termite.position, Position::new(3, 3));
        assert_eq!(termite.direction, Direction::NorthWest);
    }

    #[test]
    fn test_single_cell_world() {
        let mut sim = lone_termite(
            Grid::new(1, 1),
            Termite::new(Position::new(0, 0), Direction::East),
            EvolutionRule::RandomWalk,
        );
        for dir in Direction::all() {
            sim.apply_direction(0, dir);
            assert_eq!(sim.termites()[0].position, Position::new(0, 0));
        }
    }

    #[test]
    fn test_random_walk_drop_keeps_position_and_facing() {
        let mut grid = Grid::new(5, 5);
        grid.set_chip(Position::new(3, 2), true);
        let mut sim = lone_termite(
            grid,
            Termite::carrying(Position::new(2, 2), Direction::South),
            EvolutionRule::RandomWalk,
        );

        assert_eq!(sim.apply_direction(0, Direction::East), Some(Action::Dropped));
        let termite = &sim.termites()[0];
        assert_eq!(termite.position, Position::new(2, 2));
        assert_eq!(termite.direction, Direction::South);
        assert!(!termite.carrying);
        assert!(sim.grid().has_chip(Position::new(2, 2)));
        assert!(sim.grid().has_chip(Position::new(3, 2)));
    }

    #[test]
    fn test_forward_reverse_drop_scenario() {
        let mut grid = Grid::new(5, 5);
        grid.set_chip(Position::new(3, 2), true);
        let mut sim = lone_termite(
            grid,
            Termite::carrying(Position::new(2, 2), Direction::East),
            EvolutionRule::ForwardReverse,
        );

        assert_eq!(sim.apply_direction(0, Direction::East), Some(Action::Dropped));
        let termite = &sim.termites()[0];
        assert!(sim.grid().has_chip(Position::new(2, 2)));
        assert!(!termite.carrying);
        assert_eq!(termite.position, Position::new(1, 2));
        assert_eq!(termite.direction, Direction::West);
    }

    #[test]
    fn test_forward_jump_drop_moves_one_step() {
        let mut grid = Grid::new(7, 7);
        grid.set_chip(Position::new(3, 2), true);
        let mut sim = lone_termite(
            grid,
            Termite::carrying(Position::new(3, 3), Direction::North),
            EvolutionRule::ForwardJump,
        );

        assert_eq!(sim.apply_direction(0, Direction::North), Some(Action::Dropped));
        let termite = &sim.termites()[0];
        let (dx, dy) = (termite.position.x - 3, termite.position.y - 3);
        assert!(dx.abs() <= 1 && dy.abs() <= 1 && (dx, dy) != (0, 0));
        assert!(sim.grid().has_chip(Position::new(3, 3)));
    }

    #[test]
    fn test_empty_cell_jump_lands_on_free_cell() {
        let mut grid = Grid::new(4, 4);
        for (pos, _) in Grid::new(4, 4).iter() {
            grid.set_chip(pos, true);
        }
        let here = Position::new(1, 1);
        let free = Position::new(3, 0);
        grid.set_chip(here, false);
        grid.set_chip(free, false);

        let mut sim = lone_termite(
            grid,
            Termite::carrying(here, Direction::North),
            EvolutionRule::ForwardJump,
        )
        .with_drop_jump(DropJump::EmptyCell);

        assert_eq!(sim.apply_direction(0, Direction::North), Some(Action::Dropped));
        assert_eq!(sim.termites()[0].position, free);
        assert!(!sim.grid().has_chip(free));
    }

    #[test]
    fn test_drop_onto_chip_is_blocked() {
        let mut grid = Grid::new(5, 5);
        grid.set_chip(Position::new(2, 2), true);
        grid.set_chip(Position::new(2, 1), true);
        let mut sim = lone_termite(
            grid,
            Termite::carrying(Position::new(2, 2), Direction::North),
            EvolutionRule::ForwardReverse,
        );

        assert_eq!(sim.apply_direction(0, Direction::North), Some(Action::DropBlocked));
        let termite = &sim.termites()[0];
        assert!(termite.carrying);
        assert_eq!(termite.position, Position::new(2, 2));
        assert_eq!(sim.grid().chip_count(), 2);
    }

    #[test]
    fn test_apply_direction_out_of_range() {
        let mut sim = lone_termite(
            Grid::new(2, 2),
            Termite::new(Position::new(0, 0), Direction::North),
            EvolutionRule::RandomWalk,
        );
        assert_eq!(sim.apply_direction(1, Direction::North), None);
    }

    #[test]
    fn test_run_summary() {
        let mut sim = Simulation::new(small_config(EvolutionRule::ForwardReverse)).unwrap();
        let result = sim.run(200);

        assert_eq!(result.generations, 200);
        assert_eq!(result.initial.generation, 0);
        assert_eq!(result.final_stats.generation, 200);
        assert_eq!(result.initial.total_chips(), result.final_stats.total_chips());
        assert!(result.pickups >= result.drops);
        assert_eq!(
            result.pickups - result.drops,
            result.final_stats.chips_carried as u64
        );
    }
}
