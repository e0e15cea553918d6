//! Spawning: flowers, finches, particle bursts and eaters
//!
//! Difficulty ramps with score: flowers spawn more often and rise faster.

use glam::Vec2;
use rand::Rng;

use super::state::{Eater, Flower, FlowerColor, FlowerKind, GameEvent, GameState, Particle};
use crate::consts::*;
use crate::tuning::Tuning;

/// Ticks between flower spawns at this score
pub fn spawn_interval(score: u64, tuning: &Tuning) -> f32 {
    let steps = (score / tuning.spawn_interval_score_step) as f32;
    (tuning.base_spawn_interval - steps * tuning.spawn_interval_step).max(tuning.min_spawn_interval)
}

/// Rise speed of newly spawned flowers at this score
pub fn rise_speed(score: u64, tuning: &Tuning) -> f32 {
    let steps = (score / tuning.rise_speed_score_step) as f32;
    (tuning.base_rise_speed + steps * tuning.rise_speed_step).min(tuning.max_rise_speed)
}

/// Random x with the spawn margin kept clear on both sides
fn spawn_x(state: &mut GameState) -> f32 {
    let span = (state.canvas_width - SPAWN_MARGIN * 2.0).max(0.0);
    state.rng.random::<f32>() * span + SPAWN_MARGIN
}

fn random_color(state: &mut GameState) -> FlowerColor {
    FlowerColor::from_index(state.rng.random_range(0..FlowerColor::ALL.len()))
}

/// Spawn a flower (or, rarely, a finch) at the bottom edge
pub fn spawn_flower(state: &mut GameState) {
    let is_finch = state.rng.random::<f32>() < state.tuning.finch_chance;
    let kind = if is_finch {
        FlowerKind::Finch
    } else {
        FlowerKind::Bloom(random_color(state))
    };
    let x = spawn_x(state);
    let speed = rise_speed(state.score, &state.tuning);
    let id = state.next_entity_id();
    state.flowers.push(Flower::new(
        id,
        Vec2::new(x, state.canvas_height),
        kind,
        speed,
    ));
}

/// Opening layout: one flower at the bottom, two already on their way up
pub fn seed_initial_flowers(state: &mut GameState) {
    spawn_flower(state);
    for height in [150.0, 300.0] {
        let x = spawn_x(state);
        let kind = FlowerKind::Bloom(random_color(state));
        let id = state.next_entity_id();
        state.flowers.push(Flower::new(
            id,
            Vec2::new(x, state.canvas_height - height),
            kind,
            state.tuning.base_rise_speed,
        ));
    }
}

/// Radial burst with a slight upward bias
pub fn spawn_particles(state: &mut GameState, pos: Vec2, color: u32) {
    let room = state
        .tuning
        .max_particles
        .saturating_sub(state.particles.len());
    for i in 0..BURST_PARTICLES.min(room) {
        let angle = std::f32::consts::TAU * i as f32 / BURST_PARTICLES as f32;
        let speed = 2.0 + state.rng.random::<f32>() * 2.0;
        let size = 3.0 + state.rng.random::<f32>() * 3.0;
        let decay = 0.015 + state.rng.random::<f32>() * 0.01;
        state.particles.push(Particle {
            pos,
            vel: Vec2::new(angle.cos() * speed, angle.sin() * speed - 2.0),
            size,
            color,
            life: 1.0,
            decay,
        });
    }
}

/// Send an eater down toward a missed flower at `x`
pub fn spawn_eater(state: &mut GameState, x: f32) {
    let id = state.next_entity_id();
    let speed = state.tuning.eater_descent_speed;
    state.eaters.push(Eater::descending(id, x, speed));
    state.events.push(GameEvent::EaterSpawned { x });
    log::debug!("Eater {} sent after missed flower at x={:.0}", id, x);
}
