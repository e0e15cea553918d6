//! Per-frame simulation tick
//!
//! Advances the game by `dt` nominal 60 Hz frames (1.0 = one frame). Order
//! within an active tick is fixed: player physics, clouds, spawn timer,
//! flowers (rise, catch, miss), eaters, fall check, bonus text, particles.

use glam::Vec2;

use super::collision::is_catch;
use super::phase::{PhaseTrigger, RunPhase};
use super::scenery::update_clouds;
use super::spawn::{spawn_eater, spawn_flower, spawn_interval, spawn_particles};
use super::state::{BonusText, Eater, EaterPhase, Flower, FlowerKind, GameEvent, GameState};
use crate::consts::*;
use crate::highscores::MAX_NAME_LEN;

/// Name-entry keyboard event
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextEvent {
    Char(char),
    Backspace,
    Confirm,
}

/// Input sampled once per tick
#[derive(Debug, Clone, Default, PartialEq)]
pub struct InputSnapshot {
    /// Left held (keys or on-screen button)
    pub left: bool,
    /// Right held
    pub right: bool,
    /// Horizontal drag distance from the press point, while dragging
    pub drag_delta_x: Option<f32>,
    /// At most one name-entry event per tick
    pub text_event: Option<TextEvent>,
}

/// What the caller must act on after a tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    Continue,
    /// Player dropped off the bottom; the owner runs the game-over transition
    PlayerFell,
}

/// Advance the game state by one frame
pub fn tick(state: &mut GameState, input: &InputSnapshot, dt: f32) -> TickOutcome {
    if state.counting_down() {
        update_countdown(state, dt);
        return TickOutcome::Continue;
    }

    match state.phase {
        RunPhase::Eating => {
            update_eating(state, dt);
            return TickOutcome::Continue;
        }
        RunPhase::Scolding => {
            update_scolding(state, dt);
            return TickOutcome::Continue;
        }
        RunPhase::NameEntry => {
            if let Some(event) = input.text_event {
                handle_text_event(state, event);
            }
            return TickOutcome::Continue;
        }
        RunPhase::GameOver => return TickOutcome::Continue,
        RunPhase::Playing => {}
    }

    if !state.active {
        return TickOutcome::Continue;
    }

    update_player(state, input, dt);
    update_clouds(
        &mut state.clouds,
        &mut state.rng,
        state.canvas_width,
        state.canvas_height,
        dt,
    );

    state.flower_spawn_timer += dt;
    if state.flower_spawn_timer >= spawn_interval(state.score, &state.tuning) {
        spawn_flower(state);
        state.flower_spawn_timer = 0.0;
    }

    update_flowers(state, dt);
    update_eaters(state, dt);

    if state.player.pos.y > state.canvas_height + state.player.height {
        return TickOutcome::PlayerFell;
    }

    update_bonus_text(state, dt);
    update_particles(state, dt);

    TickOutcome::Continue
}

/// Apply a phase trigger; illegal triggers are ignored
pub fn transition(state: &mut GameState, trigger: PhaseTrigger) -> bool {
    let Some(next) = state.phase.next(trigger) else {
        return false;
    };
    log::info!("Run phase {} -> {}", state.phase.as_str(), next.as_str());
    state.phase = next;
    state.game_over_timer = 0.0;
    state.events.push(GameEvent::PhaseChanged(next));
    true
}

/// Enter the game-over sequence. Runs once per run; later calls are no-ops.
///
/// `qualifies` must already account for leaderboard availability.
pub fn trigger_game_over(state: &mut GameState, qualifies: bool) -> bool {
    if state.game_over_shown {
        return false;
    }
    state.active = false;
    state.player.vel = Vec2::ZERO;
    // Mid-game eaters vanish; the eating actor takes over
    state.eaters.clear();
    state.is_top_ten_score = qualifies;

    if !transition(state, PhaseTrigger::PlayerFell) {
        return false;
    }
    state.game_over_shown = true;
    log::info!(
        "Game over: score {} (top ten: {})",
        state.score,
        state.is_top_ten_score
    );
    true
}

/// Apply a finished score submission for run `run_id`.
///
/// Safe to call late or twice: a result for an older run is dropped, and
/// outside name entry it only clears the entry flags.
pub fn finish_submission(state: &mut GameState, run_id: u32) -> bool {
    if run_id != state.run_id {
        log::debug!(
            "Ignoring submission result for run {} (current run {})",
            run_id,
            state.run_id
        );
        return false;
    }
    close_name_entry(state);
    transition(state, PhaseTrigger::NameResolved)
}

fn close_name_entry(state: &mut GameState) {
    state.show_name_entry = false;
    state.player_name.clear();
    state.submitting = false;
}

fn update_countdown(state: &mut GameState, dt: f32) {
    state.countdown_timer += dt;
    if state.countdown_timer >= state.tuning.ticks_per_count {
        state.countdown -= 1;
        state.countdown_timer = 0.0;
        if state.countdown == 0 {
            state.active = true;
            state.events.push(GameEvent::RunActive);
            log::info!("Run {} is live", state.run_id);
        }
    }
}

fn update_eating(state: &mut GameState, dt: f32) {
    state.game_over_timer += dt;

    if state.eating_actor.is_none() {
        // Topmost flower goes first
        let topmost = state
            .flowers
            .iter()
            .min_by(|a, b| a.pos.y.total_cmp(&b.pos.y))
            .map(|f| (f.id, f.pos));
        if let Some((flower_id, pos)) = topmost {
            let id = state.next_entity_id();
            state.eating_actor = Some(Eater::game_over(id, pos));
            state.flowers.retain(|f| f.id != flower_id);
        }
    }

    let step = state.tuning.game_over_chomp_ticks;
    if let Some(actor) = state.eating_actor.as_mut() {
        actor.animation_frame += dt;
        if actor.advance_chomp(step) {
            state.eating_actor = None;
        }
    }

    if state.flowers.is_empty() && state.eating_actor.is_none() {
        transition(state, PhaseTrigger::FlowersConsumed);
    }
}

fn update_scolding(state: &mut GameState, dt: f32) {
    state.game_over_timer += dt;
    if state.game_over_timer < state.tuning.scolding_ticks {
        return;
    }
    let qualifies = state.is_top_ten_score;
    if transition(state, PhaseTrigger::ScoldingElapsed { qualifies }) && qualifies {
        state.show_name_entry = true;
    }
}

fn handle_text_event(state: &mut GameState, event: TextEvent) {
    if state.submitting {
        return;
    }
    match event {
        TextEvent::Char(c) => {
            let fits = state.player_name.chars().count() < MAX_NAME_LEN;
            if fits && (c.is_ascii_alphanumeric() || c == ' ') {
                state.player_name.push(c);
            }
        }
        TextEvent::Backspace => {
            state.player_name.pop();
        }
        TextEvent::Confirm => {
            if state.player_name.trim().is_empty() {
                // Blank name skips the leaderboard
                close_name_entry(state);
                transition(state, PhaseTrigger::NameResolved);
            } else {
                state.submitting = true;
                state.events.push(GameEvent::SubmitScore {
                    name: state.player_name.clone(),
                    score: state.score,
                });
            }
        }
    }
}

fn update_player(state: &mut GameState, input: &InputSnapshot, dt: f32) {
    let tuning = &state.tuning;
    let player = &mut state.player;

    // Horizontal
    if input.left {
        player.vel.x = -tuning.move_speed;
    } else if input.right {
        player.vel.x = tuning.move_speed;
    } else if let Some(delta) = input.drag_delta_x {
        player.vel.x = delta * tuning.drag_factor;
    } else {
        player.vel.x *= tuning.friction.powf(dt);
    }

    player.pos.x += player.vel.x * dt;

    let min_x = player.width / 2.0;
    let max_x = state.canvas_width - player.width / 2.0;
    if player.pos.x < min_x {
        player.pos.x = min_x;
        player.vel.x = 0.0;
    }
    if player.pos.x > max_x {
        player.pos.x = max_x;
        player.vel.x = 0.0;
    }

    // Vertical: lighter gravity in the floaty zone near the top
    let gravity = if player.pos.y < SOFT_CEILING_Y {
        tuning.gravity * tuning.floaty_gravity_scale
    } else {
        tuning.gravity
    };
    player.vel.y += gravity * dt;
    player.pos.y += player.vel.y * dt;

    // Soft ceiling absorbs leftover upward velocity
    if player.pos.y < SOFT_CEILING_Y {
        player.pos.y = SOFT_CEILING_Y;
        if player.vel.y < 0.0 {
            player.vel.y = 0.0;
        }
    }
}

fn update_flowers(state: &mut GameState, dt: f32) {
    let bounce = state.tuning.bounce_strength;
    let mut caught: Vec<Flower> = Vec::new();
    let mut missed_at: Vec<f32> = Vec::new();

    // Newest first
    for flower in state.flowers.iter_mut().rev() {
        if !flower.bounced {
            flower.pos.y -= flower.rise_speed * dt;
        }

        if !flower.bounced && is_catch(&state.player, flower) {
            state.player.vel.y = bounce;
            flower.bounced = true;
            caught.push(flower.clone());
        }

        if !flower.bounced && !flower.eater_spawned && flower.pos.y < EATER_TRIGGER_Y {
            flower.eater_spawned = true;
            missed_at.push(flower.pos.x);
        }
    }

    for flower in &caught {
        award_catch(state, flower);
    }
    for x in missed_at {
        spawn_eater(state, x);
    }

    state
        .flowers
        .retain(|f| !f.bounced && f.pos.y >= FLOWER_OFFSCREEN_Y);
}

/// Score a caught flower: combo, points, high score, burst, popup
fn award_catch(state: &mut GameState, flower: &Flower) {
    let points = match flower.kind {
        FlowerKind::Bloom(color) => {
            if state.last_flower_color == Some(color) {
                state.combo_streak += 1;
            } else {
                state.combo_streak = 1;
            }
            state.last_flower_color = Some(color);
            u64::from(state.combo_streak)
        }
        // Finches leave the combo alone
        FlowerKind::Finch => state.tuning.finch_points,
    };
    state.score += points;

    spawn_particles(state, flower.pos, flower.kind.rgb());

    let popup = match flower.kind {
        FlowerKind::Finch => Some(format!("Bird! +{}!", points)),
        FlowerKind::Bloom(_) if state.combo_streak > 1 => Some(format!("+{}!", points)),
        FlowerKind::Bloom(_) => None,
    };
    if let Some(text) = popup {
        state.bonus_text = Some(BonusText {
            text,
            pos: Vec2::new(flower.pos.x, flower.pos.y - BONUS_TEXT_OFFSET),
            timer: 0.0,
        });
    }

    state.events.push(GameEvent::FlowerCaught {
        kind: flower.kind,
        points,
        combo: state.combo_streak,
    });

    if state.score > state.high_score {
        state.high_score = state.score;
        state.events.push(GameEvent::NewHighScore(state.score));
    }
}

fn update_eaters(state: &mut GameState, dt: f32) {
    let step = state.tuning.eater_chomp_ticks;
    let leave_speed = state.tuning.eater_leave_speed;

    for eater in &mut state.eaters {
        eater.animation_frame += dt;
        match eater.phase {
            EaterPhase::Descending => {
                eater.pos.y += eater.speed * dt;
                if eater.pos.y >= eater.target_y {
                    eater.enter(EaterPhase::Chomp1Open);
                }
            }
            EaterPhase::Leaving => {
                eater.pos.y -= leave_speed * dt;
            }
            _ => {
                if eater.advance_chomp(step) {
                    eater.enter(EaterPhase::Leaving);
                }
            }
        }
    }

    state
        .eaters
        .retain(|e| !(e.phase == EaterPhase::Leaving && e.pos.y < -e.height - 20.0));
}

fn update_bonus_text(state: &mut GameState, dt: f32) {
    let duration = state.tuning.bonus_text_ticks;
    if let Some(bonus) = state.bonus_text.as_mut() {
        bonus.timer += dt;
        bonus.pos.y -= BONUS_TEXT_RISE * dt;
        if bonus.timer >= duration {
            state.bonus_text = None;
        }
    }
}

fn update_particles(state: &mut GameState, dt: f32) {
    for p in &mut state.particles {
        p.pos += p.vel * dt;
        p.vel.y += PARTICLE_GRAVITY * dt;
        p.life -= p.decay * dt;
    }
    state.particles.retain(|p| p.life > 0.0);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::state::FlowerColor;
    use crate::tuning::Tuning;
    use proptest::prelude::*;

    /// Live state with no flowers and the countdown done
    fn live_state(seed: u64) -> GameState {
        let mut state = GameState::new(seed, Tuning::default());
        state.reset_run();
        state.countdown = 0;
        state.active = true;
        state
    }

    fn idle() -> InputSnapshot {
        InputSnapshot::default()
    }

    /// Put a stationary flower right under a falling player so the next
    /// tick lands on it
    fn set_up_catch(state: &mut GameState, kind: FlowerKind) {
        state.player.pos = Vec2::new(200.0, 300.0);
        state.player.vel = Vec2::new(0.0, 5.0);
        state.flower_spawn_timer = 0.0;
        let id = state.next_entity_id();
        state
            .flowers
            .push(Flower::new(id, Vec2::new(200.0, 345.0), kind, 0.0));
    }

    const RED: FlowerKind = FlowerKind::Bloom(FlowerColor::Red);

    #[test]
    fn test_countdown_starts_run() {
        let mut state = GameState::new(1, Tuning::default());
        state.reset_run();
        assert_eq!(state.countdown, 3);

        for _ in 0..59 {
            tick(&mut state, &idle(), 1.0);
        }
        assert_eq!(state.countdown, 3);
        tick(&mut state, &idle(), 1.0);
        assert_eq!(state.countdown, 2);

        for _ in 0..120 {
            tick(&mut state, &idle(), 1.0);
        }
        assert_eq!(state.countdown, 0);
        assert!(state.active);
        assert!(state.events.contains(&GameEvent::RunActive));
    }

    #[test]
    fn test_no_physics_during_countdown() {
        let mut state = GameState::new(1, Tuning::default());
        state.reset_run();
        let before = state.player.pos;
        tick(&mut state, &idle(), 1.0);
        assert_eq!(state.player.pos, before);
        assert!(state.flowers.is_empty());
    }

    #[test]
    fn test_combo_scenario() {
        let mut state = live_state(1);

        set_up_catch(&mut state, RED);
        tick(&mut state, &idle(), 1.0);
        assert_eq!(state.score, 1);
        assert_eq!(state.combo_streak, 1);
        assert!(state.bonus_text.is_none());
        assert_eq!(state.player.vel.y, -8.0);

        set_up_catch(&mut state, RED);
        tick(&mut state, &idle(), 1.0);
        assert_eq!(state.score, 2 + 1);
        assert_eq!(state.bonus_text.as_ref().map(|b| b.text.as_str()), Some("+2!"));

        set_up_catch(&mut state, RED);
        tick(&mut state, &idle(), 1.0);
        assert_eq!(state.score, 3 + 2 + 1);
        assert_eq!(state.combo_streak, 3);
        assert_eq!(state.bonus_text.as_ref().map(|b| b.text.as_str()), Some("+3!"));

        // Finch: flat 10, combo untouched
        set_up_catch(&mut state, FlowerKind::Finch);
        tick(&mut state, &idle(), 1.0);
        assert_eq!(state.score, 16);
        assert_eq!(state.combo_streak, 3);
        assert_eq!(state.last_flower_color, Some(FlowerColor::Red));
        assert_eq!(
            state.bonus_text.as_ref().map(|b| b.text.as_str()),
            Some("Bird! +10!")
        );

        // Same colour after the finch keeps the streak going
        set_up_catch(&mut state, RED);
        tick(&mut state, &idle(), 1.0);
        assert_eq!(state.combo_streak, 4);
        assert_eq!(state.score, 20);
    }

    #[test]
    fn test_points_per_catch_follow_streak() {
        // Three same-colour catches award 1, 2, 3
        let mut state = live_state(2);
        let mut awards = Vec::new();
        for _ in 0..3 {
            set_up_catch(&mut state, RED);
            tick(&mut state, &idle(), 1.0);
            awards.extend(state.events.drain(..).filter_map(|e| match e {
                GameEvent::FlowerCaught { points, .. } => Some(points),
                _ => None,
            }));
        }
        assert_eq!(awards, vec![1, 2, 3]);
    }

    #[test]
    fn test_color_change_resets_streak() {
        let mut state = live_state(3);
        set_up_catch(&mut state, RED);
        tick(&mut state, &idle(), 1.0);
        set_up_catch(&mut state, RED);
        tick(&mut state, &idle(), 1.0);
        assert_eq!(state.combo_streak, 2);

        set_up_catch(&mut state, FlowerKind::Bloom(FlowerColor::Yellow));
        tick(&mut state, &idle(), 1.0);
        assert_eq!(state.combo_streak, 1);
        assert_eq!(state.last_flower_color, Some(FlowerColor::Yellow));
        assert_eq!(state.score, 1 + 2 + 1);
    }

    #[test]
    fn test_caught_flower_removed_same_tick() {
        let mut state = live_state(4);
        set_up_catch(&mut state, RED);
        tick(&mut state, &idle(), 1.0);
        assert!(state.flowers.iter().all(|f| !f.bounced));
        assert!(state.flowers.is_empty());
        assert_eq!(state.particles.len(), BURST_PARTICLES);
    }

    #[test]
    fn test_new_high_score_event() {
        let mut state = live_state(5);
        state.high_score = 1;
        set_up_catch(&mut state, RED);
        tick(&mut state, &idle(), 1.0);
        // Score 1 doesn't beat 1
        assert!(!state
            .events
            .iter()
            .any(|e| matches!(e, GameEvent::NewHighScore(_))));

        set_up_catch(&mut state, RED);
        tick(&mut state, &idle(), 1.0);
        assert!(state.events.contains(&GameEvent::NewHighScore(3)));
        assert_eq!(state.high_score, 3);
    }

    #[test]
    fn test_horizontal_clamp() {
        let mut state = live_state(6);
        let left = InputSnapshot {
            left: true,
            ..Default::default()
        };
        for _ in 0..100 {
            state.player.pos.y = 200.0;
            state.player.vel.y = 0.0;
            tick(&mut state, &left, 1.0);
        }
        assert_eq!(state.player.pos.x, state.player.width / 2.0);
        assert_eq!(state.player.vel.x, 0.0);

        let right = InputSnapshot {
            right: true,
            ..Default::default()
        };
        for _ in 0..100 {
            state.player.pos.y = 200.0;
            state.player.vel.y = 0.0;
            tick(&mut state, &right, 1.0);
        }
        assert_eq!(
            state.player.pos.x,
            state.canvas_width - state.player.width / 2.0
        );
    }

    #[test]
    fn test_drag_and_friction() {
        let mut state = live_state(7);
        let drag = InputSnapshot {
            drag_delta_x: Some(20.0),
            ..Default::default()
        };
        tick(&mut state, &drag, 1.0);
        assert!((state.player.vel.x - 4.0).abs() < 1e-5);

        tick(&mut state, &idle(), 2.0);
        let expected = 4.0 * 0.85f32.powf(2.0);
        assert!((state.player.vel.x - expected).abs() < 1e-4);
    }

    #[test]
    fn test_soft_ceiling_zeroes_upward_velocity() {
        let mut state = live_state(8);
        state.player.pos.y = 55.0;
        state.player.vel.y = -8.0;
        tick(&mut state, &idle(), 1.0);
        assert_eq!(state.player.pos.y, SOFT_CEILING_Y);
        assert_eq!(state.player.vel.y, 0.0);
    }

    #[test]
    fn test_floaty_zone_halves_gravity() {
        let mut state = live_state(9);
        state.player.pos.y = 49.0;
        state.player.vel.y = 0.5;
        tick(&mut state, &idle(), 1.0);
        assert!((state.player.vel.y - 0.6).abs() < 1e-5);
    }

    #[test]
    fn test_missed_flower_spawns_one_eater() {
        let mut state = live_state(10);
        let id = state.next_entity_id();
        state
            .flowers
            .push(Flower::new(id, Vec2::new(120.0, 51.0), RED, 2.0));

        // Flower passes the line on the first tick
        tick(&mut state, &idle(), 1.0);
        assert_eq!(state.eaters.len(), 1);
        assert!(state.flowers[0].eater_spawned);
        assert_eq!(state.eaters[0].pos.x, 120.0);
        assert!(!state.eaters[0].is_game_over_eater);

        for _ in 0..5 {
            state.player.pos.y = 200.0;
            tick(&mut state, &idle(), 1.0);
        }
        let count = state
            .events
            .iter()
            .filter(|e| matches!(e, GameEvent::EaterSpawned { .. }))
            .count();
        assert_eq!(count, 1);
    }

    #[test]
    fn test_flower_removed_offscreen() {
        let mut state = live_state(11);
        let id = state.next_entity_id();
        state
            .flowers
            .push(Flower::new(id, Vec2::new(120.0, -99.0), RED, 2.0));
        state.player.pos.y = 200.0;
        tick(&mut state, &idle(), 1.0);
        assert!(state.flowers.iter().all(|f| f.id != id));
    }

    #[test]
    fn test_eater_lifecycle() {
        let mut state = live_state(12);
        let id = state.next_entity_id();
        state.eaters.push(Eater::descending(id, 100.0, 3.0));

        let mut phases = vec![EaterPhase::Descending];
        for _ in 0..200 {
            state.player.pos.y = 200.0;
            state.player.vel.y = 0.0;
            state.flower_spawn_timer = 0.0;
            tick(&mut state, &idle(), 1.0);
            match state.eaters.first() {
                Some(e) if phases.last() != Some(&e.phase) => phases.push(e.phase),
                Some(_) => {}
                None => break,
            }
        }
        assert!(state.eaters.is_empty());
        assert_eq!(
            phases,
            vec![
                EaterPhase::Descending,
                EaterPhase::Chomp1Open,
                EaterPhase::Chomp1Close,
                EaterPhase::Chomp2Open,
                EaterPhase::Chomp2Close,
                EaterPhase::Leaving,
            ]
        );
    }

    #[test]
    fn test_bonus_text_expires() {
        let mut state = live_state(13);
        state.bonus_text = Some(BonusText {
            text: "+2!".into(),
            pos: Vec2::new(100.0, 300.0),
            timer: 0.0,
        });
        for _ in 0..59 {
            state.player.pos.y = 200.0;
            tick(&mut state, &idle(), 1.0);
        }
        let bonus = state.bonus_text.as_ref().unwrap();
        assert!((bonus.pos.y - 241.0).abs() < 1e-3);
        state.player.pos.y = 200.0;
        tick(&mut state, &idle(), 1.0);
        assert!(state.bonus_text.is_none());
    }

    #[test]
    fn test_particles_fade_out() {
        let mut state = live_state(14);
        spawn_particles(&mut state, Vec2::new(100.0, 100.0), 0xff0000);
        for _ in 0..70 {
            state.player.pos.y = 200.0;
            state.player.vel.y = 0.0;
            tick(&mut state, &idle(), 1.0);
        }
        // Slowest decay is 0.015, so everything is gone by tick 67
        assert!(state.particles.is_empty());
    }

    #[test]
    fn test_fall_reported_without_phase_change() {
        let mut state = live_state(15);
        state.player.pos.y = state.canvas_height + 100.0;
        let outcome = tick(&mut state, &idle(), 1.0);
        assert_eq!(outcome, TickOutcome::PlayerFell);
        assert_eq!(state.phase, RunPhase::Playing);
        assert!(state.active);
    }

    #[test]
    fn test_game_over_runs_once() {
        let mut state = live_state(16);
        let id = state.next_entity_id();
        state.eaters.push(Eater::descending(id, 100.0, 3.0));
        assert!(trigger_game_over(&mut state, false));
        assert_eq!(state.phase, RunPhase::Eating);
        assert!(state.eaters.is_empty());
        assert!(!state.active);
        assert_eq!(state.player.vel, Vec2::ZERO);
        assert!(!trigger_game_over(&mut state, true));
        assert!(!state.is_top_ten_score);
    }

    fn run_until_phase_changes(state: &mut GameState, limit: usize) -> RunPhase {
        let start = state.phase;
        for _ in 0..limit {
            tick(state, &idle(), 1.0);
            if state.phase != start {
                break;
            }
        }
        state.phase
    }

    #[test]
    fn test_eating_consumes_topmost_first() {
        let mut state = live_state(17);
        let low = state.next_entity_id();
        state
            .flowers
            .push(Flower::new(low, Vec2::new(100.0, 400.0), RED, 2.0));
        let high = state.next_entity_id();
        state
            .flowers
            .push(Flower::new(high, Vec2::new(300.0, 120.0), RED, 2.0));
        trigger_game_over(&mut state, false);

        tick(&mut state, &idle(), 1.0);
        let actor = state.eating_actor.as_ref().unwrap();
        assert_eq!(actor.pos, Vec2::new(300.0, 120.0));
        assert!(actor.is_game_over_eater);
        assert_eq!(state.flowers.len(), 1);
        assert_eq!(state.flowers[0].id, low);

        // 4 steps of 6 ticks per flower
        for _ in 0..23 {
            tick(&mut state, &idle(), 1.0);
        }
        assert!(state.eating_actor.is_none());
        assert_eq!(state.flowers.len(), 1);
        tick(&mut state, &idle(), 1.0);
        assert!(state.flowers.is_empty());
        assert!(state.eating_actor.is_some());

        assert_eq!(run_until_phase_changes(&mut state, 100), RunPhase::Scolding);
    }

    #[test]
    fn test_scolding_then_game_over_when_not_qualifying() {
        let mut state = live_state(18);
        trigger_game_over(&mut state, false);
        assert_eq!(run_until_phase_changes(&mut state, 10), RunPhase::Scolding);

        for _ in 0..89 {
            tick(&mut state, &idle(), 1.0);
        }
        assert_eq!(state.phase, RunPhase::Scolding);
        tick(&mut state, &idle(), 1.0);
        assert_eq!(state.phase, RunPhase::GameOver);
        assert!(!state.show_name_entry);
    }

    #[test]
    fn test_qualifying_run_reaches_name_entry() {
        let mut state = live_state(19);
        trigger_game_over(&mut state, true);
        run_until_phase_changes(&mut state, 10);
        assert_eq!(run_until_phase_changes(&mut state, 200), RunPhase::NameEntry);
        assert!(state.show_name_entry);
    }

    fn name_entry_state() -> GameState {
        let mut state = live_state(20);
        state.score = 42;
        state.phase = RunPhase::NameEntry;
        state.show_name_entry = true;
        state
    }

    fn type_event(state: &mut GameState, event: TextEvent) {
        let input = InputSnapshot {
            text_event: Some(event),
            ..Default::default()
        };
        tick(state, &input, 1.0);
    }

    #[test]
    fn test_name_entry_editing() {
        let mut state = name_entry_state();
        for c in "Jo!e".chars() {
            type_event(&mut state, TextEvent::Char(c));
        }
        assert_eq!(state.player_name, "Joe");
        type_event(&mut state, TextEvent::Backspace);
        assert_eq!(state.player_name, "Jo");

        for _ in 0..30 {
            type_event(&mut state, TextEvent::Char('x'));
        }
        assert_eq!(state.player_name.len(), MAX_NAME_LEN);
    }

    #[test]
    fn test_blank_confirm_skips_leaderboard() {
        let mut state = name_entry_state();
        type_event(&mut state, TextEvent::Char(' '));
        type_event(&mut state, TextEvent::Confirm);
        assert_eq!(state.phase, RunPhase::GameOver);
        assert!(!state.show_name_entry);
        assert!(state.player_name.is_empty());
        assert!(!state
            .events
            .iter()
            .any(|e| matches!(e, GameEvent::SubmitScore { .. })));
    }

    #[test]
    fn test_confirm_requests_submission_and_waits() {
        let mut state = name_entry_state();
        for c in "Ann".chars() {
            type_event(&mut state, TextEvent::Char(c));
        }
        type_event(&mut state, TextEvent::Confirm);
        assert!(state.submitting);
        assert_eq!(state.phase, RunPhase::NameEntry);
        assert!(state.events.contains(&GameEvent::SubmitScore {
            name: "Ann".into(),
            score: 42,
        }));

        // Typing is ignored while the submission is in flight
        type_event(&mut state, TextEvent::Char('z'));
        type_event(&mut state, TextEvent::Confirm);
        assert_eq!(state.player_name, "Ann");

        let run = state.run_id;
        assert!(finish_submission(&mut state, run));
        assert_eq!(state.phase, RunPhase::GameOver);
        assert!(!state.show_name_entry);
        assert!(!state.submitting);

        // Late duplicate is harmless
        assert!(!finish_submission(&mut state, run));
        assert_eq!(state.phase, RunPhase::GameOver);
    }

    #[test]
    fn test_stale_submission_ignored() {
        let mut state = name_entry_state();
        state.submitting = true;
        let stale = state.run_id.wrapping_sub(1);
        assert!(!finish_submission(&mut state, stale));
        assert_eq!(state.phase, RunPhase::NameEntry);
        assert!(state.submitting);
    }

    proptest! {
        #[test]
        fn prop_score_and_bounds_hold(
            seed in any::<u64>(),
            moves in proptest::collection::vec((0u8..4, -60.0f32..60.0, 0.2f32..3.0), 1..400),
        ) {
            let mut state = live_state(seed);
            let mut last_score = 0;
            for (kind, drag, dt) in moves {
                let input = match kind {
                    0 => InputSnapshot { left: true, ..Default::default() },
                    1 => InputSnapshot { right: true, ..Default::default() },
                    2 => InputSnapshot { drag_delta_x: Some(drag), ..Default::default() },
                    _ => InputSnapshot::default(),
                };
                if tick(&mut state, &input, dt) == TickOutcome::PlayerFell {
                    trigger_game_over(&mut state, false);
                }
                prop_assert!(state.score >= last_score);
                last_score = state.score;

                let half = state.player.width / 2.0;
                prop_assert!(state.player.pos.x >= half);
                prop_assert!(state.player.pos.x <= state.canvas_width - half);
                prop_assert!(state.player.pos.y >= SOFT_CEILING_Y);
                if state.player.pos.y == SOFT_CEILING_Y {
                    prop_assert!(state.player.vel.y >= 0.0);
                }
                prop_assert!(state.flowers.iter().all(|f| !f.bounced));
                prop_assert!(state.eating_actor.is_none() || state.phase == RunPhase::Eating);
            }
        }
    }
}
