//! Game state and core simulation types
//!
//! Everything the renderer reads lives here. The whole state serializes to
//! JSON for the page-side renderer; the RNG and tuning stay behind.

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::Serialize;

use super::phase::RunPhase;
use super::scenery::{Cloud, PineTree, init_clouds, init_pine_trees};
use crate::consts::*;
use crate::highscores::LeaderboardEntry;
use crate::tuning::Tuning;

/// The four flower colours
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum FlowerColor {
    Red,
    Pink,
    Yellow,
    Orange,
}

impl FlowerColor {
    pub const ALL: [FlowerColor; 4] = [
        FlowerColor::Red,
        FlowerColor::Pink,
        FlowerColor::Yellow,
        FlowerColor::Orange,
    ];

    pub fn from_index(index: usize) -> Self {
        Self::ALL[index % Self::ALL.len()]
    }

    /// Packed 0xRRGGBB colour for particles
    pub fn rgb(self) -> u32 {
        match self {
            FlowerColor::Red => 0xd44e3a,
            FlowerColor::Pink => 0xf5a3b5,
            FlowerColor::Yellow => 0xe8b84d,
            FlowerColor::Orange => 0xff8c42,
        }
    }
}

/// What a rising object is
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum FlowerKind {
    /// Regular flower, counts toward combos
    Bloom(FlowerColor),
    /// Rare bonus bird, flat points, ignored by combos
    Finch,
}

impl FlowerKind {
    pub const FINCH_RGB: u32 = 0x4a9eff;

    pub fn is_finch(self) -> bool {
        matches!(self, FlowerKind::Finch)
    }

    pub fn rgb(self) -> u32 {
        match self {
            FlowerKind::Bloom(color) => color.rgb(),
            FlowerKind::Finch => Self::FINCH_RGB,
        }
    }
}

/// The player-controlled sprite
#[derive(Debug, Clone, Serialize)]
pub struct Player {
    pub pos: Vec2,
    pub vel: Vec2,
    pub width: f32,
    pub height: f32,
}

impl Player {
    pub fn new(canvas_width: f32) -> Self {
        Self {
            pos: Vec2::new(canvas_width / 2.0, PLAYER_START_Y),
            vel: Vec2::ZERO,
            width: PLAYER_SIZE,
            height: PLAYER_SIZE,
        }
    }

    #[inline]
    pub fn bottom(&self) -> f32 {
        self.pos.y + self.height / 2.0
    }
}

/// A rising flower (or finch)
#[derive(Debug, Clone, Serialize)]
pub struct Flower {
    pub id: u32,
    pub pos: Vec2,
    pub width: f32,
    pub height: f32,
    pub rise_speed: f32,
    /// Set once when caught; the flower is removed the same tick
    pub bounced: bool,
    /// An eater has already been sent for this flower
    pub eater_spawned: bool,
    pub kind: FlowerKind,
}

impl Flower {
    pub fn new(id: u32, pos: Vec2, kind: FlowerKind, rise_speed: f32) -> Self {
        let width = if kind.is_finch() { FINCH_WIDTH } else { FLOWER_SIZE };
        Self {
            id,
            pos,
            width,
            height: FLOWER_SIZE,
            rise_speed,
            bounced: false,
            eater_spawned: false,
            kind,
        }
    }

    #[inline]
    pub fn top(&self) -> f32 {
        self.pos.y - self.height / 2.0
    }

    #[inline]
    pub fn is_finch(&self) -> bool {
        self.kind.is_finch()
    }
}

/// Eater animation phase
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum EaterPhase {
    Descending,
    Chomp1Open,
    Chomp1Close,
    Chomp2Open,
    Chomp2Close,
    Leaving,
}

impl EaterPhase {
    /// Next chomp step, `None` after the last one
    pub fn next_chomp(self) -> Option<EaterPhase> {
        match self {
            EaterPhase::Chomp1Open => Some(EaterPhase::Chomp1Close),
            EaterPhase::Chomp1Close => Some(EaterPhase::Chomp2Open),
            EaterPhase::Chomp2Open => Some(EaterPhase::Chomp2Close),
            EaterPhase::Chomp2Close | EaterPhase::Descending | EaterPhase::Leaving => None,
        }
    }

    pub fn is_chomping(self) -> bool {
        matches!(
            self,
            EaterPhase::Chomp1Open
                | EaterPhase::Chomp1Close
                | EaterPhase::Chomp2Open
                | EaterPhase::Chomp2Close
        )
    }
}

/// A creature that eats flowers
#[derive(Debug, Clone, Serialize)]
pub struct Eater {
    pub id: u32,
    pub pos: Vec2,
    pub target_y: f32,
    pub width: f32,
    pub height: f32,
    pub speed: f32,
    /// Ticks spent in the current phase
    pub animation_frame: f32,
    pub phase: EaterPhase,
    /// The game-over eating actor rather than a mid-game eater
    pub is_game_over_eater: bool,
}

impl Eater {
    /// Mid-game eater descending toward a missed flower
    pub fn descending(id: u32, x: f32, speed: f32) -> Self {
        Self {
            id,
            pos: Vec2::new(x, EATER_START_Y),
            target_y: EATER_TARGET_Y,
            width: EATER_SIZE,
            height: EATER_SIZE,
            speed,
            animation_frame: 0.0,
            phase: EaterPhase::Descending,
            is_game_over_eater: false,
        }
    }

    /// Game-over actor chomping a flower where it stands
    pub fn game_over(id: u32, pos: Vec2) -> Self {
        Self {
            id,
            pos,
            target_y: pos.y,
            width: EATER_SIZE,
            height: EATER_SIZE,
            speed: 0.0,
            animation_frame: 0.0,
            phase: EaterPhase::Chomp1Open,
            is_game_over_eater: true,
        }
    }

    /// Switch phase and restart the frame counter
    pub fn enter(&mut self, phase: EaterPhase) {
        self.phase = phase;
        self.animation_frame = 0.0;
    }

    /// Advance a chomp step once it has lasted `step_ticks`.
    /// Returns true when the final chomp step has completed.
    pub fn advance_chomp(&mut self, step_ticks: f32) -> bool {
        if !self.phase.is_chomping() || self.animation_frame < step_ticks {
            return false;
        }
        match self.phase.next_chomp() {
            Some(next) => {
                self.enter(next);
                false
            }
            None => true,
        }
    }
}

/// A particle for visual effects
#[derive(Debug, Clone, Serialize)]
pub struct Particle {
    pub pos: Vec2,
    pub vel: Vec2,
    pub size: f32,
    pub color: u32,
    pub life: f32, // 0-1, decreases over time
    pub decay: f32,
}

/// Floating score popup
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BonusText {
    pub text: String,
    pub pos: Vec2,
    pub timer: f32,
}

/// Outbound notifications, drained by the owner after each tick
#[derive(Debug, Clone, PartialEq)]
pub enum GameEvent {
    /// A flower or finch was caught
    FlowerCaught {
        kind: FlowerKind,
        points: u64,
        combo: u32,
    },
    /// Score beat the stored high score (persist it)
    NewHighScore(u64),
    /// An eater was sent after a missed flower
    EaterSpawned { x: f32 },
    /// The countdown finished and play began
    RunActive,
    /// Run phase changed
    PhaseChanged(RunPhase),
    /// The player confirmed a leaderboard name
    SubmitScore { name: String, score: u64 },
}

/// Complete game state
#[derive(Debug, Clone, Serialize)]
pub struct GameState {
    /// Run seed
    pub seed: u64,
    /// Incremented on every run start; tags async score submissions
    pub run_id: u32,
    /// Canvas size
    pub canvas_width: f32,
    pub canvas_height: f32,

    // Core game flow
    pub active: bool,
    pub started: bool,
    pub score: u64,
    pub high_score: u64,
    /// 3, 2, 1 while counting down, 0 otherwise
    pub countdown: u32,
    pub countdown_timer: f32,
    pub phase: RunPhase,
    pub game_over_timer: f32,
    /// The game-over transition already ran for this run
    pub game_over_shown: bool,
    pub bonus_text: Option<BonusText>,

    // Combo system
    pub last_flower_color: Option<FlowerColor>,
    pub combo_streak: u32,

    // Leaderboard state
    pub top_scores: Vec<LeaderboardEntry>,
    pub show_name_entry: bool,
    pub player_name: String,
    /// A confirmed name is being submitted
    pub submitting: bool,
    pub is_top_ten_score: bool,

    // Timing
    pub flower_spawn_timer: f32,
    /// Synthetic eater animating during the eating phase
    pub eating_actor: Option<Eater>,

    // Entities
    pub player: Player,
    pub flowers: Vec<Flower>,
    pub eaters: Vec<Eater>,
    pub particles: Vec<Particle>,
    pub clouds: Vec<Cloud>,
    pub pine_trees: Vec<PineTree>,

    #[serde(skip)]
    pub events: Vec<GameEvent>,
    #[serde(skip)]
    pub tuning: Tuning,
    #[serde(skip)]
    pub rng: Pcg32,
    /// Next entity ID
    next_id: u32,
}

impl GameState {
    /// Create an idle (not yet started) state on the default canvas
    pub fn new(seed: u64, tuning: Tuning) -> Self {
        Self::with_canvas(seed, tuning, CANVAS_WIDTH, CANVAS_HEIGHT)
    }

    pub fn with_canvas(seed: u64, tuning: Tuning, canvas_width: f32, canvas_height: f32) -> Self {
        let mut rng = Pcg32::seed_from_u64(seed);
        let clouds = init_clouds(&mut rng, canvas_width, canvas_height);
        let pine_trees = init_pine_trees(&mut rng, canvas_width);

        Self {
            seed,
            run_id: 0,
            canvas_width,
            canvas_height,
            active: false,
            started: false,
            score: 0,
            high_score: 0,
            countdown: 0,
            countdown_timer: 0.0,
            phase: RunPhase::Playing,
            game_over_timer: 0.0,
            game_over_shown: false,
            bonus_text: None,
            last_flower_color: None,
            combo_streak: 0,
            top_scores: Vec::new(),
            show_name_entry: false,
            player_name: String::new(),
            submitting: false,
            is_top_ten_score: false,
            flower_spawn_timer: 0.0,
            eating_actor: None,
            player: Player::new(canvas_width),
            flowers: Vec::new(),
            eaters: Vec::new(),
            particles: Vec::new(),
            clouds,
            pine_trees,
            events: Vec::new(),
            tuning,
            rng,
            next_id: 1,
        }
    }

    /// Allocate a new entity ID
    pub fn next_entity_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    /// Reset per-run fields and begin the countdown.
    /// High score, leaderboard cache and scenery carry over.
    pub fn reset_run(&mut self) {
        self.run_id = self.run_id.wrapping_add(1);
        self.active = false;
        self.started = true;
        self.score = 0;
        self.countdown = self.tuning.countdown_start;
        self.countdown_timer = 0.0;
        self.phase = RunPhase::Playing;
        self.game_over_timer = 0.0;
        self.game_over_shown = false;
        self.bonus_text = None;
        self.last_flower_color = None;
        self.combo_streak = 0;
        self.show_name_entry = false;
        self.player_name.clear();
        self.submitting = false;
        self.is_top_ten_score = false;
        self.flower_spawn_timer = 0.0;
        self.eating_actor = None;

        self.player = Player::new(self.canvas_width);
        self.flowers.clear();
        self.eaters.clear();
        self.particles.clear();
        self.events.clear();
    }

    /// Countdown still running
    pub fn counting_down(&self) -> bool {
        self.countdown > 0
    }
}
