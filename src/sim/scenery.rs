//! Decorative background: drifting clouds and a pine tree skyline

use rand::Rng;
use serde::Serialize;

use crate::consts::{CLOUD_COUNT, PINE_TREE_SPACING};

/// Band of the canvas (from the top) clouds live in
const CLOUD_BAND: f32 = 0.4;

#[derive(Debug, Clone, Serialize)]
pub struct Cloud {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
    pub speed: f32,
}

#[derive(Debug, Clone, Serialize)]
pub struct PineTree {
    pub x: f32,
    pub width: f32,
    pub height: f32,
}

pub fn init_clouds(rng: &mut impl Rng, canvas_width: f32, canvas_height: f32) -> Vec<Cloud> {
    (0..CLOUD_COUNT)
        .map(|_| Cloud {
            x: rng.random::<f32>() * canvas_width,
            y: rng.random::<f32>() * canvas_height * CLOUD_BAND,
            width: 60.0 + rng.random::<f32>() * 40.0,
            height: 20.0 + rng.random::<f32>() * 15.0,
            speed: 0.3 + rng.random::<f32>() * 0.5,
        })
        .collect()
}

/// One tree every 60px, starting half a slot left of the canvas
pub fn init_pine_trees(rng: &mut impl Rng, canvas_width: f32) -> Vec<PineTree> {
    let count = (canvas_width / PINE_TREE_SPACING).ceil() as usize + 1;
    (0..count)
        .map(|i| PineTree {
            x: i as f32 * PINE_TREE_SPACING - PINE_TREE_SPACING / 2.0,
            height: 40.0 + rng.random::<f32>() * 30.0,
            width: 25.0 + rng.random::<f32>() * 15.0,
        })
        .collect()
}

/// Drift clouds right, wrapping to the left edge at a new height
pub fn update_clouds(
    clouds: &mut [Cloud],
    rng: &mut impl Rng,
    canvas_width: f32,
    canvas_height: f32,
    dt: f32,
) {
    for cloud in clouds {
        cloud.x += cloud.speed * dt;
        if cloud.x - cloud.width / 2.0 > canvas_width {
            cloud.x = -cloud.width / 2.0;
            cloud.y = rng.random::<f32>() * canvas_height * CLOUD_BAND;
        }
    }
}
