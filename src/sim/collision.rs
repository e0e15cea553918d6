//! Catch detection between the player and rising flowers
//!
//! Not a full AABB overlap: the player must be falling and its bottom edge
//! must sit in a thin band just below the flower's top edge. Fast falls
//! still land because the band is generous, and the player can never be
//! "caught" from underneath.

use super::state::{Flower, Player};
use crate::consts::{CATCH_BAND, CATCH_PADDING};

/// True when a falling player lands on the flower this tick
pub fn is_catch(player: &Player, flower: &Flower) -> bool {
    if player.vel.y <= 0.0 {
        return false;
    }

    let bottom = player.bottom();
    let flower_top = flower.top();
    if bottom < flower_top || bottom > flower_top + CATCH_BAND {
        return false;
    }

    let reach = flower.width / 2.0 + CATCH_PADDING;
    player.pos.x > flower.pos.x - reach && player.pos.x < flower.pos.x + reach
}
