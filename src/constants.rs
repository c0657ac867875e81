/// Banked count the team must strictly exceed to hold the majority.
pub const MAJORITY_THRESHOLD: u32 = 4;

/// Balls the agent should carry before heading home.
pub const CARRY_CAP: u32 = 2;

/// Heading error (degrees) inside which seek behaviors drive instead of turn.
pub const HEADING_DEAD_BAND_DEG: f32 = 5.0;

/// Balls at or beyond this distance are never picked as the nearest target.
pub const NEAREST_SEARCH_RADIUS: f32 = 200.0;

/// Number of discrete slots in an action vector.
pub const ACTION_SLOTS: usize = 5;

pub const DEFAULT_MAX_TICKS: u32 = 1_500;

#[inline]
pub fn has_majority(banked: u32) -> bool {
    banked > MAJORITY_THRESHOLD
}
