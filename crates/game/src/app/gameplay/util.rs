/// Counts a positive timer down by one. True exactly on the tick it reaches zero.
pub(crate) fn decrement(counter: &mut i32) -> bool {
    if *counter > 0 {
        *counter -= 1;
        *counter == 0
    } else {
        false
    }
}

/// Moves `current` toward `target` by `1 - keep` of the gap.
pub(crate) fn blend(current: f32, target: f32, keep: f32) -> f32 {
    current * keep + target * (1.0 - keep)
}

/// Position in a looping animation of `period` ticks, in `[0, 1)`.
pub(crate) fn cycle(time: i32, period: i32) -> f32 {
    time.rem_euclid(period) as f32 / period as f32
}
