/// Add `delta` to `value`, staying within `min..=max`
pub fn step_clamped(value: i32, delta: i32, min: i32, max: i32) -> i32 {
    if max < min {
        return min;
    }

    value.saturating_add(delta).clamp(min, max)
}
