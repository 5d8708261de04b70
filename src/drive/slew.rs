// Slew-rate limiting: bound how far a commanded value may move in one tick

/// Step `current` toward `target` by at most `max_delta`.
///
/// Lands on `target` exactly once it is within reach, so ramps never overshoot.
/// `max_delta` is rate × tick period, already multiplied by the caller.
/// A `max_delta <= 0` freezes the value at `current`.
pub fn apply(current: f32, target: f32, max_delta: f32) -> f32 {
    let error = target - current;
    if error.abs() <= max_delta {
        target
    } else if max_delta <= 0.0 {
        current
    } else {
        current + max_delta.copysign(error)
    }
}
