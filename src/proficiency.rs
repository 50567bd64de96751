//! Exponentially weighted update rules shared by the skill graph and the
//! learner profile. Pure functions, no state.

/// Default weight given to a new performance sample.
pub const PROFICIENCY_WEIGHT: f64 = 0.3;
/// Default weight given to a new completion-time sample.
pub const TIME_WEIGHT: f64 = 0.2;

pub const MIN_PROFICIENCY: f64 = 0.0;
pub const MAX_PROFICIENCY: f64 = 100.0;

/// Blend a performance score into the current proficiency.
///
/// The caller is expected to clamp `performance` to [0, 100]; the result is
/// clamped regardless so the stored value never leaves that range.
pub fn update_proficiency(current: f64, performance: f64, weight: f64) -> f64 {
    let blended = current * (1.0 - weight) + performance * weight;
    clamp_proficiency(blended)
}

/// EMA over a running average. A zero average means no prior data, so the
/// first sample is taken as-is.
pub fn update_running_average(current: f64, sample: f64, weight: f64) -> f64 {
    if current == 0.0 {
        return sample;
    }
    current * (1.0 - weight) + sample * weight
}

pub fn clamp_proficiency(value: f64) -> f64 {
    if value.is_nan() {
        return MIN_PROFICIENCY;
    }
    value.clamp(MIN_PROFICIENCY, MAX_PROFICIENCY)
}
