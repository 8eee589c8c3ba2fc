//! Heating setpoint bounds.

/// Lowest setpoint the input widget allows.
pub const MIN_TEMPERATURE: i32 = 10;
/// Highest setpoint the input widget allows.
pub const MAX_TEMPERATURE: i32 = 25;
/// Setpoint a freshly constructed heating component starts with.
pub const DEFAULT_TEMPERATURE: i32 = 20;

/// Whether `value` lies within the widget bounds, inclusive.
#[must_use]
pub fn is_within_bounds(value: i32) -> bool {
    (MIN_TEMPERATURE..=MAX_TEMPERATURE).contains(&value)
}
