use std::time::Duration;

/// How long a stat takes to count up to its target
pub const COUNT_UP_DURATION: Duration = Duration::from_millis(1600);

/// Ease-out cubic: fast start, gentle landing
#[must_use]
pub fn ease_out_cubic(progress: f64) -> f64 {
    let p = progress.clamp(0.0, 1.0);
    1.0 - (1.0 - p).powi(3)
}

/// Displayed value `elapsed` into a count-up to `target` lasting `duration`
#[must_use]
pub fn count_up_value(target: u64, elapsed: Duration, duration: Duration) -> u64 {
    if duration.is_zero() || elapsed >= duration {
        return target;
    }
    let progress = elapsed.as_secs_f64() / duration.as_secs_f64();
    #[allow(
        clippy::cast_precision_loss,
        clippy::cast_possible_truncation,
        clippy::cast_sign_loss
    )]
    let value = (ease_out_cubic(progress) * target as f64).round() as u64;
    value.min(target)
}

/// Format with thousands separators, e.g. `12,480`
#[must_use]
pub fn group_thousands(value: u64) -> String {
    let digits = value.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}
