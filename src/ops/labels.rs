//! Slider/label conversions for the intensity and cost inputs.
//!
//! Intensity is a 1..=3 slider with named positions. Cost is a 0..=40
//! slider where each step is a quarter of the currency unit, so position
//! 40 is 10.00.

pub const INTENSITY_MIN: u8 = 1;
pub const INTENSITY_MAX: u8 = 3;
pub const DEFAULT_INTENSITY: u8 = 2;

pub const COST_SLIDER_MAX: u32 = 40;
pub const COST_STEP: f64 = 0.25;

const INTENSITY_LABELS: [&str; 4] = ["", "Mild", "Medium", "Strong"];

/// Label for an intensity slider position. Unmapped positions (including 0)
/// have an empty label.
pub fn intensity_label(value: u8) -> &'static str {
    INTENSITY_LABELS
        .get(value as usize)
        .copied()
        .unwrap_or("")
}

/// Currency amount for a cost slider position
pub fn slider_to_cost(position: u32) -> f64 {
    position as f64 * COST_STEP
}

/// Label for a cost slider position, e.g. `10` → `£2.50`
pub fn cost_label(position: u32, currency: &str) -> String {
    format_cost(slider_to_cost(position), currency)
}

/// Format a currency amount to two decimal places with a prefix
pub fn format_cost(amount: f64, currency: &str) -> String {
    format!("{}{:.2}", currency, amount)
}

/// Slider position for a stored cost.
///
/// Rounds to the nearest step, so amounts that are not a multiple of 0.25
/// lose precision. No cost (or zero) is position 0; the result is clamped
/// to the slider range.
pub fn cost_to_slider(cost: Option<f64>) -> u32 {
    match cost {
        Some(amount) if amount > 0.0 => {
            ((amount / COST_STEP).round() as u32).min(COST_SLIDER_MAX)
        }
        _ => 0,
    }
}

/// Clamp an intensity value into the slider range
pub fn clamp_intensity(value: u8) -> u8 {
    value.clamp(INTENSITY_MIN, INTENSITY_MAX)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn intensity_labels() {
        assert_eq!(intensity_label(1), "Mild");
        assert_eq!(intensity_label(2), "Medium");
        assert_eq!(intensity_label(3), "Strong");
        assert_eq!(intensity_label(0), "");
        assert_eq!(intensity_label(7), "");
    }

    #[test]
    fn cost_label_uses_quarter_steps() {
        assert_eq!(cost_label(0, "£"), "£0.00");
        assert_eq!(cost_label(1, "£"), "£0.25");
        assert_eq!(cost_label(10, "£"), "£2.50");
        assert_eq!(cost_label(40, "$"), "$10.00");
    }

    #[test]
    fn cost_label_survives_slider_round_trip() {
        for n in [0, 10, 40] {
            let back = cost_to_slider(Some(slider_to_cost(n)));
            assert_eq!(cost_label(back, "£"), cost_label(n, "£"));
        }
    }

    #[test]
    fn cost_to_slider_rounds_to_nearest_step() {
        assert_eq!(cost_to_slider(Some(2.5)), 10);
        assert_eq!(cost_to_slider(Some(2.6)), 10);
        assert_eq!(cost_to_slider(Some(2.7)), 11);
        // half a step rounds up
        assert_eq!(cost_to_slider(Some(0.125)), 1);
    }

    #[test]
    fn cost_to_slider_missing_or_out_of_range() {
        assert_eq!(cost_to_slider(None), 0);
        assert_eq!(cost_to_slider(Some(0.0)), 0);
        assert_eq!(cost_to_slider(Some(-3.0)), 0);
        assert_eq!(cost_to_slider(Some(25.0)), COST_SLIDER_MAX);
    }

    #[test]
    fn clamp_intensity_bounds() {
        assert_eq!(clamp_intensity(0), 1);
        assert_eq!(clamp_intensity(2), 2);
        assert_eq!(clamp_intensity(9), 3);
    }
}
