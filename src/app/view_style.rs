use ratatui::style::Color;

use crate::{constants::GRADIENT, particles::hsl_to_rgb};

pub(super) fn border_color(progress: f64) -> Color {
    let progress = progress.clamp(0.0, 1.0) as f32;
    let (r, g, b) = hsl_to_rgb(
        GRADIENT.border_hue - GRADIENT.border_drift * progress,
        GRADIENT.border_saturation,
        GRADIENT.border_lightness,
    );
    Color::Rgb(r, g, b)
}

pub(super) fn accent_color(progress: f64) -> Color {
    let progress = progress.clamp(0.0, 1.0) as f32;
    let (r, g, b) = hsl_to_rgb(
        GRADIENT.accent_hue - GRADIENT.accent_drift * progress,
        GRADIENT.accent_saturation,
        GRADIENT.accent_lightness,
    );
    Color::Rgb(r, g, b)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_border_hue_drifts_with_progress() {
        assert_ne!(border_color(0.0), border_color(1.0));
        assert_ne!(accent_color(0.0), accent_color(1.0));
    }

    #[test]
    fn test_gradient_colors_clamp_progress() {
        assert_eq!(border_color(1.0), border_color(2.0));
        assert_eq!(accent_color(0.0), accent_color(-1.0));
        assert!(matches!(border_color(0.5), Color::Rgb(_, _, _)));
    }
}
