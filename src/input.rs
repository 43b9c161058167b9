//! Pointer-to-value resolution for the dial and the speed slider.

/// Convert a pointer position into a servo angle in [0, 180].
///
/// Screen Y grows downward, so `dy` is inverted to make "up" read as 90°.
/// The pointer can sit anywhere on the full circle while the dial only
/// spans the upper half; angles in (180°, 270°) collapse to 180 and angles
/// in [270°, 360°) collapse to 0, so the lower half maps to whichever
/// endpoint it is nearer.
pub fn resolve_angle(pointer_x: f64, pointer_y: f64, center_x: f64, center_y: f64) -> i32 {
    let dx = pointer_x - center_x;
    let dy = center_y - pointer_y;

    let mut degrees = dy.atan2(dx).to_degrees();
    if degrees < 0.0 {
        degrees += 360.0;
    }

    if degrees > 180.0 {
        if degrees < 270.0 {
            degrees = 180.0;
        } else {
            degrees = 0.0;
        }
    } else {
        degrees = degrees.clamp(0.0, 180.0);
    }

    degrees as i32
}

/// Convert a pointer X position on the slider track into a value in
/// [min_value, max_value], truncating toward zero like the original
/// integer conversion.
pub fn resolve_slider(
    pointer_x: f64,
    track_start_x: f64,
    track_end_x: f64,
    min_value: i32,
    max_value: i32,
) -> i32 {
    debug_assert!(
        (track_end_x - track_start_x).abs() > f64::EPSILON,
        "slider track has zero length"
    );
    let value = map_range(
        pointer_x,
        track_start_x,
        track_end_x,
        f64::from(min_value),
        f64::from(max_value),
    );
    (value as i32).clamp(min_value, max_value)
}

/// Map `value` from one range to another, unclamped.
pub fn map_range(value: f64, in_min: f64, in_max: f64, out_min: f64, out_max: f64) -> f64 {
    (value - in_min) * (out_max - out_min) / (in_max - in_min) + out_min
}

pub fn inside_circle(px: f64, py: f64, cx: f64, cy: f64, radius: f64) -> bool {
    let dx = px - cx;
    let dy = py - cy;
    (dx * dx + dy * dy).sqrt() <= radius
}

#[cfg(test)]
mod tests {
    use super::*;

    const CX: f64 = 300.0;
    const CY: f64 = 300.0;

    #[test]
    fn angle_is_zero_right_of_center_for_any_radius() {
        for r in [1.0, 10.0, 125.0, 4000.0] {
            assert_eq!(resolve_angle(CX + r, CY, CX, CY), 0);
        }
    }

    #[test]
    fn angle_is_180_left_of_center_for_any_radius() {
        for r in [1.0, 10.0, 125.0, 4000.0] {
            assert_eq!(resolve_angle(CX - r, CY, CX, CY), 180);
        }
    }

    #[test]
    fn straight_up_is_90() {
        assert_eq!(resolve_angle(CX, CY - 125.0, CX, CY), 90);
    }

    #[test]
    fn diagonal_quadrants_land_in_expected_halves() {
        assert_eq!(resolve_angle(CX + 100.0, CY - 100.0, CX, CY), 45);
        assert_eq!(resolve_angle(CX - 100.0, CY - 100.0, CX, CY), 135);
    }

    #[test]
    fn lower_half_folds_to_nearer_endpoint() {
        // Just below the negative X axis: nearer 180.
        assert_eq!(resolve_angle(CX - 10.0, CY + 200.0, CX, CY), 180);
        assert_eq!(resolve_angle(CX - 200.0, CY + 10.0, CX, CY), 180);
        // Just below the positive X axis: nearer 0.
        assert_eq!(resolve_angle(CX + 10.0, CY + 200.0, CX, CY), 0);
        assert_eq!(resolve_angle(CX + 200.0, CY + 10.0, CX, CY), 0);
        // Straight down sits at 270° and folds to 0.
        assert_eq!(resolve_angle(CX, CY + 125.0, CX, CY), 0);
    }

    #[test]
    fn angle_never_leaves_valid_range() {
        for y in (0..=600).step_by(7) {
            for x in (0..=600).step_by(7) {
                let angle = resolve_angle(f64::from(x), f64::from(y), CX, CY);
                assert!((0..=180).contains(&angle), "angle {angle} at ({x}, {y})");
            }
        }
    }

    #[test]
    fn slider_maps_linearly_with_truncation() {
        // (350 - 200) * 95 / 300 + 5 = 52.5, truncated.
        assert_eq!(resolve_slider(350.0, 200.0, 500.0, 5, 100), 52);
        assert_eq!(resolve_slider(200.0, 200.0, 500.0, 5, 100), 5);
        assert_eq!(resolve_slider(500.0, 200.0, 500.0, 5, 100), 100);
    }

    #[test]
    fn slider_clamps_outside_the_track() {
        assert_eq!(resolve_slider(100.0, 200.0, 500.0, 5, 100), 5);
        assert_eq!(resolve_slider(600.0, 200.0, 500.0, 5, 100), 100);
    }

    #[test]
    fn slider_is_monotonic_in_pointer_x() {
        let mut last = i32::MIN;
        for x in 0..700 {
            let value = resolve_slider(f64::from(x), 200.0, 500.0, 5, 100);
            assert!(value >= last);
            last = value;
        }
    }

    #[test]
    fn map_range_inverts_the_slider_mapping() {
        let handle_x = map_range(52.0, 5.0, 100.0, 200.0, 500.0);
        assert!((handle_x - 348.42).abs() < 0.01);
        assert_eq!(map_range(5.0, 5.0, 100.0, 200.0, 500.0), 200.0);
        assert_eq!(map_range(100.0, 5.0, 100.0, 200.0, 500.0), 500.0);
    }

    #[test]
    fn circle_hit_test_is_inclusive_of_the_rim() {
        assert!(inside_circle(425.0, 300.0, CX, CY, 125.0));
        assert!(!inside_circle(426.0, 300.0, CX, CY, 125.0));
        assert!(inside_circle(CX, CY, CX, CY, 125.0));
    }
}
