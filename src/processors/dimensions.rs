// imgbound/src/processors/dimensions.rs
//! Bounding-box dimension math. Pure functions, no image data involved.

/// Computes the output size that fits `source_width` x `source_height` into a
/// square of side `max_dimension`, preserving aspect ratio.
///
/// The larger side becomes `max_dimension`. The width branch is taken only
/// when width strictly exceeds height, so square images scale by height.
/// The smaller side is rounded half-to-even and never drops below 1.
///
/// ```
/// use imgbound::compute_target_size;
///
/// assert_eq!(compute_target_size(4000, 2000, 1500), (1500, 750));
/// assert_eq!(compute_target_size(1000, 1000, 500), (500, 500));
/// ```
pub fn compute_target_size(source_width: u32, source_height: u32, max_dimension: u32) -> (u32, u32) {
    debug_assert!(source_width > 0 && source_height > 0);
    debug_assert!(max_dimension > 0);

    if source_width > source_height {
        let height = scale_side(source_height, max_dimension, source_width);
        (max_dimension, height)
    } else {
        let width = scale_side(source_width, max_dimension, source_height);
        (width, max_dimension)
    }
}

fn scale_side(side: u32, max_dimension: u32, larger: u32) -> u32 {
    let scaled = (side as u64 * max_dimension as u64) as f64 / larger as f64;
    (scaled.round_ties_even() as u32).max(1)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn landscape_maps_width_to_max() {
        assert_eq!(compute_target_size(4000, 2000, 1500), (1500, 750));
    }

    #[test]
    fn portrait_maps_height_to_max() {
        assert_eq!(compute_target_size(600, 1200, 300), (150, 300));
    }

    #[test]
    fn square_takes_height_branch() {
        assert_eq!(compute_target_size(1000, 1000, 500), (500, 500));
        assert_eq!(compute_target_size(7, 7, 3), (3, 3));
    }

    #[test]
    fn upscales_small_sources() {
        assert_eq!(compute_target_size(100, 50, 1000), (1000, 500));
    }

    #[test]
    fn rounds_half_to_even() {
        // 3 * 5 / 6 = 2.5 -> 2; 5 * 7 / 10 = 3.5 -> 4
        assert_eq!(compute_target_size(6, 3, 5), (5, 2));
        assert_eq!(compute_target_size(10, 5, 7), (7, 4));
    }

    #[test]
    fn extreme_aspect_never_yields_zero() {
        assert_eq!(compute_target_size(10_000, 1, 100), (100, 1));
        assert_eq!(compute_target_size(1, 10_000, 100), (1, 100));
    }

    #[test]
    fn large_sides_do_not_overflow() {
        assert_eq!(compute_target_size(u32::MAX, u32::MAX / 2, 2), (2, 1));
    }

    #[test]
    fn larger_side_always_equals_max_and_aspect_holds() {
        for w in (1..=240).step_by(7) {
            for h in (1..=240).step_by(11) {
                for m in [1u32, 2, 17, 100, 999] {
                    let (out_w, out_h) = compute_target_size(w, h, m);
                    assert_eq!(out_w.max(out_h), m, "{}x{} -> {}", w, h, m);
                    assert!(out_w >= 1 && out_h >= 1);

                    if w > h {
                        let exact = h as f64 * m as f64 / w as f64;
                        assert!((out_h as f64 - exact).abs() <= 1.0);
                    } else {
                        assert_eq!(out_h, m);
                        let exact = w as f64 * m as f64 / h as f64;
                        assert!((out_w as f64 - exact).abs() <= 1.0);
                    }
                }
            }
        }
    }
}
