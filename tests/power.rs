mod common;

mod tests {
    use led_frame_scheduler::{PowerBudget, PowerLimit, PowerModel, Rgb};

    use crate::common::{BLUE, RED, WHITE};

    const BLACK: Rgb = Rgb { r: 0, g: 0, b: 0 };

    #[test]
    fn test_estimate() {
        let model = PowerModel::WS2812;
        assert_eq!(model.estimate_mw(&[WHITE; 10], 255), 2_150);
        assert_eq!(model.unscaled_mw(&[WHITE; 10]), 2_150);
        assert_eq!(model.estimate_mw(&[WHITE; 10], 0), 50);
        assert_eq!(model.estimate_mw(&[BLACK; 10], 255), 50);
        assert_eq!(model.estimate_mw(&[RED; 3], 255), 15 + 3 * 80);
        assert_eq!(model.estimate_mw(&[], 255), 0);
    }

    #[test]
    fn test_max_brightness_known_value() {
        let budget = PowerBudget::new(PowerModel::WS2812, PowerLimit::Milliwatts(1_100));
        assert_eq!(budget.max_brightness(&[WHITE; 10], 255), 127);
    }

    #[test]
    fn test_max_brightness_under_ceiling_keeps_request() {
        let budget = PowerBudget::default();
        assert_eq!(budget.max_brightness(&[BLUE; 4], 255), 255);
        assert_eq!(budget.max_brightness(&[BLUE; 4], 80), 80);
    }

    #[test]
    fn test_max_brightness_unlimited() {
        let budget = PowerBudget::new(PowerModel::WS2812, PowerLimit::Unlimited);
        assert_eq!(budget.max_brightness(&[WHITE; 1_000], 200), 200);
    }

    #[test]
    fn test_max_brightness_dark_draw_over_ceiling() {
        let budget = PowerBudget::new(PowerModel::WS2812, PowerLimit::Milliwatts(10));
        assert_eq!(budget.max_brightness(&[WHITE; 10], 255), 0);
    }

    #[test]
    fn test_max_brightness_is_largest_within_ceiling() {
        let frames: [&[Rgb]; 4] = [
            &[WHITE; 60],
            &[RED; 150],
            &[Rgb { r: 10, g: 200, b: 30 }; 90],
            &[BLUE, WHITE, RED, BLACK, WHITE, WHITE],
        ];
        let model = PowerModel::WS2812;

        for pixels in frames {
            for ceiling in (0..=20_000).step_by(137) {
                let budget = PowerBudget::new(model, PowerLimit::Milliwatts(ceiling));
                let brightness = budget.max_brightness(pixels, 255);

                if model.estimate_mw(pixels, 0) > ceiling {
                    assert_eq!(brightness, 0);
                    continue;
                }
                assert!(model.estimate_mw(pixels, brightness) <= ceiling);
                if brightness < 255 {
                    assert!(model.estimate_mw(pixels, brightness + 1) > ceiling);
                }
            }
        }
    }

    #[test]
    fn test_estimate_is_monotonic() {
        let model = PowerModel::default();
        let pixels = [Rgb { r: 12, g: 99, b: 254 }; 33];
        let mut previous = 0;
        for brightness in 0..=255u8 {
            let estimate = model.estimate_mw(&pixels, brightness);
            assert!(estimate >= previous);
            previous = estimate;
        }
    }

    #[test]
    fn test_max_brightness_total_shares_one_ceiling() {
        let budget = PowerBudget::new(PowerModel::WS2812, PowerLimit::Milliwatts(1_100));
        let strip: &[Rgb] = &[WHITE; 10];

        let shared = budget.max_brightness_total([strip, strip], 255);
        assert_eq!(shared, 60);
        assert_eq!(budget.model.total_mw([strip, strip], shared), 1_088);
        assert!(budget.model.total_mw([strip, strip], shared + 1) > 1_100);

        // A lone channel gets more of the supply
        assert_eq!(budget.max_brightness_total([strip], 255), 127);
        assert_eq!(budget.max_brightness_total(core::iter::empty::<&[Rgb]>(), 255), 255);
    }
}
