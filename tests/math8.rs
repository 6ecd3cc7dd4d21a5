mod tests {
    use led_frame_scheduler::math8::{percent8, scale8};

    #[test]
    fn test_scale8() {
        assert_eq!(scale8(255, 128), 128);
        assert_eq!(scale8(0, 128), 0);
        assert_eq!(scale8(128, 128), 64);
        assert_eq!(scale8(128, 255), 128);
        assert_eq!(scale8(128, 0), 0);
        assert_eq!(scale8(255, 127), 127);
    }

    #[test]
    fn test_percent8() {
        assert!((percent8(255) - 100.0).abs() < f32::EPSILON);
        assert!(percent8(0).abs() < f32::EPSILON);
        assert!((percent8(127) - 49.8).abs() < 0.001);
        assert!((percent8(128) - 50.2).abs() < 0.001);
    }
}
