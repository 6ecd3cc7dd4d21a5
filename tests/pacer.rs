mod tests {
    use led_frame_scheduler::pacer::frame_duration;
    use led_frame_scheduler::{Duration, FramePacer, PaceBranch, PaceRequest, PacerTimings, Pacing};

    fn pacer() -> FramePacer {
        FramePacer::new(PacerTimings::default())
    }

    #[test]
    fn test_local_sleeps_remaining_frame_time() {
        let pacing = pacer().pace(PaceRequest::Local {
            elapsed: Duration::from_millis(5),
            desired_fps: 50.0,
        });
        assert_eq!(
            pacing,
            Pacing {
                branch: PaceBranch::LocalFrame,
                sleep: Duration::from_millis(15),
            }
        );
    }

    #[test]
    fn test_local_never_negative() {
        let pacing = pacer().pace(PaceRequest::Local {
            elapsed: Duration::from_millis(25),
            desired_fps: 50.0,
        });
        assert_eq!(pacing.sleep, Duration::from_ticks(0));
    }

    #[test]
    fn test_local_capped_at_one_second() {
        let pacing = pacer().pace(PaceRequest::Local {
            elapsed: Duration::from_millis(100),
            desired_fps: 0.25,
        });
        assert_eq!(pacing.sleep, Duration::from_secs(1));
    }

    #[test]
    fn test_local_matches_min_formula() {
        for fps in [1.0f32, 7.5, 24.0, 60.0, 120.0] {
            for elapsed_ms in [0u64, 3, 10, 40, 900, 2_000] {
                let elapsed = Duration::from_millis(elapsed_ms);
                let pacing = pacer().pace(PaceRequest::Local {
                    elapsed,
                    desired_fps: fps,
                });
                let minimum = frame_duration(fps);
                let expected = if elapsed < minimum {
                    (minimum - elapsed).min(Duration::from_secs(1))
                } else {
                    Duration::from_ticks(0)
                };
                assert_eq!(pacing.sleep, expected);
            }
        }
    }

    #[test]
    fn test_network_wakes_for_next_due_frame() {
        let pacing = pacer().pace(PaceRequest::Network {
            next_due: Some(Duration::from_millis(10)),
        });
        assert_eq!(pacing.branch, PaceBranch::NetworkFrame);
        assert_eq!(pacing.sleep, Duration::from_millis(10));
    }

    #[test]
    fn test_network_sleep_ceiling() {
        let far = pacer().pace(PaceRequest::Network {
            next_due: Some(Duration::from_millis(800)),
        });
        assert_eq!(far.sleep, Duration::from_millis(50));

        let none = pacer().pace(PaceRequest::Network { next_due: None });
        assert_eq!(none.sleep, Duration::from_millis(50));

        let overdue = pacer().pace(PaceRequest::Network {
            next_due: Some(Duration::from_ticks(0)),
        });
        assert_eq!(overdue.sleep, Duration::from_ticks(0));
    }

    #[test]
    fn test_idle_minimal_tick() {
        let pacing = pacer().pace(PaceRequest::Idle);
        assert_eq!(
            pacing,
            Pacing {
                branch: PaceBranch::Idle,
                sleep: Duration::from_millis(1),
            }
        );
    }

    #[test]
    fn test_frame_duration() {
        assert_eq!(frame_duration(50.0), Duration::from_millis(20));
        assert_eq!(frame_duration(0.0), Duration::from_micros(16_667));
        assert_eq!(frame_duration(f32::NAN), Duration::from_micros(16_667));
    }
}
