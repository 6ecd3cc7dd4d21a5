mod common;

mod tests {
    use led_frame_scheduler::{Error, FrameQueues, OverflowPolicy, Timestamp};

    use crate::common::{GREEN, RED};

    #[test]
    fn test_push_frame_per_channel() {
        let queues: FrameQueues<2, 4, 4> = FrameQueues::new();
        let sender = queues.sender();

        sender.push_frame(0, 1, 0, &[RED; 4]).unwrap();
        sender.push_frame(0, 2, 0, &[RED; 4]).unwrap();
        sender.push_frame(1, 1, 500, &[GREEN; 2]).unwrap();

        assert_eq!(queues.len(0), Ok(2));
        assert_eq!(queues.len(1), Ok(1));
        let newest = queues
            .with_queue(1, |queue| queue.peek_newest().map(|frame| (frame.timestamp(), frame.len())))
            .unwrap();
        assert_eq!(newest, Some((Timestamp::new(1, 500), 2)));
    }

    #[test]
    fn test_push_frame_errors() {
        let queues: FrameQueues<2, 4, 4> = FrameQueues::new();
        assert_eq!(queues.push_frame(2, 1, 0, &[RED; 4]), Err(Error::UnknownChannel(2)));
        assert_eq!(
            queues.push_frame(0, 1, 0, &[RED; 5]),
            Err(Error::TooManyPixels {
                count: 5,
                capacity: 4
            })
        );
        assert_eq!(queues.is_empty(0), Ok(true));
        assert_eq!(queues.is_empty(5), Err(Error::UnknownChannel(5)));
    }

    #[test]
    fn test_overflow_policy_per_channel() {
        let queues: FrameQueues<2, 4, 1> = FrameQueues::new();
        queues
            .set_overflow_policy(1, OverflowPolicy::RejectNewest)
            .unwrap();

        queues.push_frame(0, 1, 0, &[RED; 4]).unwrap();
        queues.push_frame(0, 2, 0, &[RED; 4]).unwrap();
        queues.push_frame(1, 1, 0, &[RED; 4]).unwrap();
        assert_eq!(queues.push_frame(1, 2, 0, &[RED; 4]), Err(Error::QueueFull));

        let oldest = |channel| {
            queues
                .with_queue(channel, |queue| queue.next_due())
                .unwrap()
        };
        assert_eq!(oldest(0), Some(Timestamp::new(2, 0)));
        assert_eq!(oldest(1), Some(Timestamp::new(1, 0)));
    }

    #[test]
    fn test_with_queues_and_clear() {
        let queues: FrameQueues<3, 4, 4> = FrameQueues::default();
        for channel in 0..3 {
            queues.push_frame(channel, 1, 0, &[RED; 4]).unwrap();
        }

        let total = queues.with_queues(|all| all.iter().map(|queue| queue.len()).sum::<usize>());
        assert_eq!(total, 3);

        queues.clear();
        assert_eq!(queues.with_queues(|all| all.iter().all(|queue| queue.is_empty())), true);
    }
}
