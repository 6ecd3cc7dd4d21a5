#![no_std]

pub mod buffer_queue;
pub mod clock;
pub mod color;
pub mod diagnostics;
pub mod draw_loop;
pub mod effect;
pub mod error;
pub mod frame;
pub mod frame_queues;
pub mod link;
pub mod maintenance;
pub mod math8;
pub mod output;
pub mod output_stage;
pub mod pacer;
pub mod power;
pub mod timestamp;

pub use buffer_queue::{BufferQueue, OverflowPolicy};
pub use clock::{FrameClock, SystemTime, TimeSource, WallClock};
pub use diagnostics::{BufferAge, CommitReport, Diagnostics};
pub use draw_loop::{DrawLoop, DrawLoopConfig, DrawLoopShared, Drawn, LocalDraw, TickReport};
pub use effect::{EffectEngine, SolidColorEngine};
pub use error::{Error, Result};
pub use frame::Frame;
pub use frame_queues::{FrameQueues, FrameSender};
pub use link::LinkStatus;
pub use maintenance::MaintenanceFlag;
pub use output::{
    MatrixLayout, MatrixOutput, Output, OutputDriver, OutputKind, OutputTarget, StripOutput,
};
pub use output_stage::{OutputStage, ShowOutcome};
pub use pacer::{FramePacer, PaceBranch, PaceRequest, PacerTimings, Pacing};
pub use power::{PowerBudget, PowerLimit, PowerModel};
pub use timestamp::Timestamp;

pub use color::Rgb;
pub use embassy_time::{Duration, Instant};
