use derive_more::{Display, Error};

/// A specialized `Result` where the error is this crate's `Error` type.
pub type Result<T, E = Error> = core::result::Result<T, E>;

/// Errors surfaced to producers and to startup configuration.
///
/// The draw loop never fails; everything it runs into is resolved in place.
#[derive(Debug, Display, Error, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    #[display("no output channel with index {_0}")]
    UnknownChannel(#[error(not(source))] usize),

    #[display("frame has {count} pixels, channel holds at most {capacity}")]
    TooManyPixels { count: usize, capacity: usize },

    #[display("frame queue is full")]
    QueueFull,

    #[display("no output driver was provided")]
    NoOutputDriver,

    #[display("matrix layout needs {pixels} pixels, buffer holds {capacity}")]
    LayoutTooLarge { pixels: usize, capacity: usize },
}
