//! Media sinks and the video + audio sink pair

pub mod clock;
pub mod pair;
pub mod sink;

pub use clock::{ClockSettings, ClockSink};
pub use pair::{MediaHandlePair, PairEvent, SignalReceiver};
pub use sink::{
    Generation, MediaSink, SinkError, SinkNotifier, SinkRole, SinkSignal, SinkStatus,
};
