//! Buffer stages stacked in front of a notifier.

mod queue;
mod sink;
mod waitdups;

pub use queue::Queue;
pub use sink::NotifierSink;
pub use waitdups::WaitDups;
