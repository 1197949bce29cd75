//! Security event notification.
//!
//! A [`Notifier`] delivers events to a remote collector. A [`NotifyBuffer`]
//! is what producers push into; buffers are stacked in stages:
//!
//! ```text
//! push ─▶ Queue ─▶ WaitDups ─▶ NotifierSink ─▶ Notifier
//! ```
//!
//! The queue decouples producers from delivery, the wait-dups stage collapses
//! identical events raised within a window, and the sink calls the notifier.
//!
//! # Example
//!
//! ```ignore
//! use event_notify::{Event, EventLevel, NotifyBuffer};
//!
//! let buffer = service_factory::event_notify_buffer(&cfg, &registry)?;
//! buffer
//!     .push(Event::new(10_001, EventLevel::High, "dnsutil").with_data("domain", "evil.example"))
//!     .await?;
//! ```

pub mod buffer;
mod error;
mod event;
mod notifier;

pub use buffer::{NotifierSink, Queue, WaitDups};
pub use error::{NotifyError, NotifyResult};
pub use event::{Event, EventLevel};
pub use notifier::{Notifier, NotifyBuffer};
