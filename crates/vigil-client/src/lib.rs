//! Client side of the prayer proxy.
//!
//! [`ProxyClient`] speaks the proxy's HTTP contract and [`PrayerFlow`]
//! drives a prayer session through it. [`EmotionPicker`] fetches the emotion
//! lists shown before a session starts. [`UsageCounter`] reports usage when
//! the deployment provides a counter.

pub mod counter;
pub mod error;
pub mod flow;
pub mod picker;
pub mod proxy;

pub use counter::{CounterStatus, UsageCounter};
pub use error::ClientError;
pub use flow::{FlowOutcome, PrayerFlow};
pub use picker::{EmotionPicker, MORE_EMOTIONS_CONTEXT};
pub use proxy::{GeneratedReply, ProxyClient, GROQ_PATH, PRAYER_PATH};
