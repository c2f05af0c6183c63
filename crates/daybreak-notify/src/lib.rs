//! Notification composition and the end-to-end pipeline
//!
//! Assembles the outbound payload (date, weather, anniversary and
//! birthday fields) and drives weather resolution, composition, and
//! dispatch.

pub mod compose;
pub mod pipeline;

pub use compose::compose;
pub use pipeline::Notifier;
