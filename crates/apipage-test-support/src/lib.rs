//! Shared test doubles for the api-page backend.

mod broadcaster;
mod clock;
mod store;

pub use broadcaster::{FailingBroadcaster, RecordingBroadcaster};
pub use clock::{FixedClock, SteppingClock};
pub use store::{FailingEventStore, FailingPageStore};
