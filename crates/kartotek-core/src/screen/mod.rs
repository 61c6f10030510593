//! List-screen state machine and orchestration.
//!
//! The screen lifecycle is `Idle → Loading → { Loaded | Failed }`,
//! re-entering `Loading` on refresh and after successful mutations. The
//! state transitions live in a pure reducer ([`ScreenState::apply`]);
//! [`ListScreen`] wires the reducer to a [`RecordStore`](crate::RecordStore)
//! and discards fetch results that a later fetch has superseded.

mod controller;
mod state;

pub use controller::ListScreen;
pub use state::{Phase, ScreenEvent, ScreenState};
