//! Session lifecycle for the collab client.
//!
//! This crate answers one question for the rest of the app: who is signed
//! in right now?
//!
//! 1. **State** ([`SessionState`]): `Unknown`, `Anonymous`, or
//!    `Authenticated` with the user's identity.
//! 2. **Transitions** ([`SessionManager`]): `check_session`, `login`,
//!    `logout`, plus teardown when the gateway reports an auth failure.
//! 3. **Observation**: a `watch` channel for the current state and a
//!    `broadcast` channel of [`SessionEvent`]s.
//!
//! # How it fits in the stack
//!
//! ```text
//! UI / CLI (above)            ← reads state, calls login/logout
//!     ↕
//! Session Layer (this crate)  ← sole writer of session state
//!     ↕
//! Gateway Layer (below)       ← remote calls, signals auth failures up
//! ```

mod error;
mod manager;
mod state;

pub use error::SessionError;
pub use manager::SessionManager;
pub use state::{SessionEvent, SessionState};
