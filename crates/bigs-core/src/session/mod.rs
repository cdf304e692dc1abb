//! Session state: who is signed in and with which credentials.
//!
//! A [`SessionState`] is an explicit handle rather than a global; clone it into
//! every collaborator that needs it. Changes are published to subscribed
//! [`SessionObserver`]s.

mod observer;
mod state;

pub use observer::{SessionEvent, SessionObserver, SubscriptionId};
pub use state::{Profile, SessionSnapshot, SessionState};

/// Display name of an anonymous session.
pub const DEFAULT_DISPLAY_NAME: &str = "User";
/// Email of an anonymous session.
pub const DEFAULT_EMAIL: &str = "No email";
/// Avatar reference used when none is known.
pub const DEFAULT_AVATAR: &str = "/image/avatar.png";
