//! Line-oriented command interpreter
//!
//! Each input line is parsed into one [`Command`], executed against the
//! store, and rendered as a [`Reply`]. The [`Session`] owns the read,
//! dispatch, print loop.

pub mod command;
pub mod reply;
pub mod session;

pub use command::Command;
pub use reply::Reply;
pub use session::Session;
