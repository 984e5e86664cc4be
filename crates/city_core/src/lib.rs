//! # City Core
//!
//! Game state and save persistence for the city builder backend.
//!
//! This crate contains **no** HTTP and no simulation. The browser client
//! runs the city; the server only holds its numbers and writes them to disk:
//! - [`state`] - the live [`GameState`] and the lock-guarded [`StateStore`]
//! - [`save`] - the on-disk [`SaveRecord`] format and filename grammar
//! - [`persistence`] - [`SaveGateway`], which writes, finds and reads saves
//! - [`clock`] - wall-clock source, swappable in tests
//! - [`error`] - error types

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all, clippy::pedantic)]

pub mod clock;
pub mod error;
pub mod persistence;
pub mod save;
pub mod state;

pub use clock::{Clock, FixedClock, SystemClock};
pub use error::{CityError, PersistenceError, StateError};
pub use persistence::{SaveEntry, SaveGateway, SaveReceipt, ValidationReport};
pub use save::{SaveFileName, SaveRecord, UNNAMED_CITY};
pub use state::{GameState, GameTime, ServiceLevels, StateStore};

/// Re-export commonly used types
pub mod prelude {
    pub use crate::clock::{Clock, SystemClock};
    pub use crate::error::{CityError, PersistenceError, Result, StateError};
    pub use crate::persistence::SaveGateway;
    pub use crate::save::SaveRecord;
    pub use crate::state::{GameState, GameTime, StateStore};
}
