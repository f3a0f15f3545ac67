//! Domain models for the web application.
//!
//! Database row types live next to their repositories in [`crate::db`]; the
//! types here are what handlers, services, and templates work with.

pub mod event;
pub mod flash;
pub mod inventory;
pub mod session;
pub mod user;

pub use event::{Event, ListedEvent, Purchase};
pub use flash::{FlashLevel, FlashMessage};
pub use inventory::{InventoryItem, Order};
pub use session::{CurrentUser, keys as session_keys};
pub use user::{AccountSummary, User};
