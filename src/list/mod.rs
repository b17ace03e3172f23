mod confirm;
mod controller;
mod filter;
mod flash;
mod row;

pub use confirm::Confirm;
pub use controller::{Deletion, ListController, ListError, ListOptions, ListView};
pub use filter::{Filter, StatusFilter};
pub use flash::{Flash, FlashKind};
pub use row::{OpId, Row, SyncState};
