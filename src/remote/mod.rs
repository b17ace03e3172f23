mod client;
pub mod fixtures;
mod list_response;
mod source;

pub use client::{RemoteClient, RemoteError, new_client};
pub use fixtures::FixtureSource;
pub use list_response::ListResponse;
pub use source::{Fetch, PageRequest, Persist, Source, StatusSource};
