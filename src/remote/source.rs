use crate::domain::{AviaryStatus, Editable, Resource};
use crate::remote::RemoteError;
use async_trait::async_trait;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    pub page: u32,
    pub size: u32,
}

impl PageRequest {
    pub fn first(size: u32) -> Self {
        PageRequest { page: 0, size }
    }
}

/// Read side of a resource collection.
#[async_trait]
pub trait Fetch<R: Resource>: Send + Sync {
    /// Reads go out without credentials when `token` is `None`; the backend decides.
    async fn list(&self, token: Option<&str>, page: PageRequest) -> Result<Vec<R>, RemoteError>;
}

/// Write side of a resource collection. Every call requires a bearer token.
///
/// `create` and `update` return the record as the backend stored it, or `None` when the backend
/// answered without one.
#[async_trait]
pub trait Persist<R: Editable>: Send + Sync {
    async fn create(&self, token: &str, payload: &R::Payload) -> Result<Option<R>, RemoteError>;

    async fn update(&self, token: &str, id: &str, payload: &R::Payload) -> Result<Option<R>, RemoteError>;

    async fn delete(&self, token: &str, id: &str) -> Result<(), RemoteError>;
}

/// Full read/write access to one resource type.
pub trait Source<R: Editable>: Fetch<R> + Persist<R> {}

impl<R: Editable, T: Fetch<R> + Persist<R>> Source<R> for T {}

/// Aggregate aviary status shown on the overview page.
#[async_trait]
pub trait StatusSource: Send + Sync {
    async fn aviary_status(&self, token: Option<&str>) -> Result<AviaryStatus, RemoteError>;
}
