mod overview;
mod page;
mod shell;

pub use overview::Overview;
pub use page::Page;
pub use shell::{Dashboard, DashboardSource};
