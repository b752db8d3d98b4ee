pub mod filter;
pub mod pagination;
pub mod status;

pub use filter::{StatusCounts, StatusFilter, UserFilter, filter_by_status};
pub use pagination::{Page, Paginator};
pub use status::{Status, StatusAction, available_actions};
