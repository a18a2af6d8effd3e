//! Client-side caches for the three data sets behind the transaction view.
//!
//! Each cache is a `CacheEntry` plus a fetch contract:
//! - employees are fetched once and kept until invalidated
//! - paginated transactions accumulate page by page along the `next_page` cursor
//! - employee-scoped transactions are replaced wholesale on every fetch

mod by_employee;
mod employees;
mod entry;
mod paginated;

pub use by_employee::EmployeeTransactionCache;
pub use employees::EmployeeCache;
pub use paginated::PaginatedTransactionCache;
