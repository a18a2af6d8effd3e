pub mod transactions;

pub use transactions::{draw_transactions, draw_view_more};
