//! Data sources
//!
//! The database layer is not part of this crate. Hosts implement
//! `DataSource` over their own connection; `StaticDataSource` replays a fixed
//! row set.

mod fixture;
mod traits;

pub use fixture::{RecordedQuery, StaticDataSource};
pub use traits::{count_placeholders, BindValue, DataSource};
