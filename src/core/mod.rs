pub mod aggregator;
pub mod coordinator;
pub mod engine;
pub mod filter;
pub mod normalizer;
pub mod render;

pub use crate::domain::model::{GraduateRecord, Query, RawRow, RawTable};
pub use crate::domain::ports::{ConfigProvider, MapView, Presenter, RowSource};
pub use crate::utils::error::Result;
