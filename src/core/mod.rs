pub mod etl;
pub mod normalize;
pub mod pipeline;
pub mod writer;

pub use crate::domain::model::{NormalizeResult, Table};
pub use crate::domain::ports::{ConfigProvider, Pipeline, Storage};
pub use crate::utils::error::Result;
