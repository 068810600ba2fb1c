pub mod config;
pub mod error;
pub mod pagination;
pub mod result;

pub use config::AppConfig;
pub use error::CadenceError;
pub use pagination::{PageInfo, PageRequest, Paged};
pub use result::CadenceResult;
