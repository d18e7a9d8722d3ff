pub mod error;
pub mod logging;

pub use error::{ApiError, ApiErrorResponse, ApiResult};
pub use logging::{bootstrap_subscriber, init_logging};
