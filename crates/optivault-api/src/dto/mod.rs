pub mod metrics;
pub mod query;
pub mod response;
pub mod user;

pub use metrics::*;
pub use query::*;
pub use response::*;
pub use user::*;
