mod analyze;
mod auth;
mod serve;

pub use analyze::{AnalyzeOptions, analyze};
pub use auth::auth;
pub use serve::serve;
