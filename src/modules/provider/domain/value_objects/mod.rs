pub mod fetch_source;
pub mod user_id;

pub use fetch_source::*;
pub use user_id::*;
