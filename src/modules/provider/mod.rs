pub mod domain;
pub mod infrastructure;
pub mod traits;

// Re-exports for easy external access
pub use domain::{FetchSource, UserId};
pub use infrastructure::MockService;
pub use traits::Fetchable;
