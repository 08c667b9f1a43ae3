pub mod users;
pub mod cache;

pub use users::*;
pub use cache::*;
