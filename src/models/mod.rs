pub mod page;
pub mod user;

pub use page::{Page, PageParams};
pub use user::{User, UserDto};
