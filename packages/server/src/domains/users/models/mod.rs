pub mod favorite;
pub mod user;

pub use favorite::*;
pub use user::*;
