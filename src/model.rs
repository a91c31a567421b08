mod config;
mod role;
mod user;

pub use self::config::*;
pub use self::role::*;
pub use self::user::*;
