//! View controllers: they turn UI actions into gateway calls and fold the
//! results back into in-memory state and notifications.

mod auth_forms;
pub mod dispatch;
mod search;
mod user_screen;

pub use self::auth_forms::{LoginScreen, RegisterScreen};
pub use self::search::filter_users;
pub use self::user_screen::{FileUploadStatus, ListState, UploadPhase, UserScreen, cache_busted};
