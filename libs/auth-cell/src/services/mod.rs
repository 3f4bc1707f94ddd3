pub mod menu;
pub mod password;
pub mod session;
pub mod users;

pub use menu::*;
pub use password::*;
pub use session::*;
pub use users::*;
