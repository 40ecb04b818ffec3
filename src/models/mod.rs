// Data models

pub mod analysis;
pub mod user;
pub mod workout;
pub mod zones;

pub use analysis::*;
pub use user::*;
pub use workout::*;
pub use zones::*;
