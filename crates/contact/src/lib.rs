mod command;
mod error;
mod notify;
mod store;
mod types;

pub use command::*;
pub use error::*;
pub use notify::*;
pub use store::*;
pub use types::*;
