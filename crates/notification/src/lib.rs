mod contact;
mod service;

pub use contact::*;
pub use service::*;
