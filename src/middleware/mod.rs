pub mod host;

pub use host::{AllowedHosts, host_allowlist_middleware};
