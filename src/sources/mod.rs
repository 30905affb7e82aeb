pub mod base;
pub mod http;
pub mod memory;

pub use base::{AuthStatus, Credentials, DataSource, IssueFetch};
pub use http::HttpSource;
pub use memory::InMemorySource;
