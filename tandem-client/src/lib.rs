mod config;
mod engine;
mod error;
mod roster;
mod transport;

#[cfg(not(target_arch = "wasm32"))]
pub mod rtc;

pub use config::*;
pub use engine::*;
pub use error::*;
pub use roster::*;
pub use transport::*;
