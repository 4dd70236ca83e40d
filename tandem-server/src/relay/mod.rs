mod relay;
mod relay_command;
mod relay_error;

pub use relay::*;
pub use relay_command::*;
pub use relay_error::*;
