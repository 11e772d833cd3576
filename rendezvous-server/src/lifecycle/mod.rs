mod connection_event;
mod connection_handler;
mod connection_state;

pub use connection_event::*;
pub use connection_handler::*;
pub use connection_state::*;
