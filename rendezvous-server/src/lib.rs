mod app;
mod config;
mod directory;
mod error;
mod lifecycle;
mod room;
mod signaling;


pub use app::*;
pub use config::*;
pub use directory::*;
pub use error::*;
pub use lifecycle::*;
pub use room::*;
pub use signaling::*;
