mod chat_message;
mod config_map;
mod credentials;
mod environment;
mod thread;

pub use chat_message::*;
pub use config_map::*;
pub use credentials::*;
pub use environment::*;
pub use thread::*;
