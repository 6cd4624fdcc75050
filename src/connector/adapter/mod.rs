mod environment_resolver;
mod mock_chat_client;
mod openai_client;

pub use environment_resolver::*;
pub use mock_chat_client::*;
pub use openai_client::*;
