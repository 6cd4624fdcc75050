pub mod application;
pub mod cli;
pub mod connector;
pub mod domain;

pub use application::{
    clean_json_response, parse_thread_segments, ChatClient, ContentFormatter,
    DEFAULT_MAX_TOKENS, DEFAULT_TEMPERATURE, DEFAULT_THREAD_TEMPLATE, TOPIC_PLACEHOLDER,
};

pub use connector::{
    credentials_from_lookup, EnvironmentResolver, MockChatClient, OpenAiChatClient,
    REQUEST_TIMEOUT,
};

pub use domain::{
    normalize_api_base, ChatMessage, ClientCredentials, ConfigMap, ConfigValue, CoverTitle,
    DomainError, Environment, Role, ThreadSegments,
};
