mod config;
mod config_serializer;

pub use config::{Config, MAX_BORDER_WIDTH};
pub use config_serializer::serialize_config;
