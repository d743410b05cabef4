mod client;
mod error;
pub mod harness;
pub mod report;
pub mod score;

pub use commotion_realtime_types as types;

pub use client::{
    connect, connect_with_config, temperature_from_env, voice_from_env, Client, ClientTx, Config,
    ConfigBuilder, ServerRx,
};
pub use error::Error;

pub type Result<T> = std::result::Result<T, Error>;
