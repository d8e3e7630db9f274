use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};

use crate::slots::{ResizePolicy, TimePolicy};

pub const CONFIG_FILE: &str = "event-slots.toml";
pub const ENV_PREFIX: &str = "SLOTS_";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    pub bind_address: String,
    pub port: u16,
    pub time_policy: TimePolicy,
    pub resize_policy: ResizePolicy,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0".to_string(),
            port: 8080,
            time_policy: TimePolicy::Lenient,
            resize_policy: ResizePolicy::Reset,
        }
    }
}

/// Defaults, then `event-slots.toml`, then `SLOTS_*` environment variables
pub fn figment() -> Figment {
    Figment::from(Serialized::defaults(Config::default()))
        .merge(Toml::file(CONFIG_FILE))
        .merge(Env::prefixed(ENV_PREFIX))
}

pub fn load_config() -> Result<Config, figment::Error> {
    figment().extract()
}
