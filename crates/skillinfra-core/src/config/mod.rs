//! Tool settings: management API connection and external deployer commands.
//!
//! Settings are layered:
//! - Global: `<config dir>/skillinfra/skillinfra.toml`
//! - Project: `./skillinfra.toml`, overriding global values

pub mod parser;
pub mod paths;
pub mod schema;
pub mod store;

pub use parser::{parse_settings_toml, parse_settings_toml_str};
pub use schema::{ApiSettings, DEFAULT_API_ENDPOINT, DelegateCommandEntry, Settings};
pub use store::SettingsStore;
