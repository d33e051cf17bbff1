//! Reporter configuration: the raw host block, its validation and the INI
//! loader.

mod ini_source;
mod resolve;
mod types;

pub use ini_source::{IniSourceError, load_ini_block};
pub use resolve::ResolvedConfig;
pub use types::{CONFIG_KEY, ConfigError, FilterOption, ReporterConfigBlock};
