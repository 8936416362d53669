//! `recordpilot config`: Print the default configuration.

use recordpilot_config::AppConfig;

pub fn run() {
    let path = AppConfig::config_dir().join("config.toml");
    println!("# {}", path.display());
    println!("{}", AppConfig::default_toml());
}
