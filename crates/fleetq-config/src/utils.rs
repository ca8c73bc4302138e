use std::{env, path::PathBuf};

pub fn home_dir() -> PathBuf {
    env::var("HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from("/root"))
}

/// `$XDG_CONFIG_HOME`, falling back to `$HOME/.config`.
pub fn xdg_config_home() -> PathBuf {
    env::var("XDG_CONFIG_HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| home_dir().join(".config"))
}

/// Default location of the config file when `FLEETQ_CONFIG` is unset.
pub fn default_config_path() -> PathBuf {
    xdg_config_home().join("fleetq").join("config.toml")
}
