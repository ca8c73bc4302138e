use std::{
    fmt::Display,
    fs,
    io::Read,
    sync::{LazyLock, PoisonError, RwLock},
};

use nu_ansi_term::Color;
use serde::Serialize;

use crate::error::{CliResult, ErrorContext};

pub static COLOR: LazyLock<RwLock<bool>> = LazyLock::new(|| RwLock::new(true));

pub fn set_color(enabled: bool) {
    *COLOR.write().unwrap_or_else(PoisonError::into_inner) = enabled;
}

fn color_enabled() -> bool {
    *COLOR.read().unwrap_or_else(PoisonError::into_inner)
}

pub struct Colored<T: Display>(pub Color, pub T);

impl<T: Display> Display for Colored<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if color_enabled() {
            write!(f, "{}", self.0.prefix())?;
            self.1.fmt(f)?;
            write!(f, "{}", self.0.suffix())
        } else {
            self.1.fmt(f)
        }
    }
}

pub fn term_width() -> usize {
    terminal_size::terminal_size()
        .map(|(w, _)| w.0 as usize)
        .unwrap_or(80)
}

/// Reads a file, or stdin when `path` is `None` or `-`.
pub fn read_input(path: Option<&str>) -> CliResult<String> {
    match path {
        None | Some("-") => {
            let mut buffer = String::new();
            std::io::stdin()
                .read_to_string(&mut buffer)
                .with_context(|| "reading stdin".to_string())?;
            Ok(buffer)
        }
        Some(path) => fs::read_to_string(path).with_context(|| format!("reading {path}")),
    }
}

pub fn print_json<T: Serialize>(value: &T) -> CliResult<()> {
    let output =
        serde_json::to_string_pretty(value).with_context(|| "serializing output".to_string())?;
    println!("{output}");
    Ok(())
}
