pub mod annotations;
pub mod config;
pub mod error;
pub mod fields;
pub mod utils;

#[cfg(test)]
pub mod test_utils;
