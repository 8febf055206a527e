pub mod cli;
pub mod commands;
pub mod config;
pub mod doctor;
pub mod error;
pub mod paths;
pub mod profiles;
pub mod settings;
pub mod toolchain;
pub mod ui;

#[cfg(test)]
pub mod test_utils;
