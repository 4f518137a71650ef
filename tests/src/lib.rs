#[cfg(test)]
mod common;

mod capture_config;
mod errors;
mod layout;
mod orders;
mod room;
mod threads;
