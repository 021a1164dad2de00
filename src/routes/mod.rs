//! Route modules for the Loteamento server

pub mod health;
pub mod process;
