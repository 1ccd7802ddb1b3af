//! Configuration for rowbind handles

pub mod defaults;
mod settings;

pub use settings::{Settings, UnnamedParameterPolicy};
