//! Builders to construct the admission plugin from configuration.

pub mod plugin_builder;

pub use plugin_builder::GangPluginBuilder;
