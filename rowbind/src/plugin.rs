//! Handle plugins

use crate::mysql::MySqlHandleBuilder;

/// Customizes a handle while it is being built.
///
/// Plugins typically register column decoders for their own types.
pub trait Plugin {
    /// Name reported in logs.
    fn name(&self) -> &'static str {
        std::any::type_name::<Self>()
    }

    fn customize(&self, builder: &mut MySqlHandleBuilder);
}

/// Registers decoders for every built-in value type and its `Option`.
///
/// Installed on every [`MySqlHandleBuilder`] when it is created.
#[derive(Debug, Clone, Copy, Default)]
pub struct RecordPlugin;

impl Plugin for RecordPlugin {
    fn customize(&self, builder: &mut MySqlHandleBuilder) {
        builder.decoders_mut().register_builtins();
    }
}
