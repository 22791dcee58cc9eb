//! Process-wide registration of the value types that archives may contain.
//!
//! Archives refuse to encode or decode grids until `initialize` has run. Calling it again is free.

use crate::GridValue;

use std::sync::OnceLock;

static REGISTERED_VALUE_TYPES: OnceLock<Vec<&'static str>> = OnceLock::new();

/// Registers every built-in grid value type. Idempotent and thread-safe.
pub fn initialize() {
    REGISTERED_VALUE_TYPES.get_or_init(|| {
        let types = vec![<f32 as GridValue>::TYPE_NAME, <f64 as GridValue>::TYPE_NAME];
        tracing::debug!("Registered grid value types {:?}", types);

        types
    });
}

/// Returns `true` iff `initialize` has been called in this process.
pub fn is_initialized() -> bool {
    REGISTERED_VALUE_TYPES.get().is_some()
}

/// Returns `true` iff `type_name` names a registered value type. Always `false` before `initialize`.
pub fn is_registered(type_name: &str) -> bool {
    REGISTERED_VALUE_TYPES
        .get()
        .map(|types| types.iter().any(|t| *t == type_name))
        .unwrap_or(false)
}

// ████████╗███████╗███████╗████████╗
// ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝
//    ██║   █████╗  ███████╗   ██║
//    ██║   ██╔══╝  ╚════██║   ██║
//    ██║   ███████╗███████║   ██║
//    ╚═╝   ╚══════╝╚══════╝   ╚═╝
