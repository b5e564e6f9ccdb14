/// This macro is a wrapper around `tracing::trace!` that records a serialized value next to the
/// message, so the TypeFields produced at each step of an extraction can be inspected from the
/// logs.
///
/// There are two ways of creating a snapshot. The easiest is by passing the macro an identifier
/// for the value you'd like to take a snapshot of. This will tag the snapshot type with the type
/// name of the value, serialize it to a JSON string using serde_json, and add the message
/// literal that you pass in. EX:
/// ```ignore
/// snapshot!(root_nodes, "collected root nodes");
/// // Generates:
/// // trace!(snapshot = "alloc::vec::Vec<TypeField>", data = "[ .. ]", "collected root nodes");
/// ```
/// If you do not want to serialize the data, you can pass the name tag for the snapshot and data
/// in directly. Note that the data needs to implement the tracing crate's `Value` trait. EX:
/// ```ignore
/// snapshot!("TypeField", type_field.to_string(), "registered child field");
/// ```
/// Nothing is emitted unless the `snapshot_tracing` feature is enabled.
macro_rules! snapshot {
    ($value:expr, $msg:literal) => {
        #[cfg(feature = "snapshot_tracing")]
        tracing::trace!(
            snapshot = std::any::type_name_of_val(&$value),
            data = serde_json::to_string(&$value)
                .unwrap_or_else(|error| format!("<unserializable: {error}>")),
            $msg
        );
    };
    ($name:literal, $value:expr, $msg:literal) => {
        #[cfg(feature = "snapshot_tracing")]
        tracing::trace!(snapshot = $name, data = $value, $msg);
    };
}

pub(crate) use snapshot;
