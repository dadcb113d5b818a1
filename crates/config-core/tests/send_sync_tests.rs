//! Tests to verify that all public types are Send + Sync as required.

use plugin_config_core::*;

const fn assert_send_sync<T: Send + Sync>() {}

#[test]
fn test_domain_types_are_send_sync() {
    assert_send_sync::<ClassName>();
    assert_send_sync::<PluginFamily>();
    assert_send_sync::<FieldPath>();
    assert_send_sync::<FieldViolation>();
}

#[test]
fn test_descriptor_types_are_send_sync() {
    assert_send_sync::<Descriptor>();
    assert_send_sync::<ConfigField>();
    assert_send_sync::<DescriptorIssue>();
}

#[test]
fn test_config_types_are_send_sync() {
    assert_send_sync::<EngineConfig>();
}

#[test]
fn test_error_is_send_sync() {
    assert_send_sync::<Error>();
    assert_send_sync::<UnknownClassError>();
}
