//! Integration tests for per-plugin metadata distribution.

use serde_json::json;

use crate::helpers::{self, Fault, Spy};

#[test]
fn test_metadata_before_registration_is_delivered() {
    let framework = helpers::isolated();
    assert!(framework.set_plugin_metadata(json!({ "Foo": { "x": 1 } })));

    let foo = Spy::named("Foo");
    framework.register_plugin(&foo.factory()).expect("registered");

    assert_eq!(helpers::metadata(&foo.log()), vec![Some(json!({ "x": 1 }))]);
}

#[test]
fn test_metadata_after_registration_is_delivered() {
    let framework = helpers::isolated();
    let bar = Spy::named("Bar");
    framework.register_plugin(&bar.factory()).expect("registered");

    assert!(framework.set_plugin_metadata(json!({ "Bar": { "y": 2 } })));

    assert_eq!(helpers::metadata(&bar.log()), vec![Some(json!({ "y": 2 }))]);
}

#[test]
fn test_plugins_without_a_slice_receive_none() {
    let framework = helpers::isolated();
    let foo = Spy::named("Foo");
    let baz = Spy::named("Baz");
    framework.register_plugin(&foo.factory()).expect("foo");
    let baz_id = framework.register_plugin(&baz.factory()).expect("baz");
    framework.make_plugin_inactive(&baz_id);

    framework.set_plugin_metadata(json!({ "Foo": { "x": 1 } }));

    assert_eq!(helpers::metadata(&foo.log()), vec![Some(json!({ "x": 1 }))]);
    // Inactive plugins still get their slice.
    assert_eq!(helpers::metadata(&baz.log()), vec![None]);
}

#[test]
fn test_overwrite_replaces_slices() {
    let framework = helpers::isolated();
    let foo = Spy::named("Foo");
    framework.register_plugin(&foo.factory()).expect("registered");

    framework.set_plugin_metadata(json!({ "Foo": { "x": 1 } }));
    framework.set_plugin_metadata(json!({ "Foo": { "x": 2 } }));

    assert_eq!(
        helpers::metadata(&foo.log()),
        vec![Some(json!({ "x": 1 })), Some(json!({ "x": 2 }))]
    );
}

#[test]
fn test_non_object_metadata_is_rejected() {
    let framework = helpers::isolated();
    let foo = Spy::named("Foo");
    framework.register_plugin(&foo.factory()).expect("registered");

    assert!(!framework.set_plugin_metadata(json!(["Foo"])));
    assert!(!framework.set_plugin_metadata(json!(null)));
    assert!(helpers::metadata(&foo.log()).is_empty());
}

#[test]
fn test_rejected_metadata_keeps_stored_map() {
    let framework = helpers::isolated();
    assert!(framework.set_plugin_metadata(json!({ "Foo": { "x": 1 } })));
    assert!(!framework.set_plugin_metadata(json!(7)));

    let foo = Spy::named("Foo");
    framework.register_plugin(&foo.factory()).expect("registered");

    assert_eq!(helpers::metadata(&foo.log()), vec![Some(json!({ "x": 1 }))]);
}

#[test]
fn test_panicking_set_metadata_does_not_stop_delivery() {
    let framework = helpers::isolated();
    let broken = Spy::named("Broken").fault(Fault::MetadataPanic);
    let foo = Spy::named("Foo");
    framework.register_plugin(&broken.factory()).expect("broken");
    framework.register_plugin(&foo.factory()).expect("foo");

    assert!(framework.set_plugin_metadata(json!({
        "Broken": { "z": 0 },
        "Foo": { "x": 1 }
    })));

    assert_eq!(helpers::metadata(&broken.log()), vec![Some(json!({ "z": 0 }))]);
    assert_eq!(helpers::metadata(&foo.log()), vec![Some(json!({ "x": 1 }))]);
    assert_eq!(framework.plugin_count(), 2);
}
