//! Integration tests for plugin registration and lifecycle.

use std::collections::HashSet;

use serde_json::json;

use playtrack_core::events::taxonomy;
use playtrack_plugin::{CallbackPlugin, Capability, PluginFactory, validate_plugin};

use crate::helpers::{self, Call, Fault, Spy};

#[test]
fn test_repeated_registration_mints_unique_ids() {
    let framework = helpers::isolated();
    let foo = Spy::named("Foo");
    let bar = Spy::named("Bar");

    let ids: Vec<String> = (0..4)
        .map(|i| {
            let factory = if i % 2 == 0 { foo.factory() } else { bar.factory() };
            framework.register_plugin(&factory).expect("registered")
        })
        .collect();

    assert_eq!(ids, vec!["0_Foo_1.0", "1_Bar_1.0", "2_Foo_1.0", "3_Bar_1.0"]);
    let unique: HashSet<&String> = ids.iter().collect();
    assert_eq!(unique.len(), ids.len());
    assert_eq!(framework.plugin_id_list(), ids);
    assert_eq!(framework.plugin_name("2_Foo_1.0").as_deref(), Some("Foo"));
}

#[test]
fn test_registration_runs_init_then_assigns_id() {
    let framework = helpers::isolated();
    let spy = Spy::named("Foo");

    let id = framework.register_plugin(&spy.factory()).expect("registered");

    assert!(framework.is_plugin_active(&id));
    let log = spy.log();
    let calls = log.lock().clone();
    assert_eq!(calls, vec![Call::Init]);
}

#[test]
fn test_validation_boundary_for_every_capability() {
    for capability in playtrack_plugin::contract::REQUIRED_CAPABILITIES {
        let missing = CallbackPlugin::complete("Foo", "1").without(capability);
        assert!(!validate_plugin(&missing.build()), "{capability} missing");

        let restored = CallbackPlugin::complete("Foo", "1")
            .without(capability)
            .restore(capability);
        assert!(validate_plugin(&restored.build()), "{capability} restored");
    }
}

#[test]
fn test_incomplete_dynamic_plugin_is_never_admitted() {
    let framework = helpers::isolated();
    let factory = PluginFactory::new("scripted", |_| {
        Ok(CallbackPlugin::complete("Scripted", "0.1")
            .without(Capability::ProcessEvent)
            .build())
    });

    assert!(framework.register_plugin(&factory).is_none());
    assert_eq!(framework.plugin_count(), 0);
    assert!(framework.publish_event(taxonomy::VIDEO_PLAYING, json!([])));
}

#[test]
fn test_unregister_destroys_once_and_forgets_plugin() {
    let framework = helpers::isolated();
    let spy = Spy::named("Foo");
    let id = framework.register_plugin(&spy.factory()).expect("registered");

    assert!(framework.unregister_plugin(&id));
    assert!(!framework.unregister_plugin(&id));
    assert!(framework.plugin_id_list().is_empty());

    framework.publish_event(taxonomy::VIDEO_PLAYING, json!([]));
    assert_eq!(helpers::count(&spy.log(), &Call::Destroy), 1);
    assert!(helpers::events(&spy.log()).is_empty());
}

#[test]
fn test_destroy_tears_down_each_plugin_exactly_once() {
    let framework = helpers::isolated();
    let foo = Spy::named("Foo");
    let bar = Spy::named("Bar");
    framework.register_plugin(&foo.factory()).expect("foo");
    let bar_id = framework.register_plugin(&bar.factory()).expect("bar");
    framework.make_plugin_inactive(&bar_id);
    framework.publish_event(taxonomy::VIDEO_PLAYING, json!([]));

    framework.destroy();
    framework.destroy();
    drop(framework);

    assert_eq!(helpers::count(&foo.log(), &Call::Destroy), 1);
    assert_eq!(helpers::count(&bar.log(), &Call::Destroy), 1);
}

#[test]
fn test_failing_init_does_not_block_registration() {
    for fault in [Fault::InitError, Fault::InitPanic] {
        let framework = helpers::isolated();
        let spy = Spy::named("Foo").fault(fault);

        let id = framework.register_plugin(&spy.factory()).expect("registered");

        assert_eq!(id, "0_Foo_1.0");
        assert!(framework.is_plugin_active(&id));
        assert_eq!(helpers::count(&spy.log(), &Call::Init), 1);

        framework.publish_event(taxonomy::VIDEO_PLAYING, json!([]));
        assert_eq!(helpers::events(&spy.log()), vec![taxonomy::VIDEO_PLAYING]);
    }
}
