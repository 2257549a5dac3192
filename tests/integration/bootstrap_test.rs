//! Integration tests for reconciling engines with globally registered
//! plugin factories.

use std::sync::Arc;

use serde_json::json;

use playtrack_core::events::taxonomy;
use playtrack_plugin::{BootstrapRegistry, Framework, register_plugin_factory};

use crate::helpers::{self, Call, Spy};

#[test]
fn test_factory_registered_before_engines_reaches_both() {
    let bootstrap = Arc::new(BootstrapRegistry::new());
    let spy = Spy::named("Foo");
    assert_eq!(bootstrap.register_plugin_factory(spy.factory()), 0);

    let first = helpers::framework_in(&bootstrap);
    let second = helpers::framework_in(&bootstrap);

    assert_eq!(first.plugin_id_list(), vec!["0_Foo_1.0"]);
    assert_eq!(second.plugin_id_list(), vec!["0_Foo_1.0"]);
    assert_ne!(first.id(), second.id());
    assert_eq!(helpers::count(&spy.log(), &Call::Init), 2);

    // Each engine owns its own instance.
    first.publish_event(taxonomy::VIDEO_PLAYING, json!([]));
    assert_eq!(helpers::events(&spy.log()), vec![taxonomy::VIDEO_PLAYING]);
    assert!(second.recorded_events().is_empty());
}

#[test]
fn test_factory_registered_after_engines_reaches_both() {
    let bootstrap = Arc::new(BootstrapRegistry::new());
    let first = helpers::framework_in(&bootstrap);
    let second = helpers::framework_in(&bootstrap);
    let spy = Spy::named("Foo");

    assert_eq!(bootstrap.register_plugin_factory(spy.factory()), 2);
    assert_eq!(first.plugin_count(), 1);
    assert_eq!(second.plugin_count(), 1);
    assert_eq!(bootstrap.factory_count(), 1);
}

#[test]
fn test_destroyed_engine_leaves_others_untouched() {
    let bootstrap = Arc::new(BootstrapRegistry::new());
    let foo = Spy::named("Foo");
    bootstrap.register_plugin_factory(foo.factory());

    let doomed = helpers::framework_in(&bootstrap);
    let survivor = helpers::framework_in(&bootstrap);
    assert_eq!(bootstrap.instance_count(), 2);

    doomed.destroy();
    assert_eq!(bootstrap.instance_count(), 1);
    assert_eq!(bootstrap.factory_count(), 1);
    assert_eq!(helpers::count(&foo.log(), &Call::Destroy), 1);

    let bar = Spy::named("Bar");
    assert_eq!(bootstrap.register_plugin_factory(bar.factory()), 1);
    assert!(doomed.plugin_id_list().is_empty());
    assert_eq!(survivor.plugin_id_list(), vec!["0_Foo_1.0", "1_Bar_1.0"]);
    assert_eq!(helpers::count(&bar.log(), &Call::Init), 1);

    // Engines created later still receive both factories.
    let late = helpers::framework_in(&bootstrap);
    assert_eq!(late.plugin_count(), 2);
}

#[test]
fn test_dropping_engine_unregisters_it() {
    let bootstrap = Arc::new(BootstrapRegistry::new());
    {
        let _scoped = helpers::framework_in(&bootstrap);
        assert_eq!(bootstrap.instance_count(), 1);
    }
    assert_eq!(bootstrap.instance_count(), 0);
    assert_eq!(bootstrap.register_plugin_factory(Spy::named("Foo").factory()), 0);
}

#[test]
fn test_process_wide_registry() {
    let global = BootstrapRegistry::global();
    global.reset();

    let spy = Spy::named("Global");
    assert_eq!(register_plugin_factory(spy.factory()), 0);

    let framework = Framework::new(Default::default());
    assert_eq!(framework.plugin_id_list(), vec!["0_Global_1.0"]);
    assert_eq!(global.instance_count(), 1);

    framework.destroy();
    assert_eq!(global.instance_count(), 0);
    global.reset();
    assert_eq!(global.factory_count(), 0);
}
