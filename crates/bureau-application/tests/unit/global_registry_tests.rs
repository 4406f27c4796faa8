//! Tests against the process-wide registry and the shared locator
//!
//! The global registry is shared by every test in this binary, so these
//! tests serialise on `GLOBAL` and use keys no other test registers.

use std::sync::{Mutex, MutexGuard, PoisonError};

use bureau_application::registry::{self, Factory, FactoryRegistry};
use bureau_application::resolver::{Locator, get_service};
use bureau_domain::{ServiceArgs, service_args};

static GLOBAL: Mutex<()> = Mutex::new(());

fn global_lock() -> MutexGuard<'static, ()> {
    GLOBAL.lock().unwrap_or_else(PoisonError::into_inner)
}

fn configure_global() {
    registry::clear();
    registry::configure(|cfg| {
        cfg.register("bones_mccoy", Factory::value("Dammit, Jim!"));
        cfg.register("some_service", Factory::constant(String::from("some service")));
        cfg.register(
            "other_service",
            Factory::try_from_fn(|args: &ServiceArgs| args.arg::<&str>(0).map(|s| s.len())),
        );
        Ok(())
    })
    .expect("global configuration should succeed");
}

#[test]
fn test_shared_get_service() {
    let _guard = global_lock();
    configure_global();

    let found = get_service("some_service", &ServiceArgs::new()).unwrap();
    let again = get_service("some_service", &ServiceArgs::new()).unwrap();
    assert!(found.ptr_eq(&again), "constant factory hands out one instance");

    let len = get_service("other_service", &service_args!["foo"]).unwrap();
    assert_eq!(len.downcast_ref::<usize>(), Some(&3));
}

#[test]
fn test_shared_get_service_failures() {
    let _guard = global_lock();
    configure_global();

    assert!(
        get_service("no_such_svc", &ServiceArgs::new())
            .unwrap_err()
            .is_unknown_service()
    );
    assert!(
        get_service("bones_mccoy", &ServiceArgs::new())
            .unwrap_err()
            .is_uncallable_factory()
    );
}

#[test]
fn test_global_clear() {
    let _guard = global_lock();
    configure_global();
    assert!(!registry::factories().is_empty());

    registry::clear();
    assert!(registry::factories().is_empty());
    assert!(FactoryRegistry::global().is_empty());
    assert!(
        Locator::new()
            .resolve("some_service", &ServiceArgs::new())
            .unwrap_err()
            .is_unknown_service()
    );
}
