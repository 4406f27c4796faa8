//! Tests for per-consumer service accessors

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Barrier, Mutex, OnceLock};
use std::thread;

use bureau_application::{
    AccessorSet, Factory, FactoryRegistry, Locator, ServiceCache, Services, SlotState,
};
use bureau_domain::{Error, ServiceArgs, ServiceInstance, service_args};

struct TestObj {
    services: ServiceCache,
}

impl TestObj {
    fn new(set: &AccessorSet) -> Self {
        Self {
            services: ServiceCache::new(set),
        }
    }
}

impl Services for TestObj {
    fn service_cache(&self) -> &ServiceCache {
        &self.services
    }
}

fn registry_with(key: &str, factory: Factory) -> Arc<FactoryRegistry> {
    let registry = Arc::new(FactoryRegistry::new());
    registry
        .configure(|cfg| {
            cfg.register(key, factory);
            Ok(())
        })
        .unwrap();
    registry
}

fn counting_greeter(calls: &Arc<AtomicUsize>) -> Factory {
    let calls = Arc::clone(calls);
    Factory::try_from_fn(move |args: &ServiceArgs| {
        calls.fetch_add(1, Ordering::SeqCst);
        args.arg::<&str>(0).map(|name| format!("hi {name}"))
    })
}

#[test]
fn test_provides_access_to_a_service_instance() {
    let a_service = ServiceInstance::new("some service");
    let set = AccessorSet::compose_with(Locator::with_registry(registry_with(
        "my_service",
        Factory::shared(a_service.clone()),
    )));
    let test_obj = TestObj::new(&set);

    let found = test_obj.service("my_service", &service_args![42]).unwrap();
    assert!(found.ptr_eq(&a_service));
}

#[test]
fn test_injected_service_replaces_factory() {
    let calls = Arc::new(AtomicUsize::new(0));
    let set = AccessorSet::compose_with(Locator::with_registry(registry_with(
        "my_service",
        counting_greeter(&calls),
    )));
    let test_obj = TestObj::new(&set);

    let injected = ServiceInstance::new("injected");
    test_obj.inject_service("my_service", injected.clone()).unwrap();

    let found = test_obj.service("my_service", &service_args![42]).unwrap();
    assert!(found.ptr_eq(&injected));
    assert_eq!(calls.load(Ordering::SeqCst), 0, "factory must not run after injection");
}

#[test]
fn test_first_call_wins() {
    let calls = Arc::new(AtomicUsize::new(0));
    let set = AccessorSet::compose_with(Locator::with_registry(registry_with(
        "greeter",
        counting_greeter(&calls),
    )));
    let consumer = TestObj::new(&set);

    let first = consumer.service_as::<String>("greeter", &service_args!["Ann"]).unwrap();
    let second = consumer.service_as::<String>("greeter", &service_args!["Bob"]).unwrap();

    assert_eq!(*first, "hi Ann");
    assert_eq!(*second, "hi Ann", "later arguments are ignored once cached");
    assert!(Arc::ptr_eq(&first, &second));
    assert_eq!(calls.load(Ordering::SeqCst), 1);
}

#[test]
fn test_setter_overrides_after_resolution() {
    let calls = Arc::new(AtomicUsize::new(0));
    let set = AccessorSet::compose_with(Locator::with_registry(registry_with(
        "greeter",
        counting_greeter(&calls),
    )));
    let consumer = TestObj::new(&set);
    let accessor = consumer.service_cache().accessor("greeter").unwrap();

    accessor.get(&service_args!["Ann"]).unwrap();
    accessor.set(ServiceInstance::new(String::from("stub")));

    assert_eq!(*accessor.get_as::<String>(&service_args!["Bob"]).unwrap(), "stub");
    assert_eq!(accessor.state(), SlotState::Cached);
    assert_eq!(calls.load(Ordering::SeqCst), 1);
}

#[test]
fn test_failed_resolution_stays_uncached() {
    let calls = Arc::new(AtomicUsize::new(0));
    let set = AccessorSet::compose_with(Locator::with_registry(registry_with(
        "greeter",
        counting_greeter(&calls),
    )));
    let consumer = TestObj::new(&set);

    let err = consumer.service("greeter", &ServiceArgs::new()).unwrap_err();
    assert!(matches!(err, Error::InvalidArgument { .. }));
    assert_eq!(consumer.service_cache().state("greeter"), Some(SlotState::Uncached));

    let greeting = consumer.service_as::<String>("greeter", &service_args!["Cy"]).unwrap();
    assert_eq!(*greeting, "hi Cy");
    assert_eq!(calls.load(Ordering::SeqCst), 2, "a failed attempt is retried");
}

#[test]
fn test_independent_instances_cache_independently() {
    let counter = Arc::new(AtomicUsize::new(0));
    let next = Arc::clone(&counter);
    let set = AccessorSet::compose_with(Locator::with_registry(registry_with(
        "counter",
        Factory::from_fn(move |_| next.fetch_add(1, Ordering::SeqCst)),
    )));

    let first = TestObj::new(&set);
    let second = TestObj::new(&set);

    let a = first.service_as::<usize>("counter", &ServiceArgs::new()).unwrap();
    let b = second.service_as::<usize>("counter", &ServiceArgs::new()).unwrap();
    let a_again = first.service_as::<usize>("counter", &ServiceArgs::new()).unwrap();

    assert_ne!(*a, *b);
    assert_eq!(*a, *a_again);
    assert_eq!(counter.load(Ordering::SeqCst), 2, "one invocation per instance");
}

#[test]
fn test_keys_are_snapshotted_at_composition() {
    let registry = registry_with("early", Factory::from_fn(|_| 1_u8));
    let set = AccessorSet::compose_with(Locator::with_registry(Arc::clone(&registry)));

    registry
        .configure(|cfg| {
            cfg.register("late", Factory::from_fn(|_| 2_u8));
            Ok(())
        })
        .unwrap();

    let consumer = TestObj::new(&set);
    assert!(set.contains("early"));
    assert!(!set.contains("late"));
    assert!(matches!(
        consumer.service("late", &ServiceArgs::new()),
        Err(Error::UndefinedAccessor { .. })
    ));
}

#[test]
fn test_clear_only_affects_uncached_accessors() {
    let registry = Arc::new(FactoryRegistry::new());
    registry
        .configure(|cfg| {
            cfg.register("cached", Factory::from_fn(|_| 1_u8));
            cfg.register("pending", Factory::from_fn(|_| 2_u8));
            Ok(())
        })
        .unwrap();
    let set = AccessorSet::compose_with(Locator::with_registry(Arc::clone(&registry)));
    let consumer = TestObj::new(&set);

    consumer.service("cached", &ServiceArgs::new()).unwrap();
    registry.clear();

    assert_eq!(*consumer.service_as::<u8>("cached", &ServiceArgs::new()).unwrap(), 1);
    assert!(
        consumer
            .service("pending", &ServiceArgs::new())
            .unwrap_err()
            .is_unknown_service()
    );
}

#[test]
fn test_uncallable_factory_through_accessor() {
    let set = AccessorSet::compose_with(Locator::with_registry(registry_with(
        "bones_mccoy",
        Factory::value("not a callable"),
    )));
    let consumer = TestObj::new(&set);

    let err = consumer.service("bones_mccoy", &ServiceArgs::new()).unwrap_err();
    assert!(err.is_uncallable_factory());
    assert_eq!(consumer.service_cache().state("bones_mccoy"), Some(SlotState::Uncached));
}

#[test]
fn test_concurrent_first_reads_resolve_once() {
    let calls = Arc::new(AtomicUsize::new(0));
    let counted = Arc::clone(&calls);
    let set = AccessorSet::compose_with(Locator::with_registry(registry_with(
        "slow",
        Factory::from_fn(move |_| {
            counted.fetch_add(1, Ordering::SeqCst);
            thread::sleep(std::time::Duration::from_millis(20));
            "done"
        }),
    )));
    let consumer = Arc::new(TestObj::new(&set));
    let barrier = Arc::new(Barrier::new(4));

    let handles: Vec<_> = (0..4)
        .map(|_| {
            let consumer = Arc::clone(&consumer);
            let barrier = Arc::clone(&barrier);
            thread::spawn(move || {
                barrier.wait();
                consumer.service("slow", &ServiceArgs::new()).unwrap()
            })
        })
        .collect();

    let results: Vec<ServiceInstance> = handles.into_iter().map(|h| h.join().unwrap()).collect();
    assert!(results.windows(2).all(|pair| pair[0].ptr_eq(&pair[1])));
    assert_eq!(calls.load(Ordering::SeqCst), 1);
}

#[test]
fn test_factory_sees_its_own_slot_resolving() {
    let consumer: Arc<OnceLock<TestObj>> = Arc::new(OnceLock::new());
    let observed: Arc<Mutex<Option<SlotState>>> = Arc::new(Mutex::new(None));

    let factory = {
        let consumer = Arc::clone(&consumer);
        let observed = Arc::clone(&observed);
        Factory::from_fn(move |_| {
            let state = consumer.get().and_then(|c| c.service_cache().state("report"));
            *observed.lock().unwrap() = state;
            "quarterly"
        })
    };
    let set = AccessorSet::compose_with(Locator::with_registry(registry_with("report", factory)));
    let consumer = consumer.get_or_init(|| TestObj::new(&set));

    consumer.service("report", &ServiceArgs::new()).unwrap();

    assert_eq!(*observed.lock().unwrap(), Some(SlotState::Resolving));
    assert_eq!(consumer.service_cache().state("report"), Some(SlotState::Cached));
}

#[test]
fn test_cached_slot_is_never_reported_resolving() {
    let set = AccessorSet::compose_with(Locator::with_registry(registry_with(
        "clock",
        Factory::from_fn(|_| 1_700_000_000_u64),
    )));
    let consumer = Arc::new(TestObj::new(&set));
    consumer.service("clock", &ServiceArgs::new()).unwrap();

    let readers: Vec<_> = (0..4)
        .map(|_| {
            let consumer = Arc::clone(&consumer);
            thread::spawn(move || {
                for _ in 0..500 {
                    consumer.service("clock", &ServiceArgs::new()).unwrap();
                }
            })
        })
        .collect();

    for _ in 0..2_000 {
        assert_eq!(consumer.service_cache().state("clock"), Some(SlotState::Cached));
    }
    for reader in readers {
        reader.join().unwrap();
    }
}
