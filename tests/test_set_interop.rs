//! Set accessors against the mock engine

mod common;

use common::{element, int_property, int_set_property, read, MockSet};
use unreal_interop::interop::{set, ResolvedTable};
use unreal_interop::{BindingTable, InteropError, NativeSet};

#[test]
fn test_set_lifecycle() {
    common::install();
    let address = MockSet::create();
    let property = int_property();
    let (a, b, c, d) = (1, 2, 3, 4);

    set::clear(address, property).unwrap();
    assert!(set::add(address, property, element(&a)).unwrap());
    assert!(set::add(address, property, element(&b)).unwrap());
    assert!(set::add(address, property, element(&c)).unwrap());
    assert_eq!(set::length(address, property).unwrap(), 3);
    assert!(set::contains(address, property, element(&a)).unwrap());
    assert!(!set::contains(address, property, element(&d)).unwrap());

    assert!(set::remove(address, property, element(&b)).unwrap());
    assert_eq!(set::length(address, property).unwrap(), 2);
    assert!(!set::contains(address, property, element(&b)).unwrap());

    set::clear(address, property).unwrap();
    assert_eq!(set::length(address, property).unwrap(), 0);
}

#[test]
fn test_duplicate_add_and_absent_remove() {
    common::install();
    let address = MockSet::create();
    let property = int_property();
    let value = 7;

    assert!(set::add(address, property, element(&value)).unwrap());
    assert!(!set::add(address, property, element(&value)).unwrap());
    assert_eq!(set::length(address, property).unwrap(), 1);

    let absent = 8;
    assert!(!set::remove(address, property, element(&absent)).unwrap());
    assert_eq!(MockSet::items(address), vec![7]);
}

#[test]
fn test_queries_do_not_mutate() {
    common::install();
    let address = MockSet::create();
    let property = int_property();
    let value = 11;
    set::add(address, property, element(&value)).unwrap();

    for _ in 0..3 {
        assert_eq!(set::length(address, property).unwrap(), 1);
        assert!(set::contains(address, property, element(&value)).unwrap());
    }
    assert_eq!(MockSet::items(address), vec![11]);
}

#[test]
fn test_element_address_at() {
    common::install();
    let address = MockSet::create();
    let property = int_property();
    for value in [5, 6] {
        set::add(address, property, element(&value)).unwrap();
    }

    assert_eq!(read(set::element_address_at(address, property, 0).unwrap()), 5);
    assert_eq!(read(set::element_address_at(address, property, 1).unwrap()), 6);
    // Out of range is whatever the engine returns
    assert!(set::element_address_at(address, property, 2).unwrap().is_null());
}

#[test]
fn test_element_property_of() {
    common::install();
    assert_eq!(set::element_property_of(int_set_property()).unwrap(), int_property());
}

#[test]
fn test_native_set_view() {
    common::install();
    let set = NativeSet::from_property(MockSet::create(), int_set_property()).unwrap();
    assert_eq!(set.element_property(), int_property());
    assert!(set.is_empty());

    let values = [10, 20, 30];
    for value in &values {
        assert!(set.add(element(value)));
    }
    assert_eq!(set.len(), 3);
    assert!(set.contains(element(&20)));

    let elements = set.element_addresses();
    assert_eq!(elements.len(), 3);
    let seen: Vec<i32> = elements.map(read).collect();
    assert_eq!(seen, values);

    assert!(set.remove(element(&10)));
    set.clear();
    assert!(set.is_empty());
    assert_eq!(set.element_addresses().count(), 0);
}

#[test]
fn test_views_share_storage() {
    common::install();
    let address = MockSet::create();
    let first = NativeSet::new(address, int_property()).unwrap();
    let second = NativeSet::new(address, int_property()).unwrap();

    first.add(element(&42));
    assert!(second.contains(element(&42)));
    assert_eq!(second.address(), address);
}

#[test]
fn test_global_table_is_resolved_once() {
    common::install();
    set::length(MockSet::create(), int_property()).unwrap();
    assert!(set::BINDINGS.is_resolved());

    assert!(std::ptr::eq(
        set::BINDINGS.resolve().unwrap(),
        set::BINDINGS.resolve().unwrap()
    ));
}

#[test]
fn test_missing_export_fails_table() {
    let table = BindingTable::new("SetInteropUtils", set::BINDINGS.slots());
    let registry = common::registry_without(&["ClearSet"]);

    let err = table.resolve_with(&registry).unwrap_err();
    assert_eq!(err, InteropError::missing_binding("SetInteropUtils", "ClearSet"));
    assert!(err.to_string().contains("ClearSet"));

    // Failure is sticky, later complete registries are ignored
    assert_eq!(table.resolve_with(&common::registry()).unwrap_err(), err);
}

#[test]
fn test_concurrent_first_use() {
    let table = BindingTable::new("SetInteropUtils", set::BINDINGS.slots());
    let registry = common::registry();

    let tables: Vec<usize> = std::thread::scope(|scope| {
        let handles: Vec<_> = (0..8)
            .map(|_| {
                scope.spawn(|| {
                    let resolved: *const ResolvedTable = table.resolve_with(&registry).unwrap();
                    resolved as usize
                })
            })
            .collect();
        handles.into_iter().map(|h| h.join().unwrap()).collect()
    });

    assert!(tables.iter().all(|&t| t == tables[0]));
}
