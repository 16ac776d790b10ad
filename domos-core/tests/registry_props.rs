//! Registry invariants under arbitrary create/delete sequences

mod common;

use std::collections::HashSet;

use common::RamStore;
use domos_core::{ProvisioningRequest, Registry, RegistryError};
use domos_protocol::PeripheralName;
use proptest::prelude::*;

#[derive(Debug, Clone)]
enum Op {
    Create {
        name: Option<String>,
        number: Option<u8>,
    },
    Delete(String),
}

fn op() -> impl Strategy<Value = Op> {
    let name = prop_oneof!["[a-c]", "[1-9]"];
    prop_oneof![
        3 => (prop::option::of(name.clone()), prop::option::of(0u8..10))
            .prop_map(|(name, number)| Op::Create { name, number }),
        1 => name.prop_map(Op::Delete),
    ]
}

fn check_invariants(registry: &mut Registry<RamStore>) {
    let capacity = registry.capacity();
    assert!(registry.count() <= capacity);

    let mut names = HashSet::new();
    let mut numbers = HashSet::new();
    let listed = match registry.list() {
        Ok(records) => records.map(|r| r.unwrap()).collect::<Vec<_>>(),
        Err(RegistryError::Empty) => Vec::new(),
        Err(e) => panic!("list failed: {:?}", e),
    };
    assert_eq!(listed.len(), registry.count() as usize);

    for record in listed {
        assert!(record.number >= 1 && record.number <= capacity);
        assert!(!record.name.is_empty());
        assert!(names.insert(record.name.clone()), "duplicate name");
        assert!(numbers.insert(record.number), "duplicate number");
    }
}

proptest! {
    #[test]
    fn names_and_numbers_stay_unique(pins in 1u8..=4, ops in prop::collection::vec(op(), 1..60)) {
        let pin_list: Vec<u8> = (10..10 + pins).collect();
        let (mut registry, _) =
            Registry::open(RamStore::new(1024), &ProvisioningRequest::new(&pin_list)).unwrap();

        for op in ops {
            let before = registry.count();
            match op {
                Op::Create { name, number } => {
                    let name = name.map(|n| PeripheralName::try_from(n.as_str()).unwrap());
                    match registry.create(name, number) {
                        Ok(_) => prop_assert_eq!(registry.count(), before + 1),
                        Err(_) => prop_assert_eq!(registry.count(), before),
                    }
                }
                Op::Delete(name) => match registry.delete(&name) {
                    Ok(_) => prop_assert_eq!(registry.count(), before - 1),
                    Err(e) => {
                        prop_assert_eq!(e, RegistryError::NotFound);
                        prop_assert_eq!(registry.count(), before);
                    }
                },
            }
            check_invariants(&mut registry);
        }
    }

    #[test]
    fn fills_exactly_to_capacity(pins in 1u8..=5) {
        let pin_list: Vec<u8> = (10..10 + pins).collect();
        let (mut registry, _) =
            Registry::open(RamStore::new(1024), &ProvisioningRequest::new(&pin_list)).unwrap();
        let capacity = (1u16 << pins) - 1;

        for _ in 0..capacity {
            prop_assert!(registry.create(None, None).is_ok());
        }
        prop_assert_eq!(registry.create(None, None), Err(RegistryError::Full));
        check_invariants(&mut registry);
    }

    #[test]
    fn reopen_sees_the_same_records(count in 0u8..7) {
        let (mut registry, _) =
            Registry::open(RamStore::new(512), &ProvisioningRequest::new(&[2, 3, 4])).unwrap();
        for _ in 0..count {
            registry.create(None, None).unwrap();
        }
        let store = registry.into_layout().into_inner();

        let (mut reopened, _) =
            Registry::open(store, &ProvisioningRequest::new(&[2, 3, 4])).unwrap();
        prop_assert_eq!(reopened.count(), count);
        check_invariants(&mut reopened);
    }
}
