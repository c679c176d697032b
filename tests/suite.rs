// Integration suite for the accessor catalog: enumeration rules, ordering,
// caching, cycle handling, and reads/writes through flattened descriptors.
mod support;

use anyhow::Result;
use fastprop::{
    self, CatalogConfig, CyclePolicy, Error, PrimitiveKind, PropertyCatalog, PropertyValue,
    TypeHandle, make_setter, make_setter_of,
};
use serde_json::json;
use std::sync::Arc;
use std::thread;
use std::time::{Duration, SystemTime};
use support::{
    Address, Alpha, Contact, Customer, Employee, Gadget, Order, address, customer, gadget, names,
};

#[test]
fn flat_type_lists_properties_in_declaration_order() -> Result<()> {
    let catalog = PropertyCatalog::default();
    let accessors = catalog.accessors_of::<Contact>()?;
    assert_eq!(names(&accessors), ["Name", "Age"]);

    let contact = Contact {
        name: "Ada".into(),
        age: 36,
    };
    assert_eq!(accessors[0].get_value(&contact)?, PropertyValue::from("Ada"));
    assert_eq!(accessors[1].get_value(&contact)?, PropertyValue::Int(36));
    assert_eq!(accessors[1].codec().kind(), PrimitiveKind::Int);
    Ok(())
}

#[test]
fn repeated_calls_are_deterministic() -> Result<()> {
    let catalog = PropertyCatalog::default();
    let first = catalog.accessors_of::<Order>()?;
    let second = catalog.accessors_of::<Order>()?;
    assert!(Arc::ptr_eq(&first, &second));

    let fresh = PropertyCatalog::default().accessors_of::<Order>()?;
    assert_eq!(names(&first), names(&fresh));
    Ok(())
}

#[test]
fn nested_composites_flatten_to_dotted_leaves() -> Result<()> {
    let catalog = PropertyCatalog::default();
    let accessors = catalog.accessors_of::<Customer>()?;
    assert_eq!(
        names(&accessors),
        [
            "Name",
            "Id",
            "Address.City",
            "Address.Street",
            "Address.Zip",
            "Billing.City",
            "Billing.Street",
            "Billing.Zip",
        ]
    );
    assert!(accessors.iter().all(|d| d.name() != "Address"));

    let city = catalog.find(TypeHandle::of::<Customer>(), "Address.City")?;
    assert_eq!(city.depth(), 2);
    assert_eq!(city.property().declaring_type(), "Address");
    assert_eq!(city.root_type(), "Customer");
    assert_eq!(
        city.get_value(&customer("Grace", "Arlington"))?,
        PropertyValue::from("Arlington")
    );
    Ok(())
}

#[test]
fn nullable_roots_match_their_underlying_type() -> Result<()> {
    let catalog = PropertyCatalog::default();
    let plain = catalog.accessors_of::<i32>()?;
    let nullable = catalog.accessors_of::<Option<i32>>()?;
    assert!(plain.is_empty());
    assert_eq!(names(&plain), names(&nullable));

    let contact = catalog.accessors_of::<Contact>()?;
    let optional = catalog.accessors_of::<Option<Contact>>()?;
    assert!(Arc::ptr_eq(&contact, &optional));
    assert_eq!(optional[0].root_type(), "Contact");
    Ok(())
}

#[test]
fn empty_nullables_read_as_null() -> Result<()> {
    let catalog = PropertyCatalog::default();
    let mut subject = customer("Linus", "Helsinki");
    let zip = catalog.find(TypeHandle::of::<Customer>(), "Address.Zip")?;
    let billing_city = catalog.find(TypeHandle::of::<Customer>(), "Billing.City")?;

    assert_eq!(zip.get_value(&subject)?, PropertyValue::Null);
    assert_eq!(billing_city.get_value(&subject)?, PropertyValue::Null);

    subject.address.zip = Some(90210);
    subject.billing = Some(address("Espoo"));
    assert_eq!(zip.get_value(&subject)?, PropertyValue::UInt(90210));
    assert_eq!(billing_city.get_value(&subject)?, PropertyValue::from("Espoo"));
    Ok(())
}

#[test]
fn boxed_and_time_leaves_are_read_through() -> Result<()> {
    let catalog = PropertyCatalog::default();
    let placed_at = SystemTime::UNIX_EPOCH + Duration::from_secs(1_700_000_000);
    let order = Order {
        placed_at,
        ttl: Duration::from_secs(90),
        total: 12.5,
        customer: Box::new(customer("Barbara", "Boston")),
    };
    let accessors = catalog.accessors_of::<Order>()?;
    assert_eq!(
        names(&accessors)[..5],
        ["PlacedAt", "Ttl", "Total", "Customer.Name", "Customer.Id"]
    );
    assert_eq!(accessors[0].get_value(&order)?, PropertyValue::Timestamp(placed_at));
    assert_eq!(
        accessors[1].get_value(&order)?,
        PropertyValue::Duration(Duration::from_secs(90))
    );
    let city = catalog.find(TypeHandle::of::<Order>(), "Customer.Address.City")?;
    assert_eq!(city.get_value(&order)?, PropertyValue::from("Boston"));
    Ok(())
}

#[test]
fn filters_skip_private_static_indexed_and_write_only_members() -> Result<()> {
    let catalog = PropertyCatalog::default();
    let accessors = catalog.accessors_of::<Gadget>()?;
    assert_eq!(names(&accessors), ["Serial"]);
    assert_eq!(accessors[0].get_value(&gadget())?, PropertyValue::from("G-1"));

    // Write-only members are invisible to the catalog but still settable.
    let shape = TypeHandle::of::<Gadget>().shape();
    let pin = shape.property("Pin").expect("Pin registered");
    assert!(!pin.is_readable());
    let setter = make_setter(pin)?;
    let mut target = gadget();
    setter.set(&mut target, PropertyValue::UInt(4321))?;
    assert_eq!(target.pin, 4321);
    Ok(())
}

#[test]
fn wrong_instance_type_is_a_type_mismatch() -> Result<()> {
    let catalog = PropertyCatalog::default();
    let name = catalog.find(TypeHandle::of::<Contact>(), "Name")?;
    let err = name.get_value(&address("Rome")).unwrap_err();
    assert_eq!(err, Error::TypeMismatch { expected: "Contact" });
    assert_eq!(err.to_string(), "instance is not a Contact");

    let err = fastprop::get_value(&name, &"Contact").unwrap_err();
    assert!(matches!(err, Error::TypeMismatch { .. }));
    Ok(())
}

#[test]
fn cyclic_graphs_fail_fast_by_default() {
    let catalog = PropertyCatalog::default();
    let err = catalog.accessors_of::<Alpha>().unwrap_err();
    assert_eq!(
        err,
        Error::CyclicTypeGraph {
            path: "Beta.Alpha".to_string(),
            type_name: "Alpha",
        }
    );
    assert!(!catalog.is_cached(TypeHandle::of::<Alpha>()));

    let err = catalog.accessors_of::<Employee>().unwrap_err();
    assert!(matches!(err, Error::CyclicTypeGraph { ref path, .. } if path == "Manager"));
}

#[test]
fn cyclic_graphs_can_be_expanded_with_the_cycle_cut() -> Result<()> {
    let catalog = PropertyCatalog::new(CatalogConfig::default().with_cycle_policy(CyclePolicy::Skip));
    assert_eq!(names(&catalog.accessors_of::<Alpha>()?), ["Id", "Beta.Label"]);
    assert_eq!(names(&catalog.accessors_of::<Employee>()?), ["Name"]);

    let boss = Employee {
        name: "Ada".into(),
        manager: None,
    };
    let report = Employee {
        name: "Charles".into(),
        manager: Some(Box::new(boss)),
    };
    let name = catalog.find(TypeHandle::of::<Employee>(), "Name")?;
    assert_eq!(name.get_value(&report)?, PropertyValue::from("Charles"));
    assert_eq!(
        report.manager.as_ref().map(|m| m.name.as_str()),
        Some("Ada")
    );
    Ok(())
}

#[test]
fn set_value_writes_nested_leaves() -> Result<()> {
    let catalog = PropertyCatalog::default();
    let mut subject = customer("Edsger", "Nuenen");

    let city = catalog.find(TypeHandle::of::<Customer>(), "Address.City")?;
    city.set_value(&mut subject, PropertyValue::from("Austin"))?;
    assert_eq!(subject.address.city, "Austin");

    let zip = catalog.find(TypeHandle::of::<Customer>(), "Address.Zip")?;
    zip.set_value(&mut subject, PropertyValue::Int(78701))?;
    assert_eq!(subject.address.zip, Some(78701));
    zip.set_value(&mut subject, PropertyValue::Null)?;
    assert_eq!(subject.address.zip, None);
    Ok(())
}

#[test]
fn set_value_reports_each_failure_mode() -> Result<()> {
    let catalog = PropertyCatalog::default();
    let mut subject = customer("Barbara", "Boston");

    let id = catalog.find(TypeHandle::of::<Customer>(), "Id")?;
    assert!(!id.is_settable());
    let err = id.set_value(&mut subject, PropertyValue::UInt(1)).unwrap_err();
    assert!(matches!(err, Error::MissingSetter { .. }));
    assert_eq!(subject.id, 42);

    let billing = catalog.find(TypeHandle::of::<Customer>(), "Billing.City")?;
    let err = billing
        .set_value(&mut subject, PropertyValue::from("Cambridge"))
        .unwrap_err();
    assert_eq!(
        err,
        Error::EmptyIntermediate {
            path: "Billing.City".to_string(),
            empty: "Billing".to_string(),
        }
    );

    let name = catalog.find(TypeHandle::of::<Customer>(), "Name")?;
    let err = name
        .set_value(&mut subject, PropertyValue::Bool(true))
        .unwrap_err();
    assert!(matches!(err, Error::Value { .. }));
    assert_eq!(subject.name, "Barbara");
    Ok(())
}

#[test]
fn make_setter_is_independent_of_the_catalog() -> Result<()> {
    let setter = make_setter_of::<Contact>("Age")?;
    let mut contact = Contact {
        name: "Alan".into(),
        age: 41,
    };
    setter.set(&mut contact, PropertyValue::Int(42))?;
    assert_eq!(contact.age, 42);
    assert_eq!(setter.property().name(), "Age");

    let err = make_setter_of::<Contact>("Nickname").unwrap_err();
    assert!(matches!(err, Error::UnknownAccessor { .. }));
    Ok(())
}

#[test]
fn concurrent_first_builds_converge_on_one_entry() {
    let catalog = PropertyCatalog::default();
    let results: Vec<_> = thread::scope(|scope| {
        let handles: Vec<_> = (0..8)
            .map(|_| scope.spawn(|| catalog.accessors_of::<Order>().expect("build")))
            .collect();
        handles
            .into_iter()
            .map(|handle| handle.join().expect("thread panicked"))
            .collect()
    });
    let stored = catalog.accessors_of::<Order>().expect("cached");
    for result in &results {
        assert!(Arc::ptr_eq(result, &stored));
    }
}

#[test]
fn concurrent_reads_on_distinct_instances() {
    let catalog = PropertyCatalog::default();
    thread::scope(|scope| {
        for worker in 0..8 {
            let catalog = &catalog;
            scope.spawn(move || {
                let name = format!("worker-{worker}");
                let subject = customer(&name, "Zurich");
                for _ in 0..200 {
                    let accessors = catalog.accessors_of::<Customer>().expect("accessors");
                    assert_eq!(
                        accessors[0].get_value(&subject).expect("read"),
                        PropertyValue::Str(name.clone())
                    );
                }
            });
        }
    });
    assert_eq!(catalog.cached_types(), 1);
}

#[test]
fn global_catalog_serves_the_free_functions() -> Result<()> {
    let via_type = fastprop::accessors_of::<Address>()?;
    let via_handle = fastprop::get_accessors(TypeHandle::of::<Address>())?;
    assert!(Arc::ptr_eq(&via_type, &via_handle));
    assert!(PropertyCatalog::global().is_cached(TypeHandle::of::<Address>()));
    Ok(())
}

#[test]
fn json_snapshot_of_a_nested_object() -> Result<()> {
    let catalog = PropertyCatalog::default();
    let subject = customer("Grace", "Arlington");
    let value = fastprop::to_json(&catalog, &subject)?;
    assert_eq!(
        value,
        json!({
            "Name": "Grace",
            "Id": 42,
            "Address.City": "Arlington",
            "Address.Street": "Main St",
            "Address.Zip": null,
            "Billing.City": null,
            "Billing.Street": null,
            "Billing.Zip": null,
        })
    );

    let mut moved = customer("Grace", "Arlington");
    moved.address.city = "Baltimore".into();
    let changes = fastprop::diff(&catalog, &subject, &moved)?;
    assert_eq!(changes.len(), 1);
    assert_eq!(changes[0].name, "Address.City");
    Ok(())
}
