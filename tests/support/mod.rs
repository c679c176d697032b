#![allow(dead_code)]

// Fixture types shared by the integration suite.

use fastprop::reflect::{PropertyBuilder, Reflect, TypeShape};
use fastprop::reflect_struct;
use std::time::{Duration, SystemTime};

pub struct Contact {
    pub name: String,
    pub age: i32,
}

reflect_struct! {
    Contact {
        name as "Name": String,
        age as "Age": i32,
    }
}

pub struct Address {
    pub city: String,
    pub street: String,
    pub zip: Option<u32>,
}

reflect_struct! {
    Address {
        city as "City": String,
        street as "Street": String,
        zip as "Zip": Option<u32>,
    }
}

/// Complex property declared before the primitives.
pub struct Customer {
    pub address: Address,
    pub name: String,
    pub billing: Option<Address>,
    pub id: u64,
}

reflect_struct! {
    Customer {
        address as "Address": Address,
        name as "Name": String,
        billing as "Billing": Option<Address>,
        #[read_only]
        id as "Id": u64,
    }
}

pub struct Order {
    pub placed_at: SystemTime,
    pub ttl: Duration,
    pub total: f64,
    pub customer: Box<Customer>,
}

reflect_struct! {
    Order {
        placed_at as "PlacedAt": SystemTime,
        ttl as "Ttl": Duration,
        total as "Total": f64,
        customer as "Customer": Box<Customer>,
    }
}

/// Self-referential through `Option<Box<_>>`.
pub struct Employee {
    pub name: String,
    pub manager: Option<Box<Employee>>,
}

reflect_struct! {
    Employee {
        name as "Name": String,
        manager as "Manager": Option<Box<Employee>>,
    }
}

/// Alpha -> Beta -> Alpha.
pub struct Alpha {
    pub id: u32,
    pub beta: Box<Beta>,
}

pub struct Beta {
    pub label: String,
    pub alpha: Option<Box<Alpha>>,
}

reflect_struct! {
    Alpha {
        id as "Id": u32,
        beta as "Beta": Box<Beta>,
    }
}

reflect_struct! {
    Beta {
        label as "Label": String,
        alpha as "Alpha": Option<Box<Alpha>>,
    }
}

/// Registered by hand to exercise every enumeration filter.
pub struct Gadget {
    pub serial: String,
    pub secret: String,
    pub registry: u32,
    pub first_slot: u8,
    pub pin: u16,
}

impl Reflect for Gadget {
    fn shape() -> TypeShape {
        TypeShape::composite::<Gadget>("Gadget")
            .field::<String>("Serial", |g| &g.serial, |g| &mut g.serial)
            .property(
                PropertyBuilder::<Gadget>::field::<String>("Secret", |g| &g.secret, |g| &mut g.secret)
                    .private(),
            )
            .property(
                PropertyBuilder::<Gadget>::field::<u32>("Registry", |g| &g.registry, |g| &mut g.registry)
                    .static_member(),
            )
            .property(
                PropertyBuilder::<Gadget>::field::<u8>("Item", |g| &g.first_slot, |g| &mut g.first_slot)
                    .indexed(1),
            )
            .property(
                PropertyBuilder::<Gadget>::field::<u16>("Pin", |g| &g.pin, |g| &mut g.pin).write_only(),
            )
            .build()
    }
}

pub fn gadget() -> Gadget {
    Gadget {
        serial: "G-1".into(),
        secret: "hunter2".into(),
        registry: 7,
        first_slot: 3,
        pin: 1234,
    }
}

pub fn address(city: &str) -> Address {
    Address {
        city: city.to_string(),
        street: "Main St".to_string(),
        zip: None,
    }
}

pub fn customer(name: &str, city: &str) -> Customer {
    Customer {
        address: address(city),
        name: name.to_string(),
        billing: None,
        id: 42,
    }
}

pub fn names(accessors: &[fastprop::AccessorDescriptor]) -> Vec<String> {
    accessors.iter().map(|d| d.name().to_string()).collect()
}
