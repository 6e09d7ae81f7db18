// Shared fixtures for adaptmap integration tests
#![allow(dead_code)]

use adaptmap::{Adapter, AdapterEngine, Capabilities, DeclareCapabilities, TypeHierarchy};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

pub struct Animal {
    pub name: String,
}

/// Interface view: something with an owner
pub struct Pet {
    pub owner: String,
}

pub struct Dog {
    pub animal: Animal,
    pub pet: Pet,
    pub breed: String,
}

pub struct Puppy {
    pub dog: Dog,
    pub age_weeks: u32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Sound(pub String);

#[derive(Debug, Clone, PartialEq)]
pub struct Smell(pub String);

/// Dog extends Animal and implements Pet; Puppy extends Dog
pub fn hierarchy() -> TypeHierarchy {
    TypeHierarchy::builder()
        .declare::<Dog>(|t| {
            t.implements::<Pet>(|d| &d.pet)
                .extends::<Animal>(|d| &d.animal)
        })
        .declare::<Puppy>(|t| t.extends::<Dog>(|p| &p.dog))
        .build()
        .unwrap()
}

pub fn engine() -> AdapterEngine {
    AdapterEngine::new(hierarchy())
}

pub fn rex() -> Dog {
    Dog {
        animal: Animal {
            name: "Rex".to_string(),
        },
        pet: Pet {
            owner: "Sam".to_string(),
        },
        breed: "collie".to_string(),
    }
}

pub fn puppy() -> Puppy {
    Puppy {
        dog: rex(),
        age_weeks: 9,
    }
}

pub fn generic_animal() -> Animal {
    Animal {
        name: "Creature".to_string(),
    }
}

pub struct DogSoundAdapter;

impl Adapter<Dog, Sound> for DogSoundAdapter {
    fn adapt(&self, dog: &Dog) -> Option<Sound> {
        Some(Sound(format!("{} the {} barks", dog.animal.name, dog.breed)))
    }
}

impl DeclareCapabilities for DogSoundAdapter {
    fn declare(caps: &mut Capabilities<Self>) {
        caps.adapts::<Dog, Sound>();
    }
}

pub struct AnimalSoundAdapter;

impl Adapter<Animal, Sound> for AnimalSoundAdapter {
    fn adapt(&self, animal: &Animal) -> Option<Sound> {
        Some(Sound(format!("{} makes a noise", animal.name)))
    }
}

impl DeclareCapabilities for AnimalSoundAdapter {
    fn declare(caps: &mut Capabilities<Self>) {
        caps.adapts::<Animal, Sound>();
    }
}

/// Adapter with a fixed reply for any `From`, counting its invocations
pub struct Scripted {
    pub reply: Option<&'static str>,
    calls: AtomicUsize,
}

impl Scripted {
    pub fn replying(reply: &'static str) -> Arc<Self> {
        Arc::new(Self {
            reply: Some(reply),
            calls: AtomicUsize::new(0),
        })
    }

    pub fn declining() -> Arc<Self> {
        Arc::new(Self {
            reply: None,
            calls: AtomicUsize::new(0),
        })
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl<F: ?Sized> Adapter<F, Sound> for Scripted {
    fn adapt(&self, _from: &F) -> Option<Sound> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.reply.map(|r| Sound(r.to_string()))
    }
}

/// Last path segment of a type name, for readable assertions
pub fn short_name(type_name: &str) -> &str {
    type_name.rsplit("::").next().unwrap_or(type_name)
}
