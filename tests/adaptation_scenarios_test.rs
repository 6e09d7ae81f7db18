//! End-to-end adaptation behaviour through the public engine API

mod common;

use adaptmap::{
    AdaptError, Adapter, AdapterEngine, Capabilities, DeclareCapabilities, TryAdapter,
    TypeHierarchy,
};
use common::*;
use pretty_assertions::assert_eq;
use std::any::Any;
use std::sync::Arc;

#[test]
fn test_identity_short_circuit_skips_adapters() {
    let engine = engine();
    let scripted = Scripted::replying("should not run");
    engine
        .register_adapter::<Dog, Sound, _>(scripted.clone())
        .unwrap();
    let dog = rex();

    let same = engine.adapt::<Dog>(&dog).unwrap().unwrap();
    assert!(same.is_same());
    assert!(std::ptr::eq(&*same, &dog));

    let pet = engine.adapt::<Pet>(&dog).unwrap().unwrap();
    assert!(std::ptr::eq(&*pet, &dog.pet));
    assert_eq!(pet.owner, "Sam");

    assert_eq!(scripted.calls(), 0);
}

#[test]
fn test_identity_through_two_levels() {
    let engine = engine();
    let young = puppy();

    let animal = engine.adapt::<Animal>(&young).unwrap().unwrap();
    assert!(std::ptr::eq(&*animal, &young.dog.animal));
}

#[test]
fn test_identity_value_of_sound_is_returned_as_is() {
    let engine = engine();
    engine.register(Arc::new(DogSoundAdapter)).unwrap();
    let already = Sound("silence".to_string());

    let sound = engine.adapt::<Sound>(&already).unwrap().unwrap();
    assert!(sound.is_same());
    assert_eq!(sound.0, "silence");
}

#[test]
fn test_dog_uses_dog_adapter_and_animal_uses_animal_adapter() {
    let engine = engine();
    engine.register(Arc::new(DogSoundAdapter)).unwrap();
    engine.register(Arc::new(AnimalSoundAdapter)).unwrap();

    let dog = rex();
    let sound = engine.adapt::<Sound>(&dog).unwrap().unwrap();
    assert_eq!(sound.0, "Rex the collie barks");

    let animal = generic_animal();
    let sound = engine.adapt::<Sound>(&animal).unwrap().unwrap();
    assert_eq!(sound.0, "Creature makes a noise");
}

#[test]
fn test_distance_ordering_ignores_registration_order() {
    let engine = engine();
    let base = Scripted::replying("animal");
    let derived = Scripted::replying("dog");
    engine
        .register_adapter::<Animal, Sound, _>(base.clone())
        .unwrap();
    engine
        .register_adapter::<Dog, Sound, _>(derived.clone())
        .unwrap();

    let dog = rex();
    let sound = engine.adapt::<Sound>(&dog).unwrap().unwrap();

    assert_eq!(sound.0, "dog");
    assert_eq!((derived.calls(), base.calls()), (1, 0));
}

#[test]
fn test_puppy_prefers_nearest_ancestor() {
    let engine = engine();
    engine.register(Arc::new(AnimalSoundAdapter)).unwrap();
    engine.register(Arc::new(DogSoundAdapter)).unwrap();

    let young = puppy();
    let sound = engine.adapt::<Sound>(&young).unwrap().unwrap();
    assert_eq!(sound.0, "Rex the collie barks");

    let ranked = engine.candidates::<Sound>(std::any::TypeId::of::<Puppy>());
    let shape: Vec<_> = ranked
        .iter()
        .map(|c| (short_name(c.adapter), c.distance))
        .collect();
    assert_eq!(
        shape,
        vec![("DogSoundAdapter", 1), ("AnimalSoundAdapter", 2)]
    );
}

#[test]
fn test_null_instance_adapts_to_nothing() {
    let engine = engine();
    engine.register(Arc::new(DogSoundAdapter)).unwrap();

    let result = engine.adapt_optional::<Sound>(None).unwrap();

    assert!(result.is_none());
    assert_eq!(engine.stats().candidate_misses, 0);
}

#[test]
fn test_present_optional_instance_is_adapted() {
    let engine = engine();
    engine.register(Arc::new(DogSoundAdapter)).unwrap();
    let dog = rex();

    let sound = engine
        .adapt_optional::<Sound>(Some(&dog as &dyn Any))
        .unwrap()
        .unwrap();
    assert_eq!(sound.0, "Rex the collie barks");
}

#[test]
fn test_declining_nearest_adapter_falls_back() {
    let engine = engine();
    let near = Scripted::declining();
    let far = Scripted::replying("fallback");
    engine.register_adapter::<Dog, Sound, _>(near.clone()).unwrap();
    engine
        .register_adapter::<Animal, Sound, _>(far.clone())
        .unwrap();

    let dog = rex();
    let sound = engine.adapt::<Sound>(&dog).unwrap().unwrap();

    assert_eq!(sound.0, "fallback");
    assert_eq!((near.calls(), far.calls()), (1, 1));
}

#[test]
fn test_equal_distance_tie_follows_registration_order() {
    let engine = engine();
    let first = Scripted::declining();
    let second = Scripted::replying("B");
    let third = Scripted::replying("C");
    engine
        .register_adapter::<Dog, Sound, _>(first.clone())
        .unwrap();
    engine
        .register_adapter::<Dog, Sound, _>(second.clone())
        .unwrap();
    engine
        .register_adapter::<Dog, Sound, _>(third.clone())
        .unwrap();

    let dog = rex();
    let sound = engine.adapt::<Sound>(&dog).unwrap().unwrap();

    assert_eq!(sound.0, "B");
    assert_eq!((first.calls(), second.calls(), third.calls()), (1, 1, 0));
}

#[test]
fn test_all_candidates_declining_is_not_an_error() {
    let engine = engine();
    engine
        .register_adapter::<Dog, Sound, _>(Scripted::declining())
        .unwrap();
    engine
        .register_adapter::<Animal, Sound, _>(Scripted::declining())
        .unwrap();

    assert!(engine.adapt::<Sound>(&rex()).unwrap().is_none());
}

#[test]
fn test_no_adapter_registered_returns_none() {
    let engine = engine();

    assert!(engine.adapt::<Sound>(&rex()).unwrap().is_none());
    assert!(engine.adapt::<Smell>(&42_u32).unwrap().is_none());
}

#[test]
fn test_more_specific_adapter_is_not_used_for_base_instance() {
    let engine = engine();
    let dog_only = Scripted::replying("dog");
    engine
        .register_adapter::<Dog, Sound, _>(dog_only.clone())
        .unwrap();

    assert!(engine.adapt::<Sound>(&generic_animal()).unwrap().is_none());
    assert_eq!(dog_only.calls(), 0);
}

#[test]
fn test_root_adapter_serves_undeclared_types() {
    let engine = AdapterEngine::default();
    let catch_all = Scripted::replying("anything");
    engine
        .register_adapter::<dyn Any, Sound, _>(catch_all.clone())
        .unwrap();

    let sound = engine.adapt::<Sound>(&"a str slice").unwrap().unwrap();
    assert_eq!(sound.0, "anything");
    assert_eq!(catch_all.calls(), 1);
}

#[test]
fn test_root_adapter_ranks_after_declared_ancestors() {
    let engine = engine();
    engine
        .register_adapter::<dyn Any, Sound, _>(Scripted::replying("root"))
        .unwrap();
    engine.register(Arc::new(AnimalSoundAdapter)).unwrap();

    let ranked = engine.candidates::<Sound>(std::any::TypeId::of::<Dog>());
    assert_eq!(ranked.len(), 2);
    assert_eq!(short_name(ranked[0].adapter), "AnimalSoundAdapter");
    assert!(ranked[1].from.is_root());
    assert!(ranked[1].distance > ranked[0].distance);
}

struct Kennel;

impl Adapter<Dog, Sound> for Kennel {
    fn adapt(&self, dog: &Dog) -> Option<Sound> {
        Some(Sound(format!("{} howls", dog.animal.name)))
    }
}

impl Adapter<Dog, Smell> for Kennel {
    fn adapt(&self, dog: &Dog) -> Option<Smell> {
        Some(Smell(format!("wet {}", dog.breed)))
    }
}

impl DeclareCapabilities for Kennel {
    fn declare(caps: &mut Capabilities<Self>) {
        caps.adapts::<Dog, Sound>().adapts::<Dog, Smell>();
    }
}

#[test]
fn test_one_adapter_serves_several_targets() {
    let engine = engine();
    assert_eq!(engine.register(Arc::new(Kennel)).unwrap(), 2);
    let dog = rex();

    let sound = engine.adapt::<Sound>(&dog).unwrap().unwrap();
    let smell = engine.adapt::<Smell>(&dog).unwrap().unwrap();

    assert_eq!(sound.0, "Rex howls");
    assert_eq!(smell.0, "wet collie");
}

#[test]
fn test_null_adapter_registration_fails() {
    let engine = engine();

    let err = engine.register::<Kennel>(None).unwrap_err();

    assert!(matches!(err, AdaptError::InvalidArgument(_)));
    assert!(engine.registered().is_empty());
}

struct Vet;

impl TryAdapter<Animal, Smell> for Vet {
    fn try_adapt(&self, animal: &Animal) -> anyhow::Result<Option<Smell>> {
        if animal.name.is_empty() {
            anyhow::bail!("animal has no name");
        }
        Ok(None)
    }
}

#[test]
fn test_adapter_error_propagates_without_fallback() {
    let engine = engine();
    engine.register_fallible::<Animal, Smell, _>(Arc::new(Vet)).unwrap();
    let nameless = Animal {
        name: String::new(),
    };

    let err = engine.adapt::<Smell>(&nameless).unwrap_err();

    match err {
        AdaptError::Adapter { adapter, source } => {
            assert_eq!(short_name(adapter), "Vet");
            assert_eq!(source.to_string(), "animal has no name");
        }
        other => panic!("expected adapter failure, got {other}"),
    }
}

#[test]
fn test_fallible_adapter_declining_falls_through() {
    let engine = engine();
    engine.register_fallible::<Animal, Smell, _>(Arc::new(Vet)).unwrap();

    assert!(engine.adapt::<Smell>(&rex()).unwrap().is_none());
}

#[test]
fn test_can_adapt_reports_without_invoking() {
    let engine = engine();
    let scripted = Scripted::declining();
    engine
        .register_adapter::<Animal, Sound, _>(scripted.clone())
        .unwrap();

    assert!(engine.can_adapt::<Sound>(&rex()));
    assert!(engine.can_adapt::<Pet>(&rex()));
    assert!(!engine.can_adapt::<Smell>(&rex()));
    assert_eq!(scripted.calls(), 0);
}

#[test]
fn test_interface_adapter_is_reachable() {
    struct PetSound;
    impl Adapter<Pet, Sound> for PetSound {
        fn adapt(&self, pet: &Pet) -> Option<Sound> {
            Some(Sound(format!("{}'s pet", pet.owner)))
        }
    }

    let hierarchy = TypeHierarchy::builder()
        .declare::<Dog>(|t| t.implements::<Pet>(|d| &d.pet))
        .build()
        .unwrap();
    let engine = AdapterEngine::new(hierarchy);
    engine
        .register_adapter::<Pet, Sound, _>(Arc::new(PetSound))
        .unwrap();

    let dog = rex();
    let sound = engine.adapt::<Sound>(&dog).unwrap().unwrap();
    assert_eq!(sound.0, "Sam's pet");
}
