use super::{ActionId, Catalog};
use crate::basis::{Channel, Delta};

fn id(catalog: &Catalog, name: &str) -> ActionId {
    catalog.find(name).unwrap()
}

#[test]
fn test_livly_roles() {
    let catalog = Catalog::livly();
    assert_eq!(catalog.len(), 8);

    let ladybug = id(&catalog, "Ladybug");
    let locust = id(&catalog, "Longheaded Locust");
    let dor = id(&catalog, "Lapis Lazuli Dor Beetle");
    assert_eq!(
        catalog.pivots().collect::<Vec<_>>(),
        vec![(ladybug, Channel::R), (locust, Channel::G), (dor, Channel::B)]
    );
    assert_eq!(catalog.pivot_raising(Channel::G), Some(locust));

    assert_eq!(catalog.shrink(), Some(id(&catalog, "Japanese Wood Ant")));
    assert_eq!(
        catalog.single_raise(Channel::R),
        Some(id(&catalog, "Indian Fritillary Larva"))
    );
    assert_eq!(
        catalog.single_raise(Channel::B),
        Some(id(&catalog, "Hawk Moth Larva"))
    );
}

#[test]
fn test_livly_rates() {
    let rates = *Catalog::livly().rates();
    assert_eq!(rates.raise, [7.0; 3]);
    assert_eq!(rates.lower, [2.0; 3]);
    assert_eq!(rates.mass_raise, 7.0);
    assert_eq!(rates.mass_lower, 6.0);
    assert_eq!(rates.stride, 7.0);
}

#[test]
fn test_find_by_either_name() {
    let catalog = Catalog::livly();
    assert_eq!(catalog.find("瓢蟲"), catalog.find("ladybug"));
    assert_eq!(catalog.find("  Japanese wood ant "), catalog.find("日本山蟻"));
    assert_eq!(catalog.find("Stag Beetle"), None);
    let ant = catalog.find("日本山蟻").unwrap();
    assert_eq!(catalog.delta(ant), Delta::new(-2, -2, -2));
    assert_eq!(catalog.get(ant).name_en, "Japanese Wood Ant");
}

#[test]
fn test_expansion_order_prefers_single_channel() {
    let catalog = Catalog::livly();
    let names = catalog
        .expansion_order()
        .iter()
        .map(|&id| catalog.get(id).name_en.as_str())
        .collect::<Vec<_>>();
    assert_eq!(
        names,
        vec![
            "Indian Fritillary Larva",
            "Cabbage Butterfly Larva",
            "Hawk Moth Larva",
            "Ladybug",
            "Longheaded Locust",
            "Lapis Lazuli Dor Beetle",
            "Rhinoceros Beetle Larva",
            "Japanese Wood Ant",
        ]
    );
}

#[test]
fn test_from_json() {
    let catalog =
        Catalog::from_json(include_str!("../../test_cases/small_catalog.json")).unwrap();
    assert_eq!(catalog.len(), 4);
    let grape = catalog.find("grape").unwrap();
    assert_eq!(catalog.delta(grape), Delta::new(0, 0, 5));
    assert_eq!(catalog.get(grape).image, None);
    assert_eq!(catalog.shrink(), catalog.find("Ash"));
    assert_eq!(catalog.pivots().count(), 0);
    assert_eq!(catalog.rates().stride, 5.0);
}

#[test]
fn test_rejects_incomplete_catalog() {
    let only_up = r#"[{"name": "a", "nameEn": "A", "r": 1, "g": 1, "b": 1}]"#;
    let err = Catalog::from_json(only_up).unwrap_err();
    assert!(err.to_string().contains("raise and lower"));

    assert!(Catalog::from_json("[]").is_err());
    assert!(Catalog::from_json("{").is_err());
}

#[test]
fn test_pivot_needs_one_raise_and_two_lowers() {
    let json = r#"[
        {"name": "a", "nameEn": "Tilt", "r": 4, "g": 2, "b": -2},
        {"name": "b", "nameEn": "Pivot", "r": 4, "g": -2, "b": -2},
        {"name": "c", "nameEn": "Half", "r": 0, "g": 4, "b": -2},
        {"name": "d", "nameEn": "Down", "r": -1, "g": -1, "b": -1},
        {"name": "e", "nameEn": "Up", "r": 1, "g": 1, "b": 5}
    ]"#;
    let catalog = Catalog::from_json(json).unwrap();
    assert_eq!(
        catalog.pivots().collect::<Vec<_>>(),
        vec![(id(&catalog, "Pivot"), Channel::R)]
    );
    assert_eq!(catalog.pivot_raising(Channel::G), None);
}
