//! World-load reload protocol over real definition documents.

use std::fs;
use std::path::Path;

use bestiary_content::DefinitionSource;
use bestiary_core::{AreaInfo, EngineConfig, GameError, Vec2};
use bestiary_runtime::{Bestiary, BestiaryError, SimArea};

const ALICE_JSON: &str = r#"{
    "Imp": {
        "Name": "Imp",
        "Appearance": { "Texture": "imp.png", "FrameWidth": 16, "FrameHeight": 24 },
        "Stats": { "MaxHealth": 40, "Damage": 6, "Defense": 1, "Experience": 5, "Speed": 2 },
        "Spawn": { "MinMineLevel": 5, "MaxMineLevel": 10, "SpawnWeight": 1.0 }
    },
    "Bat": {
        "Name": "Cave Bat",
        "Appearance": { "Texture": "Characters/Monsters/Missing" },
        "Behavior": "Bat",
        "CustomFields": { "ChargeEnabled": true, "ChargeSpeed": "fast" }
    }
}"#;

const BOB_RON: &str = r#"{
    "Ghost": (
        Name: "Ghost",
        Behavior: "ghost",
        Stats: (MaxHealth: 25, Damage: 4),
        CustomFields: { "LightRadius": 2.5 },
    ),
}"#;

fn write(dir: &Path, name: &str, content: &str) {
    fs::write(dir.join(name), content).unwrap();
}

#[test]
fn one_broken_source_does_not_block_the_others() {
    let alice = tempfile::tempdir().unwrap();
    let broken = tempfile::tempdir().unwrap();
    let bob = tempfile::tempdir().unwrap();
    write(alice.path(), "monsters.json", ALICE_JSON);
    write(broken.path(), "monsters.json", "{ \"Imp\": [ not json");
    write(bob.path(), "monsters.ron", BOB_RON);

    let sources = vec![
        DefinitionSource::new("alice", alice.path()),
        DefinitionSource::new("broken", broken.path()),
        DefinitionSource::new("bob", bob.path()),
    ];
    let mut bestiary = Bestiary::with_defaults();
    let report = bestiary.reload(&sources);

    assert_eq!(report.loaded, 3);
    assert_eq!(report.failures.len(), 1);
    assert!(matches!(
        &report.failures[0],
        BestiaryError::SourceRead { owner, .. } if owner == "broken"
    ));
    assert_eq!(report.failures[0].error_code(), "BESTIARY_SOURCE_READ_FAILURE");
    assert_eq!(
        bestiary.registry().sorted_ids(),
        vec!["alice_Bat", "alice_Imp", "bob_Ghost"]
    );
}

#[test]
fn reload_replaces_everything_registered_before() {
    let dir = tempfile::tempdir().unwrap();
    write(dir.path(), "monsters.json", ALICE_JSON);
    let mut bestiary = Bestiary::with_defaults();
    bestiary
        .registry_mut()
        .register_definition("stale_Thing", bestiary_core::MonsterDefinition::new("Thing"));

    let report = bestiary.reload(&[DefinitionSource::new("alice", dir.path())]);
    assert!(report.is_clean());
    assert!(!bestiary.registry().is_registered("stale_Thing"));
    assert_eq!(bestiary.registry().len(), 2);
}

#[test]
fn appearance_resolves_files_and_falls_back_for_unknown_content() {
    let dir = tempfile::tempdir().unwrap();
    write(dir.path(), "monsters.json", ALICE_JSON);
    write(dir.path(), "imp.png", "not really a png");
    let mut bestiary = Bestiary::with_defaults();
    bestiary.reload(&[DefinitionSource::new("alice", dir.path())]);

    let mut area = SimArea::new(AreaInfo::tiered("Mine", 6), 20, 20, EngineConfig::default(), 8);
    area.set_target(Some(Vec2::new(640.0, 640.0)));
    let imp = area.spawn(&bestiary, "alice_Imp", Vec2::new(64.0, 64.0));
    let bat = area.spawn(&bestiary, "alice_Bat", Vec2::new(128.0, 64.0));

    let imp = area.monster(imp).unwrap();
    assert!(!imp.appearance().is_placeholder());
    assert!(imp.appearance().describe().contains("imp.png"));

    let bat = area.monster(bat).unwrap();
    assert!(bat.appearance().is_placeholder());
    assert_eq!(bat.behavior().key(), "aerial");
    assert_eq!(bat.creature().name, "Cave Bat");
    // the bad ChargeSpeed falls back silently; the creature still flies
    area.tick(&bestiary, 1.0 / 60.0);
}

#[test]
fn hover_light_follows_and_is_released_on_death() {
    let dir = tempfile::tempdir().unwrap();
    write(dir.path(), "monsters.ron", BOB_RON);
    let mut bestiary = Bestiary::with_defaults();
    bestiary.reload(&[DefinitionSource::new("bob", dir.path())]);

    let mut area = SimArea::new(AreaInfo::tiered("Mine", 6), 20, 20, EngineConfig::default(), 8);
    area.set_target(Some(Vec2::new(640.0, 640.0)));
    let ghost = area.spawn(&bestiary, "bob_Ghost", Vec2::new(64.0, 64.0));
    assert_eq!(area.lights().len(), 1);

    for _ in 0..10 {
        area.tick(&bestiary, 1.0 / 60.0);
        area.animation_tick(&bestiary, 1.0 / 60.0);
    }
    let position = area.monster(ghost).unwrap().creature().position;
    assert_eq!(area.lights().values().next().copied(), Some(position));

    area.damage(&bestiary, ghost, bestiary_runtime::Hit::melee(1000));
    assert!(area.lights().is_empty());
}
