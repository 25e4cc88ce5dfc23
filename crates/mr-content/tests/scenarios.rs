//! Scenario tests for the bundled content.
use mr_content::reactions::{GO_CAN_GO, LOOK_VISIBLE};
use mr_content::skills::{GO, LOOK};
use mr_content::world::{BIG_ROOM, HERO, ROOM};
use mr_content::{create_object_with_id, install, starter};
use mr_core::{EntityId, Message, Snapshot};
use mr_engine::{Dispatch, Engine, EngineConfig, EngineError};

fn texts(engine: &mut Engine) -> Vec<String> {
    engine
        .drain_output()
        .into_iter()
        .map(|d| d.message.plain_text())
        .collect()
}

fn play() -> (Engine, EntityId) {
    let (mut engine, hero) = starter(EngineConfig::default()).unwrap();
    engine.outbox_mut().associate(hero.clone(), "local");
    (engine, hero)
}

#[test]
fn look_describes_the_room() {
    let (mut engine, hero) = play();
    engine.parse("look", &hero).unwrap();
    assert_eq!(
        texts(&mut engine),
        vec![
            "Room",
            "A small room. You can see door, Hero, Box, Shouter here."
        ]
    );
}

#[test]
fn look_at_a_thing_by_synonym_of_the_skill() {
    let (mut engine, hero) = play();
    engine.parse("l box", &hero).unwrap();
    let out = texts(&mut engine);
    assert_eq!(out[0], "Box");
    assert!(out[1].starts_with("Lorem ipsum"));
}

#[test]
fn room_title_is_styled() {
    let (mut engine, hero) = play();
    engine.parse("look", &hero).unwrap();
    let first = engine.drain_output().remove(0).message;
    match first {
        Message::Styled(text) => {
            assert!(text.bold);
            assert!(text.underline);
        }
        other => panic!("expected styled title, got {other:?}"),
    }
}

#[test]
fn go_through_door_moves_and_looks() {
    let (mut engine, hero) = play();
    let outcome = engine.parse("go door", &hero).unwrap();
    assert!(matches!(outcome, Dispatch::Skill(_)));
    assert_eq!(
        engine.get(&hero).unwrap().get_str("location"),
        Some(BIG_ROOM)
    );
    assert_eq!(
        texts(&mut engine),
        vec!["Big Room", "A much bigger room. You can see door, Hero here."]
    );

    engine.parse("go door", &hero).unwrap();
    assert_eq!(engine.get(&hero).unwrap().get_str("location"), Some(ROOM));
}

#[test]
fn go_requires_a_visible_passage() {
    let (mut engine, hero) = play();
    engine.parse("go", &hero).unwrap();
    engine.parse("go window", &hero).unwrap();
    engine.parse("go box", &hero).unwrap();
    assert_eq!(
        texts(&mut engine),
        vec!["go EXIT", "You can't see that.", "You can't go there."]
    );
    assert_eq!(engine.get(&hero).unwrap().get_str("location"), Some(ROOM));
}

/// A room and a door that both carry the `go` reaction; walking through the
/// door follows the door's destination and chains into `look` unprompted.
#[test]
fn door_and_room_with_go_reaction() {
    let mut engine = Engine::default();
    install(&mut engine).unwrap();
    let room = create_object_with_id(&mut engine, "cell", "Cell", "Damp.", None).unwrap();
    let yard = create_object_with_id(&mut engine, "yard", "Yard", "Sunny.", None).unwrap();
    let door = create_object_with_id(&mut engine, "gate", "gate", "Iron.", Some(&room)).unwrap();
    engine
        .entity_mut(&door)
        .unwrap()
        .set("destination", yard.as_str());
    let actor = create_object_with_id(&mut engine, "me", "Me", "Me.", Some(&room)).unwrap();
    for id in [&room, &door] {
        engine.imbue_reactions(id, [LOOK_VISIBLE, GO_CAN_GO]).unwrap();
    }
    engine.imbue_reaction(&yard, LOOK_VISIBLE).unwrap();
    engine.outbox_mut().associate(actor.clone(), "tester");

    engine.parse("go gate", &actor).unwrap();

    assert_eq!(engine.get(&actor).unwrap().get_str("location"), Some("yard"));
    let out = texts(&mut engine);
    assert_eq!(out.first().map(String::as_str), Some("Yard"));
    assert!(engine.diagnostics().conflicts().is_empty());
}

#[test]
fn say_reaches_listeners_only() {
    let (mut engine, hero) = play();
    engine.parse(r#"say "hello there""#, &hero).unwrap();
    assert_eq!(texts(&mut engine), vec!["Hero: hello there"]);

    engine.parse("say", &hero).unwrap();
    assert_eq!(texts(&mut engine), vec!["say WORDS"]);
}

#[test]
fn create_adds_a_visible_object() {
    let (mut engine, hero) = play();
    engine
        .parse(r#"create lamp "A brass lamp.""#, &hero)
        .unwrap();
    assert_eq!(texts(&mut engine), vec!["You create lamp."]);

    engine.parse("look lamp", &hero).unwrap();
    assert_eq!(texts(&mut engine), vec!["lamp", "A brass lamp."]);

    engine.parse("create lamp", &hero).unwrap();
    assert_eq!(texts(&mut engine), vec!["create NAME DESCRIPTION"]);
}

#[test]
fn shouter_shouts_every_five_seconds() {
    let (mut engine, _hero) = play();
    // 0.0625 s per tick: 80 ticks to the first wrap.
    engine.run(79).unwrap();
    assert!(engine.outbox().pending().is_empty());
    engine.tick().unwrap();
    assert_eq!(texts(&mut engine), vec!["Shouter: I can shout!"]);
    engine.run(80).unwrap();
    assert_eq!(texts(&mut engine).len(), 1);
}

#[test]
fn unknown_verbs_stay_silent() {
    let (mut engine, hero) = play();
    assert_eq!(engine.parse("frobnicate", &hero).unwrap(), Dispatch::Ignored);
    assert!(engine.outbox().pending().is_empty());
}

#[test]
fn seeded_world_survives_a_snapshot() {
    let (mut engine, hero) = play();
    engine.parse("go door", &hero).unwrap();
    let json = engine.dump_state().unwrap().to_json_pretty().unwrap();

    let mut restored = Engine::default();
    install(&mut restored).unwrap();
    restored
        .load_state(&Snapshot::from_json(&json).unwrap())
        .unwrap();

    let hero = EntityId::from(HERO);
    assert_eq!(
        restored.get(&hero).unwrap().get_str("location"),
        Some(BIG_ROOM)
    );
    let look = restored.skill_id(LOOK).unwrap();
    assert!(restored.get(&hero).unwrap().skills.contains(look));
    assert!(restored.skill_id(GO).is_some());
    restored.run(100).unwrap();
}

#[test]
fn restore_without_content_fails_fast() {
    let (engine, _) = play();
    let snapshot = engine.dump_state().unwrap();
    let mut bare = Engine::default();
    assert!(matches!(
        bare.load_state(&snapshot),
        Err(EngineError::UnknownSkill(_) | EngineError::UnknownReaction(_))
    ));
    assert!(bare.registry().is_empty());
}
