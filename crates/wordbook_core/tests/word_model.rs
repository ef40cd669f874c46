use chrono::{TimeDelta, TimeZone, Utc};
use wordbook_core::{
    Definition, DefinitionPatch, NewDefinition, NewWord, VoteDirection, Word, WordPatch,
    WordValidationError,
};

fn t0() -> chrono::DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 3, 1, 8, 30, 0).unwrap()
}

#[test]
fn from_input_stamps_word_and_definitions_with_same_instant() {
    let input = NewWord {
        text: "run".to_string(),
        definitions: vec![
            NewDefinition {
                text: "move quickly on foot".to_string(),
            },
            NewDefinition {
                text: "operate a program".to_string(),
            },
        ],
    };

    let word = Word::from_input(input, t0());

    assert!(!word.id.is_nil());
    assert_eq!(word.text, "run");
    assert_eq!(word.created_at, t0());
    assert_eq!(word.updated_at, t0());
    assert_eq!(word.definitions.len(), 2);
    for definition in &word.definitions {
        assert_eq!(definition.votes, 0);
        assert_eq!(definition.created_at, t0());
        assert_eq!(definition.updated_at, t0());
    }
    assert_ne!(word.definitions[0].id, word.definitions[1].id);
}

#[test]
fn patch_refreshes_updated_at_and_keeps_created_at() {
    let mut word = Word::new("colour", t0());
    let later = t0() + TimeDelta::seconds(30);

    word.apply_patch(
        WordPatch {
            text: Some("color".to_string()),
        },
        later,
    );

    assert_eq!(word.text, "color");
    assert_eq!(word.created_at, t0());
    assert_eq!(word.updated_at, later);
}

#[test]
fn empty_definition_patch_still_touches_updated_at() {
    let mut definition = Definition::new("a meaning", t0());
    let later = t0() + TimeDelta::milliseconds(1);

    definition.apply_patch(DefinitionPatch::default(), later);

    assert_eq!(definition.text, "a meaning");
    assert_eq!(definition.updated_at, later);
}

#[test]
fn votes_move_by_exactly_one_and_refresh_updated_at() {
    let mut definition = Definition::new("a meaning", t0());
    let later = t0() + TimeDelta::seconds(1);

    definition.apply_vote(VoteDirection::Up, later);
    assert_eq!(definition.votes, 1);
    assert_eq!(definition.updated_at, later);

    definition.apply_vote(VoteDirection::Down, later);
    definition.apply_vote(VoteDirection::Down, later);
    assert_eq!(definition.votes, -1);
}

#[test]
fn votes_saturate_instead_of_overflowing() {
    let mut definition = Definition::new("extreme", t0());
    definition.votes = i64::MAX;
    definition.apply_vote(VoteDirection::Up, t0());
    assert_eq!(definition.votes, i64::MAX);

    definition.votes = i64::MIN;
    definition.apply_vote(VoteDirection::Down, t0());
    assert_eq!(definition.votes, i64::MIN);
}

#[test]
fn adding_and_removing_definitions_does_not_touch_word_updated_at() {
    let mut word = Word::new("set", t0());
    let later = t0() + TimeDelta::minutes(5);

    let id = word.push_definition(Definition::new("a collection", later));
    assert_eq!(word.updated_at, t0());

    let removed = word.remove_definition(id).expect("definition should exist");
    assert_eq!(removed.id, id);
    assert_eq!(word.updated_at, t0());
    assert!(word.remove_definition(id).is_none());
}

#[test]
fn remove_definition_keeps_order_of_survivors() {
    let mut word = Word::new("set", t0());
    let first = word.push_definition(Definition::new("first", t0()));
    let second = word.push_definition(Definition::new("second", t0()));
    let third = word.push_definition(Definition::new("third", t0()));

    word.remove_definition(second);

    let ids: Vec<_> = word.definitions.iter().map(|d| d.id).collect();
    assert_eq!(ids, vec![first, third]);
}

#[test]
fn definition_lookup_is_scoped_to_the_word() {
    let mut one = Word::new("one", t0());
    let two = Word::new("two", t0());
    let id = one.push_definition(Definition::new("the number", t0()));

    assert!(one.definition(id).is_some());
    assert!(two.definition(id).is_none());
}

#[test]
fn validate_rejects_blank_texts_and_duplicate_ids() {
    let word = Word::new("   ", t0());
    assert_eq!(word.validate(), Err(WordValidationError::BlankWordText));

    let mut word = Word::new("ok", t0());
    word.push_definition(Definition::new("\n", t0()));
    assert_eq!(word.validate(), Err(WordValidationError::BlankDefinitionText));

    let mut word = Word::new("ok", t0());
    let definition = Definition::new("meaning", t0());
    let duplicate = definition.clone();
    word.push_definition(definition);
    word.push_definition(duplicate.clone());
    assert_eq!(
        word.validate(),
        Err(WordValidationError::DuplicateDefinitionId(duplicate.id))
    );
}

#[test]
fn word_serialization_uses_camel_case_wire_fields() {
    let mut word = Word::new("run", t0());
    word.push_definition(Definition::new("move fast", t0()));

    let json = serde_json::to_value(&word).unwrap();
    assert_eq!(json["id"], word.id.to_string());
    assert_eq!(json["text"], "run");
    assert_eq!(json["createdAt"], "2024-03-01T08:30:00Z");
    assert_eq!(json["updatedAt"], "2024-03-01T08:30:00Z");
    assert_eq!(json["definitions"][0]["votes"], 0);
    assert_eq!(json["definitions"][0]["text"], "move fast");
    assert!(json["definitions"][0]["createdAt"].is_string());

    let decoded: Word = serde_json::from_value(json).unwrap();
    assert_eq!(decoded, word);
}

#[test]
fn inputs_ignore_unknown_fields_and_default_definitions() {
    let input: NewWord =
        serde_json::from_str(r#"{"text":"run","votes":99,"id":"x"}"#).unwrap();
    assert_eq!(input.text, "run");
    assert!(input.definitions.is_empty());

    let patch: DefinitionPatch = serde_json::from_str(r#"{"votes":5}"#).unwrap();
    assert_eq!(patch, DefinitionPatch::default());
}
