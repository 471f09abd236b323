// tests/preprocess.rs

//! End-to-end tests for the preprocess step.

mod common;

use common::setup_data_dir;
use nerd_converter::hash::hash_file;
use nerd_converter::progress::{CallbackProgress, ProgressEvent};
use nerd_converter::{
    preprocess_recipes, Amount, Error, RecipeFile, RecipeMeta, SilentProgress, StackKind,
    StepOutcome,
};
use std::fs;
use std::sync::{Arc, Mutex};

#[test]
fn test_preprocess_aggregates_dump() {
    let (_temp_dir, layout) = setup_data_dir();

    let outcome = preprocess_recipes(&layout, &SilentProgress::new()).unwrap();
    assert_eq!(outcome, StepOutcome::Written { recipes: 3 });

    let file = RecipeFile::load(&layout.preprocessed()).unwrap();
    assert_eq!(file.dump_version, "2.1.4");
    assert_eq!(file.dump_sha, hash_file(&layout.dump()).unwrap().as_str());

    // Machine recipes are inserted as they are read, generic ones at the end
    let macerator = &file.recipes[0];
    assert_eq!(macerator.machine, "Macerator");
    assert_eq!(macerator.inputs.len(), 2);
    assert_eq!(macerator.inputs[1].kind, StackKind::Fluid);
    assert_eq!(macerator.outputs[0].amount, Amount::from(2));
    assert_eq!(macerator.outputs[1].slug, "i70d0");
    assert_eq!(macerator.outputs[1].amount, Amount::new(0.5));
    assert_eq!(
        macerator.meta,
        Some(RecipeMeta {
            power: 2,
            duration: 400
        })
    );

    let furnace = &file.recipes[1];
    assert_eq!(furnace.machine, "Furnace");
    let outputs: Vec<_> = furnace.outputs.iter().map(|s| s.slug.as_str()).collect();
    assert_eq!(outputs, vec!["i10d0", "i30d0"]);

    let crafting = &file.recipes[2];
    assert_eq!(crafting.machine, "Shaped Crafting");
    assert_eq!(crafting.inputs.len(), 2);
    assert_eq!(crafting.inputs[0].amount, Amount::from(2));
    assert_eq!(crafting.outputs.len(), 1);
    assert_eq!(crafting.outputs[0].amount, Amount::from(1));
}

#[test]
fn test_preprocess_output_json_shape() {
    let (_temp_dir, layout) = setup_data_dir();
    preprocess_recipes(&layout, &SilentProgress::new()).unwrap();

    let value: serde_json::Value =
        serde_json::from_slice(&fs::read(layout.preprocessed()).unwrap()).unwrap();
    let macerator = &value["recipes"][0];
    assert_eq!(macerator["inputs"][0]["type"], "item");
    assert_eq!(macerator["inputs"][0]["amount"], 1);
    assert_eq!(macerator["outputs"][1]["amount"], 0.5);
    assert_eq!(macerator["meta"]["EUt"], 2);
    assert!(value["recipes"][1]["meta"].is_null());
}

#[test]
fn test_preprocess_cache_gate() {
    let (_temp_dir, layout) = setup_data_dir();

    preprocess_recipes(&layout, &SilentProgress::new()).unwrap();
    let first = fs::read(layout.preprocessed()).unwrap();

    let outcome = preprocess_recipes(&layout, &SilentProgress::new()).unwrap();
    assert_eq!(outcome, StepOutcome::UpToDate);
    assert_eq!(fs::read(layout.preprocessed()).unwrap(), first);

    // Any byte change in the dump invalidates the cache
    let mut dump = fs::read_to_string(layout.dump()).unwrap();
    dump.push('\n');
    fs::write(layout.dump(), dump).unwrap();

    let outcome = preprocess_recipes(&layout, &SilentProgress::new()).unwrap();
    assert_eq!(outcome, StepOutcome::Written { recipes: 3 });
    let file = RecipeFile::load(&layout.preprocessed()).unwrap();
    assert_eq!(file.dump_sha, hash_file(&layout.dump()).unwrap().as_str());
}

#[test]
fn test_preprocess_reports_progress() {
    let (_temp_dir, layout) = setup_data_dir();
    let events = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&events);
    let progress = CallbackProgress::new(0, move |event| sink.lock().unwrap().push(event));

    preprocess_recipes(&layout, &progress).unwrap();

    let events = events.lock().unwrap();
    let positions: Vec<u64> = events
        .iter()
        .filter_map(|e| match e {
            ProgressEvent::Position { current, .. } => Some(*current),
            _ => None,
        })
        .collect();
    assert!(positions.windows(2).all(|w| w[0] <= w[1]));
    assert_eq!(positions.last(), Some(&5));
    assert!(matches!(events.last(), Some(ProgressEvent::Finished(_))));
}

#[test]
fn test_malformed_recipe_aborts_without_output() {
    let (_temp_dir, layout) = setup_data_dir();
    fs::write(
        layout.dump(),
        r#"{"version": "1", "queries": [{"query_item": "i1d0", "handlers": [
            {"id": "x", "name": "X", "tab_name": "X", "recipes": [{"generic": {"ingredients": []}}, {}]}
        ]}]}"#,
    )
    .unwrap();

    let err = preprocess_recipes(&layout, &SilentProgress::new()).unwrap_err();
    assert!(matches!(err, Error::MalformedRecipe { index: 1, .. }));
    assert!(!layout.preprocessed().exists());
    // No temp files left behind either
    assert_eq!(fs::read_dir(&layout.output_dir).unwrap().count(), 0);
}

#[test]
fn test_invalid_slot_aborts() {
    let (_temp_dir, layout) = setup_data_dir();
    fs::write(
        layout.dump(),
        r#"{"version": "1", "queries": [{"query_item": "i1d0", "handlers": [
            {"id": "x", "name": "X", "tab_name": "X", "recipes": [
                {"generic": {"ingredients": [{"itemSlug": "i1d0"}], "otherStacks": []}}
            ]}
        ]}]}"#,
    )
    .unwrap();

    let err = preprocess_recipes(&layout, &SilentProgress::new()).unwrap_err();
    assert!(matches!(err, Error::InvalidSlot(_)));
}
