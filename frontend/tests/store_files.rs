use frontend::diagnostics::Level;
use frontend::macro_store::{MacroDefinition, MacroStore, SaveOutcome, StoreError};
use frontend::normalize::Param;
use insta::assert_snapshot;
use std::fs;
use std::path::PathBuf;
use std::time::{SystemTime, UNIX_EPOCH};

fn unique_temp_dir(name: &str) -> PathBuf {
    let mut path = std::env::temp_dir();
    let stamp = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("system clock should be after unix epoch")
        .as_nanos();
    path.push(format!("snipgen_store_{}_{}", name, stamp));
    fs::create_dir_all(&path).expect("create temp dir");
    path
}

#[test]
fn missing_file_loads_as_empty_store() {
    let dir = unique_temp_dir("missing");
    let (store, diagnostics) = MacroStore::load(dir.join("user_keywords.db"));
    assert!(store.is_empty());
    assert!(diagnostics.is_empty());
    let _ = fs::remove_dir_all(dir);
}

#[test]
fn unreadable_file_loads_as_empty_store_with_a_diagnostic() {
    let dir = unique_temp_dir("unreadable");
    let (store, diagnostics) = MacroStore::load(&dir);
    assert!(store.is_empty());
    assert_eq!(diagnostics.len(), 1);
    assert_eq!(diagnostics[0].level, Level::Error);
    assert!(diagnostics[0].message.starts_with("could not read"));
    assert_eq!(store.path(), Some(dir.as_path()));
    let _ = fs::remove_dir_all(dir);
}

#[test]
fn hand_edited_block_cannot_shadow_a_builtin() {
    let dir = unique_temp_dir("shadow");
    let path = dir.join("user_keywords.db");
    fs::write(&path, "===KEYWORD:For===\nint hijack = 1;\n===END===\n").unwrap();

    let (store, diagnostics) = MacroStore::load(&path);
    assert!(!store.contains("for"));
    assert_eq!(diagnostics.len(), 1);
    assert_eq!(diagnostics[0].level, Level::Warning);
    assert_eq!(diagnostics[0].line, Some(1));
    let _ = fs::remove_dir_all(dir);
}

#[test]
fn every_mutation_rewrites_the_file() {
    let dir = unique_temp_dir("mutations");
    let path = dir.join("user_keywords.db");
    let (mut store, _) = MacroStore::load(&path);

    let outcome = store
        .define(
            "Greet",
            MacroDefinition::new(
                vec![Param::new("who", "world")],
                "cout << \"hello {who}\" << endl;",
            ),
        )
        .unwrap();
    assert!(outcome.is_saved());
    let outcome = store
        .define("vec", MacroDefinition::new(Vec::new(), "#include <vector>\nvector<int> v;"))
        .unwrap();
    assert!(outcome.is_saved());
    assert_snapshot!(fs::read_to_string(&path).unwrap(), @r###"
    ===KEYWORD:greet===
    ===PARAMS:who=world===
    cout << "hello {who}" << endl;
    ===END===
    ===KEYWORD:vec===
    #include <vector>
    vector<int> v;
    ===END===
    "###);

    assert!(store.remove("vec").unwrap().is_saved());
    assert!(store.set_default("greet", "who", "there").unwrap().is_saved());

    let (reloaded, diagnostics) = MacroStore::load(&path);
    assert!(diagnostics.is_empty());
    assert_eq!(reloaded.names().collect::<Vec<_>>(), vec!["greet"]);
    assert_eq!(
        reloaded.get("greet").unwrap().params,
        vec![Param::new("who", "there")]
    );
    let _ = fs::remove_dir_all(dir);
}

#[test]
fn hand_written_file_with_truncated_block_loads_best_effort() {
    let dir = unique_temp_dir("truncated");
    let path = dir.join("user_keywords.db");
    fs::write(
        &path,
        "===KEYWORD:ok===\nint ok = 1;\n===END===\n===KEYWORD:cut===\n===PARAMS:n=2===\nint cut = {n};\n",
    )
    .unwrap();

    let (store, diagnostics) = MacroStore::load(&path);
    assert_eq!(store.get("ok").unwrap().body, "int ok = 1;\n");
    assert_eq!(store.get("cut").unwrap().params, vec![Param::new("n", "2")]);
    assert_eq!(store.get("cut").unwrap().body, "int cut = {n};\n");
    assert_eq!(diagnostics.len(), 1);
    assert_eq!(diagnostics[0].level, Level::Warning);
    assert_eq!(diagnostics[0].line, Some(4));
    let _ = fs::remove_dir_all(dir);
}

#[test]
fn write_failure_keeps_the_in_memory_change() {
    let dir = unique_temp_dir("unwritable");
    let path = dir.join("no_such_dir").join("user_keywords.db");
    let (mut store, _) = MacroStore::load(&path);

    let outcome = store
        .define("greet", MacroDefinition::new(Vec::new(), "cout << 1;"))
        .unwrap();
    match outcome {
        SaveOutcome::Unsaved(StoreError::Io { path: failed, .. }) => assert_eq!(failed, path),
        other => panic!("expected a failed save, got {:?}", other),
    }
    assert!(store.contains("greet"));
    let _ = fs::remove_dir_all(dir);
}

#[test]
fn builtin_collision_leaves_file_untouched() {
    let dir = unique_temp_dir("collision");
    let path = dir.join("user_keywords.db");
    let (mut store, _) = MacroStore::load(&path);

    let err = store
        .define("for", MacroDefinition::new(Vec::new(), "x"))
        .unwrap_err();
    assert!(matches!(err, StoreError::BuiltinCollision(ref name) if name == "for"));
    assert!(!path.exists());
    let _ = fs::remove_dir_all(dir);
}
