use frontend::keywords::is_builtin;
use frontend::macro_store::{MacroDefinition, MacroStore};
use frontend::normalize::normalize_token;
use frontend::resolver::{resolve_with_store, tokenize};

fn store() -> MacroStore {
    let mut store = MacroStore::detached();
    let _ = store
        .define("greet", MacroDefinition::new(Vec::new(), "cout << 1;"))
        .unwrap();
    store
}

const LINES: &[&str] = &[
    "",
    "int for while",
    "   (for;   FOR, for!  ",
    "greet the world with a class and a greet",
    "nothing to see here",
    "static_cast<int> reinterpret_cast ... ;; and_eq",
    "int int int greet int",
    "{} () ;; --",
];

#[test]
fn occurrence_count_matches_recognised_tokens() {
    let store = store();
    for line in LINES {
        let expected = tokenize(line)
            .into_iter()
            .map(normalize_token)
            .filter(|t| !t.is_empty() && (is_builtin(t) || store.contains(t)))
            .count();
        assert_eq!(resolve_with_store(line, &store).len(), expected, "line: {:?}", line);
    }
}

#[test]
fn positions_strictly_increase_and_indices_are_dense() {
    let store = store();
    for line in LINES {
        let occurrences = resolve_with_store(line, &store);
        for (i, occurrence) in occurrences.iter().enumerate() {
            assert_eq!(occurrence.index, i + 1);
        }
        for pair in occurrences.windows(2) {
            assert!(pair[0].position < pair[1].position, "line: {:?}", line);
        }
    }
}

#[test]
fn duplicates_are_preserved_in_order() {
    let occurrences = resolve_with_store("int int int greet int", &store());
    let names: Vec<&str> = occurrences.iter().map(|o| o.keyword.as_str()).collect();
    assert_eq!(names, vec!["int", "int", "int", "greet", "int"]);
    assert_eq!(occurrences[3].tag(), "occurrence 4 (token 4)");
}
