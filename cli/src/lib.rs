pub mod commands;
pub mod config;
pub mod console;
pub mod driver;
pub mod handlers;
pub mod repl;

use frontend::macro_store::MacroStore;

/// One line per stored keyword, `name (params: a=1, b=2)` style.
pub fn keyword_summary(store: &MacroStore) -> Vec<String> {
    store
        .iter()
        .map(|(name, definition)| {
            if definition.params.is_empty() {
                name.to_string()
            } else {
                let params: Vec<String> = definition
                    .params
                    .iter()
                    .map(|p| format!("{}={}", p.name, p.default))
                    .collect();
                format!("{} (params: {})", name, params.join(", "))
            }
        })
        .collect()
}
