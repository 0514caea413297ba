use crate::keywords::{is_builtin, Builtin};
use crate::macro_store::{MacroDefinition, MacroStore};

/// How one recognised keyword is turned into a fragment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Handler<'a> {
    Builtin(Builtin),
    Macro {
        name: &'a str,
        definition: &'a MacroDefinition,
    },
    /// A builtin with no tailored demonstration.
    Fallback(&'a str),
}

/// Route a canonical keyword name. `None` means the name is not recognised.
pub fn handler_for<'a>(name: &'a str, store: &'a MacroStore) -> Option<Handler<'a>> {
    if let Some(definition) = store.get(name) {
        return Some(Handler::Macro { name, definition });
    }
    if let Some(builtin) = Builtin::classify(name) {
        return Some(Handler::Builtin(builtin));
    }
    if is_builtin(name) {
        return Some(Handler::Fallback(name));
    }
    None
}
