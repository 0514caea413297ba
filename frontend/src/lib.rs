pub mod diagnostics;
pub mod expander;
pub mod keywords;
pub mod macro_store;
pub mod normalize;
pub mod registry;
pub mod resolver;

pub use keywords::{Builtin, BuiltinKind};
pub use macro_store::{MacroDefinition, MacroStore, SaveOutcome, StoreError};
pub use normalize::{normalize_token, Param};
pub use registry::{handler_for, Handler};
pub use resolver::{resolve, resolve_with_store, Occurrence};
