use std::collections::BTreeSet;

/// Per-line generation state shared by every occurrence on that line.
///
/// Variable names handed out here are unique for the whole generated program.
#[derive(Debug, Clone, Default)]
pub struct GenerationContext {
    vars: BTreeSet<String>,
    types: BTreeSet<String>,
    last_var: Option<String>,
    last_type: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Declaration {
    /// `type name = init;`
    pub statement: String,
    pub name: String,
}

impl GenerationContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// First free name among `base`, `base1`, `base2`, ...
    pub fn fresh_name(&self, base: &str) -> String {
        let mut name = base.to_string();
        let mut suffix = 1;
        while self.vars.contains(&name) {
            name = format!("{}{}", base, suffix);
            suffix += 1;
        }
        name
    }

    /// Declare a variable under a collision-free name and make it the
    /// "last variable".
    pub fn declare(&mut self, ty: &str, base: &str, init: &str) -> Declaration {
        let name = self.fresh_name(base);
        self.record_variable(&name);
        Declaration {
            statement: format!("{} {} = {};", ty, name, init),
            name,
        }
    }

    /// Register a variable introduced by user-typed code (a loop counter, a
    /// deduced `auto`) without emitting a declaration.
    pub fn record_variable(&mut self, name: &str) {
        self.vars.insert(name.to_string());
        self.last_var = Some(name.to_string());
    }

    /// First free type name among `base`, `base2`, `base3`, ...
    pub fn fresh_type_name(&self, base: &str) -> String {
        let mut name = base.to_string();
        let mut suffix = 2;
        while self.types.contains(&name) {
            name = format!("{}{}", base, suffix);
            suffix += 1;
        }
        name
    }

    pub fn declare_type(&mut self, name: &str) {
        self.types.insert(name.to_string());
        self.last_type = Some(name.to_string());
    }

    pub fn has_type(&self, name: &str) -> bool {
        self.types.contains(name)
    }

    pub fn last_var(&self) -> Option<&str> {
        self.last_var.as_deref()
    }

    pub fn last_type(&self) -> Option<&str> {
        self.last_type.as_deref()
    }
}
