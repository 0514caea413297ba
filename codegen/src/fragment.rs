/// Output of a single keyword occurrence.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Fragment {
    /// Header spellings such as `<vector>` or `"local.h"`.
    pub includes: Vec<String>,
    /// Types and free functions placed before `main`.
    pub top: Vec<String>,
    /// Statements placed inside `main`.
    pub body: Vec<String>,
}

impl Fragment {
    pub fn new() -> Self {
        Self::default()
    }

    /// A fragment made only of one comment explaining why nothing was
    /// generated for this occurrence.
    pub fn error(tag: &str, message: &str) -> Self {
        Fragment {
            body: vec![format!("// ({}) error: {}", tag, message)],
            ..Self::default()
        }
    }

    pub fn include(&mut self, header: impl Into<String>) -> &mut Self {
        self.includes.push(header.into());
        self
    }

    pub fn top(&mut self, declaration: impl Into<String>) -> &mut Self {
        self.top.push(declaration.into());
        self
    }

    pub fn stmt(&mut self, statement: impl Into<String>) -> &mut Self {
        self.body.push(statement.into());
        self
    }
}

/// Fragments of every occurrence on a line, concatenated in order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Aggregate {
    pub includes: Vec<String>,
    pub top: Vec<String>,
    pub body: Vec<String>,
}

impl Aggregate {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn append(&mut self, fragment: Fragment) {
        self.includes.extend(fragment.includes);
        self.top.extend(fragment.top);
        self.body.extend(fragment.body);
    }
}

impl FromIterator<Fragment> for Aggregate {
    fn from_iter<I: IntoIterator<Item = Fragment>>(iter: I) -> Self {
        let mut aggregate = Aggregate::new();
        for fragment in iter {
            aggregate.append(fragment);
        }
        aggregate
    }
}
