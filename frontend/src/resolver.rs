use crate::keywords::is_builtin;
use crate::macro_store::MacroStore;
use crate::normalize::normalize_token;
use std::fmt;

/// One appearance of a recognised keyword within an input line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Occurrence {
    pub keyword: String,
    /// 1-based index in the occurrence list.
    pub index: usize,
    /// 1-based position of the token in the whitespace-split line.
    pub position: usize,
}

impl Occurrence {
    /// Label used in prompts and generated comments.
    pub fn tag(&self) -> String {
        format!("occurrence {} (token {})", self.index, self.position)
    }
}

impl fmt::Display for Occurrence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] '{}'(token {})", self.index, self.keyword, self.position)
    }
}

pub fn tokenize(line: &str) -> Vec<&str> {
    line.split_whitespace().collect()
}

/// Every token whose normalised form satisfies `is_known`, in input order,
/// duplicates included.
pub fn resolve<F>(line: &str, is_known: F) -> Vec<Occurrence>
where
    F: Fn(&str) -> bool,
{
    let mut occurrences = Vec::new();
    for (idx, token) in tokenize(line).into_iter().enumerate() {
        let keyword = normalize_token(token);
        if keyword.is_empty() || !is_known(&keyword) {
            continue;
        }
        occurrences.push(Occurrence {
            keyword,
            index: occurrences.len() + 1,
            position: idx + 1,
        });
    }
    occurrences
}

/// Resolve against the builtin table plus the user-defined keywords in `store`.
pub fn resolve_with_store(line: &str, store: &MacroStore) -> Vec<Occurrence> {
    resolve(line, |name| is_builtin(name) || store.contains(name))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::macro_store::MacroDefinition;

    fn keywords(occurrences: &[Occurrence]) -> Vec<(&str, usize)> {
        occurrences
            .iter()
            .map(|o| (o.keyword.as_str(), o.position))
            .collect()
    }

    #[test]
    fn keeps_duplicates_in_token_order() {
        let occurrences = resolve_with_store("int then for, and int again", &MacroStore::detached());
        assert_eq!(
            keywords(&occurrences),
            vec![("int", 1), ("for", 3), ("and", 4), ("int", 5)]
        );
        let indices: Vec<usize> = occurrences.iter().map(|o| o.index).collect();
        assert_eq!(indices, vec![1, 2, 3, 4]);
    }

    #[test]
    fn skips_tokens_that_normalize_to_nothing() {
        let occurrences = resolve_with_store("{ ; WHILE! }", &MacroStore::detached());
        assert_eq!(keywords(&occurrences), vec![("while", 3)]);
    }

    #[test]
    fn user_keywords_are_recognised() {
        let mut store = MacroStore::detached();
        let _ = store
            .define("greet", MacroDefinition::new(Vec::new(), "x"))
            .unwrap();
        let occurrences = resolve_with_store("please greet then return", &store);
        assert_eq!(keywords(&occurrences), vec![("greet", 2), ("return", 4)]);
    }

    #[test]
    fn tag_names_index_and_token() {
        let occurrences = resolve("a b for", |name| name == "for");
        assert_eq!(occurrences[0].tag(), "occurrence 1 (token 3)");
        assert_eq!(occurrences[0].to_string(), "[1] 'for'(token 3)");
    }
}
