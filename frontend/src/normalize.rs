//! Token canonicalisation shared by the resolver, the macro store and the
//! interactive definition flow.

/// Canonical keyword name for a raw token: leading and trailing ASCII
/// punctuation stripped, the remainder lowercased.
///
/// Interior punctuation survives, so `static_cast` and `and_eq` stay intact
/// while `(for;` becomes `for`.
pub fn normalize_token(token: &str) -> String {
    token
        .trim_matches(|c: char| c.is_ascii_punctuation())
        .to_lowercase()
}

/// Split a comma-separated list, trimming every item.
pub fn split_csv(text: &str) -> Vec<String> {
    text.split(',').map(|item| item.trim().to_string()).collect()
}

/// A declared macro parameter and its default value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Param {
    pub name: String,
    pub default: String,
}

impl Param {
    pub fn new(name: impl Into<String>, default: impl Into<String>) -> Self {
        Param {
            name: name.into(),
            default: default.into(),
        }
    }
}

/// Parse a `name=default,other=value` list.
///
/// A bare `name` yields an empty default. Entries whose name is empty after
/// trimming are dropped.
pub fn parse_params(text: &str) -> Vec<Param> {
    let text = text.trim();
    if text.is_empty() {
        return Vec::new();
    }
    split_csv(text)
        .into_iter()
        .filter_map(|entry| {
            let (name, default) = match entry.split_once('=') {
                Some((name, default)) => (name.trim(), default.trim()),
                None => (entry.trim(), ""),
            };
            if name.is_empty() {
                None
            } else {
                Some(Param::new(name, default))
            }
        })
        .collect()
}

/// Render a parameter list back into its `name=default` form.
pub fn format_params(params: &[Param]) -> String {
    params
        .iter()
        .map(|p| format!("{}={}", p.name, p.default))
        .collect::<Vec<_>>()
        .join(",")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_outer_punctuation_and_lowercases() {
        assert_eq!(normalize_token("(FOR;"), "for");
        assert_eq!(normalize_token("\"int\","), "int");
        assert_eq!(normalize_token("Static_Cast"), "static_cast");
    }

    #[test]
    fn keeps_interior_punctuation() {
        assert_eq!(normalize_token("...and_eq..."), "and_eq");
        assert_eq!(normalize_token("a-b"), "a-b");
    }

    #[test]
    fn pure_punctuation_normalizes_to_empty() {
        assert_eq!(normalize_token("{};"), "");
        assert_eq!(normalize_token(""), "");
    }

    #[test]
    fn parse_params_handles_bare_names_and_empty_entries() {
        let params = parse_params(" n = 10 , label, =orphan, ,x=");
        assert_eq!(
            params,
            vec![
                Param::new("n", "10"),
                Param::new("label", ""),
                Param::new("x", ""),
            ]
        );
    }

    #[test]
    fn parse_params_keeps_equals_inside_default() {
        let params = parse_params("cond=a==b");
        assert_eq!(params, vec![Param::new("cond", "a==b")]);
    }

    #[test]
    fn format_params_is_inverse_of_parse() {
        let params = vec![Param::new("a", "1"), Param::new("b", "")];
        assert_eq!(format_params(&params), "a=1,b=");
        assert_eq!(parse_params(&format_params(&params)), params);
    }
}
