use crate::fragment::Aggregate;
use std::fmt::{self, Write};

/// Header every generated program starts with.
pub const CORE_INCLUDE: &str = "<iostream>";
pub const DEFAULT_INDENT: usize = 4;

/// `vector` becomes `<vector>`; bracketed and quoted spellings are kept.
pub fn header_spelling(raw: &str) -> Option<String> {
    let raw = raw.trim();
    if raw.is_empty() {
        None
    } else if raw.starts_with('<') || raw.starts_with('"') {
        Some(raw.to_string())
    } else {
        Some(format!("<{}>", raw))
    }
}

/// Renders an [`Aggregate`] as one self-contained program.
#[derive(Debug, Clone, Copy)]
pub struct ProgramAssembler {
    indent: usize,
}

impl Default for ProgramAssembler {
    fn default() -> Self {
        Self::new(DEFAULT_INDENT)
    }
}

impl ProgramAssembler {
    pub fn new(indent: usize) -> Self {
        ProgramAssembler { indent }
    }

    /// Core include first, then every other include once, in first-seen order.
    pub fn includes(&self, aggregate: &Aggregate) -> Vec<String> {
        let mut seen = vec![CORE_INCLUDE.to_string()];
        for header in aggregate.includes.iter().filter_map(|h| header_spelling(h)) {
            if !seen.contains(&header) {
                seen.push(header);
            }
        }
        seen
    }

    pub fn render<W: Write>(&self, aggregate: &Aggregate, out: &mut W) -> fmt::Result {
        for header in self.includes(aggregate) {
            writeln!(out, "#include {}", header)?;
        }
        writeln!(out)?;
        writeln!(out, "using namespace std;")?;
        writeln!(out)?;

        if !aggregate.top.is_empty() {
            for declaration in &aggregate.top {
                writeln!(out, "{}", declaration.trim_end_matches('\n'))?;
            }
            writeln!(out)?;
        }

        let pad = " ".repeat(self.indent);
        writeln!(out, "int main() {{")?;
        for statement in &aggregate.body {
            for line in statement.split('\n') {
                if line.trim().is_empty() {
                    writeln!(out)?;
                } else {
                    writeln!(out, "{}{}", pad, line)?;
                }
            }
        }
        writeln!(out, "{}return 0;", pad)?;
        writeln!(out, "}}")
    }

    pub fn assemble(&self, aggregate: &Aggregate) -> String {
        let mut out = String::new();
        // Writing into a String cannot fail.
        let _ = self.render(aggregate, &mut out);
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fragment::Fragment;

    #[test]
    fn header_spelling_wraps_bare_names() {
        assert_eq!(header_spelling("vector").as_deref(), Some("<vector>"));
        assert_eq!(header_spelling("\"local.h\"").as_deref(), Some("\"local.h\""));
        assert_eq!(header_spelling("  "), None);
    }

    #[test]
    fn includes_dedup_preserves_first_seen_order() {
        let mut fragment = Fragment::new();
        fragment
            .include("<vector>")
            .include("\"local.h\"")
            .include("vector")
            .include("<iostream>")
            .include("<map>");
        let aggregate: Aggregate = std::iter::once(fragment).collect();
        assert_eq!(
            ProgramAssembler::default().includes(&aggregate),
            vec!["<iostream>", "<vector>", "\"local.h\"", "<map>"]
        );
    }

    #[test]
    fn empty_aggregate_is_a_bare_main() {
        let program = ProgramAssembler::default().assemble(&Aggregate::new());
        assert_eq!(
            program,
            "#include <iostream>\n\nusing namespace std;\n\nint main() {\n    return 0;\n}\n"
        );
    }

    #[test]
    fn multi_line_statements_are_indented_per_line() {
        let mut fragment = Fragment::new();
        fragment.stmt("if (x) {\n    f();\n}");
        let aggregate: Aggregate = std::iter::once(fragment).collect();
        let program = ProgramAssembler::new(2).assemble(&aggregate);
        assert!(program.contains("\n  if (x) {\n      f();\n  }\n  return 0;\n"));
    }
}
