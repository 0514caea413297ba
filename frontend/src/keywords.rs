//! The closed set of builtin keywords and the handler family each one maps to.

/// Every C++17 keyword, sorted.
pub const BUILTIN_KEYWORDS: &[&str] = &[
    "alignas", "alignof", "and", "and_eq", "asm", "auto", "bitand", "bitor", "bool", "break",
    "case", "catch", "char", "char16_t", "char32_t", "class", "compl", "const", "const_cast",
    "constexpr", "continue", "decltype", "default", "delete", "do", "double", "dynamic_cast",
    "else", "enum", "explicit", "export", "extern", "false", "float", "for", "friend", "goto",
    "if", "inline", "int", "long", "mutable", "namespace", "new", "noexcept", "not", "not_eq",
    "nullptr", "operator", "or", "or_eq", "private", "protected", "public", "register",
    "reinterpret_cast", "return", "short", "signed", "sizeof", "static", "static_assert",
    "static_cast", "struct", "switch", "template", "this", "thread_local", "throw", "true", "try",
    "typedef", "typeid", "typename", "union", "unsigned", "using", "virtual", "void", "volatile",
    "wchar_t", "while", "xor", "xor_eq",
];

pub fn is_builtin(name: &str) -> bool {
    BUILTIN_KEYWORDS.binary_search(&name).is_ok()
}

fn interned(name: &str) -> Option<&'static str> {
    BUILTIN_KEYWORDS
        .binary_search(&name)
        .ok()
        .map(|idx| BUILTIN_KEYWORDS[idx])
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordKind {
    Class,
    Struct,
    Union,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CastKind {
    Static,
    Dynamic,
    Const,
    Reinterpret,
}

/// Demonstration family of a builtin keyword.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BuiltinKind {
    Scalar,
    Auto,
    IfElse,
    For,
    While,
    DoWhile,
    Switch,
    Return,
    Record(RecordKind),
    Enum,
    Template,
    Cast(CastKind),
    NewDelete,
    Operator,
    TryCatch,
    Constexpr,
    StaticAssert,
    Alignment,
    ThreadLocal,
    Mutable,
    Introspection,
    AltToken,
}

/// A builtin keyword that has a tailored demonstration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Builtin {
    pub keyword: &'static str,
    pub kind: BuiltinKind,
}

impl Builtin {
    /// `None` when `name` is not a builtin or is a builtin without a
    /// tailored demonstration (those go through the free-form fallback).
    pub fn classify(name: &str) -> Option<Builtin> {
        let keyword = interned(name)?;
        let kind = match keyword {
            "int" | "double" | "float" | "char" | "long" | "short" | "signed" | "unsigned"
            | "bool" | "wchar_t" | "char16_t" | "char32_t" => BuiltinKind::Scalar,
            "auto" => BuiltinKind::Auto,
            "if" | "else" => BuiltinKind::IfElse,
            "for" => BuiltinKind::For,
            "while" => BuiltinKind::While,
            "do" => BuiltinKind::DoWhile,
            "switch" => BuiltinKind::Switch,
            "return" => BuiltinKind::Return,
            "class" => BuiltinKind::Record(RecordKind::Class),
            "struct" => BuiltinKind::Record(RecordKind::Struct),
            "union" => BuiltinKind::Record(RecordKind::Union),
            "enum" => BuiltinKind::Enum,
            "template" => BuiltinKind::Template,
            "static_cast" => BuiltinKind::Cast(CastKind::Static),
            "dynamic_cast" => BuiltinKind::Cast(CastKind::Dynamic),
            "const_cast" => BuiltinKind::Cast(CastKind::Const),
            "reinterpret_cast" => BuiltinKind::Cast(CastKind::Reinterpret),
            "new" | "delete" => BuiltinKind::NewDelete,
            "operator" => BuiltinKind::Operator,
            "try" | "catch" | "throw" => BuiltinKind::TryCatch,
            "constexpr" => BuiltinKind::Constexpr,
            "static_assert" => BuiltinKind::StaticAssert,
            "alignas" | "alignof" => BuiltinKind::Alignment,
            "thread_local" => BuiltinKind::ThreadLocal,
            "mutable" => BuiltinKind::Mutable,
            "sizeof" | "typeid" => BuiltinKind::Introspection,
            "and" | "or" | "not" | "xor" | "bitand" | "bitor" | "compl" | "not_eq" | "and_eq"
            | "or_eq" | "xor_eq" => BuiltinKind::AltToken,
            _ => return None,
        };
        Some(Builtin { keyword, kind })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keyword_table_is_sorted_and_unique() {
        let mut sorted = BUILTIN_KEYWORDS.to_vec();
        sorted.sort_unstable();
        sorted.dedup();
        assert_eq!(sorted, BUILTIN_KEYWORDS);
        assert_eq!(BUILTIN_KEYWORDS.len(), 84);
    }

    #[test]
    fn classify_groups_keywords_into_families() {
        let if_kw = Builtin::classify("if").unwrap();
        let else_kw = Builtin::classify("else").unwrap();
        assert_eq!(if_kw.kind, BuiltinKind::IfElse);
        assert_eq!(else_kw.kind, BuiltinKind::IfElse);
        assert_eq!(else_kw.keyword, "else");
        assert_eq!(
            Builtin::classify("union").map(|b| b.kind),
            Some(BuiltinKind::Record(RecordKind::Union))
        );
    }

    #[test]
    fn untailored_builtins_and_unknown_names_do_not_classify() {
        assert!(is_builtin("namespace"));
        assert!(Builtin::classify("namespace").is_none());
        assert!(!is_builtin("banana"));
        assert!(Builtin::classify("banana").is_none());
    }
}
