//! Tailored demonstrations for the builtin keywords.
//!
//! Each generator asks a few follow-up questions (tagged with the occurrence
//! they belong to) and returns a fragment. Names come from the shared
//! [`GenerationContext`] so repeated keywords do not collide.

use crate::console::{Console, EndOfInput};
use crate::driver::BuiltinHandlers;
use codegen::{Fragment, GenerationContext};
use frontend::keywords::{Builtin, BuiltinKind, CastKind, RecordKind};
use frontend::normalize::{normalize_token, split_csv};

type Generated = Result<Fragment, EndOfInput>;

/// The stock demonstration generators.
#[derive(Debug, Clone, Copy, Default)]
pub struct Demonstrations;

impl BuiltinHandlers for Demonstrations {
    fn generate(
        &self,
        builtin: Builtin,
        ctx: &mut GenerationContext,
        console: &mut dyn Console,
        tag: &str,
    ) -> Generated {
        let mut q = Questions { console, tag };
        let kw = builtin.keyword;
        match builtin.kind {
            BuiltinKind::Scalar => scalar(&mut q, ctx, kw),
            BuiltinKind::Auto => auto(&mut q, ctx),
            BuiltinKind::IfElse => if_else(&mut q, ctx),
            BuiltinKind::For => for_loop(&mut q, ctx),
            BuiltinKind::While => while_loop(&mut q, ctx, false),
            BuiltinKind::DoWhile => while_loop(&mut q, ctx, true),
            BuiltinKind::Switch => switch(&mut q, ctx),
            BuiltinKind::Return => return_stmt(&mut q),
            BuiltinKind::Record(kind) => record(&mut q, ctx, kind),
            BuiltinKind::Enum => enumeration(&mut q, ctx),
            BuiltinKind::Template => template(&mut q, ctx),
            BuiltinKind::Cast(kind) => cast(&mut q, ctx, kind),
            BuiltinKind::NewDelete => new_delete(&mut q, ctx),
            BuiltinKind::Operator => operator(&mut q, ctx),
            BuiltinKind::TryCatch => try_catch(&mut q),
            BuiltinKind::Constexpr => constexpr(&mut q, ctx),
            BuiltinKind::StaticAssert => static_assert(&mut q),
            BuiltinKind::Alignment => alignment(&mut q, ctx),
            BuiltinKind::ThreadLocal => thread_local(&mut q, ctx),
            BuiltinKind::Mutable => mutable(&mut q, ctx),
            BuiltinKind::Introspection => introspection(&mut q),
            BuiltinKind::AltToken => alt_token(&mut q, ctx, kw),
        }
    }
}

struct Questions<'c> {
    console: &'c mut dyn Console,
    tag: &'c str,
}

impl Questions<'_> {
    fn ask(&mut self, prompt: &str, default: &str) -> Result<String, EndOfInput> {
        self.console.ask(&format!("[{}] {}", self.tag, prompt), default)
    }

    fn comment(&self, text: &str) -> String {
        format!("// ({}) {}", self.tag, text)
    }
}

/// Split `name:type` into its parts; a missing type means `int`.
fn member(entry: &str) -> (&str, &str) {
    match entry.split_once(':') {
        Some((name, ty)) => (name.trim(), ty.trim()),
        None => (entry.trim(), "int"),
    }
}

fn csv_items(text: &str) -> Vec<String> {
    split_csv(text).into_iter().filter(|s| !s.is_empty()).collect()
}

/// Register the variable declared by a typed initializer such as `int n = 3`.
fn record_initializer(ctx: &mut GenerationContext, init: &str) {
    let mut words = init.split_whitespace();
    if let (Some(_), Some(rest)) = (words.next(), words.next()) {
        let name = normalize_token(rest.split('=').next().unwrap_or(rest));
        if !name.is_empty() {
            ctx.record_variable(&name);
        }
    }
}

fn scalar(q: &mut Questions, ctx: &mut GenerationContext, kw: &str) -> Generated {
    let default_value = match kw {
        "char" => "'a'",
        "bool" => "true",
        "double" => "3.14",
        "float" => "2.5f",
        "long" => "123456789L",
        "short" => "42",
        "wchar_t" => "L'a'",
        "char16_t" => "u'a'",
        "char32_t" => "U'a'",
        _ => "0",
    };
    let name = q.ask(&format!("Variable name for type '{}'", kw), "x")?;
    let init = q.ask(&format!("Initial value for {}", name), default_value)?;
    let decl = ctx.declare(kw, &name, &init);

    let mut p = Fragment::new();
    p.stmt(q.comment(&format!("Demonstrate type: {}", kw)))
        .stmt(decl.statement)
        .stmt(format!("cout << \"{0} = \" << {0} << endl;", decl.name));
    Ok(p)
}

fn auto(q: &mut Questions, ctx: &mut GenerationContext) -> Generated {
    let init_default = ctx.last_var().unwrap_or("42").to_string();
    let init = q.ask("Initializer expression for auto variable", &init_default)?;
    let base = q.ask("Variable name", "v")?;
    let decl = ctx.declare("auto", &base, &init);

    let mut p = Fragment::new();
    p.stmt(q.comment("Demonstrate auto (type deduction)"))
        .stmt(decl.statement)
        .stmt(format!("cout << \"{0} (deduced) = \" << {0} << endl;", decl.name));
    Ok(p)
}

fn if_else(q: &mut Questions, ctx: &mut GenerationContext) -> Generated {
    let cond_default = match ctx.last_var() {
        Some(var) => format!("{} > 0", var),
        None => "true".to_string(),
    };
    let cond = q.ask("Condition expression for if", &cond_default)?;
    let then_stmt = q.ask("Then-branch (single statement)", "cout << \"then\" << endl;")?;
    let else_stmt = q.ask("Else-branch (single statement)", "cout << \"else\" << endl;")?;

    let mut p = Fragment::new();
    p.stmt(q.comment("Demonstrate if/else"))
        .stmt(format!("if ({}) {{", cond))
        .stmt(format!("    {}", then_stmt))
        .stmt("} else {")
        .stmt(format!("    {}", else_stmt))
        .stmt("}");
    Ok(p)
}

fn for_loop(q: &mut Questions, ctx: &mut GenerationContext) -> Generated {
    let i = ctx.fresh_name("i");
    let init = q.ask("Initializer for for-loop", &format!("int {} = 0", i))?;
    let cond = q.ask("Condition for for-loop", &format!("{} < 5", i))?;
    let incr = q.ask("Increment expression", &format!("++{}", i))?;
    let body = q.ask("Body statement", &format!("cout << {} << endl;", i))?;

    // The counter is scoped to the loop, so it is not offered as `last_var`.
    let mut p = Fragment::new();
    p.stmt(q.comment("Demonstrate for loop"))
        .stmt(format!("for ({}; {}; {}) {{", init, cond, incr))
        .stmt(format!("    {}", body))
        .stmt("}");
    Ok(p)
}

fn while_loop(q: &mut Questions, ctx: &mut GenerationContext, post_test: bool) -> Generated {
    let n = ctx.fresh_name("n");
    let init = q.ask("Initializer (e.g., int n = 3)", &format!("int {} = 3", n))?;
    let cond_prompt = if post_test { "Condition (after body)" } else { "Condition" };
    let cond = q.ask(cond_prompt, &format!("{}-- > 0", n))?;
    let body = q.ask("Loop body", &format!("cout << {} << endl;", n))?;
    record_initializer(ctx, &init);

    let mut p = Fragment::new();
    if post_test {
        p.stmt(q.comment("Demonstrate do/while"))
            .stmt(format!("{};", init))
            .stmt("do {")
            .stmt(format!("    {}", body))
            .stmt(format!("}} while ({});", cond));
    } else {
        p.stmt(q.comment("Demonstrate while"))
            .stmt(format!("{};", init))
            .stmt(format!("while ({}) {{", cond))
            .stmt(format!("    {}", body))
            .stmt("}");
    }
    Ok(p)
}

fn switch(q: &mut Questions, ctx: &mut GenerationContext) -> Generated {
    let n = ctx.fresh_name("n");
    let init = q.ask("Initializer (e.g., int n = 2)", &format!("int {} = 2", n))?;
    let expr = q.ask("Expression to switch on", &n)?;
    let cases = q.ask("Comma-separated case values", "1,2,3")?;
    record_initializer(ctx, &init);

    let mut p = Fragment::new();
    p.stmt(q.comment("Demonstrate switch"))
        .stmt(format!("{};", init))
        .stmt(format!("switch ({}) {{", expr));
    for case in csv_items(&cases) {
        p.stmt(format!(
            "    case {0}: cout << \"case {0}\" << endl; break;",
            case
        ));
    }
    p.stmt("    default: cout << \"default\" << endl; break;").stmt("}");
    Ok(p)
}

fn return_stmt(q: &mut Questions) -> Generated {
    let expr = q.ask("Expression to return from main", "0")?;
    let mut p = Fragment::new();
    p.stmt(q.comment("Demonstrate return"))
        .stmt(format!("cout << \"About to return: \" << ({}) << endl;", expr))
        .stmt(format!("return {};", expr));
    Ok(p)
}

fn record(q: &mut Questions, ctx: &mut GenerationContext, kind: RecordKind) -> Generated {
    let (kw, base) = match kind {
        RecordKind::Class => ("class", "MyType"),
        RecordKind::Struct => ("struct", "MyType"),
        RecordKind::Union => ("union", "MyUnion"),
    };
    let name = q.ask(
        &format!("Name for {}", kw),
        &ctx.fresh_type_name(base),
    )?;
    let members = csv_items(&q.ask("Comma-separated members (name:type)", "value:int")?);
    ctx.declare_type(&name);

    let mut p = Fragment::new();
    if kind == RecordKind::Union {
        let mut def = format!("union {} {{", name);
        for entry in &members {
            let (n, t) = member(entry);
            def.push_str(&format!("\n    {} {};", t, n));
        }
        def.push_str("\n};");
        p.top(def);

        let decl = ctx.declare(&name, &format!("{}_u", name.to_lowercase()), "{}");
        p.stmt(q.comment("Demonstrate union")).stmt(decl.statement);
        if let Some(first) = members.first() {
            let (n, _) = member(first);
            p.stmt(format!("{}.{} = 123;", decl.name, n)).stmt(format!(
                "cout << \"{0}.{1} = \" << {0}.{1} << endl;",
                decl.name, n
            ));
        }
        return Ok(p);
    }

    let mut def = format!("{} {} {{\npublic:\n", kw, name);
    for entry in &members {
        let (n, t) = member(entry);
        def.push_str(&format!("    {} {};\n", t, n));
    }
    let ctor_params: Vec<String> = members
        .iter()
        .map(|entry| {
            let (n, t) = member(entry);
            format!("{} {}_", t, n)
        })
        .collect();
    let inits: Vec<String> = members
        .iter()
        .map(|entry| {
            let (n, _) = member(entry);
            format!("{0}({0}_)", n)
        })
        .collect();
    if inits.is_empty() {
        def.push_str(&format!("    {}() {{}}\n}};", name));
    } else {
        def.push_str(&format!(
            "    {}({}) : {} {{}}\n}};",
            name,
            ctor_params.join(", "),
            inits.join(", ")
        ));
    }
    p.top(def);

    let args: Vec<&str> = members
        .iter()
        .map(|entry| match member(entry).1 {
            "string" | "std::string" => "\"hi\"",
            "double" | "float" => "3.14",
            _ => "0",
        })
        .collect();
    let obj = ctx.fresh_name("obj");
    ctx.record_variable(&obj);
    p.stmt(q.comment(&format!("Demonstrate {}", kw)))
        .stmt(format!("{} {}({});", name, obj, args.join(", ")));
    if let Some(first) = members.first() {
        let (n, _) = member(first);
        p.stmt(format!("cout << \"{0}.{1} = \" << {0}.{1} << endl;", obj, n));
    }
    if members.iter().any(|m| member(m).1.contains("string")) {
        p.include("<string>");
    }
    Ok(p)
}

fn enumeration(q: &mut Questions, ctx: &mut GenerationContext) -> Generated {
    let name = q.ask("Enum name", &ctx.fresh_type_name("Color"))?;
    let mut items = csv_items(&q.ask("Comma-separated enumerators", "Red,Green,Blue")?);
    if items.is_empty() {
        items.push("Value".to_string());
    }
    ctx.declare_type(&name);

    let mut p = Fragment::new();
    p.top(format!("enum class {} {{ {} }};", name, items.join(", ")));
    let decl = ctx.declare(&name, "c", &format!("{}::{}", name, items[0]));
    p.stmt(q.comment("Demonstrate enum"))
        .stmt(decl.statement)
        .stmt(format!("cout << static_cast<int>({}) << endl;", decl.name));
    Ok(p)
}

fn template(q: &mut Questions, ctx: &mut GenerationContext) -> Generated {
    let kind = q.ask("Template kind ('function' or 'class')", "function")?;
    let mut p = Fragment::new();
    if kind.trim() == "class" {
        let name = q.ask("Template class name", &ctx.fresh_type_name("Box"))?;
        let tparam = q.ask("Type parameter name", "T")?;
        ctx.declare_type(&name);
        p.top(format!(
            "template <typename {1}>\nstruct {0} {{ {1} value; {0}({1} v) : value(v) {{}} }};",
            name, tparam
        ));
        let decl = ctx.declare(&format!("{}<int>", name), "b", "5");
        p.stmt(q.comment("Demonstrate class template"))
            .stmt(decl.statement)
            .stmt(format!("cout << {}.value << endl;", decl.name));
    } else {
        let name = q.ask("Template function name", &ctx.fresh_type_name("add"))?;
        let tparam = q.ask("Type parameter name", "T")?;
        ctx.declare_type(&name);
        p.top(format!(
            "template <typename {1}>\n{1} {0}({1} a, {1} b) {{ return a + b; }}",
            name, tparam
        ));
        p.stmt(q.comment("Demonstrate function template"))
            .stmt(format!("cout << {}(2, 3) << endl;", name));
    }
    Ok(p)
}

fn cast(q: &mut Questions, ctx: &mut GenerationContext, kind: CastKind) -> Generated {
    let mut p = Fragment::new();
    match kind {
        CastKind::Static => {
            let from = q.ask("Source expression (e.g., 3.14)", "3.14")?;
            let to = q.ask("Target type (e.g., int)", "int")?;
            let decl = ctx.declare(&to, "v", &format!("static_cast<{}>({})", to, from));
            p.stmt(q.comment("Demonstrate static_cast"))
                .stmt(decl.statement)
                .stmt(format!("cout << {} << endl;", decl.name));
        }
        CastKind::Dynamic => {
            if !ctx.has_type("Derived") {
                ctx.declare_type("Base");
                ctx.declare_type("Derived");
                p.top("struct Base { virtual ~Base() = default; };")
                    .top("struct Derived : Base { int x = 42; };");
            }
            let base = ctx.declare("Base*", "base", "new Derived()");
            p.stmt(q.comment("Demonstrate dynamic_cast"))
                .stmt(base.statement)
                .stmt(format!(
                    "if (Derived* d = dynamic_cast<Derived*>({})) {{",
                    base.name
                ))
                .stmt("    cout << \"dynamic_cast succeeded: \" << d->x << endl;")
                .stmt("} else {")
                .stmt("    cout << \"dynamic_cast failed\" << endl;")
                .stmt("}")
                .stmt(format!("delete {};", base.name));
        }
        CastKind::Const => {
            let ci = ctx.declare("const int", "ci", "10");
            let r = ctx.declare("int&", "r", &format!("const_cast<int&>({})", ci.name));
            p.stmt(q.comment("Demonstrate const_cast (illustrative)"))
                .stmt(ci.statement)
                .stmt(r.statement)
                .stmt(format!("{} = 20; // undefined behavior but illustrative", r.name))
                .stmt(format!(
                    "cout << \"{0} (after const_cast attempt) = \" << {0} << endl;",
                    ci.name
                ));
        }
        CastKind::Reinterpret => {
            let x = ctx.declare("int", "word", "0x12345678");
            let bytes = ctx.declare("char*", "bytes", &format!("reinterpret_cast<char*>(&{})", x.name));
            p.stmt(q.comment("Demonstrate reinterpret_cast"))
                .stmt(x.statement)
                .stmt(bytes.statement)
                .stmt(format!(
                    "cout << \"First byte (interpretation): \" << static_cast<int>({}[0]) << endl;",
                    bytes.name
                ));
        }
    }
    Ok(p)
}

fn new_delete(q: &mut Questions, ctx: &mut GenerationContext) -> Generated {
    let ty = q.ask("Type to allocate", "int")?;
    let init = q.ask("Initial value", "42")?;
    let ptr = ctx.declare(&format!("{}*", ty), "p", &format!("new {}({})", ty, init));
    let mut p = Fragment::new();
    p.stmt(q.comment("Demonstrate new/delete"))
        .stmt(ptr.statement)
        .stmt(format!("cout << \"*{0} = \" << *{0} << endl;", ptr.name))
        .stmt(format!("delete {};", ptr.name));
    Ok(p)
}

fn ensure_point(p: &mut Fragment, ctx: &mut GenerationContext) {
    if !ctx.has_type("Point") {
        ctx.declare_type("Point");
        p.top("struct Point { int x, y; Point(int x_, int y_) : x(x_), y(y_) {} };");
    }
}

fn ensure_point_plus(p: &mut Fragment, ctx: &mut GenerationContext) {
    if !ctx.has_type("operator+(Point)") {
        ctx.declare_type("operator+(Point)");
        p.top("Point operator+(const Point& a, const Point& b) { return Point(a.x + b.x, a.y + b.y); }");
    }
}

fn operator(q: &mut Questions, ctx: &mut GenerationContext) -> Generated {
    let op = q.ask("Operator to demonstrate/overload (e.g. +, <<)", "+")?;
    let mut p = Fragment::new();
    ensure_point(&mut p, ctx);
    let a = ctx.declare("Point", "pa", "Point(1, 2)");
    let b = ctx.declare("Point", "pb", "Point(3, 4)");

    if op.trim() == "<<" {
        if !ctx.has_type("operator<<(Point)") {
            ctx.declare_type("operator<<(Point)");
            p.top("std::ostream& operator<<(std::ostream& os, const Point& p) { return os << '(' << p.x << ',' << p.y << ')'; }");
        }
        p.stmt(q.comment("Demonstrate operator<<"))
            .stmt(a.statement)
            .stmt(b.statement)
            .stmt(format!("cout << {} << \" \" << {} << endl;", a.name, b.name));
        return Ok(p);
    }

    if op.trim() == "+" {
        p.stmt(q.comment("Demonstrate operator+"));
    } else {
        p.stmt(q.comment(&format!(
            "Operator '{}' not specially implemented; showing operator+ instead",
            op.trim()
        )));
    }
    ensure_point_plus(&mut p, ctx);
    let c = ctx.declare("Point", "pc", &format!("{} + {}", a.name, b.name));
    p.stmt(a.statement)
        .stmt(b.statement)
        .stmt(c.statement)
        .stmt(format!(
            "cout << \"{0} = (\" << {0}.x << \",\" << {0}.y << \")\" << endl;",
            c.name
        ));
    Ok(p)
}

fn try_catch(q: &mut Questions) -> Generated {
    let msg = q.ask("Exception message to throw", "Something went wrong")?;
    let mut p = Fragment::new();
    p.include("<stdexcept>")
        .stmt(q.comment("Demonstrate try/catch/throw"))
        .stmt("try {")
        .stmt(format!("    throw std::runtime_error(\"{}\");", msg))
        .stmt("} catch (const std::exception& e) {")
        .stmt("    cout << \"Caught: \" << e.what() << endl;")
        .stmt("}");
    Ok(p)
}

/// Name of the function declared by `int square(int x){...}`.
fn function_name(signature: &str) -> Option<&str> {
    let head = signature.split('(').next()?.trim_end();
    let name = head.rsplit(|c: char| c.is_whitespace() || c == '*' || c == '&').next()?;
    if name.is_empty() {
        None
    } else {
        Some(name)
    }
}

fn constexpr(q: &mut Questions, ctx: &mut GenerationContext) -> Generated {
    let expr = q.ask(
        "Provide either a constexpr function or a constant expression",
        "int square(int x){return x*x;}",
    )?;
    let mut p = Fragment::new();
    if expr.contains('{') {
        let name = function_name(&expr).unwrap_or("square").to_string();
        p.top(format!("constexpr {}", expr))
            .stmt(q.comment("Demonstrate constexpr function"))
            .stmt(format!("cout << {}(5) << endl;", name));
    } else {
        let decl = ctx.declare("constexpr auto", "cv", &expr);
        p.stmt(q.comment("Demonstrate constexpr value"))
            .stmt(decl.statement)
            .stmt(format!("cout << {} << endl;", decl.name));
    }
    Ok(p)
}

fn static_assert(q: &mut Questions) -> Generated {
    let cond = q.ask("Condition to assert at compile time", "sizeof(int) >= 4")?;
    let msg = q.ask("Message for static_assert", "int_size_ok")?;
    let mut p = Fragment::new();
    p.top(format!("static_assert({}, \"{}\");", cond, msg))
        .stmt(q.comment("static_assert present above; runtime note:"))
        .stmt("cout << \"static_assert present; program compiled successfully\" << endl;");
    Ok(p)
}

fn alignment(q: &mut Questions, ctx: &mut GenerationContext) -> Generated {
    let mut p = Fragment::new();
    if !ctx.has_type("Aligned") {
        ctx.declare_type("Aligned");
        p.top("struct alignas(32) Aligned { char data[64]; };");
    }
    let decl = ctx.fresh_name("aligned");
    ctx.record_variable(&decl);
    p.stmt(q.comment("Demonstrate alignas/alignof"))
        .stmt(format!("Aligned {};", decl))
        .stmt(format!(
            "cout << \"alignof(Aligned) = \" << alignof(Aligned) << \", sizeof = \" << sizeof({}) << endl;",
            decl
        ));
    Ok(p)
}

fn thread_local(q: &mut Questions, ctx: &mut GenerationContext) -> Generated {
    let name = q.ask("Thread-local variable name", &ctx.fresh_name("counter"))?;
    let init = q.ask("Initial value", "0")?;
    ctx.record_variable(&name);
    let mut p = Fragment::new();
    p.top(format!("thread_local int {} = {};", name, init))
        .stmt(q.comment("Demonstrate thread_local"))
        .stmt(format!("cout << \"{0} = \" << {0} << endl;", name));
    Ok(p)
}

fn mutable(q: &mut Questions, ctx: &mut GenerationContext) -> Generated {
    let member = q.ask("Mutable member name", "cached")?;
    let ty = ctx.fresh_type_name("S");
    ctx.declare_type(&ty);
    let obj = ctx.fresh_name("s");
    ctx.record_variable(&obj);

    let mut p = Fragment::new();
    p.top(format!(
        "struct {0} {{ mutable int {1} = 0; int value = 0; int get() const {{ return {1} = value; }} }};",
        ty, member
    ))
    .stmt(q.comment("Demonstrate mutable"))
    .stmt(format!("{} {}{{0, 7}};", ty, obj))
    .stmt(format!("cout << \"get() = \" << {}.get() << endl;", obj));
    Ok(p)
}

fn introspection(q: &mut Questions) -> Generated {
    let expr = q.ask("Expression or type to inspect", "int")?;
    let mut p = Fragment::new();
    p.include("<typeinfo>")
        .stmt(q.comment("Demonstrate sizeof and typeid"))
        .stmt(format!(
            "cout << \"sizeof({0}) = \" << sizeof({0}) << endl;",
            expr
        ))
        .stmt(format!(
            "cout << \"typeid({0}).name() = \" << typeid({0}).name() << endl;",
            expr
        ));
    Ok(p)
}

fn alt_token(q: &mut Questions, ctx: &mut GenerationContext, kw: &str) -> Generated {
    let mut p = Fragment::new();
    if !matches!(kw, "and" | "or" | "not") {
        p.stmt(q.comment(&format!("Demonstrate alternative token: {}", kw)))
            .stmt(format!("cout << \"Alternative token: {}\" << endl;", kw));
        return Ok(p);
    }

    p.stmt(q.comment("Demonstrate alternative tokens like 'and'/'or'/'not'"));
    let var = match ctx.last_var() {
        Some(var) => var.to_string(),
        None => {
            let decl = ctx.declare("int", "a", "1");
            p.stmt(decl.statement);
            decl.name
        }
    };
    let expr = q.ask(
        "A simple Boolean expression (you may use alternative tokens)",
        &format!("{0} > 0 and not ({0} > 100)", var),
    )?;
    p.stmt(format!(
        "if ({}) cout << \"expression true\" << endl; else cout << \"expression false\" << endl;",
        expr
    ));
    Ok(p)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::console::ScriptedConsole;

    fn run(keyword: &str, answers: &[&str], ctx: &mut GenerationContext) -> Fragment {
        let builtin = Builtin::classify(keyword).expect("tailored builtin");
        let mut console = ScriptedConsole::new(answers.iter().copied());
        Demonstrations
            .generate(builtin, ctx, &mut console, "occurrence 1 (token 1)")
            .expect("enough scripted answers")
    }

    #[test]
    fn repeated_scalar_defaults_do_not_collide() {
        let mut ctx = GenerationContext::new();
        let first = run("int", &["", ""], &mut ctx);
        let second = run("double", &["", ""], &mut ctx);
        assert_eq!(first.body[1], "int x = 0;");
        assert_eq!(second.body[1], "double x1 = 3.14;");
        assert_eq!(second.body[2], "cout << \"x1 = \" << x1 << endl;");
    }

    #[test]
    fn if_condition_defaults_to_last_variable() {
        let mut ctx = GenerationContext::new();
        run("int", &["count", "7"], &mut ctx);
        let fragment = run("if", &["", "", ""], &mut ctx);
        assert_eq!(fragment.body[1], "if (count > 0) {");
    }

    #[test]
    fn while_loops_pick_fresh_counters() {
        let mut ctx = GenerationContext::new();
        let first = run("while", &["", "", ""], &mut ctx);
        let second = run("do", &["", "", ""], &mut ctx);
        assert_eq!(first.body[1], "int n = 3;");
        assert_eq!(second.body[1], "int n1 = 3;");
        assert_eq!(second.body[4], "} while (n1-- > 0);");
        assert_eq!(ctx.last_var(), Some("n1"));
    }

    #[test]
    fn struct_declares_type_and_constructor() {
        let mut ctx = GenerationContext::new();
        let fragment = run("struct", &["", "name:string,age:int"], &mut ctx);
        assert_eq!(
            fragment.top[0],
            "struct MyType {\npublic:\n    string name;\n    int age;\n    MyType(string name_, int age_) : name(name_), age(age_) {}\n};"
        );
        assert_eq!(fragment.body[1], "MyType obj(\"hi\", 0);");
        assert_eq!(fragment.includes, vec!["<string>"]);
        assert_eq!(ctx.fresh_type_name("MyType"), "MyType2");
    }

    #[test]
    fn shared_top_level_helpers_are_emitted_once() {
        let mut ctx = GenerationContext::new();
        let first = run("operator", &[""], &mut ctx);
        let second = run("operator", &["<<"], &mut ctx);
        assert_eq!(first.top.len(), 2);
        assert_eq!(second.top.len(), 1);
        assert!(second.top[0].starts_with("std::ostream& operator<<"));
        assert!(second.body.contains(&"Point pa1 = Point(1, 2);".to_string()));
    }

    #[test]
    fn try_requests_stdexcept() {
        let mut ctx = GenerationContext::new();
        let fragment = run("throw", &["bad"], &mut ctx);
        assert_eq!(fragment.includes, vec!["<stdexcept>"]);
        assert!(fragment.body.contains(&"    throw std::runtime_error(\"bad\");".to_string()));
    }

    #[test]
    fn constexpr_function_call_uses_declared_name() {
        let mut ctx = GenerationContext::new();
        let fragment = run("constexpr", &["long cube(long v){return v*v*v;}"], &mut ctx);
        assert_eq!(fragment.top[0], "constexpr long cube(long v){return v*v*v;}");
        assert_eq!(fragment.body[1], "cout << cube(5) << endl;");
    }

    #[test]
    fn end_of_input_propagates() {
        let builtin = Builtin::classify("for").unwrap();
        let mut console = ScriptedConsole::new(["int k = 0"]);
        let result = Demonstrations.generate(
            builtin,
            &mut GenerationContext::new(),
            &mut console,
            "occurrence 1 (token 1)",
        );
        assert_eq!(result, Err(EndOfInput));
    }
}
