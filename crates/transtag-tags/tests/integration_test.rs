//! Integration tests for transtag-tags crate.
//!
//! These tests compile and render templates through a real engine with both
//! directives registered, against mock translators and against catalogs
//! loaded from disk.

use proptest::prelude::*;
use serde_json::{json, Value};
use std::collections::HashMap;
use std::sync::Arc;
use transtag_common::test_utils::{create_temp_dir, init_test_logging, locale_fixtures};
use transtag_common::TransCtx;
use transtag_i18n::{TemplateTranslator, Translator};
use transtag_tags::{register, BlockTransTag, TransTag};
use transtag_template::{Context, Engine, TemplateError};

/// Answers only the calls it was primed with
#[derive(Default)]
struct MockTranslator {
    answers: HashMap<String, String>,
}

impl MockTranslator {
    fn on(mut self, call: &str, answer: &str) -> Self {
        self.answers.insert(call.to_string(), answer.to_string());
        self
    }

    fn answer(&self, call: String) -> String {
        self.answers
            .get(&call)
            .cloned()
            .unwrap_or_else(|| format!("unexpected {call}"))
    }
}

impl Translator for MockTranslator {
    fn get(&self, _ctx: &TransCtx, text: &str) -> String {
        self.answer(format!("get({text})"))
    }
    fn get_c(&self, _ctx: &TransCtx, text: &str, context: &str) -> String {
        self.answer(format!("get_c({text},{context})"))
    }
    fn get_n(&self, _ctx: &TransCtx, text: &str, plural: &str, count: i64) -> String {
        self.answer(format!("get_n({text},{plural},{count})"))
    }
    fn get_nc(&self, _ctx: &TransCtx, text: &str, plural: &str, count: i64, context: &str) -> String {
        self.answer(format!("get_nc({text},{plural},{count},{context})"))
    }
}

fn mock() -> MockTranslator {
    MockTranslator::default()
        .on("get(test)", "ok")
        .on("get(test with {{ var }})", "ok-var")
        .on("get(test with {{var2}})", "ok-var2")
        .on("get(test with {{ var3 }} {{ var4 }} post)", "ok-var3")
        .on("get_c(test,myctx)", "ok-ctx")
        .on("get_n(test-1,test-2,1)", "ok-1")
        .on("get_n(test-1,test-2,2)", "ok-2")
        .on("get_nc(test-1,test-2,1,myctx)", "ok-1-ctx")
        .on("get_nc(test-1,test-2,2,myctx)", "ok-2-ctx")
}

/// Echoes the scope it resolved in: `domain:language[:context]:text`
struct EchoTranslator;

impl EchoTranslator {
    fn echo(ctx: &TransCtx, context: Option<&str>, text: &str) -> String {
        match context {
            Some(context) => format!("{}:{}:{context}:{text}", ctx.domain, ctx.language),
            None => format!("{}:{}:{text}", ctx.domain, ctx.language),
        }
    }
}

impl Translator for EchoTranslator {
    fn get(&self, ctx: &TransCtx, text: &str) -> String {
        Self::echo(ctx, None, text)
    }
    fn get_c(&self, ctx: &TransCtx, text: &str, context: &str) -> String {
        Self::echo(ctx, Some(context), text)
    }
    fn get_n(&self, ctx: &TransCtx, text: &str, plural: &str, count: i64) -> String {
        Self::echo(ctx, None, if count == 1 { text } else { plural })
    }
    fn get_nc(&self, ctx: &TransCtx, text: &str, plural: &str, count: i64, context: &str) -> String {
        Self::echo(ctx, Some(context), if count == 1 { text } else { plural })
    }
}

/// Returns the text with its markers defused, exposing what was looked up
struct QuotingTranslator;

impl Translator for QuotingTranslator {
    fn get(&self, _ctx: &TransCtx, text: &str) -> String {
        text.replace("{{", "<").replace("}}", ">")
    }
    fn get_c(&self, ctx: &TransCtx, text: &str, _context: &str) -> String {
        self.get(ctx, text)
    }
    fn get_n(&self, ctx: &TransCtx, text: &str, _plural: &str, _count: i64) -> String {
        self.get(ctx, text)
    }
    fn get_nc(&self, ctx: &TransCtx, text: &str, _plural: &str, _count: i64, _context: &str) -> String {
        self.get(ctx, text)
    }
}

fn engine(translator: Arc<dyn Translator>) -> Arc<Engine> {
    init_test_logging();
    let mut engine = Engine::new();
    register(&mut engine, translator).unwrap();
    Arc::new(engine)
}

fn vars(value: Value) -> Context {
    match value {
        Value::Object(map) => map,
        _ => Context::new(),
    }
}

#[test]
fn test_directive_table() {
    let engine = engine(Arc::new(mock()));
    let cases = [
        (r#"{% trans "test" %}"#, "ok"),
        (r#"{% trans "test" %} post"#, "ok post"),
        (r#"pre {% trans "test" %}"#, "pre ok"),
        (r#"{% trans "test" as myvar %}{{myvar}}"#, "ok"),
        (r#"{% trans "test" context "myctx" %}"#, "ok-ctx"),
        (r#"{% trans "test" as othervar context "myctx" %}{{othervar}}"#, "ok-ctx"),
        ("{% blocktrans %}test{% endblocktrans %}", "ok"),
        ("{% blocktrans %}test{% endblocktrans %} post", "ok post"),
        ("pre {% blocktrans %}test{% endblocktrans %}", "pre ok"),
        ("{% blocktrans %}test with {{ var }}{% endblocktrans %}", "ok-var"),
        ("{% blocktrans %}test with {{var2}}{% endblocktrans %}", "ok-var2"),
        ("{% blocktrans %}test with {{ var3 }} {{ var4 }} post{% endblocktrans %}", "ok-var3"),
        ("{% blocktrans count cnt=1 %}test-1{% plural %}test-2{% endblocktrans %}", "ok-1"),
        ("{% blocktrans count cnt=2 %}test-1{% plural %}test-2{% endblocktrans %}", "ok-2"),
        (
            r#"{% blocktrans count cnt=1 context "myctx" %}test-1{% plural %}test-2{% endblocktrans %}"#,
            "ok-1-ctx",
        ),
        (
            r#"{% blocktrans count cnt=2 context "myctx" %}test-1{% plural %}test-2{% endblocktrans %}"#,
            "ok-2-ctx",
        ),
        ("{% blocktrans asvar the_title %}test{% endblocktrans%}{{the_title}}", "ok"),
        (
            r#"{% blocktrans context "myctx" asvar the_title %}test{% endblocktrans%}{{the_title}}"#,
            "ok-ctx",
        ),
        (
            "{% blocktrans count cnt=1 asvar the_title %}test-1{% plural %}test-2{% endblocktrans%}{{the_title}}",
            "ok-1",
        ),
        (
            r#"{% blocktrans count cnt=1 context "myctx" asvar the_title %}test-1{% plural %}test-2{% endblocktrans%}{{the_title}}"#,
            "ok-1-ctx",
        ),
        (
            r#"{% blocktrans count cnt=2 context "myctx" asvar the_title %}test-1{% plural %}test-2{% endblocktrans%}{{the_title}}"#,
            "ok-2-ctx",
        ),
    ];

    for (input, expected) in cases {
        let rendered = engine.render_string(input, Context::new());
        assert_eq!(rendered.as_deref(), Ok(expected), "input: {input}");
    }
}

#[test]
fn test_parse_failures() {
    let engine = engine(Arc::new(mock()));
    let inputs = [
        r#"{% trans "test" as %}"#,
        r#"{% trans "test" context blah %}"#,
        "{% trans %}",
        "{% trans 12 %}",
        r#"{% trans "test" noise %}"#,
        "{% blocktrans %}test",
        "{% blocktrans count cnt=1 %}a{% plural %}b",
        "{% blocktrans %}test{% endblocktrans now %}",
        "{% blocktrans count cnt=1 %}a{% plural x %}b{% endblocktrans %}",
        "{% blocktrans count %}test{% endblocktrans %}",
        "{% blocktrans with a=1 a=2 %}test{% endblocktrans %}",
        "{% blocktrans asvar %}test{% endblocktrans %}",
        r#"{% blocktrans context "a" context "b" %}test{% endblocktrans %}"#,
        "{% blocktrans as x %}test{% endblocktrans %}",
    ];

    for input in inputs {
        let err = engine.compile(input).unwrap_err();
        assert!(err.is_syntax(), "input: {input}, error: {err}");
    }
}

#[test]
fn test_parse_failure_positions() {
    let engine = engine(Arc::new(mock()));
    assert_eq!(
        engine.compile(r#"{% trans "test" as %}"#).unwrap_err(),
        TemplateError::syntax(1, 14, "Expected 'as' to be followed by an identifier")
    );
    assert_eq!(
        engine.compile("{% blocktrans %}line one\nline two").unwrap_err(),
        TemplateError::syntax(2, 9, "Unexpected EOF, expected '{% endblocktrans %}'")
    );
}

#[test]
fn test_language_and_domain_come_from_context() {
    let engine = engine(Arc::new(EchoTranslator));
    let scope = json!({"_domain": "domain", "_language": "language"});
    let cases = [
        (r#"{% trans "test" %}"#, "domain:language:test"),
        (r#"{% trans "test" %} post"#, "domain:language:test post"),
        (r#"pre {% trans "test" %}"#, "pre domain:language:test"),
        (r#"{% trans "test" as myvar %}{{myvar}}"#, "domain:language:test"),
        (r#"{% trans "test" context "myctx" %}"#, "domain:language:myctx:test"),
        (
            r#"{% trans "test" as othervar context "myctx" %}{{othervar}}"#,
            "domain:language:myctx:test",
        ),
        ("{% blocktrans %}test{% endblocktrans %}", "domain:language:test"),
        (
            r#"{% blocktrans context "myctx" asvar the_title %}test{% endblocktrans%}{{the_title}}"#,
            "domain:language:myctx:test",
        ),
    ];

    for (input, expected) in cases {
        let rendered = engine.render_string(input, vars(scope.clone()));
        assert_eq!(rendered.as_deref(), Ok(expected), "input: {input}");
    }
}

#[test]
fn test_missing_scope_values_are_empty() {
    let engine = engine(Arc::new(EchoTranslator));
    let out = engine.render_string(r#"{% trans "x" %}"#, Context::new()).unwrap();
    assert_eq!(out, "::x");

    let out = engine
        .render_string(r#"{% trans "x" %}"#, vars(json!({"_language": 7})))
        .unwrap();
    assert_eq!(out, "::x");
}

#[test]
fn test_expression_text_is_evaluated_per_render() {
    let engine = engine(Arc::new(mock()));
    let template = engine.compile("{% trans page.title %}|{% trans missing %}").unwrap();
    assert_eq!(
        template.execute(vars(json!({"page": {"title": "test"}}))).unwrap(),
        "ok|unexpected get()"
    );
}

#[test]
fn test_bindings_fill_translated_markers() {
    let engine = engine(Arc::new(EchoTranslator));
    let out = engine
        .render_string(
            "{% blocktrans with who=user.name|upper n=2 %}hi {{ who }} x{{ n }}{% endblocktrans %}",
            vars(json!({"_domain": "d", "_language": "l", "user": {"name": "ada"}})),
        )
        .unwrap();
    assert_eq!(out, "d:l:hi ADA x2");
}

#[test]
fn test_bindings_stay_in_child_scope() {
    let engine = engine(Arc::new(EchoTranslator));
    let out = engine
        .render_string(
            "{% blocktrans with name='A' %}{{ name }}{% endblocktrans %}[{{ name }}]",
            Context::new(),
        )
        .unwrap();
    assert_eq!(out, "::A[]");
}

#[test]
fn test_bindings_see_the_calling_scope() {
    let engine = engine(Arc::new(EchoTranslator));
    let out = engine
        .render_string(
            "{% blocktrans with a=b b=1 %}{{ a }}-{{ b }}{% endblocktrans %}",
            vars(json!({"b": "outer"})),
        )
        .unwrap();
    assert_eq!(out, "::outer-1");
}

#[test]
fn test_count_conversion_and_binding() {
    let engine = engine(Arc::new(EchoTranslator));
    let template = engine
        .compile("{% blocktrans count n=c %}{{ n }} item{% plural %}{{ n }} items{% endblocktrans %}")
        .unwrap();
    assert_eq!(template.execute(vars(json!({"c": 1}))).unwrap(), "::1 item");
    assert_eq!(template.execute(vars(json!({"c": "3"}))).unwrap(), "::3 items");
    assert_eq!(template.execute(vars(json!({"c": 1.9}))).unwrap(), "::1.9 item");
    assert_eq!(template.execute(Context::new()).unwrap(), ":: items");
}

#[test]
fn test_count_without_plural_is_singular() {
    let engine = engine(Arc::new(mock()));
    let out = engine
        .render_string("{% blocktrans count cnt=2 %}test{% endblocktrans %}", Context::new())
        .unwrap();
    assert_eq!(out, "ok");
}

#[test]
fn test_plural_without_count_is_singular() {
    let engine = engine(Arc::new(QuotingTranslator));
    let template = engine
        .compile("{% blocktrans %}a{% plural %}b{% endblocktrans %}")
        .unwrap();
    assert_eq!(template.execute(Context::new()).unwrap(), "a");
}

#[test]
fn test_empty_plural_alternative_is_singular() {
    let engine = engine(Arc::new(EchoTranslator));
    let template = engine
        .compile("{% blocktrans count n=c %}x{% plural %}{% endblocktrans %}")
        .unwrap();
    assert_eq!(template.execute(vars(json!({"c": 2}))).unwrap(), "::x");
}

#[test]
fn test_broken_translation_is_a_render_error() {
    let engine = engine(Arc::new(mock().on("get(broken)", "{% nope %}")));
    let template = engine.compile(r#"{% trans "broken" %}"#).unwrap();
    let err = template.execute(Context::new()).unwrap_err();
    assert_eq!(err, TemplateError::render("Unknown tag 'nope'"));
}

#[test]
fn test_output_var_is_visible_after_the_directive() {
    let engine = engine(Arc::new(mock()));
    let out = engine
        .render_string(r#"[{{ v }}]{% trans "test" as v %}[{{ v }}]"#, Context::new())
        .unwrap();
    assert_eq!(out, "[][ok]");
}

#[test]
fn test_registration() {
    let mut engine = Engine::new();
    register(&mut engine, Arc::new(EchoTranslator)).unwrap();
    assert!(engine.has_tag("trans"));
    assert!(engine.has_tag("blocktrans"));
    assert_eq!(
        register(&mut engine, Arc::new(EchoTranslator)).unwrap_err(),
        TemplateError::DuplicateTag("trans".to_string())
    );

    let mut engine = Engine::new();
    engine.register_tag("t", TransTag::new(Arc::new(EchoTranslator))).unwrap();
    engine.register_tag("bt", BlockTransTag::new(Arc::new(EchoTranslator))).unwrap();
    let engine = Arc::new(engine);
    assert_eq!(
        engine
            .render_string(r#"{% t "a" %} {% bt %}b{% endblocktrans %}"#, Context::new())
            .unwrap(),
        "::a ::b"
    );
}

fn catalog_engine() -> (tempfile::TempDir, Arc<Engine>) {
    let dir = create_temp_dir();
    locale_fixtures::write_standard_tree(dir.path());
    let translator = TemplateTranslator::from_dir(dir.path()).unwrap();
    (dir, engine(Arc::new(translator)))
}

fn render_in(engine: &Arc<Engine>, language: &str, source: &str, extra: Value) -> String {
    let mut scope = vars(extra);
    scope.insert("_language".to_string(), json!(language));
    engine.render_string(source, scope).unwrap()
}

#[test]
fn test_catalog_lookups() {
    let (_dir, engine) = catalog_engine();
    let hello = r#"{% trans "Hello world!" %}"#;

    assert_eq!(render_in(&engine, "sv_SE", hello, json!({})), "Hej världen!");
    assert_eq!(render_in(&engine, "sv", hello, json!({})), "Hej världen!");
    assert_eq!(
        render_in(&engine, "sv_SE", hello, json!({"_domain": "other"})),
        "Hej från other!"
    );
    assert_eq!(render_in(&engine, "en_GB", hello, json!({})), "Hello world!");
    assert_eq!(
        render_in(&engine, "en", hello, json!({"_domain": "other"})),
        "Hello from the other domain!"
    );
    assert_eq!(render_in(&engine, "xx", hello, json!({})), "Hello world!");
    assert_eq!(render_in(&engine, "sv_SE", r#"{% trans "" %}"#, json!({})), "");
}

#[test]
fn test_catalog_context_does_not_collide() {
    let (_dir, engine) = catalog_engine();
    let out = render_in(
        &engine,
        "sv_SE",
        r#"{% trans "Hello world!" context "greeting" %}/{% trans "Hello world!" %}"#,
        json!({}),
    );
    assert_eq!(out, "Hallå världen!/Hej världen!");
}

#[test]
fn test_catalog_block_plural_and_bindings() {
    let (_dir, engine) = catalog_engine();
    let source = "{% blocktrans count cnt=messages|length %}You have {{ cnt }} message.\
                  {% plural %}You have {{ cnt }} messages.{% endblocktrans %}";

    assert_eq!(
        render_in(&engine, "sv_SE", source, json!({"messages": ["a"]})),
        "Du har 1 meddelande."
    );
    assert_eq!(
        render_in(&engine, "sv_SE", source, json!({"messages": ["a", "b"]})),
        "Du har 2 meddelanden."
    );
    assert_eq!(
        render_in(&engine, "de", source, json!({"messages": []})),
        "You have 0 message."
    );

    let welcome = "{% blocktrans with name=user %}Welcome, {{ name }}!{% endblocktrans %}";
    assert_eq!(render_in(&engine, "sv_SE", welcome, json!({"user": "Ada"})), "Välkommen, Ada!");
    assert_eq!(render_in(&engine, "fr", welcome, json!({"user": "Ada"})), "Welcome, Ada!");
}

#[test]
fn test_catalog_plural_with_context() {
    let (_dir, engine) = catalog_engine();
    let source = r#"{% blocktrans count n=k context "fruit" %}One apple{% plural %}Many apples{% endblocktrans %}"#;
    assert_eq!(render_in(&engine, "sv_SE", source, json!({"k": 1})), "Ett äpple (frukt)");
    assert_eq!(render_in(&engine, "sv_SE", source, json!({"k": 4})), "Många äpplen (frukt)");
}

#[test]
fn test_catalog_plain_and_plural_share_msgids() {
    let (_dir, engine) = catalog_engine();
    assert_eq!(render_in(&engine, "sv_SE", r#"{% trans "One apple" %}"#, json!({})), "Ett äpple");
    let source = "{% blocktrans count n=k %}Hello world!{% plural %}Hello worlds!{% endblocktrans %}";
    assert_eq!(render_in(&engine, "sv_SE", source, json!({"k": 1})), "Hej världen!");
    assert_eq!(render_in(&engine, "sv_SE", source, json!({"k": 2})), "Hello worlds!");
}

#[test]
fn test_shared_template_across_threads() {
    let (_dir, engine) = catalog_engine();
    let template = Arc::new(engine.compile(r#"{% trans "Hello world!" %}"#).unwrap());
    let handles: Vec<_> = ["sv_SE", "en_GB", "sv", "xx"]
        .into_iter()
        .map(|language| {
            let template = Arc::clone(&template);
            std::thread::spawn(move || template.execute(vars(json!({ "_language": language }))).unwrap())
        })
        .collect();
    let results: Vec<String> = handles.into_iter().map(|h| h.join().unwrap()).collect();
    assert_eq!(results, ["Hej världen!", "Hello world!", "Hej världen!", "Hello world!"]);
}

proptest! {
    #[test]
    fn prop_block_text_keeps_marker_spacing(
        lead in 0usize..5,
        trail in 0usize..5,
        name in "[a-z][a-z0-9_]{0,8}",
    ) {
        prop_assume!(!transtag_template::KEYWORDS.contains(&name.as_str()));
        let engine = engine(Arc::new(QuotingTranslator));
        let marker = format!("{{{{{}{name}{}}}}}", " ".repeat(lead), " ".repeat(trail));
        let source = format!("{{% blocktrans %}}x {marker}{{% endblocktrans %}}");
        let expected = format!("x <{}{name}{}>", " ".repeat(lead), " ".repeat(trail));
        prop_assert_eq!(engine.render_string(&source, Context::new()).unwrap(), expected);
    }
}
