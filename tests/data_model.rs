use messageformat2::{
    Expression, Key, Literal, Message, MessageBody, MessageFormatter, Operand, Operator,
    OptionMap, Pattern, PatternPart, SelectorKeys, StaticErrorKind, VariableName,
};

fn compile(source: &str) -> MessageFormatter {
    MessageFormatter::builder().source(source).build()
}

#[test]
fn pattern_message_shape() {
    let formatter = compile("{Hello, {$name}!}");
    let model = formatter.data_model();
    assert!(model.declarations().is_empty());
    let MessageBody::Pattern(pattern) = model.body() else {
        panic!("expected a pattern body");
    };
    let parts: Vec<_> = pattern.parts().collect();
    assert_eq!(parts.len(), 3);
    assert!(matches!(parts[0], PatternPart::Text(t) if t == "Hello, "));
    assert!(matches!(parts[2], PatternPart::Text(t) if t == "!"));
    let PatternPart::Expression(expr) = parts[1] else {
        panic!("expected a placeholder");
    };
    assert!(expr.operand().is_variable());
    assert!(expr.operator().is_none());
}

#[test]
fn declarations_preserve_source_order() {
    let formatter = compile("let $a = {1} let $b = {2} let $a = {3} {{$a}}");
    let names: Vec<_> = formatter
        .data_model()
        .declarations()
        .iter()
        .map(|b| b.name.as_str().to_string())
        .collect();
    assert_eq!(names, ["a", "b", "a"]);
}

#[test]
fn selectors_message_shape() {
    let formatter = compile("match {$n :plural} {$g :string} when 1 x {p} when * * {q}");
    let model = formatter.data_model();
    assert!(model.has_selectors());
    let MessageBody::Selectors {
        selectors,
        variants,
    } = model.body()
    else {
        panic!("expected selectors");
    };
    assert_eq!(selectors.len(), 2);
    assert_eq!(variants.len(), 2);
    assert_eq!(variants[0].keys.len(), 2);
    assert!(variants[1].keys.is_default());

    let Some(Operator::Call { name, .. }) = selectors[0].operator() else {
        panic!("expected a function call annotation");
    };
    assert_eq!(name.as_str(), "plural");
}

#[test]
fn annotation_options_survive_in_order() {
    let formatter = compile("{{$x :number style=percent minimumFractionDigits=1}}");
    let MessageBody::Pattern(pattern) = formatter.data_model().body() else {
        panic!("expected a pattern");
    };
    let PatternPart::Expression(expr) = pattern.parts().next().unwrap() else {
        panic!("expected a placeholder");
    };
    let Some(Operator::Call { options, .. }) = expr.operator() else {
        panic!("expected a call");
    };
    let names: Vec<_> = options.iter().map(|(k, _)| k).collect();
    assert_eq!(names, ["style", "minimumFractionDigits"]);
}

#[test]
fn quoting_is_cosmetic_for_equality() {
    let quoted = compile("{{|42|}}");
    let unquoted = compile("{{42}}");
    assert_eq!(quoted.data_model(), unquoted.data_model());
}

#[test]
fn whitespace_is_cosmetic_for_equality() {
    let tight = compile("match {$n :plural} when 1 {one} when * {other}");
    let airy = compile("match   {$n   :plural}   when   1   {one}   when   *   {other}");
    assert!(airy.static_errors().is_empty());
    assert_eq!(tight.data_model(), airy.data_model());
}

#[test]
fn match_with_no_variants_is_a_data_model_error() {
    // Built through the model API: source text for this shape necessarily
    // carries a syntax error as well, which would mask the status.
    let mut selector = Expression::builder();
    selector.set_operand(Operand::Variable(VariableName::new("n")));
    selector.set_operator(Operator::Call {
        name: "plural".into(),
        options: OptionMap::new(),
    });
    let model = Message::new(
        Vec::new(),
        MessageBody::Selectors {
            selectors: [selector.build()].into_iter().collect(),
            variants: Vec::new(),
        },
    );
    let formatter = MessageFormatter::builder().data_model(model).build();
    let error = formatter.static_errors().first().unwrap();
    assert!(matches!(
        error.kind(),
        StaticErrorKind::NonexhaustivePattern
    ));

    let result = formatter.format_to_string(&Default::default());
    assert_eq!(result.as_str(), "\u{FFFD}");
}

#[test]
fn variant_key_arity_is_checked() {
    let formatter = compile("match {$n :plural} when 1 2 {x} when * {y}");
    assert!(formatter
        .static_errors()
        .iter()
        .any(|e| matches!(e.kind(), StaticErrorKind::VariantKeyMismatch)));
}

#[test]
fn missing_selector_annotation_is_checked_transitively() {
    let direct = compile("match {$n} when * {x}");
    assert!(direct
        .static_errors()
        .iter()
        .any(|e| matches!(e.kind(), StaticErrorKind::MissingSelectorAnnotation)));

    let through_let = compile("let $m = {$n :plural} match {$m} when * {x}");
    assert!(through_let.static_errors().is_empty());

    let broken_chain = compile("let $m = {$n} match {$m} when * {x}");
    assert!(broken_chain
        .static_errors()
        .iter()
        .any(|e| matches!(e.kind(), StaticErrorKind::MissingSelectorAnnotation)));
}

#[test]
fn programmatic_pattern_formats() {
    let mut placeholder = Expression::builder();
    placeholder.set_operand(Operand::Variable(VariableName::new("who")));
    let pattern = Pattern::new([
        PatternPart::Text("Hi ".to_string()),
        PatternPart::Expression(placeholder.build()),
    ]);
    let model = Message::new(Vec::new(), MessageBody::Pattern(pattern));
    let formatter = MessageFormatter::builder().data_model(model).build();

    let mut args = messageformat2::MessageArguments::new();
    args.set("who", "there");
    assert_eq!(formatter.format_to_string(&args).as_str(), "Hi there");
}

#[test]
fn keys_order_with_wildcard_last() {
    let lit = |s: &str| Key::Literal(Literal::new(false, s));
    let mut keys = vec![Key::Wildcard, lit("b"), lit("a")];
    keys.sort();
    assert_eq!(keys, vec![lit("a"), lit("b"), Key::Wildcard]);

    let narrow = SelectorKeys::new([lit("a")]);
    let wide = SelectorKeys::new([lit("a"), Key::Wildcard]);
    assert!(narrow < wide);
}
