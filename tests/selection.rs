use messageformat2::{
    DynamicErrorKind, FormattedMessage, MessageArguments, MessageError, MessageFormatter,
    StaticErrorKind, Value,
};

fn format(source: &str, args: &MessageArguments) -> FormattedMessage {
    MessageFormatter::builder()
        .locale("en-US")
        .source(source)
        .build()
        .format_to_string(args)
}

fn args(pairs: &[(&str, Value)]) -> MessageArguments {
    let mut args = MessageArguments::new();
    for (name, value) in pairs {
        args.set(*name, value.clone());
    }
    args
}

#[test]
fn exact_numeric_match() {
    let source = "match {$n :plural} when 1 {one} when * {other}";
    let result = format(source, &args(&[("n", Value::Int(1))]));
    assert_eq!(result.as_str(), "one");
    assert!(result.is_ok());

    let result = format(source, &args(&[("n", Value::Int(5))]));
    assert_eq!(result.as_str(), "other");
}

#[test]
fn plural_keyword_match() {
    let source = "match {$n :plural} when one {keyword} when * {other}";
    let result = format(source, &args(&[("n", Value::Int(1))]));
    assert_eq!(result.as_str(), "keyword");

    let result = format(source, &args(&[("n", Value::Int(3))]));
    assert_eq!(result.as_str(), "other");
}

#[test]
fn exact_match_outranks_keyword_match() {
    // Both "1" and "one" match n=1; the exact key must win regardless of
    // variant order.
    let source = "match {$n :plural} when one {keyword} when 1 {exact} when * {other}";
    let result = format(source, &args(&[("n", Value::Int(1))]));
    assert_eq!(result.as_str(), "exact");
}

#[test]
fn two_selectors_earlier_position_dominates() {
    let source = "match {$n :plural} {$g :string} \
                  when 1 masculine {his} \
                  when 1 * {theirs-one} \
                  when * masculine {his-many} \
                  when * * {their}";
    let one_masc = args(&[("n", Value::Int(1)), ("g", Value::from("masculine"))]);
    assert_eq!(format(source, &one_masc).as_str(), "his");

    let one_fem = args(&[("n", Value::Int(1)), ("g", Value::from("feminine"))]);
    assert_eq!(format(source, &one_fem).as_str(), "theirs-one");

    let many_masc = args(&[("n", Value::Int(9)), ("g", Value::from("masculine"))]);
    assert_eq!(format(source, &many_masc).as_str(), "his-many");

    let many_fem = args(&[("n", Value::Int(9)), ("g", Value::from("feminine"))]);
    assert_eq!(format(source, &many_fem).as_str(), "their");
}

#[test]
fn spec_example_his_their() {
    let source =
        "match {$n :plural} {$g :string} when one masculine {his} when * * {their}";
    let result = format(
        source,
        &args(&[("n", Value::Int(1)), ("g", Value::from("masculine"))]),
    );
    assert_eq!(result.as_str(), "his");
    assert!(result.is_ok());
}

#[test]
fn string_selection_compares_equality() {
    let source = "match {$g :string} when masculine {he} when feminine {she} when * {they}";
    assert_eq!(
        format(source, &args(&[("g", Value::from("feminine"))])).as_str(),
        "she"
    );
    assert_eq!(
        format(source, &args(&[("g", Value::from("unknown"))])).as_str(),
        "they"
    );
}

#[test]
fn variant_sort_is_stable() {
    // Equal priority tuples retain source order.
    let source = "match {$n :plural} when * {first} when * {second}";
    let result = format(source, &args(&[("n", Value::Int(1))]));
    assert_eq!(result.as_str(), "first");
}

#[test]
fn wildcard_sorts_after_explicit_matches() {
    // Even listed first, the wildcard variant loses to an explicit match.
    let source = "match {$n :plural} when * {other} when 1 {one}";
    let result = format(source, &args(&[("n", Value::Int(1))]));
    assert_eq!(result.as_str(), "one");
}

#[test]
fn annotation_through_declaration_selects() {
    let source = "let $p = {$n :plural} match {$p} when 1 {one} when * {other}";
    let result = format(source, &args(&[("n", Value::Int(1))]));
    assert_eq!(result.as_str(), "one");
    assert!(result.is_ok());
}

#[test]
fn unresolved_selector_variable_becomes_nomatch() {
    let source = "match {$n :plural} when 1 {one} when * {other}";
    let result = format(source, &MessageArguments::new());
    assert_eq!(result.as_str(), "other");
    assert!(matches!(
        result.error(),
        Some(MessageError::Dynamic(e))
            if matches!(e.kind(), DynamicErrorKind::UnresolvedVariable(_))
    ));
}

#[test]
fn formatter_only_function_in_selector_position() {
    let source = "match {$n :datetime} when 1 {a} when * {b}";
    let result = format(source, &args(&[("n", Value::Int(1))]));
    assert_eq!(result.as_str(), "b");
    assert!(matches!(
        result.error(),
        Some(MessageError::Dynamic(e))
            if matches!(e.kind(), DynamicErrorKind::SelectorError(_))
    ));
}

#[test]
fn unknown_selector_function_becomes_nomatch() {
    let source = "match {$n :mystery} when 1 {a} when * {b}";
    let result = format(source, &args(&[("n", Value::Int(1))]));
    assert_eq!(result.as_str(), "b");
    assert!(matches!(
        result.error(),
        Some(MessageError::Dynamic(e))
            if matches!(e.kind(), DynamicErrorKind::UnknownFunction(_))
    ));
}

#[test]
fn static_error_makes_selectors_message_replacement() {
    // Non-exhaustive variants are a static error, so the whole result is
    // U+FFFD rather than a selected pattern.
    let source = "match {$n :plural} when 1 {one}";
    let result = format(source, &args(&[("n", Value::Int(1))]));
    assert_eq!(result.as_str(), "\u{FFFD}");
    assert!(matches!(
        result.error(),
        Some(MessageError::Static(e))
            if matches!(e.kind(), StaticErrorKind::NonexhaustivePattern)
    ));
}

#[test]
fn syntax_error_makes_selectors_message_replacement() {
    let source = "match {|x|} when * {foo} extra";
    let result = format(source, &MessageArguments::new());
    assert_eq!(result.as_str(), "\u{FFFD}");
    assert!(matches!(
        result.error(),
        Some(MessageError::Static(e)) if matches!(e.kind(), StaticErrorKind::SyntaxError)
    ));
}

#[test]
fn selection_with_ordinal_rules() {
    let source = "match {$n :plural select=ordinal} when one {st} when two {nd} when few {rd} when * {th}";
    assert_eq!(format(source, &args(&[("n", Value::Int(21))])).as_str(), "st");
    assert_eq!(format(source, &args(&[("n", Value::Int(22))])).as_str(), "nd");
    assert_eq!(format(source, &args(&[("n", Value::Int(23))])).as_str(), "rd");
    assert_eq!(format(source, &args(&[("n", Value::Int(11))])).as_str(), "th");
}

#[test]
fn exact_only_selection() {
    let source = "match {$n :plural select=exact} when one {keyword} when 1 {exact} when * {other}";
    assert_eq!(
        format(source, &args(&[("n", Value::Int(1))])).as_str(),
        "exact"
    );
    // With exact selection, the "one" keyword never matches.
    assert_eq!(
        format(source, &args(&[("n", Value::Int(2))])).as_str(),
        "other"
    );
}

#[test]
fn chosen_variant_arity_matches_selector_count() {
    let formatter = MessageFormatter::builder()
        .source("match {$a :plural} {$b :plural} when 1 1 {both} when * * {other}")
        .build();
    assert!(formatter.static_errors().is_empty());
    let result = formatter.format_to_string(&args(&[
        ("a", Value::Int(1)),
        ("b", Value::Int(1)),
    ]));
    assert_eq!(result.as_str(), "both");
}
