use messageformat2::{MessageFormatter, StaticErrorKind};
use test_case::test_case;

fn compile(source: &str) -> MessageFormatter {
    MessageFormatter::builder().source(source).build()
}

#[test_case("{Hello, world!}")]
#[test_case("{}")]
#[test_case("{{$x}}")]
#[test_case("{{|quoted literal|}}")]
#[test_case("{{unquoted}}")]
#[test_case("{{:standalone}}")]
#[test_case("{{+open}{-close}}")]
#[test_case("{{$x :number minimumFractionDigits=2}}")]
#[test_case("{{$x :number opt=$y}}")]
#[test_case("let $x = {42} {{$x}}")]
#[test_case("let $a = {$b} let $c = {$a :number} {{$c}}")]
#[test_case("match {$n :plural} when 1 {one} when * {other}")]
#[test_case("match {$a :plural} {$b :string} when 1 x {p} when * * {q}")]
#[test_case("{escapes: \\{ \\} \\\\}")]
#[test_case("{{|pipe \\| and backslash \\\\|}}")]
#[test_case("{{@reserved}}")]
#[test_case("{{!body |with| chunks}}")]
#[test_case("  {leading and trailing whitespace}  ")]
fn accepts(source: &str) {
    let formatter = compile(source);
    assert!(
        formatter.static_errors().is_empty(),
        "expected a clean parse for {source:?}, got {:?}",
        formatter.static_errors()
    );
}

#[test_case(""; "empty input")]
#[test_case("   "; "only whitespace")]
#[test_case("{unclosed"; "unclosed pattern")]
#[test_case("{text {$var}"; "unclosed pattern after expression")]
#[test_case("{{}}"; "empty expression")]
#[test_case("{{$}}"; "variable sigil without name")]
#[test_case("{{|unterminated}}"; "unterminated quoted literal")]
#[test_case("{bad \\q escape}"; "invalid text escape")]
#[test_case("{{|bad \\{ escape|}}"; "invalid literal escape")]
#[test_case("{{:f opt}}"; "option without equals sign")]
#[test_case("{bad {:placeholder option=}}"; "option without value")]
#[test_case("let $x {42} {{$x}}"; "declaration missing equals sign")]
#[test_case("let x = {42} {ok}"; "declaration missing variable sigil")]
#[test_case("match when * {x}"; "match without selectors")]
#[test_case("match {|x|} when * {foo} extra"; "trailing tokens after variants")]
#[test_case("{x} trailing"; "trailing tokens after pattern")]
#[test_case("hello"; "unbraced text")]
fn rejects(source: &str) {
    let formatter = compile(source);
    assert!(
        formatter.static_errors().has_syntax_error(),
        "expected a syntax error for {source:?}"
    );
}

#[test]
fn syntax_errors_carry_positions() {
    let formatter = compile("{ok} junk");
    let error = formatter.static_errors().first().unwrap();
    assert!(matches!(error.kind(), StaticErrorKind::SyntaxError));
    assert_eq!(error.position().line(), Some(1));
    assert_eq!(error.position().position(), 5);
}

#[test]
fn error_positions_track_lines() {
    let formatter = compile("{first line}\n  oops");
    let error = formatter.static_errors().first().unwrap();
    assert_eq!(error.position().line(), Some(2));
    assert_eq!(error.position().position(), 2);
}

#[test]
fn normalized_input_is_canonical() {
    let formatter = compile("let $x = { 42 }   {{$x :number   useGrouping=false }}");
    assert_eq!(
        formatter.normalized_input(),
        "let $x={42}{{$x :number useGrouping=false}}"
    );
}

#[test]
fn normalized_input_keeps_required_whitespace_only() {
    let formatter = compile("match  {$n :plural}   when  1  {one} when * {other}");
    assert_eq!(
        formatter.normalized_input(),
        "match{$n :plural}when 1{one}when *{other}"
    );
}

#[test]
fn recovered_expression_keeps_the_function_name() {
    // The malformed option is dropped but the annotation survives, so the
    // fallback for the placeholder is still the function name.
    let formatter = compile("{bad {:placeholder option=}}");
    assert!(formatter.static_errors().has_syntax_error());
    let result = formatter.format_to_string(&Default::default());
    assert!(
        result.as_str().contains("{:placeholder}"),
        "got {:?}",
        result.as_str()
    );
}

#[test]
fn unparseable_body_wraps_the_remainder() {
    let formatter = compile("bogus body");
    assert!(formatter.static_errors().has_syntax_error());
    let result = formatter.format_to_string(&Default::default());
    assert_eq!(result.as_str(), "{bogus body}");
}

#[test]
fn duplicate_option_names_are_data_model_errors() {
    let formatter = compile("{{$x :number opt=1 opt=2}}");
    assert!(!formatter.static_errors().has_syntax_error());
    assert!(formatter
        .static_errors()
        .iter()
        .any(|e| matches!(e.kind(), StaticErrorKind::DuplicateOptionName(_))));
}
