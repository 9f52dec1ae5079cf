use messageformat2::MessageFormatter;

fn compile(source: &str) -> MessageFormatter {
    MessageFormatter::builder().source(source).build()
}

const MESSAGES: &[&str] = &[
    "{}",
    "{plain text}",
    "{Hello, {$userName}!}",
    "{{42}}",
    "{{|quoted literal|}}",
    "{{|with \\| escapes \\\\|}}",
    "{text \\{braces\\} and \\\\ backslash}",
    "{{:standalone}}",
    "{{+b} bold {-b}}",
    "{{$x :number}}",
    "{{$x :number style=percent minimumFractionDigits=2 opt=$y}}",
    "let $x = {42} {{$x}}",
    "let $x = {$y :number} let $z = {$x} {{$z}}",
    "match {$n :plural} when 1 {one} when * {other}",
    "match {$a :plural} {$b :string} when one x {p} when 1 * {q} when * * {r}",
    "{{@reserved}}",
    "{{!chunks |quoted| more}}",
    "{{~a\\{b}}",
];

/// `parse(serialize(parse(m)))` equals `parse(m)` for every well-formed
/// message.
#[test]
fn parse_serialize_parse_round_trip() {
    for source in MESSAGES {
        let first = compile(source);
        assert!(
            first.static_errors().is_empty(),
            "unexpected errors for {source:?}: {:?}",
            first.static_errors()
        );
        let rendered = first.canonical_form();
        let second = compile(&rendered);
        assert!(
            second.static_errors().is_empty(),
            "canonical form {rendered:?} of {source:?} does not re-parse"
        );
        assert_eq!(
            first.data_model(),
            second.data_model(),
            "model changed across round-trip: {source:?} -> {rendered:?}"
        );
    }
}

/// The serializer's output is the parser's normalized input, except for
/// reserved bodies (whose chunk separators are implied by the model).
#[test]
fn canonical_form_equals_normalized_input() {
    for source in MESSAGES {
        if source.contains('@') || source.contains('!') || source.contains('~') {
            continue;
        }
        let formatter = compile(source);
        assert_eq!(
            formatter.canonical_form(),
            formatter.normalized_input(),
            "for {source:?}"
        );
    }
}

/// Serializing is idempotent: the canonical form of the canonical form is
/// itself.
#[test]
fn canonical_form_is_a_fixed_point() {
    for source in MESSAGES {
        let rendered = compile(source).canonical_form();
        let again = compile(&rendered).canonical_form();
        assert_eq!(rendered, again, "for {source:?}");
    }
}

#[test]
fn canonical_form_drops_incidental_whitespace() {
    let formatter = compile("let   $x   =   { 42 }   match  {$x  :plural}  when  1  {a}  when  *  {b}");
    assert!(formatter.static_errors().is_empty());
    assert_eq!(
        formatter.canonical_form(),
        "let $x={42}match{$x :plural}when 1{a}when *{b}"
    );
}

#[test]
fn quoted_and_unquoted_literals_keep_their_spelling() {
    assert_eq!(compile("{{|x|}}").canonical_form(), "{{|x|}}");
    assert_eq!(compile("{{x}}").canonical_form(), "{{x}}");
}
