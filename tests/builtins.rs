//! The standard function library, exercised through whole messages.

use chrono::TimeZone;
use messageformat2::{MessageArguments, MessageFormatter, Value};

fn format_with(source: &str, args: &MessageArguments) -> String {
    MessageFormatter::builder()
        .locale("en-US")
        .source(source)
        .build()
        .format_to_string(args)
        .into_string()
}

fn number_args(n: impl Into<Value>) -> MessageArguments {
    let mut args = MessageArguments::new();
    args.set("n", n);
    args
}

#[test]
fn number_defaults() {
    assert_eq!(format_with("{{$n :number}}", &number_args(42_i64)), "42");
    assert_eq!(format_with("{{$n :number}}", &number_args(-1.25_f64)), "-1.25");
    assert_eq!(
        format_with("{{$n :number}}", &number_args(1234567_i64)),
        "1,234,567"
    );
}

#[test]
fn number_accepts_literal_operands() {
    assert_eq!(format_with("{{|3.14| :number}}", &MessageArguments::new()), "3.14");
}

#[test]
fn number_fraction_options() {
    assert_eq!(
        format_with(
            "{{$n :number minimumFractionDigits=2}}",
            &number_args(5_i64)
        ),
        "5.00"
    );
    assert_eq!(
        format_with(
            "{{$n :number maximumFractionDigits=1}}",
            &number_args(2.71828_f64)
        ),
        "2.7"
    );
}

#[test]
fn number_notation_options() {
    assert_eq!(
        format_with("{{$n :number notation=scientific}}", &number_args(12345_i64)),
        "1.2345E4"
    );
    assert_eq!(
        format_with(
            "{{$n :number notation=compact}}",
            &number_args(1_500_000_i64)
        ),
        "1.5M"
    );
    assert_eq!(
        format_with(
            "{{$n :number notation=compact compactDisplay=long}}",
            &number_args(1500_i64)
        ),
        "1.5 thousand"
    );
}

#[test]
fn number_style_and_sign() {
    assert_eq!(
        format_with("{{$n :number style=percent}}", &number_args(0.5_f64)),
        "50%"
    );
    assert_eq!(
        format_with("{{$n :number signDisplay=always}}", &number_args(3_i64)),
        "+3"
    );
}

#[test]
fn integer_rounds_to_whole_numbers() {
    assert_eq!(format_with("{{$n :integer}}", &number_args(3.9_f64)), "4");
    assert_eq!(format_with("{{$n :integer}}", &number_args(12_i64)), "12");
}

#[test]
fn number_rejects_non_numbers() {
    let mut args = MessageArguments::new();
    args.set("n", "not a number");
    assert_eq!(format_with("{{$n :number}}", &args), "{$n}");
}

#[test]
fn string_formats_and_selects() {
    let mut args = MessageArguments::new();
    args.set("g", "feminine");
    assert_eq!(format_with("{{$g :string}}", &args), "feminine");

    let source = "match {$g :string} when feminine {her} when * {their}";
    assert_eq!(format_with(source, &args), "her");
}

#[test]
fn string_formats_numbers_too() {
    let mut args = MessageArguments::new();
    args.set("n", 7_i64);
    assert_eq!(format_with("{{$n :string}}", &args), "7");
}

fn date_args() -> MessageArguments {
    let mut args = MessageArguments::new();
    args.set(
        "d",
        chrono::Utc.with_ymd_and_hms(2024, 11, 23, 19, 42, 7).unwrap(),
    );
    args
}

#[test]
fn datetime_styles() {
    assert_eq!(
        format_with("{{$d :datetime}}", &date_args()),
        "11/23/24, 7:42 PM"
    );
    assert_eq!(
        format_with(
            "{{$d :datetime dateStyle=long timeStyle=medium}}",
            &date_args()
        ),
        "November 23, 2024, 7:42:07 PM"
    );
}

#[test]
fn datetime_field_options() {
    assert_eq!(
        format_with(
            "{{$d :datetime year=numeric month=long day=numeric}}",
            &date_args()
        ),
        "November 23 2024"
    );
}

#[test]
fn date_and_time_styles() {
    assert_eq!(format_with("{{$d :date}}", &date_args()), "11/23/24");
    assert_eq!(
        format_with("{{$d :date style=full}}", &date_args()),
        "Saturday, November 23, 2024"
    );
    assert_eq!(format_with("{{$d :time}}", &date_args()), "7:42 PM");
    assert_eq!(
        format_with("{{$d :time style=medium}}", &date_args()),
        "7:42:07 PM"
    );
}

#[test]
fn datetime_accepts_iso_strings() {
    let mut args = MessageArguments::new();
    args.set("d", "2024-11-23");
    assert_eq!(format_with("{{$d :date}}", &args), "11/23/24");
}

#[test]
fn datetime_rejects_non_dates() {
    let mut args = MessageArguments::new();
    args.set("d", 5_i64);
    assert_eq!(format_with("{{$d :datetime}}", &args), "{$d}");
}

#[test]
fn plural_selects_with_options_on_the_selector() {
    let source =
        "match {$n :plural select=ordinal} when one {winner} when * {runner-up}";
    assert_eq!(format_with(source, &number_args(1_i64)), "winner");
    assert_eq!(format_with(source, &number_args(4_i64)), "runner-up");
}

#[test]
fn number_selection_on_decimals() {
    let source = "match {$n :number} when 1.5 {exact} when * {other}";
    assert_eq!(
        format_with(source, &number_args(Value::Decimal("1.5".parse().unwrap()))),
        "exact"
    );
}

#[test]
fn formatted_number_feeds_the_output() {
    let mut args = MessageArguments::new();
    args.set("price", Value::Decimal("1999.5".parse().unwrap()));
    assert_eq!(
        format_with(
            "{Total: {$price :number minimumFractionDigits=2}}",
            &args
        ),
        "Total: 1,999.50"
    );
}
