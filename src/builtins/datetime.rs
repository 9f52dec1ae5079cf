//! Date and time formatting: `:datetime`, `:date` and `:time`.
//!
//! Operands are date values, or strings in ISO 8601 form. Rendering is
//! locale-neutral English; the style names follow the function registry
//! (`full`, `long`, `medium`, `short`, `default`).

use crate::fn_native::{
    Formatter, FormatterFactory, FunctionError, Locale, ResolvedOptions, Shared,
};
use crate::value::{hour12, FormattedPlaceholder, FormattedValue, Value};
use chrono::{DateTime, Datelike, NaiveDate, NaiveDateTime, Timelike, Utc};

/// Which of the three date/time functions a factory builds.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum DateTimeKind {
    /// `:datetime` - date and time, driven by `dateStyle`/`timeStyle` and
    /// the field options.
    DateTime,
    /// `:date` - date only, driven by `style`.
    Date,
    /// `:time` - time only, driven by `style`.
    Time,
}

/// Factory for the `:datetime`, `:date` and `:time` formatters.
#[derive(Debug, Clone, Copy)]
pub struct DateTimeFactory {
    kind: DateTimeKind,
}

impl DateTimeFactory {
    /// Create a factory for `kind`.
    #[inline(always)]
    #[must_use]
    pub const fn new(kind: DateTimeKind) -> Self {
        Self { kind }
    }
}

impl FormatterFactory for DateTimeFactory {
    fn create(&self, _locale: &Locale) -> Result<Shared<dyn Formatter>, FunctionError> {
        Ok(Shared::new(DateTimeFunction { kind: self.kind }))
    }
}

struct DateTimeFunction {
    kind: DateTimeKind,
}

impl Formatter for DateTimeFunction {
    fn format(
        &self,
        arg: FormattedPlaceholder,
        options: &ResolvedOptions,
    ) -> Result<FormattedValue, FunctionError> {
        let date = operand_date(&arg)?;
        let text = match self.kind {
            DateTimeKind::Date => {
                let style = Style::parse(options.string("style"));
                format_date(&date, style)
            }
            DateTimeKind::Time => {
                let style = Style::parse(options.string("style"));
                format_time(&date, style)
            }
            DateTimeKind::DateTime => {
                let fields = FieldOptions::from_options(options);
                if fields.any() {
                    fields.format(&date)
                } else {
                    let date_style = Style::parse(options.string("dateStyle"));
                    let time_style = Style::parse(options.string("timeStyle"));
                    format!(
                        "{}, {}",
                        format_date(&date, date_style),
                        format_time(&date, time_style)
                    )
                }
            }
        };
        Ok(FormattedValue::Text(text))
    }
}

fn operand_date(arg: &FormattedPlaceholder) -> Result<DateTime<Utc>, FunctionError> {
    let Some(source) = arg.source() else {
        return Err(FunctionError::new("date function requires an operand"));
    };
    match source {
        Value::Date(date) => Ok(*date),
        Value::String(text) => parse_iso(text)
            .ok_or_else(|| FunctionError::new("operand does not parse as an ISO 8601 date")),
        _ => Err(FunctionError::new("operand is not a date")),
    }
}

/// Accept `YYYY-MM-DD`, `YYYY-MM-DDTHH:MM:SS` and full RFC 3339 forms.
fn parse_iso(text: &str) -> Option<DateTime<Utc>> {
    if let Ok(parsed) = DateTime::parse_from_rfc3339(text) {
        return Some(parsed.with_timezone(&Utc));
    }
    if let Ok(naive) = NaiveDateTime::parse_from_str(text, "%Y-%m-%dT%H:%M:%S") {
        return Some(naive.and_utc());
    }
    if let Ok(date) = NaiveDate::parse_from_str(text, "%Y-%m-%d") {
        return Some(date.and_hms_opt(0, 0, 0)?.and_utc());
    }
    None
}

#[derive(Debug, Clone, Copy, Eq, PartialEq)]
enum Style {
    Full,
    Long,
    Medium,
    Short,
}

impl Style {
    /// `default`, absence, and unrecognized values all mean `short`.
    fn parse(value: Option<&str>) -> Self {
        match value {
            Some("full") => Self::Full,
            Some("long") => Self::Long,
            Some("medium") => Self::Medium,
            _ => Self::Short,
        }
    }
}

const MONTHS: [&str; 12] = [
    "January",
    "February",
    "March",
    "April",
    "May",
    "June",
    "July",
    "August",
    "September",
    "October",
    "November",
    "December",
];

const WEEKDAYS: [&str; 7] = [
    "Monday",
    "Tuesday",
    "Wednesday",
    "Thursday",
    "Friday",
    "Saturday",
    "Sunday",
];

fn month_name(date: &DateTime<Utc>) -> &'static str {
    MONTHS[date.month0() as usize]
}

fn weekday_name(date: &DateTime<Utc>) -> &'static str {
    WEEKDAYS[date.weekday().num_days_from_monday() as usize]
}

fn format_date(date: &DateTime<Utc>, style: Style) -> String {
    match style {
        Style::Short => format!("{}/{}/{:02}", date.month(), date.day(), date.year() % 100),
        Style::Medium => format!(
            "{} {}, {}",
            &month_name(date)[..3],
            date.day(),
            date.year()
        ),
        Style::Long => format!("{} {}, {}", month_name(date), date.day(), date.year()),
        Style::Full => format!(
            "{}, {} {}, {}",
            weekday_name(date),
            month_name(date),
            date.day(),
            date.year()
        ),
    }
}

fn format_time(date: &DateTime<Utc>, style: Style) -> String {
    let (hour, am) = hour12(date.hour());
    let meridiem = if am { "AM" } else { "PM" };
    match style {
        Style::Short => format!("{}:{:02} {}", hour, date.minute(), meridiem),
        Style::Medium => format!(
            "{}:{:02}:{:02} {}",
            hour,
            date.minute(),
            date.second(),
            meridiem
        ),
        Style::Long | Style::Full => format!(
            "{}:{:02}:{:02} {} UTC",
            hour,
            date.minute(),
            date.second(),
            meridiem
        ),
    }
}

/// The per-field options of `:datetime`. When any is present, they replace
/// the style options entirely.
#[derive(Debug, Default)]
struct FieldOptions {
    year: Option<FieldWidth>,
    month: Option<FieldWidth>,
    day: Option<FieldWidth>,
    weekday: Option<FieldWidth>,
    hour: Option<FieldWidth>,
    minute: Option<FieldWidth>,
    second: Option<FieldWidth>,
}

#[derive(Debug, Clone, Copy, Eq, PartialEq)]
enum FieldWidth {
    Numeric,
    TwoDigit,
    Long,
    Short,
    Narrow,
}

impl FieldWidth {
    fn parse(value: Option<&str>) -> Option<Self> {
        match value? {
            "numeric" => Some(Self::Numeric),
            "2-digit" => Some(Self::TwoDigit),
            "long" => Some(Self::Long),
            "short" => Some(Self::Short),
            "narrow" => Some(Self::Narrow),
            _ => None,
        }
    }
}

impl FieldOptions {
    fn from_options(options: &ResolvedOptions) -> Self {
        Self {
            year: FieldWidth::parse(options.string("year")),
            month: FieldWidth::parse(options.string("month")),
            day: FieldWidth::parse(options.string("day")),
            weekday: FieldWidth::parse(options.string("weekday")),
            hour: FieldWidth::parse(options.string("hour")),
            minute: FieldWidth::parse(options.string("minute")),
            second: FieldWidth::parse(options.string("second")),
        }
    }

    fn any(&self) -> bool {
        self.year.is_some()
            || self.month.is_some()
            || self.day.is_some()
            || self.weekday.is_some()
            || self.hour.is_some()
            || self.minute.is_some()
            || self.second.is_some()
    }

    fn format(&self, date: &DateTime<Utc>) -> String {
        let mut date_parts: Vec<String> = Vec::new();
        if let Some(width) = self.weekday {
            let name = weekday_name(date);
            date_parts.push(match width {
                FieldWidth::Narrow => name[..1].to_string(),
                FieldWidth::Short => name[..3].to_string(),
                _ => name.to_string(),
            });
        }
        if let Some(width) = self.month {
            let text = match width {
                FieldWidth::Numeric => date.month().to_string(),
                FieldWidth::TwoDigit => format!("{:02}", date.month()),
                FieldWidth::Long => month_name(date).to_string(),
                FieldWidth::Short => month_name(date)[..3].to_string(),
                FieldWidth::Narrow => month_name(date)[..1].to_string(),
            };
            date_parts.push(text);
        }
        if let Some(width) = self.day {
            date_parts.push(numeric_field(date.day(), width));
        }
        if let Some(width) = self.year {
            date_parts.push(match width {
                FieldWidth::TwoDigit => format!("{:02}", date.year() % 100),
                _ => date.year().to_string(),
            });
        }

        let mut out = date_parts.join(" ");
        if self.hour.is_some() || self.minute.is_some() || self.second.is_some() {
            let (hour, am) = hour12(date.hour());
            let mut time = String::new();
            if let Some(width) = self.hour {
                time.push_str(&numeric_field(hour, width));
            }
            if let Some(width) = self.minute {
                if !time.is_empty() {
                    time.push(':');
                }
                time.push_str(&numeric_field_padded(date.minute(), width));
            }
            if let Some(width) = self.second {
                if !time.is_empty() {
                    time.push(':');
                }
                time.push_str(&numeric_field_padded(date.second(), width));
            }
            if self.hour.is_some() {
                time.push(' ');
                time.push_str(if am { "AM" } else { "PM" });
            }
            if !out.is_empty() {
                out.push_str(", ");
            }
            out.push_str(&time);
        }
        out
    }
}

fn numeric_field(value: u32, width: FieldWidth) -> String {
    match width {
        FieldWidth::TwoDigit => format!("{value:02}"),
        _ => value.to_string(),
    }
}

/// Minutes and seconds pad to two digits even when `numeric`.
fn numeric_field_padded(value: u32, width: FieldWidth) -> String {
    match width {
        FieldWidth::Numeric | FieldWidth::TwoDigit => format!("{value:02}"),
        _ => value.to_string(),
    }
}
