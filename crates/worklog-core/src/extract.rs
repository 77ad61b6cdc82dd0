//! Date-window extraction over the markdown worklog.
//!
//! An entry is a bullet (or a top-level text line) plus everything nested
//! under it. Its date is the first of:
//!   1. a day-precise date on the entry line itself: `(Jul 29, 2025)`,
//!      `July 29, 2025`, or `2025-07-29`;
//!   2. the period of the innermost enclosing heading that names one:
//!      `# 2025`, `## July 2025`, `## 2025-07`, `## Q3 2025`,
//!      `## Week of Jul 28, 2025`, `### 2025-07-29`.
//!
//! Day-precise entries are kept iff the day lies in the window. Entries dated
//! only by a heading period are kept iff the period overlaps the window.
//! Entries with no date at all are dropped. Headings are emitted only above
//! kept entries.

use chrono::{Days, NaiveDate};
use regex::Regex;
use std::sync::OnceLock;

// ---------------------------------------------------------------------------
// Period
// ---------------------------------------------------------------------------

/// An inclusive range of calendar days.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Period {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl Period {
    pub fn day(date: NaiveDate) -> Self {
        Self {
            start: date,
            end: date,
        }
    }

    pub fn month(year: i32, month: u32) -> Option<Self> {
        let start = NaiveDate::from_ymd_opt(year, month, 1)?;
        let next = if month == 12 {
            NaiveDate::from_ymd_opt(year + 1, 1, 1)?
        } else {
            NaiveDate::from_ymd_opt(year, month + 1, 1)?
        };
        Some(Self {
            start,
            end: next.pred_opt()?,
        })
    }

    pub fn quarter(year: i32, quarter: u32) -> Option<Self> {
        if !(1..=4).contains(&quarter) {
            return None;
        }
        let first = Self::month(year, (quarter - 1) * 3 + 1)?;
        let last = Self::month(year, quarter * 3)?;
        Some(Self {
            start: first.start,
            end: last.end,
        })
    }

    pub fn year(year: i32) -> Option<Self> {
        Some(Self {
            start: NaiveDate::from_ymd_opt(year, 1, 1)?,
            end: NaiveDate::from_ymd_opt(year, 12, 31)?,
        })
    }

    pub fn week_starting(date: NaiveDate) -> Self {
        Self {
            start: date,
            end: date.checked_add_days(Days::new(6)).unwrap_or(date),
        }
    }

    pub fn overlaps(&self, start: NaiveDate, end: NaiveDate) -> bool {
        self.start <= end && self.end >= start
    }
}

// ---------------------------------------------------------------------------
// Date parsing
// ---------------------------------------------------------------------------

static TAG_RE: OnceLock<Regex> = OnceLock::new();
static TEXT_DAY_RE: OnceLock<Regex> = OnceLock::new();
static ISO_DAY_RE: OnceLock<Regex> = OnceLock::new();
static ISO_MONTH_RE: OnceLock<Regex> = OnceLock::new();
static MONTH_YEAR_RE: OnceLock<Regex> = OnceLock::new();
static QUARTER_RE: OnceLock<Regex> = OnceLock::new();
static YEAR_RE: OnceLock<Regex> = OnceLock::new();
static WEEK_RE: OnceLock<Regex> = OnceLock::new();

fn tag_re() -> &'static Regex {
    TAG_RE.get_or_init(|| {
        Regex::new(r"\(\s*([A-Za-z]{3,9})\.?\s+(\d{1,2}),?\s+(\d{4})\s*\)").unwrap()
    })
}

fn text_day_re() -> &'static Regex {
    TEXT_DAY_RE
        .get_or_init(|| Regex::new(r"\b([A-Za-z]{3,9})\.?\s+(\d{1,2}),?\s+(\d{4})\b").unwrap())
}

fn iso_day_re() -> &'static Regex {
    ISO_DAY_RE.get_or_init(|| Regex::new(r"\b(\d{4})-(\d{2})-(\d{2})\b").unwrap())
}

fn iso_month_re() -> &'static Regex {
    ISO_MONTH_RE.get_or_init(|| Regex::new(r"\b(\d{4})-(\d{2})\b").unwrap())
}

fn month_year_re() -> &'static Regex {
    MONTH_YEAR_RE.get_or_init(|| Regex::new(r"\b([A-Za-z]{3,9})\.?\s+(\d{4})\b").unwrap())
}

fn quarter_re() -> &'static Regex {
    QUARTER_RE.get_or_init(|| Regex::new(r"(?i)\bQ([1-4])\s+(\d{4})\b").unwrap())
}

fn year_re() -> &'static Regex {
    YEAR_RE.get_or_init(|| Regex::new(r"^(\d{4})(?:\s|:|$)").unwrap())
}

fn week_re() -> &'static Regex {
    WEEK_RE.get_or_init(|| Regex::new(r"(?i)^week\s+of\s+(.+)$").unwrap())
}

/// Month number for an English month name or its common abbreviation.
pub fn month_number(name: &str) -> Option<u32> {
    let n = match name.to_ascii_lowercase().as_str() {
        "jan" | "january" => 1,
        "feb" | "february" => 2,
        "mar" | "march" => 3,
        "apr" | "april" => 4,
        "may" => 5,
        "jun" | "june" => 6,
        "jul" | "july" => 7,
        "aug" | "august" => 8,
        "sep" | "sept" | "september" => 9,
        "oct" | "october" => 10,
        "nov" | "november" => 11,
        "dec" | "december" => 12,
        _ => return None,
    };
    Some(n)
}

fn named_day(caps: &regex::Captures<'_>) -> Option<NaiveDate> {
    let month = month_number(&caps[1])?;
    let day = caps[2].parse().ok()?;
    let year = caps[3].parse().ok()?;
    NaiveDate::from_ymd_opt(year, month, day)
}

fn iso_day(caps: &regex::Captures<'_>) -> Option<NaiveDate> {
    NaiveDate::from_ymd_opt(caps[1].parse().ok()?, caps[2].parse().ok()?, caps[3].parse().ok()?)
}

/// The day-precise date written on an entry line, if any. A parenthesized
/// tag wins over other dates; among several, the last one wins.
pub fn parse_entry_date(line: &str) -> Option<NaiveDate> {
    tag_re()
        .captures_iter(line)
        .filter_map(|c| named_day(&c))
        .last()
        .or_else(|| parse_day(line))
}

fn parse_day(text: &str) -> Option<NaiveDate> {
    iso_day_re()
        .captures_iter(text)
        .filter_map(|c| iso_day(&c))
        .last()
        .or_else(|| {
            text_day_re()
                .captures_iter(text)
                .filter_map(|c| named_day(&c))
                .last()
        })
}

/// The period a heading names, from a single day up to a whole year.
pub fn parse_heading_period(heading: &str) -> Option<Period> {
    let text = heading
        .trim()
        .trim_matches(|c| c == '*' || c == '_')
        .trim();

    if let Some(caps) = week_re().captures(text) {
        if let Some(date) = parse_day(&caps[1]) {
            return Some(Period::week_starting(date));
        }
    }
    if let Some(date) = parse_day(text) {
        return Some(Period::day(date));
    }
    for caps in month_year_re().captures_iter(text) {
        if let (Some(month), Ok(year)) = (month_number(&caps[1]), caps[2].parse()) {
            return Period::month(year, month);
        }
    }
    if let Some(caps) = iso_month_re().captures(text) {
        return Period::month(caps[1].parse().ok()?, caps[2].parse().ok()?);
    }
    if let Some(caps) = quarter_re().captures(text) {
        return Period::quarter(caps[2].parse().ok()?, caps[1].parse().ok()?);
    }
    if let Some(caps) = year_re().captures(text) {
        return Period::year(caps[1].parse().ok()?);
    }
    None
}

// ---------------------------------------------------------------------------
// Line classification
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Line<'a> {
    Heading { level: usize, text: &'a str },
    Bullet { indent: usize },
    Text { indent: usize },
    Blank,
}

fn classify(line: &str) -> Line<'_> {
    let rest = line.trim_start();
    if rest.is_empty() {
        return Line::Blank;
    }
    let indent: usize = line[..line.len() - rest.len()]
        .chars()
        .map(|c| if c == '\t' { 4 } else { 1 })
        .sum();

    if indent < 4 && rest.starts_with('#') {
        let level = rest.chars().take_while(|&c| c == '#').count();
        let after = &rest[level..];
        if level <= 6 && (after.is_empty() || after.starts_with(char::is_whitespace)) {
            return Line::Heading {
                level,
                text: after.trim().trim_end_matches('#').trim(),
            };
        }
    }
    if is_bullet(rest) {
        Line::Bullet { indent }
    } else {
        Line::Text { indent }
    }
}

fn is_bullet(rest: &str) -> bool {
    if rest.starts_with("- ") || rest.starts_with("* ") || rest.starts_with("+ ") {
        return true;
    }
    let digits = rest.chars().take_while(char::is_ascii_digit).count();
    digits > 0
        && rest[digits..]
            .strip_prefix(['.', ')'])
            .is_some_and(|after| after.starts_with(' '))
}

// ---------------------------------------------------------------------------
// Extraction
// ---------------------------------------------------------------------------

struct OpenHeading<'a> {
    level: usize,
    line: &'a str,
    period: Option<Period>,
    emitted: bool,
}

/// The part of `document` attributable to `[start, end]` (inclusive), with the
/// headings above each kept entry. Empty when nothing matches.
pub fn extract_range(document: &str, start: NaiveDate, end: NaiveDate) -> String {
    let mut out: Vec<&str> = Vec::new();
    let mut headings: Vec<OpenHeading<'_>> = Vec::new();
    // Open entries, outermost first, as (indent, kept).
    let mut entries: Vec<(usize, bool)> = Vec::new();

    for line in document.lines() {
        let kind = classify(line);
        let (indent, is_text) = match kind {
            Line::Blank => {
                entries.clear();
                continue;
            }
            Line::Heading { level, text } => {
                headings.retain(|h| h.level < level);
                headings.push(OpenHeading {
                    level,
                    line,
                    period: parse_heading_period(text),
                    emitted: false,
                });
                entries.clear();
                continue;
            }
            Line::Bullet { indent } => (indent, false),
            Line::Text { indent } => (indent, true),
        };

        let own_date = parse_entry_date(line);
        let kept = match (own_date, entries.last().copied()) {
            // An undated text line continues whatever entry is open.
            (None, Some((_, parent_kept))) if is_text => parent_kept,
            _ => {
                entries.retain(|&(open_indent, _)| open_indent < indent);
                let kept = match (own_date, entries.last()) {
                    (Some(date), _) => start <= date && date <= end,
                    (None, Some(&(_, parent_kept))) => parent_kept,
                    (None, None) => heading_in_range(&headings, start, end),
                };
                entries.push((indent, kept));
                kept
            }
        };

        if kept {
            emit_headings(&mut out, &mut headings);
            out.push(line);
        }
    }

    if out.is_empty() {
        return String::new();
    }
    let mut text = out.join("\n");
    text.push('\n');
    text
}

fn heading_in_range(headings: &[OpenHeading<'_>], start: NaiveDate, end: NaiveDate) -> bool {
    headings
        .iter()
        .rev()
        .find_map(|h| h.period)
        .is_some_and(|p| p.overlaps(start, end))
}

fn emit_headings<'a>(out: &mut Vec<&'a str>, headings: &mut [OpenHeading<'a>]) {
    for heading in headings.iter_mut().filter(|h| !h.emitted) {
        if out.last().is_some_and(|l| !l.is_empty()) {
            out.push("");
        }
        out.push(heading.line);
        heading.emitted = true;
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
