//! Dashboard page parser
//!
//! The page has no structured feed, so fields are located by CSS class and by
//! position among same-class siblings:
//!
//! | Selector            | Index | Field                       |
//! |---------------------|-------|-----------------------------|
//! | `.header`           | 0     | city description            |
//! | `.header`           | 2     | dams description and link   |
//! | `.header`           | 3     | cape tonians description    |
//! | `.header`           | 4     | other projects description  |
//! | `h3`                | first | day zero                    |
//! | `.percentage_label` | 0/1/2 | city progress / dam level / cape tonian amount |
//! | `.box`              | 1/2   | dams trend / cape tonians trend |
//! | `.other_projects`   | 1     | other project rows          |
//!
//! The element counts are checked before any positional read so that a
//! reshuffled page fails loudly instead of filling the wrong fields.

use crate::extract::dates::{parse_day_zero, parse_stats_as_at};
use crate::extract::text::{
    area_and_type, clean, element_text, ensure_percentage_range, parse_percentage, strip_percent,
};
use crate::extract::types::{
    CapeTonians, City, Dams, Direction, Other, Project, Snapshot, Status, Trend, DISCLAIMER,
    UNDER_REVIEW,
};
use scraper::{ElementRef, Html, Selector};
use thiserror::Error;

const HEADER_CITY: usize = 0;
const HEADER_DAMS: usize = 2;
const HEADER_CAPE_TONIANS: usize = 3;
const HEADER_OTHER: usize = 4;

const LABEL_CITY_PROGRESS: usize = 0;
const LABEL_DAM_LEVEL: usize = 1;
const LABEL_CAPE_TONIAN_AMOUNT: usize = 2;

const BOX_DAMS: usize = 1;
const BOX_CAPE_TONIANS: usize = 2;

const OTHER_PROJECTS_LIST: usize = 1;

/// Errors that abort extraction of a snapshot
#[derive(Debug, Error)]
pub enum ParseError {
    #[error("markup error: {0}")]
    Markup(String),

    #[error("unexpected page structure: expected at least {expected} `{selector}` elements, found {found}")]
    Structure {
        selector: &'static str,
        expected: usize,
        found: usize,
    },

    #[error("failed to extract {field}: {reason}")]
    Field { field: &'static str, reason: String },

    #[error("invalid selector `{selector}`: {message}")]
    Selector {
        selector: &'static str,
        message: String,
    },
}

impl ParseError {
    fn field(field: &'static str, reason: impl Into<String>) -> Self {
        ParseError::Field {
            field,
            reason: reason.into(),
        }
    }
}

/// Why a single project row was dropped
#[derive(Debug, Error)]
pub enum SkippableRowError {
    #[error("row has no `{0}` element")]
    Missing(&'static str),

    #[error("bad percentage: {0}")]
    Percentage(String),
}

/// Parses raw page bytes into a snapshot
///
/// Required fields that are missing or fail to coerce abort the whole parse.
/// Project rows with an unusable percentage are dropped from their list.
/// The returned snapshot has `cached` set to `false`.
///
/// # Example
///
/// ```no_run
/// let bytes = std::fs::read("dashboard.html").unwrap();
/// let snapshot = dayzero::extract::parse(&bytes).unwrap();
/// println!("Day zero: {}", snapshot.day_zero.date_naive());
/// ```
pub fn parse(raw: &[u8]) -> Result<Snapshot, ParseError> {
    let html = std::str::from_utf8(raw)
        .map_err(|e| ParseError::Markup(format!("page is not valid UTF-8: {}", e)))?;

    if html.trim().is_empty() {
        return Err(ParseError::Markup("page is empty".to_string()));
    }

    let document = Html::parse_document(html);
    let page = Page::locate(&document)?;

    let day_zero = page.day_zero()?;
    let stats_as_at_week = page.stats_as_at_week()?;

    let city = City {
        description: page.header_description(HEADER_CITY)?,
        progress: page.required_percentage(LABEL_CITY_PROGRESS, "city.progress")?,
        projects: page.city_projects()?,
    };

    let dams = Dams {
        description: page.header_description(HEADER_DAMS)?,
        description_url: page.header_link(HEADER_DAMS)?,
        level: page.required_percentage(LABEL_DAM_LEVEL, "dams.level")?,
        trend: page.trend(BOX_DAMS, "dams.trend")?,
    };

    let cape_tonians = CapeTonians {
        description: page.header_description(HEADER_CAPE_TONIANS)?,
        amount: page.cape_tonian_amount()?,
        trend: page.trend(BOX_CAPE_TONIANS, "capetonians.trend")?,
    };

    let other = Other {
        description: page.header_description(HEADER_OTHER)?,
        projects: page.other_projects()?,
    };

    tracing::debug!(
        "Parsed snapshot: day zero {}, {} city projects, {} other projects",
        day_zero.date_naive(),
        city.projects.len(),
        other.projects.len()
    );

    Ok(Snapshot {
        day_zero,
        stats_as_at_week,
        city,
        dams,
        cape_tonians,
        other,
        disclaimer: DISCLAIMER.to_string(),
        cached: false,
    })
}

/// Compiles a selector from a fixed string
fn selector(css: &'static str) -> Result<Selector, ParseError> {
    Selector::parse(css).map_err(|e| ParseError::Selector {
        selector: css,
        message: e.to_string(),
    })
}

/// Collects every match of `css`, failing if there are fewer than `expected`
fn collect_at_least<'a>(
    document: &'a Html,
    css: &'static str,
    expected: usize,
) -> Result<Vec<ElementRef<'a>>, ParseError> {
    let found: Vec<ElementRef<'a>> = document.select(&selector(css)?).collect();
    if found.len() < expected {
        return Err(ParseError::Structure {
            selector: css,
            expected,
            found: found.len(),
        });
    }
    Ok(found)
}

fn has_class(element: ElementRef<'_>, class: &str) -> bool {
    element.value().classes().any(|c| c == class)
}

/// The repeated page regions, located once and checked for count
struct Page<'a> {
    document: &'a Html,
    headers: Vec<ElementRef<'a>>,
    labels: Vec<ElementRef<'a>>,
    boxes: Vec<ElementRef<'a>>,
    other_lists: Vec<ElementRef<'a>>,
}

impl<'a> Page<'a> {
    fn locate(document: &'a Html) -> Result<Self, ParseError> {
        Ok(Self {
            document,
            headers: collect_at_least(document, ".header", HEADER_OTHER + 1)?,
            labels: collect_at_least(document, ".percentage_label", LABEL_CAPE_TONIAN_AMOUNT + 1)?,
            boxes: collect_at_least(document, ".box", BOX_CAPE_TONIANS + 1)?,
            other_lists: collect_at_least(document, ".other_projects", OTHER_PROJECTS_LIST + 1)?,
        })
    }

    /// Normalised text of every paragraph in a header block
    fn header_description(&self, index: usize) -> Result<String, ParseError> {
        let paragraph = selector("p")?;
        let text = self.headers[index]
            .select(&paragraph)
            .map(element_text)
            .collect::<Vec<_>>()
            .join(" ");
        Ok(clean(&text))
    }

    fn header_link(&self, index: usize) -> Result<Option<String>, ParseError> {
        let link = selector("a[href]")?;
        Ok(self.headers[index]
            .select(&link)
            .next()
            .and_then(|a| a.value().attr("href"))
            .map(|href| href.trim().to_string())
            .filter(|href| !href.is_empty()))
    }

    fn day_zero(&self) -> Result<chrono::DateTime<chrono::FixedOffset>, ParseError> {
        let heading = self
            .document
            .select(&selector("h3")?)
            .next()
            .ok_or_else(|| ParseError::field("dayzero", "page has no <h3> heading"))?;

        parse_day_zero(&element_text(heading)).map_err(|reason| ParseError::field("dayzero", reason))
    }

    /// The stats banner is optional, but a banner that is present must parse
    fn stats_as_at_week(
        &self,
    ) -> Result<Option<chrono::DateTime<chrono::FixedOffset>>, ParseError> {
        let banner = match self.document.select(&selector(".status p")?).next() {
            Some(banner) => clean(&element_text(banner)),
            None => return Ok(None),
        };

        if banner.is_empty() {
            return Ok(None);
        }

        parse_stats_as_at(&banner)
            .map(Some)
            .map_err(|reason| ParseError::field("statsAsAtWeek", reason))
    }

    fn required_percentage(&self, index: usize, field: &'static str) -> Result<f64, ParseError> {
        let text = element_text(self.labels[index]);
        parse_percentage(&text)
            .and_then(ensure_percentage_range)
            .map_err(|reason| ParseError::field(field, reason))
    }

    /// Blank text means the figure is under review, not that parsing failed
    fn cape_tonian_amount(&self) -> Result<f64, ParseError> {
        let text = element_text(self.labels[LABEL_CAPE_TONIAN_AMOUNT]);
        if strip_percent(&text).is_empty() {
            tracing::debug!("Cape tonian amount is blank, marking as under review");
            return Ok(UNDER_REVIEW);
        }
        self.required_percentage(LABEL_CAPE_TONIAN_AMOUNT, "capetonians.amount")
    }

    fn trend(&self, index: usize, field: &'static str) -> Result<Trend, ParseError> {
        let span = self.boxes[index]
            .select(&selector(".footer span")?)
            .next()
            .ok_or_else(|| ParseError::field(field, "box has no `.footer span` element"))?;

        let amount = parse_percentage(&element_text(span))
            .map_err(|reason| ParseError::field(field, reason))?;

        let direction = if has_class(span, "down") {
            Direction::Down
        } else if has_class(span, "up") {
            Direction::Up
        } else {
            Direction::Unknown
        };

        Ok(Trend { amount, direction })
    }

    fn city_projects(&self) -> Result<Vec<Project>, ParseError> {
        let rows = selector(".box .areas .area")?;
        let label = selector("p")?;
        let value = selector(".pval")?;

        Ok(collect_projects(
            self.document.select(&rows),
            &label,
            "p",
            &value,
            true,
        ))
    }

    fn other_projects(&self) -> Result<Vec<Project>, ParseError> {
        let rows = selector(".area")?;
        let label = selector("h4")?;
        let value = selector(".pval")?;

        Ok(collect_projects(
            self.other_lists[OTHER_PROJECTS_LIST].select(&rows),
            &label,
            "h4",
            &value,
            false,
        ))
    }
}

/// Reads project rows, dropping the ones that cannot be coerced
fn collect_projects<'a>(
    rows: impl Iterator<Item = ElementRef<'a>>,
    label: &Selector,
    label_css: &'static str,
    value: &Selector,
    with_status: bool,
) -> Vec<Project> {
    rows.enumerate()
        .filter_map(|(index, row)| {
            match project_row(row, label, label_css, value, with_status) {
                Ok(project) => Some(project),
                Err(e) => {
                    tracing::debug!("Skipping project row {}: {}", index, e);
                    None
                }
            }
        })
        .collect()
}

fn project_row(
    row: ElementRef<'_>,
    label: &Selector,
    label_css: &'static str,
    value: &Selector,
    with_status: bool,
) -> Result<Project, SkippableRowError> {
    let label = row
        .select(label)
        .next()
        .ok_or(SkippableRowError::Missing(label_css))?;
    let (area, kind) = area_and_type(&clean(&element_text(label)));

    let value = row
        .select(value)
        .next()
        .ok_or(SkippableRowError::Missing(".pval"))?;
    let percentage = parse_percentage(&element_text(value))
        .and_then(ensure_percentage_range)
        .map_err(SkippableRowError::Percentage)?;

    let status = if !with_status {
        Status::Unknown
    } else if has_class(row, "behind_schedule") {
        Status::BehindSchedule
    } else if has_class(row, "on_schedule") {
        Status::OnSchedule
    } else {
        Status::Unknown
    };

    Ok(Project {
        area,
        kind,
        percentage,
        status,
    })
}
