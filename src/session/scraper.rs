//! Page field extraction
//!
//! The state machine only needs "find the element matching this selector and
//! give me its text". [`PageScraper`] is that capability; [`RegexScraper`] is
//! a small implementation good enough for the handful of stable ids and
//! classes the site exposes.

use regex::Regex;
use std::fmt;
use std::sync::LazyLock;

static OPEN_TAG_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)<([A-Za-z][A-Za-z0-9-]*)\b([^>]*)>").unwrap());
static ATTRIBUTE_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"([^\s=/>"']+)\s*=\s*(?:"([^"]*)"|'([^']*)'|([^\s>"']+))"#).unwrap()
});
static ANY_TAG_REGEX: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?s)<[^>]*>").unwrap());

/// Elements that never have a closing tag
const VOID_ELEMENTS: [&str; 8] = ["area", "br", "col", "hr", "img", "input", "link", "meta"];

/// A stable element locator
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Selector {
    /// `#id`
    Id(String),
    /// `.a.b`: element carrying every listed class
    Classes(Vec<String>),
}

impl Selector {
    pub fn id(id: impl Into<String>) -> Self {
        Self::Id(id.into())
    }

    pub fn classes<I, S>(classes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::Classes(classes.into_iter().map(Into::into).collect())
    }

    fn matches(&self, attributes: &[(String, String)]) -> bool {
        match self {
            Self::Id(id) => attribute(attributes, "id") == Some(id.as_str()),
            Self::Classes(wanted) => attribute(attributes, "class").is_some_and(|class| {
                let present: Vec<&str> = class.split_whitespace().collect();
                wanted.iter().all(|w| present.contains(&w.as_str()))
            }),
        }
    }
}

impl fmt::Display for Selector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Id(id) => write!(f, "#{}", id),
            Self::Classes(classes) => {
                for class in classes {
                    write!(f, ".{}", class)?;
                }
                Ok(())
            }
        }
    }
}

/// Locate fields in an HTML document
pub trait PageScraper: Send + Sync {
    /// Trimmed text content of the first element matching `selector`
    fn text(&self, html: &str, selector: &Selector) -> Option<String>;

    /// `value` attribute of the first `<input>` with the given `name`
    fn input_value(&self, html: &str, name: &str) -> Option<String>;
}

/// Regex-driven [`PageScraper`]
#[derive(Debug, Clone, Copy, Default)]
pub struct RegexScraper;

impl PageScraper for RegexScraper {
    fn text(&self, html: &str, selector: &Selector) -> Option<String> {
        let open = OPEN_TAG_REGEX
            .captures_iter(html)
            .find(|caps| selector.matches(&parse_attributes(&caps[2])))?;

        let whole = open.get(0)?;
        let tag = open[1].to_ascii_lowercase();
        if is_void(&tag) || whole.as_str().ends_with("/>") {
            return Some(String::new());
        }

        let inner_start = whole.end();
        let inner_end = closing_tag_start(html, inner_start, &tag).unwrap_or(html.len());
        Some(inner_text(&html[inner_start..inner_end]))
    }

    fn input_value(&self, html: &str, name: &str) -> Option<String> {
        OPEN_TAG_REGEX
            .captures_iter(html)
            .filter(|caps| caps[1].eq_ignore_ascii_case("input"))
            .map(|caps| parse_attributes(&caps[2]))
            .find(|attributes| attribute(attributes, "name") == Some(name))
            .and_then(|attributes| attribute(&attributes, "value").map(decode_entities))
    }
}

fn is_void(tag: &str) -> bool {
    VOID_ELEMENTS.contains(&tag)
}

/// Attributes as lowercase name/value pairs
fn parse_attributes(raw: &str) -> Vec<(String, String)> {
    ATTRIBUTE_REGEX
        .captures_iter(raw)
        .map(|caps| {
            let value = caps
                .get(2)
                .or_else(|| caps.get(3))
                .or_else(|| caps.get(4))
                .map(|m| m.as_str())
                .unwrap_or_default();
            (caps[1].to_ascii_lowercase(), value.to_string())
        })
        .collect()
}

fn attribute<'a>(attributes: &'a [(String, String)], name: &str) -> Option<&'a str> {
    attributes
        .iter()
        .find(|(key, _)| key == name)
        .map(|(_, value)| value.as_str())
}

/// Byte offset of the `</tag>` closing the element opened just before `from`
fn closing_tag_start(html: &str, from: usize, tag: &str) -> Option<usize> {
    let pattern = format!(r"(?i)<(/?){}\b[^>]*>", regex::escape(tag));
    let same_tag = Regex::new(&pattern).ok()?;

    let mut depth = 1usize;
    for caps in same_tag.captures_iter(&html[from..]) {
        let whole = caps.get(0)?;
        if &caps[1] == "/" {
            depth -= 1;
            if depth == 0 {
                return Some(from + whole.start());
            }
        } else if !whole.as_str().ends_with("/>") {
            depth += 1;
        }
    }
    None
}

fn inner_text(fragment: &str) -> String {
    decode_entities(ANY_TAG_REGEX.replace_all(fragment, "").trim())
        .trim()
        .to_string()
}

fn decode_entities(text: &str) -> String {
    text.replace("&nbsp;", " ")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&#39;", "'")
        .replace("&amp;", "&")
}
