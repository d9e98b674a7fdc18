use std::fmt;
use std::str::FromStr;

use crate::dom::document::Document;
use crate::foundation::core::ElementId;
use crate::foundation::error::{PageError, PageResult};

/// Parsed CSS selector (the subset the page markup needs).
///
/// Supported: type (`section`, `*`), `#id`, `.class`, `[attr]`, `[attr="v"]`, `[attr^="v"]`,
/// compounds of those, the descendant combinator (whitespace) and comma-separated lists.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Selector {
    source: String,
    alternatives: Vec<Complex>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
struct Complex {
    // Left to right; every gap is a descendant combinator.
    compounds: Vec<Compound>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
struct Compound {
    tag: Option<String>,
    id: Option<String>,
    classes: Vec<String>,
    attrs: Vec<AttrMatch>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
struct AttrMatch {
    name: String,
    op: AttrOp,
}

#[derive(Clone, Debug, PartialEq, Eq)]
enum AttrOp {
    Exists,
    Equals(String),
    Prefix(String),
}

impl Selector {
    /// Parses a selector or selector list; unsupported syntax is an error.
    pub fn parse(src: &str) -> PageResult<Self> {
        let trimmed = src.trim();
        if trimmed.is_empty() {
            return Err(PageError::selector("empty selector"));
        }
        let mut alternatives = Vec::new();
        for part in split_top_level(trimmed, |c| c == ',')? {
            let part = part.trim();
            if part.is_empty() {
                return Err(PageError::selector(format!(
                    "empty entry in selector list '{trimmed}'"
                )));
            }
            alternatives.push(parse_complex(part)?);
        }
        Ok(Self {
            source: trimmed.to_string(),
            alternatives,
        })
    }

    /// Trimmed source text.
    pub fn as_str(&self) -> &str {
        &self.source
    }

    /// Whether `el` is matched by any alternative of this selector.
    pub fn matches<D: Document + ?Sized>(&self, doc: &D, el: ElementId) -> bool {
        self.alternatives.iter().any(|c| c.matches(doc, el))
    }
}

impl FromStr for Selector {
    type Err = PageError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for Selector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.source)
    }
}

impl Complex {
    fn matches<D: Document + ?Sized>(&self, doc: &D, el: ElementId) -> bool {
        let Some((subject, ancestors)) = self.compounds.split_last() else {
            return false;
        };
        if !subject.matches(doc, el) {
            return false;
        }
        // Descendant-only chains can be matched greedily from the nearest ancestor outwards.
        let mut cursor = doc.parent(el);
        for compound in ancestors.iter().rev() {
            loop {
                let Some(candidate) = cursor else {
                    return false;
                };
                cursor = doc.parent(candidate);
                if compound.matches(doc, candidate) {
                    break;
                }
            }
        }
        true
    }
}

impl Compound {
    fn matches<D: Document + ?Sized>(&self, doc: &D, el: ElementId) -> bool {
        if let Some(tag) = &self.tag {
            match doc.tag_name(el) {
                Some(actual) if actual.eq_ignore_ascii_case(tag) => {}
                _ => return false,
            }
        }
        if let Some(id) = &self.id {
            if doc.attribute(el, "id").as_deref() != Some(id.as_str()) {
                return false;
            }
        }
        if !self.classes.iter().all(|c| doc.has_class(el, c)) {
            return false;
        }
        self.attrs.iter().all(|a| {
            let value = doc.attribute(el, &a.name);
            match (&a.op, value) {
                (_, None) => false,
                (AttrOp::Exists, Some(_)) => true,
                (AttrOp::Equals(want), Some(v)) => v == *want,
                (AttrOp::Prefix(want), Some(v)) => v.starts_with(want.as_str()),
            }
        })
    }
}

/// Splits `src` at characters accepted by `is_sep`, ignoring separators inside `[...]` and
/// quoted strings.
fn split_top_level(src: &str, is_sep: impl Fn(char) -> bool) -> PageResult<Vec<&str>> {
    let mut parts = Vec::new();
    let mut depth = 0usize;
    let mut quote: Option<char> = None;
    let mut start = 0usize;
    for (i, c) in src.char_indices() {
        if let Some(q) = quote {
            if c == q {
                quote = None;
            }
            continue;
        }
        match c {
            '"' | '\'' if depth > 0 => quote = Some(c),
            '[' => depth += 1,
            ']' => {
                depth = depth
                    .checked_sub(1)
                    .ok_or_else(|| PageError::selector(format!("unbalanced ']' in '{src}'")))?;
            }
            c if depth == 0 && is_sep(c) => {
                parts.push(&src[start..i]);
                start = i + c.len_utf8();
            }
            _ => {}
        }
    }
    if depth != 0 || quote.is_some() {
        return Err(PageError::selector(format!(
            "unterminated attribute selector in '{src}'"
        )));
    }
    parts.push(&src[start..]);
    Ok(parts)
}

fn parse_complex(src: &str) -> PageResult<Complex> {
    let mut compounds = Vec::new();
    for token in split_top_level(src, char::is_whitespace)? {
        if token.is_empty() {
            continue;
        }
        compounds.push(parse_compound(token)?);
    }
    if compounds.is_empty() {
        return Err(PageError::selector(format!("empty selector '{src}'")));
    }
    Ok(Complex { compounds })
}

fn is_ident_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '-' || c == '_'
}

fn read_ident(chars: &[char], i: &mut usize) -> Option<String> {
    let start = *i;
    while *i < chars.len() && is_ident_char(chars[*i]) {
        *i += 1;
    }
    (*i > start).then(|| chars[start..*i].iter().collect())
}

fn parse_compound(token: &str) -> PageResult<Compound> {
    let chars: Vec<char> = token.chars().collect();
    let mut out = Compound::default();
    let mut i = 0usize;

    if chars.first() == Some(&'*') {
        i = 1;
    } else if let Some(tag) = read_ident(&chars, &mut i) {
        out.tag = Some(tag.to_ascii_lowercase());
    }

    while i < chars.len() {
        let c = chars[i];
        i += 1;
        match c {
            '.' => {
                let class = read_ident(&chars, &mut i).ok_or_else(|| {
                    PageError::selector(format!("missing class name in '{token}'"))
                })?;
                out.classes.push(class);
            }
            '#' => {
                let id = read_ident(&chars, &mut i)
                    .ok_or_else(|| PageError::selector(format!("missing id in '{token}'")))?;
                out.id = Some(id);
            }
            '[' => {
                let start = i;
                let mut quote: Option<char> = None;
                while i < chars.len() {
                    match (quote, chars[i]) {
                        (Some(q), c) if c == q => quote = None,
                        (None, '"' | '\'') => quote = Some(chars[i]),
                        (None, ']') => break,
                        _ => {}
                    }
                    i += 1;
                }
                if i >= chars.len() {
                    return Err(PageError::selector(format!(
                        "unterminated attribute selector in '{token}'"
                    )));
                }
                let inner: String = chars[start..i].iter().collect();
                i += 1; // ']'
                out.attrs.push(parse_attr(&inner, token)?);
            }
            '>' | '+' | '~' => {
                return Err(PageError::selector(format!(
                    "combinator '{c}' is not supported in '{token}'"
                )));
            }
            other => {
                return Err(PageError::selector(format!(
                    "unexpected '{other}' in '{token}'"
                )));
            }
        }
    }
    Ok(out)
}

fn parse_attr(inner: &str, token: &str) -> PageResult<AttrMatch> {
    let inner = inner.trim();
    // First `=` outside quotes; a preceding `^` makes it a prefix match.
    let mut quote: Option<char> = None;
    let mut eq_at = None;
    for (idx, c) in inner.char_indices() {
        match (quote, c) {
            (Some(q), c) if c == q => quote = None,
            (None, '"' | '\'') => quote = Some(c),
            (None, '=') => {
                eq_at = Some(idx);
                break;
            }
            _ => {}
        }
    }
    let (name, op) = match eq_at {
        Some(eq) => {
            let value = unquote(&inner[eq + 1..]);
            match inner[..eq].strip_suffix('^') {
                Some(name) => (name, AttrOp::Prefix(value)),
                None => (&inner[..eq], AttrOp::Equals(value)),
            }
        }
        None => (inner, AttrOp::Exists),
    };
    let name = name.trim();
    if name.is_empty() || !name.chars().all(is_ident_char) {
        return Err(PageError::selector(format!(
            "invalid attribute name '{name}' in '{token}'"
        )));
    }
    Ok(AttrMatch {
        name: name.to_ascii_lowercase(),
        op,
    })
}

fn unquote(raw: &str) -> String {
    let raw = raw.trim();
    for q in ['"', '\''] {
        if raw.len() >= 2 && raw.starts_with(q) && raw.ends_with(q) {
            return raw[1..raw.len() - 1].to_string();
        }
    }
    raw.to_string()
}

#[cfg(test)]
#[path = "../../tests/unit/dom/selector.rs"]
mod tests;
