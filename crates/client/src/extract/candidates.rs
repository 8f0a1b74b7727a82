//! Main-content candidate selection.
//!
//! Semantic containers (`article`, `main`, `[role=main]`) win when they hold
//! at least half of the page's visible text. Otherwise paragraphs vote for
//! their parent (full score) and grandparent (half score), the totals are
//! weighted by class/id hints and penalised by link density, and the best
//! scoring element is chosen. `body` is the last resort.

use regex::Regex;
use scraper::{ElementRef, Html, Selector};
use std::collections::HashMap;
use std::sync::LazyLock;

/// Elements whose subtrees never contribute content.
const BOILERPLATE_TAGS: &[&str] =
    &["script", "style", "nav", "aside", "form", "noscript", "iframe", "svg", "template"];

/// Page chrome unless it sits inside an article or main region.
const CHROME_TAGS: &[&str] = &["header", "footer"];

const VOID_TAGS: &[&str] =
    &["area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "source", "track", "wbr"];

const BOILERPLATE_ROLES: &[&str] = &["navigation", "banner", "complementary", "contentinfo", "search"];

/// Paragraphs shorter than this do not vote.
const MIN_PARAGRAPH_CHARS: usize = 25;

static SEMANTIC: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse(r#"article, main, [role="main"]"#).expect("invalid selector"));
static PARAGRAPHS: LazyLock<Selector> = LazyLock::new(|| Selector::parse("p, pre").expect("invalid selector"));
static LINKS: LazyLock<Selector> = LazyLock::new(|| Selector::parse("a").expect("invalid selector"));
static BODY: LazyLock<Selector> = LazyLock::new(|| Selector::parse("body").expect("invalid selector"));

static UNLIKELY: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)-ad-|ai2html|banner|breadcrumbs|combx|comment|community|cover-wrap|disqus|extra|footer|gdpr|header|legends|menu|related|remark|replies|rss|shoutbox|sidebar|skyscraper|social|sponsor|supplemental|ad-break|agegate|pagination|pager|popup|yom-remote",
    )
    .expect("invalid regex")
});
static MAYBE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)and|article|body|column|content|main|shadow").expect("invalid regex"));
static POSITIVE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)article|body|content|entry|hentry|h-entry|main|page|post|text|blog|story").expect("invalid regex")
});
static NEGATIVE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)-ad-|hidden|^hid$| hid$| hid |^hid |banner|combx|comment|com-|contact|foot|footer|footnote|gdpr|masthead|media|meta|outbrain|promo|related|scroll|share|shoutbox|sidebar|skyscraper|sponsor|shopping|tags|tool|widget",
    )
    .expect("invalid regex")
});

/// Pick the element holding the page's main content, if any text survives.
pub fn select_main_content(doc: &Html) -> Option<ElementRef<'_>> {
    let body = doc.select(&BODY).next().unwrap_or_else(|| doc.root_element());
    let body_len = visible_len(body);
    if body_len == 0 {
        return None;
    }

    semantic_container(doc, body_len).or_else(|| best_scored(doc)).or(Some(body))
}

fn semantic_container(doc: &Html, body_len: usize) -> Option<ElementRef<'_>> {
    doc.select(&SEMANTIC)
        .filter(|el| !inside_boilerplate(*el))
        .map(|el| (el, visible_len(el)))
        .filter(|(_, len)| *len * 2 >= body_len)
        .max_by_key(|(_, len)| *len)
        .map(|(el, _)| el)
}

fn best_scored(doc: &Html) -> Option<ElementRef<'_>> {
    let mut scores: HashMap<_, (ElementRef<'_>, f64)> = HashMap::new();

    for para in doc.select(&PARAGRAPHS) {
        if inside_boilerplate(para) {
            continue;
        }

        let text = visible_text(para);
        let len = text.chars().count();
        if len < MIN_PARAGRAPH_CHARS {
            continue;
        }

        let score = 1.0 + text.matches(',').count() as f64 + (len / 100).min(3) as f64;

        let mut ancestors = para.ancestors().filter_map(ElementRef::wrap);
        if let Some(parent) = ancestors.next() {
            scores.entry(parent.id()).or_insert_with(|| (parent, initial_score(parent))).1 += score;
        }
        if let Some(grandparent) = ancestors.next() {
            scores
                .entry(grandparent.id())
                .or_insert_with(|| (grandparent, initial_score(grandparent)))
                .1 += score / 2.0;
        }
    }

    scores
        .into_values()
        .map(|(el, score)| (el, score * (1.0 - link_density(el))))
        .max_by(|a, b| a.1.total_cmp(&b.1))
        .map(|(el, _)| el)
}

fn initial_score(el: ElementRef<'_>) -> f64 {
    let tag_bonus = match el.value().name() {
        "div" => 5.0,
        "pre" | "td" | "blockquote" => 3.0,
        "address" | "ol" | "ul" | "dl" | "dd" | "dt" | "li" | "form" => -3.0,
        "h1" | "h2" | "h3" | "h4" | "h5" | "h6" | "th" => -5.0,
        _ => 0.0,
    };
    tag_bonus + class_weight(el)
}

fn class_weight(el: ElementRef<'_>) -> f64 {
    let mut weight = 0.0;
    for hint in [el.value().attr("class"), el.value().id()].into_iter().flatten() {
        if NEGATIVE.is_match(hint) {
            weight -= 25.0;
        }
        if POSITIVE.is_match(hint) {
            weight += 25.0;
        }
    }
    weight
}

fn link_density(el: ElementRef<'_>) -> f64 {
    let total = visible_len(el);
    if total == 0 {
        return 0.0;
    }
    let linked: usize = el.select(&LINKS).map(visible_len).sum();
    (linked as f64 / total as f64).min(1.0)
}

/// Whether `el` or any of its ancestors is navigation, chrome or script.
fn inside_boilerplate(el: ElementRef<'_>) -> bool {
    std::iter::once(el)
        .chain(el.ancestors().filter_map(ElementRef::wrap))
        .any(is_boilerplate)
}

fn is_boilerplate(el: ElementRef<'_>) -> bool {
    let value = el.value();
    let name = value.name();
    if BOILERPLATE_TAGS.contains(&name) {
        return true;
    }
    if value.attr("role").is_some_and(|role| BOILERPLATE_ROLES.contains(&role)) {
        return true;
    }
    if CHROME_TAGS.contains(&name) {
        return !within_content_region(el);
    }
    if matches!(name, "html" | "body" | "article" | "main") {
        return false;
    }
    let hints = format!("{} {}", value.attr("class").unwrap_or_default(), value.id().unwrap_or_default());
    UNLIKELY.is_match(&hints) && !MAYBE.is_match(&hints)
}

fn within_content_region(el: ElementRef<'_>) -> bool {
    el.ancestors()
        .filter_map(ElementRef::wrap)
        .any(|a| matches!(a.value().name(), "article" | "main") || a.value().attr("role") == Some("main"))
}

/// Serialize `el` back to HTML with every boilerplate descendant and comment removed.
pub fn clean_html(el: ElementRef<'_>) -> String {
    let mut out = String::new();
    write_element(el, &mut out);
    out
}

fn write_element(el: ElementRef<'_>, out: &mut String) {
    let value = el.value();
    let name = value.name();

    out.push('<');
    out.push_str(name);
    for (attr, attr_value) in value.attrs() {
        out.push(' ');
        out.push_str(attr);
        out.push_str("=\"");
        push_escaped(out, attr_value);
        out.push('"');
    }
    out.push('>');

    if VOID_TAGS.contains(&name) {
        return;
    }

    for child in el.children() {
        if let Some(child_el) = ElementRef::wrap(child) {
            if !is_boilerplate(child_el) {
                write_element(child_el, out);
            }
        } else if let Some(text) = child.value().as_text() {
            push_escaped(out, text);
        }
    }

    out.push_str("</");
    out.push_str(name);
    out.push('>');
}

fn push_escaped(out: &mut String, text: &str) {
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            _ => out.push(c),
        }
    }
}

/// Text of `el` outside boilerplate subtrees, whitespace collapsed.
pub fn visible_text(el: ElementRef<'_>) -> String {
    let mut raw = String::new();
    collect_text(el, &mut raw);
    raw.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn visible_len(el: ElementRef<'_>) -> usize {
    visible_text(el).chars().count()
}

fn collect_text(el: ElementRef<'_>, out: &mut String) {
    for child in el.children() {
        if let Some(child_el) = ElementRef::wrap(child) {
            if !is_boilerplate(child_el) {
                collect_text(child_el, out);
            }
        } else if let Some(text) = child.value().as_text() {
            out.push_str(text);
            out.push(' ');
        }
    }
}
