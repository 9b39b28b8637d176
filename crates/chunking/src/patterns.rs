//! Compiled regex statics shared by the detectors.

use std::sync::OnceLock;

use regex::Regex;

pub(crate) fn numbered_item() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^\s*\d{1,3}[.)]\s+").expect("valid numbered item regex"))
}

pub(crate) fn lettered_item() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^\s*[A-Za-z][.)]\s+").expect("valid lettered item regex"))
}

pub(crate) fn bullet_item() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^\s*[-•*]\s+").expect("valid bullet item regex"))
}

pub(crate) fn checkbox_item() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^\s*[-*]\s*\[[ xX]\]\s+").expect("valid checkbox item regex"))
}

pub(crate) fn markdown_heading() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^\s*#{1,6}\s+").expect("valid markdown heading regex"))
}

/// A horizontal rule: 3+ repeated dashes, equals signs, asterisks or underscores.
pub(crate) fn section_rule() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^\s*[-=*_]{3,}\s*$").expect("valid section rule regex"))
}

/// A lone `[bracketed]` token on its own line.
pub(crate) fn bracketed_token() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^\s*\[[^\[\]]+\]\s*$").expect("valid bracketed token regex"))
}

/// A run of two or more spaces (the multispace column separator).
pub(crate) fn multi_space() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r" {2,}").expect("valid multi space regex"))
}

/// Currency symbol followed by digits with an optional decimal part.
pub(crate) fn currency_amount() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"[$€£¥]\s?\d+(?:[.,]\d+)?").expect("valid currency amount regex"))
}

/// A short `key:` / `key=` prefix with trailing content.
pub(crate) fn key_prefix() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"^\s*[A-Za-z_][A-Za-z0-9_ /\-]{0,39}\s*[:=]\s*\S").expect("valid key prefix regex")
    })
}

pub(crate) fn kv_colon() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^[^:]+:\s+\S").expect("valid key-value colon regex"))
}

pub(crate) fn kv_equals() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^[^=]+=\s*\S").expect("valid key-value equals regex"))
}

pub(crate) fn kv_arrow() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^.+(->|=>)\s*\S").expect("valid key-value arrow regex"))
}
