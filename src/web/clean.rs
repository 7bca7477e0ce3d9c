//! Noise removal and section extraction.
//!
//! Markup is parsed into a DOM, non-content elements are detached, and the
//! target section is searched first by tag and class, then by tag and `id`.
//! When neither matches, the configured [`SectionFallback`] decides the
//! output. Extracted text always has its whitespace collapsed to single
//! spaces and trimmed.
//!
//! # Examples
//!
//! ```
//! use escriba::config::CleanConfig;
//! use escriba::web::clean::NoiseRemover;
//!
//! let remover = NoiseRemover::new(CleanConfig::default());
//! let output = remover.clean(
//!     r#"<div class="comments">Muito   bom!<script>track()</script></div>"#,
//!     "div",
//!     "comments",
//! );
//! assert_eq!(output.text, "Muito bom!");
//! ```

use log::{debug, warn};
use scraper::{ElementRef, Html};
use serde::{Deserialize, Serialize};

use crate::config::{CleanConfig, SectionFallback};
use crate::error::EscribaError;

/// Elements whose content never reaches the extracted text.
pub const NOISE_TAGS: &[&str] = &["script", "iframe", "style", "noscript"];

/// How the returned text was located.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SectionMatch {
    Class,
    Id,
    /// The section was absent and the fallback policy was applied.
    Fallback(SectionFallback),
}

/// Text extracted from a page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CleanOutput {
    pub text: String,
    pub matched: SectionMatch,
}

impl CleanOutput {
    /// Annotation describing a missed section, if the fallback was used.
    pub fn missing_section(&self, tag: &str, section: &str) -> Option<EscribaError> {
        match self.matched {
            SectionMatch::Fallback(fallback) => Some(EscribaError::section_not_found(format!(
                "no <{}> with class or id '{}' ({})",
                tag,
                section,
                fallback_label(fallback)
            ))),
            _ => None,
        }
    }
}

fn fallback_label(fallback: SectionFallback) -> &'static str {
    match fallback {
        SectionFallback::DocumentText => "used whole document text",
        SectionFallback::Sentinel => "returned sentinel",
    }
}

/// Extracts the text of a page section.
#[derive(Debug, Clone, Default)]
pub struct NoiseRemover {
    config: CleanConfig,
}

impl NoiseRemover {
    pub fn new(config: CleanConfig) -> Self {
        NoiseRemover { config }
    }

    pub fn config(&self) -> &CleanConfig {
        &self.config
    }

    /// Extract the text of the `tag` element identified by `section`.
    ///
    /// An empty `tag` matches any element.
    pub fn clean(&self, markup: &str, tag: &str, section: &str) -> CleanOutput {
        let mut document = Html::parse_document(markup);
        let removed = remove_noise(&mut document);
        if removed > 0 {
            debug!("Removed {} non-content elements", removed);
        }

        if let Some((element, matched)) = find_section(&document, tag, section) {
            return CleanOutput {
                text: collapse_whitespace(element.text()),
                matched,
            };
        }

        warn!(
            "Section '{}' not found in <{}> elements, applying {:?} fallback",
            section, tag, self.config.fallback
        );
        let text = match self.config.fallback {
            SectionFallback::DocumentText => collapse_whitespace(document.root_element().text()),
            SectionFallback::Sentinel => self.config.sentinel.clone(),
        };
        CleanOutput {
            text,
            matched: SectionMatch::Fallback(self.config.fallback),
        }
    }
}

/// Detach every noise element from the tree, returning how many were removed.
fn remove_noise(document: &mut Html) -> usize {
    let noise: Vec<_> = document
        .tree
        .root()
        .descendants()
        .filter(|node| {
            node.value()
                .as_element()
                .is_some_and(|element| NOISE_TAGS.contains(&element.name()))
        })
        .map(|node| node.id())
        .collect();

    for id in &noise {
        if let Some(mut node) = document.tree.get_mut(*id) {
            node.detach();
        }
    }
    noise.len()
}

fn find_section<'a>(
    document: &'a Html,
    tag: &str,
    section: &str,
) -> Option<(ElementRef<'a>, SectionMatch)> {
    let candidates = || {
        document
            .tree
            .root()
            .descendants()
            .filter_map(ElementRef::wrap)
            .filter(|element| tag.is_empty() || element.value().name().eq_ignore_ascii_case(tag))
    };

    if let Some(element) =
        candidates().find(|element| element.value().classes().any(|class| class == section))
    {
        return Some((element, SectionMatch::Class));
    }

    candidates()
        .find(|element| element.value().id() == Some(section))
        .map(|element| (element, SectionMatch::Id))
}

/// Concatenate text nodes as they appear, then collapse whitespace runs.
fn collapse_whitespace<'a, I: Iterator<Item = &'a str>>(pieces: I) -> String {
    let joined: String = pieces.collect();
    joined.split_whitespace().collect::<Vec<_>>().join(" ")
}
