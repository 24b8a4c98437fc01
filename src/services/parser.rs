use crate::config::DEFAULT_CONTENT_SELECTOR;
use crate::error::{RagError, Result};
use regex::Regex;
use scraper::{Html, Selector};
use tracing::{debug, warn};

/// Pulls paragraph text out of the main content container of an HTML page.
pub struct HtmlParser {
    content_selector: Selector,
    paragraph_selector: Selector,
    citation_pattern: Regex,
}

impl HtmlParser {
    pub fn new(content_selector: &str) -> Result<Self> {
        let content = Selector::parse(content_selector).map_err(|e| RagError::Config {
            reason: format!("Invalid content selector '{}': {}", content_selector, e),
        })?;

        let paragraph = Selector::parse("p").map_err(|e| RagError::Config {
            reason: format!("Invalid paragraph selector: {}", e),
        })?;

        // Wikipedia-style footnote references: [1], [23]
        let citation_pattern = Regex::new(r"\[\d+\]").map_err(|e| RagError::Config {
            reason: format!("Invalid citation pattern: {}", e),
        })?;

        Ok(Self {
            content_selector: content,
            paragraph_selector: paragraph,
            citation_pattern,
        })
    }

    /// Returns the joined paragraph text, or an empty string when the
    /// container or its paragraphs are missing.
    pub fn extract_text(&self, html: &str) -> String {
        let document = Html::parse_document(html);

        let Some(container) = document.select(&self.content_selector).next() else {
            warn!("Content container not found in page");
            return String::new();
        };

        let paragraphs: Vec<String> = container
            .select(&self.paragraph_selector)
            .map(|p| p.text().collect::<String>())
            .collect();

        if paragraphs.is_empty() {
            warn!("No paragraphs found inside content container");
            return String::new();
        }

        debug!("Extracted {} paragraphs", paragraphs.len());

        let joined = paragraphs.join("\n\n");
        self.strip_citations(&joined).trim().to_string()
    }

    pub fn strip_citations(&self, text: &str) -> String {
        self.citation_pattern.replace_all(text, "").into_owned()
    }
}

impl Default for HtmlParser {
    fn default() -> Self {
        Self::new(DEFAULT_CONTENT_SELECTOR).unwrap()
    }
}
