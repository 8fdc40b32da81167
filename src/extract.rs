//! Full-article text extraction for the detail pane.
//!
//! The extraction engine fetches the article page over HTTP and pulls a
//! reader-mode view out of the HTML: the headline plus the body paragraphs,
//! soft-wrapped to a fixed column width.  The pipeline treats the engine as
//! an opaque capability — given a link, return structured text — so it can
//! be swapped for something heavier without touching the controller.
//!
//! Building the engine (HTTP client setup) is the slow part, so it happens
//! once on a background thread started at session launch; the first
//! selection waits on a single-assignment promise instead of paying the
//! cold start inline.

use std::sync::mpsc;
use std::thread;
use std::time::Duration;

use scraper::{Html, Selector};

use crate::feed::FeedError;

/// Soft wrap column for the detail pane.
const WRAP_COLUMNS: usize = 72;

/// Per-article fetch deadline.
const FETCH_TIMEOUT: Duration = Duration::from_secs(20);

/// Reader-mode structured text for one article.
#[derive(Debug, Clone, PartialEq)]
pub struct Article {
    pub title: String,
    pub paragraphs: Vec<String>,
}

impl Article {
    /// Render for the detail pane: headline, then each paragraph wrapped to
    /// [`WRAP_COLUMNS`] and separated by blank lines.
    pub fn render(&self) -> String {
        let mut out = String::new();
        if !self.title.is_empty() {
            out.push_str(&self.title);
            out.push('\n');
        }
        for para in &self.paragraphs {
            out.push('\n');
            for line in wrap_lines(para, WRAP_COLUMNS) {
                out.push_str(line.trim());
                out.push('\n');
            }
        }
        out
    }
}

/// The article-extraction engine: an HTTP client plus HTML selectors.
pub struct Extractor {
    client: reqwest::blocking::Client,
}

impl Extractor {
    pub fn new() -> Result<Self, FeedError> {
        let client = reqwest::blocking::Client::builder()
            .timeout(FETCH_TIMEOUT)
            .user_agent(concat!("feedreel/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| FeedError::Extraction(e.to_string()))?;
        Ok(Self { client })
    }

    /// Fetch the page at `url` and extract its reader-mode text.
    pub fn extract(&self, url: &str) -> Result<Article, FeedError> {
        let body = self
            .client
            .get(url)
            .send()
            .and_then(|resp| resp.error_for_status())
            .and_then(|resp| resp.text())
            .map_err(|e| FeedError::Extraction(e.to_string()))?;
        parse_article(&body)
    }
}

/// Pull the headline and body paragraphs out of an HTML document.
///
/// Prefers paragraphs inside an `<article>` element; falls back to every
/// `<p>` when the page has no article landmark.
pub fn parse_article(html: &str) -> Result<Article, FeedError> {
    let doc = Html::parse_document(html);
    let h1 = selector("h1")?;
    let title_tag = selector("title")?;
    let article_p = selector("article p")?;
    let any_p = selector("p")?;

    let title = doc
        .select(&h1)
        .next()
        .or_else(|| doc.select(&title_tag).next())
        .map(|el| collapse_whitespace(&el.text().collect::<String>()))
        .unwrap_or_default();

    let mut paragraphs: Vec<String> = doc
        .select(&article_p)
        .map(|el| collapse_whitespace(&el.text().collect::<String>()))
        .filter(|p| !p.is_empty())
        .collect();
    if paragraphs.is_empty() {
        paragraphs = doc
            .select(&any_p)
            .map(|el| collapse_whitespace(&el.text().collect::<String>()))
            .filter(|p| !p.is_empty())
            .collect();
    }

    Ok(Article { title, paragraphs })
}

fn selector(css: &str) -> Result<Selector, FeedError> {
    Selector::parse(css).map_err(|e| FeedError::Extraction(e.to_string()))
}

fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Soft-wrap at `soft_limit` characters, breaking at the nearest following
/// space.  Lines after the first keep their leading space; callers trim
/// when rendering.
pub fn wrap_lines(text: &str, soft_limit: usize) -> Vec<String> {
    let mut lines = Vec::new();
    let mut rest = text;
    loop {
        let mut break_at = None;
        for (count, (idx, ch)) in rest.char_indices().enumerate() {
            if count >= soft_limit && ch == ' ' {
                break_at = Some(idx);
                break;
            }
        }
        match break_at {
            Some(idx) => {
                lines.push(rest[..idx].to_string());
                rest = &rest[idx..];
            }
            None => {
                if !rest.is_empty() {
                    lines.push(rest.to_string());
                }
                return lines;
            }
        }
    }
}

/// A single-assignment promise for the extraction engine.
///
/// [`LazyExtractor::start`] kicks off construction on a background thread;
/// [`get`](LazyExtractor::get) blocks until that thread has delivered the
/// engine (or its error) and then answers from the cached result forever.
pub struct LazyExtractor {
    pending: Option<mpsc::Receiver<Result<Extractor, FeedError>>>,
    ready: Option<Extractor>,
    failed: Option<String>,
}

impl LazyExtractor {
    pub fn start() -> Self {
        let (tx, rx) = mpsc::channel();
        thread::spawn(move || {
            // A send failure means the session ended before first use.
            let _ = tx.send(Extractor::new());
        });
        Self {
            pending: Some(rx),
            ready: None,
            failed: None,
        }
    }

    /// The engine handle, waiting for initialization on first call.
    pub fn get(&mut self) -> Result<&Extractor, FeedError> {
        if let Some(rx) = self.pending.take() {
            match rx.recv() {
                Ok(Ok(extractor)) => self.ready = Some(extractor),
                Ok(Err(e)) => self.failed = Some(e.to_string()),
                Err(_) => self.failed = Some("extractor initialization thread exited".to_string()),
            }
        }
        match self.ready.as_ref() {
            Some(extractor) => Ok(extractor),
            None => Err(FeedError::Extraction(
                self.failed.clone().unwrap_or_default(),
            )),
        }
    }
}
