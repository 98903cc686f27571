//! CLI input handling
//!
//! Reads candidate input from stdin and classifies it: a JSON payload goes
//! through the document walker, anything else is scraped line by line for
//! `service:action` identifiers. The scraper is deliberately forgiving
//! about the text around an identifier (quotes, commas, JSON fragments,
//! shell transcripts) so output from other tools can be piped in directly.

use regex::Regex;
use serde_json::Value;
use std::io::IsTerminal;
use std::sync::LazyLock;
use std::time::Duration;
use tokio::io::AsyncReadExt;
use tokio::time::timeout;
use tracing::debug;

/// What stdin turned out to contain.
#[derive(Debug, Clone, PartialEq)]
pub enum StdinPayload {
    /// Nothing arrived (or only whitespace).
    Empty,
    /// The payload parsed as JSON; walk it as a document.
    Document(Value),
    /// Free-form text; these are the identifiers scraped out of it.
    Actions(Vec<String>),
}

/// `service:action` tokens inside arbitrary text. The leading optional `:`
/// is consumed so the tail of an ARN is not re-matched as an identifier.
static ACTION_TOKEN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r":?([a-zA-Z0-9-]+:[a-zA-Z0-9*?\\]+)").expect("token pattern is valid")
});

/// Scrape the action identifiers out of one line of text.
///
/// Tokens that start with `arn:` (a resource, not an action) or with a
/// stray `:` are dropped.
pub fn extract_actions_from_line(line: &str) -> Vec<String> {
    ACTION_TOKEN
        .captures_iter(line)
        .filter(|caps| {
            let full = &caps[0];
            !full.starts_with("arn:") && !full.starts_with(':')
        })
        .map(|caps| caps[1].to_string())
        .collect()
}

/// Read stdin to EOF.
///
/// If the first byte does not arrive within `wait`, gives up and returns an
/// empty string; once data is flowing it reads to the end with no deadline.
/// The default wait is 10 seconds for piped input and 20 milliseconds at a
/// terminal, where usually nothing is coming.
pub async fn read_stdin(wait: Option<Duration>) -> std::io::Result<String> {
    let wait = wait.unwrap_or_else(default_read_wait);
    let mut stdin = tokio::io::stdin();
    let mut data = Vec::new();
    let mut first = [0u8; 8192];

    match timeout(wait, stdin.read(&mut first)).await {
        Err(_) => {
            debug!(wait_ms = wait.as_millis() as u64, "no stdin data before deadline");
            return Ok(String::new());
        }
        Ok(Ok(0)) => return Ok(String::new()),
        Ok(Ok(n)) => data.extend_from_slice(&first[..n]),
        Ok(Err(e)) => return Err(e),
    }

    stdin.read_to_end(&mut data).await?;
    Ok(String::from_utf8_lossy(&data).into_owned())
}

fn default_read_wait() -> Duration {
    if std::io::stdin().is_terminal() {
        Duration::from_millis(20)
    } else {
        Duration::from_secs(10)
    }
}

/// Read stdin and classify what arrived.
pub async fn parse_stdin(wait: Option<Duration>) -> std::io::Result<StdinPayload> {
    let data = read_stdin(wait).await?;
    Ok(classify_input(&data))
}

/// Classify a raw input payload: empty, JSON document, or scrapeable text.
pub fn classify_input(data: &str) -> StdinPayload {
    if data.trim().is_empty() {
        return StdinPayload::Empty;
    }
    if let Ok(value) = serde_json::from_str::<Value>(data) {
        return StdinPayload::Document(value);
    }
    StdinPayload::Actions(
        data.lines()
            .flat_map(extract_actions_from_line)
            .collect(),
    )
}
