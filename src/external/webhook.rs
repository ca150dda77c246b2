use std::path::PathBuf;
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tokio::io::AsyncWriteExt;
use tracing::{debug, warn};

/// One upstream request, as recorded in the JSONL trace log and posted to the
/// notification webhook.
#[derive(Debug, Clone, Serialize)]
pub struct FetchTrace {
    pub ts: DateTime<Utc>,
    pub url: String,
    pub coin: String,
    pub vs: String,
    pub days: u32,
    pub status: u16,
    pub duration_ms: u64,
}

impl FetchTrace {
    pub fn new(
        url: &str,
        coin: &str,
        vs_currency: &str,
        days: u32,
        status: u16,
        duration: Duration,
    ) -> Self {
        Self {
            ts: Utc::now(),
            url: url.to_string(),
            coin: coin.to_string(),
            vs: vs_currency.to_string(),
            days,
            status,
            duration_ms: duration.as_millis() as u64,
        }
    }
}

/// Appends fetch traces to a JSONL log and, when WEBHOOK_URL is set, posts
/// each one there as JSON. Both happen off the request path and never fail
/// the caller.
pub struct FetchNotifier {
    client: reqwest::Client,
    webhook_url: Option<String>,
    trace_path: PathBuf,
}

impl FetchNotifier {
    pub fn from_env() -> Self {
        let log_dir = std::env::var("LOG_DIR").unwrap_or_else(|_| "server/logs".to_string());

        Self {
            client: reqwest::Client::new(),
            webhook_url: std::env::var("WEBHOOK_URL").ok().filter(|u| !u.is_empty()),
            trace_path: PathBuf::from(log_dir).join("http_trace.jsonl"),
        }
    }

    pub fn record(&self, trace: FetchTrace) {
        let line = match serde_json::to_string(&trace) {
            Ok(line) => line,
            Err(e) => {
                warn!("Failed to serialize fetch trace: {}", e);
                return;
            }
        };

        let path = self.trace_path.clone();
        tokio::spawn(async move {
            if let Err(e) = append_line(&path, &line).await {
                debug!("Could not write fetch trace to {}: {}", path.display(), e);
            }
        });

        if let Some(url) = self.webhook_url.clone() {
            let client = self.client.clone();
            tokio::spawn(async move {
                if let Err(e) = client.post(&url).json(&trace).send().await {
                    debug!("Webhook notification failed: {}", e);
                }
            });
        }
    }
}

async fn append_line(path: &PathBuf, line: &str) -> std::io::Result<()> {
    if let Some(dir) = path.parent() {
        tokio::fs::create_dir_all(dir).await?;
    }

    let mut file = tokio::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .await?;
    file.write_all(line.as_bytes()).await?;
    file.write_all(b"\n").await?;

    Ok(())
}
