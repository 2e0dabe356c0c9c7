use std::sync::Arc;
use std::time::{Duration, Instant};

use anyhow::Result;
use indicatif::{ProgressBar, ProgressStyle};
use reqwest::Client;
use rusqlite::Connection;
use tokio::sync::Semaphore;
use tracing::{info, warn};

use crate::config::Settings;
use crate::db::{self, FetchRow, PendingPage};
use crate::error::PipelineError;

/// Fetch stats returned after completion.
pub struct FetchStats {
    pub total: usize,
    pub ok: usize,
    pub errors: usize,
}

pub fn client(settings: &Settings) -> Result<Client> {
    Ok(Client::builder()
        .user_agent(&settings.user_agent)
        .timeout(Duration::from_secs(30))
        .build()?)
}

/// GET a page body, failing on any non-success status.
pub async fn fetch_text(client: &Client, url: &str) -> Result<String, PipelineError> {
    let fail = |reason: String| PipelineError::Fetch {
        url: url.to_string(),
        reason,
    };
    let response = client.get(url).send().await.map_err(|e| fail(e.to_string()))?;
    let status = response.status();
    if !status.is_success() {
        return Err(fail(format!("HTTP {}", status.as_u16())));
    }
    response.text().await.map_err(|e| fail(e.to_string()))
}

/// Fetch pages concurrently, saving each result to the store as it arrives.
pub async fn fetch_pages_streaming(
    conn: &Connection,
    pages: Vec<PendingPage>,
    settings: &Settings,
) -> Result<FetchStats> {
    let client = client(settings)?;
    let concurrency = settings.concurrency.max(1);
    let semaphore = Arc::new(Semaphore::new(concurrency));
    let total = pages.len();

    let pb = ProgressBar::new(total as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("[{elapsed_precise}] {bar:40} {pos}/{len} ({per_sec}, eta {eta})")?
            .progress_chars("=> "),
    );

    let (tx, mut rx) = tokio::sync::mpsc::channel::<FetchRow>(concurrency * 2);

    for page in pages {
        let client = client.clone();
        let sem = Arc::clone(&semaphore);
        let tx = tx.clone();
        let retry = RetryPolicy::from(settings);

        tokio::spawn(async move {
            let Ok(_permit) = sem.acquire().await else {
                return;
            };
            let row = fetch_with_retry(&client, page.id, &page.url, retry).await;
            let _ = tx.send(row).await;
        });
    }

    // rx closes once every task has dropped its sender
    drop(tx);

    let mut ok = 0usize;
    let mut errors = 0usize;
    while let Some(row) = rx.recv().await {
        if row.error.is_some() {
            errors += 1;
        } else {
            ok += 1;
        }
        db::save_fetch(conn, &row)?;
        pb.inc(1);
    }

    pb.finish_and_clear();
    info!(total, ok, errors, "fetched pages");

    Ok(FetchStats { total, ok, errors })
}

#[derive(Debug, Clone, Copy)]
pub struct RetryPolicy {
    pub max_retries: u32,
    pub backoff_ms: u64,
}

impl From<&Settings> for RetryPolicy {
    fn from(settings: &Settings) -> Self {
        RetryPolicy {
            max_retries: settings.max_retries,
            backoff_ms: settings.backoff_ms,
        }
    }
}

impl RetryPolicy {
    pub fn backoff(&self, attempt: u32) -> Duration {
        Duration::from_millis(self.backoff_ms.saturating_mul(2u64.saturating_pow(attempt)))
    }
}

/// Rate limiting and server errors are worth another try.
pub fn should_retry(status: Option<u16>) -> bool {
    matches!(status, Some(429) | Some(500..=599))
}

async fn fetch_with_retry(
    client: &Client,
    page_id: i64,
    url: &str,
    retry: RetryPolicy,
) -> FetchRow {
    let mut attempt = 0;
    loop {
        let row = fetch_one(client, page_id, url).await;
        if !should_retry(row.status) || attempt >= retry.max_retries {
            return row;
        }
        let backoff = retry.backoff(attempt);
        warn!(
            "HTTP {:?} on {} (attempt {}/{}), backing off {:.1}s",
            row.status,
            url,
            attempt + 1,
            retry.max_retries,
            backoff.as_secs_f64()
        );
        tokio::time::sleep(backoff).await;
        attempt += 1;
    }
}

async fn fetch_one(client: &Client, page_id: i64, url: &str) -> FetchRow {
    let start = Instant::now();
    let mut row = FetchRow {
        page_id,
        url: url.to_string(),
        html: None,
        status: None,
        error: None,
        latency_ms: None,
    };

    match client.get(url).send().await {
        Ok(response) => {
            let status = response.status();
            row.status = Some(status.as_u16());
            if status.is_success() {
                match response.text().await {
                    Ok(body) => row.html = Some(body),
                    Err(e) => row.error = Some(e.to_string()),
                }
            } else {
                row.error = Some(format!("HTTP {}", status.as_u16()));
            }
        }
        Err(e) => row.error = Some(e.to_string()),
    }
    row.latency_ms = Some(start.elapsed().as_millis() as i64);
    if let Some(error) = &row.error {
        warn!(url, %error, "fetch failed");
    }
    row
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn retries_rate_limits_and_server_errors() {
        assert!(should_retry(Some(429)));
        assert!(should_retry(Some(500)));
        assert!(should_retry(Some(503)));
        assert!(!should_retry(Some(200)));
        assert!(!should_retry(Some(404)));
        assert!(!should_retry(None));
    }

    #[test]
    fn backoff_doubles() {
        let retry = RetryPolicy {
            max_retries: 3,
            backoff_ms: 1000,
        };
        assert_eq!(retry.backoff(0), Duration::from_millis(1000));
        assert_eq!(retry.backoff(1), Duration::from_millis(2000));
        assert_eq!(retry.backoff(3), Duration::from_millis(8000));
    }
}
