use futures_util::TryStreamExt;
use reqwest::{Client, StatusCode};
use serde::de::DeserializeOwned;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio_util::io::StreamReader;

#[derive(Debug, thiserror::Error)]
pub enum WatchError {
    #[error("watch request failed: {0}")]
    Request(#[from] reqwest::Error),
    #[error("watch request rejected with HTTP {0}")]
    Status(StatusCode),
}

/// Follows a newline-delimited JSON watch stream until the server closes it.
///
/// Lines that do not deserialize into `T` are logged and skipped.
/// Returns the number of events handed to `handle_event`.
pub async fn watch_stream<T, F>(
    client: &Client,
    url: &str,
    mut handle_event: F,
) -> Result<usize, WatchError>
where
    T: DeserializeOwned,
    F: FnMut(T) + Send,
{
    let resp = client.get(url).send().await?;
    if !resp.status().is_success() {
        return Err(WatchError::Status(resp.status()));
    }

    let byte_stream = resp.bytes_stream().map_err(std::io::Error::other);
    let mut lines = BufReader::new(StreamReader::new(byte_stream)).lines();
    tracing::debug!(%url, "Started watching stream");

    let mut handled = 0;
    while let Ok(Some(line)) = lines.next_line().await {
        if line.trim().is_empty() {
            continue;
        }
        match serde_json::from_str::<T>(&line) {
            Ok(event) => {
                handle_event(event);
                handled += 1;
            }
            Err(error) => tracing::warn!(%line, %error, "Failed to deserialize watch event"),
        }
    }

    tracing::warn!(%url, handled, "Watch stream ended");
    Ok(handled)
}
