use once_cell::sync::Lazy;
use reqwest::blocking::Client;

/// Shared blocking HTTP client with a custom User-Agent so that public
/// servers (USGS feeds, OpenStreetMap tiles) don't reject the request.
/// Building the client once avoids the cost of TLS and connection pool
/// setup for every download.
pub(crate) static HTTP_CLIENT: Lazy<Client> = Lazy::new(|| {
    Client::builder()
        .user_agent("quakemap/0.1 (+https://github.com/example/quakemap)")
        .build()
        .expect("failed to build reqwest blocking client")
});

/// Fetch a URL and return the response body, treating non-2xx statuses as
/// errors. Callers are expected to be on a background worker thread, never
/// the UI thread.
pub(crate) fn fetch_bytes(url: &str) -> crate::Result<Vec<u8>> {
    let resp = HTTP_CLIENT.get(url).send()?;
    if !resp.status().is_success() {
        return Err(crate::Error::Feed(format!("HTTP {}", resp.status())).into());
    }
    let bytes = resp.bytes()?;
    Ok(bytes.to_vec())
}

pub(crate) fn fetch_text(url: &str) -> crate::Result<String> {
    let resp = HTTP_CLIENT.get(url).send()?;
    if !resp.status().is_success() {
        return Err(crate::Error::Feed(format!("HTTP {}", resp.status())).into());
    }
    Ok(resp.text()?)
}
