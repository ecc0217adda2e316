use std::time::Duration;

use async_trait::async_trait;

use super::error::FetchError;

/// Source of the raw trajectory document.
#[async_trait]
pub trait FeedSource: Send + Sync {
    async fn fetch(&self) -> Result<String, FetchError>;
}

/// Fetches the feed with a single GET against a fixed URL. No retries.
pub struct HttpFeedSource {
    client: reqwest::Client,
    url: String,
}

impl HttpFeedSource {
    pub fn new(url: impl Into<String>, timeout: Duration) -> Result<Self, FetchError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(FetchError::Network)?;
        Ok(Self {
            client,
            url: url.into(),
        })
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

#[async_trait]
impl FeedSource for HttpFeedSource {
    async fn fetch(&self) -> Result<String, FetchError> {
        let response = self.client.get(&self.url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status(status));
        }
        Ok(response.text().await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{http::StatusCode, routing::get, Router};

    async fn serve(app: Router) -> String {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        format!("http://{addr}")
    }

    #[tokio::test]
    async fn returns_body_on_success() {
        let base = serve(Router::new().route("/feed.xml", get(|| async { "<ndm/>" }))).await;
        let source = HttpFeedSource::new(format!("{base}/feed.xml"), Duration::from_secs(5)).unwrap();

        assert_eq!(source.fetch().await.unwrap(), "<ndm/>");
    }

    #[tokio::test]
    async fn non_success_status_is_an_error() {
        let base = serve(Router::new().route(
            "/feed.xml",
            get(|| async { (StatusCode::SERVICE_UNAVAILABLE, "down") }),
        ))
        .await;
        let source = HttpFeedSource::new(format!("{base}/feed.xml"), Duration::from_secs(5)).unwrap();

        match source.fetch().await {
            Err(FetchError::Status(status)) => assert_eq!(status, 503),
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[tokio::test]
    async fn slow_server_times_out() {
        let base = serve(Router::new().route(
            "/feed.xml",
            get(|| async {
                tokio::time::sleep(Duration::from_secs(10)).await;
                "<ndm/>"
            }),
        ))
        .await;
        let source =
            HttpFeedSource::new(format!("{base}/feed.xml"), Duration::from_millis(100)).unwrap();

        assert!(matches!(source.fetch().await, Err(FetchError::Timeout)));
    }

    #[tokio::test]
    async fn unreachable_host_is_a_network_error() {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);
        let source = HttpFeedSource::new(format!("http://{addr}/feed.xml"), Duration::from_secs(5))
            .unwrap();

        assert!(matches!(source.fetch().await, Err(FetchError::Network(_))));
    }
}
