//! Document source fetching GeoJSON documents from a static HTTP location.

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, StatusCode};
use tracing::debug;

use ecopoints_core::ports::{DocumentName, DocumentSource, SourceError, SourceMeta};

/// Serves a fixed list of documents below a base URL.
///
/// Document `name` is fetched from `{base_url}/{name}`.
pub struct HttpSource {
    client: Client,
    base_url: String,
    documents: Vec<DocumentName>,
    meta: SourceMeta,
}

impl HttpSource {
    /// Create a source for the given documents, bound to the HTTP client.
    #[must_use]
    pub fn new<S: Into<String>>(client: Client, base_url: S, documents: Vec<DocumentName>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_owned();
        let meta = SourceMeta {
            kind: "http".to_owned(),
            location: base_url.clone(),
        };
        Self {
            client,
            base_url,
            documents,
            meta,
        }
    }

    /// URL a document is fetched from.
    #[must_use]
    pub fn document_url(&self, name: &DocumentName) -> String {
        format!("{}/{}", self.base_url, name.0.trim_start_matches('/'))
    }
}

#[async_trait]
impl DocumentSource for HttpSource {
    fn meta(&self) -> &SourceMeta {
        &self.meta
    }

    async fn list(&self) -> Result<Vec<DocumentName>, SourceError> {
        Ok(self.documents.clone())
    }

    async fn fetch(&self, name: &DocumentName) -> Result<String, SourceError> {
        if !self.documents.contains(name) {
            return Err(SourceError::NotFound(name.clone()));
        }

        let url = self.document_url(name);
        debug!(%url, "fetching document");
        fetch_text(self.client.get(url), name).await
    }
}

// Small helper to fetch a body as text with status handling.
async fn fetch_text(req: RequestBuilder, name: &DocumentName) -> Result<String, SourceError> {
    let resp = req.send().await.map_err(SourceError::from)?;

    if resp.status() == StatusCode::NOT_FOUND {
        return Err(SourceError::NotFound(name.clone()));
    }

    resp.error_for_status()
        .map_err(SourceError::from)?
        .text()
        .await
        .map_err(SourceError::from)
}

#[cfg(test)]
mod tests {
    use super::*;

    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;

    fn source() -> HttpSource {
        HttpSource::new(
            Client::new(),
            "https://example.org/data/",
            vec![DocumentName::from("ecopontos.geojson"), DocumentName::from("pev.geojson")],
        )
    }

    #[test]
    fn builds_document_urls() {
        let source = source();
        assert_eq!(source.meta().location, "https://example.org/data");
        assert_eq!(
            source.document_url(&DocumentName::from("pev.geojson")),
            "https://example.org/data/pev.geojson"
        );
    }

    #[tokio::test]
    async fn lists_configured_documents() {
        let names = source().list().await.expect("list");
        assert_eq!(
            names,
            [
                DocumentName::from("ecopontos.geojson"),
                DocumentName::from("pev.geojson")
            ]
        );
    }

    #[tokio::test]
    async fn unknown_documents_are_not_requested() {
        let err = source()
            .fetch(&DocumentName::from("other.geojson"))
            .await
            .expect_err("not configured");
        assert!(matches!(err, SourceError::NotFound(_)));
    }

    /// Serve every request with the same status line and body; returns the base URL.
    async fn serve(status: &'static str, body: &'static str) -> String {
        let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
        let addr = listener.local_addr().expect("local addr");
        tokio::spawn(async move {
            while let Ok((mut stream, _)) = listener.accept().await {
                let mut request = [0_u8; 2048];
                stream.read(&mut request).await.ok();
                let response = format!(
                    "HTTP/1.1 {status}\r\ncontent-length: {}\r\nconnection: close\r\n\r\n{body}",
                    body.len()
                );
                stream.write_all(response.as_bytes()).await.ok();
            }
        });
        format!("http://{addr}")
    }

    fn local_source(base_url: String) -> HttpSource {
        let client = Client::builder().no_proxy().build().expect("client");
        HttpSource::new(client, base_url, vec![DocumentName::from("pev.geojson")])
    }

    #[tokio::test]
    async fn fetches_body_on_success() {
        let body = r#"{"type":"FeatureCollection","features":[]}"#;
        let source = local_source(serve("200 OK", body).await);
        let text = source
            .fetch(&DocumentName::from("pev.geojson"))
            .await
            .expect("fetch");
        assert_eq!(text, body);
    }

    #[tokio::test]
    async fn missing_remote_document_is_not_found() {
        let source = local_source(serve("404 Not Found", "").await);
        let err = source
            .fetch(&DocumentName::from("pev.geojson"))
            .await
            .expect_err("404");
        assert!(matches!(err, SourceError::NotFound(ref name) if name.0 == "pev.geojson"), "{err:?}");
    }

    #[tokio::test]
    async fn server_errors_are_network_errors() {
        let source = local_source(serve("500 Internal Server Error", "boom").await);
        let err = source
            .fetch(&DocumentName::from("pev.geojson"))
            .await
            .expect_err("500");
        assert!(
            matches!(
                &err,
                SourceError::Network(inner) if inner.status() == Some(StatusCode::INTERNAL_SERVER_ERROR)
            ),
            "{err:?}"
        );
    }
}
