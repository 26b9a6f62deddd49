//! HTTP implementation of the catalog API

use std::time::Duration;

use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use reqwest::{RequestBuilder, Url};
use tracing::{debug, warn};

use super::response::{check_status, parse_book, parse_book_list, Operation};
use super::CatalogApi;
use crate::config::Config;
use crate::error::{CatalogError, CatalogResult};
use crate::models::{Book, BookFields, ImageFile};

const USER_AGENT: &str = concat!("bookshelf/", env!("CARGO_PKG_VERSION"));

/// Catalog API client over HTTP
#[derive(Debug, Clone)]
pub struct HttpCatalogClient {
    http: reqwest::Client,
    base_url: Url,
}

impl HttpCatalogClient {
    /// Create a client for the API at `base_url`
    pub fn new(base_url: &str, timeout: Duration) -> CatalogResult<Self> {
        let base_url = Url::parse(base_url).map_err(|e| CatalogError::InvalidUrl {
            url: base_url.to_string(),
            details: e.to_string(),
        })?;

        let http = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(USER_AGENT)
            .build()
            .map_err(CatalogError::from_reqwest)?;

        Ok(Self { http, base_url })
    }

    pub fn from_config(config: &Config) -> CatalogResult<Self> {
        Self::new(&config.api_url, config.timeout())
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Build an endpoint URL under the base URL's path
    fn endpoint(&self, path: &str) -> CatalogResult<Url> {
        let raw = format!(
            "{}/{}",
            self.base_url.as_str().trim_end_matches('/'),
            path.trim_start_matches('/')
        );
        Url::parse(&raw).map_err(|e| CatalogError::InvalidUrl {
            url: raw,
            details: e.to_string(),
        })
    }

    /// Send a request and return the body of a successful response
    async fn execute(&self, op: Operation, request: RequestBuilder) -> CatalogResult<String> {
        let result = self.execute_inner(op, request).await;
        if let Err(e) = &result {
            warn!("Failed to {}: {}", op, e);
        }
        result
    }

    async fn execute_inner(&self, op: Operation, request: RequestBuilder) -> CatalogResult<String> {
        debug!("Sending request to {}", op);

        let response = request.send().await.map_err(CatalogError::from_reqwest)?;
        let status = response.status();
        let body = response.text().await.map_err(CatalogError::from_reqwest)?;

        debug!("{} answered {} ({} bytes)", op, status, body.len());
        check_status(op, status, &body)?;
        Ok(body)
    }
}

#[async_trait]
impl CatalogApi for HttpCatalogClient {
    async fn list(&self) -> CatalogResult<Vec<Book>> {
        let url = self.endpoint("api/books")?;
        let body = self.execute(Operation::List, self.http.get(url)).await?;
        parse_book_list(&body).inspect_err(|e| warn!("Failed to list books: {}", e))
    }

    async fn fetch(&self, id: i64) -> CatalogResult<Book> {
        let op = Operation::Fetch(id);
        let url = self.endpoint(&format!("api/books/{}", id))?;
        let body = self.execute(op, self.http.get(url)).await?;
        parse_book(&body).inspect_err(|e| warn!("Failed to {}: {}", op, e))
    }

    async fn create(&self, fields: &BookFields, image: &ImageFile) -> CatalogResult<Book> {
        let url = self.endpoint("api/books/create")?;
        let form = book_form(fields, Some(image))?;
        let body = self
            .execute(Operation::Create, self.http.post(url).multipart(form))
            .await?;
        parse_book(&body).inspect_err(|e| warn!("Created book has unexpected shape: {}", e))
    }

    async fn update(
        &self,
        id: i64,
        fields: &BookFields,
        image: Option<&ImageFile>,
    ) -> CatalogResult<()> {
        let url = self.endpoint(&format!("api/books/update/{}", id))?;
        let form = book_form(fields, image)?;
        self.execute(Operation::Update(id), self.http.put(url).multipart(form))
            .await?;
        Ok(())
    }

    async fn delete(&self, id: i64) -> CatalogResult<()> {
        let url = self.endpoint(&format!("api/books/{}", id))?;
        self.execute(Operation::Delete(id), self.http.delete(url))
            .await?;
        Ok(())
    }
}

/// Multipart body for create and update
fn book_form(fields: &BookFields, image: Option<&ImageFile>) -> CatalogResult<Form> {
    let form = Form::new()
        .text("title", fields.title.clone())
        .text("author", fields.author.clone())
        .text("yearPublished", fields.year_published.to_string())
        .text("description", fields.description.clone());

    let Some(image) = image else {
        return Ok(form);
    };

    let part = Part::bytes(image.bytes.clone())
        .file_name(image.file_name.clone())
        .mime_str(&image.content_type)
        .map_err(|e| {
            CatalogError::invalid(format!(
                "Unsupported image type '{}': {}",
                image.content_type, e
            ))
        })?;

    Ok(form.part("image", part))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::{TcpListener, TcpStream};
    use tokio::task::JoinHandle;

    /// Answer a single HTTP request with a canned response
    ///
    /// Resolves to the raw request text so tests can inspect it.
    async fn serve_once(status: &'static str, body: &'static str) -> (String, JoinHandle<String>) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        let handle = tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let request = read_request(&mut socket).await;
            let response = format!(
                "HTTP/1.1 {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                status,
                body.len(),
                body
            );
            socket.write_all(response.as_bytes()).await.unwrap();
            let _ = socket.shutdown().await;
            request
        });

        (format!("http://{}", addr), handle)
    }

    /// Read headers plus whatever body they announce
    async fn read_request(socket: &mut TcpStream) -> String {
        let mut buf = Vec::new();
        let mut chunk = [0u8; 4096];

        loop {
            let n = socket.read(&mut chunk).await.unwrap();
            if n == 0 {
                break;
            }
            buf.extend_from_slice(&chunk[..n]);

            let Some(header_end) = buf.windows(4).position(|w| w == b"\r\n\r\n") else {
                continue;
            };
            let head = String::from_utf8_lossy(&buf[..header_end]).to_lowercase();
            let received = buf.len() - (header_end + 4);

            let content_length = head
                .lines()
                .find_map(|line| line.strip_prefix("content-length:"))
                .and_then(|v| v.trim().parse::<usize>().ok());

            match content_length {
                Some(len) if received >= len => break,
                Some(_) => continue,
                None if head.contains("transfer-encoding: chunked") => {
                    if buf.ends_with(b"0\r\n\r\n") {
                        break;
                    }
                }
                None => break,
            }
        }

        String::from_utf8_lossy(&buf).into_owned()
    }

    fn client(base: &str) -> HttpCatalogClient {
        HttpCatalogClient::new(base, Duration::from_secs(5)).unwrap()
    }

    #[test]
    fn test_invalid_base_url() {
        let err = HttpCatalogClient::new("localhost without scheme", Duration::from_secs(1))
            .unwrap_err();
        assert!(matches!(err, CatalogError::InvalidUrl { .. }));
    }

    #[test]
    fn test_endpoint_keeps_base_path() {
        let prefixed = client("http://example.com/catalog/");
        assert_eq!(
            prefixed.endpoint("api/books/4").unwrap().as_str(),
            "http://example.com/catalog/api/books/4"
        );

        let bare = client("http://example.com");
        assert_eq!(
            bare.endpoint("api/books").unwrap().as_str(),
            "http://example.com/api/books"
        );
    }

    #[tokio::test]
    async fn test_list_books() {
        let (base, server) = serve_once(
            "200 OK",
            r#"[{"id": 1, "title": "Dune", "author": "Frank Herbert", "yearPublished": 1965, "description": "", "imageUrl": "/uploads/1.png"}]"#,
        )
        .await;

        let books = client(&base).list().await.unwrap();
        assert_eq!(books.len(), 1);
        assert_eq!(books[0].title, "Dune");

        let request = server.await.unwrap();
        assert!(request.starts_with("GET /api/books HTTP/1.1"));
    }

    #[tokio::test]
    async fn test_list_non_array_is_protocol_error() {
        let (base, _server) = serve_once("200 OK", r#"{"message": "maintenance"}"#).await;

        let err = client(&base).list().await.unwrap_err();
        assert!(matches!(err, CatalogError::Protocol { .. }));
    }

    #[tokio::test]
    async fn test_fetch_not_found() {
        let (base, server) = serve_once("404 Not Found", "").await;

        let err = client(&base).fetch(12).await.unwrap_err();
        assert!(matches!(err, CatalogError::NotFound { id: 12 }));

        let request = server.await.unwrap();
        assert!(request.starts_with("GET /api/books/12 HTTP/1.1"));
    }

    #[tokio::test]
    async fn test_delete_book() {
        let (base, server) = serve_once("204 No Content", "").await;

        client(&base).delete(3).await.unwrap();

        let request = server.await.unwrap();
        assert!(request.starts_with("DELETE /api/books/3 HTTP/1.1"));
    }

    #[tokio::test]
    async fn test_create_sends_multipart() {
        let (base, server) = serve_once(
            "201 Created",
            r#"{"id": 10, "title": "T", "author": "A", "yearPublished": 2024, "description": "D", "imageUrl": "/uploads/img.png"}"#,
        )
        .await;

        let fields = BookFields::new("T", "A", 2024, "D");
        let image = ImageFile::new("img.png", b"PNGDATA".to_vec());
        let book = client(&base).create(&fields, &image).await.unwrap();
        assert_eq!(book.id, 10);
        assert_eq!(book.image_url, "/uploads/img.png");

        let request = server.await.unwrap();
        assert!(request.starts_with("POST /api/books/create HTTP/1.1"));
        assert!(request.to_lowercase().contains("multipart/form-data"));
        assert!(request.contains(r#"name="yearPublished""#));
        assert!(request.contains("2024"));
        assert!(request.contains(r#"filename="img.png""#));
        assert!(request.contains("image/png"));
        assert!(request.contains("PNGDATA"));
    }

    #[tokio::test]
    async fn test_create_rejected_is_validation() {
        let (base, _server) = serve_once("400 Bad Request", "title must not be empty").await;

        let fields = BookFields::new("", "A", 2024, "D");
        let image = ImageFile::new("img.png", b"PNG".to_vec());
        let err = client(&base).create(&fields, &image).await.unwrap_err();
        assert!(matches!(
            err,
            CatalogError::Validation {
                status: Some(400),
                ..
            }
        ));
    }

    #[tokio::test]
    async fn test_update_without_image_omits_part() {
        let (base, server) = serve_once("200 OK", "ok").await;

        let fields = BookFields::new("New", "A", 2024, "D");
        client(&base).update(3, &fields, None).await.unwrap();

        let request = server.await.unwrap();
        assert!(request.starts_with("PUT /api/books/update/3 HTTP/1.1"));
        assert!(request.contains(r#"name="title""#));
        assert!(!request.contains(r#"name="image""#));
    }

    #[tokio::test]
    async fn test_connection_refused_is_network_error() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let err = client(&format!("http://{}", addr)).list().await.unwrap_err();
        assert!(matches!(err, CatalogError::Network { .. }));
        assert!(err.is_transient());
    }
}
