//! Bundle handler
//!
//! Resolves a request path against a [`VirtualFs`] and answers with the
//! matched file, the single-page-app fallback document, or an empty 404.

use crate::bundle::{BundleError, RootPrefix, VfsError, VirtualFs};
use crate::config::HandlerConfig;
use crate::handler::resolver::{effective_request, request_path, HTML_EXTENSION};
use crate::http::{self, mime};
use crate::logger;
use http_body_util::Full;
use hyper::body::Bytes;
use hyper::service::Service;
use hyper::{Request, Response, StatusCode};
use std::convert::Infallible;
use std::fmt;
use std::future::{ready, Ready};
use std::sync::Arc;

/// Terminal state of one request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Outcome {
    ServeDirect,
    ServeFallback,
    NotFound,
}

impl Outcome {
    pub const fn status(self) -> StatusCode {
        match self {
            Self::ServeDirect | Self::ServeFallback => StatusCode::OK,
            Self::NotFound => StatusCode::NOT_FOUND,
        }
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::ServeDirect => "direct",
            Self::ServeFallback => "fallback",
            Self::NotFound => "not_found",
        }
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// What the handler decided to send
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    Direct {
        content_type: &'static str,
        body: Bytes,
    },
    Fallback {
        body: Bytes,
    },
    NotFound,
}

impl Resolution {
    pub const fn outcome(&self) -> Outcome {
        match self {
            Self::Direct { .. } => Outcome::ServeDirect,
            Self::Fallback { .. } => Outcome::ServeFallback,
            Self::NotFound => Outcome::NotFound,
        }
    }

    pub fn content_type(&self) -> Option<&'static str> {
        match self {
            Self::Direct { content_type, .. } => Some(*content_type),
            Self::Fallback { .. } => Some(mime::get_content_type(HTML_EXTENSION)),
            Self::NotFound => None,
        }
    }

    pub fn body(&self) -> Option<&Bytes> {
        match self {
            Self::Direct { body, .. } | Self::Fallback { body } => Some(body),
            Self::NotFound => None,
        }
    }

    /// Build the HTTP response. The outcome rides along as a response extension.
    pub fn into_response(self) -> Response<Full<Bytes>> {
        let outcome = self.outcome();
        let content_type = self.content_type();
        let mut response = match (self, content_type) {
            (Self::Direct { body, .. } | Self::Fallback { body }, Some(content_type)) => {
                http::build_file_response(body, content_type)
            }
            _ => http::build_404_response(),
        };
        response.extensions_mut().insert(outcome);
        response
    }
}

struct Inner {
    fs: Arc<dyn VirtualFs>,
    config: HandlerConfig,
    root: RootPrefix,
}

/// Leaf HTTP handler serving one bundle
///
/// Cheap to clone; all clones share the same bundle and configuration.
#[derive(Clone)]
pub struct StaticBundle {
    inner: Arc<Inner>,
}

impl StaticBundle {
    /// Build a handler, fixing the root prefix for its whole lifetime
    ///
    /// An explicit `root_prefix` is validated. Without one the prefix is taken
    /// from the bundle's first top-level entry; when listing fails the prefix is
    /// left empty.
    pub fn new(fs: Arc<dyn VirtualFs>, config: HandlerConfig) -> Result<Self, BundleError> {
        let root = match config.root_prefix.as_deref() {
            Some(prefix) => RootPrefix::explicit(prefix)?,
            None => RootPrefix::detect(fs.as_ref()).unwrap_or_else(|e| {
                logger::log_warning(&format!(
                    "Root prefix detection failed, using empty prefix: {e}"
                ));
                RootPrefix::default()
            }),
        };

        Ok(Self {
            inner: Arc::new(Inner { fs, config, root }),
        })
    }

    pub fn root_prefix(&self) -> &str {
        self.inner.root.as_str()
    }

    pub fn config(&self) -> &HandlerConfig {
        &self.inner.config
    }

    /// Decide what to serve for `path`
    pub fn resolve(&self, path: &str) -> Resolution {
        let request = effective_request(path);

        match self.lookup(&request.path) {
            Ok(body) => {
                return Resolution::Direct {
                    content_type: mime::get_content_type(request.extension),
                    body,
                };
            }
            Err(e) => log_miss(path, &e),
        }

        let config = &self.inner.config;
        if !config.use_client_side_router {
            return Resolution::NotFound;
        }

        match self.lookup(&config.main_path) {
            Ok(body) => Resolution::Fallback { body },
            Err(e) => {
                log_miss(path, &e);
                Resolution::NotFound
            }
        }
    }

    /// Resolve `path` and build the response
    pub fn respond(&self, path: &str) -> Response<Full<Bytes>> {
        self.resolve(path).into_response()
    }

    fn lookup(&self, path: &str) -> Result<Bytes, VfsError> {
        let key = self.inner.root.key_for(path);
        self.inner.fs.read(&key)
    }
}

impl fmt::Debug for StaticBundle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StaticBundle")
            .field("config", &self.inner.config)
            .field("root", &self.inner.root)
            .finish_non_exhaustive()
    }
}

impl<B> Service<Request<B>> for StaticBundle {
    type Response = Response<Full<Bytes>>;
    type Error = Infallible;
    type Future = Ready<Result<Self::Response, Self::Error>>;

    fn call(&self, req: Request<B>) -> Self::Future {
        ready(Ok(self.respond(&request_path(req.uri()))))
    }
}

fn log_miss(path: &str, error: &VfsError) {
    logger::log_debug(&format!("Bundle miss for {path}: {error}"));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bundle::MemoryBundle;
    use http_body_util::BodyExt;
    use hyper::header::CONTENT_TYPE;

    const INDEX: &[u8] = b"<!doctype html><div id=app></div>";

    fn sample_bundle() -> Arc<dyn VirtualFs> {
        Arc::new(
            MemoryBundle::new()
                .with_file("root/index.html", INDEX)
                .with_file("root/app.js", "boot()")
                .with_file("root/docs/index.html", "<h1>docs</h1>")
                .with_file("root/about", "about page")
                .with_file("root/img/logo.png", Bytes::from_static(&[0x89, b'P', b'N', b'G'])),
        )
    }

    fn spa_config() -> HandlerConfig {
        HandlerConfig::default().with_client_side_router("/index.html")
    }

    async fn body_bytes(resp: Response<Full<Bytes>>) -> Bytes {
        resp.into_body().collect().await.unwrap().to_bytes()
    }

    #[test]
    fn test_detects_root_prefix() {
        let handler = StaticBundle::new(sample_bundle(), HandlerConfig::default()).unwrap();
        assert_eq!(handler.root_prefix(), "root");
    }

    #[test]
    fn test_explicit_root_prefix_wins() {
        let fs: Arc<dyn VirtualFs> = Arc::new(
            MemoryBundle::new()
                .with_file("aaa/readme.txt", "noise")
                .with_file("site/index.html", INDEX),
        );
        let handler =
            StaticBundle::new(fs, HandlerConfig::default().with_root_prefix("site")).unwrap();
        assert_eq!(handler.root_prefix(), "site");
        assert_eq!(handler.resolve("/").outcome(), Outcome::ServeDirect);
    }

    #[test]
    fn test_invalid_root_prefix_fails_construction() {
        let result = StaticBundle::new(
            sample_bundle(),
            HandlerConfig::default().with_root_prefix("/root/"),
        );
        assert!(matches!(result, Err(BundleError::InvalidRootPrefix { .. })));
    }

    #[tokio::test]
    async fn test_flat_bundle_with_empty_root_prefix() {
        let fs = Arc::new(
            MemoryBundle::new()
                .with_file("index.html", "flat index")
                .with_file("app.js", "flat()"),
        );
        let handler = StaticBundle::new(
            fs,
            HandlerConfig::default()
                .with_root_prefix("")
                .with_client_side_router("/index.html"),
        )
        .unwrap();
        assert_eq!(handler.root_prefix(), "");

        let resp = handler.respond("/");
        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(resp.headers()[CONTENT_TYPE], "text/html");
        assert_eq!(body_bytes(resp).await, Bytes::from_static(b"flat index"));

        let resp = handler.respond("/app.js");
        assert_eq!(resp.headers()[CONTENT_TYPE], "text/javascript");
        assert_eq!(body_bytes(resp).await, Bytes::from_static(b"flat()"));

        assert_eq!(handler.resolve("/deep/link").outcome(), Outcome::ServeFallback);
    }

    #[tokio::test]
    async fn test_root_serves_index() {
        let handler = StaticBundle::new(sample_bundle(), HandlerConfig::default()).unwrap();
        let resp = handler.respond("/");
        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(resp.headers()[CONTENT_TYPE], "text/html");
        assert_eq!(resp.extensions().get::<Outcome>(), Some(&Outcome::ServeDirect));
        assert_eq!(body_bytes(resp).await, Bytes::from_static(INDEX));
    }

    #[test]
    fn test_nested_directory_index() {
        let handler = StaticBundle::new(sample_bundle(), HandlerConfig::default()).unwrap();
        assert_eq!(
            handler.resolve("/docs/"),
            Resolution::Direct {
                content_type: "text/html",
                body: Bytes::from_static(b"<h1>docs</h1>"),
            }
        );
    }

    #[test]
    fn test_direct_hit_uses_extension() {
        let handler = StaticBundle::new(sample_bundle(), HandlerConfig::default()).unwrap();
        let res = handler.resolve("/app.js");
        assert_eq!(res.content_type(), Some("text/javascript"));
        assert_eq!(res.body(), Some(&Bytes::from_static(b"boot()")));

        let res = handler.resolve("/img/logo.png");
        assert_eq!(res.content_type(), Some("image/png"));
    }

    #[test]
    fn test_extensionless_hit_is_plain_text() {
        let handler = StaticBundle::new(sample_bundle(), spa_config()).unwrap();
        let res = handler.resolve("/about");
        assert_eq!(res.outcome(), Outcome::ServeDirect);
        assert_eq!(res.content_type(), Some("text/plain"));
    }

    #[tokio::test]
    async fn test_miss_without_router_is_empty_404() {
        let handler = StaticBundle::new(sample_bundle(), HandlerConfig::default()).unwrap();
        let resp = handler.respond("/missing.js");
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
        assert!(resp.headers().get(CONTENT_TYPE).is_none());
        assert_eq!(resp.extensions().get::<Outcome>(), Some(&Outcome::NotFound));
        assert!(body_bytes(resp).await.is_empty());
    }

    #[tokio::test]
    async fn test_miss_with_router_serves_main_document() {
        let handler = StaticBundle::new(sample_bundle(), spa_config()).unwrap();
        let resp = handler.respond("/deep/route");
        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(resp.headers()[CONTENT_TYPE], "text/html");
        assert_eq!(
            resp.extensions().get::<Outcome>(),
            Some(&Outcome::ServeFallback)
        );
        assert_eq!(body_bytes(resp).await, Bytes::from_static(INDEX));
    }

    #[test]
    fn test_fallback_is_html_even_for_asset_paths() {
        let handler = StaticBundle::new(sample_bundle(), spa_config()).unwrap();
        let res = handler.resolve("/missing.css");
        assert_eq!(res.outcome(), Outcome::ServeFallback);
        assert_eq!(res.content_type(), Some("text/html"));
    }

    #[tokio::test]
    async fn test_missing_main_document_is_404() {
        let fs: Arc<dyn VirtualFs> =
            Arc::new(MemoryBundle::new().with_file("root/app.js", "boot()"));
        let handler = StaticBundle::new(fs, spa_config()).unwrap();
        let resp = handler.respond("/deep/route");
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
        assert!(body_bytes(resp).await.is_empty());
    }

    #[test]
    fn test_custom_main_path() {
        let fs: Arc<dyn VirtualFs> = Arc::new(
            MemoryBundle::new()
                .with_file("root/index.html", INDEX)
                .with_file("root/shell.html", "shell"),
        );
        let handler = StaticBundle::new(
            fs,
            HandlerConfig::default().with_client_side_router("/shell.html"),
        )
        .unwrap();
        assert_eq!(
            handler.resolve("/settings/profile"),
            Resolution::Fallback {
                body: Bytes::from_static(b"shell"),
            }
        );
    }

    #[test]
    fn test_empty_bundle_degrades_to_404() {
        let handler =
            StaticBundle::new(Arc::new(MemoryBundle::new()), spa_config()).unwrap();
        assert_eq!(handler.root_prefix(), "");
        assert_eq!(handler.resolve("/").outcome(), Outcome::NotFound);
        assert_eq!(handler.resolve("/x/y").outcome(), Outcome::NotFound);
    }

    #[test]
    fn test_listing_failure_degrades_to_404() {
        struct BrokenFs;

        impl VirtualFs for BrokenFs {
            fn top_level_entries(&self) -> Result<Vec<String>, VfsError> {
                Err(VfsError::ListingFailed {
                    reason: "corrupt".to_string(),
                })
            }

            fn read(&self, key: &str) -> Result<Bytes, VfsError> {
                Err(VfsError::not_found(key))
            }
        }

        let handler = StaticBundle::new(Arc::new(BrokenFs), spa_config()).unwrap();
        assert_eq!(handler.root_prefix(), "");
        assert_eq!(handler.resolve("/index.html"), Resolution::NotFound);
    }

    #[tokio::test]
    async fn test_repeated_requests_are_identical() {
        let handler = StaticBundle::new(sample_bundle(), spa_config()).unwrap();
        for path in ["/", "/app.js", "/deep/route"] {
            let first = handler.respond(path);
            let second = handler.respond(path);
            assert_eq!(first.status(), second.status());
            assert_eq!(first.headers(), second.headers());
            assert_eq!(body_bytes(first).await, body_bytes(second).await);
        }
    }

    #[tokio::test]
    async fn test_service_uses_uri_path() {
        let handler = StaticBundle::new(sample_bundle(), HandlerConfig::default()).unwrap();
        let req = Request::builder()
            .uri("http://localhost/app.js?v=3")
            .body(())
            .unwrap();
        let resp = handler.call(req).await.unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(body_bytes(resp).await, Bytes::from_static(b"boot()"));
    }

    #[tokio::test]
    async fn test_service_decodes_path() {
        let fs: Arc<dyn VirtualFs> =
            Arc::new(MemoryBundle::new().with_file("root/my file.txt", "notes"));
        let handler = StaticBundle::new(fs, HandlerConfig::default()).unwrap();
        let req = Request::builder().uri("/my%20file.txt").body(()).unwrap();
        let resp = handler.call(req).await.unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(resp.headers()[CONTENT_TYPE], "text/plain");
    }

    #[test]
    fn test_concurrent_clones_share_bundle() {
        let handler = StaticBundle::new(sample_bundle(), spa_config()).unwrap();
        let threads: Vec<_> = (0..8)
            .map(|i| {
                let handler = handler.clone();
                std::thread::spawn(move || {
                    let path = if i % 2 == 0 { "/app.js" } else { "/route/x" };
                    handler.resolve(path).outcome()
                })
            })
            .collect();
        for (i, t) in threads.into_iter().enumerate() {
            let expected = if i % 2 == 0 {
                Outcome::ServeDirect
            } else {
                Outcome::ServeFallback
            };
            assert_eq!(t.join().unwrap(), expected);
        }
    }
}
