use crate::logline;
use chrono::Utc;
use futures::future::BoxFuture;
use http::{Request, Response};
use hyper::body::{Body, Buf, Frame, SizeHint};
use std::io::Write;
use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll};
use std::time::{Duration, Instant};
use tower::{Layer, Service};

/// A fully measured response, handed to a [`Logger`] once the body finishes.
#[derive(Debug, Clone)]
pub struct ResponseEvent {
    pub method: String,
    pub path: String,
    pub status: u16,
    /// Response body bytes actually written.
    pub length: u64,
    pub duration: Duration,
    /// Captured request header values, in configuration order.
    pub fields: Vec<(String, String)>,
}

/// Destination for response events, e.g. the console or a JSON line sink.
pub trait Logger: Send + Sync {
    fn log(&self, event: &ResponseEvent);
}

/// Writes one [`logline::json_log_message`] line per response to stderr.
pub struct JsonLogger;

impl Logger for JsonLogger {
    fn log(&self, event: &ResponseEvent) {
        let message = logline::json_log_message(
            Utc::now(),
            &event.method,
            &event.path,
            event.status,
            event.length,
            event.duration,
            &event.fields,
        );
        let _ = std::io::stderr().write_all(message.as_bytes());
    }
}

/// Reject logging the /health URL.
pub fn skip_health_endpoint(path: &str) -> bool {
    path == "/health"
}

type SkipFn = Arc<dyn Fn(&str) -> bool + Send + Sync>;

/// Tower layer that logs each response's status code, body byte count, and
/// duration.
///
/// The default configuration emits JSON lines to stderr and skips the
/// `/health` endpoint; both are adjustable with the builder methods. Skipped
/// requests still pass through to the inner service untouched.
#[derive(Clone)]
pub struct ResponseLogLayer {
    logger: Arc<dyn Logger>,
    skip: SkipFn,
    headers: Vec<String>,
}

impl ResponseLogLayer {
    /// Layer with the default JSON logger which skips logging '/health' URLs.
    pub fn new() -> Self {
        ResponseLogLayer {
            logger: Arc::new(JsonLogger),
            skip: Arc::new(skip_health_endpoint),
            headers: Vec::new(),
        }
    }

    /// Replace the destination for response events.
    pub fn logger(mut self, logger: Arc<dyn Logger>) -> Self {
        self.logger = logger;
        self
    }

    /// Replace the skip predicate, which receives the request path.
    pub fn skip(mut self, skip: impl Fn(&str) -> bool + Send + Sync + 'static) -> Self {
        self.skip = Arc::new(skip);
        self
    }

    /// Also capture the given request headers into each event's fields.
    pub fn log_headers<I, T>(mut self, headers: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<String>,
    {
        self.headers = headers.into_iter().map(Into::into).collect();
        self
    }
}

impl Default for ResponseLogLayer {
    fn default() -> Self {
        Self::new()
    }
}

impl<S> Layer<S> for ResponseLogLayer {
    type Service = ResponseLogService<S>;

    fn layer(&self, inner: S) -> Self::Service {
        ResponseLogService {
            inner,
            logger: Arc::clone(&self.logger),
            skip: Arc::clone(&self.skip),
            headers: Arc::from(self.headers.clone()),
        }
    }
}

/// Middleware service produced by [`ResponseLogLayer`].
#[derive(Clone)]
pub struct ResponseLogService<S> {
    inner: S,
    logger: Arc<dyn Logger>,
    skip: SkipFn,
    headers: Arc<[String]>,
}

impl<S, ReqBody, ResBody> Service<Request<ReqBody>> for ResponseLogService<S>
where
    S: Service<Request<ReqBody>, Response = Response<ResBody>>,
    S::Future: Send + 'static,
    S::Error: 'static,
    ResBody: Body + 'static,
{
    type Response = Response<MeteredBody<ResBody>>;
    type Error = S::Error;
    type Future = BoxFuture<'static, Result<Self::Response, Self::Error>>;

    fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, req: Request<ReqBody>) -> Self::Future {
        let skipped = (self.skip)(req.uri().path());
        let method = req.method().to_string();
        let path = req.uri().path().to_string();
        let fields: Vec<(String, String)> = self
            .headers
            .iter()
            .map(|name| {
                let value = req
                    .headers()
                    .get(name.as_str())
                    .and_then(|v| v.to_str().ok())
                    .unwrap_or_default()
                    .to_string();
                (name.clone(), value)
            })
            .collect();
        let logger = Arc::clone(&self.logger);
        let start = Instant::now();

        tracing::trace!("Measuring response for: {} {}", method, path);

        let future = self.inner.call(req);
        Box::pin(async move {
            let response = future.await?;
            if skipped {
                return Ok(response.map(MeteredBody::passthrough));
            }
            let status = response.status().as_u16();
            Ok(response.map(|body| {
                MeteredBody::metered(
                    body,
                    Capture {
                        logger,
                        method,
                        path,
                        fields,
                        status,
                        start,
                        written: 0,
                    },
                )
            }))
        })
    }
}

/// In-flight measurement state for one response.
struct Capture {
    logger: Arc<dyn Logger>,
    method: String,
    path: String,
    fields: Vec<(String, String)>,
    status: u16,
    start: Instant,
    written: u64,
}

impl Capture {
    fn emit(self) {
        let event = ResponseEvent {
            method: self.method,
            path: self.path,
            status: self.status,
            length: self.written,
            duration: self.start.elapsed(),
            fields: self.fields,
        };
        self.logger.log(&event);
    }
}

/// Response body wrapper that counts data bytes as they are polled and emits
/// the log event once the stream ends.
///
/// If the body is dropped before completion (client went away), the event is
/// still emitted with the bytes counted so far.
pub struct MeteredBody<B> {
    inner: Pin<Box<B>>,
    capture: Option<Capture>,
}

impl<B> MeteredBody<B> {
    fn metered(inner: B, capture: Capture) -> Self {
        MeteredBody {
            inner: Box::pin(inner),
            capture: Some(capture),
        }
    }

    fn passthrough(inner: B) -> Self {
        MeteredBody {
            inner: Box::pin(inner),
            capture: None,
        }
    }
}

impl<B> Body for MeteredBody<B>
where
    B: Body,
{
    type Data = B::Data;
    type Error = B::Error;

    fn poll_frame(
        self: Pin<&mut Self>,
        cx: &mut Context<'_>,
    ) -> Poll<Option<Result<Frame<Self::Data>, Self::Error>>> {
        let this = self.get_mut();
        match this.inner.as_mut().poll_frame(cx) {
            Poll::Ready(Some(Ok(frame))) => {
                if let Some(capture) = this.capture.as_mut()
                    && let Some(data) = frame.data_ref()
                {
                    capture.written += data.remaining() as u64;
                }
                Poll::Ready(Some(Ok(frame)))
            }
            Poll::Ready(None) => {
                if let Some(capture) = this.capture.take() {
                    capture.emit();
                }
                Poll::Ready(None)
            }
            other => other,
        }
    }

    fn is_end_stream(&self) -> bool {
        self.inner.is_end_stream()
    }

    fn size_hint(&self) -> SizeHint {
        self.inner.size_hint()
    }
}

impl<B> Drop for MeteredBody<B> {
    fn drop(&mut self) {
        if let Some(capture) = self.capture.take() {
            capture.emit();
        }
    }
}
