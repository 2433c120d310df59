use anyhow::Result;
use http::{Request, Response, StatusCode};
use http_body_util::Full;
use hyper::body::{Bytes, Incoming};
use hyper_util::rt::{TokioExecutor, TokioIo};
use hyper_util::server::conn::auto;
use hyper_util::service::TowerToHyperService;
use relog_http::ResponseLogLayer;
use std::convert::Infallible;
use std::net::SocketAddr;
use tokio::net::TcpListener;
use tower::{ServiceBuilder, service_fn};

/// Demo routes: a hello page, a 404, and a health endpoint the middleware
/// skips from its logs.
async fn route(req: Request<Incoming>) -> Result<Response<Full<Bytes>>, Infallible> {
    let response = match req.uri().path() {
        "/" => Response::new(Full::new(Bytes::from("Hello world!"))),
        "/health" => Response::new(Full::new(Bytes::from("OK"))),
        _ => Response::builder()
            .status(StatusCode::NOT_FOUND)
            .body(Full::new(Bytes::from("404 page not found")))
            .unwrap(),
    };
    Ok(response)
}

/// Run a small demo server wrapped in the response-logging middleware. Log
/// lines appear on stderr, one per request.
pub fn execute(addr: &str) -> Result<()> {
    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?;
    runtime.block_on(run(addr))
}

async fn run(addr: &str) -> Result<()> {
    let addr: SocketAddr = addr.parse()?;
    let listener = TcpListener::bind(addr).await?;

    tracing::info!("Demo server listening on {}", addr);
    println!("Listening on {addr}...");

    loop {
        let (stream, peer) = listener.accept().await?;
        tracing::debug!("Accepted connection from {}", peer);

        let service = ServiceBuilder::new()
            .layer(ResponseLogLayer::new())
            .service(service_fn(route));
        let service = TowerToHyperService::new(service);

        tokio::spawn(async move {
            if let Err(err) = auto::Builder::new(TokioExecutor::new())
                .serve_connection(TokioIo::new(stream), service)
                .await
            {
                tracing::debug!("Connection error: {}", err);
            }
        });
    }
}
