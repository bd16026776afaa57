use std::time::Instant;

use ::http::Extensions;
use reqwest::{Client, Request, Response};
use reqwest_middleware::{
    ClientBuilder, ClientWithMiddleware, Middleware, Next, Result as MwResult,
};
use tracing::{info, warn};

/// Logs every request with method, URL, status and elapsed time.
///
/// This is the probe's diagnostic stream: failed requests are still returned
/// to the caller as values, but nothing fails silently.
struct RequestLogger;

#[async_trait::async_trait]
impl Middleware for RequestLogger {
    async fn handle(
        &self,
        req: Request,
        extensions: &mut Extensions,
        next: Next<'_>,
    ) -> MwResult<Response> {
        let method = req.method().clone();
        let url = req.url().clone();
        let t0 = Instant::now();

        let res = next.run(req, extensions).await;

        match &res {
            Ok(resp) => {
                info!(
                    method = %method,
                    url = %url,
                    status = %resp.status(),
                    elapsed_ms = t0.elapsed().as_millis() as u64,
                    "http request"
                );
            }
            Err(err) => {
                warn!(
                    method = %method,
                    url = %url,
                    elapsed_ms = t0.elapsed().as_millis() as u64,
                    error = %err,
                    "http request failed"
                );
            }
        }
        res
    }
}

/// Wrap a `reqwest::Client` with the request logger.
pub fn build_logging_client(reqwest_client: Client) -> ClientWithMiddleware {
    ClientBuilder::new(reqwest_client).with(RequestLogger).build()
}
