use crate::errors::HttpError;
use crate::handler::{handle, CONTENT_TYPE_TEXT, ERROR_UNEXPECTED};
use crate::http::{read_request, write_response, Response, StatusCode, DEFAULT_MAX_BODY_SIZE};
use eventkv_store::{DocumentStore, KvService};
use std::future::Future;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::io::{AsyncWriteExt, BufReader};
use tokio::net::{TcpListener, TcpStream};
use tracing::{debug, info, warn};

/// Default listen address.
pub const DEFAULT_ADDR: &str = "127.0.0.1:9080";

/// Listener settings.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Address to bind, as `host:port`.
    pub addr: String,
    /// Largest accepted request body in bytes.
    pub max_body_bytes: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            addr: DEFAULT_ADDR.to_string(),
            max_body_bytes: DEFAULT_MAX_BODY_SIZE,
        }
    }
}

/// HTTP server over a [`KvService`].
///
/// Each connection is served on its own task and carries one request. The
/// service call runs on the blocking pool because store I/O is synchronous.
/// Requests are not serialized against each other.
pub struct Server<S> {
    listener: TcpListener,
    service: Arc<KvService<S>>,
    max_body_bytes: usize,
}

impl<S: DocumentStore + 'static> Server<S> {
    /// Binds the listener.
    pub async fn bind(config: &ServerConfig, service: KvService<S>) -> Result<Self, HttpError> {
        let listener = TcpListener::bind(&config.addr).await?;
        info!(addr = %listener.local_addr()?, "listening");
        Ok(Self {
            listener,
            service: Arc::new(service),
            max_body_bytes: config.max_body_bytes,
        })
    }

    /// Returns the bound address.
    pub fn local_addr(&self) -> Result<SocketAddr, HttpError> {
        Ok(self.listener.local_addr()?)
    }

    /// Serves connections until `shutdown` completes.
    ///
    /// Connections already accepted keep running on their own tasks.
    pub async fn run_until<F>(self, shutdown: F) -> Result<(), HttpError>
    where
        F: Future<Output = ()>,
    {
        tokio::pin!(shutdown);
        loop {
            tokio::select! {
                _ = &mut shutdown => {
                    info!("shutting down");
                    return Ok(());
                }
                accepted = self.listener.accept() => {
                    let (stream, peer) = match accepted {
                        Ok(accepted) => accepted,
                        Err(e) => {
                            warn!(error = %e, "accept failed");
                            continue;
                        }
                    };
                    let service = Arc::clone(&self.service);
                    let max_body_bytes = self.max_body_bytes;
                    tokio::spawn(async move {
                        if let Err(e) = serve_connection(stream, service, max_body_bytes).await {
                            debug!(%peer, error = %e, "connection ended with error");
                        }
                    });
                }
            }
        }
    }

    /// Serves connections forever.
    pub async fn run(self) -> Result<(), HttpError> {
        self.run_until(std::future::pending()).await
    }
}

async fn serve_connection<S: DocumentStore + 'static>(
    stream: TcpStream,
    service: Arc<KvService<S>>,
    max_body_bytes: usize,
) -> Result<(), HttpError> {
    let (read_half, mut write_half) = stream.into_split();
    let mut reader = BufReader::new(read_half);

    let response = match read_request(&mut reader, max_body_bytes).await {
        Ok(request) => {
            let method = request.method.clone();
            let target = request.target.clone();
            let response = tokio::task::spawn_blocking(move || handle(&service, &request))
                .await
                .unwrap_or_else(|e| {
                    Response::with_body(
                        StatusCode::INTERNAL_SERVER_ERROR,
                        CONTENT_TYPE_TEXT,
                        format!("{ERROR_UNEXPECTED} {e}"),
                    )
                });
            debug!(%method, %target, status = response.status.as_u16(), "handled request");
            response
        }
        Err(HttpError::Closed) => return Ok(()),
        Err(e) => match e.status() {
            Some(status) => {
                warn!(error = %e, "rejected malformed request");
                Response::empty(status)
            }
            None => return Err(e),
        },
    };

    write_response(&mut write_half, &response).await?;
    write_half.shutdown().await?;
    Ok(())
}
