//! Resource server main loop.
//!
//! The server moves through these states:
//!
//! 1. **Ready**: the catalog has been built and handed to the dispatcher
//! 2. **AwaitingLine** / **Processing**: one line is read, dispatched and
//!    answered before the next line is read
//! 3. **ShuttingDown**: end of input or a termination signal
//!
//! A failed request never ends the loop; it is answered with an error
//! response. Only end of input, a signal, or an I/O failure on the
//! transport itself stops the server.

use std::future::Future;
use std::io;

use tokio::io::{AsyncBufRead, AsyncWrite};

use crate::catalog::{Catalog, UriScheme};
use crate::mcp::dispatcher::Dispatcher;
use crate::mcp::transport::{LineTransport, StdioTransport};

/// Server state in the request loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ServerState {
    /// Catalog built, loop not started.
    Ready,
    /// Waiting for the next input line.
    AwaitingLine,
    /// Handling a line.
    Processing,
    /// Shutdown in progress.
    ShuttingDown,
}

/// The resource server.
pub struct McpServer<R, W> {
    /// Current server state.
    state: ServerState,
    /// The transport layer.
    transport: LineTransport<R, W>,
    /// Request handling against the catalog.
    dispatcher: Dispatcher,
}

impl McpServer<tokio::io::BufReader<tokio::io::Stdin>, tokio::io::Stdout> {
    /// Creates a server speaking on stdin/stdout.
    #[must_use]
    pub fn stdio(catalog: Catalog, scheme: UriScheme) -> Self {
        Self::new(StdioTransport::stdio(), Dispatcher::new(catalog, scheme))
    }

    /// Runs the server main loop with graceful shutdown handling.
    ///
    /// # Errors
    ///
    /// Returns an error if transport I/O fails.
    pub async fn run(&mut self) -> io::Result<()> {
        self.run_with_shutdown().await
    }

    /// Runs the main loop until end of input or a termination signal.
    #[cfg(unix)]
    async fn run_with_shutdown(&mut self) -> io::Result<()> {
        use tokio::signal::unix::{signal, SignalKind};

        let mut sigint = signal(SignalKind::interrupt())?;
        let mut sigterm = signal(SignalKind::terminate())?;

        let shutdown = async move {
            tokio::select! {
                _ = sigint.recv() => {
                    tracing::info!("Received SIGINT, initiating graceful shutdown");
                }
                _ = sigterm.recv() => {
                    tracing::info!("Received SIGTERM, initiating graceful shutdown");
                }
            }
        };

        self.serve_until(shutdown).await
    }

    /// Runs the main loop until end of input or Ctrl+C.
    #[cfg(windows)]
    async fn run_with_shutdown(&mut self) -> io::Result<()> {
        let shutdown = async {
            let _ = tokio::signal::ctrl_c().await;
            tracing::info!("Received Ctrl+C, initiating graceful shutdown");
        };

        self.serve_until(shutdown).await
    }
}

impl<R, W> McpServer<R, W>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    /// Creates a server over any transport.
    #[must_use]
    pub const fn new(transport: LineTransport<R, W>, dispatcher: Dispatcher) -> Self {
        Self {
            state: ServerState::Ready,
            transport,
            dispatcher,
        }
    }

    /// Returns the current server state.
    #[must_use]
    pub const fn state(&self) -> ServerState {
        self.state
    }

    /// Returns the dispatcher.
    #[must_use]
    pub const fn dispatcher(&self) -> &Dispatcher {
        &self.dispatcher
    }

    /// Consumes the server and returns its transport.
    #[must_use]
    pub fn into_transport(self) -> LineTransport<R, W> {
        self.transport
    }

    /// Serves requests until the input is exhausted, without signal handling.
    ///
    /// # Errors
    ///
    /// Returns an error if transport I/O fails.
    pub async fn serve(&mut self) -> io::Result<()> {
        self.serve_until(std::future::pending()).await
    }

    /// Serves requests until the input is exhausted or `shutdown` completes.
    ///
    /// A line that is already being handled is answered before `shutdown`
    /// is polled again.
    ///
    /// # Errors
    ///
    /// Returns an error if transport I/O fails.
    pub async fn serve_until<F>(&mut self, shutdown: F) -> io::Result<()>
    where
        F: Future<Output = ()>,
    {
        tokio::pin!(shutdown);

        loop {
            self.state = ServerState::AwaitingLine;

            tokio::select! {
                () = &mut shutdown => {
                    self.state = ServerState::ShuttingDown;
                    return Ok(());
                }

                line_result = self.transport.read_line() => {
                    if self.handle_transport_result(line_result).await? {
                        return Ok(());
                    }
                }
            }
        }
    }

    /// Handles the result from transport read.
    ///
    /// Returns `true` if the server should shut down.
    async fn handle_transport_result(
        &mut self,
        line_result: io::Result<Option<Vec<u8>>>,
    ) -> io::Result<bool> {
        let Some(line) = line_result? else {
            tracing::info!("Input closed, shutting down");
            self.state = ServerState::ShuttingDown;
            return Ok(true);
        };

        self.state = ServerState::Processing;
        self.handle_line(&line).await?;

        Ok(false)
    }

    /// Handles a single line of input and writes exactly one response.
    async fn handle_line(&mut self, line: &[u8]) -> io::Result<()> {
        match self.dispatcher.handle_line(line) {
            Ok(response) => self.transport.write_response(&response).await,
            Err(error) => self.transport.write_error(&error).await,
        }
    }
}
