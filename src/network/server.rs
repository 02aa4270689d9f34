//! TCP Server
//!
//! Accepts connections and runs each one on its own thread. All threads
//! share the one `Engine`.

use std::io::{ErrorKind, Write};
use std::net::{SocketAddr, TcpListener, TcpStream};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use crossbeam::sync::WaitGroup;

use crate::config::Config;
use crate::engine::Engine;
use crate::error::Result;
use crate::protocol::{encode_response, Response};

use super::Connection;

/// How long the accept loop sleeps when no client is waiting
const ACCEPT_POLL_INTERVAL: Duration = Duration::from_millis(50);

/// TCP server for BlockFS
pub struct Server {
    config: Config,
    engine: Arc<Engine>,
    listener: TcpListener,
    shutdown: Arc<AtomicBool>,
    active: Arc<AtomicUsize>,
}

/// Releases a connection slot when the worker thread ends
struct SlotGuard(Arc<AtomicUsize>);

impl Drop for SlotGuard {
    fn drop(&mut self) {
        self.0.fetch_sub(1, Ordering::SeqCst);
    }
}

impl Server {
    /// Bind the listen address from `config`
    pub fn bind(config: Config, engine: Arc<Engine>) -> Result<Self> {
        let listener = TcpListener::bind(&config.listen_addr)?;
        listener.set_nonblocking(true)?;

        Ok(Self {
            config,
            engine,
            listener,
            shutdown: Arc::new(AtomicBool::new(false)),
            active: Arc::new(AtomicUsize::new(0)),
        })
    }

    /// Address actually bound (useful with port 0)
    pub fn local_addr(&self) -> Result<SocketAddr> {
        Ok(self.listener.local_addr()?)
    }

    /// Accept clients until [`Server::shutdown`] is called (blocking)
    ///
    /// Waits for open connections to finish before returning.
    pub fn run(&self) -> Result<()> {
        tracing::info!("Listening on {}", self.local_addr()?);

        let workers = WaitGroup::new();
        let mut next_id: u64 = 0;

        while !self.shutdown.load(Ordering::SeqCst) {
            match self.listener.accept() {
                Ok((stream, addr)) => {
                    next_id += 1;
                    self.dispatch(stream, addr, next_id, &workers);
                }
                Err(ref e) if e.kind() == ErrorKind::WouldBlock => {
                    thread::sleep(ACCEPT_POLL_INTERVAL);
                }
                Err(e) => {
                    tracing::warn!("Accept failed: {}", e);
                }
            }
        }

        tracing::info!(
            "Shutting down, waiting for {} connection(s)",
            self.active_connections()
        );
        workers.wait();
        Ok(())
    }

    /// Signal the server to shutdown gracefully
    pub fn shutdown(&self) {
        self.shutdown.store(true, Ordering::SeqCst);
    }

    /// Flag that stops the accept loop when set
    pub fn shutdown_handle(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.shutdown)
    }

    /// Number of connections currently being served
    pub fn active_connections(&self) -> usize {
        self.active.load(Ordering::SeqCst)
    }

    /// Hand an accepted stream to a worker thread, or turn it away when full
    fn dispatch(&self, mut stream: TcpStream, addr: SocketAddr, id: u64, workers: &WaitGroup) {
        if let Err(e) = stream.set_nonblocking(false) {
            tracing::warn!("Could not configure stream from {}: {}", addr, e);
            return;
        }

        if self.active.fetch_add(1, Ordering::SeqCst) >= self.config.max_connections {
            self.active.fetch_sub(1, Ordering::SeqCst);
            tracing::warn!("Rejecting {}: {} connections open", addr, self.config.max_connections);
            let busy = format!("{}\n", encode_response(&Response::error("server busy")));
            if let Err(e) = stream.write_all(busy.as_bytes()) {
                tracing::debug!("Failed to send busy reply to {}: {}", addr, e);
            }
            return;
        }
        let slot = SlotGuard(Arc::clone(&self.active));

        let engine = Arc::clone(&self.engine);
        let (read_ms, write_ms) = (self.config.read_timeout_ms, self.config.write_timeout_ms);
        let worker = workers.clone();

        tracing::debug!("Handling client {} as connection #{}", addr, id);

        let spawned = thread::Builder::new()
            .name(format!("blockfs-conn-{}", id))
            .spawn(move || {
                let _slot = slot;
                let _worker = worker;

                let result = Connection::new(stream, engine).and_then(|mut conn| {
                    conn.set_timeouts(read_ms, write_ms)?;
                    conn.handle()
                });
                if let Err(e) = result {
                    tracing::warn!("Connection #{} from {} ended with error: {}", id, addr, e);
                }
            });

        if let Err(e) = spawned {
            tracing::error!("Failed to spawn worker for {}: {}", addr, e);
        }
    }
}
