//! TCP ping server with a segment routing header on every connection.
//!
//! The server accepts a single client, installs the routing header on the
//! accepted socket through `IPV6_RTHDR` and then sends the ping message on
//! a fixed interval until shutdown.

use crate::config::Settings;
use crate::error::{PingdError, Result};
use srh_codec::SegmentRoutingHeader;
use std::net::SocketAddr;
use std::os::fd::AsRawFd;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::io::{AsyncWrite, AsyncWriteExt};
use tokio::net::{TcpListener, TcpSocket};
use tracing::{debug, info};

/// How often blocking waits look at the shutdown flag.
const SHUTDOWN_POLL_INTERVAL: Duration = Duration::from_millis(100);

pub struct PingServer {
    settings: Settings,
    header: Vec<u8>,
}

impl PingServer {
    /// Encodes `header` once; the same bytes go to every connection.
    pub fn new(settings: Settings, header: &SegmentRoutingHeader) -> Self {
        Self {
            settings,
            header: header.to_bytes(),
        }
    }

    /// Bound and listening socket on the configured address.
    pub fn bind(&self) -> Result<TcpListener> {
        let socket = TcpSocket::new_v6()?;
        socket.set_reuseaddr(true)?;
        socket.bind(SocketAddr::V6(self.settings.listen))?;
        info!(listen = %self.settings.listen, "srh-pingd: Listen socket bound");

        Ok(socket.listen(self.settings.server.backlog)?)
    }

    /// Accepts one client and pings it until `shutdown` is set.
    pub async fn run(&self, shutdown: Arc<AtomicBool>) -> Result<()> {
        let listener = self.bind()?;
        info!("srh-pingd: Now listening...");

        let (stream, peer) = loop {
            if shutdown.load(Ordering::Relaxed) {
                info!("srh-pingd: Shutdown before a client connected");
                return Ok(());
            }
            match tokio::time::timeout(SHUTDOWN_POLL_INTERVAL, listener.accept()).await {
                Ok(accepted) => break accepted?,
                Err(_) => continue,
            }
        };

        set_routing_header(&stream, &self.header)?;
        info!(%peer, "srh-pingd: Client connected");

        let sent = send_pings(
            stream,
            self.settings.server.message(),
            self.settings.server.ping_interval(),
            shutdown,
        )
        .await?;
        info!(sent, "srh-pingd: Connection finished");
        Ok(())
    }
}

/// Applies `header` as the outbound routing header of `socket`.
///
/// The buffer is handed to the kernel unmodified and with its exact length.
pub fn set_routing_header(socket: &impl AsRawFd, header: &[u8]) -> Result<()> {
    let fd = socket.as_raw_fd();

    let ret = unsafe {
        libc::setsockopt(
            fd,
            libc::IPPROTO_IPV6,
            libc::IPV6_RTHDR,
            header.as_ptr() as *const libc::c_void,
            header.len() as libc::socklen_t,
        )
    };
    if ret < 0 {
        let err = std::io::Error::last_os_error();
        return Err(PingdError::SocketOption {
            errno: err.raw_os_error().unwrap_or(0),
            message: err.to_string(),
        });
    }

    debug!(len = header.len(), "srh-pingd: Routing header installed");
    Ok(())
}

/// Writes `message` every `interval` until `shutdown` is set.
///
/// Returns the number of messages sent.
pub async fn send_pings<W>(
    mut writer: W,
    message: Vec<u8>,
    interval: Duration,
    shutdown: Arc<AtomicBool>,
) -> Result<u64>
where
    W: AsyncWrite + Unpin,
{
    let mut sent = 0u64;

    while !shutdown.load(Ordering::Relaxed) {
        debug!("srh-pingd: Sending ping...");
        writer.write_all(&message).await?;
        writer.flush().await?;
        sent += 1;
        sleep_unless_shutdown(interval, &shutdown).await;
    }

    Ok(sent)
}

/// Sleeps for `interval`, returning early once `shutdown` is set.
async fn sleep_unless_shutdown(interval: Duration, shutdown: &AtomicBool) {
    let deadline = tokio::time::Instant::now() + interval;

    while !shutdown.load(Ordering::Relaxed) {
        let now = tokio::time::Instant::now();
        if now >= deadline {
            break;
        }
        tokio::time::sleep((deadline - now).min(SHUTDOWN_POLL_INTERVAL)).await;
    }
}
