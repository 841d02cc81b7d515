// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Port-free polling before starting a task that declares `ports` (§4.6
//! run-loop step 4: "block until the port is free on localhost").

use std::net::SocketAddr;
use std::time::Duration;

use tokio::net::TcpListener;
use tokio_util::sync::CancellationToken;

/// One poll attempt's timeout, and the delay between attempts.
const POLL_INTERVAL: Duration = Duration::from_millis(200);

/// Cancellation lost the race (§4.3-style: callers abort on cancellation).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cancelled;

/// Block until `port` is free to bind on localhost, or cancellation wins.
///
/// "Free" is judged by a transient bind attempt: if we can bind and
/// immediately drop a listener, nothing else holds the port.
pub async fn wait_port_free(port: u16, cancel: &CancellationToken) -> Result<(), Cancelled> {
    loop {
        if cancel.is_cancelled() {
            return Err(Cancelled);
        }
        let addr: SocketAddr = ([127, 0, 0, 1], port).into();
        if TcpListener::bind(addr).await.is_ok() {
            return Ok(());
        }
        tokio::select! {
            _ = tokio::time::sleep(POLL_INTERVAL) => {}
            _ = cancel.cancelled() => return Err(Cancelled),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn free_port_resolves_immediately() {
        // Bind to port 0 to get an OS-assigned free port, then drop it.
        let probe = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let port = probe.local_addr().unwrap().port();
        drop(probe);
        let cancel = CancellationToken::new();
        assert!(wait_port_free(port, &cancel).await.is_ok());
    }

    #[tokio::test]
    async fn busy_port_waits_until_freed() {
        let held = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let port = held.local_addr().unwrap().port();
        let cancel = CancellationToken::new();

        let waiter = tokio::spawn(async move { wait_port_free(port, &cancel).await });
        tokio::time::sleep(Duration::from_millis(50)).await;
        assert!(!waiter.is_finished());

        drop(held);
        assert!(waiter.await.unwrap().is_ok());
    }

    #[tokio::test]
    async fn cancellation_aborts_the_wait() {
        let held = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let port = held.local_addr().unwrap().port();
        let cancel = CancellationToken::new();
        let cancel2 = cancel.clone();

        let waiter = tokio::spawn(async move { wait_port_free(port, &cancel2).await });
        tokio::time::sleep(Duration::from_millis(50)).await;
        cancel.cancel();
        assert_eq!(waiter.await.unwrap(), Err(Cancelled));
    }
}
