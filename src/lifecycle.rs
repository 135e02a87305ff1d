//! Deliberate process termination: an abrupt crash and a delayed clean exit.

use axum::body::{Body, Bytes};
use futures::Stream;
use std::{
    convert::Infallible,
    pin::Pin,
    sync::Arc,
    task::{Context, Poll},
    time::Duration,
};
use tokio::sync::oneshot;
use tracing::{error, info};

/// Pause between handing out the farewell and exiting.
pub const QUIT_DELAY: Duration = Duration::from_millis(1000);

pub const FAREWELL: &str = "Bye, bye - preparing to lie down down and die after a second!";

/// Called with the exit status when the process should end.
pub type ExitHook = Arc<dyn Fn(i32) + Send + Sync>;

fn process_exit(code: i32) {
    std::process::exit(code)
}

#[derive(Clone)]
pub struct Lifecycle {
    exit: ExitHook,
    delay: Duration,
}

impl Lifecycle {
    pub fn new() -> Self {
        Self::with_exit_hook(Arc::new(process_exit))
    }

    /// Replaces `std::process::exit`, e.g. to observe exits in tests.
    pub fn with_exit_hook(exit: ExitHook) -> Self {
        Self {
            exit,
            delay: QUIT_DELAY,
        }
    }

    /// Terminates with status 1 right away.
    pub fn crash(&self) {
        error!("oh no, the app is crashing...");
        (self.exit)(1);
    }

    /// Returns the farewell body and arms a detached exit with status 0.
    ///
    /// The delay starts once the body has been fully handed to the transport,
    /// or dropped because the client went away.
    pub fn quit(&self) -> Body {
        let (delivered_tx, delivered_rx) = oneshot::channel::<()>();
        let exit = self.exit.clone();
        let delay = self.delay;

        tokio::spawn(async move {
            let _ = delivered_rx.await;
            info!("Waiting {}ms before dying", delay.as_millis());
            tokio::time::sleep(delay).await;
            info!("Time to die!");
            exit(0);
        });

        info!("exiting... the container goes down in a second!");
        Body::from_stream(SignalOnDrain {
            chunk: Some(Bytes::from_static(FAREWELL.as_bytes())),
            drained: Some(delivered_tx),
        })
    }
}

impl Default for Lifecycle {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for Lifecycle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Lifecycle")
            .field("delay", &self.delay)
            .finish_non_exhaustive()
    }
}

/// One-chunk body that fires a signal once the transport asks past its end.
struct SignalOnDrain {
    chunk: Option<Bytes>,
    drained: Option<oneshot::Sender<()>>,
}

impl SignalOnDrain {
    fn signal(&mut self) {
        if let Some(tx) = self.drained.take() {
            let _ = tx.send(());
        }
    }
}

impl Stream for SignalOnDrain {
    type Item = Result<Bytes, Infallible>;

    fn poll_next(self: Pin<&mut Self>, _cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        let this = self.get_mut();
        match this.chunk.take() {
            Some(chunk) => Poll::Ready(Some(Ok(chunk))),
            None => {
                this.signal();
                Poll::Ready(None)
            }
        }
    }
}

impl Drop for SignalOnDrain {
    fn drop(&mut self) {
        self.signal();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::StreamExt;
    use std::sync::Mutex;

    fn recording() -> (Lifecycle, Arc<Mutex<Vec<i32>>>) {
        let codes = Arc::new(Mutex::new(Vec::new()));
        let sink = codes.clone();
        let lifecycle = Lifecycle::with_exit_hook(Arc::new(move |code: i32| {
            sink.lock().unwrap().push(code);
        }));
        (lifecycle, codes)
    }

    #[test]
    fn test_crash_exits_with_one() {
        let (lifecycle, codes) = recording();
        lifecycle.crash();
        assert_eq!(*codes.lock().unwrap(), vec![1]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_quit_waits_for_body_then_delay() {
        let (lifecycle, codes) = recording();
        let body = lifecycle.quit();

        // Nothing happens while the body is unread.
        tokio::time::sleep(QUIT_DELAY * 3).await;
        assert!(codes.lock().unwrap().is_empty());

        let mut stream = body.into_data_stream();
        let chunk = stream.next().await.unwrap().unwrap();
        assert_eq!(chunk, FAREWELL.as_bytes());
        assert!(stream.next().await.is_none());

        tokio::time::sleep(QUIT_DELAY / 2).await;
        assert!(codes.lock().unwrap().is_empty());

        tokio::time::sleep(QUIT_DELAY).await;
        assert_eq!(*codes.lock().unwrap(), vec![0]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_dropped_body_still_exits() {
        let (lifecycle, codes) = recording();
        drop(lifecycle.quit());
        tokio::time::sleep(QUIT_DELAY * 2).await;
        assert_eq!(*codes.lock().unwrap(), vec![0]);
    }
}
