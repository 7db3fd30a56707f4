use std::future::Future;
use std::time::Duration;
use tokio::sync::watch;

/// Drive `fut` to completion unless shutdown is signalled first.
///
/// A dropped sender means no shutdown can ever arrive, so the future is then
/// awaited unconditionally.
pub async fn until_shutdown<F>(fut: F, shutdown: &mut watch::Receiver<bool>) -> Option<F::Output>
where
    F: Future,
{
    tokio::pin!(fut);
    loop {
        if *shutdown.borrow() {
            return None;
        }
        tokio::select! {
            output = &mut fut => return Some(output),
            changed = shutdown.changed() => {
                if changed.is_err() {
                    return Some(fut.await);
                }
            }
        }
    }
}

/// Sleep for `duration`; `false` if shutdown interrupted the wait.
pub async fn sleep_or_shutdown(duration: Duration, shutdown: &mut watch::Receiver<bool>) -> bool {
    until_shutdown(tokio::time::sleep(duration), shutdown).await.is_some()
}
