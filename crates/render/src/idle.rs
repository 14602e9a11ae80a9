//! Network-idle readiness.
//!
//! A page is considered settled once no request has been in flight for the
//! configured quiet period. The tracker only sees an abstract stream of
//! [`NetworkEvent`]s so it can be driven by CDP events or by a test stream.

use crate::error::{ErrorKind, Result};
use crate::options::Readiness;
use futures::{Stream, StreamExt};
use std::collections::HashSet;
use tokio::time::{Instant, timeout_at};

#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) enum NetworkEvent {
    /// A request was issued.
    Started(String),
    /// A request finished, successfully or not.
    Settled(String),
}

/// Wait until `events` shows no in-flight requests for `readiness.quiet_period`.
///
/// Returns early if the event stream closes, and fails with
/// [`ErrorKind::Timeout`] if requests are still pending when
/// `readiness.timeout` elapses.
pub(crate) async fn wait_for_idle<S>(mut events: S, readiness: &Readiness) -> Result<()>
where
    S: Stream<Item = NetworkEvent> + Unpin,
{
    let deadline = Instant::now() + readiness.timeout;
    let mut in_flight: HashSet<String> = HashSet::new();
    loop {
        let wake = if in_flight.is_empty() { (Instant::now() + readiness.quiet_period).min(deadline) } else { deadline };
        match timeout_at(wake, events.next()).await {
            Ok(Some(NetworkEvent::Started(id))) => {
                in_flight.insert(id);
            },
            Ok(Some(NetworkEvent::Settled(id))) => {
                in_flight.remove(&id);
            },
            Ok(None) => {
                tracing::trace!(pending = in_flight.len(), "Network event stream closed");
                return Ok(());
            },
            Err(_) if in_flight.is_empty() => return Ok(()),
            Err(_) => {
                tracing::warn!(pending = in_flight.len(), "Requests still in flight at readiness timeout");
                exn::bail!(ErrorKind::Timeout(readiness.timeout));
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::stream;
    use std::time::Duration;

    fn readiness() -> Readiness {
        Readiness { quiet_period: Duration::from_millis(500), timeout: Duration::from_secs(10) }
    }

    /// Emits each event after its delay, then stays open forever.
    fn timed(events: Vec<(u64, NetworkEvent)>) -> impl Stream<Item = NetworkEvent> + Unpin {
        let timed = stream::iter(events).then(|(delay, event)| async move {
            tokio::time::sleep(Duration::from_millis(delay)).await;
            event
        });
        Box::pin(timed.chain(stream::pending()))
    }

    #[tokio::test(start_paused = true)]
    async fn quiet_page_is_idle_after_quiet_period() {
        let start = Instant::now();
        wait_for_idle(timed(vec![]), &readiness()).await.unwrap();
        assert_eq!(start.elapsed(), Duration::from_millis(500));
    }

    #[tokio::test(start_paused = true)]
    async fn waits_for_in_flight_requests() {
        let start = Instant::now();
        let events = vec![
            (100, NetworkEvent::Started("1".into())),
            (100, NetworkEvent::Started("2".into())),
            (1000, NetworkEvent::Settled("1".into())),
            (1000, NetworkEvent::Settled("2".into())),
        ];
        wait_for_idle(timed(events), &readiness()).await.unwrap();
        assert_eq!(start.elapsed(), Duration::from_millis(2700));
    }

    #[tokio::test(start_paused = true)]
    async fn stuck_request_times_out() {
        let events = vec![(10, NetworkEvent::Started("long-poll".into()))];
        let err = wait_for_idle(timed(events), &readiness()).await.unwrap_err();
        assert_eq!(*err, ErrorKind::Timeout(Duration::from_secs(10)));
    }

    #[tokio::test(start_paused = true)]
    async fn closed_stream_counts_as_idle() {
        let events = stream::iter(vec![NetworkEvent::Started("1".into())]);
        wait_for_idle(events, &readiness()).await.unwrap();
    }
}
