//! Wait for the first of several events.

use futures_util::future::select_all;
use std::future::Future;

/// Wait for the first future in `events` to complete.
///
/// Returns the position of the winning future together with its output, or
/// `None` when `events` is empty. The remaining futures are dropped. When
/// several futures are ready at once, which one wins is unspecified.
pub async fn first_of<I, F>(events: I) -> Option<(usize, F::Output)>
where
    I: IntoIterator<Item = F>,
    F: Future + Unpin,
{
    let events: Vec<F> = events.into_iter().collect();
    if events.is_empty() {
        return None;
    }

    let (output, index, _rest) = select_all(events).await;
    Some((index, output))
}
