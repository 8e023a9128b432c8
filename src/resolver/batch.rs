use futures::future::join_all;
use std::future::Future;

/// Run `f` over `items` in fixed-size batches.
///
/// Every call in a batch runs concurrently and the next batch starts only
/// after the whole batch has finished. Results keep the order of `items`.
pub async fn for_each_batch<I, T, F, Fut>(items: Vec<I>, batch_size: usize, f: F) -> Vec<T>
where
    F: Fn(I) -> Fut,
    Fut: Future<Output = T>,
{
    let batch_size = batch_size.max(1);
    let mut results = Vec::with_capacity(items.len());
    let mut items = items.into_iter().peekable();

    while items.peek().is_some() {
        let batch: Vec<Fut> = items.by_ref().take(batch_size).map(&f).collect();
        results.extend(join_all(batch).await);
    }

    results
}
