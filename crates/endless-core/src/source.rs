//! Batch source contract: where the next page of items comes from.

use std::error::Error;
use std::future::Future;
use std::pin::Pin;

/// Opaque failure value produced by a [`BatchSource`].
///
/// The paged list stores whatever the source returns and surfaces it back to
/// the caller verbatim; nothing in this crate inspects or classifies it.
pub type LoadError = Box<dyn Error>;

/// Outcome of one fetch: the next batch in display order, or a failure.
pub type BatchResult<T> = Result<Vec<T>, LoadError>;

/// Future returned by [`BatchSource::load_batch`].
///
/// The whole crate is single-threaded, so `!Send` futures are fine here.
pub type BatchFuture<T> = Pin<Box<dyn Future<Output = BatchResult<T>>>>;

/// Supplier of the next batch for a paged list.
///
/// `current` is the full item list at the moment the fetch starts, in display
/// order. The borrow ends when `load_batch` returns, so the source must copy
/// out whatever it needs to continue the sequence (typically the last item)
/// before building its future.
///
/// Returning `Ok(vec![])` is a valid outcome: it appends nothing and is not
/// treated as an error or as end-of-data. The list will simply ask again the
/// next time a fetch is requested.
pub trait BatchSource<T> {
    fn load_batch(&mut self, current: &[T]) -> BatchFuture<T>;
}

impl<T, F> BatchSource<T> for F
where
    F: FnMut(&[T]) -> BatchFuture<T>,
{
    fn load_batch(&mut self, current: &[T]) -> BatchFuture<T> {
        self(current)
    }
}
