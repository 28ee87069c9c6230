//! Page sources.
//!
//! A [`PageSource`] hands out pages by zero-based index and reports
//! [`InvalidPage`] for indices past the end. Sources must answer indices in
//! any order: a paginator probes page `1` before it shows page `0`.
//!
//! | Source | Backing | Materialisation |
//! |--------|---------|-----------------|
//! | [`VecSource`] | `Vec<T>` | eager |
//! | [`IterSource`] | any `Iterator` | lazy, cached as far as requested |
//! | [`StreamSource`] | any `Stream` | lazy, cached as far as requested |

use std::fmt;
use std::iter::Fuse;

use async_trait::async_trait;
use chime_session::InvalidPage;
use futures::stream::{BoxStream, Chunks, Stream, StreamExt};
use tracing::trace;

/// Provides pages by index.
#[async_trait]
pub trait PageSource: Send + 'static {
    /// What one page holds.
    type Page: Send;

    /// Returns page `index`, or [`InvalidPage`] if there is no such page.
    async fn get_page(&mut self, index: usize) -> Result<Self::Page, InvalidPage>;
}

// =============================================================================
// Eager
// =============================================================================

/// Pages held in memory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VecSource<T> {
    pages: Vec<T>,
}

impl<T> VecSource<T> {
    pub fn new(pages: impl IntoIterator<Item = T>) -> Self {
        Self {
            pages: pages.into_iter().collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.pages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pages.is_empty()
    }
}

#[async_trait]
impl<T: Clone + Send + Sync + 'static> PageSource for VecSource<T> {
    type Page = T;

    async fn get_page(&mut self, index: usize) -> Result<T, InvalidPage> {
        self.pages.get(index).cloned().ok_or(InvalidPage { index })
    }
}

// =============================================================================
// Lazy
// =============================================================================

/// Pages pulled from an iterator on demand.
///
/// The iterator may be infinite. Pages already pulled are cached, so
/// going back never consumes the iterator again. The first `None` ends
/// the source for good.
pub struct IterSource<I: Iterator> {
    iter: Fuse<I>,
    cache: Vec<I::Item>,
}

impl<I: Iterator> IterSource<I> {
    pub fn new(pages: impl IntoIterator<IntoIter = I>) -> Self {
        Self {
            iter: pages.into_iter().fuse(),
            cache: Vec::new(),
        }
    }

    /// Number of pages pulled so far.
    pub fn cached(&self) -> usize {
        self.cache.len()
    }
}

#[async_trait]
impl<I> PageSource for IterSource<I>
where
    I: Iterator + Send + 'static,
    I::Item: Clone + Send,
{
    type Page = I::Item;

    async fn get_page(&mut self, index: usize) -> Result<I::Item, InvalidPage> {
        if index >= self.cache.len() {
            let missing = index + 1 - self.cache.len();
            self.cache.extend(self.iter.by_ref().take(missing));
            trace!(index, cached = self.cache.len(), "Pulled pages from iterator");
        }
        self.cache.get(index).cloned().ok_or(InvalidPage { index })
    }
}

impl<I: Iterator> fmt::Debug for IterSource<I> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("IterSource")
            .field("cached", &self.cache.len())
            .finish_non_exhaustive()
    }
}

/// Pages pulled from an async stream on demand.
pub struct StreamSource<T> {
    stream: BoxStream<'static, T>,
    cache: Vec<T>,
    exhausted: bool,
}

impl<T> StreamSource<T> {
    pub fn new(pages: impl Stream<Item = T> + Send + 'static) -> Self {
        Self {
            stream: pages.boxed(),
            cache: Vec::new(),
            exhausted: false,
        }
    }

    /// Number of pages pulled so far.
    pub fn cached(&self) -> usize {
        self.cache.len()
    }
}

#[async_trait]
impl<T: Clone + Send + 'static> PageSource for StreamSource<T> {
    type Page = T;

    async fn get_page(&mut self, index: usize) -> Result<T, InvalidPage> {
        while self.cache.len() <= index && !self.exhausted {
            match self.stream.next().await {
                Some(page) => self.cache.push(page),
                None => self.exhausted = true,
            }
        }
        self.cache.get(index).cloned().ok_or(InvalidPage { index })
    }
}

impl<T> fmt::Debug for StreamSource<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StreamSource")
            .field("cached", &self.cache.len())
            .field("exhausted", &self.exhausted)
            .finish_non_exhaustive()
    }
}

// =============================================================================
// Chunking
// =============================================================================

/// Groups of up to `size` consecutive items. See [`chunked`].
#[derive(Debug, Clone)]
pub struct Chunked<I> {
    iter: I,
    size: usize,
}

impl<I: Iterator> Iterator for Chunked<I> {
    type Item = Vec<I::Item>;

    fn next(&mut self) -> Option<Self::Item> {
        let chunk: Vec<_> = self.iter.by_ref().take(self.size).collect();
        (!chunk.is_empty()).then_some(chunk)
    }
}

/// Splits `items` into pages of `size` entries; the last page may be
/// shorter. A size of zero is treated as one.
pub fn chunked<I: IntoIterator>(items: I, size: usize) -> Chunked<I::IntoIter> {
    Chunked {
        iter: items.into_iter(),
        size: size.max(1),
    }
}

/// Like [`chunked`], for async streams.
pub fn chunked_stream<St: Stream>(items: St, size: usize) -> Chunks<St> {
    items.chunks(size.max(1))
}
