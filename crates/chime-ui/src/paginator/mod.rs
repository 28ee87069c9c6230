//! Paginated views over page sources.

mod navigation;
mod source;
mod view;

pub use navigation::{NEXT_EMOJI, NavigationEmojis, PREVIOUS_EMOJI, Paginate, STOP_EMOJI, navigation};
pub use source::{
    Chunked, IterSource, PageSource, StreamSource, VecSource, chunked, chunked_stream,
};
pub use view::{PageContent, PageFormatter, Paginator, format_page};
