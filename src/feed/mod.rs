mod fetch;
mod parse;

pub use fetch::{FeedClient, HttpFeedClient, fetch_feed, is_url};
pub use parse::{FeedChannel, FeedEnclosure, FeedItem, FeedOwner, is_explicit_token, parse_feed};
