mod client;
mod model;

pub use client::{DirectoryClient, ItunesDirectory};
pub use model::{DirectoryEpisode, DirectoryLookup, DirectoryPodcast, DirectoryRecord};
