//! Flat-file persisted collections
//!
//! One store serving both the `images` and `galleryProjects` collections,
//! persisted as JSON arrays under a data directory. Every write goes
//! through to disk before returning, so a record is durable as soon as the
//! storing call resolves. Files are written to a temp path and renamed to
//! keep a crash from truncating a collection.

mod store;

pub use store::JsonGalleryStore;
