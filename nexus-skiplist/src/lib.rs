//! Ordered map built on a tower-linked skip list.
//!
//! A skip list keeps entries sorted in a linked list (level 0) and layers
//! sparser "express" lists on top. Each entry is promoted into a random
//! number of upper levels, so searches skip most of the list and run in
//! O(log n) expected time with no rebalancing.
//!
//! # Design
//!
//! Nodes never point at each other. They live in an arena and link by index:
//!
//! ```text
//! Storage (Slab)  - owns every node, provides stable indices
//! SkipMap         - head/top sentinels, live count, level generator
//! Node            - left/right/up/down indices + payload
//! ```
//!
//! - **Four links per node**: horizontal neighbours and the copy directly
//!   above and below. Removal unlinks a tower bottom-up in O(height).
//! - **One entry per key**: only the level-0 node owns the key and value.
//!   Upper copies store the index of their level-0 node.
//! - **Sentinel indices**: an absent link is [`Index::NONE`], not `Option`.
//!
//! # Quick Start
//!
//! ```
//! use nexus_skiplist::SkipMap;
//!
//! let mut map = SkipMap::with_seed(42);
//! for key in [5u64, 3, 8, 1] {
//!     map.set(key, key * 10);
//! }
//!
//! assert_eq!(map.keys().copied().collect::<Vec<_>>(), vec![1, 3, 5, 8]);
//! assert_eq!(map.get(&3), Some(&30));
//! assert_eq!(map.set(3, 31), Some(30));
//! assert_eq!(map.remove(&8), Some(80));
//! assert_eq!(map.len(), 3);
//! ```
//!
//! # Lookup Flavours
//!
//! | Method | Missing key |
//! |--------|-------------|
//! | [`SkipMap::get`] | `None` |
//! | [`SkipMap::get_or_default`] | `V::default()` |
//! | [`SkipMap::try_get`] | `Err(Error::KeyNotFound)` |
//! | `map[&key]` | panics |
//!
//! # Configuration
//!
//! ```
//! use nexus_skiplist::SkipMap;
//!
//! let map: SkipMap<u64, u64> = SkipMap::builder()
//!     .max_level(16)
//!     .seed(7)
//!     .capacity(4096)
//!     .build()
//!     .unwrap();
//! assert_eq!(map.max_level(), 16);
//! ```
//!
//! # Logging
//!
//! Structural events go through the [`log`](https://docs.rs/log) facade:
//! `trace!` per insert and removal, `debug!` when the sentinel tower grows
//! or the map is cleared. No logger is installed by this crate.

#![warn(missing_docs)]

mod config;
mod error;
mod index;
mod iter;
mod level;
mod map;
mod node;
mod storage;

pub use config::{Builder, Config, MAX_LEVEL};
pub use error::{Error, InvariantError};
pub use index::Index;
pub use iter::{IntoIter, Iter, Keys, Values};
pub use level::LevelGenerator;
pub use map::{Levels, SkipMap};
pub use node::Node;
pub use storage::Storage;
