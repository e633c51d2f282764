//! Call-sign to DXCC entity resolution over a prefix mask database.
//!
//! # Examples
//!
//! In-memory usage with [`engine::LookupEngine`]:
//! ```
//! use callparser::{
//!     engine::LookupEngine,
//!     index::build_index,
//!     record::EntityRecord,
//!     types::EntityKind,
//! };
//!
//! let records = vec![
//!     EntityRecord {
//!         label: "KG4".to_string(),
//!         kind: EntityKind::Dxcc,
//!         country: "Guantanamo Bay".to_string(),
//!         dxcc: 105,
//!         masks: vec!["KG4@@.".to_string()],
//!         ..EntityRecord::default()
//!     },
//!     EntityRecord {
//!         label: "W4".to_string(),
//!         kind: EntityKind::Province,
//!         country: "United States".to_string(),
//!         dxcc: 291,
//!         masks: vec!["[KNW][A-Z]4".to_string(), "[KNW]4".to_string()],
//!         ..EntityRecord::default()
//!     },
//! ];
//! let engine = LookupEngine::new(build_index(records).expect("index"));
//!
//! let hits = engine.lookup("kg4aa");
//! assert_eq!(hits.len(), 1);
//! assert_eq!(hits[0].country, "Guantanamo Bay");
//!
//! let hits = engine.lookup("KG4AAA");
//! assert_eq!(hits[0].country, "United States");
//! assert!(engine.lookup("W6 OP").is_empty());
//! ```
//!
//! Runtime usage with a SQLite cache:
//! ```no_run
//! use callparser::{
//!     engine::LookupEngine,
//!     load::load_index,
//!     persist::SqliteHitCache,
//!     runtime::handle::{spawn_lookup_service, RuntimeConfig},
//! };
//!
//! # #[tokio::main]
//! # async fn main() {
//! let engine = LookupEngine::new(load_index("PrefixList.xml").expect("load"));
//! let cache = SqliteHitCache::open("hits.db").expect("open sqlite");
//! let handle = spawn_lookup_service(engine, Some(Box::new(cache)), None, RuntimeConfig::default());
//! let hits = handle.lookup("W6OP/4").await.expect("lookup");
//! println!("{} hits", hits.len());
//! handle.shutdown().await.expect("shutdown");
//! # }
//! ```
#![warn(missing_docs)]

/// Classifier that splits call signs into structural forms.
pub mod call;
/// Lookup engine, searches and callbook seam.
pub mod engine;
/// Entity mask index and shape pattern dictionary.
pub mod index;
/// Entity database loaders.
pub mod load;
/// Mask expansion and shape patterns.
pub mod mask;
/// Hit cache abstraction with memory and SQLite implementations.
pub mod persist;
/// Entity records, hits and callbook records.
pub mod record;
/// Async lookup service and events.
pub mod runtime;
/// Shared primitive types and enums.
pub mod types;
