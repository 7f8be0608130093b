//! Synthetic record generation for the faker bulk loader.
//!
//! This crate provides the [`RecordFactory`] contract the load pipeline pulls
//! records from, the [`Record`] contract describing how a record maps onto a
//! destination table, and the concrete record kinds that can be generated.
//!
//! # Architecture
//!
//! ```text
//!   RecordKind (resolved once per run)
//!        │
//!        ▼
//! ┌─────────────────────┐
//! │   RecordFactory     │  one instance per producer worker
//! │                     │
//! │  - rng (StdRng)     │  owned, never shared
//! └─────────┬───────────┘
//!           │ create()
//!           ▼
//!    Record { values() in COLUMNS order }
//! ```
//!
//! # Example
//!
//! ```rust
//! use record_generator::{PanelOrderItemFactory, Record, RecordFactory};
//!
//! let mut factory = PanelOrderItemFactory::with_seed(42);
//! let item = factory.create().unwrap();
//! assert_eq!(item.values().len(), record_generator::PanelOrderItem::COLUMNS.len());
//! ```
//!
//! # Record kinds
//!
//! - `panel-order-item` - rows for the `panel_order_items` table

pub mod factory;
pub mod generators;
pub mod kind;
pub mod panel_order_item;
pub mod record;

// Re-exports for convenience
pub use factory::{GenerationError, RecordFactory};
pub use generators::numeric::IntRange;
pub use kind::{RecordKind, UnknownRecordKind};
pub use panel_order_item::{PanelOrderItem, PanelOrderItemFactory};
pub use record::{FieldValue, Record};
