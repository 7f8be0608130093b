//! Panel order item records.

use crate::factory::{GenerationError, RecordFactory};
use crate::generators::numeric::IntRange;
use crate::record::{FieldValue, Record};
use rand::rngs::StdRng;
use rand::SeedableRng;

/// A generated row of the `panel_order_items` table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PanelOrderItem {
    pub panel_order_id: i64,
    pub question_id: i64,
    pub order_index: i64,
}

impl PanelOrderItem {
    pub const PANEL_ORDER_ID: IntRange = IntRange::new(1, 100_000);
    pub const QUESTION_ID: IntRange = IntRange::new(1, 1_000);
    pub const ORDER_INDEX: IntRange = IntRange::new(1, 100);

    /// Whether every field lies inside its generation rule.
    pub fn is_within_rules(&self) -> bool {
        Self::PANEL_ORDER_ID.contains(self.panel_order_id)
            && Self::QUESTION_ID.contains(self.question_id)
            && Self::ORDER_INDEX.contains(self.order_index)
    }
}

impl Record for PanelOrderItem {
    const TABLE: &'static str = "panel_order_items";
    const COLUMNS: &'static [&'static str] = &["panel_order_id", "question_id", "order_index"];

    fn values(&self) -> Vec<FieldValue> {
        vec![
            FieldValue::Int(self.panel_order_id),
            FieldValue::Int(self.question_id),
            FieldValue::Int(self.order_index),
        ]
    }
}

/// Factory producing random [`PanelOrderItem`]s from its own RNG.
pub struct PanelOrderItemFactory {
    rng: StdRng,
}

impl PanelOrderItemFactory {
    /// Create a factory seeded from OS entropy.
    pub fn new() -> Self {
        Self {
            rng: StdRng::from_entropy(),
        }
    }

    /// Create a deterministic factory (same seed = same records).
    pub fn with_seed(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// Create the factory for one producer worker.
    ///
    /// Seeded workers get `seed + worker` so no two workers replay the same
    /// stream.
    pub fn for_worker(seed: Option<u64>, worker: usize) -> Self {
        match seed {
            Some(seed) => Self::with_seed(seed.wrapping_add(worker as u64)),
            None => Self::new(),
        }
    }
}

impl Default for PanelOrderItemFactory {
    fn default() -> Self {
        Self::new()
    }
}

impl RecordFactory for PanelOrderItemFactory {
    type Record = PanelOrderItem;

    fn create(&mut self) -> Result<PanelOrderItem, GenerationError> {
        PanelOrderItem::PANEL_ORDER_ID.validate("panel_order_id")?;
        PanelOrderItem::QUESTION_ID.validate("question_id")?;
        PanelOrderItem::ORDER_INDEX.validate("order_index")?;

        Ok(PanelOrderItem {
            panel_order_id: PanelOrderItem::PANEL_ORDER_ID.generate(&mut self.rng),
            question_id: PanelOrderItem::QUESTION_ID.generate(&mut self.rng),
            order_index: PanelOrderItem::ORDER_INDEX.generate(&mut self.rng),
        })
    }
}
