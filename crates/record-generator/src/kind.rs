//! Closed set of record kinds the loader can generate.

use crate::panel_order_item::PanelOrderItem;
use crate::record::Record;
use std::fmt;
use std::str::FromStr;

/// Record kind selected on the command line.
///
/// The kind is resolved to a concrete factory type once, when the pipeline
/// is built, so records are never dispatched on type at runtime.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RecordKind {
    #[default]
    PanelOrderItem,
}

impl RecordKind {
    pub const ALL: &'static [RecordKind] = &[RecordKind::PanelOrderItem];

    /// Name used on the command line.
    pub fn name(&self) -> &'static str {
        match self {
            RecordKind::PanelOrderItem => "panel-order-item",
        }
    }

    /// Destination table for this kind.
    pub fn table(&self) -> &'static str {
        match self {
            RecordKind::PanelOrderItem => PanelOrderItem::TABLE,
        }
    }

    /// Destination columns, in record field order.
    pub fn columns(&self) -> &'static [&'static str] {
        match self {
            RecordKind::PanelOrderItem => PanelOrderItem::COLUMNS,
        }
    }
}

impl fmt::Display for RecordKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Returned when parsing an unknown record kind name.
#[derive(Debug, thiserror::Error)]
#[error("unknown record kind '{0}' (expected one of: panel-order-item)")]
pub struct UnknownRecordKind(pub String);

impl FromStr for RecordKind {
    type Err = UnknownRecordKind;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        RecordKind::ALL
            .iter()
            .copied()
            .find(|kind| kind.name() == s)
            .ok_or_else(|| UnknownRecordKind(s.to_string()))
    }
}
