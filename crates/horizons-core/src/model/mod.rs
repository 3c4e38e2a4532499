//! Items and periods: the values held by the canonical and period stores.

pub mod item;
pub mod period;

pub use item::{Item, ItemId, ItemKind, NewItem, compose_label};
pub use period::{ItemList, MemoRecord, Period, Placement, TimeSlot};
