use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};
use std::sync::Arc;
use std::{fmt, str::FromStr};

use crate::model::item::{Item, ItemId};
use crate::period::{Level, PeriodId};

/// The eight fixed time-of-day buckets of a day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TimeSlot {
    Dawn,
    Morning,
    LateMorning,
    Midday,
    Afternoon,
    LateAfternoon,
    Evening,
    Night,
}

impl TimeSlot {
    pub const ALL: [Self; 8] = [
        Self::Dawn,
        Self::Morning,
        Self::LateMorning,
        Self::Midday,
        Self::Afternoon,
        Self::LateAfternoon,
        Self::Evening,
        Self::Night,
    ];

    const fn as_str(self) -> &'static str {
        match self {
            Self::Dawn => "dawn",
            Self::Morning => "morning",
            Self::LateMorning => "late_morning",
            Self::Midday => "midday",
            Self::Afternoon => "afternoon",
            Self::LateAfternoon => "late_afternoon",
            Self::Evening => "evening",
            Self::Night => "night",
        }
    }
}

impl fmt::Display for TimeSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TimeSlot {
    type Err = ParsePlacementError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_lowercase().replace('-', "_");
        Self::ALL
            .into_iter()
            .find(|slot| slot.as_str() == normalized)
            .ok_or_else(|| ParsePlacementError(s.to_string()))
    }
}

/// Which container of a period an item sits in.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", content = "key", rename_all = "snake_case")]
pub enum Placement {
    /// The period's native todo list.
    Todos,
    /// The period's native routine list.
    Routines,
    /// Assigned down into one child period.
    Slot(PeriodId),
    /// A time-of-day bucket; only days have these.
    Time(TimeSlot),
}

impl fmt::Display for Placement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Todos => f.write_str("todos"),
            Self::Routines => f.write_str("routines"),
            Self::Slot(id) => write!(f, "slot:{id}"),
            Self::Time(slot) => write!(f, "time:{slot}"),
        }
    }
}

/// Error returned when parsing a [`Placement`] or [`TimeSlot`] from text.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid placement: '{0}' (expected todos, routines, slot:<period>, or time:<slot>)")]
pub struct ParsePlacementError(pub String);

impl FromStr for Placement {
    type Err = ParsePlacementError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        match trimmed.to_ascii_lowercase().as_str() {
            "todos" | "todo" => return Ok(Self::Todos),
            "routines" | "routine" => return Ok(Self::Routines),
            _ => {}
        }
        if let Some(period) = trimmed.strip_prefix("slot:") {
            let id = period
                .parse::<PeriodId>()
                .map_err(|_| ParsePlacementError(s.to_string()))?;
            return Ok(Self::Slot(id));
        }
        if let Some(slot) = trimmed.strip_prefix("time:") {
            return slot
                .parse::<TimeSlot>()
                .map(Self::Time)
                .map_err(|_| ParsePlacementError(s.to_string()));
        }
        Err(ParsePlacementError(s.to_string()))
    }
}

/// A memo written at some period, shown again in its descendants.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MemoRecord {
    pub level: Level,
    pub period_id: PeriodId,
    pub text: String,
}

/// Ordered list of cached item copies.
pub type ItemList = Vec<Arc<Item>>;

/// One node of the time hierarchy with its denormalized item copies.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Period {
    pub id: PeriodId,
    pub level: Level,
    #[serde(default)]
    pub goal: String,
    #[serde(default)]
    pub motto: String,
    #[serde(default)]
    pub memo: String,
    #[serde(default)]
    pub memos: Vec<MemoRecord>,
    #[serde(default)]
    pub todos: ItemList,
    #[serde(default)]
    pub routines: ItemList,
    /// Items assigned into each child period, keyed by the child's id.
    #[serde(default)]
    pub slots: BTreeMap<PeriodId, ItemList>,
    /// Present only at day level.
    #[serde(default)]
    pub time_slots: Option<BTreeMap<TimeSlot, ItemList>>,
}

impl Period {
    /// An empty period. Days get all eight time slots up front.
    #[must_use]
    pub fn new(id: PeriodId) -> Self {
        let level = id.level();
        let time_slots: Option<BTreeMap<TimeSlot, ItemList>> = (level == Level::Day)
            .then(|| TimeSlot::ALL.into_iter().map(|s| (s, Vec::new())).collect());
        Self {
            id,
            level,
            goal: String::new(),
            motto: String::new(),
            memo: String::new(),
            memos: Vec::new(),
            todos: Vec::new(),
            routines: Vec::new(),
            slots: BTreeMap::new(),
            time_slots,
        }
    }

    /// Borrow one container, `None` when the period does not have it.
    #[must_use]
    pub fn list(&self, placement: &Placement) -> Option<&ItemList> {
        match placement {
            Placement::Todos => Some(&self.todos),
            Placement::Routines => Some(&self.routines),
            Placement::Slot(child) => self.slots.get(child),
            Placement::Time(slot) => self.time_slots.as_ref()?.get(slot),
        }
    }

    /// Mutably borrow one container, creating an empty child slot on demand.
    ///
    /// Returns `None` for time slots on non-day periods.
    pub fn list_mut(&mut self, placement: &Placement) -> Option<&mut ItemList> {
        match placement {
            Placement::Todos => Some(&mut self.todos),
            Placement::Routines => Some(&mut self.routines),
            Placement::Slot(child) => Some(self.slots.entry(child.clone()).or_default()),
            Placement::Time(slot) => Some(self.time_slots.as_mut()?.entry(*slot).or_default()),
        }
    }

    /// Every cached item copy, in container order.
    pub fn items(&self) -> impl Iterator<Item = &Arc<Item>> {
        self.todos
            .iter()
            .chain(self.routines.iter())
            .chain(self.slots.values().flatten())
            .chain(self.time_slots.iter().flat_map(BTreeMap::values).flatten())
    }

    #[must_use]
    pub fn contains(&self, id: &ItemId) -> bool {
        self.items().any(|item| &item.id == id)
    }

    /// The first container that holds `id`.
    #[must_use]
    pub fn placement_of(&self, id: &ItemId) -> Option<Placement> {
        let holds = |list: &ItemList| list.iter().any(|item| &item.id == id);
        if holds(&self.todos) {
            return Some(Placement::Todos);
        }
        if holds(&self.routines) {
            return Some(Placement::Routines);
        }
        if let Some((child, _)) = self.slots.iter().find(|(_, list)| holds(list)) {
            return Some(Placement::Slot(child.clone()));
        }
        self.time_slots
            .as_ref()?
            .iter()
            .find(|(_, list)| holds(list))
            .map(|(slot, _)| Placement::Time(*slot))
    }

    /// Distinct ids of every cached item, in container order.
    #[must_use]
    pub fn item_ids(&self) -> Vec<ItemId> {
        let mut seen = HashSet::new();
        self.items()
            .filter(|item| seen.insert(item.id.clone()))
            .map(|item| item.id.clone())
            .collect()
    }

    /// True when the period carries no items and no header text.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items().next().is_none()
            && self.goal.is_empty()
            && self.motto.is_empty()
            && self.memo.is_empty()
            && self.memos.is_empty()
    }
}
