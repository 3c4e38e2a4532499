//! Field edits. Each field has its own propagation rule:
//!
//! - `content` rebuilds the labels of descendants derived from it;
//! - `color` and `category` are forced onto the whole subtree;
//! - `note` stays on exactly one item.
//!
//! Period header edits (goal, motto, memo) touch one period only.

use std::collections::{HashSet, VecDeque};

use tracing::instrument;

use crate::engine::Planner;
use crate::graph;
use crate::model::{Item, ItemId, MemoRecord, Period, compose_label};
use crate::period::PeriodId;

impl Planner {
    /// Replace an item's label and rebuild derived labels below it.
    ///
    /// The edited item's label becomes exactly `content` (it stops being a
    /// composite). A descendant is rebuilt when its label is derived from
    /// its parent's: it carries a `sub_content` detail, or it mirrors the
    /// parent's previous label verbatim. Descendants with their own custom
    /// label, and everything below them, are left alone.
    ///
    /// Returns every id whose label changed; empty for unknown ids or blank
    /// content.
    #[instrument(skip(self))]
    pub fn edit_content(&mut self, id: &ItemId, content: &str) -> Vec<ItemId> {
        let content = content.trim();
        let Some(item) = self.items.get(id) else {
            return Vec::new();
        };
        if content.is_empty() || (item.content == content && item.sub_content.is_none()) {
            return Vec::new();
        }

        let mut changed = Vec::new();
        let mut visited: HashSet<ItemId> = HashSet::from([id.clone()]);
        let mut queue: VecDeque<(ItemId, String, String)> = VecDeque::new();

        let old = item.content.clone();
        self.items.update(id, |it| {
            it.content = content.to_string();
            it.sub_content = None;
        });
        changed.push(id.clone());
        queue.push_back((id.clone(), old, content.to_string()));

        while let Some((parent_id, old_label, new_label)) = queue.pop_front() {
            let Some(parent) = self.items.get(&parent_id) else {
                continue;
            };
            for child_id in parent.child_ids.clone() {
                if !visited.insert(child_id.clone()) {
                    continue;
                }
                let Some(child) = self.items.get(&child_id) else {
                    continue;
                };
                let rebuilt = match child.sub_content.as_deref() {
                    Some(sub) => compose_label(&new_label, Some(sub)),
                    None if child.content == old_label => new_label.clone(),
                    None => continue,
                };
                if rebuilt == child.content {
                    continue;
                }
                let previous = child.content.clone();
                self.items
                    .update(&child_id, |it| it.content.clone_from(&rebuilt));
                changed.push(child_id.clone());
                queue.push_back((child_id, previous, rebuilt));
            }
        }

        let touched: HashSet<ItemId> = changed.iter().cloned().collect();
        self.sync(&touched);
        tracing::debug!(relabelled = changed.len(), "content edited");
        changed
    }

    /// Set (or clear) the color of an item and its whole subtree.
    #[instrument(skip(self))]
    pub fn edit_color(&mut self, id: &ItemId, color: Option<&str>) -> Vec<ItemId> {
        let color = normalize_tag(color);
        self.cascade_field(id, |item| {
            if item.color == color {
                return false;
            }
            item.color.clone_from(&color);
            true
        })
    }

    /// Set (or clear) the category of an item and its whole subtree.
    #[instrument(skip(self))]
    pub fn edit_category(&mut self, id: &ItemId, category: Option<&str>) -> Vec<ItemId> {
        let category = normalize_tag(category);
        self.cascade_field(id, |item| {
            if item.category == category {
                return false;
            }
            item.category.clone_from(&category);
            true
        })
    }

    /// Set (or clear) the note of exactly one item.
    #[instrument(skip(self, note))]
    pub fn edit_note(&mut self, id: &ItemId, note: Option<&str>) -> bool {
        let note = note.filter(|n| !n.trim().is_empty()).map(str::to_string);
        let Some(before) = self.items.get(id).cloned() else {
            return false;
        };
        let Some(after) = self.items.update(id, |item| item.note = note) else {
            return false;
        };
        if std::sync::Arc::ptr_eq(&before, &after) {
            return false;
        }
        self.sync(&HashSet::from([id.clone()]));
        true
    }

    /// Apply `edit` to every item in the subtree of `id`; `edit` reports
    /// whether it changed anything.
    fn cascade_field(
        &mut self,
        id: &ItemId,
        mut edit: impl FnMut(&mut Item) -> bool,
    ) -> Vec<ItemId> {
        let mut changed = Vec::new();
        for member in graph::descendant_ids(&self.items, id) {
            let mut did_change = false;
            self.items.update(&member, |item| did_change = edit(item));
            if did_change {
                changed.push(member);
            }
        }
        let touched: HashSet<ItemId> = changed.iter().cloned().collect();
        self.sync(&touched);
        changed
    }

    // -----------------------------------------------------------------------
    // Period headers
    // -----------------------------------------------------------------------

    pub fn set_goal(&mut self, period_id: &PeriodId, text: &str) -> bool {
        self.edit_header(period_id, Header::Goal, text)
    }

    pub fn set_motto(&mut self, period_id: &PeriodId, text: &str) -> bool {
        self.edit_header(period_id, Header::Motto, text)
    }

    pub fn set_memo(&mut self, period_id: &PeriodId, text: &str) -> bool {
        self.edit_header(period_id, Header::Memo, text)
    }

    /// Append a memo record tagged with this period. Blank text is ignored.
    pub fn add_memo(&mut self, period_id: &PeriodId, text: &str) -> bool {
        let text = text.trim();
        if text.is_empty() {
            return false;
        }
        self.periods.modify(period_id, |period| {
            period.memos.push(MemoRecord {
                level: period.level,
                period_id: period.id.clone(),
                text: text.to_string(),
            });
        });
        true
    }

    /// Unchanged text leaves the period's `Arc` alone; blank text on a
    /// never-referenced period does not create it.
    fn edit_header(&mut self, period_id: &PeriodId, header: Header, text: &str) -> bool {
        let text = text.trim();
        let unchanged = self
            .periods
            .get(period_id)
            .map_or(text.is_empty(), |period| header.read(period) == text);
        if unchanged {
            return false;
        }
        self.periods
            .modify(period_id, |period| text.clone_into(header.field(period)));
        true
    }
}

#[derive(Debug, Clone, Copy)]
enum Header {
    Goal,
    Motto,
    Memo,
}

impl Header {
    fn read(self, period: &Period) -> &str {
        match self {
            Self::Goal => &period.goal,
            Self::Motto => &period.motto,
            Self::Memo => &period.memo,
        }
    }

    fn field(self, period: &mut Period) -> &mut String {
        match self {
            Self::Goal => &mut period.goal,
            Self::Motto => &mut period.motto,
            Self::Memo => &mut period.memo,
        }
    }
}

fn normalize_tag(raw: Option<&str>) -> Option<String> {
    raw.map(str::trim)
        .filter(|t| !t.is_empty())
        .map(str::to_string)
}
