//! Read-only display ordering.
//!
//! Rows are sorted on a copy of the references; each row remembers its position
//! in storage so edits and deletes address the stored element.

use std::cmp::Ordering;

use super::model::{HighLevelSegment, QaLabel, SubtaskSegment};

/// A stored item paired with its position in the backing collection.
#[derive(Debug)]
pub struct DisplayRow<'a, T> {
    pub storage_index: usize,
    pub item: &'a T,
}

impl<T> Clone for DisplayRow<'_, T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for DisplayRow<'_, T> {}

pub fn sorted_subtasks(items: &[SubtaskSegment]) -> Vec<DisplayRow<'_, SubtaskSegment>> {
    sorted_by(items, |a, b| a.start.total_cmp(&b.start))
}

pub fn sorted_high_levels(items: &[HighLevelSegment]) -> Vec<DisplayRow<'_, HighLevelSegment>> {
    sorted_by(items, |a, b| a.start.total_cmp(&b.start))
}

pub fn sorted_qa_labels(items: &[QaLabel]) -> Vec<DisplayRow<'_, QaLabel>> {
    sorted_by(items, |a, b| a.frame_idx.cmp(&b.frame_idx))
}

fn sorted_by<T>(items: &[T], compare: impl Fn(&T, &T) -> Ordering) -> Vec<DisplayRow<'_, T>> {
    let mut rows: Vec<_> = items
        .iter()
        .enumerate()
        .map(|(storage_index, item)| DisplayRow {
            storage_index,
            item,
        })
        .collect();
    rows.sort_by(|a, b| compare(a.item, b.item));
    rows
}

#[cfg(test)]
mod tests {
    use super::*;

    fn seg(start: f64, label: &str) -> SubtaskSegment {
        SubtaskSegment {
            start,
            end: start + 1.0,
            label: label.into(),
        }
    }

    #[test]
    fn subtasks_sort_by_start_without_touching_storage() {
        let stored = vec![seg(4.0, "c"), seg(0.5, "a"), seg(2.0, "b")];
        let rows = sorted_subtasks(&stored);
        let labels: Vec<_> = rows.iter().map(|row| row.item.label.as_str()).collect();
        assert_eq!(labels, vec!["a", "b", "c"]);
        let positions: Vec<_> = rows.iter().map(|row| row.storage_index).collect();
        assert_eq!(positions, vec![1, 2, 0]);
        assert_eq!(stored[0].label, "c");
    }

    #[test]
    fn equal_starts_keep_storage_order() {
        let stored = vec![seg(1.0, "first"), seg(1.0, "second")];
        let rows = sorted_subtasks(&stored);
        assert_eq!(rows[0].item.label, "first");
        assert_eq!(rows[1].item.label, "second");
    }

    #[test]
    fn qa_labels_sort_by_frame() {
        let stored = vec![
            QaLabel {
                frame_idx: 90,
                kind: String::new(),
                question: "q2".into(),
                answer: "a".into(),
            },
            QaLabel {
                frame_idx: 10,
                kind: String::new(),
                question: "q1".into(),
                answer: "a".into(),
            },
        ];
        let rows = sorted_qa_labels(&stored);
        assert_eq!(rows[0].item.question, "q1");
        assert_eq!(rows[0].storage_index, 1);
    }
}
