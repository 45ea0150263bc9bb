//! Proportional subtask timeline layout.
//!
//! Produces block geometry in unit fractions of the bar width; the egui view
//! scales it to pixels. Blocks are placed one after another in display order,
//! so overlapping segments are drawn as-is rather than merged.

use crate::annotations::{LabelIndexMap, SubtaskSegment, sorted_subtasks};

/// Smallest drawn width so zero-length segments stay visible and clickable.
pub const MIN_BLOCK_FRACTION: f64 = 0.02;

/// One drawable subtask block.
#[derive(Clone, Debug, PartialEq)]
pub struct TimelineBlock {
    /// Position of the segment in the episode's stored subtask list.
    pub storage_index: usize,
    /// Reconciled index, or the placeholder for unindexed labels.
    pub index_label: String,
    /// Numeric index used to pick a block color.
    pub color_index: Option<usize>,
    pub start: f64,
    pub end: f64,
    /// `(end - start) / duration`, unclamped.
    pub raw_fraction: f64,
    /// Width actually drawn.
    pub width_fraction: f64,
    /// Left edge: sum of the drawn widths before this block.
    pub offset_fraction: f64,
    pub tooltip: String,
}

/// Lay out the active episode's subtasks, or `None` when nothing can be drawn.
pub fn layout(
    subtasks: &[SubtaskSegment],
    duration: Option<f64>,
    labels: &LabelIndexMap,
) -> Option<Vec<TimelineBlock>> {
    let duration = duration.filter(|d| d.is_finite() && *d > 0.0)?;
    if subtasks.is_empty() {
        return None;
    }
    let mut offset = 0.0;
    let blocks = sorted_subtasks(subtasks)
        .into_iter()
        .map(|row| {
            let segment = row.item;
            let raw_fraction = (segment.end - segment.start) / duration;
            let width_fraction = block_width(raw_fraction);
            let index_label = labels.display_index(&segment.label);
            let block = TimelineBlock {
                storage_index: row.storage_index,
                tooltip: format!(
                    "{index_label}: {} ({:.2}s - {:.2}s)",
                    segment.label, segment.start, segment.end
                ),
                index_label,
                color_index: labels.get(&segment.label),
                start: segment.start,
                end: segment.end,
                raw_fraction,
                width_fraction,
                offset_fraction: offset,
            };
            offset += width_fraction;
            block
        })
        .collect();
    Some(blocks)
}

fn block_width(raw_fraction: f64) -> f64 {
    if raw_fraction.is_finite() {
        raw_fraction.max(MIN_BLOCK_FRACTION)
    } else {
        MIN_BLOCK_FRACTION
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn seg(start: f64, end: f64, label: &str) -> SubtaskSegment {
        SubtaskSegment {
            start,
            end,
            label: label.into(),
        }
    }

    fn labels_for(segments: &[SubtaskSegment]) -> LabelIndexMap {
        let annotations = crate::annotations::EpisodeAnnotations {
            subtasks: segments.to_vec(),
            ..Default::default()
        };
        LabelIndexMap::from_episodes([&annotations])
    }

    #[test]
    fn nothing_to_draw_without_duration_or_segments() {
        let segments = vec![seg(0.0, 1.0, "a")];
        let labels = labels_for(&segments);
        assert!(layout(&segments, None, &labels).is_none());
        assert!(layout(&segments, Some(0.0), &labels).is_none());
        assert!(layout(&segments, Some(f64::NAN), &labels).is_none());
        assert!(layout(&[], Some(10.0), &labels).is_none());
    }

    #[test]
    fn widths_are_proportional_with_a_floor() {
        let segments = vec![seg(0.0, 5.0, "a"), seg(5.0, 5.05, "b"), seg(5.05, 10.0, "c")];
        let labels = labels_for(&segments);
        let blocks = layout(&segments, Some(10.0), &labels).unwrap();
        assert!((blocks[0].width_fraction - 0.5).abs() < 1e-9);
        assert!((blocks[1].raw_fraction - 0.005).abs() < 1e-9);
        assert_eq!(blocks[1].width_fraction, MIN_BLOCK_FRACTION);
        let raw_sum: f64 = blocks.iter().map(|b| b.raw_fraction).sum();
        assert!((raw_sum - 1.0).abs() < 1e-9);
    }

    #[test]
    fn blocks_follow_start_order_and_carry_indices() {
        let segments = vec![seg(4.0, 8.0, "place"), seg(0.0, 4.0, "pick"), seg(8.0, 9.0, "")];
        let labels = labels_for(&segments);
        let blocks = layout(&segments, Some(10.0), &labels).unwrap();
        assert_eq!(blocks[0].storage_index, 1);
        assert_eq!(blocks[0].index_label, "0");
        assert_eq!(blocks[1].index_label, "1");
        assert_eq!(blocks[2].index_label, "?");
        assert_eq!(blocks[2].color_index, None);
        assert_eq!(blocks[0].tooltip, "0: pick (0.00s - 4.00s)");
        assert!((blocks[1].offset_fraction - 0.4).abs() < 1e-9);
    }

    #[test]
    fn overlapping_segments_are_laid_out_sequentially() {
        let segments = vec![seg(0.0, 6.0, "a"), seg(3.0, 9.0, "b")];
        let labels = labels_for(&segments);
        let blocks = layout(&segments, Some(10.0), &labels).unwrap();
        assert!((blocks[1].offset_fraction - 0.6).abs() < 1e-9);
        assert!((blocks[1].width_fraction - 0.6).abs() < 1e-9);
    }
}
