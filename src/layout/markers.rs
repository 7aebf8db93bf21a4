use std::cmp::Ordering;

use crate::ir::Marker;
use crate::theme::blend_colors;

/// Markers owned by a single layout pass.
///
/// Call [`MarkerSequence::sort`] before any positional query; the queries
/// assume position order.
#[derive(Debug, Clone, Default)]
pub struct MarkerSequence {
    markers: Vec<Marker>,
}

/// Position ascending, then priority descending.
pub fn marker_order(a: &Marker, b: &Marker) -> Ordering {
    a.position
        .cmp(&b.position)
        .then_with(|| b.priority.cmp(&a.priority))
}

impl MarkerSequence {
    pub fn new(markers: Vec<Marker>) -> Self {
        Self { markers }
    }

    /// Stable in-place sort by [`marker_order`].
    pub fn sort(&mut self) {
        self.markers.sort_by(marker_order);
    }

    pub fn sorted(mut self) -> Self {
        self.sort();
        self
    }

    pub fn is_sorted(&self) -> bool {
        self.markers
            .windows(2)
            .all(|pair| marker_order(&pair[0], &pair[1]) != Ordering::Greater)
    }

    pub fn len(&self) -> usize {
        self.markers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.markers.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Marker> {
        self.markers.iter()
    }

    pub fn into_inner(self) -> Vec<Marker> {
        self.markers
    }

    /// First index at or after `idx`, no further than `max_distance` residues
    /// ahead, whose priority is strictly higher than the marker at `idx`.
    /// Returns `idx` when there is none.
    pub fn next_better_or_self(&self, idx: usize, max_distance: i64) -> usize {
        let Some(origin) = self.markers.get(idx) else {
            return idx;
        };
        for (j, other) in self.markers.iter().enumerate().skip(idx) {
            if other.position.saturating_sub(origin.position) > max_distance {
                return idx;
            }
            if other.priority > origin.priority {
                return j;
            }
        }
        idx
    }

    /// Collapses competing markers and returns the survivors in order.
    ///
    /// Markers at the same position fold into the first (highest priority)
    /// one. After that, a marker whose [`Self::next_better_or_self`] within
    /// `merge_distance` is another marker folds into that one.
    pub fn resolve(mut self, merge_distance: i64) -> Vec<Marker> {
        self.sort();

        let mut collapsed: Vec<Marker> = Vec::with_capacity(self.markers.len());
        for marker in self.markers {
            match collapsed.last_mut() {
                Some(last) if last.position == marker.position => absorb(last, &marker),
                _ => collapsed.push(marker),
            }
        }

        let sequence = MarkerSequence::new(collapsed);
        let mut pending: Vec<Option<Marker>> = vec![None; sequence.len()];
        let mut survivors = Vec::with_capacity(sequence.len());
        for (idx, marker) in sequence.iter().enumerate() {
            let mut current = marker.clone();
            if let Some(absorbed) = pending[idx].take() {
                absorb(&mut current, &absorbed);
            }
            let target = sequence.next_better_or_self(idx, merge_distance.max(0));
            if target == idx {
                survivors.push(current);
                continue;
            }
            log::debug!(
                "marker at {} (priority {}) folds into {} (priority {})",
                current.position,
                current.priority,
                sequence.markers[target].position,
                sequence.markers[target].priority
            );
            let folded = match pending[target].take() {
                Some(mut acc) => {
                    absorb(&mut acc, &current);
                    acc
                }
                None => current,
            };
            pending[target] = Some(folded);
        }
        survivors
    }
}

/// Folds `other` into `keep`: counts add, colors blend, the taller stem wins.
fn absorb(keep: &mut Marker, other: &Marker) {
    keep.count = keep.count.saturating_add(other.count);
    keep.height_value = keep.height_value.max(other.height_value);
    if !other.color.eq_ignore_ascii_case(&keep.color) {
        match blend_colors(&keep.color, &other.color) {
            Ok(color) => keep.color = color,
            Err(err) => log::warn!("keeping color {} for merged marker: {err}", keep.color),
        }
    }
    if !other.label.is_empty() {
        if keep.label.is_empty() {
            keep.label = other.label.clone();
        } else {
            keep.label = format!("{} / {}", keep.label, other.label);
        }
    }
}
