/// Drag-and-drop reorder engine
///
/// This module implements card reordering as pure functions over card-id
/// lists, decoupled from any rendering concern. A client tracks a drag
/// gesture with [`DragState`], feeds it pointer geometry, and receives a
/// [`DropOutcome`]: the new per-column orderings plus the placement batch to
/// persist. The server validates and applies the batch (see
/// `Card::apply_placements`).
///
/// # State Machine
///
/// ```text
/// idle → dragging → hovering(column, insertion-index) → dropped
///                                                     → cancelled (back to idle)
/// ```
///
/// - **begin**: captures the dragged card and its source column
/// - **hover**: recomputes the insertion index within the hovered column
///   from sibling midpoints (nearest-above rule)
/// - **drop**: removes the card from the source sequence, inserts it at the
///   computed index in the destination, and reassigns dense positions
///   (0..n-1) in every touched column
/// - **cancel**: returns to idle with no mutation
///
/// # Example
///
/// ```
/// use corkboard_shared::reorder::DragState;
/// use uuid::Uuid;
///
/// let col = Uuid::new_v4();
/// let a = Uuid::new_v4();
/// let b = Uuid::new_v4();
///
/// // Drag "B" above "A" within one column
/// let gesture = DragState::idle()
///     .begin(b, col)
///     .hover(col, 10.0, &[50.0]); // pointer above A's midpoint
///
/// let outcome = gesture.drop(&[a, b], &[a, b]).unwrap();
/// assert_eq!(outcome.destination_cards, vec![b, a]);
/// ```

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// One entry of a reorder batch: where a card lands
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CardPlacement {
    /// Card being placed
    pub card_id: Uuid,

    /// Column the card belongs to after the move
    pub column_id: Uuid,

    /// Dense ordering key within the column (0..n-1)
    pub position: i32,
}

/// Error type for reorder operations
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ReorderError {
    /// Gesture method called in a state that doesn't allow it
    #[error("Invalid gesture transition: {0}")]
    InvalidTransition(&'static str),

    /// The dragged card is not present in the source sequence
    #[error("Card {0} is not in the source column")]
    CardNotInSource(Uuid),

    /// A batch names the same card twice
    #[error("Card {0} appears more than once in the batch")]
    DuplicateCard(Uuid),

    /// Two batch entries collide on (column, position)
    #[error("Position {position} in column {column_id} is assigned twice")]
    PositionCollision { column_id: Uuid, position: i32 },
}

/// Drag gesture state
///
/// States mirror the gesture lifecycle; every transition returns a new value
/// and never touches board data. Only [`DragState::drop`] produces a
/// mutation, and that mutation is a value the caller applies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "lowercase")]
pub enum DragState {
    /// No gesture in progress
    Idle,

    /// A card has been picked up but no drop target is established
    Dragging {
        /// Card being dragged
        card_id: Uuid,

        /// Column the card was picked up from
        source_column: Uuid,
    },

    /// The pointer is over a column with a computed insertion point
    Hovering {
        /// Card being dragged
        card_id: Uuid,

        /// Column the card was picked up from
        source_column: Uuid,

        /// Column currently hovered
        target_column: Uuid,

        /// Index the card would be inserted at (relative to the target
        /// sequence without the dragged card)
        insertion_index: usize,
    },
}

/// Result of dropping a card
///
/// Carries the re-ordered card sequences for the touched column(s) and the
/// placement batch renumbering every card in those columns densely.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DropOutcome {
    /// Column the card left
    pub source_column: Uuid,

    /// Column the card landed in (equal to `source_column` for in-column moves)
    pub destination_column: Uuid,

    /// New ordering of the source column (empty entries removed)
    pub source_cards: Vec<Uuid>,

    /// New ordering of the destination column
    pub destination_cards: Vec<Uuid>,

    /// Dense placements for every card in every touched column
    pub placements: Vec<CardPlacement>,
}

impl Default for DragState {
    fn default() -> Self {
        DragState::Idle
    }
}

impl DragState {
    /// The idle state (no gesture in progress)
    pub fn idle() -> Self {
        DragState::Idle
    }

    /// Starts a drag gesture
    ///
    /// Captures the dragged card's identity and source column. Starting a
    /// new gesture from any state abandons the previous one.
    pub fn begin(self, card_id: Uuid, source_column: Uuid) -> Self {
        DragState::Dragging {
            card_id,
            source_column,
        }
    }

    /// Updates the hover target from pointer geometry
    ///
    /// `sibling_midpoints` are the vertical midpoints of the hovered
    /// column's cards (top to bottom, excluding the dragged card). The
    /// insertion index follows the nearest-above rule: the card is inserted
    /// immediately before the first sibling whose midpoint is below the
    /// pointer.
    ///
    /// Hovering from idle is a no-op; there is nothing to place.
    pub fn hover(self, target_column: Uuid, pointer_y: f64, sibling_midpoints: &[f64]) -> Self {
        match self {
            DragState::Idle => DragState::Idle,
            DragState::Dragging {
                card_id,
                source_column,
            }
            | DragState::Hovering {
                card_id,
                source_column,
                ..
            } => DragState::Hovering {
                card_id,
                source_column,
                target_column,
                insertion_index: insertion_index(pointer_y, sibling_midpoints),
            },
        }
    }

    /// Cancels the gesture (drop outside any valid target)
    ///
    /// Returns to idle with no mutation.
    pub fn cancel(self) -> Self {
        DragState::Idle
    }

    /// Completes the gesture, producing the new orderings and the batch
    ///
    /// `source_cards` and `destination_cards` are the current orderings of
    /// the source and hovered columns. For an in-column move, pass the same
    /// sequence for both.
    ///
    /// # Errors
    ///
    /// - `InvalidTransition` unless the gesture is in the hovering state
    /// - `CardNotInSource` if the dragged card is missing from `source_cards`
    pub fn drop(
        self,
        source_cards: &[Uuid],
        destination_cards: &[Uuid],
    ) -> Result<DropOutcome, ReorderError> {
        let (card_id, source_column, target_column, insertion_index) = match self {
            DragState::Hovering {
                card_id,
                source_column,
                target_column,
                insertion_index,
            } => (card_id, source_column, target_column, insertion_index),
            DragState::Idle => return Err(ReorderError::InvalidTransition("drop from idle")),
            DragState::Dragging { .. } => {
                return Err(ReorderError::InvalidTransition("drop without a hover target"))
            }
        };

        if source_column == target_column {
            let reordered = move_within(source_cards, card_id, insertion_index)?;
            let placements = rebuild_placements(source_column, &reordered);

            return Ok(DropOutcome {
                source_column,
                destination_column: target_column,
                source_cards: reordered.clone(),
                destination_cards: reordered,
                placements,
            });
        }

        let (new_source, new_dest) =
            move_between(source_cards, destination_cards, card_id, insertion_index)?;

        let mut placements = rebuild_placements(source_column, &new_source);
        placements.extend(rebuild_placements(target_column, &new_dest));

        Ok(DropOutcome {
            source_column,
            destination_column: target_column,
            source_cards: new_source,
            destination_cards: new_dest,
            placements,
        })
    }
}

/// Computes the insertion index from pointer position
///
/// Nearest-above rule: the insertion point is immediately before the first
/// sibling whose vertical midpoint is below the pointer. A pointer below
/// every midpoint appends at the end.
///
/// # Example
///
/// ```
/// use corkboard_shared::reorder::insertion_index;
///
/// let midpoints = [20.0, 60.0, 100.0];
/// assert_eq!(insertion_index(10.0, &midpoints), 0);
/// assert_eq!(insertion_index(40.0, &midpoints), 1);
/// assert_eq!(insertion_index(120.0, &midpoints), 3);
/// ```
pub fn insertion_index(pointer_y: f64, sibling_midpoints: &[f64]) -> usize {
    sibling_midpoints
        .iter()
        .position(|&midpoint| pointer_y < midpoint)
        .unwrap_or(sibling_midpoints.len())
}

/// Moves a card to a new index within one sequence
///
/// `to` is relative to the sequence with the card removed; it is clamped to
/// the end of the list.
///
/// # Errors
///
/// Returns `CardNotInSource` if the card is not in the sequence
pub fn move_within(cards: &[Uuid], card_id: Uuid, to: usize) -> Result<Vec<Uuid>, ReorderError> {
    let from = cards
        .iter()
        .position(|&id| id == card_id)
        .ok_or(ReorderError::CardNotInSource(card_id))?;

    let mut reordered: Vec<Uuid> = cards.to_vec();
    reordered.remove(from);
    let to = to.min(reordered.len());
    reordered.insert(to, card_id);

    Ok(reordered)
}

/// Moves a card from one sequence into another at the given index
///
/// `to` is clamped to the end of the destination list.
///
/// # Errors
///
/// Returns `CardNotInSource` if the card is not in the source sequence
pub fn move_between(
    source: &[Uuid],
    destination: &[Uuid],
    card_id: Uuid,
    to: usize,
) -> Result<(Vec<Uuid>, Vec<Uuid>), ReorderError> {
    let from = source
        .iter()
        .position(|&id| id == card_id)
        .ok_or(ReorderError::CardNotInSource(card_id))?;

    let mut new_source: Vec<Uuid> = source.to_vec();
    new_source.remove(from);

    // The dragged card may already be gone from the destination snapshot;
    // strip it so a stale list cannot duplicate it
    let mut new_dest: Vec<Uuid> = destination
        .iter()
        .copied()
        .filter(|&id| id != card_id)
        .collect();
    let to = to.min(new_dest.len());
    new_dest.insert(to, card_id);

    Ok((new_source, new_dest))
}

/// Assigns dense positions (0..n-1) to an ordered card sequence
pub fn rebuild_placements(column_id: Uuid, ordered_cards: &[Uuid]) -> Vec<CardPlacement> {
    ordered_cards
        .iter()
        .enumerate()
        .map(|(index, &card_id)| CardPlacement {
            card_id,
            column_id,
            position: index as i32,
        })
        .collect()
}

/// Validates a placement batch before persisting
///
/// Rejects batches that name a card twice or collide two cards on the same
/// (column, position) slot.
///
/// # Errors
///
/// - `DuplicateCard` when a card id repeats
/// - `PositionCollision` when two entries share a (column, position) pair
pub fn validate_batch(placements: &[CardPlacement]) -> Result<(), ReorderError> {
    let mut seen_cards = std::collections::HashSet::new();
    let mut seen_slots = std::collections::HashSet::new();

    for placement in placements {
        if !seen_cards.insert(placement.card_id) {
            return Err(ReorderError::DuplicateCard(placement.card_id));
        }

        if !seen_slots.insert((placement.column_id, placement.position)) {
            return Err(ReorderError::PositionCollision {
                column_id: placement.column_id,
                position: placement.position,
            });
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ids(n: usize) -> Vec<Uuid> {
        (0..n).map(|_| Uuid::new_v4()).collect()
    }

    #[test]
    fn test_insertion_index_nearest_above() {
        let midpoints = [20.0, 60.0, 100.0];

        // Above the first midpoint inserts at the top
        assert_eq!(insertion_index(5.0, &midpoints), 0);

        // Between midpoints inserts before the first one below the pointer
        assert_eq!(insertion_index(30.0, &midpoints), 1);
        assert_eq!(insertion_index(75.0, &midpoints), 2);

        // Below every midpoint appends
        assert_eq!(insertion_index(150.0, &midpoints), 3);
    }

    #[test]
    fn test_insertion_index_empty_column() {
        assert_eq!(insertion_index(42.0, &[]), 0);
    }

    #[test]
    fn test_move_within_to_front() {
        let cards = ids(3);

        let reordered = move_within(&cards, cards[2], 0).unwrap();
        assert_eq!(reordered, vec![cards[2], cards[0], cards[1]]);
    }

    #[test]
    fn test_move_within_clamps_index() {
        let cards = ids(3);

        let reordered = move_within(&cards, cards[0], 99).unwrap();
        assert_eq!(reordered, vec![cards[1], cards[2], cards[0]]);
    }

    #[test]
    fn test_move_within_missing_card() {
        let cards = ids(2);
        let stranger = Uuid::new_v4();

        let result = move_within(&cards, stranger, 0);
        assert_eq!(result, Err(ReorderError::CardNotInSource(stranger)));
    }

    #[test]
    fn test_move_between_columns() {
        let source = ids(3);
        let dest = ids(2);

        let (new_source, new_dest) = move_between(&source, &dest, source[1], 1).unwrap();

        assert_eq!(new_source, vec![source[0], source[2]]);
        assert_eq!(new_dest, vec![dest[0], source[1], dest[1]]);
    }

    #[test]
    fn test_move_between_into_empty_column() {
        let source = ids(1);

        let (new_source, new_dest) = move_between(&source, &[], source[0], 0).unwrap();

        assert!(new_source.is_empty());
        assert_eq!(new_dest, vec![source[0]]);
    }

    #[test]
    fn test_rebuild_placements_dense_zero_based() {
        let column_id = Uuid::new_v4();
        let cards = ids(4);

        let placements = rebuild_placements(column_id, &cards);

        assert_eq!(placements.len(), 4);
        for (i, placement) in placements.iter().enumerate() {
            assert_eq!(placement.card_id, cards[i]);
            assert_eq!(placement.column_id, column_id);
            assert_eq!(placement.position, i as i32);
        }
    }

    #[test]
    fn test_gesture_drop_without_hover_fails() {
        let cards = ids(2);

        let dragging = DragState::idle().begin(cards[0], Uuid::new_v4());
        let result = dragging.drop(&cards, &cards);
        assert!(matches!(result, Err(ReorderError::InvalidTransition(_))));

        let result = DragState::idle().drop(&cards, &cards);
        assert!(matches!(result, Err(ReorderError::InvalidTransition(_))));
    }

    #[test]
    fn test_gesture_cancel_returns_to_idle() {
        let col = Uuid::new_v4();
        let card = Uuid::new_v4();

        let state = DragState::idle().begin(card, col).hover(col, 0.0, &[]).cancel();
        assert_eq!(state, DragState::Idle);
    }

    #[test]
    fn test_gesture_hover_from_idle_is_noop() {
        let state = DragState::idle().hover(Uuid::new_v4(), 10.0, &[5.0]);
        assert_eq!(state, DragState::Idle);
    }

    #[test]
    fn test_drag_b_above_a_in_same_column() {
        // Column with A (position 0) and B (position 1); drag B above A
        let col = Uuid::new_v4();
        let a = Uuid::new_v4();
        let b = Uuid::new_v4();

        let gesture = DragState::idle()
            .begin(b, col)
            // A's midpoint at 50.0, pointer above it
            .hover(col, 10.0, &[50.0]);

        let outcome = gesture.drop(&[a, b], &[a, b]).unwrap();

        assert_eq!(outcome.destination_cards, vec![b, a]);
        assert_eq!(outcome.placements.len(), 2);

        let b_placement = outcome.placements.iter().find(|p| p.card_id == b).unwrap();
        let a_placement = outcome.placements.iter().find(|p| p.card_id == a).unwrap();
        assert_eq!(b_placement.position, 0);
        assert_eq!(a_placement.position, 1);
        assert_eq!(a_placement.column_id, col);
    }

    #[test]
    fn test_drop_across_columns_renumbers_both() {
        let source_col = Uuid::new_v4();
        let target_col = Uuid::new_v4();
        let source = ids(3);
        let dest = ids(2);

        let gesture = DragState::idle()
            .begin(source[0], source_col)
            // Pointer below every sibling midpoint: append at the end
            .hover(target_col, 500.0, &[40.0, 120.0]);

        let outcome = gesture.drop(&source, &dest).unwrap();

        assert_eq!(outcome.source_cards, vec![source[1], source[2]]);
        assert_eq!(outcome.destination_cards, vec![dest[0], dest[1], source[0]]);

        // Every card in both touched columns is renumbered densely
        assert_eq!(outcome.placements.len(), 5);
        validate_batch(&outcome.placements).unwrap();

        let moved = outcome
            .placements
            .iter()
            .find(|p| p.card_id == source[0])
            .unwrap();
        assert_eq!(moved.column_id, target_col);
        assert_eq!(moved.position, 2);
    }

    #[test]
    fn test_drop_keeps_relative_order_of_untouched_cards() {
        let col = Uuid::new_v4();
        let cards = ids(5);

        let gesture = DragState::idle()
            .begin(cards[4], col)
            // Insert between cards[1] and cards[2]
            .hover(col, 55.0, &[10.0, 30.0, 70.0, 90.0]);

        let outcome = gesture.drop(&cards, &cards).unwrap();

        assert_eq!(
            outcome.destination_cards,
            vec![cards[0], cards[1], cards[4], cards[2], cards[3]]
        );
    }

    #[test]
    fn test_validate_batch_duplicate_card() {
        let col = Uuid::new_v4();
        let card = Uuid::new_v4();

        let batch = vec![
            CardPlacement { card_id: card, column_id: col, position: 0 },
            CardPlacement { card_id: card, column_id: col, position: 1 },
        ];

        assert_eq!(validate_batch(&batch), Err(ReorderError::DuplicateCard(card)));
    }

    #[test]
    fn test_validate_batch_position_collision() {
        let col = Uuid::new_v4();

        let batch = vec![
            CardPlacement { card_id: Uuid::new_v4(), column_id: col, position: 0 },
            CardPlacement { card_id: Uuid::new_v4(), column_id: col, position: 0 },
        ];

        assert_eq!(
            validate_batch(&batch),
            Err(ReorderError::PositionCollision {
                column_id: col,
                position: 0
            })
        );
    }

    #[test]
    fn test_validate_batch_same_position_different_columns_ok() {
        let batch = vec![
            CardPlacement { card_id: Uuid::new_v4(), column_id: Uuid::new_v4(), position: 0 },
            CardPlacement { card_id: Uuid::new_v4(), column_id: Uuid::new_v4(), position: 0 },
        ];

        assert!(validate_batch(&batch).is_ok());
    }
}
