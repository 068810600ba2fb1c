//! Sprint progress calculations.
//!
//! Pure functions over card and column slices. The snapshot recorder and
//! the live "today" path of the metrics queries both go through `measure`,
//! so a recorded day and a live day can never disagree on formulas.
//!
//! A card is complete iff its current column carries the board's `is_done`
//! flag; cards without a story-point estimate count as zero points.

use std::collections::{HashMap, HashSet};

use crate::card::Card;
use crate::column::{Column, ColumnId};

/// Aggregate progress of one sprint's member cards at a single moment.
#[derive(Debug, Clone, Default)]
pub struct SprintProgress {
    pub total_cards: u32,
    pub completed_cards: u32,
    pub total_story_points: u32,
    pub completed_story_points: u32,
    pub column_counts: HashMap<ColumnId, u32>,
}

/// Collect the ids of columns marked done.
pub fn done_column_ids(columns: &[Column]) -> HashSet<ColumnId> {
    columns
        .iter()
        .filter(|c| c.is_done)
        .map(|c| c.id)
        .collect()
}

/// Partition cards into (incomplete, complete) by their current column.
pub fn partition_by_completion<'a>(
    cards: &'a [Card],
    done_columns: &HashSet<ColumnId>,
) -> (Vec<&'a Card>, Vec<&'a Card>) {
    cards
        .iter()
        .partition(|card| !done_columns.contains(&card.column_id))
}

/// Sum story points over cards; missing estimates count as 0.
pub fn sum_points<'a, I>(cards: I) -> u32
where
    I: IntoIterator<Item = &'a Card>,
{
    cards.into_iter().filter_map(|card| card.points).sum()
}

/// Count member cards per column.
pub fn column_distribution(cards: &[Card]) -> HashMap<ColumnId, u32> {
    let mut counts = HashMap::new();
    for card in cards {
        *counts.entry(card.column_id).or_insert(0) += 1;
    }
    counts
}

/// Measure a sprint's progress from its member cards and board columns.
pub fn measure(cards: &[Card], columns: &[Column]) -> SprintProgress {
    let done = done_column_ids(columns);
    let (_incomplete, complete) = partition_by_completion(cards, &done);

    SprintProgress {
        total_cards: cards.len() as u32,
        completed_cards: complete.len() as u32,
        total_story_points: sum_points(cards),
        completed_story_points: sum_points(complete.iter().copied()),
        column_counts: column_distribution(cards),
    }
}
