use std::collections::HashSet;

use lesson_core::model::{CategoryId, ItemId, SortItem, SortingScreen};
use rand::Rng;
use rand::seq::SliceRandom;

use super::{Feedback, ScreenInput, ScreenInteraction};

/// Tap-to-place sorting game.
///
/// Only correct placements are recorded; a wrong tap is rejected and the item
/// goes back to the pile.
#[derive(Debug, Clone)]
pub struct SortingState {
    screen: SortingScreen,
    order: Vec<usize>,
    placements: Vec<(ItemId, CategoryId)>,
    missed: HashSet<ItemId>,
}

impl SortingState {
    /// Items presented in authored order.
    #[must_use]
    pub fn new(screen: SortingScreen) -> Self {
        let order = (0..screen.items.len()).collect();
        Self {
            screen,
            order,
            placements: Vec::new(),
            missed: HashSet::new(),
        }
    }

    pub fn shuffled<R: Rng + ?Sized>(screen: SortingScreen, rng: &mut R) -> Self {
        let mut state = Self::new(screen);
        state.order.as_mut_slice().shuffle(rng);
        state
    }

    #[must_use]
    pub fn screen(&self) -> &SortingScreen {
        &self.screen
    }

    /// Unplaced items in presentation order.
    pub fn remaining(&self) -> impl Iterator<Item = &SortItem> {
        self.order
            .iter()
            .map(|&i| &self.screen.items[i])
            .filter(|item| !self.is_placed(&item.id))
    }

    /// Items placed into `category`, oldest first.
    pub fn placed_in<'a>(&'a self, category: &'a CategoryId) -> impl Iterator<Item = &'a SortItem> {
        self.placements
            .iter()
            .filter(move |(_, c)| c == category)
            .filter_map(|(item, _)| self.screen.item(item))
    }

    #[must_use]
    pub fn placed_count(&self) -> usize {
        self.placements.len()
    }

    /// True when no item ever needed a second try.
    #[must_use]
    pub fn all_correct_first_try(&self) -> bool {
        self.missed.is_empty()
    }

    fn is_placed(&self, item: &ItemId) -> bool {
        self.placements.iter().any(|(placed, _)| placed == item)
    }
}

impl ScreenInteraction for SortingState {
    fn is_satisfied(&self) -> bool {
        self.screen.items.iter().all(|item| {
            self.placements
                .iter()
                .any(|(placed, category)| placed == &item.id && category == &item.correct_category)
        })
    }

    fn apply(&mut self, input: ScreenInput) -> Feedback {
        let ScreenInput::Place { item, category } = input else {
            return Feedback::Ignored;
        };
        if self.screen.category(&category).is_none() || self.is_placed(&item) {
            return Feedback::Ignored;
        }
        let Some(sort_item) = self.screen.item(&item) else {
            return Feedback::Ignored;
        };

        let explanation = sort_item.explanation.clone();
        if sort_item.correct_category == category {
            self.placements.push((item.clone(), category));
            Feedback::Placed { item, explanation }
        } else {
            self.missed.insert(item.clone());
            Feedback::Misplaced { item, explanation }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lesson_core::model::SortCategory;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn screen() -> SortingScreen {
        let item = |id: &str, category: &str| SortItem {
            id: id.into(),
            content: id.to_uppercase(),
            correct_category: category.into(),
            explanation: format!("{id} is {category}"),
        };
        SortingScreen {
            title: "Is it AI?".into(),
            instructions: "Sort them".into(),
            categories: vec![
                SortCategory {
                    id: "ai".into(),
                    label: "AI".into(),
                    color: "#3B82F6".into(),
                },
                SortCategory {
                    id: "not-ai".into(),
                    label: "Not AI".into(),
                    color: "#9CA3AF".into(),
                },
            ],
            items: vec![
                item("siri", "ai"),
                item("toaster", "not-ai"),
                item("netflix", "ai"),
            ],
        }
    }

    fn place(item: &str, category: &str) -> ScreenInput {
        ScreenInput::Place {
            item: item.into(),
            category: category.into(),
        }
    }

    #[test]
    fn wrong_placement_is_rejected_and_item_stays_unplaced() {
        let mut state = SortingState::new(screen());
        let feedback = state.apply(place("toaster", "ai"));
        assert_eq!(
            feedback,
            Feedback::Misplaced {
                item: "toaster".into(),
                explanation: "toaster is not-ai".into()
            }
        );
        assert_eq!(state.remaining().count(), 3);
        assert!(!state.all_correct_first_try());
    }

    #[test]
    fn satisfied_only_when_every_item_correctly_placed() {
        let mut state = SortingState::new(screen());
        state.apply(place("siri", "ai"));
        state.apply(place("toaster", "not-ai"));
        assert!(!state.is_satisfied());

        state.apply(place("netflix", "ai"));
        assert!(state.is_satisfied());
        assert!(state.all_correct_first_try());
        let ai = CategoryId::new("ai");
        let placed: Vec<_> = state.placed_in(&ai).map(|i| i.id.as_str()).collect();
        assert_eq!(placed, vec!["siri", "netflix"]);
    }

    #[test]
    fn repeated_or_unknown_placements_are_ignored() {
        let mut state = SortingState::new(screen());
        state.apply(place("siri", "ai"));
        assert_eq!(state.apply(place("siri", "ai")), Feedback::Ignored);
        assert_eq!(state.apply(place("robot", "ai")), Feedback::Ignored);
        assert_eq!(state.apply(place("toaster", "maybe")), Feedback::Ignored);
        assert_eq!(state.placed_count(), 1);
    }

    #[test]
    fn seeded_shuffle_is_deterministic_and_complete() {
        let a = SortingState::shuffled(screen(), &mut StdRng::seed_from_u64(42));
        let b = SortingState::shuffled(screen(), &mut StdRng::seed_from_u64(42));
        let ids = |s: &SortingState| -> Vec<String> {
            s.remaining().map(|i| i.id.to_string()).collect()
        };
        assert_eq!(ids(&a), ids(&b));

        let mut sorted = ids(&a);
        sorted.sort();
        assert_eq!(sorted, vec!["netflix", "siri", "toaster"]);
    }
}
