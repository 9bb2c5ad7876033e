use std::collections::HashMap;

use lesson_core::model::{ItemId, ScavengerScreen};

use super::{Feedback, ScreenInput, ScreenInteraction};

#[derive(Debug, Clone)]
pub struct ScavengerState {
    screen: ScavengerScreen,
    findings: HashMap<ItemId, String>,
}

impl ScavengerState {
    #[must_use]
    pub fn new(screen: ScavengerScreen) -> Self {
        Self {
            screen,
            findings: HashMap::new(),
        }
    }

    #[must_use]
    pub fn screen(&self) -> &ScavengerScreen {
        &self.screen
    }

    #[must_use]
    pub fn finding(&self, item: &ItemId) -> Option<&str> {
        self.findings.get(item).map(String::as_str)
    }

    /// Findings with non-blank text.
    #[must_use]
    pub fn found_count(&self) -> usize {
        self.findings
            .values()
            .filter(|text| !text.trim().is_empty())
            .count()
    }

    #[must_use]
    pub fn required(&self) -> usize {
        self.screen.min_items_to_complete
    }

    #[must_use]
    pub fn still_needed(&self) -> usize {
        self.required().saturating_sub(self.found_count())
    }
}

impl ScreenInteraction for ScavengerState {
    fn is_satisfied(&self) -> bool {
        self.found_count() >= self.required()
    }

    fn apply(&mut self, input: ScreenInput) -> Feedback {
        let ScreenInput::RecordFinding { item, text } = input else {
            return Feedback::Ignored;
        };
        if !self.screen.items.iter().any(|i| i.id == item) {
            return Feedback::Ignored;
        }
        if text.trim().is_empty() {
            self.findings.remove(&item);
        } else {
            self.findings.insert(item, text);
        }
        Feedback::FindingRecorded {
            found: self.found_count(),
            required: self.required(),
        }
    }
}
