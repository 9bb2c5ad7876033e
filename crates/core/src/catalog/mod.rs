//! Static, versioned lesson catalog keyed by lesson id.

mod builtin;

use std::collections::HashMap;

use serde::Deserialize;
use thiserror::Error;

use crate::model::{
    BadgeId, Difficulty, Lesson, LessonDraft, LessonError, LessonId, MascotExpression, ModuleId,
    Screen, ScreenId, ScreenKind,
};

#[derive(Debug, Error)]
#[non_exhaustive]
pub enum CatalogError {
    #[error("duplicate lesson id {0}")]
    DuplicateLesson(LessonId),

    #[error("invalid payload for {kind} screen {screen}: {source}")]
    Payload {
        screen: ScreenId,
        kind: String,
        #[source]
        source: serde_json::Error,
    },

    #[error(transparent)]
    Lesson(#[from] LessonError),

    #[error("malformed catalog: {0}")]
    Json(#[from] serde_json::Error),
}

/// Ordered, versioned set of lessons.
#[derive(Debug, Clone)]
pub struct LessonCatalog {
    version: u32,
    lessons: Vec<Lesson>,
    index: HashMap<LessonId, usize>,
}

impl LessonCatalog {
    /// Build a catalog from validated lessons, preserving their order.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::DuplicateLesson` if two lessons share an id.
    pub fn new(version: u32, lessons: Vec<Lesson>) -> Result<Self, CatalogError> {
        let mut index = HashMap::with_capacity(lessons.len());
        for (pos, lesson) in lessons.iter().enumerate() {
            if index.insert(lesson.id().clone(), pos).is_some() {
                return Err(CatalogError::DuplicateLesson(lesson.id().clone()));
            }
        }
        Ok(Self {
            version,
            lessons,
            index,
        })
    }

    /// The lessons shipped with the app.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError` only if the bundled content fails validation.
    pub fn builtin() -> Result<Self, CatalogError> {
        Self::new(builtin::VERSION, builtin::lessons()?)
    }

    /// Load an externally authored catalog.
    ///
    /// Unknown screen types become `ScreenKind::Unsupported`; a malformed payload for a
    /// known screen type is rejected.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError` for malformed JSON, invalid payloads or lessons that fail
    /// validation.
    pub fn from_json(json: &str) -> Result<Self, CatalogError> {
        let raw: RawCatalog = serde_json::from_str(json)?;
        let lessons = raw
            .lessons
            .into_iter()
            .map(RawLesson::into_lesson)
            .collect::<Result<Vec<_>, _>>()?;
        Self::new(raw.version, lessons)
    }

    #[must_use]
    pub fn version(&self) -> u32 {
        self.version
    }

    #[must_use]
    pub fn get(&self, id: &LessonId) -> Option<&Lesson> {
        self.index.get(id).map(|&pos| &self.lessons[pos])
    }

    #[must_use]
    pub fn lessons(&self) -> &[Lesson] {
        &self.lessons
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.lessons.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lessons.is_empty()
    }

    pub fn lessons_in_module<'a>(
        &'a self,
        module: &'a ModuleId,
    ) -> impl Iterator<Item = &'a Lesson> + 'a {
        self.lessons.iter().filter(move |l| l.module_id() == module)
    }

    /// Experience points for a lesson, zero if the id is unknown.
    #[must_use]
    pub fn xp_for(&self, id: &LessonId) -> u32 {
        self.get(id).map_or(0, Lesson::xp_reward)
    }
}

//
// ─── JSON AUTHORING FORMAT ─────────────────────────────────────────────────────
//

#[derive(Deserialize)]
struct RawCatalog {
    #[serde(default = "default_version")]
    version: u32,
    lessons: Vec<RawLesson>,
}

fn default_version() -> u32 {
    1
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawLesson {
    id: LessonId,
    module_id: ModuleId,
    title: String,
    #[serde(default)]
    subtitle: String,
    #[serde(default)]
    duration: String,
    #[serde(default)]
    difficulty: Difficulty,
    #[serde(default)]
    xp_reward: u32,
    #[serde(default)]
    badge_id: Option<BadgeId>,
    #[serde(default)]
    prerequisite: Option<LessonId>,
    #[serde(default)]
    is_project_lesson: bool,
    screens: Vec<RawScreen>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawScreen {
    id: ScreenId,
    #[serde(rename = "type")]
    kind: String,
    #[serde(default)]
    mascot_expression: Option<MascotExpression>,
    #[serde(default)]
    data: serde_json::Value,
}

impl RawLesson {
    fn into_lesson(self) -> Result<Lesson, CatalogError> {
        let screens = self
            .screens
            .into_iter()
            .map(RawScreen::into_screen)
            .collect::<Result<Vec<_>, _>>()?;
        let lesson = LessonDraft {
            id: self.id,
            module_id: self.module_id,
            title: self.title,
            subtitle: self.subtitle,
            duration: self.duration,
            difficulty: self.difficulty,
            xp_reward: self.xp_reward,
            badge_id: self.badge_id,
            prerequisite: self.prerequisite,
            is_project_lesson: self.is_project_lesson,
            screens,
        }
        .validate()?;
        Ok(lesson)
    }
}

impl RawScreen {
    fn into_screen(self) -> Result<Screen, CatalogError> {
        let RawScreen {
            id,
            kind,
            mascot_expression,
            data,
        } = self;

        let payload = |source| CatalogError::Payload {
            screen: id.clone(),
            kind: kind.clone(),
            source,
        };

        let parsed = match kind.as_str() {
            "content" => serde_json::from_value(data).map(ScreenKind::Content),
            "quiz" => serde_json::from_value(data).map(ScreenKind::Quiz),
            "sorting" => serde_json::from_value(data).map(ScreenKind::Sorting),
            "scavenger" => serde_json::from_value(data).map(ScreenKind::Scavenger),
            "reflection" => serde_json::from_value(data).map(ScreenKind::Reflection),
            "celebration" => serde_json::from_value(data).map(ScreenKind::Celebration),
            "discussion" => serde_json::from_value(data).map(ScreenKind::Discussion),
            other => Ok(ScreenKind::Unsupported {
                kind: other.to_owned(),
            }),
        };
        let screen_kind = parsed.map_err(payload)?;

        let screen = Screen::new(id, screen_kind);
        Ok(match mascot_expression {
            Some(mascot) => screen.with_mascot(mascot),
            None => screen,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SMALL: &str = r#"{
        "version": 3,
        "lessons": [{
            "id": "lesson-9-1",
            "moduleId": "module-9",
            "title": "Tiny",
            "xpReward": 20,
            "screens": [
                {"id": "intro", "type": "content", "mascotExpression": "happy",
                 "data": {"mascotMessage": "Hi!", "bulletPoints": ["**bold** point"]}},
                {"id": "clip", "type": "video", "data": {"url": "https://example.com"}},
                {"id": "check", "type": "quiz", "data": {"questions": [
                    {"id": "q1", "question": "2+2?", "options": [
                        {"text": "4", "isCorrect": true, "feedback": "yes"},
                        {"text": "5", "isCorrect": false, "feedback": "no"}
                    ]}
                ]}},
                {"id": "bye", "type": "celebration", "data": {"title": "Done", "message": "Yay"}}
            ]
        }]
    }"#;

    #[test]
    fn builtin_catalog_is_valid() {
        let catalog = LessonCatalog::builtin().unwrap();
        assert_eq!(catalog.len(), 3);
        let first = catalog.get(&LessonId::new("lesson-1-1")).unwrap();
        assert_eq!(first.xp_reward(), 50);
        assert_eq!(first.badge_id().map(BadgeId::as_str), Some("first-lesson"));
        assert_eq!(
            catalog
                .lessons_in_module(&ModuleId::new("module-1"))
                .count(),
            3
        );
    }

    #[test]
    fn json_catalog_maps_unknown_types_to_placeholder() {
        let catalog = LessonCatalog::from_json(SMALL).unwrap();
        assert_eq!(catalog.version(), 3);
        let lesson = catalog.get(&"lesson-9-1".into()).unwrap();
        assert_eq!(lesson.screen_count(), 4);
        assert_eq!(lesson.screens()[0].mascot(), Some(MascotExpression::Happy));
        assert_eq!(
            lesson.screens()[1].kind(),
            &ScreenKind::Unsupported {
                kind: "video".into()
            }
        );
        assert!(lesson.screens()[2].kind().is_gated());
    }

    #[test]
    fn json_catalog_rejects_malformed_known_payload() {
        let json = r#"{"lessons":[{"id":"l","moduleId":"m","title":"t","screens":[
            {"id":"s","type":"quiz","data":{"title":"no questions field"}}]}]}"#;
        let err = LessonCatalog::from_json(json).unwrap_err();
        assert!(matches!(err, CatalogError::Payload { ref kind, .. } if kind == "quiz"));
    }

    #[test]
    fn json_catalog_rejects_repeated_sorting_item() {
        let json = r#"{"lessons":[{"id":"l","moduleId":"m","title":"t","screens":[
            {"id":"sort","type":"sorting","data":{"title":"Sort","instructions":"Go",
              "categories":[{"id":"a","label":"A","color":"red"},{"id":"b","label":"B","color":"blue"}],
              "items":[
                {"id":"x","content":"one","correctCategory":"a","explanation":""},
                {"id":"x","content":"two","correctCategory":"b","explanation":""}]}}]}]}"#;
        let err = LessonCatalog::from_json(json).unwrap_err();
        assert!(matches!(
            err,
            CatalogError::Lesson(LessonError::DuplicateItem { ref item, .. }) if item.as_str() == "x"
        ));
    }

    #[test]
    fn duplicate_lessons_are_rejected() {
        let lesson = LessonCatalog::from_json(SMALL)
            .unwrap()
            .lessons()[0]
            .clone();
        let err = LessonCatalog::new(1, vec![lesson.clone(), lesson]).unwrap_err();
        assert!(matches!(err, CatalogError::DuplicateLesson(_)));
    }

    #[test]
    fn lookup_miss_returns_none() {
        let catalog = LessonCatalog::builtin().unwrap();
        assert!(catalog.get(&"lesson-404".into()).is_none());
        assert_eq!(catalog.xp_for(&"lesson-404".into()), 0);
    }
}
