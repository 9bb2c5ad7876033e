//! Plain-text rendering of screen views and parsing of typed learner input.

use std::fmt::Write as _;

use lesson_core::model::Visual;
use services::screens::{
    ContentView, OptionMark, QuizView, ScavengerView, ScreenBody, SortingView, TextSpan,
};
use services::{Feedback, ScreenInput, ScreenView};

const BOLD: &str = "\x1b[1m";
const RESET: &str = "\x1b[0m";

/// What a line typed at the prompt asks for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Continue,
    Quit,
    Help,
    Input(ScreenInput),
    Invalid(String),
}

pub const HELP: &str = "\
  <enter>            press the screen's button
  <n>                quiz: answer the next open question with option n
  <q> <n>            quiz: answer question q with option n
  <item> <category>  sorting: place a remaining item into a category
  <item> <text>      scavenger: write what you found (no text clears it)
  <text>             reflection: save your thoughts
  q                  quit";

#[must_use]
pub fn parse_command(view: &ScreenView, line: &str) -> Command {
    let line = line.trim();
    match line {
        "" => return Command::Continue,
        "q" | "quit" => return Command::Quit,
        "?" | "help" => return Command::Help,
        _ => {}
    }

    match &view.body {
        ScreenBody::Quiz(quiz) => parse_quiz(quiz, line),
        ScreenBody::Sorting(sorting) => parse_sorting(sorting, line),
        ScreenBody::Scavenger(hunt) => parse_scavenger(hunt, line),
        ScreenBody::Reflection(_) => Command::Input(ScreenInput::Reflect(line.to_owned())),
        _ => Command::Invalid("press enter to continue".into()),
    }
}

/// 1-based number typed by the learner, as a 0-based index below `len`.
fn pick(token: &str, len: usize) -> Option<usize> {
    token
        .parse::<usize>()
        .ok()
        .filter(|n| (1..=len).contains(n))
        .map(|n| n - 1)
}

fn parse_quiz(quiz: &QuizView, line: &str) -> Command {
    let tokens: Vec<&str> = line.split_whitespace().collect();
    let question = match tokens.as_slice() {
        [_] => quiz.questions.iter().position(|q| q.feedback.is_none()),
        [q, _] => pick(q, quiz.questions.len()),
        _ => None,
    };
    let Some(question) = question else {
        return Command::Invalid("type an option number".into());
    };
    let options = quiz.questions[question].options.len();
    match tokens.last().and_then(|t| pick(t, options)) {
        Some(option) => Command::Input(ScreenInput::SelectOption { question, option }),
        None => Command::Invalid(format!("pick an option between 1 and {options}")),
    }
}

fn parse_sorting(sorting: &SortingView, line: &str) -> Command {
    let tokens: Vec<&str> = line.split_whitespace().collect();
    let [item, category] = tokens.as_slice() else {
        return Command::Invalid("type an item number and a category number".into());
    };
    match (
        pick(item, sorting.remaining.len()),
        pick(category, sorting.categories.len()),
    ) {
        (Some(item), Some(category)) => Command::Input(ScreenInput::Place {
            item: sorting.remaining[item].id.clone(),
            category: sorting.categories[category].id.clone(),
        }),
        _ => Command::Invalid("no such item or category".into()),
    }
}

fn parse_scavenger(hunt: &ScavengerView, line: &str) -> Command {
    let (number, text) = line.split_once(' ').unwrap_or((line, ""));
    match pick(number, hunt.items.len()) {
        Some(item) => Command::Input(ScreenInput::RecordFinding {
            item: hunt.items[item].id.clone(),
            text: text.trim().to_owned(),
        }),
        None => Command::Invalid("start with the item number".into()),
    }
}

/// One line of feedback for the learner, if the input produced any.
#[must_use]
pub fn describe_feedback(feedback: &Feedback) -> Option<String> {
    match feedback {
        Feedback::Ignored | Feedback::ReflectionSaved => None,
        Feedback::Answer(answer) if answer.correct => Some(format!("Correct! {}", answer.message)),
        Feedback::Answer(answer) => Some(format!(
            "{} (the answer was option {})",
            answer.message,
            answer.correct_option + 1
        )),
        Feedback::AlreadyAnswered { question } => {
            Some(format!("Question {} is already answered.", question + 1))
        }
        Feedback::Placed { explanation, .. } => Some(format!("Yes! {explanation}")),
        Feedback::Misplaced { explanation, .. } => Some(format!("Try again. {explanation}")),
        Feedback::FindingRecorded { found, required } => {
            Some(format!("Found: {found} / {required} required"))
        }
    }
}

fn spans(out: &mut String, spans: &[TextSpan]) {
    for span in spans {
        if span.bold {
            let _ = write!(out, "{BOLD}{}{RESET}", span.text);
        } else {
            out.push_str(&span.text);
        }
    }
}

/// Render a screen with a `[index/count]` header and its button.
#[must_use]
pub fn render_screen(view: &ScreenView, index: usize, count: usize) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "\n[{}/{count}]", index + 1);

    match &view.body {
        ScreenBody::Content(content) => render_content(&mut out, content),
        ScreenBody::Quiz(quiz) => render_quiz(&mut out, quiz),
        ScreenBody::Sorting(sorting) => render_sorting(&mut out, sorting),
        ScreenBody::Scavenger(hunt) => render_scavenger(&mut out, hunt),
        ScreenBody::Reflection(reflection) => {
            let _ = writeln!(out, "{BOLD}{}{RESET}", reflection.title);
            if let Some(message) = &reflection.mascot_message {
                let _ = writeln!(out, "  \"{message}\"");
            }
            let _ = writeln!(out, "{}", reflection.prompt);
            if reflection.response.is_empty() {
                let _ = writeln!(out, "  ({})", reflection.placeholder);
            } else {
                let _ = writeln!(out, "  > {}", reflection.response);
            }
        }
        ScreenBody::Celebration(party) => {
            let _ = writeln!(out, "{BOLD}{}{RESET}", party.title);
            let _ = writeln!(out, "{}", party.message);
            if let Some(xp) = party.xp_earned {
                let _ = writeln!(out, "  +{xp} XP");
            }
            if let Some(badge) = &party.badge_earned {
                let _ = writeln!(out, "  Badge: {badge}");
            }
            for achievement in &party.achievements {
                let _ = writeln!(out, "  * {achievement}");
            }
            if party.is_module_complete {
                let _ = writeln!(out, "  Module complete!");
            }
        }
        ScreenBody::Discussion(talk) => {
            let _ = writeln!(out, "{BOLD}{}{RESET}", talk.title);
            if let Some(intro) = &talk.intro {
                let _ = writeln!(out, "{intro}");
            }
            for (i, question) in talk.questions.iter().enumerate() {
                let _ = writeln!(out, "  {}. {question}", i + 1);
            }
            if let Some(think) = &talk.think_about {
                let _ = writeln!(out, "Think about: {think}");
            }
        }
        ScreenBody::Unsupported { kind } => {
            let _ = writeln!(out, "(this screen type is not supported yet: {kind})");
        }
    }

    let marker = if view.button.enabled { ">" } else { "x" };
    let _ = writeln!(out, "{marker} [{}]", view.button.label);
    out
}

fn render_content(out: &mut String, content: &ContentView) {
    if let Some(title) = &content.title {
        let _ = writeln!(out, "{BOLD}{title}{RESET}");
    }
    if let Some(message) = &content.mascot_message {
        let _ = writeln!(out, "  \"{message}\"");
    }
    if let Some(body) = &content.body {
        spans(out, body);
        out.push('\n');
    }
    for point in &content.bullet_points {
        out.push_str("  - ");
        spans(out, point);
        out.push('\n');
    }
    if let Some(visual) = &content.visual {
        render_visual(out, visual);
    }
    if let Some(tip) = &content.tip {
        out.push_str("Tip: ");
        spans(out, tip);
        out.push('\n');
    }
}

fn render_visual(out: &mut String, visual: &Visual) {
    match visual {
        Visual::Animation { steps } => {
            let chain: Vec<String> = steps
                .iter()
                .map(|s| format!("{} {}", s.icon, s.label))
                .collect();
            let _ = writeln!(out, "  {}", chain.join(" -> "));
        }
        Visual::Grid { images, result } => {
            let _ = writeln!(out, "  {} = {result}", images.join(" "));
        }
        Visual::Comparison { left, right } => {
            let _ = writeln!(out, "  {} | {}", left.title, right.title);
            for row in 0..left.items.len().max(right.items.len()) {
                let l = left.items.get(row).map_or("", String::as_str);
                let r = right.items.get(row).map_or("", String::as_str);
                let _ = writeln!(out, "  {l} | {r}");
            }
        }
        Visual::Icon { icon, label } => {
            let _ = writeln!(out, "  {icon} {}", label.as_deref().unwrap_or(""));
        }
    }
}

fn render_quiz(out: &mut String, quiz: &QuizView) {
    if let Some(title) = &quiz.title {
        let _ = writeln!(out, "{BOLD}{title}{RESET}");
    }
    if let Some(intro) = &quiz.intro {
        let _ = writeln!(out, "{intro}");
    }
    for (q, question) in quiz.questions.iter().enumerate() {
        let _ = writeln!(out, "{}. {}", q + 1, question.prompt);
        for (o, option) in question.options.iter().enumerate() {
            let mark = match option.mark {
                OptionMark::Open | OptionMark::Dimmed => ' ',
                OptionMark::ChosenCorrect | OptionMark::Revealed => '+',
                OptionMark::ChosenWrong => '-',
            };
            let _ = writeln!(out, "   {mark} {}) {}", o + 1, option.text);
        }
        if let Some(explanation) = &question.explanation {
            let _ = writeln!(out, "   {explanation}");
        }
    }
    let _ = writeln!(out, "Answered {} of {}", quiz.answered, quiz.total);
}

fn render_sorting(out: &mut String, sorting: &SortingView) {
    let _ = writeln!(out, "{BOLD}{}{RESET}", sorting.title);
    let _ = writeln!(out, "{}", sorting.instructions);
    for (i, category) in sorting.categories.iter().enumerate() {
        let placed: Vec<&str> = category.placed.iter().map(|p| p.content.as_str()).collect();
        let _ = writeln!(out, "  [{}] {}: {}", i + 1, category.label, placed.join(", "));
    }
    for (i, item) in sorting.remaining.iter().enumerate() {
        let _ = writeln!(out, "  {}. {}", i + 1, item.content);
    }
    if let Some(result) = &sorting.result {
        let _ = writeln!(out, "{result}");
    }
}

fn render_scavenger(out: &mut String, hunt: &ScavengerView) {
    let _ = writeln!(out, "{BOLD}{}{RESET}", hunt.title);
    let _ = writeln!(out, "{}", hunt.instructions);
    for (i, item) in hunt.items.iter().enumerate() {
        let _ = writeln!(out, "  {}. {} ({})", i + 1, item.prompt, item.hint);
        if let Some(finding) = &item.finding {
            let _ = writeln!(out, "     > {finding}");
        }
    }
    let _ = writeln!(out, "{}", hunt.status);
}

#[cfg(test)]
mod tests {
    use super::*;
    use lesson_core::LessonCatalog;
    use lesson_core::model::LessonId;
    use lesson_core::time::fixed_clock;
    use services::PlaybackSession;

    fn session(id: &str) -> PlaybackSession {
        let lesson = LessonCatalog::builtin()
            .unwrap()
            .get(&LessonId::new(id))
            .unwrap()
            .clone();
        PlaybackSession::with_seed(lesson, fixed_clock(), 7)
    }

    #[test]
    fn blank_line_presses_the_button() {
        let view = session("lesson-1-1").view().unwrap();
        assert_eq!(parse_command(&view, "  "), Command::Continue);
        assert_eq!(parse_command(&view, "q"), Command::Quit);
        assert!(matches!(parse_command(&view, "3"), Command::Invalid(_)));
    }

    #[test]
    fn single_number_answers_next_open_question() {
        let mut session = session("lesson-1-1");
        while session.state().as_quiz().is_none() {
            session.advance();
        }
        let view = session.view().unwrap();
        assert_eq!(
            parse_command(&view, "2"),
            Command::Input(ScreenInput::SelectOption {
                question: 0,
                option: 1
            })
        );
        assert!(matches!(parse_command(&view, "9"), Command::Invalid(_)));
        assert!(render_screen(&view, 3, 7).contains("Answered 0 of 1"));
    }

    #[test]
    fn scavenger_line_records_finding_text() {
        let mut session = session("lesson-1-3");
        session.advance();
        let view = session.view().unwrap();
        let Command::Input(ScreenInput::RecordFinding { text, .. }) =
            parse_command(&view, "1 the thermostat")
        else {
            panic!("expected a finding");
        };
        assert_eq!(text, "the thermostat");
    }

    #[test]
    fn wrong_answer_names_the_right_option() {
        let mut session = session("lesson-1-1");
        while session.state().as_quiz().is_none() {
            session.advance();
        }
        let feedback = session.apply(ScreenInput::SelectOption {
            question: 0,
            option: 0,
        });
        let line = describe_feedback(&feedback).unwrap();
        assert!(line.starts_with("Correct!") || line.contains("the answer was option"));
    }
}
