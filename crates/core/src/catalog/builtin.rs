// Module 1: "AI All Around Us".

use crate::model::{
    AnimationStep, CelebrationScreen, ComparisonColumn, ContentScreen, Difficulty,
    DiscussionScreen, Lesson, LessonDraft, LessonError, MascotExpression, QuizOption,
    QuizQuestion, QuizScreen, ReflectionScreen, ScavengerItem, ScavengerScreen, Screen,
    ScreenKind, SortCategory, SortItem, SortingScreen, Visual,
};

pub(super) const VERSION: u32 = 1;

pub(super) fn lessons() -> Result<Vec<Lesson>, LessonError> {
    Ok(vec![what_is_ai()?, ai_vs_humans()?, ai_detective()?])
}

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| (*s).to_owned()).collect()
}

fn mascot_says(id: &str, mascot: MascotExpression, message: &str, button: &str) -> Screen {
    Screen::new(
        id,
        ScreenKind::Content(ContentScreen {
            mascot_message: Some(message.into()),
            button_text: Some(button.into()),
            ..ContentScreen::default()
        }),
    )
    .with_mascot(mascot)
}

fn opt(text: &str, is_correct: bool, feedback: &str) -> QuizOption {
    QuizOption {
        text: text.into(),
        is_correct,
        feedback: feedback.into(),
    }
}

fn question(id: &str, prompt: &str, options: Vec<QuizOption>) -> QuizQuestion {
    QuizQuestion {
        id: id.into(),
        question: prompt.into(),
        options,
        explanation: None,
    }
}

fn category(id: &str, label: &str, color: &str) -> SortCategory {
    SortCategory {
        id: id.into(),
        label: label.into(),
        color: color.into(),
    }
}

fn sort_item(id: &str, content: &str, correct: &str, explanation: &str) -> SortItem {
    SortItem {
        id: id.into(),
        content: content.into(),
        correct_category: correct.into(),
        explanation: explanation.into(),
    }
}

fn hunt_item(id: &str, prompt: &str, hint: &str, examples: &[&str]) -> ScavengerItem {
    ScavengerItem {
        id: id.into(),
        prompt: prompt.into(),
        hint: hint.into(),
        example_answers: strings(examples),
    }
}

fn what_is_ai() -> Result<Lesson, LessonError> {
    LessonDraft {
        id: "lesson-1-1".into(),
        module_id: "module-1".into(),
        title: "What is AI?".into(),
        subtitle: "Meet your new smart friend".into(),
        duration: "8-10 minutes".into(),
        difficulty: Difficulty::Beginner,
        xp_reward: 50,
        badge_id: Some("first-lesson".into()),
        prerequisite: None,
        is_project_lesson: false,
        screens: vec![
            mascot_says(
                "1-1-intro",
                MascotExpression::Excited,
                "Hi there! I'm Sparky, and I'm SO excited to learn about AI with you!\n\n\
                 AI stands for Artificial Intelligence. That's a big fancy term, but don't \
                 worry, I'll explain it in a way that makes sense!",
                "Continue",
            ),
            Screen::new(
                "1-1-definition",
                ScreenKind::Content(ContentScreen {
                    title: Some("What Does AI Mean?".into()),
                    body: Some("Let's break down those big words:".into()),
                    bullet_points: strings(&[
                        "**Artificial** = Made by people (not natural)",
                        "**Intelligence** = The ability to learn and think",
                    ]),
                    tip: Some(
                        "So Artificial Intelligence means **smart technology made by people**!"
                            .into(),
                    ),
                    visual: Some(Visual::Animation {
                        steps: vec![
                            AnimationStep {
                                icon: "👨‍💻".into(),
                                label: "A person building".into(),
                            },
                            AnimationStep {
                                icon: "💡".into(),
                                label: "Intelligence".into(),
                            },
                            AnimationStep {
                                icon: "🤖".into(),
                                label: "AI!".into(),
                            },
                        ],
                    }),
                    button_text: Some("Continue".into()),
                    ..ContentScreen::default()
                }),
            )
            .with_mascot(MascotExpression::Explaining),
            Screen::new(
                "1-1-learning",
                ScreenKind::Content(ContentScreen {
                    title: Some("How AI Learns".into()),
                    body: Some(
                        "AI learns kind of like you do! After seeing LOTS of cats, your brain \
                         learned the pattern. People show AI THOUSANDS of examples, and it \
                         learns the patterns too."
                            .into(),
                    ),
                    visual: Some(Visual::Grid {
                        images: strings(&["🐱", "🐈", "😺", "🐈‍⬛", "😸", "😻"]),
                        result: "Now AI knows: CAT! 🐱".into(),
                    }),
                    button_text: Some("Continue".into()),
                    ..ContentScreen::default()
                }),
            )
            .with_mascot(MascotExpression::Thinking),
            Screen::new(
                "1-1-quiz-1",
                ScreenKind::Quiz(QuizScreen {
                    title: Some("Quick Check".into()),
                    intro: None,
                    questions: vec![QuizQuestion {
                        explanation: Some(
                            "AI is smart technology that people create to help with different tasks."
                                .into(),
                        ),
                        ..question(
                            "q1",
                            "What does \"Artificial Intelligence\" mean?",
                            vec![
                                opt("A robot from a movie", false, "Not quite! AI isn't just robots."),
                                opt(
                                    "Smart technology made by people",
                                    true,
                                    "That's right! Artificial = made by people, Intelligence = ability to learn and think.",
                                ),
                                opt("A really smart person", false, "Good guess, but AI refers to technology, not people!"),
                                opt("A type of video game", false, "AI is used IN video games, but it's not a game itself."),
                            ],
                        )
                    }],
                }),
            ),
            mascot_says(
                "1-1-not-magic",
                MascotExpression::Explaining,
                "Here's something really important to remember: AI is NOT magic!\n\n\
                 Real people, engineers and scientists, build AI. AI is a tool, just like a \
                 calculator. A really SMART tool, but still a tool!",
                "Continue",
            ),
            Screen::new(
                "1-1-sorting",
                ScreenKind::Sorting(SortingScreen {
                    title: "Is it AI? Let's find out!".into(),
                    instructions: "Put each item on the correct side. Is it powered by AI, or is it regular technology?".into(),
                    categories: vec![
                        category("ai", "Uses AI 🤖", "#3B82F6"),
                        category("not-ai", "No AI ❌", "#9CA3AF"),
                    ],
                    items: vec![
                        sort_item("siri", "🗣️ Siri answering your questions", "ai", "Siri uses AI to understand your voice and find answers!"),
                        sort_item("lightswitch", "💡 A light switch", "not-ai", "A light switch just turns electricity on or off, no learning needed!"),
                        sort_item("netflix", "🎬 Netflix suggesting shows", "ai", "Netflix AI learns what you like and suggests similar shows!"),
                        sort_item("toaster", "🍞 A toaster", "not-ai", "A toaster uses heat and a timer. It doesn't learn or think!"),
                        sort_item("faceid", "📷 Face ID unlocking your phone", "ai", "Face ID uses AI to recognize your unique face!"),
                        sort_item("calculator", "🔢 A basic calculator", "not-ai", "A calculator follows math rules but doesn't learn or adapt!"),
                    ],
                }),
            ),
            Screen::new(
                "1-1-discussion",
                ScreenKind::Discussion(DiscussionScreen {
                    title: "Chat with a grown-up!".into(),
                    intro: Some("Great learning deserves great conversations!".into()),
                    questions: strings(&[
                        "\"What AI do we use in our home?\"",
                        "\"Did you have AI when you were a kid?\"",
                        "\"What do you think is cool about AI?\"",
                    ]),
                    think_about: Some("What AI would you want to invent?".into()),
                }),
            ),
        ],
    }
    .validate()
}

fn ai_vs_humans() -> Result<Lesson, LessonError> {
    LessonDraft {
        id: "lesson-1-2".into(),
        module_id: "module-1".into(),
        title: "AI vs Humans".into(),
        subtitle: "What makes us different?".into(),
        duration: "10-12 minutes".into(),
        difficulty: Difficulty::Beginner,
        xp_reward: 60,
        badge_id: None,
        prerequisite: Some("lesson-1-1".into()),
        is_project_lesson: false,
        screens: vec![
            mascot_says(
                "1-2-intro",
                MascotExpression::Excited,
                "Now that you know what AI is, let's talk about how AI and humans are different!",
                "Continue",
            ),
            Screen::new(
                "1-2-comparison",
                ScreenKind::Content(ContentScreen {
                    title: Some("AI 🤖 vs Humans 🧑".into()),
                    visual: Some(Visual::Comparison {
                        left: ComparisonColumn {
                            title: "AI".into(),
                            items: strings(&["Never gets tired", "Super fast at math", "Finds patterns"]),
                        },
                        right: ComparisonColumn {
                            title: "Humans".into(),
                            items: strings(&["Has feelings & empathy", "Creative imagination", "Common sense"]),
                        },
                    }),
                    tip: Some("AI and humans are BOTH amazing, just at different things! That's why they work best TOGETHER.".into()),
                    button_text: Some("Continue".into()),
                    ..ContentScreen::default()
                }),
            )
            .with_mascot(MascotExpression::Thinking),
            Screen::new(
                "1-2-quiz",
                ScreenKind::Quiz(QuizScreen {
                    title: Some("Who Did It?".into()),
                    intro: Some("Let's play 'Who Did It?': was it AI or a human?".into()),
                    questions: vec![
                        question(
                            "q1",
                            "A doctor can tell a patient is scared about their surgery. This understanding of emotions came from:",
                            vec![
                                opt("AI", false, "Understanding fear and giving comfort is a human superpower!"),
                                opt("A human", true, "Right! Understanding emotions is something humans do best."),
                            ],
                        ),
                        question(
                            "q2",
                            "A computer looked through 10 million photos in 2 minutes to find all the dogs. This was done by:",
                            vec![
                                opt("AI", true, "Correct! Speed and pattern-finding are AI superpowers."),
                                opt("A human", false, "A human could do this, but it would take YEARS!"),
                            ],
                        ),
                        question(
                            "q3",
                            "Someone painted a dragon playing basketball on the moon. This creative idea came from:",
                            vec![
                                opt("AI", false, "AI can help make art, but the wild idea came from a human imagination!"),
                                opt("A human", true, "Yes! Brand-new creative ideas are a human superpower."),
                            ],
                        ),
                    ],
                }),
            ),
            Screen::new(
                "1-2-sorting",
                ScreenKind::Sorting(SortingScreen {
                    title: "Who's better at this?".into(),
                    instructions: "Put each item with who does it better!".into(),
                    categories: vec![
                        category("ai-better", "AI Does This Better 🤖", "#3B82F6"),
                        category("human-better", "Humans Do This Better 🧑", "#EC4899"),
                    ],
                    items: vec![
                        sort_item("counting", "Counting to a million", "ai-better", "AI can count to any number instantly without mistakes!"),
                        sort_item("hug", "Giving a comforting hug", "human-better", "Hugs need human warmth and understanding of feelings!"),
                        sort_item("translate", "Translating 100 languages", "ai-better", "AI can know hundreds of languages at once!"),
                        sort_item("friend", "Being a true friend", "human-better", "Real friendship needs human connection and care."),
                    ],
                }),
            ),
            Screen::new(
                "1-2-complete",
                ScreenKind::Celebration(CelebrationScreen {
                    title: "You're crushing it! 🎉".into(),
                    message: "Now you understand:".into(),
                    achievements: strings(&[
                        "AI is great at speed, math, and patterns",
                        "Humans are great at creativity, emotions, and common sense",
                        "AI and humans work best together",
                    ]),
                    xp_earned: Some(60),
                    badge_earned: None,
                    next_lesson_id: Some("lesson-1-3".into()),
                    is_module_complete: false,
                }),
            ),
            Screen::new(
                "1-2-discussion",
                ScreenKind::Discussion(DiscussionScreen {
                    title: "Chat with a grown-up!".into(),
                    intro: None,
                    questions: strings(&[
                        "\"What's something you do that AI could never do?\"",
                        "\"Would you want a robot friend? Why or why not?\"",
                    ]),
                    think_about: Some("If you could teach an AI one thing, what would it be?".into()),
                }),
            ),
        ],
    }
    .validate()
}

fn ai_detective() -> Result<Lesson, LessonError> {
    LessonDraft {
        id: "lesson-1-3".into(),
        module_id: "module-1".into(),
        title: "AI Detective".into(),
        subtitle: "Find AI in the wild!".into(),
        duration: "12-15 minutes".into(),
        difficulty: Difficulty::Beginner,
        xp_reward: 75,
        badge_id: Some("ai-detective".into()),
        prerequisite: Some("lesson-1-2".into()),
        is_project_lesson: true,
        screens: vec![
            mascot_says(
                "1-3-mission",
                MascotExpression::Excited,
                "Agent, welcome to your first AI mission! 🕵️\n\nYour task: find AI hiding in \
                 plain sight, in your own home!",
                "Accept Mission",
            ),
            Screen::new(
                "1-3-hunt",
                ScreenKind::Scavenger(ScavengerScreen {
                    title: "AI Detective Challenge".into(),
                    instructions: "Find at least 5 examples of AI in or around your home. For each one, describe what you found!".into(),
                    min_items_to_complete: 5,
                    items: vec![
                        hunt_item("voice", "🗣️ Find something you can TALK to", "It might answer your questions or play music when you ask!", &["Alexa", "Siri", "smart speaker"]),
                        hunt_item("suggest", "🎬 Find something that SUGGESTS things for you", "Think about apps that recommend videos, songs, or shows!", &["Netflix", "YouTube", "Spotify"]),
                        hunt_item("recognize", "📷 Find something that RECOGNIZES faces or objects", "Does anything unlock when it sees you?", &["Face ID", "doorbell camera"]),
                        hunt_item("type", "⌨️ Find something that PREDICTS what you'll type", "Watch the keyboard on a phone or tablet!", &["autocorrect", "predictive text"]),
                        hunt_item("game", "🎮 Find a game where the computer plays against you", "The computer opponent that gets harder is using AI!", &["chess app", "video game NPCs"]),
                        hunt_item("bonus", "⭐ BONUS: Find AI somewhere surprising!", "AI is in cars, refrigerators, and places you might not expect!", &["car navigation", "robot vacuum"]),
                    ],
                }),
            ),
            Screen::new(
                "1-3-reflection",
                ScreenKind::Reflection(ReflectionScreen {
                    title: "Think About It".into(),
                    mascot_message: Some("You've become a real AI Detective!".into()),
                    prompt: "What surprised you most about where you found AI?".into(),
                    placeholder: Some("Type your thoughts here...".into()),
                }),
            ),
            Screen::new(
                "1-3-module-complete",
                ScreenKind::Celebration(CelebrationScreen {
                    title: "🎉 MODULE 1 COMPLETE!".into(),
                    message: "AI All Around Us ✓\n\nYou've learned:".into(),
                    achievements: strings(&[
                        "What AI means (smart tech made by people)",
                        "How AI learns (from lots of examples)",
                        "How to spot AI in the real world",
                    ]),
                    xp_earned: Some(75),
                    badge_earned: Some("AI Detective".into()),
                    next_lesson_id: Some("lesson-2-1".into()),
                    is_module_complete: true,
                }),
            ),
        ],
    }
    .validate()
}
