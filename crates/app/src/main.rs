mod terminal;

use std::fmt;

use lesson_core::model::{ChildId, LessonId, LessonStatus};
use services::{AdvanceOutcome, AppServices, BackendConfig, Clock, SinkConfig};
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

use crate::terminal::Command as Input;

#[derive(Debug)]
enum ArgsError {
    MissingValue { flag: &'static str },
    MissingLessonId,
    UnknownArg(String),
    InvalidChildId { raw: String },
    InvalidDbUrl { raw: String },
    InvalidBackend { raw: String, reason: String },
}

impl fmt::Display for ArgsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArgsError::MissingValue { flag } => write!(f, "{flag} requires a value"),
            ArgsError::MissingLessonId => write!(f, "play requires a lesson id"),
            ArgsError::UnknownArg(arg) => write!(f, "unknown argument: {arg}"),
            ArgsError::InvalidChildId { raw } => write!(f, "invalid --child value: {raw}"),
            ArgsError::InvalidDbUrl { raw } => write!(f, "invalid --db value: {raw}"),
            ArgsError::InvalidBackend { raw, reason } => {
                write!(f, "invalid --backend value {raw}: {reason}")
            }
        }
    }
}

impl std::error::Error for ArgsError {}

fn require_value(
    args: &mut impl Iterator<Item = String>,
    flag: &'static str,
) -> Result<String, ArgsError> {
    args.next().ok_or(ArgsError::MissingValue { flag })
}

fn print_usage() {
    eprintln!("Usage:");
    eprintln!("  cargo run -p app -- lessons   [options]");
    eprintln!("  cargo run -p app -- play <lesson-id> [options]");
    eprintln!("  cargo run -p app -- progress  [options]");
    eprintln!();
    eprintln!("Options:");
    eprintln!("  --db <sqlite_url>      default sqlite://spark.sqlite3");
    eprintln!("  --child <uuid>         learner whose progress is read and written");
    eprintln!("  --backend <url>        post progress to the hosted backend instead of SQLite");
    eprintln!();
    eprintln!("Environment:");
    eprintln!("  SPARK_DB_URL, SPARK_BACKEND_URL, SPARK_BACKEND_KEY, SPARK_CHILD_ID, RUST_LOG");
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Command {
    Lessons,
    Play(LessonId),
    Progress,
}

struct Args {
    sink: SinkConfig,
}

impl Args {
    fn parse(
        args: &mut impl Iterator<Item = String>,
        mut sink: SinkConfig,
    ) -> Result<Self, ArgsError> {
        sink.db_url = normalize_sqlite_url(sink.db_url);

        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--db" => {
                    let value = require_value(args, "--db")?;
                    if value.trim().is_empty() {
                        return Err(ArgsError::InvalidDbUrl { raw: value });
                    }
                    sink.db_url = normalize_sqlite_url(value);
                }
                "--child" => {
                    let value = require_value(args, "--child")?;
                    let child = value
                        .parse::<ChildId>()
                        .map_err(|_| ArgsError::InvalidChildId { raw: value.clone() })?;
                    sink.child_id = Some(child);
                }
                "--backend" => {
                    let value = require_value(args, "--backend")?;
                    let key = sink
                        .backend
                        .as_ref()
                        .map(|b| b.api_key.clone())
                        .or_else(|| std::env::var("SPARK_BACKEND_KEY").ok())
                        .unwrap_or_default();
                    let backend = BackendConfig::parse(&value, key).map_err(|e| {
                        ArgsError::InvalidBackend {
                            raw: value.clone(),
                            reason: e.to_string(),
                        }
                    })?;
                    sink.backend = Some(backend);
                }
                "--help" | "-h" => {
                    print_usage();
                    std::process::exit(0);
                }
                _ => return Err(ArgsError::UnknownArg(arg)),
            }
        }

        Ok(Self { sink })
    }
}

fn parse_command(argv: &mut Vec<String>) -> Result<Command, ArgsError> {
    if argv.is_empty() || argv[0].starts_with("--") {
        return Ok(Command::Lessons);
    }
    let name = argv.remove(0);
    match name.as_str() {
        "lessons" => Ok(Command::Lessons),
        "progress" => Ok(Command::Progress),
        "play" => {
            if argv.is_empty() || argv[0].starts_with("--") {
                return Err(ArgsError::MissingLessonId);
            }
            Ok(Command::Play(LessonId::new(argv.remove(0).trim())))
        }
        _ => Err(ArgsError::UnknownArg(name)),
    }
}

fn normalize_sqlite_url(raw: String) -> String {
    if raw == "sqlite::memory:" || raw.starts_with("sqlite://") {
        return raw;
    }

    let trimmed = raw.trim().to_string();
    let path_str = trimmed
        .strip_prefix("sqlite:")
        .unwrap_or(trimmed.as_str())
        .to_string();
    let path = std::path::Path::new(&path_str);
    let absolute = if path.is_absolute() {
        path.to_path_buf()
    } else {
        std::env::current_dir()
            .unwrap_or_else(|_| std::path::PathBuf::from("."))
            .join(path)
    };
    format!("sqlite://{}", absolute.display())
}

fn prepare_sqlite_file(db_url: &str) -> Result<(), Box<dyn std::error::Error>> {
    if db_url == "sqlite::memory:" {
        return Ok(());
    }

    let path = db_url
        .strip_prefix("sqlite://")
        .ok_or_else(|| ArgsError::InvalidDbUrl {
            raw: db_url.to_string(),
        })?;
    let path = path.split('?').next().unwrap_or(path);
    if path.is_empty() {
        return Err(ArgsError::InvalidDbUrl {
            raw: db_url.to_string(),
        }
        .into());
    }

    let path = std::path::Path::new(path);
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    if !path.exists() {
        std::fs::OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(false)
            .open(path)?;
    }

    Ok(())
}

fn init_tracing() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "services=info,app=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let mut argv: Vec<String> = std::env::args().skip(1).collect();
    if matches!(argv.first().map(String::as_str), Some("--help" | "-h")) {
        print_usage();
        return Ok(());
    }

    let sink = SinkConfig::from_env()?;
    let parsed = parse_command(&mut argv)
        .and_then(|cmd| Args::parse(&mut argv.into_iter(), sink).map(|args| (cmd, args)));
    let (cmd, args) = parsed.map_err(|e| {
        eprintln!("{e}");
        print_usage();
        e
    })?;

    if args.sink.backend.is_none() {
        prepare_sqlite_file(&args.sink.db_url)?;
    }
    let services = AppServices::from_config(&args.sink, Clock::default_clock()).await?;
    let child = args.sink.child_id.unwrap_or_else(|| {
        let child = ChildId::random();
        tracing::warn!(%child, "no child id configured; using a throwaway profile");
        child
    });

    match cmd {
        Command::Lessons => list_lessons(&services, child).await?,
        Command::Progress => show_progress(&services, child).await?,
        Command::Play(id) => play(&services, child, &id).await?,
    }

    let written = services.outbox().flush().await?;
    tracing::debug!(written, "progress outbox flushed");
    Ok(())
}

async fn list_lessons(
    services: &AppServices,
    child: ChildId,
) -> Result<(), Box<dyn std::error::Error>> {
    let progress = services.progress();
    for lesson in services.catalog().lessons() {
        let status = progress
            .progress_for_lesson(child, lesson.id())
            .await?
            .map_or(LessonStatus::NotStarted, |p| p.status);
        let mark = match status {
            LessonStatus::Completed => "x",
            LessonStatus::InProgress => "~",
            LessonStatus::NotStarted => " ",
        };
        println!(
            "[{mark}] {:<12} {} ({}, {} XP)",
            lesson.id().as_str(),
            lesson.title(),
            lesson.duration(),
            lesson.xp_reward()
        );
    }
    Ok(())
}

async fn show_progress(
    services: &AppServices,
    child: ChildId,
) -> Result<(), Box<dyn std::error::Error>> {
    let summary = services.progress().summary(child).await?;
    println!("Lessons completed: {}", summary.completed_lessons.len());
    println!("XP: {}", summary.total_xp);
    println!("Total score: {}", summary.total_score);
    println!("Time spent: {}s", summary.total_time_spent_seconds);
    if let Some(streak) = &summary.streak {
        println!(
            "Streak: {} day(s), longest {}",
            streak.current_streak, streak.longest_streak
        );
    }
    for achievement in &summary.achievements {
        println!("  * {}", achievement.kind.title());
    }
    Ok(())
}

async fn play(
    services: &AppServices,
    child: ChildId,
    id: &LessonId,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut player = services.start_lesson(id, child)?.on_complete(|completion| {
        println!(
            "\nLesson complete! +{} XP, score {}%",
            completion.xp_awarded, completion.score
        );
        if let Some(badge) = &completion.badge {
            println!("Badge earned: {badge}");
        }
    });

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut stdout = tokio::io::stdout();

    while let Some(view) = player.view() {
        let session = player.session();
        let screen =
            terminal::render_screen(&view, session.current_index(), session.screen_count());
        stdout.write_all(screen.as_bytes()).await?;
        stdout.write_all(b"> ").await?;
        stdout.flush().await?;

        let Some(line) = lines.next_line().await? else {
            break;
        };
        match terminal::parse_command(&view, &line) {
            Input::Continue => match player.advance() {
                AdvanceOutcome::Blocked => println!("{}", view.button.label),
                AdvanceOutcome::Advanced { .. } => {}
                AdvanceOutcome::Finished(_) | AdvanceOutcome::AlreadyFinished => break,
            },
            Input::Input(input) => {
                if let Some(message) = terminal::describe_feedback(&player.apply(input)) {
                    println!("{message}");
                }
            }
            Input::Help => println!("{}", terminal::HELP),
            Input::Invalid(hint) => println!("{hint} (type ? for help)"),
            Input::Quit => break,
        }
    }
    Ok(())
}

#[tokio::main]
async fn main() {
    init_tracing();
    if let Err(err) = run().await {
        eprintln!("{err}");
        std::process::exit(2);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn argv(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| (*s).to_owned()).collect()
    }

    #[test]
    fn play_takes_lesson_id() {
        let mut args = argv(&["play", "lesson-1-2", "--db", "sqlite::memory:"]);
        assert_eq!(
            parse_command(&mut args).unwrap(),
            Command::Play(LessonId::new("lesson-1-2"))
        );
        let parsed = Args::parse(&mut args.into_iter(), SinkConfig::default()).unwrap();
        assert_eq!(parsed.sink.db_url, "sqlite::memory:");
    }

    #[test]
    fn play_without_id_is_rejected() {
        let mut args = argv(&["play", "--db", "x"]);
        assert!(matches!(
            parse_command(&mut args),
            Err(ArgsError::MissingLessonId)
        ));
    }

    #[test]
    fn flags_override_config() {
        let mut args = argv(&[
            "--child",
            "67e55044-10b1-426f-9247-bb680e5fe0c8",
            "--backend",
            "https://spark.example",
        ])
        .into_iter();
        let parsed = Args::parse(&mut args, SinkConfig::default()).unwrap();
        assert!(parsed.sink.child_id.is_some());
        assert_eq!(
            parsed.sink.backend.unwrap().base_url.as_str(),
            "https://spark.example/"
        );
    }

    #[test]
    fn bad_child_id_is_reported() {
        let mut args = argv(&["--child", "kid"]).into_iter();
        let err = Args::parse(&mut args, SinkConfig::default()).err().unwrap();
        assert_eq!(err.to_string(), "invalid --child value: kid");
    }

    #[test]
    fn relative_sqlite_paths_become_absolute() {
        let url = normalize_sqlite_url("sqlite:data/spark.sqlite3".into());
        assert!(url.starts_with("sqlite:///"));
        assert!(url.ends_with("data/spark.sqlite3"));
    }
}
