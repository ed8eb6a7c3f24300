use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use dioxus::LaunchBuilder;
use dioxus::desktop::{Config as DesktopConfig, WindowBuilder};
use imagier_core::model::{LearningContext, Level, QuizReloadPolicy};
use imagier_core::time::Clock;
use services::{TutorConfig, TutorService};
use ui::{App, UiApp, build_app_context};

#[derive(Debug)]
enum ArgsError {
    MissingValue { flag: &'static str },
    UnknownArg(String),
    InvalidApiBase { raw: String },
    InvalidLevel { raw: String },
}

impl fmt::Display for ArgsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArgsError::MissingValue { flag } => write!(f, "{flag} requires a value"),
            ArgsError::UnknownArg(arg) => write!(f, "unknown argument: {arg}"),
            ArgsError::InvalidApiBase { raw } => write!(f, "invalid --api-base value: {raw}"),
            ArgsError::InvalidLevel { raw } => {
                write!(f, "invalid --level value: {raw} (beginner|intermediate|advanced)")
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

struct DesktopApp {
    tutor: Arc<TutorService>,
    level: Level,
    quiz_reload_policy: QuizReloadPolicy,
}

impl UiApp for DesktopApp {
    fn tutor(&self) -> Arc<TutorService> {
        Arc::clone(&self.tutor)
    }

    fn clock(&self) -> Clock {
        Clock::default_clock()
    }

    fn learning_context(&self) -> LearningContext {
        LearningContext {
            learning_french: true,
            level: self.level,
        }
    }

    fn quiz_reload_policy(&self) -> QuizReloadPolicy {
        self.quiz_reload_policy
    }
}

struct Args {
    api_base: String,
    level: Level,
    cache_quiz: bool,
}

fn print_usage() {
    eprintln!("Usage:");
    eprintln!("  cargo run -p app -- [--api-base <url>] [--level <level>] [--cache-quiz]");
    eprintln!();
    eprintln!("Defaults:");
    eprintln!("  --api-base http://localhost:5000");
    eprintln!("  --level    beginner");
    eprintln!();
    eprintln!("Environment:");
    eprintln!("  IMAGIER_API_BASE_URL, IMAGIER_LEVEL");
}

impl Args {
    fn parse(args: &mut impl Iterator<Item = String>) -> Result<Self, ArgsError> {
        let mut api_base = TutorConfig::from_env().base_url;
        let mut level = std::env::var("IMAGIER_LEVEL")
            .ok()
            .and_then(|value| Level::from_str(&value).ok())
            .unwrap_or_default();
        let mut cache_quiz = false;

        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--api-base" => {
                    let value = require_value(args, "--api-base")?;
                    if value.trim().is_empty() {
                        return Err(ArgsError::InvalidApiBase { raw: value });
                    }
                    api_base = value;
                }
                "--level" => {
                    let value = require_value(args, "--level")?;
                    level = Level::from_str(&value)
                        .map_err(|_| ArgsError::InvalidLevel { raw: value.clone() })?;
                }
                "--cache-quiz" => cache_quiz = true,
                "--help" | "-h" => {
                    print_usage();
                    std::process::exit(0);
                }
                _ => return Err(ArgsError::UnknownArg(arg)),
            }
        }

        Ok(Self {
            api_base,
            level,
            cache_quiz,
        })
    }
}

async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let mut iter = std::env::args().skip(1);
    let parsed = Args::parse(&mut iter).map_err(|e| {
        eprintln!("{e}");
        print_usage();
        e
    })?;

    let tutor = Arc::new(TutorService::new(TutorConfig::new(&parsed.api_base)));
    let quiz_reload_policy = if parsed.cache_quiz {
        QuizReloadPolicy::CachePerWord
    } else {
        QuizReloadPolicy::AlwaysReload
    };

    let app: Arc<dyn UiApp> = Arc::new(DesktopApp {
        tutor,
        level: parsed.level,
        quiz_reload_policy,
    });
    let context = build_app_context(&app);

    // On macOS, Dioxus/tao can default to an always-on-top window in some dev setups.
    // Explicitly disable it so the app doesn't behave like a modal window.
    let desktop_cfg = DesktopConfig::new().with_window(
        WindowBuilder::new()
            .with_title("Imagier")
            .with_always_on_top(false),
    );

    LaunchBuilder::desktop()
        .with_cfg(desktop_cfg)
        .with_context(context)
        .launch(App);
    Ok(())
}

#[tokio::main]
async fn main() {
    if let Err(err) = run().await {
        // At this layer (binary glue), printing once is fine.
        eprintln!("{err}");
        std::process::exit(2);
    }
}
