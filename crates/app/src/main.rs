mod args;
mod play;

use std::io;

use lesson_core::model::LessonId;
use services::{AppServices, Clock, ProgressSummary};

use args::{Args, Command, prepare_sqlite_file, print_usage};

fn init_logging(level: &str) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        tracing_subscriber::EnvFilter::new(format!(
            "app={level},services={level},storage={level}"
        ))
    });

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(io::stderr)
        .init();
}

async fn list_lessons(app: &AppServices) -> Result<(), Box<dyn std::error::Error>> {
    for section in app.catalog().sections().await? {
        println!(
            "{}. {} ({}/{})",
            section.id,
            section.title,
            section.completed_count(),
            section.total()
        );
        for unit in &section.units {
            let mark = match (unit.completed, unit.has_content) {
                (true, _) => "x",
                (false, true) => " ",
                (false, false) => "-",
            };
            println!("   [{mark}] {}  {}", unit.lesson_id, unit.title);
        }
    }
    if let Some(next) = app.catalog().next_lesson().await? {
        println!("\nNext up: {next}");
    }
    Ok(())
}

fn print_summary(summary: &ProgressSummary) {
    let placement = if summary.placement_completed {
        "done"
    } else {
        "not taken"
    };
    println!("Level:        Lv.{} (placement {placement})", summary.level);
    println!("XP:           {}", summary.xp);
    println!("Streak:       {} day(s)", summary.streak);
    if let Some(day) = summary.last_practice {
        println!("Last practice: {day}");
    }
    println!("Lessons:      {}", summary.completed_lessons.len());
    println!("Words:        {}", summary.learned_words);
    if summary.achievements.is_empty() {
        println!("Achievements: none yet");
    } else {
        println!("Achievements: {}", summary.achievements.join(", "));
    }
}

async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let parsed = Args::parse(std::env::args().skip(1), |key| std::env::var(key).ok()).map_err(
        |e| {
            eprintln!("{e}");
            print_usage();
            e
        },
    )?;

    if parsed.command == Command::Help {
        print_usage();
        return Ok(());
    }

    init_logging(&parsed.log_level);

    // Open + migrate SQLite at startup.
    prepare_sqlite_file(&parsed.db_url)?;
    tracing::debug!(db = %parsed.db_url, seed = ?parsed.seed, "opening progress store");
    let app = AppServices::new_sqlite(&parsed.db_url, Clock::system(), parsed.seed).await?;

    let stdin = io::stdin();
    let mut input = stdin.lock();
    let mut out = io::stdout();

    match parsed.command {
        Command::Lessons => list_lessons(&app).await,
        Command::Play { lesson } => {
            let opened = lesson
                .parse::<LessonId>()
                .ok()
                .and_then(|id| app.lesson_loop().start_lesson_with_encouragement(&id));
            let Some((mut session, messages)) = opened else {
                eprintln!("no lesson content for {lesson}; try `app lessons`");
                return Ok(());
            };
            play::play_lesson(&mut session, &messages, &mut input, &mut out).await?;
            Ok(())
        }
        Command::Progress { json } => {
            let summary = app.progress().summary().await?;
            if json {
                println!("{}", serde_json::to_string_pretty(&summary)?);
            } else {
                print_summary(&summary);
            }
            Ok(())
        }
        Command::Placement => {
            let placement = app.placement();
            let Some(answers) = play::ask_placement(placement.test(), &mut input, &mut out)? else {
                return Ok(());
            };
            let result = placement.submit(&answers).await?;
            println!(
                "\nScore {}/{} -> {}",
                result.score, result.total, result.level
            );
            Ok(())
        }
        Command::Reset => {
            app.progress().reset().await?;
            println!("Progress cleared.");
            Ok(())
        }
        Command::Help => Ok(()),
    }
}

#[tokio::main]
async fn main() {
    if let Err(err) = run().await {
        eprintln!("{err}");
        std::process::exit(2);
    }
}
