use std::fmt;

pub const DEFAULT_DB_URL: &str = "sqlite://lessons.sqlite3";
pub const DEFAULT_LOG_LEVEL: &str = "warn";

#[derive(Debug, PartialEq, Eq)]
pub enum ArgsError {
    MissingValue { flag: &'static str },
    MissingLessonId,
    UnknownArg(String),
    UnknownCommand(String),
    InvalidSeed { raw: String },
    InvalidDbUrl { raw: String },
}

impl fmt::Display for ArgsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArgsError::MissingValue { flag } => write!(f, "{flag} requires a value"),
            ArgsError::MissingLessonId => write!(f, "play requires a lesson id like 1-1"),
            ArgsError::UnknownArg(arg) => write!(f, "unknown argument: {arg}"),
            ArgsError::UnknownCommand(cmd) => write!(f, "unknown subcommand: {cmd}"),
            ArgsError::InvalidSeed { raw } => write!(f, "invalid --seed value: {raw}"),
            ArgsError::InvalidDbUrl { raw } => write!(f, "invalid --db value: {raw}"),
        }
    }
}

impl std::error::Error for ArgsError {}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Lessons,
    Play { lesson: String },
    Progress { json: bool },
    Placement,
    Reset,
    Help,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Args {
    pub command: Command,
    pub db_url: String,
    pub log_level: String,
    pub seed: Option<u64>,
}

pub fn print_usage() {
    eprintln!("Usage:");
    eprintln!("  app lessons                 list sections and units");
    eprintln!("  app play <section-unit>     play a lesson, e.g. `app play 1-1`");
    eprintln!("  app progress [--json]       show xp, streak and achievements");
    eprintln!("  app placement               take the placement test");
    eprintln!("  app reset                   forget all progress");
    eprintln!();
    eprintln!("Options:");
    eprintln!("  --db <sqlite_url>           default {DEFAULT_DB_URL}");
    eprintln!("  --log-level <level>         default {DEFAULT_LOG_LEVEL}");
    eprintln!("  --seed <u64>                fixed shuffle seed");
    eprintln!();
    eprintln!("Environment:");
    eprintln!("  LESSON_DB_URL, LESSON_LOG, LESSON_SEED, RUST_LOG");
}

fn require_value(
    args: &mut impl Iterator<Item = String>,
    flag: &'static str,
) -> Result<String, ArgsError> {
    args.next().ok_or(ArgsError::MissingValue { flag })
}

fn parse_seed(raw: String) -> Result<u64, ArgsError> {
    raw.trim()
        .parse()
        .map_err(|_| ArgsError::InvalidSeed { raw })
}

impl Args {
    /// Parse process arguments with environment fallbacks.
    pub fn parse(
        args: impl IntoIterator<Item = String>,
        env: impl Fn(&str) -> Option<String>,
    ) -> Result<Self, ArgsError> {
        let mut db_url =
            env("LESSON_DB_URL").map_or_else(|| DEFAULT_DB_URL.into(), normalize_sqlite_url);
        let mut log_level = env("LESSON_LOG").unwrap_or_else(|| DEFAULT_LOG_LEVEL.into());
        let mut seed = env("LESSON_SEED").map(parse_seed).transpose()?;

        let mut command: Option<String> = None;
        let mut positional: Vec<String> = Vec::new();
        let mut json = false;

        let mut args = args.into_iter();
        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--db" => {
                    let value = require_value(&mut args, "--db")?;
                    if value.trim().is_empty() {
                        return Err(ArgsError::InvalidDbUrl { raw: value });
                    }
                    db_url = normalize_sqlite_url(value);
                }
                "--log-level" => log_level = require_value(&mut args, "--log-level")?,
                "--seed" => seed = Some(parse_seed(require_value(&mut args, "--seed")?)?),
                "--json" => json = true,
                "--help" | "-h" => command = Some("help".into()),
                flag if flag.starts_with("--") => return Err(ArgsError::UnknownArg(arg)),
                _ if command.is_none() => command = Some(arg),
                _ => positional.push(arg),
            }
        }

        let command = match command.as_deref() {
            None | Some("help") => Command::Help,
            Some("lessons") => Command::Lessons,
            Some("play") => {
                if positional.is_empty() {
                    return Err(ArgsError::MissingLessonId);
                }
                Command::Play {
                    lesson: positional.remove(0),
                }
            }
            Some("progress") => Command::Progress { json },
            Some("placement") => Command::Placement,
            Some("reset") => Command::Reset,
            Some(other) => return Err(ArgsError::UnknownCommand(other.to_string())),
        };
        if let Some(extra) = positional.into_iter().next() {
            return Err(ArgsError::UnknownArg(extra));
        }

        Ok(Self {
            command,
            db_url,
            log_level,
            seed,
        })
    }
}

pub fn normalize_sqlite_url(raw: String) -> String {
    if raw.starts_with("sqlite::memory:")
        || raw.starts_with("sqlite://")
        || raw.starts_with("sqlite:file:")
    {
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

/// Create the database file (and its directory) so `SQLite` can open it.
pub fn prepare_sqlite_file(db_url: &str) -> Result<(), Box<dyn std::error::Error>> {
    if db_url.starts_with("sqlite::memory:") || db_url.starts_with("sqlite:file:") {
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

#[cfg(test)]
mod tests {
    use super::*;

    fn no_env(_: &str) -> Option<String> {
        None
    }

    fn argv(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| (*s).to_string()).collect()
    }

    #[test]
    fn defaults_without_arguments() {
        let args = Args::parse(Vec::<String>::new(), no_env).unwrap();
        assert_eq!(args.command, Command::Help);
        assert_eq!(args.db_url, DEFAULT_DB_URL);
        assert_eq!(args.log_level, DEFAULT_LOG_LEVEL);
        assert_eq!(args.seed, None);
    }

    #[test]
    fn play_with_flags_in_any_order() {
        let args = Args::parse(
            argv(&["--seed", "7", "play", "2-1", "--db", "sqlite::memory:"]),
            no_env,
        )
        .unwrap();
        assert_eq!(
            args.command,
            Command::Play {
                lesson: "2-1".into()
            }
        );
        assert_eq!(args.seed, Some(7));
        assert_eq!(args.db_url, "sqlite::memory:");
    }

    #[test]
    fn environment_is_a_fallback() {
        let env = |key: &str| match key {
            "LESSON_DB_URL" => Some("sqlite::memory:".to_string()),
            "LESSON_SEED" => Some("11".to_string()),
            "LESSON_LOG" => Some("debug".to_string()),
            _ => None,
        };
        let args = Args::parse(argv(&["progress", "--json", "--seed", "3"]), env).unwrap();
        assert_eq!(args.command, Command::Progress { json: true });
        assert_eq!(args.db_url, "sqlite::memory:");
        assert_eq!(args.log_level, "debug");
        assert_eq!(args.seed, Some(3));
    }

    #[test]
    fn rejects_bad_input() {
        assert_eq!(
            Args::parse(argv(&["play"]), no_env),
            Err(ArgsError::MissingLessonId)
        );
        assert_eq!(
            Args::parse(argv(&["dance"]), no_env),
            Err(ArgsError::UnknownCommand("dance".into()))
        );
        assert_eq!(
            Args::parse(argv(&["lessons", "--seed", "x"]), no_env),
            Err(ArgsError::InvalidSeed { raw: "x".into() })
        );
        assert_eq!(
            Args::parse(argv(&["lessons", "--db"]), no_env),
            Err(ArgsError::MissingValue { flag: "--db" })
        );
        assert_eq!(
            Args::parse(argv(&["reset", "extra"]), no_env),
            Err(ArgsError::UnknownArg("extra".into()))
        );
    }

    #[test]
    fn relative_paths_become_absolute_urls() {
        let url = normalize_sqlite_url("sqlite:data/lessons.db".into());
        assert!(url.starts_with("sqlite:///"));
        assert!(url.ends_with("data/lessons.db"));
        assert_eq!(
            normalize_sqlite_url("sqlite://already.db".into()),
            "sqlite://already.db"
        );
    }
}
