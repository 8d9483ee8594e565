use std::io;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{CommandFactory, Parser};
use clap_complete::generate;
use colored::Colorize;
use tracing::debug;
use tracing_subscriber::EnvFilter;

use goalcat_core::{
    Category, Classifier, Config, DetectionResult, Explanation, GoalcatError, Lexicon, MatchKind,
    Result, ScoringParams,
};

mod args;
use args::{Cli, Commands, ConfigAction, LexiconAction, Shell};

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose, cli.quiet);

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{} {}", "[ERROR]".red().bold(), e);
            ExitCode::from(e.exit_code() as u8)
        }
    }
}

/// `RUST_LOG` wins; otherwise `--verbose` / `--quiet` pick the level
fn init_tracing(verbose: bool, quiet: bool) {
    let level = if quiet {
        "error"
    } else if verbose {
        "debug"
    } else {
        "warn"
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(format!("goalcat={level},goalcat_core={level}"))
    });

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(io::stderr)
        .init();
}

fn run(cli: Cli) -> Result<()> {
    run_with(cli, Config::default_dir)
}

/// `default_dir` is only consulted by subcommands that read the config
fn run_with(cli: Cli, default_dir: fn() -> Result<PathBuf>) -> Result<()> {
    let Cli {
        config_dir,
        lexicon,
        command,
        ..
    } = cli;

    match command {
        Some(Commands::Classify {
            title,
            description,
            time,
            json,
        }) => {
            let config_dir = resolve_config_dir(config_dir, default_dir)?;
            let classifier = load_classifier(&config_dir, lexicon)?;
            let result = classifier.classify(&title, description.as_deref(), time.as_deref());
            print_result(result, json)
        }
        Some(Commands::Explain {
            title,
            description,
            time,
            json,
        }) => {
            let config_dir = resolve_config_dir(config_dir, default_dir)?;
            let classifier = load_classifier(&config_dir, lexicon)?;
            let explanation = classifier.explain(&title, description.as_deref(), time.as_deref());
            if json {
                print_json(&explanation)
            } else {
                print_explanation(&explanation);
                Ok(())
            }
        }
        Some(Commands::Lexicon { action }) => {
            handle_lexicon(action, config_dir, default_dir, lexicon)
        }
        Some(Commands::Taxonomy) => {
            handle_taxonomy();
            Ok(())
        }
        Some(Commands::Config { action }) => {
            let config_dir = resolve_config_dir(config_dir, default_dir)?;
            handle_config(action, &config_dir)
        }
        Some(Commands::Completions { shell }) => {
            handle_completions(shell);
            Ok(())
        }
        None => {
            Cli::command().print_help().ok();
            Ok(())
        }
    }
}

fn resolve_config_dir(
    cli_dir: Option<PathBuf>,
    default_dir: fn() -> Result<PathBuf>,
) -> Result<PathBuf> {
    let dir = match cli_dir {
        Some(dir) => dir,
        None => match std::env::var("GOALCAT_HOME") {
            Ok(dir) => PathBuf::from(dir),
            Err(_) => default_dir()?,
        },
    };
    debug!(dir = %dir.display(), "using config directory");
    Ok(dir)
}

fn load_classifier(config_dir: &Path, lexicon: Option<PathBuf>) -> Result<Classifier> {
    let mut config = Config::load(config_dir)?;
    if lexicon.is_some() {
        config.lexicon.path = lexicon;
    }
    Classifier::from_config(&config)
}

fn print_json<T: serde::Serialize>(value: &T) -> Result<()> {
    let json = serde_json::to_string_pretty(value).map_err(io::Error::from)?;
    println!("{}", json);
    Ok(())
}

fn print_result(result: Option<DetectionResult>, json: bool) -> Result<()> {
    if json {
        return print_json(&result);
    }

    match result {
        Some(result) => println!("{}", result.to_string().green().bold()),
        None => println!("{}", "No category detected".yellow()),
    }
    Ok(())
}

fn print_explanation(explanation: &Explanation) {
    println!();
    match explanation.result {
        Some(result) => println!("{} {}", "Result:".bold(), result.to_string().green().bold()),
        None => println!("{} {}", "Result:".bold(), "none".yellow()),
    }
    if explanation.decided_by_time_slot {
        println!("  {}", "(decided by time slot)".dimmed());
    }

    println!();
    println!("{}", "Matches:".bold());
    if explanation.matches.is_empty() {
        println!("  {}", "(none)".dimmed());
    }
    for m in &explanation.matches {
        let kind = match m.kind {
            MatchKind::Phrase => "phrase",
            MatchKind::Word => "word",
        };
        let target = match m.subcategory {
            Some(sub) => format!("{}/{}", m.category, sub),
            None => m.category.to_string(),
        };
        println!(
            "  {:<28} {:<7} {:<36} {:+.2}",
            m.pattern.cyan(),
            kind.dimmed(),
            target,
            m.points
        );
    }

    if !explanation.fired_rules.is_empty() {
        println!();
        println!("{}", "Context rules:".bold());
        for rule in &explanation.fired_rules {
            println!("  {}", rule);
        }
    }

    if explanation.time_bonus {
        println!();
        println!("{} gym-hour sport bonus", "Time slot:".bold());
    }

    if !explanation.penalties.is_empty() {
        println!();
        println!("{}", "Penalties:".bold());
        for penalty in &explanation.penalties {
            println!("  {}", penalty);
        }
    }

    println!();
    println!("{}", "Scores:".bold());
    for score in explanation.scores.iter().filter(|s| s.score != 0.0) {
        let subs: Vec<String> = score
            .subscores
            .iter()
            .map(|(sub, value)| format!("{}={:.2}", sub, value))
            .collect();
        println!(
            "  {:<22} {:>6.2}  {}",
            score.category.to_string(),
            score.score,
            subs.join(" ").dimmed()
        );
    }
    println!();
}

fn handle_lexicon(
    action: LexiconAction,
    config_dir: Option<PathBuf>,
    default_dir: fn() -> Result<PathBuf>,
    override_path: Option<PathBuf>,
) -> Result<()> {
    let check = matches!(action, LexiconAction::Check { .. });
    let (LexiconAction::Check { path } | LexiconAction::Stats { path }) = action;
    // an explicit file never needs the config directory
    let path = match path.or(override_path) {
        Some(p) => Some(p),
        None => {
            let config_dir = resolve_config_dir(config_dir, default_dir)?;
            Config::load(&config_dir)?.lexicon.path
        }
    };
    let lexicon = match &path {
        Some(p) => Lexicon::load(p)?,
        None => Lexicon::builtin()?,
    };
    let source = path
        .as_ref()
        .map(|p| p.display().to_string())
        .unwrap_or_else(|| "built-in lexicon".to_string());

    let stats = lexicon.stats();
    if check {
        println!(
            "{} {} ({} entries)",
            "OK:".green().bold(),
            source,
            stats.entries
        );
        return Ok(());
    }

    println!();
    println!("{} {}", "Lexicon:".bold(), source);
    if let Some(version) = lexicon.version() {
        println!("{} {}", "Version:".bold(), version);
    }
    println!(
        "{} {} ({} phrases, {} words)",
        "Entries:".bold(),
        stats.entries,
        stats.phrases,
        stats.words
    );
    println!();
    for (category, count) in &stats.per_category {
        println!("  {:<22} {:>5}", category.to_string().cyan(), count);
    }
    println!();
    Ok(())
}

fn handle_taxonomy() {
    println!();
    for category in Category::ALL {
        println!(
            "{} {}",
            category.as_str().cyan().bold(),
            format!("({})", category.label()).dimmed()
        );
        println!("  {}", category.subcategory_names().join(", "));
    }
    println!();
}

fn handle_config(action: ConfigAction, config_dir: &Path) -> Result<()> {
    match action {
        ConfigAction::Get { key } => {
            let config = Config::load(config_dir)?;
            match config.get(&key) {
                Some(value) => {
                    println!("{}", value);
                }
                None => {
                    return Err(GoalcatError::ConfigKeyNotFound { key });
                }
            }
        }
        ConfigAction::Set { key, value } => {
            let mut config = Config::load(config_dir)?;
            config.set(&key, &value)?;
            config.save(config_dir)?;
            println!("{} {} = {}", "Set:".green(), key, value);
        }
        ConfigAction::List => {
            let config = Config::load(config_dir)?;
            println!();
            for (key, value) in config.list() {
                println!("{} = {}", key.cyan(), config_value_display(&key, &value));
            }
            println!();
        }
        ConfigAction::Path => {
            let path = Config::path(config_dir);
            println!("{}", path.display());
        }
        ConfigAction::Init => {
            let path = Config::init(config_dir)?;
            println!("{} {}", "Initialized:".green(), path.display());
        }
    }

    Ok(())
}

/// Dims built-in sources, flags data files that do not exist and shows the
/// shipped default next to a changed scoring parameter.
fn config_value_display(key: &str, value: &str) -> String {
    if value == "(builtin)" {
        return value.dimmed().to_string();
    }
    if key.ends_with(".path") {
        return if Path::new(value).is_file() {
            value.to_string()
        } else {
            format!("{} {}", value, "(missing)".yellow())
        };
    }

    let default = key
        .strip_prefix("scoring.")
        .and_then(|param| ScoringParams::default().get(param));
    match default {
        Some(default) if value.parse::<f64>().ok() != Some(default) => {
            format!("{} {}", value, format!("(default {})", default).dimmed())
        }
        _ => value.to_string(),
    }
}

fn handle_completions(shell: Shell) {
    let mut cmd = Cli::command();
    let shell = match shell {
        Shell::Bash => clap_complete::Shell::Bash,
        Shell::Zsh => clap_complete::Shell::Zsh,
        Shell::Fish => clap_complete::Shell::Fish,
        Shell::PowerShell => clap_complete::Shell::PowerShell,
        Shell::Elvish => clap_complete::Shell::Elvish,
    };
    generate(shell, &mut cmd, "goalcat", &mut io::stdout());
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn no_home() -> Result<PathBuf> {
        Err(GoalcatError::HomeNotFound)
    }

    fn parse(args: &[&str]) -> Cli {
        Cli::try_parse_from(args).unwrap()
    }

    #[test]
    fn test_taxonomy_and_completions_work_without_home() {
        assert!(run_with(parse(&["goalcat", "taxonomy"]), no_home).is_ok());
        assert!(run_with(parse(&["goalcat", "completions", "bash"]), no_home).is_ok());
    }

    #[test]
    fn test_lexicon_check_with_explicit_file_works_without_home() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("lexicon.toml");
        std::fs::write(
            &path,
            "version = \"1\"\n\n[[group]]\ncategory = \"health\"\nsubcategory = \"sport\"\npatterns = [[\"gym\", 0.9]]\n",
        )
        .unwrap();

        let path = path.to_string_lossy().to_string();
        assert!(run_with(parse(&["goalcat", "lexicon", "check", path.as_str()]), no_home).is_ok());
    }

    #[test]
    fn test_config_commands_still_need_a_directory() {
        if std::env::var_os("GOALCAT_HOME").is_some() {
            return;
        }
        let err = run_with(parse(&["goalcat", "config", "list"]), no_home).unwrap_err();
        assert!(matches!(err, GoalcatError::HomeNotFound));

        let temp = TempDir::new().unwrap();
        let dir = temp.path().to_string_lossy().to_string();
        assert!(run_with(parse(&["goalcat", "config", "list", "--config-dir", dir.as_str()]), no_home).is_ok());
    }

    #[test]
    fn test_config_value_display() {
        let temp = TempDir::new().unwrap();
        let existing = temp.path().join("lexicon.toml");
        std::fs::write(&existing, "").unwrap();
        let existing = existing.to_string_lossy().to_string();
        let missing = temp.path().join("nope.toml").to_string_lossy().to_string();

        colored::control::set_override(false);
        assert_eq!(config_value_display("lexicon.path", "(builtin)"), "(builtin)");
        assert_eq!(config_value_display("lexicon.path", &existing), existing);
        assert_eq!(
            config_value_display("rules.path", &missing),
            format!("{} (missing)", missing)
        );
        assert_eq!(config_value_display("scoring.confidence_floor", "0.5"), "0.5");
        assert_eq!(
            config_value_display("scoring.confidence_floor", "0.6"),
            "0.6 (default 0.5)"
        );

        colored::control::set_override(true);
        assert!(config_value_display("rules.path", "(builtin)").contains("\x1b[2m"));
        colored::control::unset_override();
    }
}
