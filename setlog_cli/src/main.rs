use chrono::Utc;
use clap::{Parser, Subcommand};
use setlog_core::*;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "setlog")]
#[command(about = "Workout session tracker and reconciler", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Override data directory
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    /// Show weights in pounds, overriding the configured unit
    #[arg(long, global = true, conflicts_with = "metric")]
    imperial: bool,

    /// Show weights in kilograms, overriding the configured unit
    #[arg(long, global = true)]
    metric: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Show today's workout and progress (default)
    Show {
        /// Day to show (defaults to the current weekday)
        #[arg(long)]
        day: Option<String>,
    },

    /// Work through a session: start/complete/edit sets, then save
    Log {
        /// Day to log (defaults to the current weekday)
        #[arg(long)]
        day: Option<String>,

        /// Complete every pending set and save without prompting (for testing)
        #[arg(long)]
        auto_complete: bool,
    },
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    setlog_core::logging::init();

    let cli = Cli::parse();

    let config = Config::load()?;
    let data_dir = cli.data_dir.unwrap_or_else(|| config.data.data_dir.clone());
    let use_metric = if cli.metric {
        true
    } else if cli.imperial {
        false
    } else {
        config.display.use_metric
    };

    match cli.command {
        Some(Commands::Show { day }) => cmd_show(data_dir, day, use_metric),
        Some(Commands::Log { day, auto_complete }) => {
            cmd_log(data_dir, day, auto_complete, use_metric).await
        }
        None => cmd_show(data_dir, None, use_metric),
    }
}

fn default_day() -> String {
    Utc::now().format("%A").to_string().to_lowercase()
}

/// Load the plan file and build the day's workout view.
///
/// A missing or unreadable plan degrades to the stub workout rather than
/// failing the command.
fn load_workout(data_dir: &Path, day: &str) -> WorkoutView {
    let plan_path = data_dir.join("plan.json");

    let contents = match std::fs::read_to_string(&plan_path) {
        Ok(contents) => contents,
        Err(e) => {
            tracing::warn!("Unable to read plan at {:?}: {}. Using stub.", plan_path, e);
            return stub_workout(day);
        }
    };

    match serde_json::from_str::<WorkoutSource>(&contents) {
        Ok(source) => WorkoutView::from_source(&source, day),
        Err(e) => {
            tracing::warn!("Unable to parse plan at {:?}: {}. Using stub.", plan_path, e);
            stub_workout(day)
        }
    }
}

fn cmd_show(data_dir: PathBuf, day: Option<String>, use_metric: bool) -> Result<()> {
    let day = day.unwrap_or_else(default_day);
    let workout = load_workout(&data_dir, &day);
    display_workout(&workout, use_metric);
    Ok(())
}

async fn cmd_log(
    data_dir: PathBuf,
    day: Option<String>,
    auto_complete: bool,
    use_metric: bool,
) -> Result<()> {
    let day = day.unwrap_or_else(default_day);
    let mut workout = load_workout(&data_dir, &day);

    std::fs::create_dir_all(&data_dir)?;
    let store = JsonlStore::new(data_dir.join("performed.jsonl"));
    let notifier = StderrNotifier;

    if auto_complete {
        let now = Utc::now();
        for exercise in &mut workout.exercises {
            for set in &mut exercise.sets {
                set.start(now);
                set.complete(now);
            }
        }
        let outcome = save_workout(&mut workout, &store, &notifier, Utc::now()).await;
        if !outcome.is_full_success() {
            return Err(Error::Store("workout save failed".into()));
        }
        display_workout(&workout, use_metric);
        println!("\n✓ Workout saved!");
        return Ok(());
    }

    loop {
        display_workout(&workout, use_metric);

        match prompt_action()? {
            Action::Start(exercise, set) => {
                with_set(&mut workout, exercise, set, |s| {
                    s.start(Utc::now());
                });
            }
            Action::Complete(exercise, set) => {
                with_set(&mut workout, exercise, set, |s| {
                    s.complete(Utc::now());
                });
            }
            Action::EditReps(exercise, set, reps) => {
                with_set(&mut workout, exercise, set, |s| {
                    if !s.set_reps(reps) {
                        println!("Set is done; values are locked.");
                    }
                });
            }
            Action::EditWeight(exercise, set, weight_kg) => {
                with_set(&mut workout, exercise, set, |s| {
                    if !s.set_weight_kg(weight_kg) {
                        println!("Set is done; values are locked.");
                    }
                });
            }
            Action::Save => {
                let outcome = save_workout(&mut workout, &store, &notifier, Utc::now()).await;
                if outcome.is_full_success() && !outcome.saved.is_empty() {
                    println!("\n✓ Workout saved!");
                }
            }
            Action::Quit => {
                // Leave guard: confirm before discarding unsaved edits
                if workout.dirty() && !confirm_discard()? {
                    continue;
                }
                break;
            }
        }
    }

    Ok(())
}

fn with_set(workout: &mut WorkoutView, exercise: usize, set: usize, apply: impl FnOnce(&mut SetView)) {
    match workout
        .exercises
        .get_mut(exercise)
        .and_then(|e| e.sets.get_mut(set))
    {
        Some(s) => apply(s),
        None => println!("No such set: exercise {} set {}", exercise + 1, set + 1),
    }
}

fn display_workout(workout: &WorkoutView, use_metric: bool) {
    let progress = aggregate_progress(workout);

    println!("\n╭─────────────────────────────────────────╮");
    println!("│  {} — {}", workout.day.to_uppercase(), workout.category);
    println!("╰─────────────────────────────────────────╯");

    for (i, exercise) in workout.exercises.iter().enumerate() {
        println!("\n  [{}] {} ({:?})", i + 1, exercise.name, exercise.status());
        for set in &exercise.sets {
            let weight = set
                .weight_kg
                .map(|kg| units::display_weight(kg, use_metric))
                .unwrap_or_else(|| "—".into());
            let reps = set
                .reps
                .map(|r| r.to_string())
                .unwrap_or_else(|| "—".into());
            let marker = match set.status {
                SetStatus::Pending => " ",
                SetStatus::InProgress => ">",
                SetStatus::Done => "✓",
            };
            let edited = if set.is_save_eligible() { " *" } else { "" };
            println!(
                "    {} set {}: {} reps @ {}{}",
                marker, set.set_number, reps, weight, edited
            );
        }
    }

    println!(
        "\n  Progress: {}/{} sets ({}%)",
        progress.completed_sets, progress.total_sets, progress.percentage
    );
    if workout.dirty() {
        println!("  Unsaved changes");
    }
}

enum Action {
    Start(usize, usize),
    Complete(usize, usize),
    EditReps(usize, usize, u32),
    EditWeight(usize, usize, f64),
    Save,
    Quit,
}

fn prompt_action() -> Result<Action> {
    println!("─────────────────────────────────────────");
    println!("  s <ex> <set>        start set");
    println!("  c <ex> <set>        complete set");
    println!("  r <ex> <set> <n>    edit reps");
    println!("  w <ex> <set> <kg>   edit weight");
    println!("  v                   save");
    println!("  q                   quit");
    print!("> ");
    io::stdout().flush()?;

    let mut input = String::new();
    io::stdin().read_line(&mut input)?;
    let parts: Vec<&str> = input.trim().split_whitespace().collect();

    let indices = |a: &str, b: &str| -> Option<(usize, usize)> {
        let exercise: usize = a.parse().ok()?;
        let set: usize = b.parse().ok()?;
        Some((exercise.checked_sub(1)?, set.checked_sub(1)?))
    };

    let action = match parts.as_slice() {
        ["s", a, b] => indices(a, b).map(|(e, s)| Action::Start(e, s)),
        ["c", a, b] => indices(a, b).map(|(e, s)| Action::Complete(e, s)),
        ["r", a, b, n] => match (indices(a, b), n.parse::<u32>().ok()) {
            (Some((e, s)), Some(reps)) => Some(Action::EditReps(e, s, reps)),
            _ => None,
        },
        ["w", a, b, kg] => match (indices(a, b), kg.parse::<f64>().ok()) {
            (Some((e, s)), Some(weight)) => Some(Action::EditWeight(e, s, weight)),
            _ => None,
        },
        ["v"] => Some(Action::Save),
        ["q"] => Some(Action::Quit),
        [] => Some(Action::Quit),
        _ => None,
    };

    match action {
        Some(action) => Ok(action),
        None => {
            println!("Unrecognized command.");
            prompt_action()
        }
    }
}

fn confirm_discard() -> Result<bool> {
    print!("Unsaved changes will be lost. Quit anyway? [y/N] ");
    io::stdout().flush()?;

    let mut input = String::new();
    io::stdin().read_line(&mut input)?;
    Ok(input.trim().eq_ignore_ascii_case("y"))
}
