use clap::{Parser, Subcommand};
use std::io::{self, Read};
use std::path::{Path, PathBuf};
use workout_core::*;

#[derive(Parser)]
#[command(name = "wplan")]
#[command(about = "Workout plan parser and progress tracker", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Override data directory
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    /// Use this config file instead of the default location
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Log debug output to stderr
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Parse plan markdown and print the structured plan
    Parse {
        /// Markdown file, or '-' for stdin
        input: PathBuf,

        /// Print the plan as JSON
        #[arg(long)]
        json: bool,

        /// Report dropped lines on stderr
        #[arg(long)]
        diagnostics: bool,

        /// Keep '## ' headings that are not "Day N"
        #[arg(long)]
        keep_unlabeled_days: bool,
    },

    /// Parse plan markdown and save it for a user, replacing any previous plan
    Save {
        #[arg(long)]
        user: String,

        /// Markdown file, or '-' for stdin
        input: PathBuf,

        /// Profile (TOML) the plan was generated for
        #[arg(long)]
        profile: Option<PathBuf>,
    },

    /// Show a user's saved plan with progress
    Show {
        #[arg(long)]
        user: String,

        /// Print the saved plan as JSON
        #[arg(long)]
        json: bool,
    },

    /// Mark an exercise as done (or not done with --undo)
    Check {
        #[arg(long)]
        user: String,

        /// Day number, starting at 1
        #[arg(long)]
        day: usize,

        /// Exercise number within the day, starting at 1
        #[arg(long)]
        exercise: usize,

        /// Mark the exercise as not done
        #[arg(long)]
        undo: bool,
    },

    /// Clear all progress on a user's saved plan
    Reset {
        #[arg(long)]
        user: String,
    },

    /// Export a user's saved plan and progress to CSV
    Export {
        #[arg(long)]
        user: String,

        /// Output CSV file
        output: PathBuf,
    },

    /// Print the plan-generation prompt for a profile
    Prompt {
        /// Profile (TOML)
        #[arg(long)]
        profile: PathBuf,
    },

    /// Delete a user's saved plan
    Delete {
        #[arg(long)]
        user: String,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    workout_core::logging::init(cli.verbose);

    let mut config = match &cli.config {
        Some(path) => Config::load_from(path)?,
        None => Config::load()?,
    };
    if let Some(data_dir) = cli.data_dir {
        config.data.data_dir = data_dir;
    }
    let store = JsonPlanStore::new(config.data.plans_dir());

    match cli.command {
        Commands::Parse {
            input,
            json,
            diagnostics,
            keep_unlabeled_days,
        } => {
            let mut options = config.parser.clone();
            options.keep_unlabeled_days |= keep_unlabeled_days;
            cmd_parse(&input, json, diagnostics, &options)
        }
        Commands::Save {
            user,
            input,
            profile,
        } => cmd_save(&store, &user, &input, profile.as_deref(), &config.parser),
        Commands::Show { user, json } => cmd_show(&store, &user, json),
        Commands::Check {
            user,
            day,
            exercise,
            undo,
        } => cmd_check(&store, &user, day, exercise, !undo),
        Commands::Reset { user } => cmd_reset(&store, &user),
        Commands::Export { user, output } => cmd_export(&store, &user, &output),
        Commands::Prompt { profile } => cmd_prompt(&profile),
        Commands::Delete { user } => cmd_delete(&store, &user),
    }
}

fn cmd_parse(input: &Path, json: bool, diagnostics: bool, options: &ParseOptions) -> Result<()> {
    let markdown = read_markdown(input)?;
    let report = parse_report(&markdown, options);

    if diagnostics {
        for diagnostic in &report.diagnostics {
            eprintln!("warning: {}", diagnostic);
        }
    }

    if json {
        println!("{}", serde_json::to_string_pretty(&report.plan)?);
    } else {
        print_plan(&report.plan, None);
    }
    Ok(())
}

fn cmd_save(
    store: &JsonPlanStore,
    user: &str,
    input: &Path,
    profile: Option<&Path>,
    options: &ParseOptions,
) -> Result<()> {
    let profile = profile.map(UserProfile::load_from).transpose()?;
    let markdown = read_markdown(input)?;
    let plan = parse_with(&markdown, options);

    if plan.days.is_empty() {
        eprintln!("Warning: no workout days found in {}", input.display());
    }

    let saved = SavedPlan::new(plan, profile);
    store.save(user, &saved)?;

    println!(
        "✓ Saved \"{}\" ({} days, {} exercises)",
        saved.plan.title,
        saved.plan.days.len(),
        saved.plan.exercise_count()
    );
    Ok(())
}

fn cmd_show(store: &JsonPlanStore, user: &str, json: bool) -> Result<()> {
    let saved = load_saved(store, user)?;
    if json {
        println!("{}", serde_json::to_string_pretty(&saved)?);
    } else {
        print_plan(&saved.plan, Some(&saved));
    }
    Ok(())
}

fn cmd_check(
    store: &JsonPlanStore,
    user: &str,
    day: usize,
    exercise: usize,
    completed: bool,
) -> Result<()> {
    let day_index = to_index("day", day)?;
    let exercise_index = to_index("exercise", exercise)?;

    let saved = store.update(user, |saved| {
        saved.set_completed(day_index, exercise_index, completed)
    })?;

    let day = &saved.plan.days[day_index];
    let verb = if completed { "done" } else { "not done" };
    println!(
        "✓ Marked {} / {} as {}",
        day.day, day.exercises[exercise_index].name, verb
    );
    print_progress(&saved.progress());
    Ok(())
}

fn cmd_reset(store: &JsonPlanStore, user: &str) -> Result<()> {
    let saved = store.update(user, |saved| {
        saved.reset_progress();
        Ok(())
    })?;
    println!("✓ Progress cleared for \"{}\"", saved.plan.title);
    Ok(())
}

fn cmd_export(store: &JsonPlanStore, user: &str, output: &Path) -> Result<()> {
    let saved = load_saved(store, user)?;
    let rows = export_csv(&saved, output)?;
    println!("✓ Exported {} exercises to {}", rows, output.display());
    Ok(())
}

fn cmd_prompt(profile: &Path) -> Result<()> {
    let profile = UserProfile::load_from(profile)?;
    print!("{}", render_plan_prompt(&profile));
    Ok(())
}

fn cmd_delete(store: &JsonPlanStore, user: &str) -> Result<()> {
    if store.remove(user)? {
        println!("✓ Deleted saved plan for {}", user);
    } else {
        println!("No saved plan for {} - nothing to delete.", user);
    }
    Ok(())
}

fn load_saved(store: &JsonPlanStore, user: &str) -> Result<SavedPlan> {
    store
        .load(user)?
        .ok_or_else(|| Error::NoSavedPlan(user.to_string()))
}

/// Convert a 1-based number from the command line to an index
fn to_index(what: &str, number: usize) -> Result<usize> {
    number
        .checked_sub(1)
        .ok_or_else(|| Error::Tracking(format!("{} numbers start at 1", what)))
}

fn read_markdown(input: &Path) -> Result<String> {
    if input == Path::new("-") {
        let mut markdown = String::new();
        io::stdin().read_to_string(&mut markdown)?;
        Ok(markdown)
    } else {
        let markdown = std::fs::read_to_string(input)?;
        tracing::debug!("Read {} bytes of markdown from {:?}", markdown.len(), input);
        Ok(markdown)
    }
}

fn print_plan(plan: &WorkoutPlan, saved: Option<&SavedPlan>) {
    println!("{}", plan.title);
    println!("{}", "=".repeat(plan.title.chars().count()));

    if plan.days.is_empty() {
        println!();
        println!("  (no workout days found)");
    }

    for (day_idx, day) in plan.days.iter().enumerate() {
        println!();
        let heading = if day.title.is_empty() {
            day.day.clone()
        } else {
            format!("{}: {}", day.day, day.title)
        };
        match saved.and_then(|s| s.day_progress(day_idx)) {
            Some(p) => println!("{} [{}/{}]", heading, p.completed, p.total),
            None => println!("{}", heading),
        }

        for (ex_idx, exercise) in day.exercises.iter().enumerate() {
            let marker = match saved {
                Some(s) if s.is_completed(day_idx, ex_idx) => "[x] ",
                Some(_) => "[ ] ",
                None => "",
            };
            println!("  {}{}. {}", marker, ex_idx + 1, exercise.name);

            let details: Vec<String> = [
                ("Sets", &exercise.sets),
                ("Reps", &exercise.reps),
                ("Rest", &exercise.rest),
            ]
            .iter()
            .filter_map(|(label, value)| value.as_ref().map(|v| format!("{}: {}", label, v)))
            .collect();
            if !details.is_empty() {
                println!("       {}", details.join(" | "));
            }
            if let Some(ref tips) = exercise.tips {
                println!("       Tip: {}", tips);
            }
        }
    }

    if let Some(saved) = saved {
        println!();
        print_progress(&saved.progress());
    }
}

fn print_progress(progress: &Progress) {
    println!(
        "Progress: {}/{} exercises ({}% complete)",
        progress.completed,
        progress.total,
        progress.rounded_percentage()
    );
}
