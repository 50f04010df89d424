use std::io;

use chrono::Local;
use clap::{CommandFactory, Parser, Subcommand};

use crate::{
    app::{self, UiOptions},
    storage,
    timer::{HistoryPeriod, build_history_report},
};

#[derive(Parser, Debug)]
#[command(name = "lumen")]
#[command(about = "A quiet focus timer with ambient visuals", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    command: Option<Command>,

    #[arg(long, help = "Session length in minutes (1-180)")]
    minutes: Option<u64>,

    #[arg(long, help = "Task label for the session")]
    task: Option<String>,

    #[arg(long, help = "Disable the ambient particle field")]
    no_ambient: bool,

    #[arg(long, help = "Show the title card before the timer")]
    splash: bool,

    #[arg(
        long,
        value_name = "MINUTES",
        help = "Roll into a break of this length when a focus session completes"
    )]
    break_after: Option<u64>,

    #[arg(long, help = "Discard any saved session and start clean")]
    fresh: bool,
}

#[derive(Subcommand, Debug)]
enum Command {
    #[command(about = "Show the saved session, if any")]
    Status,

    #[command(about = "Show focus time per task")]
    History {
        #[arg(long, help = "Last 7 days", conflicts_with_all = ["month"])]
        week: bool,

        #[arg(long, help = "Last 30 days", conflicts_with_all = ["week"])]
        month: bool,
    },

    #[command(about = "Delete the saved session")]
    Reset,

    #[command(about = "Generate shell completions")]
    Completions {
        #[arg(help = "Shell type (bash, zsh, fish)")]
        shell: String,
    },
}

pub fn show_status() -> Result<(), String> {
    let path = storage::get_session_path();
    match storage::load_session(&path) {
        Some(saved) => {
            println!(
                "{:12} {}:{:02}",
                "remaining",
                saved.time_left / 60,
                saved.time_left % 60
            );
            println!("{:12} {} min", "duration", saved.duration_minutes);
            if !saved.task.is_empty() {
                println!("{:12} {}", "task", saved.task);
            }
            if !saved.notes.is_empty() {
                println!("{:12} {}", "notes", saved.notes);
            }
        }
        None => println!("No saved session"),
    }
    Ok(())
}

pub fn history_report(period: HistoryPeriod) -> Result<(), String> {
    let entries =
        storage::load_history(&storage::get_history_path()).map_err(|e| e.to_string())?;
    let summary = build_history_report(&entries, period, Local::now().date_naive());

    let title = match period {
        HistoryPeriod::Today => "Today's Focus",
        HistoryPeriod::Week => "Weekly Focus",
        HistoryPeriod::Month => "Monthly Focus",
    };

    println!("{} ({})", title, summary.range_label);
    println!("{}", "-".repeat(46));
    for entry in &summary.entries {
        println!(
            "{:24} {:>3}  {:02}:{:02}:{:02}",
            entry.task,
            entry.sessions,
            entry.elapsed_seconds / 3600,
            (entry.elapsed_seconds % 3600) / 60,
            entry.elapsed_seconds % 60
        );
    }
    println!("{}", "-".repeat(46));
    println!(
        "{:24} {:>3}  {:02}:{:02}:{:02}",
        "TOTAL",
        summary.total_sessions,
        summary.total_seconds / 3600,
        (summary.total_seconds % 3600) / 60,
        summary.total_seconds % 60
    );

    Ok(())
}

pub fn clear_saved_session() -> Result<(), String> {
    let path = storage::get_session_path();
    if !storage::file_exists(&path) {
        println!("No saved session");
        return Ok(());
    }

    storage::delete_file_if_exists(&path).map_err(|e| e.to_string())?;
    println!("Cleared saved session");
    Ok(())
}

pub fn print_completions(shell: &str) -> Result<(), String> {
    use clap_complete::Shell;
    match shell {
        "bash" => {
            clap_complete::generate(Shell::Bash, &mut Cli::command(), "lumen", &mut io::stdout());
        }
        "zsh" => {
            clap_complete::generate(Shell::Zsh, &mut Cli::command(), "lumen", &mut io::stdout());
        }
        "fish" => {
            clap_complete::generate(Shell::Fish, &mut Cli::command(), "lumen", &mut io::stdout());
        }
        _ => {
            return Err(format!(
                "Unsupported shell: {}. Use bash, zsh, or fish.",
                shell
            ));
        }
    }
    Ok(())
}

pub fn run_cli() {
    let cli = Cli::parse();
    match cli.command {
        None => {
            let options = UiOptions {
                minutes: cli.minutes,
                task: cli.task,
                ambient: !cli.no_ambient,
                splash: cli.splash,
                break_after: cli.break_after,
                fresh: cli.fresh,
            };
            if let Err(e) = app::run_ui(options) {
                eprintln!("Error: {}", e);
                std::process::exit(1);
            }
        }
        Some(Command::Status) => {
            if let Err(e) = show_status() {
                eprintln!("Error: {}", e);
                std::process::exit(1);
            }
        }
        Some(Command::History { week, month }) => {
            let period = if month {
                HistoryPeriod::Month
            } else if week {
                HistoryPeriod::Week
            } else {
                HistoryPeriod::Today
            };

            if let Err(e) = history_report(period) {
                eprintln!("Error: {}", e);
                std::process::exit(1);
            }
        }
        Some(Command::Reset) => {
            if let Err(e) = clear_saved_session() {
                eprintln!("Error: {}", e);
                std::process::exit(1);
            }
        }
        Some(Command::Completions { shell }) => {
            if let Err(e) = print_completions(&shell) {
                eprintln!("Error: {}", e);
                std::process::exit(1);
            }
        }
    }
}
