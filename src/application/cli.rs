use crate::application::{Config, PagesApp};
use crate::domain::{
    DAILY_WORD_TARGET, DateRange, Entry, EntryListItem, StreakInfo, parse_date, today,
};
use anyhow::Result;
use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use serde::Serialize;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "pages")]
#[command(about = "Morning pages: one entry a day, and a streak to keep")]
#[command(version)]
pub struct Cli {
    /// Journal directory (overrides $PAGES_DIR)
    #[arg(long, global = true)]
    pub dir: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Write the entry for a day (opens $EDITOR unless --text is given)
    Write {
        /// Specific date (YYYY-MM-DD format, defaults to today)
        #[arg(short, long)]
        date: Option<String>,
        /// Use this text instead of opening the editor
        #[arg(short, long)]
        text: Option<String>,
    },
    /// Print the entry for a day
    Show {
        /// Specific date (YYYY-MM-DD format, defaults to today)
        #[arg(short, long)]
        date: Option<String>,
        #[arg(long)]
        json: bool,
    },
    /// Replace the text of an existing entry by id
    Update {
        #[arg(long)]
        id: i64,
        #[arg(short, long)]
        text: String,
    },
    /// List entries, most recent first
    List {
        /// First date to include (YYYY-MM-DD)
        #[arg(long)]
        from: Option<String>,
        /// Last date to include (YYYY-MM-DD)
        #[arg(long)]
        to: Option<String>,
        /// Whole month (YYYY-MM); replaces --from/--to
        #[arg(long, conflicts_with_all = ["from", "to"])]
        month: Option<String>,
        #[arg(long)]
        json: bool,
    },
    /// Show the current streak and total days written
    Streak {
        #[arg(long)]
        json: bool,
    },
}

impl Cli {
    pub fn run() -> Result<()> {
        let cli = Self::parse();

        let mut config = Config::from_env();
        if let Some(dir) = cli.dir {
            config = config.in_dir(dir);
        }
        let app = PagesApp::new(config)?;

        match cli.command {
            Some(Commands::Write { date, text }) => {
                let entry = app.write_entry(target_date(date)?, text)?;
                println!(
                    "Saved {} ({} words, {:.0}% of {})",
                    entry.date,
                    entry.word_count,
                    entry.progress_percent(),
                    DAILY_WORD_TARGET
                );
            }
            Some(Commands::Show { date, json }) => {
                let date = target_date(date)?;
                match app.entry_for(date)? {
                    Some(entry) if json => print_json(&entry)?,
                    Some(entry) => print_entry(&entry),
                    None => println!("No entry for {} yet", date),
                }
            }
            Some(Commands::Update { id, text }) => {
                let entry = app.update_entry(id, text)?;
                println!("Updated {} ({} words)", entry.date, entry.word_count);
            }
            Some(Commands::List {
                from,
                to,
                month,
                json,
            }) => {
                let range = match month {
                    Some(month) => DateRange::parse_month(&month)?,
                    None => DateRange::new(optional_date(from)?, optional_date(to)?),
                };
                let items = app.list(range)?;
                if json {
                    print_json(&items)?;
                } else {
                    print_list(&items);
                }
            }
            Some(Commands::Streak { json }) => {
                let info = app.streak()?;
                if json {
                    print_json(&info)?;
                } else {
                    print_streak(&info);
                }
            }
            None => {
                // Default: streak summary plus today's status
                print_streak(&app.streak()?);
                match app.entry_for(today())? {
                    Some(entry) => println!(
                        "Today: {} words ({:.0}%)",
                        entry.word_count,
                        entry.progress_percent()
                    ),
                    None => println!("Today: nothing written yet, try `pages write`"),
                }
            }
        }

        Ok(())
    }
}

fn target_date(date: Option<String>) -> Result<NaiveDate> {
    Ok(optional_date(date)?.unwrap_or_else(today))
}

fn optional_date(date: Option<String>) -> Result<Option<NaiveDate>> {
    Ok(date.as_deref().map(parse_date).transpose()?)
}

fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn print_entry(entry: &Entry) {
    println!("=== {} ===", entry.date.format("%A, %B %-d, %Y"));
    println!(
        "{} words, {:.1} pages, {:.0}% of daily target",
        entry.word_count,
        entry.pages(),
        entry.progress_percent()
    );
    println!();
    println!("{}", entry.content);
}

fn print_list(items: &[EntryListItem]) {
    if items.is_empty() {
        println!("No entries");
        return;
    }

    for item in items {
        let marker = if item.has_content { "•" } else { "○" };
        println!("{} {}  {:>5} words", marker, item.date, item.word_count);
    }
}

fn print_streak(info: &StreakInfo) {
    println!("Current streak: {} day(s)", info.current_streak);
    println!("Total days:     {}", info.total_days);
    if let Some(last) = info.last_entry_date {
        println!("Last entry:     {}", last);
    }
}
