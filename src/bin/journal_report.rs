// Summarizes an arena event journal
//
// Usage:
//   cargo run --bin journal-report -- <journal_file> [options]
//
// Options:
//   --sessions       Also list every finished session
//   --level <name>   Only count sessions played on this level

use std::env;
use std::process;

use snake_arena::events::ArenaEvent;
use snake_arena::journal::{load_journal, print_report, JournalEntry, JournalStats};

fn print_usage() {
    eprintln!("Arena Journal Report");
    eprintln!();
    eprintln!("USAGE:");
    eprintln!("  journal-report <journal_file> [OPTIONS]");
    eprintln!();
    eprintln!("OPTIONS:");
    eprintln!("  --sessions              List every finished session");
    eprintln!("  --level <easy|medium|hard>");
    eprintln!("                          Only include sessions on this level");
    eprintln!("  --help                  Show this help message");
    eprintln!();
    eprintln!("EXAMPLES:");
    eprintln!("  journal-report arena_journal.jsonl");
    eprintln!("  journal-report arena_journal.jsonl --sessions --level hard");
}

fn print_sessions(entries: &[JournalEntry]) {
    println!("═══════════════════════════════════════════════════════════");
    println!("                    FINISHED SESSIONS");
    println!("═══════════════════════════════════════════════════════════");
    for entry in entries {
        if let ArenaEvent::SessionReset {
            cause,
            score,
            level,
        } = &entry.event
        {
            println!(
                "{}  {:<7} score {:>4}  ({})",
                entry.timestamp,
                level.as_str(),
                score,
                cause.as_str()
            );
        }
    }
    println!();
}

/// Keeps session-end events on `level` and drops other session ends
fn filter_level(entries: Vec<JournalEntry>, level: &str) -> Vec<JournalEntry> {
    entries
        .into_iter()
        .filter(|entry| match &entry.event {
            ArenaEvent::SessionReset { level: l, .. } => l.as_str() == level,
            _ => true,
        })
        .collect()
}

fn main() {
    env_logger::init();

    let args: Vec<String> = env::args().collect();

    if args.len() < 2 || args.contains(&"--help".to_string()) {
        print_usage();
        process::exit(if args.contains(&"--help".to_string()) {
            0
        } else {
            1
        });
    }

    let journal_file = &args[1];
    let mut list_sessions = false;
    let mut level: Option<String> = None;

    let mut i = 2;
    while i < args.len() {
        match args[i].as_str() {
            "--sessions" => {
                list_sessions = true;
            }
            "--level" => {
                if i + 1 >= args.len() {
                    eprintln!("Error: --level requires an argument");
                    process::exit(1);
                }
                let name = args[i + 1].to_lowercase();
                if !["easy", "medium", "hard"].contains(&name.as_str()) {
                    eprintln!("Error: Unknown level '{}'", args[i + 1]);
                    process::exit(1);
                }
                level = Some(name);
                i += 1;
            }
            _ => {
                eprintln!("Error: Unknown option '{}'", args[i]);
                print_usage();
                process::exit(1);
            }
        }
        i += 1;
    }

    let mut entries = match load_journal(journal_file) {
        Ok(entries) => entries,
        Err(e) => {
            eprintln!("Error loading journal: {}", e);
            process::exit(1);
        }
    };

    if entries.is_empty() {
        eprintln!("Error: Journal is empty");
        process::exit(1);
    }

    if let Some(level) = &level {
        entries = filter_level(entries, level);
    }

    println!("Journal file: {}", journal_file);
    let stats = JournalStats::from_entries(&entries);
    print_report(&stats);

    if list_sessions {
        print_sessions(&entries);
    }
}
