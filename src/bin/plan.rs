//! Loot distribution planner CLI.
//!
//! Computes a week-by-week loot plan from a team snapshot.
//!
//! Usage:
//!   cargo run --bin plan -- <team.json> [OPTIONS]
//!
//! Examples:
//!   cargo run --bin plan -- team.json              # Plan from a fresh start
//!   cargo run --bin plan -- team.json --current    # Seed books from recorded clears
//!   cargo run --bin plan -- team.json --json       # Also export the plan as JSON

use raidplan::planner::calculate_distribution;
use raidplan::team::RaidTeam;
use std::env;
use std::fs;
use std::process;

struct Options {
    team_path: String,
    use_current_state: bool,
    export_json: bool,
    quiet: bool,
}

fn main() {
    let args: Vec<String> = env::args().collect();
    let options = match parse_args(&args) {
        Some(options) => options,
        None => {
            print_usage();
            process::exit(2);
        }
    };

    let contents = match fs::read_to_string(&options.team_path) {
        Ok(contents) => contents,
        Err(err) => {
            eprintln!("Failed to read {}: {}", options.team_path, err);
            process::exit(1);
        }
    };

    let team: RaidTeam = match serde_json::from_str(&contents) {
        Ok(team) => team,
        Err(err) => {
            eprintln!("Failed to parse {}: {}", options.team_path, err);
            process::exit(1);
        }
    };

    if !options.quiet {
        println!("╔═══════════════════════════════════════════════════════════════╗");
        println!("║              RAIDPLAN LOOT DISTRIBUTION PLANNER               ║");
        println!("╚═══════════════════════════════════════════════════════════════╝");
        println!();
        println!("Team:           {}", team.name);
        println!("Sheets:         {}", team.sheets.len());
        println!("Current state:  {}", options.use_current_state);
        println!();
    }

    let plan = calculate_distribution(&team, options.use_current_state);

    if !options.quiet {
        println!("{}", plan.to_text());
    } else {
        println!("Total weeks: {}", plan.total_weeks);
    }

    if plan.hit_week_cap() {
        eprintln!("Warning: plan did not converge within the week cap.");
    }

    if options.export_json {
        let filename = format!(
            "plan_{}.json",
            chrono::Utc::now().format("%Y%m%d_%H%M%S")
        );
        match fs::write(&filename, plan.to_json()) {
            Ok(()) => println!("JSON plan saved to: {}", filename),
            Err(err) => {
                eprintln!("Failed to write {}: {}", filename, err);
                process::exit(1);
            }
        }
    }
}

fn parse_args(args: &[String]) -> Option<Options> {
    let mut team_path = None;
    let mut use_current_state = false;
    let mut export_json = false;
    let mut quiet = false;

    for arg in &args[1..] {
        match arg.as_str() {
            "--current" | "-c" => use_current_state = true,
            "--json" => export_json = true,
            "--quiet" | "-q" => quiet = true,
            "--help" | "-h" => return None,
            other if !other.starts_with('-') && team_path.is_none() => {
                team_path = Some(other.to_string());
            }
            _ => return None,
        }
    }

    Some(Options {
        team_path: team_path?,
        use_current_state,
        export_json,
        quiet,
    })
}

fn print_usage() {
    println!("Usage: plan <team.json> [OPTIONS]");
    println!();
    println!("Options:");
    println!("  -c, --current   Seed banked books from the team's recorded clears");
    println!("      --json      Export the plan as a timestamped JSON file");
    println!("  -q, --quiet     Print only the total week count");
    println!("  -h, --help      Show this help");
}
