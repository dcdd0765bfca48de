mod narrators;
mod render;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use narrators::{CommandNarrator, LocalNarrator};
use protolife_core::genome::Trait;
use protolife_core::narrator::{Command, CommandOption, Narrator};
use protolife_core::{RunSummary, SimConfig, SimulationClock};
use std::fs;
use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(
    name = "protolife",
    about = "Guide a lineage of primordial organisms through a narrated world",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Play the interactive narrated game on stdin/stdout
    Play {
        /// Path to a JSON config file (defaults apply when omitted)
        #[arg(long)]
        config: Option<PathBuf>,
        /// Override the config's RNG seed
        #[arg(long)]
        seed: Option<u64>,
        /// Use the external narrator program named by PROTOLIFE_NARRATOR_CMD
        #[arg(long)]
        external_narrator: bool,
    },
    /// Run headless turns and write a JSON run summary
    Run {
        /// Path to a JSON config file (defaults apply when omitted)
        #[arg(long)]
        config: Option<PathBuf>,
        /// Number of turns to simulate
        #[arg(long, default_value_t = 20)]
        turns: usize,
        /// Where to write the summary JSON (stdout when omitted)
        #[arg(long)]
        out: Option<PathBuf>,
    },
    /// Print the default configuration as JSON
    DumpDefaultConfig,
}

fn load_config(path: Option<&Path>) -> Result<SimConfig> {
    match path {
        Some(path) => {
            let raw = fs::read_to_string(path)
                .with_context(|| format!("failed to read config {}", path.display()))?;
            serde_json::from_str(&raw)
                .with_context(|| format!("failed to parse config {}", path.display()))
        }
        None => Ok(SimConfig::default()),
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    match cli.command {
        Commands::Play {
            config,
            seed,
            external_narrator,
        } => {
            let mut config = load_config(config.as_deref())?;
            if let Some(seed) = seed {
                config.seed = seed;
            }
            let mut narrator: Box<dyn Narrator> = if external_narrator {
                Box::new(CommandNarrator::from_env()?)
            } else {
                Box::new(LocalNarrator)
            };
            play(config, narrator.as_mut())
        }
        Commands::Run { config, turns, out } => {
            let config = load_config(config.as_deref())?;
            run_headless(config, turns, out.as_deref())
        }
        Commands::DumpDefaultConfig => {
            let json = serde_json::to_string_pretty(&SimConfig::default())
                .context("failed to encode default config")?;
            println!("{json}");
            Ok(())
        }
    }
}

fn play(config: SimConfig, narrator: &mut dyn Narrator) -> Result<()> {
    let milestone_bonus = config.milestone_bonus;
    let mut clock = SimulationClock::new(config)?;
    let stdin = io::stdin();
    let mut input = String::new();

    println!("A warm pool. A trickle of nutrients. {} specks of life.", clock.lineage().population());

    loop {
        let report = clock.run_turn();

        if let Some(event) = report.event {
            println!("\n[WORLD EVENT] {}", event.label());
        }
        for milestone in &report.milestones {
            println!("[MILESTONE] {} (+{} EP)", milestone.label(), milestone_bonus);
        }

        println!();
        print!("{}", render::ascii_frame(clock.field(), clock.lineage().agents()));
        print_status(&clock, &report);

        if report.extinct {
            println!("\nThe pool falls still. The lineage is extinct.");
            return Ok(());
        }

        let summary = clock.turn_summary();
        match narrator.narrate(&summary) {
            Ok(text) => println!("\n{text}"),
            Err(e) => eprintln!("narrator unavailable: {e}"),
        }

        print!("\n> ");
        io::stdout().flush().context("failed to flush prompt")?;
        input.clear();
        if stdin
            .lock()
            .read_line(&mut input)
            .context("failed to read player input")?
            == 0
        {
            println!();
            return Ok(());
        }

        let command = match narrator.choose(input.trim()) {
            Ok(command) => command,
            Err(e) => {
                eprintln!("{e}; the lineage waits");
                Command::Wait
            }
        };
        let option = summary
            .options
            .iter()
            .find(|o| o.command == command)
            .copied()
            .unwrap_or(CommandOption {
                command: Command::Wait,
                cost: 0,
                delta: 0.0,
            });

        match clock.apply_command(&option) {
            Ok(()) if option.command == Command::Wait => {
                println!("The lineage holds its course.")
            }
            Ok(()) => println!(
                "[EVOLVED] {} ({:+}) for {} EP; {} EP remain",
                option.command.as_str(),
                option.delta,
                option.cost,
                clock.lineage().potential()
            ),
            Err(e) => println!("[EVOLUTION FAILED] {e}"),
        }
    }
}

fn print_status(clock: &SimulationClock, report: &protolife_core::TurnReport) {
    println!(
        "generation {} | population {} | births {} | deaths {} | {} EP",
        report.generation,
        report.population,
        report.births,
        report.deaths,
        clock.lineage().potential()
    );
    let genome = clock.lineage().reference_genome();
    let traits: Vec<String> = Trait::ALL
        .iter()
        .map(|t| format!("{}={:.3}", t.name(), genome.get(*t)))
        .collect();
    println!("reference genome: {}", traits.join(" "));
}

fn run_headless(config: SimConfig, turns: usize, out: Option<&Path>) -> Result<()> {
    let mut clock = SimulationClock::new(config)?;
    let mut samples = Vec::with_capacity(turns);

    for _ in 0..turns {
        let report = clock.run_turn();
        samples.push(clock.sample(&report));
        if report.extinct {
            break;
        }
    }

    let summary = RunSummary {
        schema_version: 1,
        turns: samples.len(),
        final_population: clock.lineage().population(),
        extinct: clock.lineage().is_extinct(),
        samples,
    };
    let json = serde_json::to_string_pretty(&summary).context("failed to encode run summary")?;
    match out {
        Some(path) => fs::write(path, json)
            .with_context(|| format!("failed to write summary {}", path.display()))?,
        None => println!("{json}"),
    }
    Ok(())
}
