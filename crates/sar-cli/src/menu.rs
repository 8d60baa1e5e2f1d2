//! The interactive game loop: a numbered menu of search plans per round,
//! probability and effectiveness read-outs, and a start-over option that
//! resets the session in place.

use crate::config::ScenarioConfig;
use anyhow::Context;
use sar_core::model::region::{REGION_COUNT, RegionId};
use sar_core::session::{SearchAssignment, Session};
use std::io::{BufRead, Write};
use tracing::debug;

pub fn run(scenario: &ScenarioConfig, seed: Option<u64>) -> anyhow::Result<()> {
    let stdin = std::io::stdin();
    let stdout = std::io::stdout();
    run_with_io(scenario, seed, &mut stdin.lock(), &mut stdout.lock())
}

/// Drives the menu loop over arbitrary reader/writer pairs so the loop is
/// testable with scripted input.
pub fn run_with_io(
    scenario: &ScenarioConfig,
    seed: Option<u64>,
    input: &mut impl BufRead,
    out: &mut impl Write,
) -> anyhow::Result<()> {
    let config = scenario.to_session_config()?;
    let mut session = match seed.or(scenario.seed) {
        Some(seed) => Session::with_seed(config, seed),
        None => Session::new(config),
    }
    .context("failed to start session")?;

    writeln!(out, "Scenario: {} (seed {})", scenario.name, session.seed())?;
    start_game(&mut session, out)?;

    let mut line = String::new();
    loop {
        write_menu(out, session.round_number())?;
        write!(out, "Choice: ")?;
        out.flush()?;

        line.clear();
        if input.read_line(&mut line)? == 0 {
            break;
        }

        let plan: Vec<SearchAssignment> = match line.trim() {
            "0" => break,
            "1" => vec![SearchAssignment::double(RegionId::Alpha)],
            "2" => vec![SearchAssignment::double(RegionId::Bravo)],
            "3" => vec![SearchAssignment::double(RegionId::Charlie)],
            "4" => vec![
                SearchAssignment::single(RegionId::Alpha),
                SearchAssignment::single(RegionId::Bravo),
            ],
            "5" => vec![
                SearchAssignment::single(RegionId::Alpha),
                SearchAssignment::single(RegionId::Charlie),
            ],
            "6" => vec![
                SearchAssignment::single(RegionId::Bravo),
                SearchAssignment::single(RegionId::Charlie),
            ],
            "7" => {
                writeln!(out, "\nStarting over.")?;
                session.reset();
                start_game(&mut session, out)?;
                continue;
            }
            other => {
                writeln!(out, "\nSorry, '{other}' isn't a valid choice.")?;
                continue;
            }
        };

        let result = session.run_round(&plan).context("round failed")?;

        writeln!(out, "\nSearch {} results:", result.round)?;
        for (region, outcome) in &result.outcomes {
            writeln!(out, "  Area {region}: {outcome}")?;
        }
        writeln!(out, "Search {} Effectiveness (E):", result.round)?;
        write_triple(out, &result.effectiveness)?;

        if let Some(region) = result.found {
            let target = session
                .target()
                .context("found a target that was never placed")?;
            let position = target.global(session.regions());
            writeln!(
                out,
                "\nTarget located in Area {region} at map position {position}."
            )?;
            writeln!(out, "\nStarting a new search.")?;
            session.reset();
            start_game(&mut session, out)?;
        } else {
            writeln!(
                out,
                "\nNew Target Probabilities (P) for Search {}:",
                session.round_number()
            )?;
            write_triple(out, session.beliefs())?;
        }
    }

    Ok(())
}

fn start_game(session: &mut Session, out: &mut impl Write) -> anyhow::Result<()> {
    let target = session.place_target().context("failed to place target")?;
    debug!(%target, "target placed");

    writeln!(out, "{}", "-".repeat(65))?;
    writeln!(out, "\nInitial Target (P) Probabilities:")?;
    write_triple(out, session.beliefs())?;
    Ok(())
}

fn write_triple(out: &mut impl Write, values: &[f64; REGION_COUNT]) -> anyhow::Result<()> {
    writeln!(
        out,
        "  Alpha = {:.3}, Bravo = {:.3}, Charlie = {:.3}",
        values[0], values[1], values[2]
    )?;
    Ok(())
}

fn write_menu(out: &mut impl Write, round: u32) -> anyhow::Result<()> {
    writeln!(out, "\nSearch {round}")?;
    writeln!(
        out,
        "
Choose next areas to search:

0 - Quit
1 - Search Area Alpha twice
2 - Search Area Bravo twice
3 - Search Area Charlie twice
4 - Search Areas Alpha & Bravo
5 - Search Areas Alpha & Charlie
6 - Search Areas Bravo & Charlie
7 - Start over
"
    )?;
    Ok(())
}
