use std::io::{self, Write};

use sweeper_core::*;

fn glyph(view: &CellView, triggered: bool) -> char {
    if triggered {
        return 'X';
    }
    match (view.is_revealed, view.is_flagged, view.is_mine) {
        (false, true, _) => 'F',
        (_, _, Some(true)) => '*',
        (false, _, _) => '#',
        (true, _, _) if view.neighbor_mines == 0 => '.',
        (true, _, _) => char::from(b'0' + view.neighbor_mines),
    }
}

/// Board with row and column numbers, hidden cells as `#`.
pub(crate) fn board(out: &mut impl Write, session: &Session) -> io::Result<()> {
    let (rows, cols) = session.grid().dimensions();

    write!(out, "   ")?;
    for col in 0..cols {
        write!(out, "{:>3}", col)?;
    }
    writeln!(out)?;

    for row in 0..rows {
        write!(out, "{:>3}", row)?;
        for col in 0..cols {
            let triggered = session.triggered_mine() == Some((row, col));
            let ch = session
                .cell_view((row, col))
                .map_or('?', |view| glyph(&view, triggered));
            write!(out, "{:>3}", ch)?;
        }
        writeln!(out)?;
    }
    Ok(())
}

pub(crate) fn status(out: &mut impl Write, session: &Session) -> io::Result<()> {
    let status = session.status();
    write!(
        out,
        "{} | {:?} | mines left {} | cells left {}",
        status.mode,
        status.phase,
        status.mines_remaining,
        status.cells_left
    )?;
    match status.elapsed_secs {
        Some(secs) => writeln!(out, " | {}s", secs)?,
        None => writeln!(out, " | round {}", status.round)?,
    }

    for player in session.player_views() {
        writeln!(
            out,
            "{} {:<12} {}  round {:>4}  total {:>5}",
            if player.is_current_turn { '>' } else { ' ' },
            player.name,
            player.color,
            player.round_score,
            player.total_score
        )?;
    }
    Ok(())
}

pub(crate) fn screen(out: &mut impl Write, session: &Session) -> io::Result<()> {
    board(out, session)?;
    status(out, session)?;
    out.flush()
}

pub(crate) fn outcome(session: &Session, outcome: &ActionOutcome) -> String {
    match outcome {
        ActionOutcome::NoChange => "Nothing to open there".to_owned(),
        ActionOutcome::Revealed { cells, points: 0 } => format!("Opened {} cells", cells),
        ActionOutcome::Revealed { cells, points } => {
            format!("Opened {} cells for {} points", cells, points)
        }
        ActionOutcome::HitMine { player, penalty } => {
            let name = session
                .scoreboard()
                .get(*player)
                .map_or_else(|_| player.to_string(), |player| player.name.clone());
            format!("{} hit a mine, -{} points", name, penalty)
        }
        ActionOutcome::Ended(end) => game_end(end),
    }
}

fn game_end(end: &GameEnd) -> String {
    let secs = end.elapsed_secs.unwrap_or(0);
    match (end.reason, end.winner_name.as_deref()) {
        (EndReason::MineHit, _) => format!("Boom! Game over after {}s", secs),
        (EndReason::AllSafeRevealed, Some(winner)) => format!(
            "Board cleared, {} takes the round with {} points",
            winner,
            end.points_awarded.unwrap_or(0)
        ),
        (EndReason::AllSafeRevealed, None) => format!("Board cleared in {}s, you win!", secs),
    }
}

pub(crate) fn ranking(session: &Session) -> String {
    session
        .ranking()
        .iter()
        .enumerate()
        .map(|(place, player)| format!("{}. {} ({})", place + 1, player.name, player.total_score))
        .collect::<Vec<_>>()
        .join("\n")
}
