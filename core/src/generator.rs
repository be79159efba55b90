use rand::Rng;

use crate::*;

/// Places `mines` mines uniformly at random, never on `safe`, then fills in neighbor counts.
///
/// Rejection sampling: uniform `(row, col)` draws are discarded when they hit `safe` or an existing mine.
/// At least one cell must stay safe, so `mines >= total_cells` is refused before sampling starts.
pub fn generate<R: Rng>(
    grid: &mut Grid,
    mines: CellCount,
    safe: Coord2,
    rng: &mut R,
) -> Result<()> {
    let safe = grid.validate_coords(safe)?;
    let cells = grid.total_cells();
    if mines >= cells {
        log::warn!(
            "Cannot keep start cell safe, requested {} mines but only {} cells",
            mines,
            cells
        );
        return Err(GameError::TooManyMines { mines, cells });
    }

    let (rows, cols) = grid.dimensions();
    let mut placed: CellCount = 0;
    let mut rejected: u32 = 0;
    while placed < mines {
        let coords = (rng.random_range(0..rows), rng.random_range(0..cols));
        if coords == safe || grid[coords].is_mine {
            rejected += 1;
            continue;
        }
        grid[coords].is_mine = true;
        placed += 1;
    }
    log::debug!(
        "Placed {} mines on {}x{} avoiding {:?} ({} samples rejected)",
        placed,
        rows,
        cols,
        safe,
        rejected
    );

    grid.compute_neighbor_counts();
    Ok(())
}
