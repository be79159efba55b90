use crate::*;

/// Reveals `coords` and, when it has no adjacent mines, the whole zero region around it plus its numbered border.
///
/// Returns how many cells changed from hidden to revealed. Out-of-bounds, revealed and flagged targets are left
/// untouched and count 0. Every revealed cell is stamped with `revealer`. The `is_revealed` flag doubles as the
/// visited set, so each cell is pushed at most once per neighbor and revealed at most once.
pub fn reveal(grid: &mut Grid, coords: Coord2, revealer: Option<PlayerId>) -> CellCount {
    if !grid.get(coords).is_ok_and(Cell::is_openable) {
        return 0;
    }

    let mut revealed: CellCount = 0;
    let mut to_visit = vec![coords];

    while let Some(visit_coords) = to_visit.pop() {
        let cell = &mut grid[visit_coords];
        if !cell.is_openable() {
            continue;
        }

        cell.is_revealed = true;
        cell.revealed_by = revealer;
        revealed += 1;
        log::trace!(
            "Revealed {:?}, adjacent mines: {}",
            visit_coords,
            cell.neighbor_mines
        );

        // mines reached here stay terminal, only empty safe cells spread
        if !cell.is_mine && cell.neighbor_mines == 0 {
            to_visit.extend(
                grid.iter_neighbors(visit_coords)
                    .filter(|&pos| grid[pos].is_openable()),
            );
        }
    }

    log::debug!("Reveal at {:?} opened {} cells", coords, revealed);
    revealed
}

/// Reveals exactly one cell without spreading, used when a multiplayer turn ends on a mine.
pub fn reveal_single(grid: &mut Grid, coords: Coord2, revealer: Option<PlayerId>) -> CellCount {
    match grid.get_mut(coords) {
        Ok(cell) if cell.is_openable() => {
            cell.is_revealed = true;
            cell.revealed_by = revealer;
            1
        }
        _ => 0,
    }
}

/// Reveals every mine, leaves safe cells alone.
pub fn reveal_all_mines(grid: &mut Grid) {
    let (rows, cols) = grid.dimensions();
    for row in 0..rows {
        for col in 0..cols {
            let cell = &mut grid[(row, col)];
            if cell.is_mine {
                cell.is_revealed = true;
            }
        }
    }
}
