//! Plain-text frames of a world snapshot.

use termite_world::WorldSnapshot;

const CHIP: char = '#';
const EMPTY: char = '.';
const IDLE: char = 'o';
const LOADED: char = '*';

/// Draw the grid row by row. Termites are drawn over chips; a carrying
/// termite wins over an idle one sharing its cell.
pub fn render_frame(snapshot: &WorldSnapshot) -> String {
    let mut rows: Vec<Vec<char>> = snapshot
        .rows()
        .map(|row| {
            row.iter()
                .map(|&chip| if chip { CHIP } else { EMPTY })
                .collect()
        })
        .collect();

    for termite in &snapshot.termites {
        let glyph = &mut rows[termite.position.y as usize][termite.position.x as usize];
        if *glyph != LOADED {
            *glyph = if termite.carrying { LOADED } else { IDLE };
        }
    }

    let mut frame = String::with_capacity(snapshot.chips.len() + rows.len());
    for row in &rows {
        frame.extend(row);
        frame.push('\n');
    }
    frame
}

/// One-line caption shown under a frame
pub fn render_caption(snapshot: &WorldSnapshot, density: f32) -> String {
    format!(
        "Grid: {} x {}  Generation {}  Termites: {}  Chip density: {}",
        snapshot.width,
        snapshot.height,
        snapshot.generation,
        snapshot.termites.len(),
        density
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use termite_core::{Direction, Position};
    use termite_world::{Grid, Termite};

    #[test]
    fn test_render_frame() {
        let mut grid = Grid::new(3, 2);
        grid.set_chip(Position::new(0, 0), true);
        grid.set_chip(Position::new(2, 1), true);
        let termites = vec![
            Termite::new(Position::new(1, 0), Direction::North),
            Termite::carrying(Position::new(2, 1), Direction::South),
        ];
        let snapshot = WorldSnapshot::capture(&grid, &termites, 0);

        assert_eq!(render_frame(&snapshot), "#o.\n..*\n");
    }

    #[test]
    fn test_carrying_termite_drawn_on_top() {
        let grid = Grid::new(1, 1);
        let termites = vec![
            Termite::carrying(Position::new(0, 0), Direction::North),
            Termite::new(Position::new(0, 0), Direction::East),
        ];
        let snapshot = WorldSnapshot::capture(&grid, &termites, 0);
        assert_eq!(render_frame(&snapshot), "*\n");
    }

    #[test]
    fn test_caption() {
        let snapshot = WorldSnapshot::capture(&Grid::new(150, 100), &[], 42);
        assert_eq!(
            render_caption(&snapshot, 0.09),
            "Grid: 150 x 100  Generation 42  Termites: 0  Chip density: 0.09"
        );
    }
}
