use std::io::{self, Write};

use mineboard_core::{Board, TILE_COUNT};

/// One character per tile, in tile sheet order.
const GLYPHS: [char; TILE_COUNT] = [
    '.', '1', '2', '3', '4', '5', '6', '7', '8', '#', '_', 'F', '*', 'x', 'X',
];

pub fn draw<G>(out: &mut impl Write, board: &Board<G>) -> io::Result<()> {
    let (_, cols) = board.size();

    writeln!(out, "mines left: {}/{}", board.mines_left(), board.total_mines())?;
    write!(out, "    ")?;
    for col in 0..cols {
        write!(out, "{}", col % 10)?;
    }
    writeln!(out)?;

    for (row, cells) in board.display().outer_iter().enumerate() {
        write!(out, "{row:>3} ")?;
        for cell in cells {
            write!(out, "{}", GLYPHS[cell.tile_index()])?;
        }
        writeln!(out)?;
    }
    out.flush()
}
