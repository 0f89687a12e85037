use crate::grid::Grid;

/// Serialize the board from one player's perspective: a `<rows>x<cols>`
/// header, then one line per card in row-major order. Labels are only
/// revealed for face-up cards; the caller's own holdings are marked `my`.
pub fn render_board(grid: &Grid, player: &str) -> String {
    let mut out = String::new();
    out.push_str(&format!("{}x{}", grid.rows(), grid.cols()));
    for card in grid.cards() {
        out.push('\n');
        if card.removed {
            out.push_str("none");
        } else if !card.face_up {
            out.push_str("down");
        } else if card.controlled_by(player) {
            out.push_str("my ");
            out.push_str(&card.label);
        } else {
            out.push_str("up ");
            out.push_str(&card.label);
        }
    }
    out
}
