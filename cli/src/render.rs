use pairmatch_core::{Card, GameSession};
use pairmatch_protocol::FaceToken;
use std::fmt::Write;

const HIDDEN: &str = "?";

/// Draws the board with 1-based row and column headers.
///
/// Face-down cards show `?`, face-up cards their face and matched cards their face in brackets.
pub fn render_board(session: &GameSession<FaceToken>) -> String {
    let width = session
        .cards()
        .iter()
        .map(|card| card.pair_token().as_str().chars().count() + 2)
        .max()
        .unwrap_or(1)
        .max(3);
    let label_width = session.rows().to_string().len();

    let mut out = String::new();
    let _ = write!(out, "{:label_width$} ", "");
    for col in 1..=session.cols() {
        let _ = write!(out, " {:^width$}", col);
    }
    out.push('\n');

    let cols = usize::from(session.cols());
    for (row, cards) in session.cards().chunks(cols.max(1)).enumerate() {
        let _ = write!(out, "{:>label_width$} ", row + 1);
        for card in cards {
            let _ = write!(out, " {:^width$}", cell(card));
        }
        out.push('\n');
    }
    let _ = write!(
        out,
        "score {}  pairs left {}",
        session.score(),
        session.pairs_left()
    );
    out
}

fn cell(card: &Card<FaceToken>) -> String {
    if card.is_matched() {
        format!("[{}]", card.pair_token())
    } else if card.is_flipped() {
        card.pair_token().to_string()
    } else {
        HIDDEN.to_owned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pairmatch_core::{BoardConfig, FlipEngine, deal_layout};

    #[test]
    fn shows_hidden_flipped_and_matched_cards() {
        let config = BoardConfig::new_unchecked(2, 2);
        let layout: Vec<FaceToken> = ["A", "A", "B", "B"].map(FaceToken::from).to_vec();
        let mut engine = FlipEngine::new(config);
        engine.start(deal_layout(&layout, config).unwrap()).unwrap();
        engine.flip(0);
        engine.flip(1);
        engine.flip(2);

        let board = render_board(engine.session().unwrap());

        assert_eq!(
            board,
            "    1   2 \n1  [A] [A]\n2   B   ? \nscore 1  pairs left 1"
        );
    }
}
