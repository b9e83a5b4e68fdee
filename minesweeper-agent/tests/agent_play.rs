use minesweeper_agent::board::Cell;
use minesweeper_agent::{Field, Game, GameSetup, GameSetupBuilder, KnowledgeBase};
use rand::rngs::StdRng;
use rand::SeedableRng;

fn seeded_game(seed: u64) -> Game {
  let mut builder = GameSetupBuilder::new(8, 8).with_rng(StdRng::seed_from_u64(seed));
  assert!(builder.add_random_mines(8));
  Game::from(builder)
}

/// Plays one game to the end, checking on every move that the knowledge
/// base's proofs agree with the actual board.
fn play_and_audit(mut game: Game, mut kb: KnowledgeBase) {
  let cells = (game.height() * game.width()) as usize;

  for _ in 0..cells {
    let cell = match kb.make_safe_move() {
      Some(cell) => {
        assert!(
          !game.board()[cell].is_mine(),
          "knowledge base proved {:?} safe but it is a mine",
          cell
        );
        cell
      }
      None => match kb.make_random_move() {
        Some(cell) => cell,
        None => break,
      },
    };

    match game.reveal(cell) {
      Field::Mine => break,
      Field::Empty(nearby) => kb.add_knowledge(cell, nearby),
    }

    for sentence in kb.sentences() {
      assert!(sentence.count() as usize <= sentence.cells().len());
      assert!(!sentence.is_vacuous());
    }
    assert!(kb.safes().is_disjoint(kb.mines()));
  }

  for &mine in kb.mines() {
    assert!(
      game.board()[mine].is_mine(),
      "knowledge base proved {:?} a mine but it is safe",
      mine
    );
  }
}

#[test]
fn proofs_stay_sound_across_whole_games() {
  for seed in 0..20 {
    let game = seeded_game(seed);
    let kb = KnowledgeBase::with_rng(
      game.height(),
      game.width(),
      StdRng::seed_from_u64(seed ^ 0xa5a5),
    );
    play_and_audit(game, kb);
  }
}

#[test]
fn opening_on_a_blank_area_clears_a_mine_free_board_quickly() {
  let mines = minesweeper_agent::board::Board::new(3, 3, false);
  let mut game = Game::from(GameSetup::new(&mines));
  let mut kb = KnowledgeBase::with_rng(3, 3, StdRng::seed_from_u64(1));

  // The centre observation alone proves the rest of the board safe.
  assert_eq!(game.reveal(Cell::new(1, 1)), Field::Empty(0));
  kb.add_knowledge(Cell::new(1, 1), 0);

  while let Some(cell) = kb.make_safe_move() {
    assert_eq!(game.reveal(cell), Field::Empty(0));
    kb.add_knowledge(cell, 0);
  }

  assert!(game.is_cleared());
  assert_eq!(kb.make_random_move(), None);
}
