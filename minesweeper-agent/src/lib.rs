use core::fmt;
use std::borrow::Borrow;

use board::{Board, Cell};
use rand::prelude::SliceRandom;
use rand::RngCore;

pub mod board;
pub mod knowledge;

pub use knowledge::{KnowledgeBase, Sentence, SentenceConclusion};

#[derive(Debug, PartialEq, Eq, Clone, Copy, Hash)]
pub enum Field {
  Mine,
  Empty(u32),
}

impl Field {
  pub fn is_mine(self) -> bool {
    matches!(self, Field::Mine)
  }

  fn notify_mine(field: &mut Field) {
    if let Field::Empty(nearby) = field {
      *nearby += 1;
      debug_assert!(*nearby <= 8);
    }
  }
}

impl fmt::Display for Field {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      Field::Mine => write!(f, "X"),
      Field::Empty(0) => write!(f, " "),
      Field::Empty(nearby) => write!(f, "{}", nearby),
    }
  }
}

pub type GameBoard = Board<Field>;
pub type ViewBoard = Board<bool>;

/// A finished board layout: every cell knows whether it is a mine or how
/// many of its neighbours are.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct GameSetup {
  board: GameBoard,
  mines: u32,
}

impl GameSetup {
  pub fn new(mines: &Board<bool>) -> Self {
    let mut board = GameBoard::new(mines.height, mines.width, Field::Empty(0));
    let mut mine_count = 0;
    for (cell, &is_mine) in mines.enumerate() {
      if is_mine {
        mine_count += 1;
        board[cell] = Field::Mine;
        for neighbour in cell.neighbours() {
          if let Some(neighbour) = board.get_mut(neighbour) {
            Field::notify_mine(neighbour);
          }
        }
      }
    }

    GameSetup {
      board,
      mines: mine_count,
    }
  }

  pub fn height(&self) -> u32 {
    self.board.height
  }

  pub fn width(&self) -> u32 {
    self.board.width
  }

  pub fn mines(&self) -> u32 {
    self.mines
  }
}

impl<B: Borrow<GameSetupBuilder>> From<B> for GameSetup {
  fn from(builder: B) -> Self {
    let builder: &GameSetupBuilder = builder.borrow();
    Self::new(&builder.mines)
  }
}

impl fmt::Debug for GameSetup {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    for row in 0..self.height() {
      for col in 0..self.width() {
        let cell = Cell::new(row as i32, col as i32);
        write!(f, "{}", self.board[cell])?;
      }
      writeln!(f)?;
    }

    Ok(())
  }
}

pub struct GameSetupBuilder {
  mines: Board<bool>,
  protected: Board<bool>,
  rng: Box<dyn RngCore>,
}

impl GameSetupBuilder {
  pub fn new(height: u32, width: u32) -> Self {
    Self {
      mines: Board::new(height, width, false),
      protected: Board::new(height, width, false),
      rng: Box::new(rand::thread_rng()),
    }
  }

  pub fn with_rng(mut self, rng: impl RngCore + 'static) -> Self {
    self.rng = Box::new(rng);
    self
  }

  pub fn has_mine(&self, cell: Cell) -> bool {
    self.mines[cell]
  }

  pub fn set_mine(&mut self, cell: Cell) {
    assert!(!self.is_protected(cell));
    self.mines[cell] = true;
  }

  pub fn is_protected(&self, cell: Cell) -> bool {
    self.protected[cell]
  }

  /// Protects `cell` from mine placement, clearing any mine already there.
  pub fn protect(&mut self, cell: Cell) {
    self.mines[cell] = false;
    self.protected[cell] = true;
  }

  pub fn protect_all(&mut self, cells: impl IntoIterator<Item = Cell>) {
    for cell in cells {
      if self.mines.get(cell).is_some() {
        self.protect(cell);
      }
    }
  }

  /// Places `mines` mines on random unprotected cells. Returns false if the
  /// board has fewer free cells than that.
  pub fn add_random_mines(&mut self, mut mines: u32) -> bool {
    let mut possible_cells: Vec<_> = self.mines.positions().collect();
    possible_cells.shuffle(&mut self.rng);

    while let Some(cell) = possible_cells.pop() {
      if mines == 0 {
        return true;
      }

      if self.is_protected(cell) || self.has_mine(cell) {
        continue;
      }

      self.set_mine(cell);
      mines -= 1;
    }

    mines == 0
  }
}

/// One running game: the fixed setup plus what the player can see and which
/// cells they have flagged as mines.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct Game {
  setup: GameSetup,
  view: ViewBoard,
  flagged: Board<bool>,
}

impl Game {
  pub fn board(&self) -> &GameBoard {
    &self.setup.board
  }

  pub fn height(&self) -> u32 {
    self.board().height
  }

  pub fn width(&self) -> u32 {
    self.board().width
  }

  pub fn is_visible(&self, cell: Cell) -> bool {
    self.view[cell]
  }

  pub fn is_flagged(&self, cell: Cell) -> bool {
    self.flagged[cell]
  }

  /// Uncovers a single cell and reports what is underneath. One observation
  /// per move; neighbouring blanks stay covered until played themselves.
  pub fn reveal(&mut self, cell: Cell) -> Field {
    assert!(!self.view[cell]);
    self.view[cell] = true;
    self.flagged[cell] = false;
    self.board()[cell]
  }

  pub fn flag(&mut self, cell: Cell) {
    debug_assert!(!self.view[cell]);
    self.flagged[cell] = true;
  }

  /// Every mine-free cell has been revealed.
  pub fn is_cleared(&self) -> bool {
    self
      .setup
      .board
      .enumerate()
      .all(|(cell, field)| field.is_mine() || self.view[cell])
  }

  /// The flags coincide exactly with the mines.
  pub fn all_mines_flagged(&self) -> bool {
    self
      .setup
      .board
      .enumerate()
      .all(|(cell, field)| field.is_mine() == self.flagged[cell])
  }
}

impl From<GameSetup> for Game {
  fn from(setup: GameSetup) -> Self {
    Self {
      view: ViewBoard::new(setup.height(), setup.width(), false),
      flagged: Board::new(setup.height(), setup.width(), false),
      setup,
    }
  }
}

impl<B: Borrow<GameSetupBuilder>> From<B> for Game {
  fn from(setup: B) -> Self {
    Self::from(GameSetup::from(setup))
  }
}

impl fmt::Debug for Game {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    for row in 0..self.height() {
      for col in 0..self.width() {
        let cell = Cell::new(row as i32, col as i32);
        if self.is_visible(cell) {
          write!(f, "{}", self.board()[cell])?;
        } else if self.is_flagged(cell) {
          write!(f, "F")?;
        } else {
          write!(f, "░")?;
        }
      }
      writeln!(f)?;
    }

    Ok(())
  }
}

#[cfg(test)]
mod tests {
  use rand::rngs::StdRng;
  use rand::SeedableRng;

  use super::*;

  #[test]
  fn setup_counts_neighbouring_mines() {
    let mut mines = Board::new(3, 3, false);
    mines[Cell::new(0, 0)] = true;
    let setup = GameSetup::new(&mines);

    assert_eq!(setup.mines(), 1);
    assert_eq!(setup.board[Cell::new(0, 0)], Field::Mine);
    assert_eq!(setup.board[Cell::new(0, 1)], Field::Empty(1));
    assert_eq!(setup.board[Cell::new(1, 0)], Field::Empty(1));
    assert_eq!(setup.board[Cell::new(1, 1)], Field::Empty(1));
    assert_eq!(setup.board[Cell::new(2, 2)], Field::Empty(0));
  }

  #[test]
  fn builder_places_requested_mines_outside_protected_cells() {
    let mut builder = GameSetupBuilder::new(4, 4).with_rng(StdRng::seed_from_u64(3));
    builder.protect_all(Cell::new(0, 0).with_neighbours());
    assert!(builder.add_random_mines(5));

    let setup = GameSetup::from(&builder);
    assert_eq!(setup.mines(), 5);
    for cell in Cell::new(0, 0).with_neighbours() {
      if setup.board.get(cell).is_some() {
        assert!(!setup.board[cell].is_mine());
      }
    }
  }

  #[test]
  fn builder_fails_when_mines_do_not_fit() {
    let mut builder = GameSetupBuilder::new(2, 2).with_rng(StdRng::seed_from_u64(3));
    builder.protect(Cell::new(0, 0));
    assert!(!builder.add_random_mines(4));
  }

  #[test]
  fn reveal_and_flag_drive_the_win_conditions() {
    let mut mines = Board::new(2, 2, false);
    mines[Cell::new(1, 1)] = true;
    let mut game = Game::from(GameSetup::new(&mines));

    assert!(!game.is_cleared());
    assert_eq!(game.reveal(Cell::new(0, 0)), Field::Empty(1));
    assert_eq!(game.reveal(Cell::new(0, 1)), Field::Empty(1));
    assert_eq!(game.reveal(Cell::new(1, 0)), Field::Empty(1));
    assert!(game.is_cleared());

    assert!(!game.all_mines_flagged());
    game.flag(Cell::new(1, 1));
    assert!(game.all_mines_flagged());
  }
}
