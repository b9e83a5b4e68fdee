use core::fmt;
use std::collections::HashSet;

use rand::prelude::SliceRandom;
use rand::RngCore;

use crate::board::{BoardPositionIterator, Cell};

/// A logical statement about the board: exactly `count` of `cells` are mines.
///
/// The cell set only ever shrinks. Resolving a member through [`mark_mine`] or
/// [`mark_safe`] removes it and records it in the sentence's own history, so
/// `count` always means "mines among the remaining `cells`".
///
/// [`mark_mine`]: Sentence::mark_mine
/// [`mark_safe`]: Sentence::mark_safe
#[derive(Clone)]
pub struct Sentence {
  cells: HashSet<Cell>,
  count: u32,
  mines_found: HashSet<Cell>,
  safes_found: HashSet<Cell>,
}

impl Sentence {
  pub fn new(cells: impl IntoIterator<Item = Cell>, count: u32) -> Self {
    let cells: HashSet<Cell> = cells.into_iter().collect();
    debug_assert!(count as usize <= cells.len());
    Self {
      cells,
      count,
      mines_found: HashSet::new(),
      safes_found: HashSet::new(),
    }
  }

  pub fn cells(&self) -> &HashSet<Cell> {
    &self.cells
  }

  pub fn count(&self) -> u32 {
    self.count
  }

  /// Cells this sentence itself has resolved as mines since creation.
  pub fn known_mines(&self) -> &HashSet<Cell> {
    &self.mines_found
  }

  /// Cells this sentence itself has resolved as safe since creation.
  pub fn known_safes(&self) -> &HashSet<Cell> {
    &self.safes_found
  }

  /// A sentence with no remaining cells carries no information.
  pub fn is_vacuous(&self) -> bool {
    self.cells.is_empty()
  }

  /// Removes `cell` and decrements `count`, keeping `count` equal to the
  /// number of mines among the remaining cells. No-op for non-members.
  pub fn mark_mine(&mut self, cell: Cell) {
    if self.cells.remove(&cell) {
      debug_assert!(self.count > 0);
      self.count -= 1;
      self.mines_found.insert(cell);
    }
  }

  /// Removes `cell` without touching `count`: a safe cell never counted
  /// towards the mines anyway. No-op for non-members.
  pub fn mark_safe(&mut self, cell: Cell) {
    if self.cells.remove(&cell) {
      self.safes_found.insert(cell);
    }
  }

  pub fn conclusion(&self) -> SentenceConclusion {
    if self.cells.is_empty() {
      Unconclusive
    } else if self.count as usize == self.cells.len() {
      CellsAreMines
    } else if self.count == 0 {
      CellsAreSafe
    } else {
      Unconclusive
    }
  }
}

impl PartialEq for Sentence {
  fn eq(&self, other: &Self) -> bool {
    self.cells == other.cells && self.count == other.count
  }
}

impl Eq for Sentence {}

impl fmt::Debug for Sentence {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{:?} = {}", self.cells, self.count)
  }
}

#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub enum SentenceConclusion {
  Unconclusive,
  CellsAreMines,
  CellsAreSafe,
}

use SentenceConclusion::*;

/// Everything the agent has proven about one game: the moves it has made,
/// the cells known safe, the cells known to be mines, and the active
/// sentences that still constrain unresolved cells.
pub struct KnowledgeBase {
  height: u32,
  width: u32,
  moves_made: HashSet<Cell>,
  safes: HashSet<Cell>,
  mines: HashSet<Cell>,
  sentences: Vec<Sentence>,
  rng: Box<dyn RngCore>,
}

impl KnowledgeBase {
  pub fn new(height: u32, width: u32) -> Self {
    Self::with_rng(height, width, rand::thread_rng())
  }

  pub fn with_rng(height: u32, width: u32, rng: impl RngCore + 'static) -> Self {
    Self {
      height,
      width,
      moves_made: HashSet::new(),
      safes: HashSet::new(),
      mines: HashSet::new(),
      sentences: Vec::new(),
      rng: Box::new(rng),
    }
  }

  pub fn height(&self) -> u32 {
    self.height
  }

  pub fn width(&self) -> u32 {
    self.width
  }

  pub fn moves_made(&self) -> &HashSet<Cell> {
    &self.moves_made
  }

  pub fn safes(&self) -> &HashSet<Cell> {
    &self.safes
  }

  pub fn mines(&self) -> &HashSet<Cell> {
    &self.mines
  }

  pub fn sentences(&self) -> &[Sentence] {
    &self.sentences
  }

  pub fn contains(&self, cell: Cell) -> bool {
    cell.row >= 0
      && cell.col >= 0
      && (cell.row as u32) < self.height
      && (cell.col as u32) < self.width
  }

  pub fn neighbours(&self, cell: Cell) -> impl Iterator<Item = Cell> + '_ {
    cell.neighbours().filter(|&neighbour| self.contains(neighbour))
  }

  /// Records `cell` as a proven mine and propagates the fact into every
  /// active sentence.
  pub fn mark_mine(&mut self, cell: Cell) {
    debug_assert!(!self.safes.contains(&cell), "We deduced that this cell is safe.");
    self.mines.insert(cell);
    for sentence in &mut self.sentences {
      sentence.mark_mine(cell);
    }
  }

  /// Records `cell` as proven safe and propagates the fact into every
  /// active sentence.
  pub fn mark_safe(&mut self, cell: Cell) {
    debug_assert!(!self.mines.contains(&cell), "We deduced that this cell is a mine.");
    self.safes.insert(cell);
    for sentence in &mut self.sentences {
      sentence.mark_safe(cell);
    }
  }

  /// Folds one observation into the knowledge base: the board has revealed
  /// `cell` and reported `count` mines among its neighbours.
  ///
  /// Records the move, marks the revealed cell safe, appends a sentence over
  /// the cell's in-bounds neighbourhood with already-proven cells resolved
  /// out of it, runs one level of direct resolution on that sentence, and
  /// finishes with a pairwise subset-inference sweep that retires sentences
  /// subsumed along the way. Saturation to a fixed point happens across
  /// calls, not within one.
  pub fn add_knowledge(&mut self, cell: Cell, count: u32) {
    self.moves_made.insert(cell);
    self.mark_safe(cell);

    let mut sentence = Sentence::new(self.neighbours(cell), count);
    for &mine in &self.mines {
      sentence.mark_mine(mine);
    }
    for &safe in &self.safes {
      sentence.mark_safe(safe);
    }
    self.sentences.push(sentence);

    let new_idx = self.sentences.len() - 1;
    self.resolve_direct(new_idx);
    self.infer_subsets(new_idx);

    self.sentences.retain(|sentence| !sentence.is_vacuous());
  }

  /// Direct resolution: a sentence whose count equals its cell count is all
  /// mines, one whose count is zero is all safe. One level only; marks
  /// cascade into other sentences but their own conclusions wait for the
  /// next observation.
  fn resolve_direct(&mut self, idx: usize) {
    let conclusion = self.sentences[idx].conclusion();
    if conclusion == Unconclusive {
      return;
    }

    let cells: Vec<Cell> = self.sentences[idx].cells().iter().copied().collect();
    for cell in cells {
      match conclusion {
        CellsAreMines => self.mark_mine(cell),
        CellsAreSafe => self.mark_safe(cell),
        Unconclusive => unreachable!(),
      }
    }
  }

  /// Subset inference against the sentence at `new_idx`: whenever one
  /// sentence's cells contain another's, the cells only in the superset
  /// account for exactly the difference of the two counts. A zero difference
  /// proves them all safe, a difference equal to their number proves them
  /// all mines, and anything in between becomes a derived sentence. The
  /// prior sentence of each such pair is subsumed and retired afterwards.
  fn infer_subsets(&mut self, new_idx: usize) {
    let mut derived: Vec<Sentence> = Vec::new();
    let mut redundant = vec![false; self.sentences.len()];

    for idx in 0..new_idx {
      if self.sentences[idx].is_vacuous() {
        redundant[idx] = true;
        continue;
      }
      if self.sentences[new_idx].is_vacuous() {
        break;
      }

      let prior = &self.sentences[idx];
      let new = &self.sentences[new_idx];
      let (superset, subset) = if prior.cells.is_subset(&new.cells) {
        (new, prior)
      } else if new.cells.is_subset(&prior.cells) {
        (prior, new)
      } else {
        continue;
      };

      let difference: Vec<Cell> = superset.cells.difference(&subset.cells).copied().collect();
      debug_assert!(superset.count >= subset.count);
      let mines_in_difference = superset.count - subset.count;
      redundant[idx] = true;

      if mines_in_difference == 0 {
        for cell in difference {
          self.mark_safe(cell);
        }
      } else if mines_in_difference as usize == difference.len() {
        for cell in difference {
          self.mark_mine(cell);
        }
      } else {
        derived.push(Sentence::new(difference, mines_in_difference));
      }
    }

    let mut keep = redundant.iter().map(|&is_redundant| !is_redundant);
    self.sentences.retain(|_| keep.next().unwrap());

    for sentence in derived {
      if !self.sentences.contains(&sentence) {
        self.sentences.push(sentence);
      }
    }
  }

  /// Any proven-safe cell not yet played, or `None` if the proven knowledge
  /// is exhausted. Never mutates state.
  pub fn make_safe_move(&self) -> Option<Cell> {
    self.safes.difference(&self.moves_made).next().copied()
  }

  /// A uniformly random cell that is neither a known mine nor already
  /// played, or `None` when no such cell is left.
  pub fn make_random_move(&mut self) -> Option<Cell> {
    let candidates: Vec<Cell> = BoardPositionIterator::new(Cell::new(0, 0), self.height, self.width)
      .filter(|cell| !self.moves_made.contains(cell) && !self.mines.contains(cell))
      .collect();

    candidates.choose(&mut self.rng).copied()
  }
}

impl fmt::Debug for KnowledgeBase {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    for row in 0..self.height {
      for col in 0..self.width {
        let cell = Cell::new(row as i32, col as i32);
        if self.mines.contains(&cell) {
          write!(f, "X")?;
        } else if self.moves_made.contains(&cell) {
          write!(f, " ")?;
        } else if self.safes.contains(&cell) {
          write!(f, ".")?;
        } else {
          write!(f, "░")?;
        }
      }
      writeln!(f)?;
    }

    Ok(())
  }
}
