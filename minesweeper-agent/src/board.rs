use core::fmt;
use std::ops::{Add, Index, IndexMut};

pub static NORTH: Cell = Cell::new(-1, 0);
pub static NORTH_EAST: Cell = Cell::new(-1, 1);
pub static EAST: Cell = Cell::new(0, 1);
pub static SOUTH_EAST: Cell = Cell::new(1, 1);
pub static SOUTH: Cell = Cell::new(1, 0);
pub static SOUTH_WEST: Cell = Cell::new(1, -1);
pub static WEST: Cell = Cell::new(0, -1);
pub static NORTH_WEST: Cell = Cell::new(-1, -1);
pub static CENTER: Cell = Cell::new(0, 0);

pub static DIRECTIONS: [Cell; 8] = [NORTH_WEST, NORTH, NORTH_EAST, WEST, EAST, SOUTH_WEST, SOUTH, SOUTH_EAST];
pub static CENTER_AND_DIRECTIONS: [Cell; 9] = [
  NORTH_WEST, NORTH, NORTH_EAST, WEST, CENTER, EAST, SOUTH_WEST, SOUTH, SOUTH_EAST,
];

/// A board coordinate. `row` is counted from the top, `col` from the left.
/// Offsets such as [`NORTH`] are cells too and combine through `Add`.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Cell {
  pub row: i32,
  pub col: i32,
}

impl Cell {
  pub const fn new(row: i32, col: i32) -> Cell {
    Cell { row, col }
  }

  pub fn with_neighbours(self) -> impl Iterator<Item = Cell> {
    CENTER_AND_DIRECTIONS.iter().map(move |&dir| dir + self)
  }

  pub fn neighbours(self) -> impl Iterator<Item = Cell> {
    DIRECTIONS.iter().map(move |&dir| dir + self)
  }
}

impl fmt::Debug for Cell {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "({}, {})", self.row, self.col)
  }
}

impl Add<Cell> for Cell {
  type Output = Cell;

  fn add(self, rhs: Cell) -> Self::Output {
    Cell::new(self.row + rhs.row, self.col + rhs.col)
  }
}

/// Row-major grid storage with bounds-checked access by [`Cell`].
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct Board<T> {
  pub height: u32,
  pub width: u32,
  fields: Vec<T>,
}

impl<T> Board<T> {
  pub fn new(height: u32, width: u32, default: T) -> Self
  where
    T: Clone,
  {
    Self {
      height,
      width,
      fields: vec![default; (width * height) as usize],
    }
  }

  fn cell_to_index(&self, cell: Cell) -> Option<usize> {
    match (usize::try_from(cell.row), usize::try_from(cell.col)) {
      (Ok(row), Ok(col)) if row < self.height as usize && col < self.width as usize => {
        Some(col + row * (self.width as usize))
      }
      _ => None,
    }
  }

  pub fn get(&self, cell: Cell) -> Option<&T> {
    self.cell_to_index(cell).and_then(|i| self.fields.get(i))
  }

  pub fn get_mut(&mut self, cell: Cell) -> Option<&mut T> {
    self.cell_to_index(cell).and_then(|i| self.fields.get_mut(i))
  }

  pub fn positions(&self) -> BoardPositionIterator {
    BoardPositionIterator::new(Cell::new(0, 0), self.height, self.width)
  }

  pub fn enumerate(&self) -> impl Iterator<Item = (Cell, &T)> {
    self.positions().zip(self.fields.iter())
  }
}

impl<T> Index<Cell> for Board<T> {
  type Output = T;

  fn index(&self, index: Cell) -> &Self::Output {
    self.get(index).unwrap_or_else(|| {
      panic!(
        "Cannot access cell {:?} on board with size {}x{}",
        index, self.height, self.width
      )
    })
  }
}

impl<T> IndexMut<Cell> for Board<T> {
  fn index_mut(&mut self, index: Cell) -> &mut T {
    let (height, width) = (self.height, self.width);
    self.get_mut(index).unwrap_or_else(|| {
      panic!(
        "Cannot mut-access cell {:?} on board with size {}x{}",
        index, height, width
      )
    })
  }
}

/// Iterates all cells of a `height`x`width` window row by row, starting at `cell`.
pub struct BoardPositionIterator {
  next_cell: Cell,
  col_start: i32,
  col_end: i32,
  row_end: i32,
}

impl BoardPositionIterator {
  pub fn new(cell: Cell, height: u32, width: u32) -> Self {
    let row_end = cell.row + height as i32;
    Self {
      next_cell: if width == 0 { Cell::new(row_end, 0) } else { cell },
      col_start: cell.col,
      col_end: cell.col + width as i32,
      row_end,
    }
  }
}

impl Iterator for BoardPositionIterator {
  type Item = Cell;

  fn next(&mut self) -> Option<Self::Item> {
    let cell = &mut self.next_cell;
    if cell.row >= self.row_end {
      None
    } else {
      let result = *cell;
      cell.col += 1;
      if cell.col >= self.col_end {
        cell.col = self.col_start;
        cell.row += 1;
      }
      Some(result)
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn neighbours_surround_the_cell() {
    let neighbours: Vec<_> = Cell::new(1, 1).neighbours().collect();
    assert_eq!(neighbours.len(), 8);
    for row in 0..3 {
      for col in 0..3 {
        let cell = Cell::new(row, col);
        assert_eq!(neighbours.contains(&cell), cell != Cell::new(1, 1));
      }
    }
  }

  #[test]
  fn board_access_is_bounds_checked() {
    let mut board = Board::new(2, 3, 0u32);
    board[Cell::new(1, 2)] = 7;
    assert_eq!(board.get(Cell::new(1, 2)), Some(&7));
    assert_eq!(board.get(Cell::new(2, 0)), None);
    assert_eq!(board.get(Cell::new(0, 3)), None);
    assert_eq!(board.get(Cell::new(-1, 0)), None);
  }

  #[test]
  fn positions_cover_the_board_row_major() {
    let board = Board::new(2, 2, ());
    let positions: Vec<_> = board.positions().collect();
    assert_eq!(
      positions,
      vec![Cell::new(0, 0), Cell::new(0, 1), Cell::new(1, 0), Cell::new(1, 1)]
    );
  }
}
