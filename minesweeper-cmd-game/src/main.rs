use anyhow::{bail, Result};
use clap::Parser;
use minesweeper_agent::{Field, Game, GameSetupBuilder, KnowledgeBase};
use rand::rngs::StdRng;
use rand::SeedableRng;

#[derive(Parser)]
#[command(
  name = "minesweeper-cmd-game",
  about = "Watch a knowledge-base agent play Minesweeper",
  version
)]
struct Cli {
  /// Number of board rows
  #[arg(long, default_value_t = 8)]
  height: u32,

  /// Number of board columns
  #[arg(long, default_value_t = 8)]
  width: u32,

  /// Number of mines to place
  #[arg(long, default_value_t = 8)]
  mines: u32,

  /// Seed for mine placement and the random-move fallback
  #[arg(long)]
  seed: Option<u64>,
}

fn validate_board(height: u32, width: u32, mines: u32) -> Result<()> {
  if height == 0 || width == 0 {
    bail!("the board must have at least one cell");
  }
  // Widened so boards near u32::MAX per side cannot overflow the product.
  if u64::from(mines) >= u64::from(height) * u64::from(width) {
    bail!(
      "{} mines do not leave a playable {}x{} board",
      mines,
      height,
      width
    );
  }
  Ok(())
}

fn main() -> Result<()> {
  let cli = Cli::parse();

  validate_board(cli.height, cli.width, cli.mines)?;

  let mut builder = GameSetupBuilder::new(cli.height, cli.width);
  if let Some(seed) = cli.seed {
    builder = builder.with_rng(StdRng::seed_from_u64(seed));
  }
  if !builder.add_random_mines(cli.mines) {
    bail!("could not place {} mines", cli.mines);
  }

  let mut game = Game::from(builder);
  let mut kb = match cli.seed {
    Some(seed) => KnowledgeBase::with_rng(cli.height, cli.width, StdRng::seed_from_u64(seed)),
    None => KnowledgeBase::new(cli.height, cli.width),
  };

  loop {
    let cell = if let Some(cell) = kb.make_safe_move() {
      println!("Safe move: {:?}", cell);
      cell
    } else if let Some(cell) = kb.make_random_move() {
      println!("No safe moves, trying {:?} at random", cell);
      cell
    } else {
      println!("No moves left to make.");
      break;
    };

    match game.reveal(cell) {
      Field::Mine => {
        println!("{:?}", game);
        println!("Boom! {:?} was a mine.", cell);
        break;
      }
      Field::Empty(nearby) => kb.add_knowledge(cell, nearby),
    }

    let flags: Vec<_> = kb
      .mines()
      .iter()
      .copied()
      .filter(|&mine| !game.is_flagged(mine))
      .collect();
    for mine in flags {
      game.flag(mine);
    }

    println!("{:?}", game);

    if game.is_cleared() || game.all_mines_flagged() {
      println!("Win!");
      break;
    }
  }

  Ok(())
}
