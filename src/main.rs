use std::fs;
use std::path::PathBuf;
use std::process;

use clap::Parser;

use huewords_solver::{render, Dictionary, Error, Puzzle, PuzzleModel};

/// Solve a Huewords puzzle against a 5-letter word list.
#[derive(Debug, Parser)]
#[command(author, version, about)]
struct Args {
    /// Path to the puzzle file.
    puzzle: PathBuf,

    /// Path to the word list, one 5-letter word per line.
    #[arg(short, long, default_value = "words.txt")]
    words: PathBuf,
}

fn main() {
    env_logger::init();

    let args = Args::parse();
    if let Err(err) = run(&args) {
        eprintln!("error: {err}");
        process::exit(1);
    }
}

fn run(args: &Args) -> Result<(), Error> {
    let text = fs::read_to_string(&args.puzzle)?;
    let puzzle = Puzzle::parse(&text)?;
    let dictionary = Dictionary::load(&args.words)?;

    let mut model = PuzzleModel::build(&puzzle, &dictionary)?;
    let solution = model.solve()?;
    print!("{}", render(&model, &solution));

    Ok(())
}
