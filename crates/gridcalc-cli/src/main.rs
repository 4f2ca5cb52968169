//! Gridcalc CLI - interactive spreadsheet session
//!
//! Runs a read-eval-print loop over a grid, showing a 10x10 viewport
//! that pages with `w`/`a`/`s`/`d` and jumps with `scroll_to`.

use anyhow::{bail, Context, Result};
use clap::Parser;
use gridcalc::prelude::*;
use std::io::{self, BufRead, Write};

const VIEW_ROWS: u32 = 10;
const VIEW_COLS: u32 = 10;
const CELL_WIDTH: usize = 10;

#[derive(Parser)]
#[command(name = "gridcalc")]
#[command(author, version, about = "Interactive spreadsheet engine")]
struct Cli {
    /// Number of rows in the grid
    #[arg(default_value = "10")]
    rows: u32,

    /// Number of columns in the grid
    #[arg(default_value = "10")]
    cols: u32,
}

/// Viewport position; the engine itself knows nothing about scrolling
struct Viewport {
    start_row: u32,
    start_col: u32,
}

impl Viewport {
    fn window(&self) -> GridWindow {
        GridWindow::new(self.start_row, self.start_col, VIEW_ROWS, VIEW_COLS)
    }

    fn page_up(&mut self) {
        self.start_row = self.start_row.saturating_sub(VIEW_ROWS);
    }

    fn page_down(&mut self, grid_rows: u32) {
        let max_start = grid_rows.saturating_sub(VIEW_ROWS);
        self.start_row = (self.start_row + VIEW_ROWS).min(max_start);
    }

    fn page_left(&mut self) {
        self.start_col = self.start_col.saturating_sub(VIEW_COLS);
    }

    fn page_right(&mut self, grid_cols: u32) {
        let max_start = grid_cols.saturating_sub(VIEW_COLS);
        self.start_col = (self.start_col + VIEW_COLS).min(max_start);
    }

    fn jump_to(&mut self, addr: &CellAddress) {
        self.start_row = addr.row;
        self.start_col = addr.col;
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut engine = Engine::new(cli.rows, cli.cols)
        .with_context(|| format!("invalid grid dimensions {}x{}", cli.rows, cli.cols))?;
    let mut viewport = Viewport {
        start_row: 0,
        start_col: 0,
    };

    print_viewport(&engine, &viewport);

    let stdin = io::stdin();
    loop {
        print!("> ");
        io::stdout().flush()?;

        let mut line = String::new();
        if stdin.lock().read_line(&mut line)? == 0 {
            break; // EOF
        }
        let input = line.trim();
        if input.is_empty() {
            continue;
        }
        if input.eq_ignore_ascii_case("q") {
            break;
        }

        match run_command(input, &mut engine, &mut viewport) {
            Ok(()) => print_viewport(&engine, &viewport),
            Err(e) => println!("error: {e}"),
        }
    }

    Ok(())
}

fn run_command(input: &str, engine: &mut Engine, viewport: &mut Viewport) -> Result<()> {
    match input {
        "w" => viewport.page_up(),
        "s" => viewport.page_down(engine.grid().rows()),
        "a" => viewport.page_left(),
        "d" => viewport.page_right(engine.grid().cols()),
        _ => {
            if let Some(target) = input.strip_prefix("scroll_to ") {
                let addr: CellAddress = target.trim().parse()?;
                engine.grid().check_bounds(&addr)?;
                viewport.jump_to(&addr);
            } else if let Some((target, value)) = input.split_once('=') {
                let addr: CellAddress = target.trim().parse()?;
                // A second '=' right after the first marks a formula,
                // exactly like a spreadsheet edit box
                engine.submit(addr, value.trim())?;
            } else {
                bail!("unrecognized command: {input}");
            }
        }
    }
    Ok(())
}

/// Print the current viewport with column-letter and row-number headers
fn print_viewport(engine: &Engine, viewport: &Viewport) {
    let window = viewport.window().clamp(engine.grid());
    let rendered = render_window(engine.grid(), &window);

    print!("{:<6}", "");
    for col in window.start_col..window.start_col + window.cols {
        print!("{:<width$}", CellAddress::column_to_letters(col), width = CELL_WIDTH);
    }
    println!();

    for (i, line) in rendered.iter().enumerate() {
        print!("{:<6}", window.start_row + i as u32 + 1);
        for value in line {
            print!("{:<width$}", clip(value), width = CELL_WIDTH);
        }
        println!();
    }
}

// Keep the fixed-width columns fixed-width
fn clip(value: &str) -> String {
    if value.chars().count() < CELL_WIDTH {
        value.to_string()
    } else {
        let head: String = value.chars().take(CELL_WIDTH - 2).collect();
        format!("{head}~ ")
    }
}
