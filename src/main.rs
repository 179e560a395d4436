//! Difference Pyramid text driver
//!
//! Shuffles one puzzle and prints every layer with status markers.
//! Usage: `diff-pyramid [config.json]`

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::init();
    log::info!("Difference Pyramid (native) starting...");

    if let Err(err) = run(std::env::args().nth(1)) {
        eprintln!("error: {err}");
        std::process::exit(1);
    }
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is web::wasm_start, this is just to satisfy the compiler
}

#[cfg(not(target_arch = "wasm32"))]
fn run(config_path: Option<String>) -> diff_pyramid::Result<()> {
    use diff_pyramid::{Puzzle, PuzzleConfig};

    let config = match config_path {
        Some(path) => PuzzleConfig::load(path)?,
        None => PuzzleConfig::default(),
    };
    let mut puzzle = Puzzle::new(config)?;
    puzzle.shuffle_top();

    println!("seed {}", puzzle.seed());
    print!("{}", render(&puzzle.snapshot()));
    Ok(())
}

/// Plain values are valid, `[n]` duplicate, `!n!` invalid, `.` unset
#[cfg(not(target_arch = "wasm32"))]
fn render(snapshot: &diff_pyramid::Snapshot) -> String {
    use diff_pyramid::CellStatus;
    use std::fmt::Write;

    let mut out = String::new();
    for (l, layer) in snapshot.layers.iter().enumerate() {
        let _ = writeln!(out, "layer {l}:");
        for row in layer.cells.chunks(layer.cols.max(1)) {
            let indent = " ".repeat(3 * l);
            let cells: Vec<String> = row
                .iter()
                .map(|cell| match (cell.value, cell.status) {
                    (Some(v), CellStatus::Duplicate) => format!("[{v:>2}]"),
                    (Some(v), CellStatus::Invalid) => format!("!{v:>2}!"),
                    (Some(v), _) => format!(" {v:>2} "),
                    (None, _) => "  . ".to_string(),
                })
                .collect();
            let _ = writeln!(out, "{indent}{}", cells.join("  "));
        }
    }
    let _ = writeln!(out, "unique differences: {}", snapshot.score);
    if snapshot.solved {
        let _ = writeln!(out, "solved!");
    }
    out
}
