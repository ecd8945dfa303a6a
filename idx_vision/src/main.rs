// Example runner: decodes one IDX image file and prints its first record as a
// hex grid. The full answer-set driver lives in the `idx_tester` crate.

use idx_vision::core_modules::hex_dump::write_hex_grid;
use idx_vision::core_modules::idx_images::read_images_file;
use std::env;
use std::io::{self, Write};

fn main() -> idx_vision::Result<()> {
    println!("IDX Vision - Example Runner");
    let Some(path) = env::args().nth(1) else {
        println!("Usage: idx_vision <images-idx3-ubyte>");
        return Ok(());
    };

    let images = read_images_file(&path)?;
    println!("{path}: {} images", images.len());
    if let Some(first) = images.first() {
        let stdout = io::stdout();
        let mut out = stdout.lock();
        write_hex_grid(&mut out, first)?;
        out.flush()?;
    }
    Ok(())
}
