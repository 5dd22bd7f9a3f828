use std::env;
use std::error::Error;
use std::path::PathBuf;
use zip_extensions::write::zip_create_from_directory;

const INPUT_EPUB_DIR: &str = "tests/ebooks/sample_epub";
const OUTPUT_EPUB_FILE: &str = "sample.epub";

/// Convenient script to convert the sample epub directory into a `.epub` file.
fn main() -> Result<(), Box<dyn Error>> {
    println!("cargo::rerun-if-changed={INPUT_EPUB_DIR}");

    let out_path = PathBuf::from(env::var("OUT_DIR")?);

    zip_create_from_directory(
        &out_path.join(OUTPUT_EPUB_FILE),
        &PathBuf::from(INPUT_EPUB_DIR), // Argument must be &PathBuf
    )?;

    Ok(())
}
