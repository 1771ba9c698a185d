//! Build script for artistscope.
//!
//! Copies the `.env.example` template from the crate root into the user's
//! local data directory, next to the `.env` file that `config::load_env`
//! reads at startup:
//!
//! - Linux: `~/.local/share/artistscope/.env.example`
//! - macOS: `~/Library/Application Support/artistscope/.env.example`
//! - Windows: `%LOCALAPPDATA%/artistscope/.env.example`
//!
//! A missing template or an unwritable data directory only produces a cargo
//! warning.

use std::{env, fs, path::PathBuf};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("cargo:rerun-if-changed=.env.example");

    let manifest_dir = PathBuf::from(env::var("CARGO_MANIFEST_DIR")?);
    let env_example_path = manifest_dir.join(".env.example");

    let mut out_dir = dirs::data_local_dir().unwrap_or_else(|| PathBuf::from("."));
    out_dir.push("artistscope");

    if env_example_path.is_file() {
        let contents = fs::read_to_string(&env_example_path)?;
        // read-only home directories (CI, sandboxes) must not break the build
        if let Err(e) = fs::create_dir_all(&out_dir)
            .and_then(|_| fs::write(out_dir.join(".env.example"), contents))
        {
            println!(
                "cargo:warning=cannot copy .env.example to {}: {}",
                out_dir.display(),
                e
            );
        }
    } else {
        println!(
            "cargo:warning=.env.example not found at {}",
            env_example_path.display()
        );
    }

    Ok(())
}
