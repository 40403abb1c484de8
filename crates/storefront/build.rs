//! Build script for storefront crate.
//!
//! Generates a content-based hash for the stylesheet so templates can emit
//! cache-busting asset URLs.

use std::env;
use std::fs;
use std::path::Path;

use sha2::{Digest, Sha256};

fn main() {
    hash_css();
}

/// Hash main.css and expose the short digest as `CSS_HASH` for `env!`.
fn hash_css() {
    let manifest_dir =
        env::var("CARGO_MANIFEST_DIR").expect("CARGO_MANIFEST_DIR must be set by Cargo");
    let css_path = Path::new(&manifest_dir).join("static/css/main.css");

    // Tell Cargo to rerun if main.css changes
    println!("cargo:rerun-if-changed={}", css_path.display());

    let hash = match fs::read(&css_path) {
        Ok(content) => {
            let digest = Sha256::digest(&content);
            let hex: String = digest.iter().map(|b| format!("{b:02x}")).collect();
            hex.chars().take(8).collect::<String>()
        }
        // Missing stylesheet during fresh checkouts falls back to a fixed tag
        Err(_) => "dev".to_string(),
    };

    println!("cargo:rustc-env=CSS_HASH={hash}");
}
