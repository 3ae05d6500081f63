//! Chess rules engine: legal move generation, check detection, terminal-state
//! detection (checkmate, stalemate and insufficient material) and move
//! application, including castling, en passant and promotion.
//!
//! The engine lives in [`chess`]: every operation is a pure function over an
//! immutable [`chess::board::Board`] value. [`interaction`] implements the
//! per-ply selection state machine that a user interface drives, and
//! [`Engine`] exposes it through a line-based text protocol.

// Rustc lints.
#![warn(
    absolute_paths_not_starting_with_crate,
    keyword_idents,
    macro_use_extern_crate,
    missing_docs,
    trivial_casts,
    trivial_numeric_casts,
    unreachable_pub,
    unused_extern_crates,
    unused_import_braces,
    unused_lifetimes,
    unused_qualifications,
    unused_results,
    variant_size_differences
)]
// Rustdoc lints.
#![warn(
    rustdoc::private_doc_tests,
    rustdoc::missing_crate_level_docs,
    rustdoc::broken_intra_doc_links,
    rustdoc::invalid_codeblock_attributes,
    rustdoc::invalid_html_tags,
    rustdoc::invalid_rust_codeblocks,
    rustdoc::bare_urls
)]
// Clippy lints.
#![warn(
    clippy::correctness,
    clippy::suspicious,
    clippy::style,
    clippy::complexity,
    clippy::pedantic,
    clippy::nursery,
    clippy::cargo
)]

pub mod chess;
pub mod interaction;

mod engine;
pub use engine::Engine;
use shadow_rs::shadow;

shadow!(build);

/// Returns the full engine version that can be used to identify how it was
/// built in the first place.
fn engine_version() -> String {
    format!(
        "{} (commit {}, branch {})",
        build::PKG_VERSION,
        build::SHORT_COMMIT,
        build::BRANCH
    )
}

/// Prints information about the engine version and whether the build is clean
/// on startup.
pub fn print_engine_info() {
    println!("chessmate {}", engine_version());
    if !shadow_rs::is_debug() && !shadow_rs::git_clean() {
        println!("Warning: built with uncommitted changes");
    }
}
