#![forbid(unsafe_code)]

/// `embed_migrations!` is not re-expanded when only the SQL files change,
/// so the build script tells cargo to watch the migrations directory.
fn main() {
    println!("cargo:rerun-if-changed=./migrations");
}
