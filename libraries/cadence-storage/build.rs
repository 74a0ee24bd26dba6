//! Build script for cadence-storage.
//!
//! The migrations are embedded with `sqlx::migrate!`, so a changed SQL file
//! has to trigger a rebuild.

fn main() {
    println!("cargo:rerun-if-changed=migrations");
}
