//! grade-comments - private comments and grades CLI
//!
//! Drives the comment hooks against a file-backed site, acting as any
//! registered user.
//!
//! ## Quick Start
//!
//! ```bash
//! # Create grade-comments.toml and an empty site
//! grade-comments init
//!
//! # Register an instructor and a student, and the student's post
//! grade-comments user add 1 prof --cap manage_options
//! grade-comments user add 2 alice
//! grade-comments post add --author 2 "Essay 1"
//!
//! # Leave private feedback with a grade
//! grade-comments comment add --post 1 --as 1 --private --grade B+ "See me"
//!
//! # See the thread as an anonymous visitor
//! grade-comments comment list --post 1
//! ```

mod commands;

fn main() {
    if let Err(err) = commands::run() {
        eprintln!("Error: {:#}", err);
        std::process::exit(1);
    }
}
