//! SafeRoute CLI library.
//!
//! Argument types, subcommand handlers and output formatting for the
//! `saferoute-cli` binary. Routing itself lives in `saferoute-lib`.

pub mod commands;
pub mod logging;
pub mod output;
pub mod terminal;

#[cfg(test)]
pub(crate) mod test_helpers;
