//! Command handlers, one module per subcommand.

pub mod check;
pub mod convert;
pub mod kinds;
pub mod list;
