//! sourcelint rules
//!
//! Every concrete rule, grouped by the site or concern it covers, plus the
//! rule abstraction the runner dispatches on.

pub mod catalogue;
pub mod deviantart;
pub mod domains;
pub mod formatting;
pub mod furaffinity;
pub mod incomplete;
pub mod inkbunny;
pub mod misuse;
pub mod protocols;
pub mod rule;
pub mod twitter;

pub use catalogue::{all_rules, default_rules, incomplete_rules, CatalogueError};
pub use domains::{clean_direct_link, HostLists};
pub use incomplete::{Incomplete, IncompleteRule, INCOMPLETE_REASON};
pub use rule::{ListRule, Rule, TextRule, UrlRule};
