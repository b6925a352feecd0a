//! Application services
//!
//! Concrete service implementations that orchestrate domain logic.
//! Services depend on the FileSystem boundary trait but are themselves
//! concrete structs, not traits.

mod catalog;
mod site;

pub use catalog::{
    board_list_url, game_list_url, game_url, Catalog, CatalogEntry, CatalogService, Page,
};
pub use site::{SiteReport, SiteService};
