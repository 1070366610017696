pub mod catalog;
pub mod history;

pub use catalog::CatalogStore;
pub use history::HistoryStore;
