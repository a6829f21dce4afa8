pub mod create;
pub mod delete;
pub mod form;
pub mod list;
pub mod search;
pub mod show;
pub mod update;

// Re-export handler functions for use in routing
pub use create::create;
pub use delete::delete;
pub use form::CarForm;
pub use list::list;
pub use search::search;
pub use show::show;
pub use update::update;
