pub mod catalog;
pub mod content;
pub mod home;
pub mod videos;

pub use catalog::CatalogClient;
pub use content::ContentService;
pub use home::HomePayload;
