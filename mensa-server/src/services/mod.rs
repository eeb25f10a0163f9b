//! Server services
//!
//! External-collaborator seams of the ordering core: the event notifier,
//! the QR token renderer and the check-in photo store.

pub mod notifier;
pub mod photo_store;
pub mod token_render;

pub use notifier::NotifierService;
pub use photo_store::PhotoStoreService;
pub use token_render::TokenRenderService;
