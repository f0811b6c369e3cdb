//! Collaborators owned by the host forum platform.
//!
//! Quick posts only decide which posts are exposed and in what shape; rendering,
//! authorization and post creation are delegated through these traits.

mod cooker;
mod guardian;
mod post_creator;

pub use cooker::{Cooker, ParagraphCooker};
pub use guardian::{Guardian, SiteGuardian};
pub use post_creator::{PostCreateOpts, PostCreator, PostCreatorError, SqlitePostCreator};
