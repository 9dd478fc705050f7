/// Input assembly across sibling nodes.
pub mod assemble;
/// Shared node state and the node capability trait.
pub mod base;
/// Still-image nodes.
pub mod image;
/// Tagged node variant.
pub mod kind;
/// Video nodes.
pub mod video;
