/// Effective configuration and the null stand-in.
pub mod effective;
/// Raw option bags and lookup strategies.
pub mod options;
/// Option-bag resolution.
pub mod resolver;
