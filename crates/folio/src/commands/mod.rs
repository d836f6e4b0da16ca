//! CLI command implementations.

pub(crate) mod build;
pub(crate) mod render;
pub(crate) mod tokens;

pub(crate) use build::BuildArgs;
pub(crate) use render::RenderArgs;
pub(crate) use tokens::TokensArgs;
