//! Turning rendered markup into primitive page structures and counting text.

pub mod html;
pub mod text;

#[cfg(test)]
mod tests;
