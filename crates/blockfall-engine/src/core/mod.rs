pub use self::{collision::*, grid::*, piece::*, shape::*};

pub(crate) mod collision;
pub(crate) mod grid;
pub(crate) mod piece;
pub(crate) mod shape;
