pub(crate) mod surface;
pub(crate) mod tile;
