pub(crate) mod context;
pub(crate) mod dispatch;
pub(crate) mod prepare;
pub(crate) mod tiles;
