pub(crate) mod export;
pub(crate) mod pixel;
pub(crate) mod store;
