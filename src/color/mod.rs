pub(crate) mod format;
pub(crate) mod icc;
pub(crate) mod library;
