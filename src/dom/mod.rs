pub(crate) mod document;
pub(crate) mod selector;
pub(crate) mod synthetic;
