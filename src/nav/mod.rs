pub(crate) mod anchor;
pub(crate) mod menu;
pub(crate) mod tracker;
