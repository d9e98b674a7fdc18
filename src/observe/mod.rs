pub(crate) mod polling;
pub(crate) mod watcher;
