pub(crate) mod fixture;
pub(crate) mod frame;
pub(crate) mod synthetic;
pub(crate) mod window;
