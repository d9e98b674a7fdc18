pub(crate) mod cursor_trail;
pub(crate) mod sun_rays;
