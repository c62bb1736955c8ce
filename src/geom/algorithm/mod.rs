pub(super) mod clip;
pub(super) mod proj;
