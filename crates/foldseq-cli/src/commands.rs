pub mod align;
pub mod icons;
