pub mod bin_render;
pub mod grouping;
pub mod oracle;
pub mod shuffle;
