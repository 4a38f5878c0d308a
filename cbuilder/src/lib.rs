use utils::moduse;

pub(crate) mod tools;
pub mod launch;
pub mod preset;
pub mod process;
pub mod recipe;
moduse!(error);
moduse!(command_line);
moduse!(work_dir);
moduse!(platform);
