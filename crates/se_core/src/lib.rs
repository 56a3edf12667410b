pub mod animation;
pub mod audio;
pub mod input;
pub mod time;
