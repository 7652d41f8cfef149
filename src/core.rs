pub mod app;
pub mod features;
pub mod history;
pub mod keymap;
pub mod storage;
