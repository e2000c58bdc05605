pub mod evaluate;
pub mod export;
pub mod init;
pub mod screen;
pub mod validate;
