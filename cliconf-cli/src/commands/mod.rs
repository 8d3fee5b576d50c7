pub mod builtin;
pub mod commit;
pub mod install;
pub mod load;
pub mod reboot;
pub mod template;
