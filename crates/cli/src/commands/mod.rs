pub mod run;
pub mod template;
pub mod validate;
