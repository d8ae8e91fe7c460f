pub mod check;
pub mod lint;
pub mod run;
