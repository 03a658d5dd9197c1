pub mod assist;
